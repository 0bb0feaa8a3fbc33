pub mod fbc;
pub mod loader;
pub mod model;
pub mod select;

pub use loader::{CatalogLoader, FbcLoader, IndexLoader, OpmLoader};
pub use model::{Bundle, Channel, Package};
pub use select::select_bundles;
