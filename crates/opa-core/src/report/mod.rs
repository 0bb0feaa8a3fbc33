pub mod model;
pub mod render;

pub use model::PermissionsReport;
pub use render::RenderedReport;
