pub mod fingerprint;
pub mod model;
pub mod registry;

pub use fingerprint::{Fingerprint, Fingerprinted, fingerprint};
pub use model::{PermissionWrapper, Scope};
pub use registry::{Registry, RegistryError};
