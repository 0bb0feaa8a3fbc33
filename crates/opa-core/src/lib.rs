pub mod advisor;
pub mod bundle;
pub mod catalog;
pub mod error;
pub mod rbac;
pub mod report;
pub mod util;

pub use advisor::{Advisor, AdvisorConfig, Cancellation};
pub use catalog::CatalogLoader;
pub use error::{AdvisorError, AdvisorResult, CatalogError};
pub use rbac::{PermissionWrapper, Scope};
pub use report::{PermissionsReport, RenderedReport};

/// Name of the command-line tool.
pub const TOOL_NAME: &str = "operator-permission-advisor";

/// Run one advisor invocation and assemble its Role and ClusterRole.
pub async fn advise(
    config: AdvisorConfig,
    loader: &dyn CatalogLoader,
    cancel: &Cancellation,
) -> AdvisorResult<PermissionsReport> {
    let advisor = Advisor::new(config)?;
    let permissions = advisor.get_permissions(loader, cancel).await?;
    Ok(PermissionsReport::from_permissions(&permissions))
}
