use std::path::PathBuf;

use thiserror::Error;

use crate::rbac::registry::RegistryError;

/// Failures surfaced by one advisor invocation.
///
/// Every variant is fatal for the invocation: no partial permission list is
/// ever returned alongside an error.
#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("invalid advisor configuration: {0}")]
    Configuration(String),

    #[error("failed to load catalog: {0}")]
    CatalogLoad(#[from] CatalogError),

    #[error("the specified channel {channel:?} does not exist in the catalog reference{}", missing_package_hint(.package, .package_found))]
    ChannelNotFound {
        channel: String,
        package: String,
        package_found: bool,
    },

    #[error("invalid channel graph: {0}")]
    ChannelGraph(#[source] CatalogError),

    #[error("malformed manifest in bundle {bundle:?}{}: {source}", object_hint(.object))]
    MalformedManifest {
        bundle: String,
        /// Index into the bundle's object list; `None` for the CSV document.
        object: Option<usize>,
        source: serde_yaml::Error,
    },

    #[error("permission registry: {0}")]
    Registry(#[from] RegistryError),

    #[error("permission lookup was cancelled")]
    Cancelled,
}

fn missing_package_hint(package: &str, package_found: &bool) -> String {
    if *package_found {
        String::new()
    } else {
        format!(" (package {package:?} was not found)")
    }
}

fn object_hint(object: &Option<usize>) -> String {
    match object {
        Some(index) => format!(" (object #{index})"),
        None => " (ClusterServiceVersion)".to_string(),
    }
}

/// Failures raised while turning a catalog reference into packages.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to walk catalog directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("invalid JSON catalog document in {origin}: {source}")]
    Json {
        origin: String,
        source: serde_json::Error,
    },

    #[error("invalid YAML catalog document in {origin}: {source}")]
    Yaml {
        origin: String,
        source: serde_yaml::Error,
    },

    #[error("bundle {bundle:?} has an invalid olm.bundle.object property: {message}")]
    BundleObject { bundle: String, message: String },

    #[error("failed to run {binary:?}: {source}")]
    OpmSpawn {
        binary: PathBuf,
        source: std::io::Error,
    },

    #[error("opm render exited with {}: {stderr}", exit_status(.status))]
    Opm { status: Option<i32>, stderr: String },

    #[error("{kind} {name:?} references unknown package {package:?}")]
    UnknownPackage {
        kind: &'static str,
        name: String,
        package: String,
    },

    #[error("channel {channel:?} of package {package:?} references unknown bundle {bundle:?}")]
    MissingBundle {
        package: String,
        channel: String,
        bundle: String,
    },

    #[error("no channel head found in graph of channel {channel:?}")]
    NoChannelHead { channel: String },

    #[error("multiple channel heads found in graph of channel {channel:?}: {}", .heads.join(", "))]
    MultipleChannelHeads { channel: String, heads: Vec<String> },

    #[error("catalog loading task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

fn exit_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("status {code}"),
        None => "no status (terminated by signal)".to_string(),
    }
}

pub type AdvisorResult<T> = Result<T, AdvisorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_not_found_mentions_missing_package() {
        let err = AdvisorError::ChannelNotFound {
            channel: "stable".into(),
            package: "etcd".into(),
            package_found: false,
        };
        let rendered = err.to_string();
        assert!(rendered.contains("\"stable\""));
        assert!(rendered.contains("package \"etcd\" was not found"));

        let err = AdvisorError::ChannelNotFound {
            channel: "stable".into(),
            package: "etcd".into(),
            package_found: true,
        };
        assert!(!err.to_string().contains("was not found"));
    }

    #[test]
    fn multiple_heads_lists_every_head() {
        let err = CatalogError::MultipleChannelHeads {
            channel: "alpha".into(),
            heads: vec!["a.v1".into(), "b.v1".into()],
        };
        assert!(err.to_string().ends_with("a.v1, b.v1"));
    }

    #[test]
    fn opm_error_without_status_code() {
        let err = CatalogError::Opm {
            status: None,
            stderr: "boom".into(),
        };
        assert!(err.to_string().contains("terminated by signal"));
    }
}
