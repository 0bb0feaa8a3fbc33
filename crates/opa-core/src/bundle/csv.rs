//! ClusterServiceVersion permission extraction.
//!
//! Only `spec.install.spec.permissions` and
//! `spec.install.spec.clusterPermissions` are read. The service account each
//! entry is bound to is dropped: the advisor reports the union.

use k8s_openapi::api::rbac::v1::PolicyRule;
use serde::Deserialize;

use crate::bundle::first_document;
use crate::rbac::model::PermissionWrapper;

#[derive(Deserialize)]
struct ClusterServiceVersion {
    spec: Option<CsvSpec>,
}

#[derive(Deserialize)]
struct CsvSpec {
    install: Option<InstallStrategy>,
}

#[derive(Deserialize)]
struct InstallStrategy {
    spec: Option<StrategyDetails>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StrategyDetails {
    permissions: Option<Vec<StrategyPermissions>>,
    cluster_permissions: Option<Vec<StrategyPermissions>>,
}

#[derive(Deserialize)]
struct StrategyPermissions {
    rules: Option<Vec<PolicyRule>>,
}

/// Rules declared by a CSV install strategy, split by scope.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvPermissions {
    pub namespace: Vec<PolicyRule>,
    pub cluster: Vec<PolicyRule>,
}

impl CsvPermissions {
    pub fn is_empty(&self) -> bool {
        self.namespace.is_empty() && self.cluster.is_empty()
    }

    /// Cluster rules first, then namespace rules, each in source order.
    pub fn into_permissions(self) -> Vec<PermissionWrapper> {
        self.cluster
            .into_iter()
            .map(PermissionWrapper::cluster)
            .chain(self.namespace.into_iter().map(PermissionWrapper::namespaced))
            .collect()
    }
}

/// Extract the install-strategy rules from a JSON or YAML CSV document.
///
/// Missing, null or empty permission blocks produce empty lists, as does a
/// blank document. Documents after the first are ignored.
pub fn extract(csv_text: &str) -> Result<CsvPermissions, serde_yaml::Error> {
    let document = first_document(csv_text)?;
    if document.is_null() {
        return Ok(CsvPermissions::default());
    }

    let csv: ClusterServiceVersion = serde_yaml::from_value(document)?;
    let Some(details) = csv
        .spec
        .and_then(|spec| spec.install)
        .and_then(|install| install.spec)
    else {
        return Ok(CsvPermissions::default());
    };

    Ok(CsvPermissions {
        namespace: flatten(details.permissions),
        cluster: flatten(details.cluster_permissions),
    })
}

fn flatten(entries: Option<Vec<StrategyPermissions>>) -> Vec<PolicyRule> {
    entries
        .unwrap_or_default()
        .into_iter()
        .flat_map(|entry| entry.rules.unwrap_or_default())
        .collect()
}
