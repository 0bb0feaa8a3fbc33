use std::fmt;

use k8s_openapi::api::rbac::v1::PolicyRule;
use serde::{Deserialize, Serialize};

/// Where a rule has to be granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Granted through a `Role`.
    Namespace,
    /// Granted through a `ClusterRole`.
    Cluster,
}

impl Scope {
    /// Canonical text of the scope. Part of the fingerprint encoding.
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Namespace => "namespace",
            Scope::Cluster => "cluster",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single RBAC rule together with the scope it must be granted at.
///
/// The rule is kept exactly as found in the bundle; canonicalization only
/// happens when fingerprinting.
#[derive(Debug, Clone, PartialEq)]
pub struct PermissionWrapper {
    pub scope: Scope,
    pub rule: PolicyRule,
}

impl PermissionWrapper {
    pub fn new(scope: Scope, rule: PolicyRule) -> Self {
        Self { scope, rule }
    }

    pub fn namespaced(rule: PolicyRule) -> Self {
        Self::new(Scope::Namespace, rule)
    }

    pub fn cluster(rule: PolicyRule) -> Self {
        Self::new(Scope::Cluster, rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_text_is_stable() {
        assert_eq!(Scope::Namespace.as_str(), "namespace");
        assert_eq!(Scope::Cluster.to_string(), "cluster");
        assert_eq!(serde_json::to_string(&Scope::Cluster).unwrap(), "\"cluster\"");
    }

    #[test]
    fn constructors_set_scope() {
        let rule = PolicyRule {
            verbs: vec!["get".into()],
            ..Default::default()
        };
        assert_eq!(PermissionWrapper::namespaced(rule.clone()).scope, Scope::Namespace);
        assert_eq!(PermissionWrapper::cluster(rule).scope, Scope::Cluster);
    }
}
