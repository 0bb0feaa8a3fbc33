use k8s_openapi::api::rbac::v1::{ClusterRole, PolicyRule, Role};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use uuid::Uuid;

use crate::rbac::model::{PermissionWrapper, Scope};

/// The two synthesized RBAC documents handed to the output writer.
#[derive(Debug, Clone, PartialEq)]
pub struct PermissionsReport {
    pub role: Role,
    pub cluster_role: ClusterRole,
}

impl PermissionsReport {
    /// Group `permissions` by scope, keeping their order, under freshly
    /// generated names.
    pub fn from_permissions(permissions: &[PermissionWrapper]) -> Self {
        Self {
            role: Role {
                metadata: generated_metadata(),
                rules: Some(rules_for(permissions, Scope::Namespace)),
            },
            cluster_role: ClusterRole {
                metadata: generated_metadata(),
                rules: Some(rules_for(permissions, Scope::Cluster)),
                ..Default::default()
            },
        }
    }

    pub fn role_rules(&self) -> &[PolicyRule] {
        self.role.rules.as_deref().unwrap_or_default()
    }

    pub fn cluster_role_rules(&self) -> &[PolicyRule] {
        self.cluster_role.rules.as_deref().unwrap_or_default()
    }
}

fn generated_metadata() -> ObjectMeta {
    ObjectMeta {
        name: Some(Uuid::new_v4().to_string()),
        ..Default::default()
    }
}

fn rules_for(permissions: &[PermissionWrapper], scope: Scope) -> Vec<PolicyRule> {
    permissions
        .iter()
        .filter(|p| p.scope == scope)
        .map(|p| p.rule.clone())
        .collect()
}
