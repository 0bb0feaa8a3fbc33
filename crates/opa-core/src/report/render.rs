//! YAML rendering of a [`PermissionsReport`].

use crate::report::model::PermissionsReport;

/// Serialized form of a report, produced once and reused for every view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedReport {
    pub role_yaml: String,
    pub cluster_role_yaml: String,
}

impl RenderedReport {
    pub fn new(report: &PermissionsReport) -> Result<Self, serde_yaml::Error> {
        Ok(Self {
            role_yaml: serde_yaml::to_string(&report.role)?,
            cluster_role_yaml: serde_yaml::to_string(&report.cluster_role)?,
        })
    }

    /// Labelled view for humans.
    pub fn standard(&self) -> String {
        format!(
            "Role:\n{}\nCluster Role:\n{}\n",
            self.role_yaml, self.cluster_role_yaml
        )
    }

    /// Two YAML documents separated by `---`, for piping into `kubectl`.
    pub fn compact(&self) -> String {
        format!("{}\n---\n{}\n", self.role_yaml, self.cluster_role_yaml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rbac::model::PermissionWrapper;
    use k8s_openapi::api::rbac::v1::{ClusterRole, PolicyRule, Role};

    fn report() -> PermissionsReport {
        PermissionsReport::from_permissions(&[
            PermissionWrapper::namespaced(PolicyRule {
                api_groups: Some(vec!["".into()]),
                resources: Some(vec!["configmaps".into()]),
                verbs: vec!["get".into(), "list".into()],
                ..Default::default()
            }),
            PermissionWrapper::cluster(PolicyRule {
                non_resource_urls: Some(vec!["/metrics".into()]),
                verbs: vec!["get".into()],
                ..Default::default()
            }),
        ])
    }

    #[test]
    fn yaml_carries_kind_and_api_version() {
        let rendered = RenderedReport::new(&report()).unwrap();

        assert!(rendered.role_yaml.contains("apiVersion: rbac.authorization.k8s.io/v1"));
        assert!(rendered.role_yaml.contains("kind: Role"));
        assert!(rendered.cluster_role_yaml.contains("kind: ClusterRole"));
        assert!(rendered.cluster_role_yaml.contains("nonResourceURLs"));
    }

    #[test]
    fn yaml_round_trips_rules() {
        let original = report();
        let rendered = RenderedReport::new(&original).unwrap();

        let role: Role = serde_yaml::from_str(&rendered.role_yaml).unwrap();
        let cluster_role: ClusterRole = serde_yaml::from_str(&rendered.cluster_role_yaml).unwrap();

        assert_eq!(role, original.role);
        assert_eq!(cluster_role, original.cluster_role);
    }

    #[test]
    fn empty_rules_render_as_empty_list() {
        let rendered = RenderedReport::new(&PermissionsReport::from_permissions(&[])).unwrap();

        assert!(rendered.role_yaml.contains("rules: []"));
        assert!(rendered.cluster_role_yaml.contains("rules: []"));
    }

    #[test]
    fn standard_view_labels_both_documents() {
        let rendered = RenderedReport::new(&report()).unwrap();
        let out = rendered.standard();

        let role_at = out.find("Role:\n").unwrap();
        let cluster_at = out.find("Cluster Role:\n").unwrap();
        assert!(role_at < cluster_at);
        assert!(out.contains(&rendered.role_yaml));
    }

    #[test]
    fn compact_view_is_a_yaml_stream() {
        let rendered = RenderedReport::new(&report()).unwrap();
        let out = rendered.compact();

        let kinds: Vec<String> = serde_yaml::Deserializer::from_str(&out)
            .map(|doc| {
                let value = <serde_yaml::Value as serde::Deserialize>::deserialize(doc).unwrap();
                value["kind"].as_str().unwrap_or_default().to_string()
            })
            .filter(|kind| !kind.is_empty())
            .collect();
        assert_eq!(kinds, vec!["Role", "ClusterRole"]);
    }
}
