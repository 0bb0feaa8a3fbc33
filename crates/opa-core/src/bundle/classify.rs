use k8s_openapi::api::rbac::v1::PolicyRule;
use serde::Deserialize;

use crate::bundle::first_document;
use crate::rbac::model::PermissionWrapper;

/// Typed payload of a classified manifest.
#[derive(Debug, Clone, PartialEq)]
pub enum ManifestObject {
    Role(Vec<PolicyRule>),
    ClusterRole(Vec<PolicyRule>),
    Other,
}

/// A manifest's `kind` and, for RBAC kinds, its rules.
#[derive(Debug, Clone, PartialEq)]
pub struct Classified {
    /// `kind` as written in the manifest; empty when absent.
    pub kind: String,
    pub object: ManifestObject,
}

impl Classified {
    pub fn is_rbac(&self) -> bool {
        !matches!(self.object, ManifestObject::Other)
    }

    /// Wrap the manifest's rules with the scope implied by its kind.
    pub fn into_permissions(self) -> Vec<PermissionWrapper> {
        match self.object {
            ManifestObject::Role(rules) => {
                rules.into_iter().map(PermissionWrapper::namespaced).collect()
            }
            ManifestObject::ClusterRole(rules) => {
                rules.into_iter().map(PermissionWrapper::cluster).collect()
            }
            ManifestObject::Other => Vec::new(),
        }
    }
}

#[derive(Deserialize)]
struct ObjectHeader {
    kind: Option<String>,
}

#[derive(Deserialize)]
struct RbacObject {
    rules: Option<Vec<PolicyRule>>,
}

/// Read the `kind` of a JSON or YAML manifest. Blank input has no kind.
///
/// Only the first document of a multi-document object is considered.
pub fn object_kind(text: &str) -> Result<String, serde_yaml::Error> {
    kind_of(&first_document(text)?)
}

fn kind_of(document: &serde_yaml::Value) -> Result<String, serde_yaml::Error> {
    if document.is_null() {
        return Ok(String::new());
    }
    let header: ObjectHeader = serde_yaml::from_value(document.clone())?;
    Ok(header.kind.unwrap_or_default())
}

/// Classify a JSON or YAML manifest by `kind`.
///
/// `Role` and `ClusterRole` (compared ASCII case-insensitively) are decoded
/// further to harvest their rules; every other kind only reports its name.
pub fn classify(text: &str) -> Result<Classified, serde_yaml::Error> {
    let document = first_document(text)?;
    let kind = kind_of(&document)?;

    let object = if kind.eq_ignore_ascii_case("ClusterRole") {
        ManifestObject::ClusterRole(rules_of(document)?)
    } else if kind.eq_ignore_ascii_case("Role") {
        ManifestObject::Role(rules_of(document)?)
    } else {
        ManifestObject::Other
    };

    Ok(Classified { kind, object })
}

fn rules_of(document: serde_yaml::Value) -> Result<Vec<PolicyRule>, serde_yaml::Error> {
    let object: RbacObject = serde_yaml::from_value(document)?;
    Ok(object.rules.unwrap_or_default())
}
