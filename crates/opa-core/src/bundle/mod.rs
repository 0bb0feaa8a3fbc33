//! Readers for the two places a bundle declares RBAC: free-standing
//! `Role`/`ClusterRole` manifests and the CSV install strategy.

pub mod classify;
pub mod csv;

use serde::Deserialize;
use serde_yaml::Value;

pub use classify::{Classified, ManifestObject, classify};
pub use csv::{CsvPermissions, extract};

/// The first document of a JSON or YAML text; later documents are ignored.
/// Blank text and an empty document both read as `Null`.
pub(crate) fn first_document(text: &str) -> Result<Value, serde_yaml::Error> {
    match serde_yaml::Deserializer::from_str(text).next() {
        Some(document) => Value::deserialize(document),
        None => Ok(Value::Null),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_first_document_is_read() {
        let value = first_document("---\nkind: Role\n---\nkind: ConfigMap\n").unwrap();
        assert_eq!(value["kind"], Value::from("Role"));
    }

    #[test]
    fn blank_and_empty_documents_are_null() {
        assert!(first_document("").unwrap().is_null());
        assert!(first_document("  \n").unwrap().is_null());
        assert!(first_document("---\n").unwrap().is_null());
    }

    #[test]
    fn broken_first_document_is_an_error() {
        assert!(first_document("key: value: other\n---\nkind: Role\n").is_err());
    }
}
