use std::collections::HashMap;

use thiserror::Error;

use crate::rbac::fingerprint::{Fingerprint, Fingerprinted};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("key for fingerprint {0} already exists in the registry")]
    DuplicateKey(Fingerprint),
}

/// In-memory set of already observed items, keyed by fingerprint.
///
/// Holds the first item seen for each fingerprint. Iteration order of the
/// map is meaningless; callers that care about first-observation order keep
/// their own list. Not shared between advisor invocations.
#[derive(Debug)]
pub struct Registry<T> {
    entries: HashMap<Fingerprint, T>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T: Fingerprinted + Clone> Registry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an item with the same fingerprint was already registered.
    pub fn seen(&self, item: &T) -> bool {
        self.entries.contains_key(&item.fingerprint())
    }

    /// Register `item`. Fails if its fingerprint is already present; the
    /// first registered item is kept.
    pub fn insert(&mut self, item: &T) -> Result<(), RegistryError> {
        self.insert_keyed(item.fingerprint(), item)
    }

    /// `seen` followed by `insert`, fingerprinting only once.
    ///
    /// The insert result is `Err(DuplicateKey)` exactly when `was_seen` is
    /// true.
    pub fn check_and_insert(&mut self, item: &T) -> (bool, Result<(), RegistryError>) {
        let key = item.fingerprint();
        let was_seen = self.entries.contains_key(&key);
        (was_seen, self.insert_keyed(key, item))
    }

    pub fn get(&self, key: &Fingerprint) -> Option<&T> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert_keyed(&mut self, key: Fingerprint, item: &T) -> Result<(), RegistryError> {
        if self.entries.contains_key(&key) {
            return Err(RegistryError::DuplicateKey(key));
        }
        self.entries.insert(key, item.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rbac::model::PermissionWrapper;
    use k8s_openapi::api::rbac::v1::PolicyRule;

    #[derive(Debug, Clone, PartialEq)]
    struct Fake(&'static str);

    impl Fingerprinted for Fake {
        fn fingerprint(&self) -> Fingerprint {
            Fingerprint::from(self.0.as_bytes().to_vec())
        }
    }

    #[test]
    fn empty_registry_has_seen_nothing() {
        let registry: Registry<Fake> = Registry::new();
        assert!(!registry.seen(&Fake("test")));
        assert!(registry.is_empty());
    }

    #[test]
    fn other_keys_do_not_match() {
        let mut registry = Registry::new();
        registry.insert(&Fake("test1")).unwrap();

        assert!(!registry.seen(&Fake("test")));
        assert!(registry.insert(&Fake("test")).is_ok());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn second_insert_is_duplicate_key() {
        let mut registry = Registry::new();
        registry.insert(&Fake("test")).unwrap();

        assert!(registry.seen(&Fake("test")));
        assert_eq!(
            registry.insert(&Fake("test")),
            Err(RegistryError::DuplicateKey(Fingerprint::from(b"test".to_vec())))
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn check_and_insert_reports_prior_state() {
        let mut registry = Registry::new();

        let (seen, inserted) = registry.check_and_insert(&Fake("a"));
        assert!(!seen);
        assert!(inserted.is_ok());

        let (seen, inserted) = registry.check_and_insert(&Fake("a"));
        assert!(seen);
        assert!(inserted.is_err());
    }

    #[test]
    fn keeps_first_observed_item() {
        let first = PermissionWrapper::namespaced(PolicyRule {
            verbs: vec!["get".into(), "list".into()],
            ..Default::default()
        });
        let reordered = PermissionWrapper::namespaced(PolicyRule {
            verbs: vec!["list".into(), "get".into()],
            ..Default::default()
        });

        let mut registry = Registry::new();
        registry.insert(&first).unwrap();
        assert!(registry.seen(&reordered));
        assert!(registry.insert(&reordered).is_err());

        let stored = registry.get(&first.fingerprint()).unwrap();
        assert_eq!(stored.rule.verbs, vec!["get", "list"]);
    }
}
