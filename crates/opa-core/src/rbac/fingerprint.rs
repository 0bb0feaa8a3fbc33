//! Rule canonicalization.
//!
//! A fingerprint identifies a `(scope, rule)` pair up to permutation of the
//! rule's list fields. The canonical text is
//!
//! ```text
//! scope - verbs - apiGroups - resources - resourceNames - nonResourceURLs
//! ```
//!
//! where every slot holds its values sorted byte-wise and concatenated
//! without a separator, and `-` separates slots. The SHA-256 digest of that
//! text is the fingerprint.

use std::fmt;

use k8s_openapi::api::rbac::v1::PolicyRule;
use sha2::{Digest, Sha256};

use crate::rbac::model::{PermissionWrapper, Scope};
use crate::util::deterministic::sorted_strs;

/// Fingerprint of an absent wrapper. Shorter than any digest, so it can
/// never collide with one.
pub const NIL_FINGERPRINT: &[u8] = b"nil";

const SLOT_DELIMITER: char = '-';

/// Canonical identity of a `(scope, rule)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(Vec<u8>);

impl Fingerprint {
    pub fn nil() -> Self {
        Self(NIL_FINGERPRINT.to_vec())
    }

    pub fn is_nil(&self) -> bool {
        self.0 == NIL_FINGERPRINT
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Fingerprint {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(&self.0))
    }
}

/// Anything the duplicate registry can key on.
pub trait Fingerprinted {
    fn fingerprint(&self) -> Fingerprint;
}

impl Fingerprinted for PermissionWrapper {
    fn fingerprint(&self) -> Fingerprint {
        fingerprint(self.scope, &self.rule)
    }
}

impl<T: Fingerprinted + ?Sized> Fingerprinted for &T {
    fn fingerprint(&self) -> Fingerprint {
        (**self).fingerprint()
    }
}

impl<T: Fingerprinted> Fingerprinted for Option<T> {
    fn fingerprint(&self) -> Fingerprint {
        match self {
            Some(inner) => inner.fingerprint(),
            None => Fingerprint::nil(),
        }
    }
}

/// Canonical text form hashed by [`fingerprint`].
pub fn canonical_form(scope: Scope, rule: &PolicyRule) -> String {
    let slots: [&[String]; 5] = [
        &rule.verbs,
        rule.api_groups.as_deref().unwrap_or_default(),
        rule.resources.as_deref().unwrap_or_default(),
        rule.resource_names.as_deref().unwrap_or_default(),
        rule.non_resource_urls.as_deref().unwrap_or_default(),
    ];

    let mut text = String::from(scope.as_str());
    for slot in slots {
        text.push(SLOT_DELIMITER);
        text.extend(sorted_strs(slot));
    }
    text
}

/// Compute the fingerprint of a `(scope, rule)` pair.
///
/// Pure and deterministic: it depends only on the scope and on the multiset
/// of values in each list field.
pub fn fingerprint(scope: Scope, rule: &PolicyRule) -> Fingerprint {
    let mut hasher = Sha256::new();
    hasher.update(canonical_form(scope, rule).as_bytes());
    Fingerprint(hasher.finalize().to_vec())
}
