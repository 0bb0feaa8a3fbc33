//! The permission-aggregation pipeline.
//!
//! One call to [`Advisor::get_permissions`] moves through
//! `Loading → Selecting → Extracting → Done`; any step can fail the whole
//! call, and no partial result is ever returned.

pub mod cancel;

use tracing::{debug, info};

use crate::bundle::{classify, csv};
use crate::catalog::loader::CatalogLoader;
use crate::catalog::model::Bundle;
use crate::catalog::select::select_bundles;
use crate::error::{AdvisorError, AdvisorResult};
use crate::rbac::fingerprint::Fingerprinted;
use crate::rbac::model::PermissionWrapper;
use crate::rbac::registry::Registry;

pub use cancel::{CancelHandle, Cancellation, cancellation};

/// What to inspect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdvisorConfig {
    /// Catalog index reference: an image for `opm`, or a local FBC path.
    pub index_reference: String,
    /// Operator package to inspect.
    pub operator_package: String,
    /// Channel inside the package.
    pub channel: String,
    /// Inspect every bundle of the channel instead of only its head.
    pub aggregate: bool,
}

impl AdvisorConfig {
    pub fn validate(&self) -> AdvisorResult<()> {
        let required = [
            ("index reference", &self.index_reference),
            ("operator package", &self.operator_package),
            ("channel", &self.channel),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(AdvisorError::Configuration(format!("{name} must not be empty")));
            }
        }
        Ok(())
    }
}

/// Computes the RBAC rules an operator channel needs.
#[derive(Debug, Clone)]
pub struct Advisor {
    config: AdvisorConfig,
}

impl Advisor {
    pub fn new(config: AdvisorConfig) -> AdvisorResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AdvisorConfig {
        &self.config
    }

    /// Load the catalog, select bundles and return every distinct
    /// `(scope, rule)` pair in first-observation order.
    ///
    /// Order: bundles in selection order; within a bundle, `Role` and
    /// `ClusterRole` manifests in object order, then CSV cluster rules, then
    /// CSV namespace rules.
    pub async fn get_permissions(
        &self,
        loader: &dyn CatalogLoader,
        cancel: &Cancellation,
    ) -> AdvisorResult<Vec<PermissionWrapper>> {
        let config = &self.config;

        info!(reference = %config.index_reference, "loading catalog");
        let packages = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(AdvisorError::Cancelled),
            loaded = loader.load_packages(&config.index_reference) => loaded?,
        };

        let bundles = select_bundles(
            &packages,
            &config.operator_package,
            &config.channel,
            config.aggregate,
        )?;

        let mut registry = Registry::new();
        let mut permissions = Vec::new();

        for bundle in bundles {
            if cancel.is_cancelled() {
                return Err(AdvisorError::Cancelled);
            }

            let candidates = bundle_permissions(bundle)?;
            debug!(
                bundle = %bundle.name,
                package = %bundle.package,
                image = %bundle.image,
                candidates = candidates.len(),
                "extracted rules"
            );

            for candidate in candidates {
                let (seen, inserted) = registry.check_and_insert(&candidate);
                if seen {
                    debug!(
                        bundle = %bundle.name,
                        fingerprint = %candidate.fingerprint(),
                        "dropping duplicate rule"
                    );
                    continue;
                }
                inserted?;
                permissions.push(candidate);
            }
        }

        info!(
            package = %config.operator_package,
            channel = %config.channel,
            rules = permissions.len(),
            "aggregated permissions"
        );
        Ok(permissions)
    }
}

/// Every rule a bundle declares, before deduplication.
///
/// `Role`/`ClusterRole` manifests come first in object order, followed by
/// the CSV's cluster and namespace rules.
pub fn bundle_permissions(bundle: &Bundle) -> AdvisorResult<Vec<PermissionWrapper>> {
    let mut permissions = Vec::new();

    for (index, object) in bundle.objects.iter().enumerate() {
        let classified =
            classify::classify(object).map_err(|source| AdvisorError::MalformedManifest {
                bundle: bundle.name.clone(),
                object: Some(index),
                source,
            })?;
        if classified.is_rbac() {
            permissions.extend(classified.into_permissions());
        }
    }

    let from_csv = csv::extract(&bundle.csv_json).map_err(|source| {
        AdvisorError::MalformedManifest {
            bundle: bundle.name.clone(),
            object: None,
            source,
        }
    })?;
    permissions.extend(from_csv.into_permissions());

    Ok(permissions)
}
