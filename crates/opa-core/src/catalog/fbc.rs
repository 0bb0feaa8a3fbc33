//! File-Based Catalog (FBC) decoding.
//!
//! A catalog is a stream of declarative documents distinguished by their
//! `schema` field. Three of them build the package model:
//!
//! - `olm.package`: a package and its default channel
//! - `olm.bundle`: a bundle, with its manifests carried as base64
//!   `olm.bundle.object` properties
//! - `olm.channel`: the bundles of a channel and their upgrade edges
//!
//! Every other schema is skipped.

use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use tracing::debug;

use crate::bundle::classify::object_kind;
use crate::catalog::model::{Bundle, Channel, Package};
use crate::error::CatalogError;

const CSV_KIND: &str = "ClusterServiceVersion";
const BUNDLE_OBJECT_PROPERTY: &str = "olm.bundle.object";

#[derive(Debug, Deserialize)]
#[serde(tag = "schema")]
enum Declaration {
    #[serde(rename = "olm.package")]
    Package(DeclPackage),
    #[serde(rename = "olm.channel")]
    Channel(DeclChannel),
    #[serde(rename = "olm.bundle")]
    Bundle(DeclBundle),
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeclPackage {
    name: String,
    default_channel: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DeclChannel {
    name: String,
    package: String,
    #[serde(default)]
    entries: Vec<ChannelEntry>,
}

#[derive(Debug, Deserialize)]
struct ChannelEntry {
    name: String,
    replaces: Option<String>,
    #[serde(default)]
    skips: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct DeclBundle {
    name: String,
    package: String,
    #[serde(default)]
    image: String,
    #[serde(default)]
    properties: Vec<Property>,
}

#[derive(Debug, Deserialize)]
struct Property {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    value: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct BundleObject {
    data: String,
}

/// Accumulates FBC documents and resolves them into packages.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    packages: BTreeMap<String, DeclPackage>,
    bundles: BTreeMap<(String, String), DeclBundle>,
    channels: Vec<DeclChannel>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a stream of concatenated JSON documents, as written by
    /// `opm render -o json`.
    pub fn add_json(&mut self, origin: &str, text: &str) -> Result<(), CatalogError> {
        for declaration in serde_json::Deserializer::from_str(text).into_iter::<Declaration>() {
            let declaration = declaration.map_err(|source| CatalogError::Json {
                origin: origin.to_string(),
                source,
            })?;
            self.push(declaration);
        }
        Ok(())
    }

    /// Add a multi-document YAML stream.
    pub fn add_yaml(&mut self, origin: &str, text: &str) -> Result<(), CatalogError> {
        for document in serde_yaml::Deserializer::from_str(text) {
            let value = serde_yaml::Value::deserialize(document).map_err(|source| {
                CatalogError::Yaml {
                    origin: origin.to_string(),
                    source,
                }
            })?;
            // Empty documents (a bare `---`) carry nothing.
            if value.is_null() {
                continue;
            }
            let declaration = serde_yaml::from_value(value).map_err(|source| CatalogError::Yaml {
                origin: origin.to_string(),
                source,
            })?;
            self.push(declaration);
        }
        Ok(())
    }

    fn push(&mut self, declaration: Declaration) {
        match declaration {
            Declaration::Package(package) => {
                self.packages.insert(package.name.clone(), package);
            }
            Declaration::Bundle(bundle) => {
                self.bundles
                    .insert((bundle.package.clone(), bundle.name.clone()), bundle);
            }
            Declaration::Channel(channel) => self.channels.push(channel),
            Declaration::Other => {}
        }
    }

    /// Resolve the collected documents into packages sorted by name.
    pub fn build(self) -> Result<Vec<Package>, CatalogError> {
        let mut packages: BTreeMap<String, Package> = self
            .packages
            .into_values()
            .map(|p| {
                let package = Package {
                    name: p.name.clone(),
                    default_channel: p.default_channel,
                    channels: BTreeMap::new(),
                };
                (p.name, package)
            })
            .collect();

        let mut bundles = BTreeMap::new();
        for (key, decl) in self.bundles {
            if !packages.contains_key(&decl.package) {
                return Err(CatalogError::UnknownPackage {
                    kind: "bundle",
                    name: decl.name,
                    package: decl.package,
                });
            }
            bundles.insert(key, resolve_bundle(decl)?);
        }

        for decl in self.channels {
            let Some(package) = packages.get_mut(&decl.package) else {
                return Err(CatalogError::UnknownPackage {
                    kind: "channel",
                    name: decl.name,
                    package: decl.package,
                });
            };

            let mut channel = Channel {
                name: decl.name.clone(),
                package: decl.package.clone(),
                bundles: BTreeMap::new(),
            };
            for entry in decl.entries {
                let key = (decl.package.clone(), entry.name.clone());
                let Some(bundle) = bundles.get(&key) else {
                    return Err(CatalogError::MissingBundle {
                        package: decl.package,
                        channel: decl.name,
                        bundle: entry.name,
                    });
                };
                let bundle = Bundle {
                    channel_name: decl.name.clone(),
                    replaces: entry.replaces,
                    skips: entry.skips,
                    ..Bundle::clone(bundle)
                };
                channel.bundles.insert(entry.name, bundle);
            }
            package.channels.insert(decl.name, channel);
        }

        debug!(
            packages = packages.len(),
            bundles = bundles.len(),
            "resolved file-based catalog"
        );
        Ok(packages.into_values().collect())
    }
}

/// Decode a bundle's manifests. The CSV is kept both as an object and as
/// `csv_json`; objects whose kind cannot be read are left for the
/// classifier to reject.
fn resolve_bundle(decl: DeclBundle) -> Result<Bundle, CatalogError> {
    let mut objects = Vec::new();
    let mut csv_json = String::new();

    for property in decl.properties {
        if property.kind != BUNDLE_OBJECT_PROPERTY {
            continue;
        }
        let object = decode_object(&decl.name, property.value)?;
        if csv_json.is_empty() && matches!(object_kind(&object).as_deref(), Ok(CSV_KIND)) {
            csv_json = object.clone();
        }
        objects.push(object);
    }

    Ok(Bundle {
        name: decl.name,
        package: decl.package,
        image: decl.image,
        csv_json,
        objects,
        ..Default::default()
    })
}

fn decode_object(bundle: &str, value: serde_json::Value) -> Result<String, CatalogError> {
    let invalid = |message: String| CatalogError::BundleObject {
        bundle: bundle.to_string(),
        message,
    };

    let object: BundleObject = serde_json::from_value(value).map_err(|e| invalid(e.to_string()))?;
    let bytes = STANDARD
        .decode(object.data.trim())
        .map_err(|e| invalid(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| invalid(e.to_string()))
}
