use std::collections::{BTreeMap, HashSet};

use crate::error::CatalogError;
use crate::util::deterministic::sorted_names;

/// An operator package and its channels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Package {
    pub name: String,
    pub default_channel: Option<String>,
    pub channels: BTreeMap<String, Channel>,
}

/// An upgrade stream within a package.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Channel {
    pub name: String,
    pub package: String,
    pub bundles: BTreeMap<String, Bundle>,
}

/// One operator version as it appears in one channel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bundle {
    pub name: String,
    pub package: String,
    pub channel_name: String,
    pub image: String,
    /// Bundle this one upgrades from in the channel graph.
    pub replaces: Option<String>,
    pub skips: Vec<String>,
    /// The ClusterServiceVersion manifest; empty when the catalog carries none.
    pub csv_json: String,
    /// Every manifest shipped with the bundle, CSV included, in catalog order.
    pub objects: Vec<String>,
}

impl Channel {
    /// The single bundle no other bundle in the channel replaces or skips.
    pub fn head(&self) -> Result<&Bundle, CatalogError> {
        let incoming: HashSet<&str> = self
            .bundles
            .values()
            .flat_map(|b| {
                b.replaces
                    .as_deref()
                    .into_iter()
                    .chain(b.skips.iter().map(String::as_str))
            })
            .collect();

        let heads: Vec<&Bundle> = self
            .bundles
            .values()
            .filter(|b| !incoming.contains(b.name.as_str()))
            .collect();

        match heads.as_slice() {
            [head] => Ok(*head),
            [] => Err(CatalogError::NoChannelHead {
                channel: self.name.clone(),
            }),
            _ => Err(CatalogError::MultipleChannelHeads {
                channel: self.name.clone(),
                heads: sorted_names(heads.iter().map(|b| b.name.as_str())),
            }),
        }
    }
}
