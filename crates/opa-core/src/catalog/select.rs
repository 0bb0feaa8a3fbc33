//! Bundle selection.
//!
//! Resolves `(package, channel)` inside a loaded catalog and picks either
//! the channel head or every bundle of the channel.

use tracing::debug;

use crate::catalog::model::{Bundle, Channel, Package};
use crate::error::{AdvisorError, AdvisorResult};

/// The package named `package`, or `None` if the catalog has no such package.
///
/// Linear scan; packages are few and already sorted by the loaders.
pub fn find_package<'a>(packages: &'a [Package], package: &str) -> Option<&'a Package> {
    packages.iter().find(|p| p.name == package)
}

/// The bundles of `channel` to inspect: its head, or all of them when
/// aggregating.
///
/// Aggregate order is the channel's map order (bundle name). Callers must
/// not rely on it.
pub fn bundles_from_channel(channel: &Channel, aggregate: bool) -> AdvisorResult<Vec<&Bundle>> {
    if aggregate {
        return Ok(channel.bundles.values().collect());
    }
    Ok(vec![channel.head().map_err(AdvisorError::ChannelGraph)?])
}

/// Select the bundles of `channel` in `package`.
///
/// A missing package behaves like a package without channels, so it
/// surfaces as `ChannelNotFound` with `package_found == false`.
pub fn select_bundles<'a>(
    packages: &'a [Package],
    package: &str,
    channel: &str,
    aggregate: bool,
) -> AdvisorResult<Vec<&'a Bundle>> {
    let found_package = find_package(packages, package);
    let package_found = found_package.is_some();

    let Some(found) = found_package.and_then(|p| p.channels.get(channel)) else {
        if let Some(p) = found_package {
            debug!(
                package,
                default_channel = p.default_channel.as_deref().unwrap_or_default(),
                available = ?p.channels.keys().collect::<Vec<_>>(),
                "channel not in package"
            );
        }
        return Err(AdvisorError::ChannelNotFound {
            channel: channel.to_string(),
            package: package.to_string(),
            package_found,
        });
    };

    let bundles = bundles_from_channel(found, aggregate)?;
    debug!(
        package,
        channel,
        aggregate,
        bundles = ?bundles.iter().map(|b| b.name.as_str()).collect::<Vec<_>>(),
        "selected bundles"
    );
    Ok(bundles)
}
