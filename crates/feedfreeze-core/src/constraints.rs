//! Turn resolved selections into version-bounded `<requires>` elements.

use std::collections::BTreeSet;

use tracing::{debug, info, warn};

use feedfreeze_util::errors::FreezeError;

use crate::selections::{Selection, Selections};
use crate::version::{RangeMode, Version};
use crate::xml::Element;

pub const REQUIRES: &str = "requires";
pub const VERSION: &str = "version";

/// Which selections get frozen, and how tightly.
#[derive(Debug, Clone, Default)]
pub struct FreezePolicy {
    pub mode: RangeMode,
    /// Interfaces that never get a requirement.
    pub ignore: BTreeSet<String>,
    /// Interfaces that may come from a local feed.
    pub allow_local: BTreeSet<String>,
}

impl FreezePolicy {
    pub fn new(mode: RangeMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }
}

/// The `[not-before, before)` range that freezes `version`.
pub fn version_range(version: &str, mode: RangeMode) -> Result<(String, String), FreezeError> {
    let parsed = Version::parse(version)?;
    let before = parsed.upper_bound(mode)?;
    Ok((version.to_string(), before.to_string()))
}

/// Build one `<requires>` per frozen dependency, in resolver order.
///
/// Fails if a dependency comes from a local feed that is not allow-listed.
pub fn synthesize(
    selections: &Selections,
    policy: &FreezePolicy,
) -> Result<Vec<Element>, FreezeError> {
    let mut requirements = Vec::new();
    for selection in selections.iter() {
        if let Some(req) = requirement_for(selection, &selections.interface, policy)? {
            requirements.push(req);
        }
    }
    Ok(requirements)
}

fn requirement_for(
    selection: &Selection,
    root_interface: &str,
    policy: &FreezePolicy,
) -> Result<Option<Element>, FreezeError> {
    let interface = selection.interface.as_str();
    if interface == root_interface {
        debug!("skipping root interface {interface}");
        return Ok(None);
    }
    if selection.is_distribution() {
        info!("Skipping distribution package {}", selection.package_name());
        return Ok(None);
    }
    if policy.ignore.contains(interface) {
        info!("Skipping ignored interface {interface}");
        return Ok(None);
    }
    if selection.is_local_feed() {
        if !policy.allow_local.contains(interface) {
            return Err(FreezeError::LocalFeedNotAllowed {
                interface: interface.to_string(),
                feed: selection.feed_url().to_string(),
            });
        }
        warn!(
            "Freezing {interface} from local feed {}",
            selection.feed_url()
        );
    }

    let (not_before, before) = version_range(&selection.version, policy.mode)?;
    debug!("Adding dependency on {interface}: not-before={not_before} before={before}");
    let constraint = Element::new(VERSION)
        .with_attr("not-before", not_before)
        .with_attr("before", before);
    let mut requires = Element::new(REQUIRES).with_attr("interface", interface);
    requires.append_child(constraint);
    Ok(Some(requires))
}

/// Append the synthesized requirements to the isolated implementation.
pub fn attach_requirements(implementation: &mut Element, requirements: Vec<Element>) {
    for req in requirements {
        implementation.append_child(req);
    }
}
