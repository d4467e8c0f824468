//! Feed pruning: isolate one implementation, drop everything a frozen feed
//! does not need.

use std::path::Path;

use tracing::debug;

use feedfreeze_util::errors::FreezeError;
use feedfreeze_util::fs::relative_path;

use crate::feed::Feed;
use crate::xml::Element;

pub const IMPLEMENTATION: &str = "implementation";
pub const GROUP: &str = "group";
pub const COMMAND: &str = "command";

/// Name given to the single command a frozen feed exposes.
pub const CANONICAL_COMMAND: &str = "run";

/// Top-level elements that survive [`clean_feed`].
///
/// `implementation` is kept so that a feed without groups still contains
/// its isolated implementation.
pub const TOP_LEVEL_KEEP: &[&str] = &[
    "name",
    "summary",
    "group",
    "requires",
    "command",
    "interface",
    IMPLEMENTATION,
];

/// Delete every implementation except `impl_id` and every group left empty,
/// returning the surviving implementation.
pub fn isolate_implementation<'a>(
    feed: &'a mut Feed,
    impl_id: &str,
) -> Result<&'a mut Element, FreezeError> {
    let lookup_error = |count| FreezeError::Lookup {
        what: format!("implementation with id={impl_id}"),
        count,
    };

    let root = feed.root_mut();
    let matches = root
        .descendants_named(IMPLEMENTATION)
        .iter()
        .filter(|i| i.attr("id") == Some(impl_id))
        .count();
    if matches != 1 {
        return Err(lookup_error(matches));
    }
    debug!("found feed implementation with id: {impl_id}");

    remove_other_implementations(root, impl_id);
    prune_empty_groups(root);

    root.find_descendant_mut(&|e: &Element| {
        e.name == IMPLEMENTATION && e.attr("id") == Some(impl_id)
    })
    .ok_or_else(|| lookup_error(0))
}

fn remove_other_implementations(el: &mut Element, keep_id: &str) {
    el.retain_elements(|child| {
        let other = child.name == IMPLEMENTATION && child.attr("id") != Some(keep_id);
        if other {
            debug!(
                "removing implementation with id: {}",
                child.attr("id").unwrap_or("")
            );
        }
        !other
    });
    for child in el.child_elements_mut() {
        remove_other_implementations(child, keep_id);
    }
}

fn prune_empty_groups(el: &mut Element) {
    for child in el.child_elements_mut() {
        prune_empty_groups(child);
    }
    el.retain_elements(|child| {
        let empty = child.name == GROUP && !child.has_descendant(IMPLEMENTATION);
        if empty {
            debug!("removing empty group");
        }
        !empty
    });
}

/// Strip top-level metadata and keep only the command named `command_name`,
/// renamed to [`CANONICAL_COMMAND`].
pub fn clean_feed(feed: &mut Feed, command_name: &str) {
    let root = feed.root_mut();
    root.retain_elements(|child| {
        let keep = TOP_LEVEL_KEEP.contains(&child.name.as_str());
        if !keep {
            debug!("Cleanup: remove {}", child.name);
        }
        keep
    });
    select_command(root, command_name);
}

fn select_command(el: &mut Element, command_name: &str) {
    el.retain_elements(|child| {
        let unwanted = child.name == COMMAND && child.attr("name") != Some(command_name);
        if unwanted {
            debug!(
                "removing command {}",
                child.attr("name").unwrap_or("(unnamed)")
            );
        }
        !unwanted
    });
    for child in el.child_elements_mut() {
        if child.name == COMMAND {
            child.set_attr("name", CANONICAL_COMMAND);
        }
        select_command(child, command_name);
    }
}

/// The id to look for in a feed, given the id reported by the resolver.
///
/// For a feed loaded straight from a local path, the resolver reports
/// absolute ids while the feed itself stores them relative to its own
/// directory.
pub fn resolve_implementation_id(selected_id: &str, feed_url: &str, feed_path: &Path) -> String {
    let id_path = Path::new(selected_id);
    if Path::new(feed_url) == feed_path && feed_path.is_absolute() && id_path.is_absolute() {
        let base = feed_path.parent().unwrap_or(Path::new("/"));
        let relative = relative_path(id_path, base);
        debug!(
            "implementation id {selected_id} is {} relative to the feed",
            relative.display()
        );
        return relative.to_string_lossy().into_owned();
    }
    selected_id.to_string()
}
