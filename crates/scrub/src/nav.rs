// ABOUTME: Navigation classification over the ancestor chain of a DOM element.
// ABOUTME: Provides the pure is_in_navigation predicate and the cached nav_region_ids pass.

use ego_tree::NodeId;
use scraper::{ElementRef, Html};
use std::collections::HashSet;

use crate::config::CleanConfig;

/// Checks whether an element's `class` or `id` value carries a navigation
/// marker token. Matching is case-insensitive substring, one rule for both
/// attributes.
pub(crate) fn has_nav_marker_attrs(element: &ElementRef, config: &CleanConfig) -> bool {
    for attr in ["class", "id"] {
        if let Some(value) = element.value().attr(attr) {
            let value = value.to_ascii_lowercase();
            if config
                .nav_markers
                .iter()
                .any(|marker| value.contains(&marker.to_ascii_lowercase()))
            {
                return true;
            }
        }
    }
    false
}

/// Checks whether an element roots a navigation region, either by tag or by
/// a marker token on its own class/id.
fn is_nav_root(element: &ElementRef, config: &CleanConfig) -> bool {
    config.nav_tags.contains(element.value().name()) || has_nav_marker_attrs(element, config)
}

/// Returns true if `element` lies inside a navigation region.
///
/// Walks the ancestor chain including the element itself and returns true on
/// the first ancestor-or-self that roots a navigation region. Pure function
/// of the tree at call time; no side effects.
pub fn is_in_navigation(element: ElementRef<'_>, config: &CleanConfig) -> bool {
    let mut current = Some(*element);
    while let Some(node) = current {
        if let Some(el) = ElementRef::wrap(node) {
            if is_nav_root(&el, config) {
                return true;
            }
        }
        current = node.parent();
    }
    false
}

/// Precomputes the ids of every element inside a navigation region in one
/// top-down pass. Agrees with [`is_in_navigation`] on every element; the
/// pruner and serializer use this set so classification happens once.
pub(crate) fn nav_region_ids(document: &Html, config: &CleanConfig) -> HashSet<NodeId> {
    let mut ids = HashSet::new();
    for node in document.tree.root().descendants() {
        let Some(el) = ElementRef::wrap(node) else {
            continue;
        };
        let parent_in_nav = node
            .parent()
            .map(|parent| ids.contains(&parent.id()))
            .unwrap_or(false);
        if parent_in_nav || is_nav_root(&el, config) {
            ids.insert(node.id());
        }
    }
    ids
}
