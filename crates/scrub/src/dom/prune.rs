// ABOUTME: Mark passes that build the skip set of subtrees to drop from the output.
// ABOUTME: Covers always-remove tags, tracking scripts, chrome residue, and empty containers.

use aho_corasick::AhoCorasick;
use ego_tree::{NodeId, NodeRef};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};
use std::collections::HashSet;

use crate::config::CleanConfig;
use crate::nav;

static DISPLAY_NONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)display\s*:\s*none").unwrap());

// Tags that make a div/span worth keeping even without text.
const KEEP_CONTENT_TAGS: &[&str] = &["img", "a", "h1", "h2", "h3", "h4", "h5", "h6", "svg"];

/// True when the element is an svg or sits inside one. Svg subtrees are
/// exempt from every removal rule.
fn in_svg_subtree(element: &ElementRef) -> bool {
    if element.value().name().eq_ignore_ascii_case("svg") {
        return true;
    }
    element.ancestors().any(|node| {
        ElementRef::wrap(node).is_some_and(|el| el.value().name().eq_ignore_ascii_case("svg"))
    })
}

/// Non-whitespace character count of the element's text content.
fn text_weight(element: &ElementRef) -> usize {
    element
        .text()
        .map(|t| t.chars().filter(|c| !c.is_whitespace()).count())
        .sum()
}

/// Builds the full skip set for one document.
///
/// Every pass reads the unmutated tree; later passes see the marks of
/// earlier ones only through the accumulating set, so classification is
/// never affected by deletions. The empty-container pass must run last
/// because it counts only surviving content.
pub(super) fn build_skip_set(
    document: &Html,
    nav_ids: &HashSet<NodeId>,
    config: &CleanConfig,
) -> HashSet<NodeId> {
    let mut skip = HashSet::new();

    mark_removed_tags(document, config, &mut skip);
    mark_tracking_scripts(document, config, &mut skip);
    mark_bare_headers(document, config, &mut skip);
    mark_extension_residue(document, config, &mut skip);
    mark_head_links(document, config, &mut skip);
    mark_metas(document, &mut skip);
    mark_cookie_banners(document, config, &mut skip);
    mark_hidden_decoration(document, nav_ids, config, &mut skip);
    mark_empty_containers(document, nav_ids, &mut skip);

    skip
}

/// Always-remove tags: the entire subtree is dropped regardless of location.
fn mark_removed_tags(document: &Html, config: &CleanConfig, skip: &mut HashSet<NodeId>) {
    let sel = Selector::parse("*").unwrap();
    for el in document.select(&sel) {
        if config.remove_tags.contains(el.value().name()) && !in_svg_subtree(&el) {
            skip.insert(el.id());
        }
    }
}

/// Case-insensitive multi-token matcher for the tracker markers. Automaton
/// construction can only fail past aho-corasick's pattern-size limits; rule
/// sets that large still get matched, one substring scan per marker.
enum TrackerMatcher {
    Automaton(AhoCorasick),
    Scan(Vec<String>),
}

impl TrackerMatcher {
    fn new(markers: &[String]) -> Self {
        AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(markers)
            .map(TrackerMatcher::Automaton)
            .unwrap_or_else(|_| {
                TrackerMatcher::Scan(
                    markers.iter().map(|m| m.to_ascii_lowercase()).collect(),
                )
            })
    }

    fn is_match(&self, haystack: &str) -> bool {
        match self {
            TrackerMatcher::Automaton(ac) => ac.is_match(haystack),
            TrackerMatcher::Scan(markers) => {
                let haystack = haystack.to_ascii_lowercase();
                markers.iter().any(|m| haystack.contains(m.as_str()))
            }
        }
    }
}

/// Tracking scripts: matched by src/id/class marker, ld+json type, or inline
/// tracking code in the script body. Non-tracking scripts survive.
fn mark_tracking_scripts(document: &Html, config: &CleanConfig, skip: &mut HashSet<NodeId>) {
    let trackers = TrackerMatcher::new(&config.tracker_markers);

    let sel = Selector::parse("script").unwrap();
    for el in document.select(&sel) {
        let value = el.value();
        let attr_hit = [value.attr("src"), value.attr("id"), value.attr("class")]
            .into_iter()
            .flatten()
            .any(|haystack| trackers.is_match(haystack));
        let ld_json = value
            .attr("type")
            .is_some_and(|t| t.eq_ignore_ascii_case("application/ld+json"));

        if attr_hit || ld_json {
            skip.insert(el.id());
            continue;
        }

        let text: String = el.text().collect();
        if config
            .inline_tracker_markers
            .iter()
            .any(|marker| text.contains(marker.as_str()))
        {
            skip.insert(el.id());
        }
    }
}

/// Headers that carry no navigation are dropped; headers containing a <nav>
/// or carrying a navigation marker on their own class/id stay whole.
fn mark_bare_headers(document: &Html, config: &CleanConfig, skip: &mut HashSet<NodeId>) {
    let header_sel = Selector::parse("header").unwrap();
    let nav_sel = Selector::parse("nav").unwrap();
    for el in document.select(&header_sel) {
        let has_nav = el.select(&nav_sel).next().is_some();
        if !has_nav && !nav::has_nav_marker_attrs(&el, config) {
            skip.insert(el.id());
        }
    }
}

/// Residue injected by browser extensions into the captured page.
fn mark_extension_residue(document: &Html, config: &CleanConfig, skip: &mut HashSet<NodeId>) {
    let sel = Selector::parse("*").unwrap();
    for el in document.select(&sel) {
        if config.extension_tags.contains(el.value().name()) {
            skip.insert(el.id());
            continue;
        }
        if let Some(class) = el.value().attr("class") {
            if config
                .extension_class_markers
                .iter()
                .any(|marker| class.contains(marker.as_str()))
            {
                skip.insert(el.id());
            }
        }
    }
}

/// Performance-hint and SEO links (preload, prefetch, canonical, alternate).
/// Stylesheet links are untouched.
fn mark_head_links(document: &Html, config: &CleanConfig, skip: &mut HashSet<NodeId>) {
    let sel = Selector::parse("link").unwrap();
    for el in document.select(&sel) {
        let dropped = el.value().attr("rel").is_some_and(|rel| {
            rel.split_ascii_whitespace()
                .any(|token| config.drop_link_rels.contains(&token.to_ascii_lowercase()))
        });
        if dropped {
            skip.insert(el.id());
        }
    }
}

/// Meta tags other than charset and viewport carry SEO/social payload only.
fn mark_metas(document: &Html, skip: &mut HashSet<NodeId>) {
    let sel = Selector::parse("meta").unwrap();
    for el in document.select(&sel) {
        let value = el.value();
        let keep = value.attr("charset").is_some()
            || value
                .attr("name")
                .is_some_and(|n| n.eq_ignore_ascii_case("viewport") || n.eq_ignore_ascii_case("charset"));
        if !keep {
            skip.insert(el.id());
        }
    }
}

/// Cookie/consent widgets by known id or by exact class token.
fn mark_cookie_banners(document: &Html, config: &CleanConfig, skip: &mut HashSet<NodeId>) {
    let sel = Selector::parse("*").unwrap();
    for el in document.select(&sel) {
        let value = el.value();
        let by_id = value
            .attr("id")
            .is_some_and(|id| config.cookie_ids.contains(id));
        let by_class = value
            .classes()
            .any(|class| config.cookie_classes.contains(class));
        if by_id || by_class {
            skip.insert(el.id());
        }
    }
}

/// Hidden decoration: aria-hidden or display:none elements with next to no
/// text. Svg icons and navigation regions are exempt so hamburger menus and
/// dropdown panels survive.
fn mark_hidden_decoration(
    document: &Html,
    nav_ids: &HashSet<NodeId>,
    config: &CleanConfig,
    skip: &mut HashSet<NodeId>,
) {
    let aria_sel = Selector::parse(r#"[aria-hidden="true"]"#).unwrap();
    for el in document.select(&aria_sel) {
        if in_svg_subtree(&el) || nav_ids.contains(&el.id()) {
            continue;
        }
        if text_weight(&el) < config.hidden_text_threshold {
            skip.insert(el.id());
        }
    }

    let style_sel = Selector::parse("[style]").unwrap();
    for el in document.select(&style_sel) {
        if in_svg_subtree(&el) || nav_ids.contains(&el.id()) {
            continue;
        }
        let style = el.value().attr("style").unwrap_or("");
        if DISPLAY_NONE_RE.is_match(style) && text_weight(&el) < config.hidden_text_threshold {
            skip.insert(el.id());
        }
    }
}

/// Text and kept-tag content of a subtree, ignoring already-marked branches.
fn surviving_content(node: NodeRef<'_, Node>, skip: &HashSet<NodeId>) -> (usize, bool) {
    let mut text = 0;
    let mut has_kept_tag = false;
    for child in node.children() {
        if skip.contains(&child.id()) {
            continue;
        }
        match child.value() {
            Node::Text(t) => {
                text += t.chars().filter(|c| !c.is_whitespace()).count();
            }
            Node::Element(el) => {
                if KEEP_CONTENT_TAGS.contains(&el.name()) {
                    has_kept_tag = true;
                }
                let (child_text, child_kept) = surviving_content(child, skip);
                text += child_text;
                has_kept_tag |= child_kept;
            }
            _ => {}
        }
    }
    (text, has_kept_tag)
}

/// Divs and spans outside navigation with no surviving text and no surviving
/// image/link/heading/svg content are dropped. Runs after every other pass so
/// content inside already-marked subtrees does not keep its container alive.
fn mark_empty_containers(
    document: &Html,
    nav_ids: &HashSet<NodeId>,
    skip: &mut HashSet<NodeId>,
) {
    let sel = Selector::parse("div, span").unwrap();
    let svg_sel = Selector::parse("svg").unwrap();
    for el in document.select(&sel) {
        if skip.contains(&el.id()) || nav_ids.contains(&el.id()) || in_svg_subtree(&el) {
            continue;
        }
        if el.select(&svg_sel).next().is_some() {
            continue;
        }
        let (text, has_kept_tag) = surviving_content(*el, skip);
        if text == 0 && !has_kept_tag {
            skip.insert(el.id());
        }
    }
}
