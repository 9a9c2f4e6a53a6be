// ABOUTME: Serializes the parsed tree back to markup, honoring the skip set.
// ABOUTME: Strips attributes outside navigation/svg and counts removals along the way.

use ego_tree::{NodeId, NodeRef};
use scraper::{Html, Node};
use std::collections::HashSet;

use crate::config::CleanConfig;

// Elements whose text children are emitted raw; everywhere else text is
// re-escaped so parsed entities cannot re-enter the output as live markup.
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script",
    "style",
    "xmp",
    "iframe",
    "noembed",
    "noframes",
    "plaintext",
];

#[derive(Debug, Default)]
pub(super) struct SerializeStats {
    pub removed_elements: usize,
    pub stripped_attributes: usize,
}

/// Serializes the document, omitting skipped subtrees. Elements inside
/// navigation regions or svg subtrees keep every attribute; everything else
/// loses the strip-set attributes.
pub(super) fn serialize_document(
    document: &Html,
    skip: &HashSet<NodeId>,
    nav_ids: &HashSet<NodeId>,
    config: &CleanConfig,
    stats: &mut SerializeStats,
) -> String {
    let mut out = String::new();
    for child in document.tree.root().children() {
        serialize_node(child, skip, nav_ids, config, false, false, &mut out, stats);
    }
    out
}

#[allow(clippy::too_many_arguments)]
fn serialize_node(
    node: NodeRef<'_, Node>,
    skip: &HashSet<NodeId>,
    nav_ids: &HashSet<NodeId>,
    config: &CleanConfig,
    verbatim: bool,
    raw_text: bool,
    out: &mut String,
    stats: &mut SerializeStats,
) {
    if !verbatim && skip.contains(&node.id()) {
        if matches!(node.value(), Node::Element(_)) {
            stats.removed_elements += 1;
        }
        return;
    }

    match node.value() {
        Node::Doctype(doctype) => {
            out.push_str("<!DOCTYPE ");
            out.push_str(doctype.name());
            let public_id = doctype.public_id();
            let system_id = doctype.system_id();
            if !public_id.is_empty() {
                out.push_str(" PUBLIC \"");
                out.push_str(public_id);
                out.push('"');
                if !system_id.is_empty() {
                    out.push_str(" \"");
                    out.push_str(system_id);
                    out.push('"');
                }
            } else if !system_id.is_empty() {
                out.push_str(" SYSTEM \"");
                out.push_str(system_id);
                out.push('"');
            }
            out.push('>');
        }
        Node::Text(text) => {
            if raw_text {
                out.push_str(text);
            } else {
                out.push_str(&escape_text(text));
            }
        }
        Node::Comment(comment) => {
            out.push_str("<!--");
            out.push_str(comment);
            out.push_str("-->");
        }
        Node::Element(el) => {
            let name = el.name();
            // Once inside an svg subtree everything is emitted verbatim.
            let verbatim = verbatim || name.eq_ignore_ascii_case("svg");
            let raw_text = RAW_TEXT_ELEMENTS
                .iter()
                .any(|tag| name.eq_ignore_ascii_case(tag));
            let keep_all_attrs = verbatim || nav_ids.contains(&node.id());

            out.push('<');
            out.push_str(name);
            for (key, value) in el.attrs() {
                if !keep_all_attrs && config.strip_attrs.contains(key) {
                    stats.stripped_attributes += 1;
                    continue;
                }
                out.push(' ');
                out.push_str(key);
                out.push_str("=\"");
                out.push_str(&escape_attr(value));
                out.push('"');
            }

            if is_void_element(name) || (verbatim && node.children().next().is_none()) {
                out.push_str(" />");
                return;
            }

            out.push('>');
            for child in node.children() {
                serialize_node(child, skip, nav_ids, config, verbatim, raw_text, out, stats);
            }
            out.push_str("</");
            out.push_str(name);
            out.push('>');
        }
        Node::Document | Node::Fragment => {
            for child in node.children() {
                serialize_node(child, skip, nav_ids, config, verbatim, raw_text, out, stats);
            }
        }
        _ => {}
    }
}

/// Escape attribute value.
fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape a text node.
fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Check if tag is a void element.
fn is_void_element(tag: &str) -> bool {
    matches!(
        tag.to_lowercase().as_str(),
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn serialize_plain(html: &str) -> String {
        let config = CleanConfig::default();
        let document = Html::parse_document(html);
        let nav_ids = crate::nav::nav_region_ids(&document, &config);
        let mut stats = SerializeStats::default();
        serialize_document(
            &document,
            &HashSet::new(),
            &nav_ids,
            &config,
            &mut stats,
        )
    }

    #[test]
    fn preserves_doctype_and_comments() {
        let out = serialize_plain("<!DOCTYPE html><html><body><!-- note --><p>x</p></body></html>");
        assert!(out.starts_with("<!DOCTYPE html>"));
        assert!(out.contains("<!-- note -->"));
    }

    #[test]
    fn void_elements_self_close() {
        let out = serialize_plain(r#"<body><img src="a.png"><br></body>"#);
        assert!(out.contains(r#"<img src="a.png" />"#));
        assert!(out.contains("<br />"));
    }

    #[test]
    fn escapes_attribute_values() {
        let out = serialize_plain(r#"<nav><a href="/?a=1&amp;b=2" title="&quot;x&quot;">x</a></nav>"#);
        assert!(out.contains(r#"href="/?a=1&amp;b=2""#));
        assert!(out.contains(r#"title="&quot;x&quot;""#));
    }

    #[test]
    fn skipped_subtree_counts_once() {
        let config = CleanConfig::default();
        let document = Html::parse_document("<body><div id='x'><p>a</p><p>b</p></div></body>");
        let sel = scraper::Selector::parse("#x").unwrap();
        let skip: HashSet<NodeId> = document.select(&sel).map(|el| el.id()).collect();
        let mut stats = SerializeStats::default();
        let out = serialize_document(&document, &skip, &HashSet::new(), &config, &mut stats);
        assert!(!out.contains("<p>"));
        assert_eq!(stats.removed_elements, 1);
    }

    #[test]
    fn attributes_keep_document_order() {
        let out = serialize_plain(r#"<body><div id="z" class="a" data-x="1">x</div></body>"#);
        assert!(out.contains(r#"<div id="z" class="a" data-x="1">x</div>"#));
    }

    #[test]
    fn legacy_doctype_keeps_identifiers() {
        let out = serialize_plain(
            r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Strict//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd"><html><body></body></html>"#,
        );
        assert!(out.starts_with(
            r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Strict//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd">"#
        ));
    }

    #[test]
    fn text_entities_stay_escaped() {
        let out = serialize_plain("<p>a &lt;b&gt; &amp; c</p>");
        assert!(out.contains("<p>a &lt;b&gt; &amp; c</p>"));
    }

    #[test]
    fn script_text_is_emitted_raw() {
        let out = serialize_plain("<body><script>if (a < b && c > d) step();</script></body>");
        assert!(out.contains("<script>if (a < b && c > d) step();</script>"));
    }

    #[test]
    fn strip_counter_tracks_attributes() {
        let config = CleanConfig::default();
        let document =
            Html::parse_document(r#"<body><div style="a" data-cy="b" class="keep">x</div></body>"#);
        let mut stats = SerializeStats::default();
        let out = serialize_document(
            &document,
            &HashSet::new(),
            &HashSet::new(),
            &config,
            &mut stats,
        );
        assert!(out.contains(r#"<div class="keep">x</div>"#));
        assert_eq!(stats.stripped_attributes, 2);
    }
}
