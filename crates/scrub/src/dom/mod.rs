// ABOUTME: The cleaning pipeline: parse, classify navigation, mark removals, serialize.
// ABOUTME: Exposes clean_document and the Cleaned result with size/removal counters.

//! Navigation-aware selective DOM pruning.
//!
//! The pipeline never mutates the parsed tree. Mark passes compute a skip
//! set of node ids against the unmutated tree, so every ancestor walk sees
//! pre-deletion structure; a final serialization pass emits the document,
//! omitting skipped subtrees and stripping attributes outside navigation
//! regions and svg subtrees.

mod prune;
mod serialize;

use scraper::Html;
use serde::{Deserialize, Serialize};

use crate::config::CleanConfig;
use crate::nav;

/// The outcome of cleaning one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cleaned {
    /// The cleaned document, serialized back to markup.
    pub html: String,
    /// Size of the input text in bytes.
    pub input_bytes: usize,
    /// Size of the cleaned output in bytes.
    pub output_bytes: usize,
    /// Number of subtrees dropped from the output.
    pub removed_elements: usize,
    /// Number of attributes stripped from surviving elements.
    pub stripped_attributes: usize,
}

impl Cleaned {
    /// Bytes saved by cleaning.
    pub fn reduction(&self) -> usize {
        self.input_bytes.saturating_sub(self.output_bytes)
    }

    /// Percentage of the input removed by cleaning.
    pub fn reduction_percent(&self) -> f64 {
        if self.input_bytes == 0 {
            return 0.0;
        }
        self.reduction() as f64 / self.input_bytes as f64 * 100.0
    }
}

/// Cleans one HTML document according to `config`.
///
/// Deterministic and single-pass-equivalent: the output tree is a strict
/// subset of the input tree's nodes modulo attribute removal, and nothing is
/// ever added. Safe to call concurrently on independent documents.
pub fn clean_document(html: &str, config: &CleanConfig) -> Cleaned {
    let document = Html::parse_document(html);
    let nav_ids = nav::nav_region_ids(&document, config);
    let skip = prune::build_skip_set(&document, &nav_ids, config);

    let mut stats = serialize::SerializeStats::default();
    let output = serialize::serialize_document(&document, &skip, &nav_ids, config, &mut stats);

    Cleaned {
        input_bytes: html.len(),
        output_bytes: output.len(),
        html: output,
        removed_elements: stats.removed_elements,
        stripped_attributes: stats.stripped_attributes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_attributes_outside_navigation() {
        let cleaned = clean_document(
            r#"<div style="color:red" data-bs-toggle="x">hi</div>"#,
            &CleanConfig::default(),
        );
        assert!(cleaned.html.contains("<div>hi</div>"));
        assert_eq!(cleaned.stripped_attributes, 2);
    }

    #[test]
    fn preserves_attributes_inside_navigation() {
        let html = r#"<nav><button style="width:1em" data-bs-toggle="x">menu</button></nav>"#;
        let cleaned = clean_document(html, &CleanConfig::default());
        assert!(cleaned.html.contains(r#"style="width:1em""#));
        assert!(cleaned.html.contains(r#"data-bs-toggle="x""#));
        assert_eq!(cleaned.stripped_attributes, 0);
    }

    #[test]
    fn removes_always_remove_tags() {
        let html = "<body><style>.a{}</style><footer>legal</footer><p>keep</p></body>";
        let cleaned = clean_document(html, &CleanConfig::default());
        assert!(!cleaned.html.contains("<style>"));
        assert!(!cleaned.html.contains("<footer>"));
        assert!(!cleaned.html.contains("legal"));
        assert!(cleaned.html.contains("<p>keep</p>"));
        assert_eq!(cleaned.removed_elements, 2);
    }

    #[test]
    fn svg_subtree_is_untouched() {
        let html = r##"<div><svg fill="#fff" style="color:red"><path d="M1 1" style="x"/></svg></div>"##;
        let cleaned = clean_document(html, &CleanConfig::default());
        assert!(cleaned.html.contains(r##"fill="#fff""##));
        assert!(cleaned.html.contains(r#"style="color:red""#));
        assert!(cleaned.html.contains(r#"d="M1 1""#));
    }

    #[test]
    fn counters_track_sizes() {
        let html = r#"<html><head></head><body><div style="margin:0;padding:0;border:0">hi</div><footer>long legal boilerplate</footer></body></html>"#;
        let cleaned = clean_document(html, &CleanConfig::default());
        assert_eq!(cleaned.input_bytes, html.len());
        assert_eq!(cleaned.output_bytes, cleaned.html.len());
        assert!(cleaned.reduction() > 0);
        assert!(cleaned.reduction_percent() > 0.0);
    }

    #[test]
    fn empty_input_reduces_to_shell() {
        let cleaned = clean_document("", &CleanConfig::default());
        assert_eq!(cleaned.removed_elements, 0);
        assert_eq!(cleaned.reduction_percent(), 0.0);
    }
}
