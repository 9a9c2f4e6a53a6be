// ABOUTME: Style inventory for a captured page: fonts, colors, external stylesheets.
// ABOUTME: Extracts from style tags, inline styles, link tags, and svg fill/stroke attributes.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Write as _;

static HEX_COLOR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"#[0-9a-fA-F]{3,8}\b").unwrap());
static RGB_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)rgba?\([^)]+\)").unwrap());
static HSL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)hsla?\([^)]+\)").unwrap());
static NAMED_COLOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:color|background-color|border-color|fill|stroke)\s*:\s*([a-z]+)\b")
        .unwrap()
});
static FONT_FAMILY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)font-family\s*:\s*([^;]+)").unwrap());

// Keyword values that are not real colors.
const NON_COLORS: &[&str] = &[
    "none",
    "transparent",
    "inherit",
    "initial",
    "unset",
    "currentcolor",
];

// Generic families carry no design information.
const GENERIC_FONTS: &[&str] = &[
    "serif",
    "sans-serif",
    "monospace",
    "cursive",
    "fantasy",
    "system-ui",
];

/// One inventoried value with its occurrence count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleCount {
    pub value: String,
    pub count: usize,
}

/// Fonts, colors, and stylesheet references found in one document,
/// sorted by descending count (ties lexicographic).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StyleReport {
    pub fonts: Vec<StyleCount>,
    pub colors: Vec<StyleCount>,
    pub external_stylesheets: Vec<String>,
}

impl StyleReport {
    /// Renders the report as the plain-text table format.
    pub fn to_text(&self) -> String {
        let bar = "=".repeat(60);
        let rule = "-".repeat(60);
        let mut out = String::new();

        let _ = writeln!(out, "{bar}");
        let _ = writeln!(out, "STYLE ANALYSIS RESULTS");
        let _ = writeln!(out, "{bar}");
        out.push('\n');

        let _ = writeln!(out, "COMMON FONTS:");
        let _ = writeln!(out, "{rule}");
        if self.fonts.is_empty() {
            let _ = writeln!(out, "No fonts found.");
        } else {
            for (i, font) in self.fonts.iter().enumerate() {
                let _ = writeln!(
                    out,
                    "{:2}. {:<40} ({:>3} occurrences)",
                    i + 1,
                    font.value,
                    font.count
                );
            }
        }

        let _ = writeln!(out, "\nCOMMON COLORS:");
        let _ = writeln!(out, "{rule}");
        if self.colors.is_empty() {
            let _ = writeln!(out, "No colors found.");
        } else {
            for (i, color) in self.colors.iter().enumerate() {
                let _ = writeln!(
                    out,
                    "{:2}. {:<40} ({:>3} occurrences)",
                    i + 1,
                    color.value,
                    color.count
                );
            }
        }

        if !self.external_stylesheets.is_empty() {
            let _ = writeln!(out, "\nEXTERNAL STYLESHEETS:");
            let _ = writeln!(out, "{rule}");
            for (i, href) in self.external_stylesheets.iter().enumerate() {
                let _ = writeln!(out, "{:2}. {}", i + 1, href);
            }
        }

        let _ = writeln!(out, "\n{bar}");
        let _ = writeln!(out, "Total unique fonts: {}", self.fonts.len());
        let _ = writeln!(out, "Total unique colors: {}", self.colors.len());
        let _ = writeln!(
            out,
            "Total external stylesheets: {}",
            self.external_stylesheets.len()
        );
        let _ = writeln!(out, "{bar}");
        out
    }
}

/// Pulls color values out of a block of CSS text.
fn colors_from_css(css: &str, out: &mut Vec<String>) {
    for m in HEX_COLOR_RE.find_iter(css) {
        out.push(m.as_str().to_string());
    }
    for m in RGB_RE.find_iter(css) {
        out.push(m.as_str().to_string());
    }
    for m in HSL_RE.find_iter(css) {
        out.push(m.as_str().to_string());
    }
    for caps in NAMED_COLOR_RE.captures_iter(css) {
        let name = &caps[1];
        if !NON_COLORS.contains(&name.to_ascii_lowercase().as_str()) {
            out.push(name.to_string());
        }
    }
}

/// Pulls font-family entries out of a block of CSS text.
fn fonts_from_css(css: &str, out: &mut Vec<String>) {
    for caps in FONT_FAMILY_RE.captures_iter(css) {
        for font in caps[1].split(',') {
            let font = font.trim().trim_matches('"').trim_matches('\'').trim();
            if !font.is_empty() {
                out.push(font.to_string());
            }
        }
    }
}

fn push_paint_attrs(el: &ElementRef, colors: &mut Vec<String>) {
    for attr in ["fill", "stroke"] {
        if let Some(value) = el.value().attr(attr) {
            colors.push(value.to_string());
        }
    }
}

fn counted(values: Vec<String>, excluded: &[&str]) -> Vec<StyleCount> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for value in values {
        if excluded.contains(&value.to_ascii_lowercase().as_str()) {
            continue;
        }
        *counts.entry(value).or_insert(0) += 1;
    }
    let mut out: Vec<StyleCount> = counts
        .into_iter()
        .map(|(value, count)| StyleCount { value, count })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
    out
}

/// Inventories the fonts, colors, and external stylesheets of one document.
pub fn analyze_styles(html: &str) -> StyleReport {
    let document = Html::parse_document(html);

    let mut colors = Vec::new();
    let mut fonts = Vec::new();

    let style_sel = Selector::parse("style").unwrap();
    for el in document.select(&style_sel) {
        let css: String = el.text().collect();
        colors_from_css(&css, &mut colors);
        fonts_from_css(&css, &mut fonts);
    }

    let inline_sel = Selector::parse("[style]").unwrap();
    for el in document.select(&inline_sel) {
        let css = el.value().attr("style").unwrap_or("");
        colors_from_css(css, &mut colors);
        fonts_from_css(css, &mut fonts);
    }

    let mut external_stylesheets = Vec::new();
    let link_sel = Selector::parse(r#"link[rel="stylesheet"]"#).unwrap();
    for el in document.select(&link_sel) {
        if let Some(href) = el.value().attr("href") {
            if !href.is_empty() {
                external_stylesheets.push(href.to_string());
            }
        }
    }

    let svg_sel = Selector::parse("svg").unwrap();
    for svg in document.select(&svg_sel) {
        push_paint_attrs(&svg, &mut colors);
        for node in svg.descendants().skip(1) {
            if let Some(el) = ElementRef::wrap(node) {
                push_paint_attrs(&el, &mut colors);
            }
        }
    }

    StyleReport {
        fonts: counted(fonts, GENERIC_FONTS),
        colors: counted(colors, NON_COLORS),
        external_stylesheets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn collects_colors_from_style_tag_and_inline() {
        let html = r#"<html><head>
            <style>.a { color: #fff; background-color: rgb(0, 0, 0); }</style>
        </head><body>
            <p style="border-color: hsl(10, 20%, 30%); color: red">x</p>
        </body></html>"#;
        let report = analyze_styles(html);
        let values: Vec<&str> = report.colors.iter().map(|c| c.value.as_str()).collect();
        assert!(values.contains(&"#fff"));
        assert!(values.contains(&"rgb(0, 0, 0)"));
        assert!(values.contains(&"hsl(10, 20%, 30%)"));
        assert!(values.contains(&"red"));
    }

    #[test]
    fn keyword_colors_are_dropped() {
        let html = r#"<p style="color: inherit; fill: none; stroke: transparent">x</p>"#;
        let report = analyze_styles(html);
        assert!(report.colors.is_empty());
    }

    #[test]
    fn collects_fonts_and_strips_quotes_and_generics() {
        let html = r#"<style>
            body { font-family: "Open Sans", Arial, sans-serif; }
            h1 { font-family: 'Open Sans'; }
        </style>"#;
        let report = analyze_styles(html);
        assert_eq!(
            report.fonts,
            vec![
                StyleCount {
                    value: "Open Sans".to_string(),
                    count: 2
                },
                StyleCount {
                    value: "Arial".to_string(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn collects_svg_paint_attributes() {
        let html = r##"<svg fill="#112233"><path stroke="#abc" fill="none"/></svg>"##;
        let report = analyze_styles(html);
        let values: Vec<&str> = report.colors.iter().map(|c| c.value.as_str()).collect();
        assert!(values.contains(&"#112233"));
        assert!(values.contains(&"#abc"));
        assert!(!values.contains(&"none"));
    }

    #[test]
    fn collects_stylesheet_links_in_order() {
        let html = r#"<head>
            <link rel="stylesheet" href="a.css">
            <link rel="preload" href="skip.woff2">
            <link rel="stylesheet" href="b.css">
        </head>"#;
        let report = analyze_styles(html);
        assert_eq!(report.external_stylesheets, vec!["a.css", "b.css"]);
    }

    #[test]
    fn sorts_by_count_then_value() {
        let html = r#"<style>
            .a { color: #222; } .b { color: #111; } .c { color: #222; }
        </style>"#;
        let report = analyze_styles(html);
        assert_eq!(report.colors[0].value, "#222");
        assert_eq!(report.colors[0].count, 2);
        assert_eq!(report.colors[1].value, "#111");
    }

    #[test]
    fn text_report_lists_sections() {
        let html = r#"<style>body { color: #333; font-family: Arial; }</style>"#;
        let text = analyze_styles(html).to_text();
        assert!(text.contains("STYLE ANALYSIS RESULTS"));
        assert!(text.contains(" 1. Arial"));
        assert!(text.contains("(  1 occurrences)"));
        assert!(text.contains("Total unique colors: 1"));
    }
}
