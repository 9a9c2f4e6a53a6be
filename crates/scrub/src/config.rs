// ABOUTME: Rule-set configuration for the cleaner, passed explicitly into every pass.
// ABOUTME: Defaults carry the tag, attribute, and marker lists for captured corporate pages.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Rule sets driving the cleaning passes.
///
/// All rule sets are plain data so callers can serialize, edit, and reload
/// them. The defaults target captured corporate pages built on Bootstrap and
/// FontAwesome with the usual analytics payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanConfig {
    /// Tags that root a navigation region by themselves.
    pub nav_tags: HashSet<String>,

    /// Tokens that mark an element as navigation when they appear in its
    /// `class` or `id` value. Matched as case-insensitive substrings.
    pub nav_markers: Vec<String>,

    /// Tags whose entire subtree is always removed.
    pub remove_tags: HashSet<String>,

    /// Attribute names removed from elements outside navigation and svg.
    pub strip_attrs: HashSet<String>,

    /// Tokens identifying tracking scripts when found in a script's `src`,
    /// `id`, or `class`. Matched as case-insensitive substrings.
    pub tracker_markers: Vec<String>,

    /// Substrings identifying inline tracking code in script text.
    pub inline_tracker_markers: Vec<String>,

    /// Tags injected by browser extensions, removed wholesale.
    pub extension_tags: HashSet<String>,

    /// Class substrings identifying browser-extension residue.
    pub extension_class_markers: Vec<String>,

    /// `rel` tokens on `<link>` elements that mark the link for removal.
    pub drop_link_rels: HashSet<String>,

    /// Element ids of cookie/consent widgets.
    pub cookie_ids: HashSet<String>,

    /// Class tokens (exact match) of cookie/consent banners.
    pub cookie_classes: HashSet<String>,

    /// Hidden elements with fewer non-whitespace characters than this are
    /// treated as decoration and removed.
    pub hidden_text_threshold: usize,
}

fn string_set(items: &[&str]) -> HashSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn string_vec(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self {
            nav_tags: string_set(&["nav", "header"]),
            nav_markers: string_vec(&[
                "nav",
                "navigation",
                "menu",
                "navbar",
                "sl-nav",
                "offcanvas",
            ]),
            remove_tags: string_set(&["style", "iframe", "noscript", "footer"]),
            strip_attrs: string_set(&[
                "style",
                "data-bs-toggle",
                "data-bs-target",
                "data-bs-dismiss",
                "data-fa-i2svg",
                "data-icon",
                "data-prefix",
                "data-sl-aem-component",
                "data-sl-component",
                "data-cmp-hook-accordion",
                "data-class",
                "data-class-icon",
                "data-parsley-validate",
                "data-parsley-error-message",
                "data-parsley-id",
                "data-parsley-pattern",
                "data-parsley-pattern-message",
                "data-parsley-required",
                "data-parsley-required-message",
                "data-single-expansion",
                "data-title",
                "data-cy",
                "data-grammarly-shadow-root",
            ]),
            tracker_markers: string_vec(&[
                "analytics",
                "gtag",
                "google-analytics",
                "googletagmanager",
                "facebook.net",
                "fbevents",
                "connect.facebook",
                "linkedin.com",
                "li.lms-analytics",
                "reddit",
                "pixel",
                "pinterest",
                "pintrk",
                "utag",
                "tealium",
                "cookielaw",
                "onetrust",
                "decibelinsight",
                "go-mpulse",
                "boomerang",
                "chrome-extension://",
                "coveo",
                "tiq.",
                "tracking",
            ]),
            inline_tracker_markers: string_vec(&[
                "utag_data",
                "fbq(",
                "gtag(",
                "_linkedin_data_partner_ids",
                "BOOMR",
            ]),
            extension_tags: string_set(&[
                "grammarly-desktop-integration",
                "simplify-jobs-page-script",
            ]),
            extension_class_markers: string_vec(&[
                "apolloio",
                "extension-opener",
                "simplify-jobs",
            ]),
            drop_link_rels: string_set(&["preload", "prefetch", "canonical", "alternate"]),
            cookie_ids: string_set(&[
                "onetrust-consent-sdk",
                "onetrust-banner-sdk",
                "onetrust-pc-sdk",
            ]),
            cookie_classes: string_set(&["cookie", "banner"]),
            hidden_text_threshold: 10,
        }
    }
}
