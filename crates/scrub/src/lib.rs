// ABOUTME: Main library entry point for the pagescrub HTML cleaner.
// ABOUTME: Re-exports the public API: clean_document, CleanConfig, Cleaned, CleanError, StyleReport.

//! Pagescrub - cleans captured web pages while preserving their navigation.
//!
//! The cleaner strips tracking scripts and non-essential markup from one
//! HTML document in a single logical pass. Elements inside a navigation
//! region (a `nav`/`header` ancestor, or an ancestor whose class or id
//! carries a navigation marker token) keep every attribute; svg subtrees are
//! emitted verbatim; everything else loses inline styles and framework
//! toggle attributes, and tracking scripts disappear entirely.
//!
//! # Example
//!
//! ```
//! use pagescrub::{clean_document, CleanConfig};
//!
//! let config = CleanConfig::default();
//! let cleaned = clean_document(r#"<div style="color:red">hi</div>"#, &config);
//! assert!(cleaned.html.contains("<div>hi</div>"));
//! ```

pub mod config;
pub mod dom;
pub mod error;
pub mod nav;
pub mod styles;

use std::fs;
use std::path::Path;

pub use crate::config::CleanConfig;
pub use crate::dom::{clean_document, Cleaned};
pub use crate::error::CleanError;
pub use crate::nav::is_in_navigation;
pub use crate::styles::{analyze_styles, StyleCount, StyleReport};

/// Cleans a document supplied as raw bytes.
///
/// Input that is not valid UTF-8 text cannot be parsed and surfaces as
/// [`CleanError::Parse`].
pub fn clean_bytes(bytes: &[u8], config: &CleanConfig) -> Result<Cleaned, CleanError> {
    let html = std::str::from_utf8(bytes).map_err(CleanError::parse)?;
    Ok(clean_document(html, config))
}

/// Reads and cleans one HTML file.
pub fn clean_file(path: impl AsRef<Path>, config: &CleanConfig) -> Result<Cleaned, CleanError> {
    let bytes = fs::read(path)?;
    clean_bytes(&bytes, config)
}

/// Reads one HTML file and inventories its styles.
pub fn analyze_file(path: impl AsRef<Path>) -> Result<StyleReport, CleanError> {
    let bytes = fs::read(path)?;
    let html = std::str::from_utf8(&bytes).map_err(CleanError::parse)?;
    Ok(analyze_styles(html))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_bytes_rejects_invalid_utf8() {
        let err = clean_bytes(&[0x3c, 0x64, 0xff, 0xfe], &CleanConfig::default()).unwrap_err();
        assert!(matches!(err, CleanError::Parse(_)));
    }

    #[test]
    fn clean_file_surfaces_io_errors() {
        let err = clean_file("/nonexistent/input.html", &CleanConfig::default()).unwrap_err();
        assert!(matches!(err, CleanError::Io(_)));
    }

    #[test]
    fn analyze_file_surfaces_io_errors() {
        let err = analyze_file("/nonexistent/input.html").unwrap_err();
        assert!(matches!(err, CleanError::Io(_)));
    }
}
