// ABOUTME: Error types for HTML cleaning operations.
// ABOUTME: Provides CleanError enum with Parse and Io variants.

use std::fmt;
use thiserror::Error;

/// Errors that can occur while cleaning or analyzing a document.
#[derive(Debug, Error)]
pub enum CleanError {
    /// The input is not text the parser can build a tree from.
    #[error("failed to parse document: {0}")]
    Parse(String),

    /// The input could not be read or the output could not be written.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl CleanError {
    /// Creates a Parse error from an underlying error.
    pub fn parse(err: impl fmt::Display) -> Self {
        CleanError::Parse(err.to_string())
    }
}
