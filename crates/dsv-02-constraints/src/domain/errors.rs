//! Error types for the constraint engine

use thiserror::Error;

/// Failures loading or compiling a validation policy.
///
/// A failed check is never an error: it is a `CheckResult` with
/// `passed == false`.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// Policy document could not be read.
    #[error("Failed to read policy {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Policy document is not valid JSON for the policy model.
    #[error("Invalid policy document: {0}")]
    Parse(#[from] serde_json::Error),

    /// A constraint pattern is not a valid regular expression.
    #[error("Invalid pattern '{pattern}' in {constraint}: {reason}")]
    InvalidPattern {
        constraint: String,
        pattern: String,
        reason: String,
    },
}
