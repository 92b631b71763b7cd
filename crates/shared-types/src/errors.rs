//! # Error Types
//!
//! Contract violations: the caller handed the validation core input it must
//! never receive. These always surface to the immediate caller and are never
//! folded into an `INDETERMINATE` verdict.

use thiserror::Error;

/// Malformed or missing required input from a collaborator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContractError {
    /// A required field was absent.
    #[error("Missing required input: {0}")]
    MissingInput(&'static str),

    /// An identifier that must be non-empty was empty.
    #[error("Empty identifier for {0}")]
    EmptyIdentifier(&'static str),

    /// Two objects of the same run share an identifier.
    #[error("Duplicate identifier: {0}")]
    DuplicateIdentifier(String),

    /// Input size exceeds the configured processing bound.
    #[error("Input limit exceeded for {what}: {count} > {max}")]
    LimitExceeded {
        what: &'static str,
        count: usize,
        max: usize,
    },

    /// A token encoding was empty, so no identity can be derived.
    #[error("Empty encoding for {0} token")]
    EmptyEncoding(&'static str),
}
