//! Error types for evidence reconciliation

use shared_types::ContractError;
use thiserror::Error;

/// Errors raised while reconciling the evidence of a signature.
///
/// Unresolved references are not errors: they become orphans.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EvidenceError {
    /// The adapter violated the input contract.
    #[error(transparent)]
    Contract(#[from] ContractError),

    /// Raw token entries exceed the configured bound.
    #[error("Too many tokens: {count} > {max}")]
    TooManyTokens { count: usize, max: usize },

    /// Declared references exceed the configured bound.
    #[error("Too many references: {count} > {max}")]
    TooManyReferences { count: usize, max: usize },

    /// More timestamps than the configured bound.
    #[error("Too many timestamps: {count} > {max}")]
    TooManyTimestamps { count: usize, max: usize },
}

impl EvidenceError {
    /// The equivalent contract error, for callers that only surface those.
    pub fn into_contract(self) -> ContractError {
        match self {
            EvidenceError::Contract(err) => err,
            EvidenceError::TooManyTokens { count, max } => ContractError::LimitExceeded {
                what: "tokens",
                count,
                max,
            },
            EvidenceError::TooManyReferences { count, max } => ContractError::LimitExceeded {
                what: "references",
                count,
                max,
            },
            EvidenceError::TooManyTimestamps { count, max } => ContractError::LimitExceeded {
                what: "timestamps",
                count,
                max,
            },
        }
    }
}
