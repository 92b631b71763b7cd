//! Error types for the validation process
//!
//! Evidence gaps and failed constraints are never errors: they conclude as
//! an indication in the report. Only caller mistakes surface here.

use dsv_01_evidence::EvidenceError;
use dsv_02_constraints::PolicyError;
use shared_types::ContractError;
use thiserror::Error;

/// Validation errors
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Malformed input handed over by a format adapter.
    #[error(transparent)]
    Contract(#[from] ContractError),

    /// Input exceeds reconciliation bounds.
    #[error(transparent)]
    Evidence(#[from] EvidenceError),

    /// Policy could not be loaded.
    #[error(transparent)]
    Policy(#[from] PolicyError),

    /// A document with nothing to validate.
    #[error("Document '{0}' contains no signature")]
    EmptyDocument(String),

    /// Two signatures of one document share an id.
    #[error("Document '{document}' has duplicate signature id '{signature}'")]
    DuplicateSignature { document: String, signature: String },
}
