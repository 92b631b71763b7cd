//! Inbound Ports (Driving Ports / API)

use crate::domain::document::DocumentInput;
use crate::domain::errors::ValidationError;
use crate::domain::report::{DocumentReport, SignatureReport};
use dsv_01_evidence::SignatureInput;

/// Primary signature validation API
pub trait SignatureValidationApi: Send + Sync {
    /// Validate one signature.
    ///
    /// This is the main entry point. It:
    /// 1. Reconciles the signature's evidence
    /// 2. Identifies the signing certificate and builds its chain
    /// 3. Validates attached timestamps
    /// 4. Runs ISC, VCI, XCV, CV and SAV
    /// 5. Returns the concluded report
    fn validate_signature(&self, input: &SignatureInput) -> Result<SignatureReport, ValidationError>;

    /// Validate every signature of a document, in parallel.
    fn validate_document(&self, document: &DocumentInput) -> Result<DocumentReport, ValidationError>;

    /// Validate independent documents in parallel.
    fn validate_batch(&self, documents: &[DocumentInput]) -> Vec<Result<DocumentReport, ValidationError>>;
}
