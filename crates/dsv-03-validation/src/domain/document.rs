//! Signed document input.

use super::errors::ValidationError;
use dsv_01_evidence::{CertificateSource, RevocationSource, SignatureInput};
use std::collections::HashSet;

/// A document with its signatures and document-level validation data.
///
/// PAdES documents keep certificates and revocation data in document-level
/// dictionaries (DSS, VRI). Those apply to every signature of the document.
#[derive(Clone, Debug, Default)]
pub struct DocumentInput {
    pub document_name: String,
    pub signatures: Vec<SignatureInput>,
    pub document_certificates: CertificateSource,
    pub document_revocations: RevocationSource,
}

impl DocumentInput {
    pub fn new(document_name: impl Into<String>) -> Self {
        Self {
            document_name: document_name.into(),
            ..Default::default()
        }
    }

    pub fn with_signature(mut self, signature: SignatureInput) -> Self {
        self.signatures.push(signature);
        self
    }

    /// Reject documents the engine cannot validate at all.
    pub fn validate_contract(&self) -> Result<(), ValidationError> {
        if self.signatures.is_empty() {
            return Err(ValidationError::EmptyDocument(self.document_name.clone()));
        }
        let mut seen = HashSet::new();
        for signature in &self.signatures {
            if !seen.insert(signature.id.as_str()) {
                return Err(ValidationError::DuplicateSignature {
                    document: self.document_name.clone(),
                    signature: signature.id.clone(),
                });
            }
        }
        Ok(())
    }

    /// Signatures with the document-level data appended to their own sources.
    pub fn signature_inputs(&self) -> Vec<SignatureInput> {
        self.signatures
            .iter()
            .map(|signature| {
                let mut signature = signature.clone();
                for (origin, certificate) in self.document_certificates.entries() {
                    signature.certificate_source.add_certificate(*origin, certificate.clone());
                }
                for reference in self.document_certificates.references() {
                    signature.certificate_source.add_reference(reference.clone());
                }
                for (origin, revocation) in self.document_revocations.entries() {
                    signature.revocation_source.add_revocation(*origin, revocation.clone());
                }
                for reference in self.document_revocations.references() {
                    signature.revocation_source.add_reference(reference.clone());
                }
                signature
            })
            .collect()
    }
}
