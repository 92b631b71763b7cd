//! Outbound Ports (Driven Ports / SPI)
//!
//! Cryptographic verification and the clock are provided by collaborators.

use chrono::{DateTime, Utc};
use dsv_01_evidence::{CertificateToken, RevocationToken};

/// Verifies issuance links between tokens.
///
/// Implementations wrap a cryptographic primitive library. The engine only
/// asks yes/no questions and never inspects keys itself.
pub trait CertificateVerifier: Send + Sync {
    /// Whether `issuer` issued and signed `certificate`.
    fn verify_issued_by(&self, certificate: &CertificateToken, issuer: &CertificateToken) -> bool;

    /// Whether `issuer` signed `revocation`.
    fn verify_revocation_signed_by(&self, revocation: &RevocationToken, issuer: &CertificateToken) -> bool;
}

/// Source of the validation time.
pub trait TimeSource: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Mock implementations for testing
#[cfg(test)]
pub mod mocks {
    use super::*;

    /// Verifier that rejects everything
    pub struct RejectingVerifier;

    impl CertificateVerifier for RejectingVerifier {
        fn verify_issued_by(&self, _certificate: &CertificateToken, _issuer: &CertificateToken) -> bool {
            false
        }

        fn verify_revocation_signed_by(&self, _revocation: &RevocationToken, _issuer: &CertificateToken) -> bool {
            false
        }
    }
}
