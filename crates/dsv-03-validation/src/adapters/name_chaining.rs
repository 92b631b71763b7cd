//! Name Chaining Verifier Adapter
//!
//! Implements `CertificateVerifier` from the signature checks the format
//! adapter already ran, linking tokens by names and key identifiers.

use crate::ports::outbound::CertificateVerifier;
use dsv_01_evidence::{CertificateToken, RevocationToken};

/// Links a certificate to its issuer when:
/// - the issuer name equals the issuer's subject name
/// - the authority key identifier matches the issuer's subject key
///   identifier, when both are present
/// - the certificate signature was not reported broken
pub struct NameChainingVerifier;

impl CertificateVerifier for NameChainingVerifier {
    fn verify_issued_by(&self, certificate: &CertificateToken, issuer: &CertificateToken) -> bool {
        if certificate.info.issuer_dn != issuer.info.subject_dn {
            return false;
        }
        let keys_match = match (
            &certificate.info.authority_key_identifier,
            &issuer.info.subject_key_identifier,
        ) {
            (Some(authority), Some(subject)) => authority == subject,
            _ => true,
        };
        keys_match && certificate.info.signature_intact != Some(false)
    }

    fn verify_revocation_signed_by(&self, revocation: &RevocationToken, issuer: &CertificateToken) -> bool {
        revocation.is_issued_by(issuer) && revocation.info.signature_intact
    }
}
