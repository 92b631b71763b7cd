//! Signing certificate identification
//!
//! Candidates are tried in a fixed order:
//! 1. A certificate designated by a signing-certificate reference
//! 2. A certificate matching the signer identifier (issuer-serial or key id),
//!    first among the owner's certificates, then across the run
//! 3. The only certificate of the owner's key material

use crate::domain::entities::{IdentificationMethod, SigningCertificateIdentification};
use dsv_01_evidence::{
    CertificateOrigin, CertificateRef, CertificateRefOrigin, CertificateRefTarget, CertificateToken, FoundEvidence,
    SignerIdentifier, TokenStore,
};
use std::sync::Arc;
use tracing::debug;

/// Where the signer's certificate may be found for one evidence owner.
#[derive(Clone, Copy, Debug)]
pub struct SignerHints<'a> {
    pub identifier: Option<&'a SignerIdentifier>,
    /// KeyInfo for signatures, SignedData for timestamps.
    pub key_material: CertificateOrigin,
}

/// Find the signing certificate of one owner.
pub fn identify_signing_certificate(
    found: &FoundEvidence,
    pool: &TokenStore,
    hints: SignerHints<'_>,
) -> SigningCertificateIdentification {
    let attribute_count = found.unique_reference_count(CertificateRefOrigin::SigningCertificate);

    let mut identification = SigningCertificateIdentification {
        attribute_count,
        ..Default::default()
    };

    if let Some(related) = found
        .related_certificates_by_ref_origin(CertificateRefOrigin::SigningCertificate)
        .into_iter()
        .next()
    {
        let references: Vec<&CertificateRef> = related
            .references
            .iter()
            .filter(|r| r.origin == CertificateRefOrigin::SigningCertificate)
            .collect();
        identification.digest_match = references.iter().any(|r| r.digest().is_some());
        identification.issuer_serial_match = references
            .iter()
            .any(|r| designates_by_issuer_serial(r, &related.certificate));
        identification.certificate = Some(related.certificate.clone());
        identification.method = Some(IdentificationMethod::SigningCertificateReference);
    } else if let Some(certificate) = hints
        .identifier
        .and_then(|identifier| match_identifier(identifier, found, pool))
    {
        identification.certificate = Some(certificate);
        identification.method = Some(IdentificationMethod::SignerIdentifier);
    } else {
        let key_material = found.related_certificates_by_origin(hints.key_material);
        if let [single] = key_material.as_slice() {
            identification.certificate = Some(single.certificate.clone());
            identification.method = Some(IdentificationMethod::SingleKeyInfoCertificate);
        }
    }

    debug!(
        owner = %found.owner,
        identified = identification.is_identified(),
        method = ?identification.method,
        attribute_count,
        "Signing certificate identification"
    );
    identification
}

/// The reference names the certificate's issuer and serial number.
fn designates_by_issuer_serial(reference: &CertificateRef, certificate: &CertificateToken) -> bool {
    let expected = certificate.issuer_serial();
    match &reference.target {
        CertificateRefTarget::IssuerSerial(issuer_serial) => *issuer_serial == expected,
        _ => reference.issuer_serial.as_ref() == Some(&expected),
    }
}

fn matches_identifier(identifier: &SignerIdentifier, certificate: &CertificateToken) -> bool {
    match identifier {
        SignerIdentifier::IssuerSerial(issuer_serial) => certificate.issuer_serial() == *issuer_serial,
        SignerIdentifier::SubjectKeyIdentifier(key) => certificate.info.subject_key_identifier.as_ref() == Some(key),
    }
}

fn match_identifier(
    identifier: &SignerIdentifier,
    found: &FoundEvidence,
    pool: &TokenStore,
) -> Option<Arc<CertificateToken>> {
    found
        .related_certificates()
        .iter()
        .map(|related| &related.certificate)
        .chain(pool.certificates())
        .find(|certificate| matches_identifier(identifier, certificate))
        .cloned()
}
