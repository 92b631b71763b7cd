//! # Test Fixtures
//!
//! A three-level hierarchy (root, issuing CA, signer) with CRLs, plus
//! builders for signatures and timestamps over it. Every fixture is
//! anchored at [`validation_time`].

use chrono::{DateTime, Duration, TimeZone, Utc};
use dsv_01_evidence::{
    CertificateInfo, CertificateOrigin, CertificateRef, CertificateRefOrigin, CertificateStatus, CertificateToken,
    KeyUsage, RevocationEntry, RevocationInfo, RevocationOrigin, RevocationReason, RevocationToken, SerialNumber,
    SignatureFormat, SignatureInput, TimestampInput, TimestampType, TokenIdentity,
};
use dsv_03_validation::{FixedTimeSource, SignatureValidationService, TrustedCertificates};
use dsv_telemetry::{init_telemetry, TelemetryConfig};
use shared_crypto::{compute_digest, DigestAlgorithm};
use std::sync::Arc;

/// Validation time of every scenario.
pub fn validation_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).single().unwrap_or_default()
}

/// Certificate valid one year either side of the validation time.
pub fn certificate(subject: &str, issuer: &str, serial: u64) -> Arc<CertificateToken> {
    certificate_with(subject, issuer, serial, |_| {})
}

/// Certificate with extra fields set by `customize`.
pub fn certificate_with(
    subject: &str,
    issuer: &str,
    serial: u64,
    customize: impl FnOnce(&mut CertificateInfo),
) -> Arc<CertificateToken> {
    let mut info = CertificateInfo {
        subject_dn: subject.into(),
        issuer_dn: issuer.into(),
        serial_number: SerialNumber::from_u64(serial),
        not_before: validation_time() - Duration::days(365),
        not_after: validation_time() + Duration::days(365),
        public_key_size_bits: 2048,
        ..Default::default()
    };
    customize(&mut info);
    let encoded = format!("cert:{}:{}:{}", subject, issuer, serial);
    Arc::new(CertificateToken::new(encoded.into_bytes(), info).expect("fixture certificate"))
}

/// Root, issuing CA and signer.
pub struct Hierarchy {
    pub root: Arc<CertificateToken>,
    pub ca: Arc<CertificateToken>,
    pub signer: Arc<CertificateToken>,
}

impl Hierarchy {
    pub fn new() -> Self {
        let root = certificate_with("CN=Test Root,O=DSV,C=BE", "CN=Test Root,O=DSV,C=BE", 1, |info| {
            info.is_ca = true;
            info.key_usages.insert(KeyUsage::KeyCertSign);
        });
        let ca = certificate_with("CN=Issuing CA,O=DSV,C=BE", "CN=Test Root,O=DSV,C=BE", 2, |info| {
            info.is_ca = true;
            info.key_usages.insert(KeyUsage::KeyCertSign);
            info.key_usages.insert(KeyUsage::CrlSign);
        });
        let signer = certificate_with("CN=Alice Signer,O=DSV,C=BE", "CN=Issuing CA,O=DSV,C=BE", 3, |info| {
            info.key_usages.insert(KeyUsage::NonRepudiation);
        });
        Self { root, ca, signer }
    }

    pub fn anchors(&self) -> TrustedCertificates {
        TrustedCertificates::new().with(self.root.clone())
    }

    /// CRL of the issuing CA, listing `entries`.
    pub fn ca_crl(&self, label: &str, entries: Vec<RevocationEntry>) -> Arc<RevocationToken> {
        crl(label, &self.ca, validation_time() - Duration::days(1), entries)
    }

    /// CRL of the root, covering the issuing CA.
    pub fn root_crl(&self) -> Arc<RevocationToken> {
        crl("root-crl", &self.root, validation_time() - Duration::days(1), Vec::new())
    }

    /// Signature by the signer with the CA embedded and both CRLs attached.
    pub fn signature(&self, id: &str) -> SignatureInput {
        let mut input = signed_by(id, SignatureFormat::XAdES, &self.signer, CertificateOrigin::KeyInfo);
        input
            .certificate_source
            .add_certificate(CertificateOrigin::CertificateValues, self.ca.clone());
        input
            .revocation_source
            .add_revocation(RevocationOrigin::RevocationValues, self.ca_crl("ca-crl", Vec::new()));
        input
            .revocation_source
            .add_revocation(RevocationOrigin::RevocationValues, self.root_crl());
        input
    }
}

impl Default for Hierarchy {
    fn default() -> Self {
        Self::new()
    }
}

pub fn crl(
    label: &str,
    issuer: &CertificateToken,
    this_update: DateTime<Utc>,
    entries: Vec<RevocationEntry>,
) -> Arc<RevocationToken> {
    let mut info = RevocationInfo::crl(issuer.info.subject_dn.clone(), this_update);
    info.next_update = Some(this_update + Duration::days(7));
    info.entries = entries;
    Arc::new(RevocationToken::new(format!("crl:{}", label).into_bytes(), info).expect("fixture crl"))
}

/// Revocation entry for `certificate`.
pub fn revoked(
    certificate: &CertificateToken,
    revocation_time: DateTime<Utc>,
    reason: RevocationReason,
) -> RevocationEntry {
    RevocationEntry {
        certificate: certificate.issuer_serial(),
        status: CertificateStatus::Revoked {
            revocation_time,
            reason: Some(reason),
        },
    }
}

/// Signing-certificate reference by SHA-256 digest and issuer-serial.
pub fn signing_reference(certificate: &CertificateToken) -> CertificateRef {
    CertificateRef::by_digest(
        CertificateRefOrigin::SigningCertificate,
        compute_digest(DigestAlgorithm::Sha256, certificate.encoded()),
    )
    .with_issuer_serial(certificate.issuer_serial())
}

/// Digest reference of any category.
pub fn digest_reference(origin: CertificateRefOrigin, encoded: &[u8]) -> CertificateRef {
    CertificateRef::by_digest(origin, compute_digest(DigestAlgorithm::Sha256, encoded))
}

/// Signature with a signing time, carrying `signer` at `origin`.
pub fn signed_by(
    id: &str,
    format: SignatureFormat,
    signer: &Arc<CertificateToken>,
    origin: CertificateOrigin,
) -> SignatureInput {
    let mut input = SignatureInput::new(id, format);
    input.signing_time = Some(validation_time() - Duration::hours(2));
    input.certificate_source.add_certificate(origin, signer.clone());
    input.certificate_source.add_reference(signing_reference(signer));
    input
}

/// Timestamp signed by `tsa`, carried in its SignedData.
pub fn timestamp(id: &str, timestamp_type: TimestampType, tsa: &Arc<CertificateToken>) -> TimestampInput {
    let mut input = TimestampInput::new(id, timestamp_type, validation_time() - Duration::hours(1));
    input
        .certificate_source
        .add_certificate(CertificateOrigin::SignedData, tsa.clone());
    input
}

/// Service pinned to the validation time, with metrics registered and
/// logging kept off the console.
pub fn service(anchors: TrustedCertificates) -> SignatureValidationService {
    let telemetry = TelemetryConfig {
        console_output: false,
        ..Default::default()
    };
    // another test may have installed the subscriber first
    let _ = init_telemetry(&telemetry);
    SignatureValidationService::new()
        .with_trust_anchors(anchors)
        .with_time_source(Arc::new(FixedTimeSource(validation_time())))
}
