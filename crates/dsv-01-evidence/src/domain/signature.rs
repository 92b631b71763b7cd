//! # Normalized Signature Input
//!
//! What a format adapter hands to the validation core for one signature:
//! parsed signed attributes, cryptographic verification outcomes computed by
//! the primitive library, and the certificate/revocation sources of the
//! signature and of each attached timestamp.

use super::identity::{IssuerSerial, KeyIdentifier};
use super::sources::{CertificateSource, RevocationSource};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_crypto::{DigestAlgorithm, EncryptionAlgorithm};
use shared_types::ContractError;
use std::collections::HashSet;
use std::fmt;

/// AdES family of the signature container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignatureFormat {
    XAdES,
    CAdES,
    PAdES,
    JAdES,
}

impl fmt::Display for SignatureFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SignatureFormat::XAdES => "XAdES",
            SignatureFormat::CAdES => "CAdES",
            SignatureFormat::PAdES => "PAdES",
            SignatureFormat::JAdES => "JAdES",
        };
        f.write_str(name)
    }
}

/// Role of a timestamp relative to the signature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimestampType {
    /// Over the signed content, before signing.
    ContentTimestamp,
    /// Over the signature value.
    SignatureTimestamp,
    /// Over the validation data references.
    ValidationDataRefsOnlyTimestamp,
    /// Over the signature and its validation data references.
    ValidationDataTimestamp,
    /// Over the signature and all validation data.
    ArchiveTimestamp,
    /// Document-level timestamp (PDF).
    DocumentTimestamp,
}

impl TimestampType {
    /// Whether the timestamp proves the signature value existed.
    pub fn covers_signature(&self) -> bool {
        !matches!(
            self,
            TimestampType::ContentTimestamp | TimestampType::ValidationDataRefsOnlyTimestamp
        )
    }

    /// Whether the timestamp protects the validation data (LTA).
    pub fn is_archival(&self) -> bool {
        matches!(self, TimestampType::ArchiveTimestamp)
    }
}

/// Kind of digest-protected object covered by a signature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DigestMatcherKind {
    Reference,
    ObjectReference,
    SignedProperties,
    KeyInfo,
    MessageDigest,
    ContentDigest,
    ManifestEntry,
    MessageImprint,
}

/// Outcome of matching one signed digest against the data it covers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DigestMatcher {
    pub kind: DigestMatcherKind,
    pub name: Option<String>,
    pub digest_algorithm: Option<DigestAlgorithm>,
    /// The covered data could be located.
    pub data_found: bool,
    /// The recomputed digest equals the signed one.
    pub data_intact: bool,
}

impl DigestMatcher {
    /// A located and intact reference.
    pub fn intact(kind: DigestMatcherKind) -> Self {
        Self {
            kind,
            name: None,
            digest_algorithm: Some(DigestAlgorithm::Sha256),
            data_found: true,
            data_intact: true,
        }
    }
}

/// How the signer designates its own certificate (CMS `SignerIdentifier`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SignerIdentifier {
    IssuerSerial(IssuerSerial),
    SubjectKeyIdentifier(KeyIdentifier),
}

/// Signature policy identifier attribute.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyIdentifier {
    /// Policy OID or URI.
    pub id: String,
    /// Policy document digest check, when the document was retrievable.
    pub digests_match: Option<bool>,
}

/// A timestamp token attached to a signature or document.
#[derive(Clone, Debug)]
pub struct TimestampInput {
    pub id: String,
    pub timestamp_type: TimestampType,
    pub production_time: DateTime<Utc>,
    /// Message imprint digest algorithm.
    pub digest_algorithm: DigestAlgorithm,
    pub message_imprint_found: bool,
    pub message_imprint_intact: bool,
    pub signature_intact: bool,
    pub signer_identifier: Option<SignerIdentifier>,
    /// Certificates inside the timestamp token (SignedData, signing
    /// certificate references).
    pub certificate_source: CertificateSource,
    pub revocation_source: RevocationSource,
}

impl TimestampInput {
    pub fn new(id: impl Into<String>, timestamp_type: TimestampType, production_time: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            timestamp_type,
            production_time,
            digest_algorithm: DigestAlgorithm::Sha256,
            message_imprint_found: true,
            message_imprint_intact: true,
            signature_intact: true,
            signer_identifier: None,
            certificate_source: CertificateSource::new(),
            revocation_source: RevocationSource::new(),
        }
    }
}

/// One signature as exposed by a format adapter.
#[derive(Clone, Debug)]
pub struct SignatureInput {
    pub id: String,
    pub format: SignatureFormat,
    /// Claimed signing time attribute.
    pub signing_time: Option<DateTime<Utc>>,
    pub signature_digest_algorithm: DigestAlgorithm,
    pub encryption_algorithm: EncryptionAlgorithm,
    /// Key size reported by the primitive library; falls back to the
    /// signing certificate's key size when absent.
    pub signer_key_size_bits: Option<u32>,
    pub signer_identifier: Option<SignerIdentifier>,
    pub policy_identifier: Option<PolicyIdentifier>,
    pub digest_matchers: Vec<DigestMatcher>,
    pub signature_intact: bool,
    pub content_type: Option<String>,
    pub commitment_types: Vec<String>,
    pub claimed_roles: Vec<String>,
    pub signer_location: Option<String>,
    pub certificate_source: CertificateSource,
    pub revocation_source: RevocationSource,
    pub timestamps: Vec<TimestampInput>,
}

impl SignatureInput {
    /// An intact signature with no attributes or evidence yet.
    pub fn new(id: impl Into<String>, format: SignatureFormat) -> Self {
        Self {
            id: id.into(),
            format,
            signing_time: None,
            signature_digest_algorithm: DigestAlgorithm::Sha256,
            encryption_algorithm: EncryptionAlgorithm::Rsa,
            signer_key_size_bits: None,
            signer_identifier: None,
            policy_identifier: None,
            digest_matchers: vec![DigestMatcher::intact(DigestMatcherKind::MessageDigest)],
            signature_intact: true,
            content_type: None,
            commitment_types: Vec::new(),
            claimed_roles: Vec::new(),
            signer_location: None,
            certificate_source: CertificateSource::new(),
            revocation_source: RevocationSource::new(),
            timestamps: Vec::new(),
        }
    }

    /// Check the structural contract: non-empty ids, unique timestamp ids.
    pub fn validate_contract(&self) -> Result<(), ContractError> {
        if self.id.trim().is_empty() {
            return Err(ContractError::EmptyIdentifier("signature"));
        }
        let mut seen = HashSet::new();
        for timestamp in &self.timestamps {
            if timestamp.id.trim().is_empty() {
                return Err(ContractError::EmptyIdentifier("timestamp"));
            }
            if !seen.insert(timestamp.id.as_str()) {
                return Err(ContractError::DuplicateIdentifier(timestamp.id.clone()));
            }
        }
        Ok(())
    }

    /// Raw token entries across the signature, its timestamps and the
    /// certificates embedded in revocation data.
    pub fn token_entry_count(&self) -> usize {
        let embedded = |revocations: &RevocationSource| -> usize {
            revocations
                .entries()
                .iter()
                .map(|(_, r)| r.info.certificate_source.certificate_count())
                .sum()
        };
        let own = self.certificate_source.certificate_count()
            + self.revocation_source.revocation_count()
            + embedded(&self.revocation_source);
        let stamped: usize = self
            .timestamps
            .iter()
            .map(|ts| {
                ts.certificate_source.certificate_count()
                    + ts.revocation_source.revocation_count()
                    + embedded(&ts.revocation_source)
            })
            .sum();
        own + stamped
    }

    /// Declared references across the signature, its timestamps and
    /// revocation data.
    pub fn reference_count(&self) -> usize {
        let embedded = |revocations: &RevocationSource| -> usize {
            revocations
                .entries()
                .iter()
                .map(|(_, r)| r.info.certificate_source.reference_count())
                .sum()
        };
        let own = self.certificate_source.reference_count()
            + self.revocation_source.reference_count()
            + embedded(&self.revocation_source);
        let stamped: usize = self
            .timestamps
            .iter()
            .map(|ts| {
                ts.certificate_source.reference_count()
                    + ts.revocation_source.reference_count()
                    + embedded(&ts.revocation_source)
            })
            .sum();
        own + stamped
    }
}
