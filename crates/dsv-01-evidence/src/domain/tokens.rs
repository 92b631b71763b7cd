//! # Tokens
//!
//! Certificates and revocation data as handed over by format adapters:
//! the binary form plus the parsed fields the validation checks read.
//!
//! Tokens are immutable once built and shared behind `Arc` so the same
//! binary object can be reachable from several sources without copying.

use super::identity::{
    derive_token_id, DistinguishedName, IssuerSerial, KeyIdentifier, ResponderId, SerialNumber,
    TokenIdentity,
};
use super::sources::CertificateSource;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_crypto::{DigestAlgorithm, EncryptionAlgorithm};
use shared_types::{ContractError, TokenId, TokenKind};
use std::collections::BTreeSet;
use std::sync::Arc;

// =============================================================================
// CERTIFICATES
// =============================================================================

/// X.509 key usage bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KeyUsage {
    DigitalSignature,
    NonRepudiation,
    KeyEncipherment,
    DataEncipherment,
    KeyAgreement,
    KeyCertSign,
    CrlSign,
    EncipherOnly,
    DecipherOnly,
}

impl KeyUsage {
    /// Policy name of the bit.
    pub fn name(&self) -> &'static str {
        match self {
            KeyUsage::DigitalSignature => "digitalSignature",
            KeyUsage::NonRepudiation => "nonRepudiation",
            KeyUsage::KeyEncipherment => "keyEncipherment",
            KeyUsage::DataEncipherment => "dataEncipherment",
            KeyUsage::KeyAgreement => "keyAgreement",
            KeyUsage::KeyCertSign => "keyCertSign",
            KeyUsage::CrlSign => "crlSign",
            KeyUsage::EncipherOnly => "encipherOnly",
            KeyUsage::DecipherOnly => "decipherOnly",
        }
    }
}

/// Parsed certificate fields.
#[derive(Clone, Debug, Default)]
pub struct CertificateInfo {
    pub subject_dn: DistinguishedName,
    pub issuer_dn: DistinguishedName,
    pub serial_number: SerialNumber,
    pub common_name: Option<String>,
    pub country: Option<String>,
    pub organization: Option<String>,
    pub not_before: DateTime<Utc>,
    pub not_after: DateTime<Utc>,
    pub key_usages: BTreeSet<KeyUsage>,
    /// Extended key usage OIDs.
    pub extended_key_usages: BTreeSet<String>,
    pub is_ca: bool,
    pub subject_key_identifier: Option<KeyIdentifier>,
    pub authority_key_identifier: Option<KeyIdentifier>,
    /// Digest algorithm of the issuer's signature over this certificate.
    pub signature_digest_algorithm: DigestAlgorithm,
    /// Outcome of verifying the issuer's signature, when the adapter already
    /// knows the issuer key. `None` defers to the chain builder.
    pub signature_intact: Option<bool>,
    pub public_key_algorithm: EncryptionAlgorithm,
    pub public_key_size_bits: u32,
}

/// An X.509 certificate.
#[derive(Clone, Debug)]
pub struct CertificateToken {
    id: TokenId,
    encoded: Arc<[u8]>,
    pub info: CertificateInfo,
}

impl CertificateToken {
    /// Build a certificate from its encoding and parsed fields.
    ///
    /// When the adapter left `common_name` unset it is taken from the
    /// subject name.
    pub fn new(encoded: impl Into<Vec<u8>>, mut info: CertificateInfo) -> Result<Self, ContractError> {
        let encoded: Vec<u8> = encoded.into();
        let id = derive_token_id(TokenKind::Certificate, &encoded)?;
        if info.common_name.is_none() {
            info.common_name = info.subject_dn.attribute("CN");
        }
        if info.country.is_none() {
            info.country = info.subject_dn.attribute("C");
        }
        if info.organization.is_none() {
            info.organization = info.subject_dn.attribute("O");
        }
        Ok(Self {
            id,
            encoded: encoded.into(),
            info,
        })
    }

    pub fn id(&self) -> TokenId {
        self.id
    }

    pub fn issuer_serial(&self) -> IssuerSerial {
        IssuerSerial {
            issuer: self.info.issuer_dn.clone(),
            serial_number: self.info.serial_number.clone(),
        }
    }

    /// Subject and issuer names are equal.
    pub fn is_self_issued(&self) -> bool {
        self.info.subject_dn == self.info.issuer_dn
    }

    /// Whether `at` lies inside the validity period (bounds inclusive).
    pub fn is_valid_at(&self, at: DateTime<Utc>) -> bool {
        self.info.not_before <= at && at <= self.info.not_after
    }

    pub fn has_key_usage(&self, usage: KeyUsage) -> bool {
        self.info.key_usages.contains(&usage)
    }

    /// Whether this certificate is the one an OCSP responder id names.
    pub fn matches_responder(&self, responder: &ResponderId) -> bool {
        match responder {
            ResponderId::ByName(name) => self.info.subject_dn == *name,
            ResponderId::ByKey(key) => self.info.subject_key_identifier.as_ref() == Some(key),
        }
    }
}

impl TokenIdentity for CertificateToken {
    fn token_id(&self) -> TokenId {
        self.id
    }

    fn encoded(&self) -> &[u8] {
        &self.encoded
    }
}

impl PartialEq for CertificateToken {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for CertificateToken {}

// =============================================================================
// REVOCATION DATA
// =============================================================================

/// Kind of revocation token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RevocationKind {
    Ocsp,
    Crl,
}

impl From<RevocationKind> for TokenKind {
    fn from(kind: RevocationKind) -> Self {
        match kind {
            RevocationKind::Ocsp => TokenKind::Ocsp,
            RevocationKind::Crl => TokenKind::Crl,
        }
    }
}

/// CRL entry reason codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RevocationReason {
    Unspecified,
    KeyCompromise,
    CaCompromise,
    AffiliationChanged,
    Superseded,
    CessationOfOperation,
    CertificateHold,
    RemoveFromCrl,
    PrivilegeWithdrawn,
    AaCompromise,
}

/// Status a revocation token asserts for one certificate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum CertificateStatus {
    Good,
    Revoked {
        revocation_time: DateTime<Utc>,
        reason: Option<RevocationReason>,
    },
    Unknown,
}

/// One certificate covered by a revocation token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RevocationEntry {
    pub certificate: IssuerSerial,
    pub status: CertificateStatus,
}

/// Parsed revocation token fields.
#[derive(Clone, Debug)]
pub struct RevocationInfo {
    pub kind: RevocationKind,
    /// CRL issuer, or the OCSP responder name when known.
    pub issuer_dn: DistinguishedName,
    /// OCSP responder identifier.
    pub responder_id: Option<ResponderId>,
    /// OCSP `producedAt`; equal to `this_update` for CRLs.
    pub produced_at: DateTime<Utc>,
    pub this_update: DateTime<Utc>,
    pub next_update: Option<DateTime<Utc>>,
    pub entries: Vec<RevocationEntry>,
    /// Whether the token signature verified against its issuer key.
    pub signature_intact: bool,
    pub signature_digest_algorithm: DigestAlgorithm,
    /// Certificates and responder reference carried inside the token.
    pub certificate_source: CertificateSource,
}

impl RevocationInfo {
    /// Fields of an OCSP response produced at `produced_at`.
    pub fn ocsp(responder_id: ResponderId, produced_at: DateTime<Utc>) -> Self {
        let issuer_dn = match &responder_id {
            ResponderId::ByName(name) => name.clone(),
            ResponderId::ByKey(_) => DistinguishedName::default(),
        };
        Self {
            kind: RevocationKind::Ocsp,
            issuer_dn,
            responder_id: Some(responder_id),
            produced_at,
            this_update: produced_at,
            next_update: None,
            entries: Vec::new(),
            signature_intact: true,
            signature_digest_algorithm: DigestAlgorithm::Sha256,
            certificate_source: CertificateSource::new(),
        }
    }

    /// Fields of a CRL issued by `issuer_dn` at `this_update`.
    pub fn crl(issuer_dn: impl Into<DistinguishedName>, this_update: DateTime<Utc>) -> Self {
        Self {
            kind: RevocationKind::Crl,
            issuer_dn: issuer_dn.into(),
            responder_id: None,
            produced_at: this_update,
            this_update,
            next_update: None,
            entries: Vec::new(),
            signature_intact: true,
            signature_digest_algorithm: DigestAlgorithm::Sha256,
            certificate_source: CertificateSource::new(),
        }
    }
}

/// An OCSP response or a CRL.
#[derive(Clone, Debug)]
pub struct RevocationToken {
    id: TokenId,
    encoded: Arc<[u8]>,
    pub info: RevocationInfo,
}

impl RevocationToken {
    pub fn new(encoded: impl Into<Vec<u8>>, info: RevocationInfo) -> Result<Self, ContractError> {
        let encoded: Vec<u8> = encoded.into();
        let id = derive_token_id(info.kind.into(), &encoded)?;
        Ok(Self {
            id,
            encoded: encoded.into(),
            info,
        })
    }

    pub fn id(&self) -> TokenId {
        self.id
    }

    pub fn kind(&self) -> RevocationKind {
        self.info.kind
    }

    /// Status asserted for `certificate`, if the token covers it.
    pub fn status_of(&self, certificate: &IssuerSerial) -> Option<&CertificateStatus> {
        self.info
            .entries
            .iter()
            .find(|entry| entry.certificate == *certificate)
            .map(|entry| &entry.status)
    }

    /// Whether this token was issued by `issuer`: the CRL issuer name or
    /// the OCSP responder id designates the certificate.
    pub fn is_issued_by(&self, issuer: &CertificateToken) -> bool {
        match (&self.info.kind, &self.info.responder_id) {
            (RevocationKind::Ocsp, Some(responder)) => issuer.matches_responder(responder),
            _ => self.info.issuer_dn == issuer.info.subject_dn,
        }
    }
}

impl TokenIdentity for RevocationToken {
    fn token_id(&self) -> TokenId {
        self.id
    }

    fn encoded(&self) -> &[u8] {
        &self.encoded
    }
}

impl PartialEq for RevocationToken {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for RevocationToken {}

// =============================================================================
// ANY TOKEN
// =============================================================================

/// A discovered token of either family.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    Certificate(Arc<CertificateToken>),
    Revocation(Arc<RevocationToken>),
}

impl Token {
    pub fn id(&self) -> TokenId {
        match self {
            Token::Certificate(cert) => cert.id(),
            Token::Revocation(revocation) => revocation.id(),
        }
    }

    pub fn kind(&self) -> TokenKind {
        self.id().kind()
    }

    pub fn encoded(&self) -> &[u8] {
        match self {
            Token::Certificate(cert) => cert.encoded(),
            Token::Revocation(revocation) => revocation.encoded(),
        }
    }

    pub fn as_certificate(&self) -> Option<&Arc<CertificateToken>> {
        match self {
            Token::Certificate(cert) => Some(cert),
            Token::Revocation(_) => None,
        }
    }

    pub fn as_revocation(&self) -> Option<&Arc<RevocationToken>> {
        match self {
            Token::Revocation(revocation) => Some(revocation),
            Token::Certificate(_) => None,
        }
    }
}

impl From<Arc<CertificateToken>> for Token {
    fn from(cert: Arc<CertificateToken>) -> Self {
        Token::Certificate(cert)
    }
}

impl From<Arc<RevocationToken>> for Token {
    fn from(revocation: Arc<RevocationToken>) -> Self {
        Token::Revocation(revocation)
    }
}
