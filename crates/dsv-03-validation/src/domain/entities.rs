//! Domain entities for the validation process

use chrono::{DateTime, Utc};
use dsv_01_evidence::{CertificateStatus, CertificateToken, RevocationReason, RevocationToken};
use dsv_02_constraints::BlockResult;
use serde::{Deserialize, Serialize};
use shared_types::TokenId;
use std::fmt;
use std::sync::Arc;

// =============================================================================
// PROCESS STATE
// =============================================================================

/// States of the validation process, in the order they are visited.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessState {
    Initialized,
    /// Identification of the signing certificate
    Isc,
    /// Validation context initialization
    Vci,
    /// X.509 certificate validation
    Xcv,
    /// Cryptographic verification
    Cv,
    /// Signature acceptance validation
    Sav,
    /// Revocation data acceptance
    Rac,
    Concluded,
}

impl ProcessState {
    /// Whether a process may move from `self` to `next`.
    ///
    /// States only move forward and `Concluded` is terminal. A plan may skip
    /// states (the timestamp process has no VCI).
    pub fn can_transition_to(&self, next: ProcessState) -> bool {
        *self != ProcessState::Concluded && next > *self
    }
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProcessState::Initialized => "INITIALIZED",
            ProcessState::Isc => "ISC",
            ProcessState::Vci => "VCI",
            ProcessState::Xcv => "XCV",
            ProcessState::Cv => "CV",
            ProcessState::Sav => "SAV",
            ProcessState::Rac => "RAC",
            ProcessState::Concluded => "CONCLUDED",
        };
        f.write_str(name)
    }
}

// =============================================================================
// SIGNING CERTIFICATE
// =============================================================================

/// How the signing certificate was found.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IdentificationMethod {
    /// A signing-certificate attribute resolved to a token.
    SigningCertificateReference,
    /// The signer identifier (issuer-serial or key identifier) matched.
    SignerIdentifier,
    /// The only certificate in the key material.
    SingleKeyInfoCertificate,
}

/// Outcome of signing certificate identification.
#[derive(Clone, Debug, Default)]
pub struct SigningCertificateIdentification {
    pub certificate: Option<Arc<CertificateToken>>,
    pub method: Option<IdentificationMethod>,
    /// Declared signing-certificate references.
    pub attribute_count: usize,
    /// A signing-certificate reference matched by digest.
    pub digest_match: bool,
    /// The issuer-serial declared next to the digest designates the certificate.
    pub issuer_serial_match: bool,
}

impl SigningCertificateIdentification {
    pub fn is_identified(&self) -> bool {
        self.certificate.is_some()
    }

    pub fn certificate_id(&self) -> Option<TokenId> {
        self.certificate.as_ref().map(|c| c.id())
    }
}

// =============================================================================
// CERTIFICATE CHAIN
// =============================================================================

/// Revocation data judged for one certificate of a chain.
#[derive(Clone, Debug, Default)]
pub struct RevocationAssessment {
    /// Tokens asserting a status for the certificate.
    pub candidates: Vec<Arc<RevocationToken>>,
    /// One acceptance block per candidate, same order.
    pub acceptance: Vec<BlockResult>,
    /// Most recent accepted token.
    pub latest_acceptable: Option<Arc<RevocationToken>>,
    /// Status the most recent accepted token asserts.
    pub status: Option<CertificateStatus>,
}

impl RevocationAssessment {
    pub fn is_available(&self) -> bool {
        !self.candidates.is_empty()
    }

    pub fn is_acceptable(&self) -> bool {
        self.latest_acceptable.is_some()
    }

    /// Revoked for a reason other than a hold, at or before `at`.
    pub fn is_revoked_at(&self, at: DateTime<Utc>) -> bool {
        match &self.status {
            Some(CertificateStatus::Revoked { revocation_time, reason }) => {
                *reason != Some(RevocationReason::CertificateHold) && *revocation_time <= at
            }
            _ => false,
        }
    }

    pub fn is_on_hold(&self) -> bool {
        matches!(
            &self.status,
            Some(CertificateStatus::Revoked {
                reason: Some(RevocationReason::CertificateHold),
                ..
            })
        )
    }
}

/// One certificate of a chain with its issuer and revocation assessment.
#[derive(Clone, Debug)]
pub struct ChainLink {
    pub certificate: Arc<CertificateToken>,
    pub issuer: Option<Arc<CertificateToken>>,
    pub trust_anchor: bool,
    pub revocation: RevocationAssessment,
}

/// Certificates from the signer towards a trust anchor.
#[derive(Clone, Debug, Default)]
pub struct CertificateChain {
    pub links: Vec<ChainLink>,
    /// The last link is a trust anchor.
    pub trusted: bool,
}

impl CertificateChain {
    pub fn ids(&self) -> Vec<TokenId> {
        self.links.iter().map(|link| link.certificate.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn signing_link(&self) -> Option<&ChainLink> {
        self.links.first()
    }
}
