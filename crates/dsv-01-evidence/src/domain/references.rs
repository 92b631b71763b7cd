//! # References
//!
//! Declarative pointers to tokens asserted by signed data. A reference names
//! its target through one identity scheme; resolution never looks at the
//! other fields a reference may carry for diagnostic purposes.

use super::identity::{IssuerSerial, ResponderId};
use super::origins::{CertificateRefOrigin, RevocationRefOrigin};
use super::tokens::RevocationKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_crypto::{sha256, Digest};
use std::fmt;

/// Identity scheme and value a certificate reference targets.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CertificateRefTarget {
    /// Digest of the certificate encoding.
    Digest(Digest),
    /// Issuer name and serial number.
    IssuerSerial(IssuerSerial),
    /// OCSP responder identifier.
    Responder(ResponderId),
}

impl CertificateRefTarget {
    fn canonical(&self) -> String {
        match self {
            CertificateRefTarget::Digest(digest) => format!("digest:{}", digest),
            CertificateRefTarget::IssuerSerial(issuer_serial) => format!(
                "issuer-serial:{}#{}",
                issuer_serial.issuer.normalized(),
                issuer_serial.serial_number
            ),
            CertificateRefTarget::Responder(responder) => format!("responder:{}", responder),
        }
    }
}

/// A declared certificate reference.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateRef {
    pub origin: CertificateRefOrigin,
    pub target: CertificateRefTarget,
    /// Issuer and serial declared next to a digest, compared by the
    /// signing-certificate checks.
    pub issuer_serial: Option<IssuerSerial>,
}

impl CertificateRef {
    /// Reference by digest.
    pub fn by_digest(origin: CertificateRefOrigin, digest: Digest) -> Self {
        Self {
            origin,
            target: CertificateRefTarget::Digest(digest),
            issuer_serial: None,
        }
    }

    /// Reference by issuer name and serial number only.
    pub fn by_issuer_serial(origin: CertificateRefOrigin, issuer_serial: IssuerSerial) -> Self {
        Self {
            origin,
            target: CertificateRefTarget::IssuerSerial(issuer_serial.clone()),
            issuer_serial: Some(issuer_serial),
        }
    }

    /// Responder identifier of an OCSP response.
    pub fn by_responder(responder: ResponderId) -> Self {
        Self {
            origin: CertificateRefOrigin::OcspResponderId,
            target: CertificateRefTarget::Responder(responder),
            issuer_serial: None,
        }
    }

    /// Attach the declared issuer and serial to a digest reference.
    pub fn with_issuer_serial(mut self, issuer_serial: IssuerSerial) -> Self {
        self.issuer_serial = Some(issuer_serial);
        self
    }

    pub fn digest(&self) -> Option<&Digest> {
        match &self.target {
            CertificateRefTarget::Digest(digest) => Some(digest),
            _ => None,
        }
    }
}

/// Identity scheme and value a revocation reference targets.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RevocationRefTarget {
    /// Digest of the OCSP response or CRL encoding.
    Digest(Digest),
    /// OCSP responder plus production time.
    OcspResponder {
        responder: ResponderId,
        produced_at: DateTime<Utc>,
    },
}

/// A declared revocation reference.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevocationRef {
    pub origin: RevocationRefOrigin,
    pub kind: RevocationKind,
    pub target: RevocationRefTarget,
}

impl RevocationRef {
    pub fn by_digest(origin: RevocationRefOrigin, kind: RevocationKind, digest: Digest) -> Self {
        Self {
            origin,
            kind,
            target: RevocationRefTarget::Digest(digest),
        }
    }

    pub fn by_responder(
        origin: RevocationRefOrigin,
        responder: ResponderId,
        produced_at: DateTime<Utc>,
    ) -> Self {
        Self {
            origin,
            kind: RevocationKind::Ocsp,
            target: RevocationRefTarget::OcspResponder {
                responder,
                produced_at,
            },
        }
    }

    fn canonical(&self) -> String {
        match &self.target {
            RevocationRefTarget::Digest(digest) => format!("{:?}:digest:{}", self.kind, digest),
            RevocationRefTarget::OcspResponder {
                responder,
                produced_at,
            } => format!("{:?}:responder:{}@{}", self.kind, responder, produced_at.timestamp()),
        }
    }
}

/// Any declared reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reference {
    Certificate(CertificateRef),
    Revocation(RevocationRef),
}

impl From<CertificateRef> for Reference {
    fn from(reference: CertificateRef) -> Self {
        Reference::Certificate(reference)
    }
}

impl From<RevocationRef> for Reference {
    fn from(reference: RevocationRef) -> Self {
        Reference::Revocation(reference)
    }
}

/// Identity of an unresolved reference target.
///
/// References with the same target share one orphan id, so a target
/// declared in several lists is reported once.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrphanId(String);

impl OrphanId {
    pub fn for_certificate(target: &CertificateRefTarget) -> Self {
        Self::derive("C", &target.canonical())
    }

    pub fn for_revocation(reference: &RevocationRef) -> Self {
        Self::derive("R", &reference.canonical())
    }

    fn derive(prefix: &str, canonical: &str) -> Self {
        Self(format!(
            "{}-{}",
            prefix,
            hex::encode_upper(sha256(canonical.as_bytes()))
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrphanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for OrphanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Orphan({})", &self.0[..self.0.len().min(14)])
    }
}
