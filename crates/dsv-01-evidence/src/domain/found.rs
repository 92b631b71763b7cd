//! # Found Evidence
//!
//! Reconciled view of one evidence owner: every token it carries or
//! references, classified as related (located) or orphan (unresolved).

use super::origins::{CertificateOrigin, CertificateRefOrigin, Origin, RevocationOrigin, RevocationRefOrigin};
use super::references::{CertificateRef, OrphanId, RevocationRef};
use super::tokens::{CertificateToken, RevocationKind, RevocationToken, Token};
use shared_types::TokenId;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// A deduplicated token with every origin it was found through.
#[derive(Clone, Debug)]
pub struct FoundToken {
    token: Token,
    origins: BTreeSet<Origin>,
    discovery_index: usize,
}

impl FoundToken {
    pub(crate) fn new(token: Token, discovery_index: usize) -> Self {
        Self {
            token,
            origins: BTreeSet::new(),
            discovery_index,
        }
    }

    pub(crate) fn merge_origin(&mut self, origin: Origin) -> bool {
        self.origins.insert(origin)
    }

    pub fn id(&self) -> TokenId {
        self.token.id()
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    pub fn origins(&self) -> &BTreeSet<Origin> {
        &self.origins
    }

    pub fn has_origin(&self, origin: Origin) -> bool {
        self.origins.contains(&origin)
    }

    /// Position of first discovery within the run.
    pub fn discovery_index(&self) -> usize {
        self.discovery_index
    }
}

/// Whose evidence a [`FoundEvidence`] describes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum EvidenceOwner {
    Signature(String),
    Timestamp(String),
    Revocation(TokenId),
}

impl fmt::Display for EvidenceOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvidenceOwner::Signature(id) => write!(f, "signature {}", id),
            EvidenceOwner::Timestamp(id) => write!(f, "timestamp {}", id),
            EvidenceOwner::Revocation(id) => write!(f, "revocation {}", id),
        }
    }
}

/// A located certificate with the owner's origins and every reference
/// pointing at it.
#[derive(Clone, Debug)]
pub struct RelatedCertificate {
    pub certificate: Arc<CertificateToken>,
    /// Origins within this owner; empty when the certificate is only
    /// referenced and was located elsewhere in the run.
    pub origins: BTreeSet<CertificateOrigin>,
    pub references: Vec<CertificateRef>,
}

impl RelatedCertificate {
    pub fn id(&self) -> TokenId {
        self.certificate.id()
    }
}

/// Certificate references whose target is absent from the run.
#[derive(Clone, Debug)]
pub struct OrphanCertificate {
    pub id: OrphanId,
    pub references: Vec<CertificateRef>,
}

#[derive(Clone, Debug)]
pub struct RelatedRevocation {
    pub revocation: Arc<RevocationToken>,
    pub origins: BTreeSet<RevocationOrigin>,
    pub references: Vec<RevocationRef>,
}

impl RelatedRevocation {
    pub fn id(&self) -> TokenId {
        self.revocation.id()
    }

    pub fn kind(&self) -> RevocationKind {
        self.revocation.kind()
    }
}

#[derive(Clone, Debug)]
pub struct OrphanRevocation {
    pub id: OrphanId,
    pub kind: RevocationKind,
    pub references: Vec<RevocationRef>,
}

/// Data inconsistency noticed during resolution. Never fails the run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Inconsistency {
    /// A reference matched several tokens; the first discovered one won.
    AmbiguousReference {
        owner: String,
        candidates: Vec<TokenId>,
        chosen: TokenId,
    },
}

/// Reconciled tokens of one owner.
#[derive(Clone, Debug)]
pub struct FoundEvidence {
    pub owner: EvidenceOwner,
    pub(crate) related_certificates: Vec<RelatedCertificate>,
    pub(crate) orphan_certificates: Vec<OrphanCertificate>,
    pub(crate) related_revocations: Vec<RelatedRevocation>,
    pub(crate) orphan_revocations: Vec<OrphanRevocation>,
    pub(crate) inconsistencies: Vec<Inconsistency>,
}

impl FoundEvidence {
    pub(crate) fn empty(owner: EvidenceOwner) -> Self {
        Self {
            owner,
            related_certificates: Vec::new(),
            orphan_certificates: Vec::new(),
            related_revocations: Vec::new(),
            orphan_revocations: Vec::new(),
            inconsistencies: Vec::new(),
        }
    }

    // --- certificates ------------------------------------------------------

    pub fn related_certificates(&self) -> &[RelatedCertificate] {
        &self.related_certificates
    }

    pub fn orphan_certificates(&self) -> &[OrphanCertificate] {
        &self.orphan_certificates
    }

    pub fn related_certificate(&self, id: TokenId) -> Option<&RelatedCertificate> {
        self.related_certificates.iter().find(|r| r.id() == id)
    }

    pub fn related_certificates_by_origin(&self, origin: CertificateOrigin) -> Vec<&RelatedCertificate> {
        self.related_certificates
            .iter()
            .filter(|r| r.origins.contains(&origin))
            .collect()
    }

    /// Orphans carry no origin, so this is always empty. Kept so origin
    /// accounting reads the same for both classes.
    pub fn orphan_certificates_by_origin(&self, _origin: CertificateOrigin) -> Vec<&OrphanCertificate> {
        Vec::new()
    }

    pub fn related_certificates_by_ref_origin(&self, origin: CertificateRefOrigin) -> Vec<&RelatedCertificate> {
        self.related_certificates
            .iter()
            .filter(|r| r.references.iter().any(|reference| reference.origin == origin))
            .collect()
    }

    pub fn orphan_certificates_by_ref_origin(&self, origin: CertificateRefOrigin) -> Vec<&OrphanCertificate> {
        self.orphan_certificates
            .iter()
            .filter(|o| o.references.iter().any(|reference| reference.origin == origin))
            .collect()
    }

    /// Every reference attached to a related certificate.
    pub fn related_certificate_references(&self) -> Vec<&CertificateRef> {
        self.related_certificates
            .iter()
            .flat_map(|r| r.references.iter())
            .collect()
    }

    pub fn orphan_certificate_references(&self) -> Vec<&CertificateRef> {
        self.orphan_certificates
            .iter()
            .flat_map(|o| o.references.iter())
            .collect()
    }

    /// References of `origin`, counted once per target token (related
    /// tokens and orphan ids alike).
    pub fn unique_reference_count(&self, origin: CertificateRefOrigin) -> usize {
        self.related_certificates_by_ref_origin(origin).len()
            + self.orphan_certificates_by_ref_origin(origin).len()
    }

    // --- revocation data ---------------------------------------------------

    pub fn related_revocations(&self) -> &[RelatedRevocation] {
        &self.related_revocations
    }

    pub fn orphan_revocations(&self) -> &[OrphanRevocation] {
        &self.orphan_revocations
    }

    pub fn related_revocations_by_kind(&self, kind: RevocationKind) -> Vec<&RelatedRevocation> {
        self.related_revocations
            .iter()
            .filter(|r| r.kind() == kind)
            .collect()
    }

    pub fn orphan_revocations_by_kind(&self, kind: RevocationKind) -> Vec<&OrphanRevocation> {
        self.orphan_revocations
            .iter()
            .filter(|o| o.kind == kind)
            .collect()
    }

    pub fn related_revocations_by_kind_and_origin(
        &self,
        kind: RevocationKind,
        origin: RevocationOrigin,
    ) -> Vec<&RelatedRevocation> {
        self.related_revocations
            .iter()
            .filter(|r| r.kind() == kind && r.origins.contains(&origin))
            .collect()
    }

    pub fn orphan_revocations_by_kind_and_origin(
        &self,
        _kind: RevocationKind,
        _origin: RevocationOrigin,
    ) -> Vec<&OrphanRevocation> {
        Vec::new()
    }

    pub fn related_revocations_by_ref_origin(&self, origin: RevocationRefOrigin) -> Vec<&RelatedRevocation> {
        self.related_revocations
            .iter()
            .filter(|r| r.references.iter().any(|reference| reference.origin == origin))
            .collect()
    }

    pub fn orphan_revocations_by_ref_origin(&self, origin: RevocationRefOrigin) -> Vec<&OrphanRevocation> {
        self.orphan_revocations
            .iter()
            .filter(|o| o.references.iter().any(|reference| reference.origin == origin))
            .collect()
    }

    pub fn related_revocation_references(&self) -> Vec<&RevocationRef> {
        self.related_revocations
            .iter()
            .flat_map(|r| r.references.iter())
            .collect()
    }

    pub fn orphan_revocation_references(&self) -> Vec<&RevocationRef> {
        self.orphan_revocations
            .iter()
            .flat_map(|o| o.references.iter())
            .collect()
    }

    // --- diagnostics -------------------------------------------------------

    pub fn inconsistencies(&self) -> &[Inconsistency] {
        &self.inconsistencies
    }

    /// Orphan certificate and revocation targets together.
    pub fn orphan_count(&self) -> usize {
        self.orphan_certificates.len() + self.orphan_revocations.len()
    }
}
