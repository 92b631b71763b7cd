//! # Token Sources
//!
//! Raw per-origin token lists and declared references of one evidence
//! owner (a signature, a timestamp or an OCSP response), exactly as the
//! format adapter found them. Duplicates are kept: deduplication is the
//! job of the token store.

use super::origins::{CertificateOrigin, CertificateRefOrigin, RevocationOrigin, RevocationRefOrigin};
use super::references::{CertificateRef, RevocationRef};
use super::tokens::{CertificateToken, RevocationKind, RevocationToken};
use shared_types::TokenId;
use std::collections::HashSet;
use std::sync::Arc;

/// Certificates and certificate references of one owner.
#[derive(Clone, Debug, Default)]
pub struct CertificateSource {
    certificates: Vec<(CertificateOrigin, Arc<CertificateToken>)>,
    references: Vec<CertificateRef>,
}

impl CertificateSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_certificate(&mut self, origin: CertificateOrigin, certificate: impl Into<Arc<CertificateToken>>) {
        self.certificates.push((origin, certificate.into()));
    }

    pub fn add_reference(&mut self, reference: CertificateRef) {
        self.references.push(reference);
    }

    /// Builder form of [`add_certificate`](Self::add_certificate).
    pub fn with_certificate(
        mut self,
        origin: CertificateOrigin,
        certificate: impl Into<Arc<CertificateToken>>,
    ) -> Self {
        self.add_certificate(origin, certificate);
        self
    }

    /// Builder form of [`add_reference`](Self::add_reference).
    pub fn with_reference(mut self, reference: CertificateRef) -> Self {
        self.add_reference(reference);
        self
    }

    /// Every (origin, certificate) pair in discovery order.
    pub fn entries(&self) -> &[(CertificateOrigin, Arc<CertificateToken>)] {
        &self.certificates
    }

    pub fn references(&self) -> &[CertificateRef] {
        &self.references
    }

    /// Certificates found through `origin`, duplicates included.
    pub fn certificates_by_origin(
        &self,
        origin: CertificateOrigin,
    ) -> impl Iterator<Item = &Arc<CertificateToken>> + '_ {
        self.certificates
            .iter()
            .filter(move |(o, _)| *o == origin)
            .map(|(_, cert)| cert)
    }

    /// Distinct certificates found through `origin`.
    pub fn unique_count_by_origin(&self, origin: CertificateOrigin) -> usize {
        self.certificates_by_origin(origin)
            .map(|cert| cert.id())
            .collect::<HashSet<TokenId>>()
            .len()
    }

    /// Distinct certificates across all origins, in discovery order.
    pub fn unique_certificates(&self) -> Vec<&Arc<CertificateToken>> {
        let mut seen = HashSet::new();
        self.certificates
            .iter()
            .filter(|(_, cert)| seen.insert(cert.id()))
            .map(|(_, cert)| cert)
            .collect()
    }

    pub fn references_by_origin(
        &self,
        origin: CertificateRefOrigin,
    ) -> impl Iterator<Item = &CertificateRef> + '_ {
        self.references.iter().filter(move |r| r.origin == origin)
    }

    pub fn certificate_count(&self) -> usize {
        self.certificates.len()
    }

    pub fn reference_count(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.certificates.is_empty() && self.references.is_empty()
    }
}

/// Revocation tokens and revocation references of one owner.
#[derive(Clone, Debug, Default)]
pub struct RevocationSource {
    revocations: Vec<(RevocationOrigin, Arc<RevocationToken>)>,
    references: Vec<RevocationRef>,
}

impl RevocationSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_revocation(&mut self, origin: RevocationOrigin, revocation: impl Into<Arc<RevocationToken>>) {
        self.revocations.push((origin, revocation.into()));
    }

    pub fn add_reference(&mut self, reference: RevocationRef) {
        self.references.push(reference);
    }

    pub fn with_revocation(
        mut self,
        origin: RevocationOrigin,
        revocation: impl Into<Arc<RevocationToken>>,
    ) -> Self {
        self.add_revocation(origin, revocation);
        self
    }

    pub fn with_reference(mut self, reference: RevocationRef) -> Self {
        self.add_reference(reference);
        self
    }

    pub fn entries(&self) -> &[(RevocationOrigin, Arc<RevocationToken>)] {
        &self.revocations
    }

    pub fn references(&self) -> &[RevocationRef] {
        &self.references
    }

    pub fn revocations_by_origin(
        &self,
        kind: RevocationKind,
        origin: RevocationOrigin,
    ) -> impl Iterator<Item = &Arc<RevocationToken>> + '_ {
        self.revocations
            .iter()
            .filter(move |(o, r)| *o == origin && r.kind() == kind)
            .map(|(_, revocation)| revocation)
    }

    pub fn unique_count_by_origin(&self, kind: RevocationKind, origin: RevocationOrigin) -> usize {
        self.revocations_by_origin(kind, origin)
            .map(|r| r.id())
            .collect::<HashSet<TokenId>>()
            .len()
    }

    /// Distinct revocation tokens across all origins, in discovery order.
    pub fn unique_revocations(&self) -> Vec<&Arc<RevocationToken>> {
        let mut seen = HashSet::new();
        self.revocations
            .iter()
            .filter(|(_, r)| seen.insert(r.id()))
            .map(|(_, r)| r)
            .collect()
    }

    pub fn references_by_origin(
        &self,
        origin: RevocationRefOrigin,
    ) -> impl Iterator<Item = &RevocationRef> + '_ {
        self.references.iter().filter(move |r| r.origin == origin)
    }

    pub fn revocation_count(&self) -> usize {
        self.revocations.len()
    }

    pub fn reference_count(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.revocations.is_empty() && self.references.is_empty()
    }
}
