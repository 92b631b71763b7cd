//! # Reference Resolver
//!
//! Matches declared references against the tokens of a run.
//!
//! ## Complexity
//!
//! Digest and name indexes are built once per resolver, so building costs
//! O(tokens × digest algorithms in use) and each lookup is O(1) on average.
//! A digest algorithm that was not indexed up front falls back to a linear
//! scan, which keeps the O(references × tokens) worst case.
//!
//! ## Ambiguity
//!
//! A target matching more than one token resolves to the first discovered
//! token. The other candidates are reported so the caller can record the
//! inconsistency; resolution itself never fails.

use crate::domain::identity::{DistinguishedName, IssuerSerial, KeyIdentifier, ResponderId};
use crate::domain::references::{
    CertificateRef, CertificateRefTarget, OrphanId, Reference, RevocationRef, RevocationRefTarget,
};
use crate::domain::store::TokenStore;
use crate::domain::tokens::{CertificateToken, RevocationToken};
use shared_crypto::{Digest, DigestAlgorithm};
use shared_types::{TokenId, TokenKind};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::warn;

/// Classification of one reference.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Resolution {
    /// The target is a token of the run.
    Related(TokenId),
    /// No token of the run matches the target.
    Orphan(OrphanId),
}

impl Resolution {
    pub fn is_related(&self) -> bool {
        matches!(self, Resolution::Related(_))
    }

    pub fn token_id(&self) -> Option<TokenId> {
        match self {
            Resolution::Related(id) => Some(*id),
            Resolution::Orphan(_) => None,
        }
    }
}

/// Resolution plus every matching candidate in discovery order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedReference {
    pub resolution: Resolution,
    pub candidates: Vec<TokenId>,
}

impl ResolvedReference {
    fn from_candidates(candidates: Vec<TokenId>, orphan: impl FnOnce() -> OrphanId) -> Self {
        let resolution = match candidates.first() {
            Some(first) => Resolution::Related(*first),
            None => Resolution::Orphan(orphan()),
        };
        Self {
            resolution,
            candidates,
        }
    }

    /// More than one token matched the target.
    pub fn is_ambiguous(&self) -> bool {
        self.candidates.len() > 1
    }
}

type DigestKey = (DigestAlgorithm, Vec<u8>);

/// Indexed lookup of reference targets over one [`TokenStore`].
pub struct ReferenceResolver<'a> {
    store: &'a TokenStore,
    digests: HashMap<DigestKey, Vec<TokenId>>,
    indexed_algorithms: HashSet<DigestAlgorithm>,
    issuer_serials: HashMap<IssuerSerial, Vec<TokenId>>,
    subjects: HashMap<DistinguishedName, Vec<TokenId>>,
    key_identifiers: HashMap<KeyIdentifier, Vec<TokenId>>,
}

impl<'a> ReferenceResolver<'a> {
    /// Resolver indexing SHA-256 digests only.
    pub fn new(store: &'a TokenStore) -> Self {
        Self::with_algorithms(store, [DigestAlgorithm::Sha256])
    }

    /// Resolver indexing every algorithm the given references use.
    pub fn for_references<'r>(
        store: &'a TokenStore,
        certificate_refs: impl IntoIterator<Item = &'r CertificateRef>,
        revocation_refs: impl IntoIterator<Item = &'r RevocationRef>,
    ) -> Self {
        let mut algorithms: HashSet<DigestAlgorithm> = HashSet::new();
        algorithms.insert(DigestAlgorithm::Sha256);
        algorithms.extend(certificate_refs.into_iter().filter_map(|r| r.digest().map(|d| d.algorithm)));
        algorithms.extend(revocation_refs.into_iter().filter_map(|r| match &r.target {
            RevocationRefTarget::Digest(digest) => Some(digest.algorithm),
            RevocationRefTarget::OcspResponder { .. } => None,
        }));
        Self::with_algorithms(store, algorithms)
    }

    pub fn with_algorithms(store: &'a TokenStore, algorithms: impl IntoIterator<Item = DigestAlgorithm>) -> Self {
        let mut resolver = Self {
            store,
            digests: HashMap::new(),
            indexed_algorithms: HashSet::new(),
            issuer_serials: HashMap::new(),
            subjects: HashMap::new(),
            key_identifiers: HashMap::new(),
        };
        for algorithm in algorithms {
            resolver.index_algorithm(algorithm);
        }
        for cert in store.certificates() {
            let id = cert.id();
            resolver.issuer_serials.entry(cert.issuer_serial()).or_default().push(id);
            resolver
                .subjects
                .entry(cert.info.subject_dn.clone())
                .or_default()
                .push(id);
            if let Some(ski) = &cert.info.subject_key_identifier {
                resolver.key_identifiers.entry(ski.clone()).or_default().push(id);
            }
        }
        resolver
    }

    fn index_algorithm(&mut self, algorithm: DigestAlgorithm) {
        if !self.indexed_algorithms.insert(algorithm) {
            return;
        }
        for found in self.store.iter() {
            let id = found.id();
            let value = if algorithm == DigestAlgorithm::Sha256 {
                id.digest().to_vec()
            } else {
                algorithm.compute(found.token().encoded())
            };
            self.digests.entry((algorithm, value)).or_default().push(id);
        }
    }

    pub fn store(&self) -> &'a TokenStore {
        self.store
    }

    /// Tokens whose encoding has `digest`, in discovery order.
    fn by_digest(&self, digest: &Digest) -> Vec<TokenId> {
        if self.indexed_algorithms.contains(&digest.algorithm) {
            return self
                .digests
                .get(&(digest.algorithm, digest.value.clone()))
                .cloned()
                .unwrap_or_default();
        }
        self.store
            .iter()
            .filter(|found| digest.matches(found.token().encoded()))
            .map(|found| found.id())
            .collect()
    }

    pub fn resolve_certificate(&self, reference: &CertificateRef) -> ResolvedReference {
        let candidates: Vec<TokenId> = match &reference.target {
            CertificateRefTarget::Digest(digest) => self
                .by_digest(digest)
                .into_iter()
                .filter(|id| id.kind() == TokenKind::Certificate)
                .collect(),
            CertificateRefTarget::IssuerSerial(issuer_serial) => {
                self.issuer_serials.get(issuer_serial).cloned().unwrap_or_default()
            }
            CertificateRefTarget::Responder(ResponderId::ByName(name)) => {
                self.subjects.get(name).cloned().unwrap_or_default()
            }
            CertificateRefTarget::Responder(ResponderId::ByKey(key)) => {
                self.key_identifiers.get(key).cloned().unwrap_or_default()
            }
        };
        let resolved =
            ResolvedReference::from_candidates(candidates, || OrphanId::for_certificate(&reference.target));
        if resolved.is_ambiguous() {
            warn!(
                ref_origin = %reference.origin,
                candidates = resolved.candidates.len(),
                chosen = ?resolved.resolution,
                "Certificate reference matches several tokens, using first discovered"
            );
        }
        resolved
    }

    pub fn resolve_revocation(&self, reference: &RevocationRef) -> ResolvedReference {
        let kind: TokenKind = reference.kind.into();
        let candidates: Vec<TokenId> = match &reference.target {
            RevocationRefTarget::Digest(digest) => self
                .by_digest(digest)
                .into_iter()
                .filter(|id| id.kind() == kind)
                .collect(),
            RevocationRefTarget::OcspResponder {
                responder,
                produced_at,
            } => self
                .store
                .revocations()
                .filter(|r| {
                    r.id().kind() == kind
                        && r.info.responder_id.as_ref() == Some(responder)
                        && r.info.produced_at == *produced_at
                })
                .map(|r| r.id())
                .collect(),
        };
        let resolved = ResolvedReference::from_candidates(candidates, || OrphanId::for_revocation(reference));
        if resolved.is_ambiguous() {
            warn!(
                ref_origin = %reference.origin,
                candidates = resolved.candidates.len(),
                chosen = ?resolved.resolution,
                "Revocation reference matches several tokens, using first discovered"
            );
        }
        resolved
    }

    /// Classify any reference.
    pub fn resolve(&self, reference: &Reference) -> Resolution {
        match reference {
            Reference::Certificate(r) => self.resolve_certificate(r).resolution,
            Reference::Revocation(r) => self.resolve_revocation(r).resolution,
        }
    }

    pub fn certificate(&self, id: TokenId) -> Option<Arc<CertificateToken>> {
        self.store.get(id)?.token().as_certificate().cloned()
    }

    pub fn revocation(&self, id: TokenId) -> Option<Arc<RevocationToken>> {
        self.store.get(id)?.token().as_revocation().cloned()
    }
}
