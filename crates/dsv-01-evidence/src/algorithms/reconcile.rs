//! # Evidence Reconciliation
//!
//! Pure reduction from a [`SignatureInput`] to per-owner [`FoundEvidence`]:
//!
//! 1. Gather every token of the run into one pool (origins unioned).
//! 2. Index the pool once.
//! 3. For each owner (the signature, each timestamp, each revocation token
//!    carrying certificates), group its raw tokens by identity and attach
//!    each of its references to the token or orphan it resolves to.
//!
//! An owner's origins only come from its own sources. A reference may
//! resolve to a token located elsewhere in the run; such a token is related
//! to the owner without any origin.

use super::resolver::{ReferenceResolver, Resolution};
use crate::config::ReconciliationLimits;
use crate::domain::errors::EvidenceError;
use crate::domain::found::{
    EvidenceOwner, FoundEvidence, Inconsistency, OrphanCertificate, OrphanRevocation, RelatedCertificate,
    RelatedRevocation,
};
use crate::domain::origins::CertificateOrigin;
use crate::domain::references::OrphanId;
use crate::domain::signature::SignatureInput;
use crate::domain::sources::{CertificateSource, RevocationSource};
use crate::domain::store::TokenStore;
use shared_types::TokenId;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// Reconciled evidence of one signature.
#[derive(Clone, Debug)]
pub struct SignatureEvidence {
    pub signature: FoundEvidence,
    /// One entry per timestamp, in input order.
    pub timestamps: Vec<FoundEvidence>,
    /// One entry per distinct revocation token carrying certificates or a
    /// responder reference, in discovery order.
    pub revocations: Vec<FoundEvidence>,
    /// Every token of the run, deduplicated.
    pub pool: TokenStore,
}

impl SignatureEvidence {
    pub fn timestamp(&self, id: &str) -> Option<&FoundEvidence> {
        self.timestamps
            .iter()
            .find(|found| matches!(&found.owner, EvidenceOwner::Timestamp(ts) if ts == id))
    }

    pub fn revocation(&self, id: TokenId) -> Option<&FoundEvidence> {
        self.revocations
            .iter()
            .find(|found| found.owner == EvidenceOwner::Revocation(id))
    }

    /// All owners: signature first, then timestamps, then revocations.
    pub fn owners(&self) -> impl Iterator<Item = &FoundEvidence> + '_ {
        std::iter::once(&self.signature)
            .chain(self.timestamps.iter())
            .chain(self.revocations.iter())
    }

    pub fn inconsistencies(&self) -> impl Iterator<Item = &Inconsistency> + '_ {
        self.owners().flat_map(|found| found.inconsistencies().iter())
    }

    /// Orphan targets across all owners.
    pub fn orphan_count(&self) -> usize {
        self.owners().map(|found| found.orphan_count()).sum()
    }
}

/// Check input bounds before any work is done.
pub fn check_limits(input: &SignatureInput, limits: &ReconciliationLimits) -> Result<(), EvidenceError> {
    input.validate_contract()?;

    if input.timestamps.len() > limits.max_timestamps {
        return Err(EvidenceError::TooManyTimestamps {
            count: input.timestamps.len(),
            max: limits.max_timestamps,
        });
    }
    let tokens = input.token_entry_count();
    if tokens > limits.max_tokens {
        return Err(EvidenceError::TooManyTokens {
            count: tokens,
            max: limits.max_tokens,
        });
    }
    let references = input.reference_count();
    if references > limits.max_references {
        return Err(EvidenceError::TooManyReferences {
            count: references,
            max: limits.max_references,
        });
    }
    Ok(())
}

/// Every token of the signature, its timestamps and revocation data.
pub fn build_pool(input: &SignatureInput) -> TokenStore {
    let mut pool = TokenStore::new();
    collect_into(&mut pool, &input.certificate_source, &input.revocation_source);
    for timestamp in &input.timestamps {
        collect_into(&mut pool, &timestamp.certificate_source, &timestamp.revocation_source);
    }
    pool
}

fn collect_into(pool: &mut TokenStore, certificates: &CertificateSource, revocations: &RevocationSource) {
    for (origin, cert) in certificates.entries() {
        pool.add_certificate(cert.clone(), *origin);
    }
    for (origin, revocation) in revocations.entries() {
        pool.add_revocation(revocation.clone(), *origin);
        for (_, embedded) in revocation.info.certificate_source.entries() {
            pool.add_certificate(embedded.clone(), CertificateOrigin::BasicOcspResponse);
        }
    }
}

/// Reconcile one signature.
pub fn reconcile_signature(
    input: &SignatureInput,
    limits: &ReconciliationLimits,
) -> Result<SignatureEvidence, EvidenceError> {
    check_limits(input, limits)?;

    let pool = build_pool(input);
    let (signature, timestamps, revocations) = {
        let resolver = resolver_for(&pool, input);

        let signature = reconcile_owner(
            EvidenceOwner::Signature(input.id.clone()),
            &input.certificate_source,
            &input.revocation_source,
            &resolver,
        );
        let timestamps: Vec<FoundEvidence> = input
            .timestamps
            .iter()
            .map(|ts| {
                reconcile_owner(
                    EvidenceOwner::Timestamp(ts.id.clone()),
                    &ts.certificate_source,
                    &ts.revocation_source,
                    &resolver,
                )
            })
            .collect();

        let empty = RevocationSource::new();
        let revocations: Vec<FoundEvidence> = pool
            .revocations()
            .filter(|r| !r.info.certificate_source.is_empty())
            .map(|r| {
                reconcile_owner(
                    EvidenceOwner::Revocation(r.id()),
                    &r.info.certificate_source,
                    &empty,
                    &resolver,
                )
            })
            .collect();
        (signature, timestamps, revocations)
    };

    let evidence = SignatureEvidence {
        signature,
        timestamps,
        revocations,
        pool,
    };
    debug!(
        signature_id = %input.id,
        pool_size = evidence.pool.len(),
        orphans = evidence.orphan_count(),
        timestamps = evidence.timestamps.len(),
        "Reconciled signature evidence"
    );
    Ok(evidence)
}

fn resolver_for<'a>(pool: &'a TokenStore, input: &SignatureInput) -> ReferenceResolver<'a> {
    let mut certificate_refs = Vec::new();
    let mut revocation_refs = Vec::new();
    let mut gather = |certificates: &CertificateSource, revocations: &RevocationSource| {
        certificate_refs.extend(certificates.references().iter().cloned());
        revocation_refs.extend(revocations.references().iter().cloned());
    };
    gather(&input.certificate_source, &input.revocation_source);
    for ts in &input.timestamps {
        gather(&ts.certificate_source, &ts.revocation_source);
    }
    for revocation in pool.revocations() {
        certificate_refs.extend(revocation.info.certificate_source.references().iter().cloned());
    }
    ReferenceResolver::for_references(pool, certificate_refs.iter(), revocation_refs.iter())
}

/// Reconcile the sources of one owner against the run's resolver.
pub fn reconcile_owner(
    owner: EvidenceOwner,
    certificates: &CertificateSource,
    revocations: &RevocationSource,
    resolver: &ReferenceResolver<'_>,
) -> FoundEvidence {
    let owner_label = owner.to_string();
    let mut found = FoundEvidence::empty(owner);

    // Certificates carried by the owner.
    let mut cert_positions: HashMap<TokenId, usize> = HashMap::new();
    for (origin, cert) in certificates.entries() {
        let position = *cert_positions.entry(cert.id()).or_insert_with(|| {
            found.related_certificates.push(RelatedCertificate {
                certificate: cert.clone(),
                origins: BTreeSet::new(),
                references: Vec::new(),
            });
            found.related_certificates.len() - 1
        });
        found.related_certificates[position].origins.insert(*origin);
    }

    // Certificate references.
    let mut cert_orphans: HashMap<OrphanId, usize> = HashMap::new();
    for reference in certificates.references() {
        let resolved = resolver.resolve_certificate(reference);
        if let (true, Some(chosen)) = (resolved.is_ambiguous(), resolved.resolution.token_id()) {
            found.inconsistencies.push(Inconsistency::AmbiguousReference {
                owner: owner_label.clone(),
                candidates: resolved.candidates.clone(),
                chosen,
            });
        }
        let located = match &resolved.resolution {
            Resolution::Related(id) => cert_positions
                .get(id)
                .copied()
                .or_else(|| {
                    let cert = resolver.certificate(*id)?;
                    found.related_certificates.push(RelatedCertificate {
                        certificate: cert,
                        origins: BTreeSet::new(),
                        references: Vec::new(),
                    });
                    let position = found.related_certificates.len() - 1;
                    cert_positions.insert(*id, position);
                    Some(position)
                }),
            Resolution::Orphan(_) => None,
        };
        match located {
            Some(position) => found.related_certificates[position].references.push(reference.clone()),
            None => {
                let orphan_id = OrphanId::for_certificate(&reference.target);
                let position = *cert_orphans.entry(orphan_id.clone()).or_insert_with(|| {
                    found.orphan_certificates.push(OrphanCertificate {
                        id: orphan_id,
                        references: Vec::new(),
                    });
                    found.orphan_certificates.len() - 1
                });
                found.orphan_certificates[position].references.push(reference.clone());
            }
        }
    }

    // Revocation tokens carried by the owner.
    let mut revocation_positions: HashMap<TokenId, usize> = HashMap::new();
    for (origin, revocation) in revocations.entries() {
        let position = *revocation_positions.entry(revocation.id()).or_insert_with(|| {
            found.related_revocations.push(RelatedRevocation {
                revocation: revocation.clone(),
                origins: BTreeSet::new(),
                references: Vec::new(),
            });
            found.related_revocations.len() - 1
        });
        found.related_revocations[position].origins.insert(*origin);
    }

    // Revocation references.
    let mut revocation_orphans: HashMap<OrphanId, usize> = HashMap::new();
    for reference in revocations.references() {
        let resolved = resolver.resolve_revocation(reference);
        if let (true, Some(chosen)) = (resolved.is_ambiguous(), resolved.resolution.token_id()) {
            found.inconsistencies.push(Inconsistency::AmbiguousReference {
                owner: owner_label.clone(),
                candidates: resolved.candidates.clone(),
                chosen,
            });
        }
        let located = match &resolved.resolution {
            Resolution::Related(id) => revocation_positions
                .get(id)
                .copied()
                .or_else(|| {
                    let revocation = resolver.revocation(*id)?;
                    found.related_revocations.push(RelatedRevocation {
                        revocation,
                        origins: BTreeSet::new(),
                        references: Vec::new(),
                    });
                    let position = found.related_revocations.len() - 1;
                    revocation_positions.insert(*id, position);
                    Some(position)
                }),
            Resolution::Orphan(_) => None,
        };
        match located {
            Some(position) => found.related_revocations[position].references.push(reference.clone()),
            None => {
                let orphan_id = OrphanId::for_revocation(reference);
                let position = *revocation_orphans.entry(orphan_id.clone()).or_insert_with(|| {
                    found.orphan_revocations.push(OrphanRevocation {
                        id: orphan_id,
                        kind: reference.kind,
                        references: Vec::new(),
                    });
                    found.orphan_revocations.len() - 1
                });
                found.orphan_revocations[position].references.push(reference.clone());
            }
        }
    }

    found
}
