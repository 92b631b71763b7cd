//! Domain invariants for evidence reconciliation
//!
//! Accounting rules that must hold between an owner's raw sources and its
//! reconciled [`FoundEvidence`], plus store uniqueness.

use super::found::FoundEvidence;
use super::origins::{CertificateOrigin, CertificateRefOrigin, RevocationOrigin, RevocationRefOrigin};
use super::sources::{CertificateSource, RevocationSource};
use super::store::TokenStore;
use super::tokens::RevocationKind;
use std::collections::HashSet;

/// INVARIANT-1: Certificate origin accounting
/// For every origin, distinct raw certificates equal related plus orphan
/// certificates of that origin.
pub fn invariant_certificate_origin_accounting(source: &CertificateSource, found: &FoundEvidence) -> bool {
    CertificateOrigin::ALL.iter().all(|origin| {
        source.unique_count_by_origin(*origin)
            == found.related_certificates_by_origin(*origin).len()
                + found.orphan_certificates_by_origin(*origin).len()
    })
}

/// INVARIANT-2: Certificate reference accounting
/// Every declared reference is attached to exactly one related certificate
/// or orphan, and per reference origin the count matches.
pub fn invariant_certificate_reference_accounting(source: &CertificateSource, found: &FoundEvidence) -> bool {
    let total = found.related_certificate_references().len() + found.orphan_certificate_references().len();
    if total != source.reference_count() {
        return false;
    }
    CertificateRefOrigin::ALL.iter().all(|origin| {
        let declared = source.references_by_origin(*origin).count();
        let attached = found
            .related_certificate_references()
            .into_iter()
            .chain(found.orphan_certificate_references())
            .filter(|r| r.origin == *origin)
            .count();
        declared == attached
    })
}

/// INVARIANT-3: Revocation origin accounting
/// Per kind and origin, distinct raw revocation tokens equal related plus
/// orphan revocations.
pub fn invariant_revocation_origin_accounting(source: &RevocationSource, found: &FoundEvidence) -> bool {
    [RevocationKind::Ocsp, RevocationKind::Crl].iter().all(|kind| {
        RevocationOrigin::ALL.iter().all(|origin| {
            source.unique_count_by_origin(*kind, *origin)
                == found.related_revocations_by_kind_and_origin(*kind, *origin).len()
                    + found.orphan_revocations_by_kind_and_origin(*kind, *origin).len()
        })
    })
}

/// INVARIANT-4: Revocation reference accounting
pub fn invariant_revocation_reference_accounting(source: &RevocationSource, found: &FoundEvidence) -> bool {
    let total = found.related_revocation_references().len() + found.orphan_revocation_references().len();
    if total != source.reference_count() {
        return false;
    }
    RevocationRefOrigin::ALL.iter().all(|origin| {
        let declared = source.references_by_origin(*origin).count();
        let attached = found
            .related_revocation_references()
            .into_iter()
            .chain(found.orphan_revocation_references())
            .filter(|r| r.origin == *origin)
            .count();
        declared == attached
    })
}

/// INVARIANT-5: Single found token
/// Each identity appears once in the store and once among an owner's
/// related tokens.
pub fn invariant_single_found_token(store: &TokenStore, found: &FoundEvidence) -> bool {
    let mut seen = HashSet::new();
    if !store.iter().all(|t| seen.insert(t.id())) {
        return false;
    }
    let mut related = HashSet::new();
    found
        .related_certificates()
        .iter()
        .map(|r| r.id())
        .chain(found.related_revocations().iter().map(|r| r.id()))
        .all(|id| related.insert(id))
}

/// INVARIANT-6: Orphans carry no origin and at least one reference.
pub fn invariant_orphans_are_reference_only(found: &FoundEvidence) -> bool {
    found.orphan_certificates().iter().all(|o| !o.references.is_empty())
        && found.orphan_revocations().iter().all(|o| !o.references.is_empty())
}

/// All invariants for one owner.
pub fn check_owner_invariants(
    certificates: &CertificateSource,
    revocations: &RevocationSource,
    found: &FoundEvidence,
    store: &TokenStore,
) -> bool {
    invariant_certificate_origin_accounting(certificates, found)
        && invariant_certificate_reference_accounting(certificates, found)
        && invariant_revocation_origin_accounting(revocations, found)
        && invariant_revocation_reference_accounting(revocations, found)
        && invariant_single_found_token(store, found)
        && invariant_orphans_are_reference_only(found)
}
