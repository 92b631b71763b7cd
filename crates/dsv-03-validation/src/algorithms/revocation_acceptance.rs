//! Revocation data acceptance
//!
//! Every revocation token asserting a status for a chain certificate runs
//! through a one-stage process (RAC). The most recent accepted token decides
//! the certificate's revocation status.

use super::process::ValidationProcess;
use crate::domain::context::ValidationContext;
use crate::domain::entities::{CertificateChain, ProcessState, RevocationAssessment};
use dsv_01_evidence::{CertificateStatus, CertificateToken, RevocationKind, RevocationToken, TokenStore};
use dsv_02_constraints::{BlockKind, CheckBlock, CheckKind, ConstraintCheck, CryptoSubject};
use std::sync::Arc;
use tracing::debug;

/// One revocation token judged for one certificate.
pub struct RevocationSubject<'a> {
    pub revocation: &'a RevocationToken,
    pub certificate: &'a CertificateToken,
    /// Certificate that signed the revocation token, when found.
    pub issuer: Option<Arc<CertificateToken>>,
    pub status: CertificateStatus,
}

pub fn revocation_process<'a>() -> ValidationProcess<RevocationSubject<'a>> {
    ValidationProcess::new("revocation").with_stage(ProcessState::Rac, rac_block)
}

fn rac_block(subject: &RevocationSubject<'_>, ctx: &ValidationContext<'_>) -> CheckBlock {
    let constraints = &ctx.policy.revocation;
    let revocation = subject.revocation;
    let certificate = subject.certificate;

    let intact = match &subject.issuer {
        Some(issuer) => ctx.verifier.verify_revocation_signed_by(revocation, issuer),
        None => false,
    };
    let consistent =
        certificate.info.not_before <= revocation.info.this_update && revocation.info.this_update <= certificate.info.not_after;

    let mut block = CheckBlock::new(BlockKind::Rac, revocation.id().to_string());
    block.push_check(ConstraintCheck::new(
        CheckKind::RevocationIssuerKnown {
            known: subject.issuer.is_some(),
        },
        constraints.issuer_known.as_ref(),
    ));
    block.push_check(ConstraintCheck::new(
        CheckKind::RevocationSignatureIntact { intact },
        constraints.signature_intact.as_ref(),
    ));
    block.push_check(ConstraintCheck::new(
        CheckKind::RevocationConsistent { consistent },
        constraints.consistency.as_ref(),
    ));
    block.push_check(ConstraintCheck::new(
        CheckKind::RevocationFresh {
            this_update: revocation.info.this_update,
            validation_time: ctx.validation_time,
            max_age_secs: ctx.config.max_revocation_age_secs,
        },
        constraints.freshness.as_ref(),
    ));
    block.push_check(ConstraintCheck::cryptographic(
        CryptoSubject {
            digest_algorithm: Some(revocation.info.signature_digest_algorithm),
            encryption_algorithm: subject.issuer.as_ref().map(|i| i.info.public_key_algorithm),
            key_size_bits: subject.issuer.as_deref().and_then(super::stages::known_key_size),
        },
        &ctx.policy.cryptographic,
    ));
    block
}

/// Status `revocation` asserts for `certificate`. A CRL from the
/// certificate's issuer that does not list it asserts `Good`.
fn status_for(
    revocation: &RevocationToken,
    certificate: &CertificateToken,
    certificate_issuer: Option<&CertificateToken>,
) -> Option<CertificateStatus> {
    if let Some(status) = revocation.status_of(&certificate.issuer_serial()) {
        return Some(status.clone());
    }
    match (revocation.kind(), certificate_issuer) {
        (RevocationKind::Crl, Some(issuer)) if revocation.is_issued_by(issuer) => Some(CertificateStatus::Good),
        _ => None,
    }
}

fn find_revocation_issuer(
    revocation: &RevocationToken,
    pool: &TokenStore,
    ctx: &ValidationContext<'_>,
) -> Option<Arc<CertificateToken>> {
    ctx.trust_anchors
        .iter()
        .chain(pool.certificates())
        .find(|candidate| revocation.is_issued_by(candidate))
        .cloned()
}

/// Judge every revocation token covering `certificate`.
pub fn assess_certificate(
    certificate: &CertificateToken,
    certificate_issuer: Option<&CertificateToken>,
    pool: &TokenStore,
    ctx: &ValidationContext<'_>,
) -> RevocationAssessment {
    let process = revocation_process();
    let mut assessment = RevocationAssessment::default();
    let mut latest: Option<(Arc<RevocationToken>, CertificateStatus)> = None;

    for revocation in pool.revocations() {
        let Some(status) = status_for(revocation, certificate, certificate_issuer) else {
            continue;
        };
        let subject = RevocationSubject {
            revocation,
            certificate,
            issuer: find_revocation_issuer(revocation, pool, ctx),
            status,
        };
        let report = process.run(&subject, ctx);
        let accepted = report.is_passed();

        if accepted {
            let newer = latest
                .as_ref()
                .map_or(true, |(current, _)| revocation.info.this_update > current.info.this_update);
            if newer {
                latest = Some((revocation.clone(), subject.status.clone()));
            }
        }
        assessment.candidates.push(revocation.clone());
        assessment
            .acceptance
            .extend(report.stages.into_iter().map(|(_, block)| block));
    }

    if let Some((revocation, status)) = latest {
        assessment.latest_acceptable = Some(revocation);
        assessment.status = Some(status);
    }

    debug!(
        certificate = %certificate.id(),
        candidates = assessment.candidates.len(),
        acceptable = assessment.is_acceptable(),
        "Revocation data assessed"
    );
    assessment
}

/// Assess every link of `chain` that is not a trust anchor.
pub fn assess_chain(chain: &mut CertificateChain, pool: &TokenStore, ctx: &ValidationContext<'_>) {
    for link in chain.links.iter_mut().filter(|link| !link.trust_anchor) {
        link.revocation = assess_certificate(&link.certificate, link.issuer.as_deref(), pool, ctx);
    }
}
