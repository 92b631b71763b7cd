//! # Signature Validation
//!
//! Runs the building blocks over reconciled evidence: timestamps first, then
//! the signature itself, then the technical validity levels.
//!
//! ## Levels
//!
//! | Level | Requires |
//! |-------|----------|
//! | B | Signature process passed |
//! | T | B plus a passed timestamp over the signature value |
//! | A | T plus a passed archive timestamp |

use super::chain_builder::build_chain;
use super::revocation_acceptance::assess_chain;
use super::signer_identification::{identify_signing_certificate, SignerHints};
use super::stages::{signature_process, timestamp_process, SignatureSubject, TimestampSubject};
use crate::domain::context::ValidationContext;
use crate::domain::entities::{CertificateChain, SigningCertificateIdentification};
use crate::domain::report::{ChainReport, SignatureReport, TimestampReport};
use dsv_01_evidence::{
    CertificateOrigin, FoundEvidence, SignatureEvidence, SignatureInput, TimestampInput, TokenStore,
};
use std::time::Instant;
use tracing::debug;

/// Identify the signer, then build and assess its chain.
fn prepare(
    found: &FoundEvidence,
    pool: &TokenStore,
    hints: SignerHints<'_>,
    ctx: &ValidationContext<'_>,
) -> (SigningCertificateIdentification, CertificateChain) {
    let identification = identify_signing_certificate(found, pool, hints);
    let chain = match &identification.certificate {
        Some(signing) => {
            let mut chain = build_chain(signing, pool, ctx);
            assess_chain(&mut chain, pool, ctx);
            chain
        }
        None => CertificateChain::default(),
    };
    (identification, chain)
}

fn chain_report(chain: &CertificateChain) -> ChainReport {
    ChainReport {
        certificates: chain.ids(),
        trusted: chain.trusted,
        revocation_acceptance: chain
            .links
            .iter()
            .flat_map(|link| link.revocation.acceptance.iter().cloned())
            .collect(),
    }
}

/// Validate one timestamp against the run's pool.
pub fn validate_timestamp(
    input: &TimestampInput,
    found: &FoundEvidence,
    pool: &TokenStore,
    ctx: &ValidationContext<'_>,
) -> TimestampReport {
    let hints = SignerHints {
        identifier: input.signer_identifier.as_ref(),
        key_material: CertificateOrigin::SignedData,
    };
    let (identification, chain) = prepare(found, pool, hints, ctx);
    let subject = TimestampSubject {
        input,
        identification,
        chain,
    };
    let process = timestamp_process().run(&subject, ctx);

    debug!(
        timestamp_id = %input.id,
        timestamp_type = ?input.timestamp_type,
        indication = %process.conclusion.indication,
        "Timestamp validated"
    );

    TimestampReport {
        id: input.id.clone(),
        timestamp_type: input.timestamp_type,
        production_time: input.production_time,
        signing_certificate: subject.identification.certificate_id(),
        chain: chain_report(&subject.chain),
        process,
    }
}

/// Validate a signature whose evidence is already reconciled.
pub fn validate_signature_evidence(
    input: &SignatureInput,
    evidence: SignatureEvidence,
    ctx: &ValidationContext<'_>,
    started: Instant,
) -> SignatureReport {
    let timestamps: Vec<TimestampReport> = input
        .timestamps
        .iter()
        .zip(evidence.timestamps.iter())
        .map(|(timestamp, found)| validate_timestamp(timestamp, found, &evidence.pool, ctx))
        .collect();

    let hints = SignerHints {
        identifier: input.signer_identifier.as_ref(),
        key_material: CertificateOrigin::KeyInfo,
    };
    let (identification, chain) = prepare(&evidence.signature, &evidence.pool, hints, ctx);
    let subject = SignatureSubject {
        input,
        identification,
        chain,
    };
    let process = signature_process().run(&subject, ctx);

    let b_level = process.is_passed();
    let t_level = b_level
        && timestamps
            .iter()
            .any(|ts| ts.is_passed() && ts.timestamp_type.covers_signature());
    let a_level = t_level
        && timestamps
            .iter()
            .any(|ts| ts.is_passed() && ts.timestamp_type.is_archival());

    SignatureReport {
        signature_id: input.id.clone(),
        format: input.format,
        indication: process.conclusion.indication.to_total(),
        sub_indication: process.conclusion.sub_indication,
        signing_certificate: subject.identification.certificate_id(),
        signing_certificate_identified: subject.identification.is_identified(),
        identification_method: subject.identification.method,
        chain: chain_report(&subject.chain),
        process,
        timestamps,
        b_level_technically_valid: b_level,
        t_level_technically_valid: t_level,
        a_level_technically_valid: a_level,
        evidence,
        validation_time: ctx.validation_time,
        duration: started.elapsed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::NameChainingVerifier;
    use crate::config::EngineConfig;
    use crate::domain::context::TrustedCertificates;
    use chrono::{DateTime, Duration as TimeDelta, TimeZone, Utc};
    use dsv_01_evidence::{
        reconcile_signature, CertificateInfo, CertificateRef, CertificateRefOrigin, CertificateToken,
        ReconciliationLimits, SignatureFormat, TimestampType, TokenIdentity,
    };
    use dsv_02_constraints::ValidationPolicy;
    use shared_crypto::{compute_digest, DigestAlgorithm};
    use shared_types::{Indication, SubIndication};
    use std::sync::Arc;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }

    fn root() -> Arc<CertificateToken> {
        Arc::new(
            CertificateToken::new(
                b"root".to_vec(),
                CertificateInfo {
                    subject_dn: "CN=Root".into(),
                    issuer_dn: "CN=Root".into(),
                    common_name: Some("Signer".into()),
                    not_before: at() - TimeDelta::days(365),
                    not_after: at() + TimeDelta::days(365),
                    public_key_size_bits: 2048,
                    ..Default::default()
                },
            )
            .unwrap(),
        )
    }

    /// Signature whose signing certificate is a trust anchor, referenced by digest.
    fn anchored_signature(signer: &Arc<CertificateToken>) -> SignatureInput {
        let mut input = SignatureInput::new("S-1", SignatureFormat::XAdES);
        input.signing_time = Some(at() - TimeDelta::hours(1));
        input.certificate_source.add_certificate(CertificateOrigin::KeyInfo, signer.clone());
        input.certificate_source.add_reference(CertificateRef::by_digest(
            CertificateRefOrigin::SigningCertificate,
            compute_digest(DigestAlgorithm::Sha256, signer.encoded()),
        ));
        input
    }

    fn validate(input: &SignatureInput, anchors: &TrustedCertificates) -> SignatureReport {
        let config = EngineConfig::default();
        let ctx = ValidationContext {
            policy: ValidationPolicy::default_policy(),
            config: &config,
            trust_anchors: anchors,
            verifier: &NameChainingVerifier,
            validation_time: at(),
        };
        let evidence = reconcile_signature(input, &ReconciliationLimits::default()).unwrap();
        validate_signature_evidence(input, evidence, &ctx, Instant::now())
    }

    #[test]
    fn test_anchored_signer_passes() {
        let signer = root();
        let report = validate(&anchored_signature(&signer), &TrustedCertificates::new().with(signer.clone()));

        assert_eq!(report.indication, Indication::TotalPassed);
        assert!(report.b_level_technically_valid);
        assert!(!report.t_level_technically_valid);
        assert_eq!(report.signing_certificate, Some(signer.id()));
        assert!(report.chain.trusted);
    }

    #[test]
    fn test_untrusted_signer_indeterminate() {
        let signer = root();
        let report = validate(&anchored_signature(&signer), &TrustedCertificates::new());

        assert_eq!(report.indication, Indication::Indeterminate);
        assert_eq!(report.sub_indication, Some(SubIndication::NoCertificateChainFound));
        assert!(!report.b_level_technically_valid);
    }

    /// A passed signature timestamp lifts the signature to T level.
    #[test]
    fn test_signature_timestamp_gives_t_level() {
        let signer = root();
        let mut input = anchored_signature(&signer);
        let mut timestamp = TimestampInput::new("T-1", TimestampType::SignatureTimestamp, at() - TimeDelta::minutes(5));
        timestamp
            .certificate_source
            .add_certificate(CertificateOrigin::SignedData, signer.clone());
        input.timestamps.push(timestamp);

        let report = validate(&input, &TrustedCertificates::new().with(signer));
        let timestamp = report.timestamp("T-1").unwrap();
        assert!(timestamp.is_passed());
        assert!(report.t_level_technically_valid);
        assert!(!report.a_level_technically_valid);
    }

    #[test]
    fn test_broken_timestamp_keeps_b_level() {
        let signer = root();
        let mut input = anchored_signature(&signer);
        let mut timestamp = TimestampInput::new("T-1", TimestampType::SignatureTimestamp, at());
        timestamp.message_imprint_intact = false;
        timestamp
            .certificate_source
            .add_certificate(CertificateOrigin::SignedData, signer.clone());
        input.timestamps.push(timestamp);

        let report = validate(&input, &TrustedCertificates::new().with(signer));
        assert_eq!(report.timestamp("T-1").unwrap().indication(), Indication::Failed);
        assert!(report.b_level_technically_valid);
        assert!(!report.t_level_technically_valid);
    }
}
