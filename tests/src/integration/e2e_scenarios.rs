//! # End-to-End Scenarios
//!
//! One signature per scenario, validated through the public service API
//! at the default policy.

#[cfg(test)]
mod tests {
    use crate::fixtures::{
        certificate, certificate_with, digest_reference, revoked, service, signed_by, validation_time, Hierarchy,
    };
    use chrono::Duration;
    use dsv_01_evidence::{
        CertificateOrigin, CertificateRefOrigin, DigestMatcher, DigestMatcherKind, KeyUsage, ReconciliationLimits,
        RevocationOrigin, RevocationReason, SignatureFormat, SignatureInput, TokenIdentity,
    };
    use dsv_02_constraints::{MessageTag, ProcessingMode};
    use dsv_03_validation::{
        EngineConfig, IdentificationMethod, ProcessState, SignatureValidationApi, TrustedCertificates,
        ValidationError,
    };
    use shared_types::{Indication, SubIndication};
    use std::time::Instant;

    // =========================================================================
    // MINIMAL DOCUMENTS
    // =========================================================================

    /// One embedded, trusted signing certificate; no timestamps, no revocation data.
    #[test]
    fn test_minimal_signed_document_total_passed() {
        let signer = certificate("CN=Self Signed Signer", "CN=Self Signed Signer", 10);
        let input = signed_by("S-1", SignatureFormat::CAdES, &signer, CertificateOrigin::SignedData);

        let report = service(TrustedCertificates::new().with(signer.clone()))
            .validate_signature(&input)
            .unwrap();

        assert_eq!(report.indication, Indication::TotalPassed);
        assert_eq!(report.sub_indication, None);
        assert_eq!(report.orphan_count(), 0);
        assert_eq!(report.evidence.signature.related_certificates().len(), 1);
        assert!(report.signing_certificate_identified);
        assert_eq!(
            report.identification_method,
            Some(IdentificationMethod::SigningCertificateReference)
        );
        assert!(report.b_level_technically_valid);
        assert_eq!(report.process.final_state, ProcessState::Concluded);
    }

    /// A complete-certificate reference to a missing CA is an orphan and the
    /// chain cannot be built; never an error.
    #[test]
    fn test_orphan_complete_certificate_ref() {
        let signer = certificate("CN=Bob", "CN=Absent CA", 11);
        let mut input = signed_by("S-1", SignatureFormat::XAdES, &signer, CertificateOrigin::KeyInfo);
        input.certificate_source.add_reference(digest_reference(
            CertificateRefOrigin::CompleteCertificateRefs,
            b"absent-ca-der",
        ));

        let report = service(TrustedCertificates::new()).validate_signature(&input).unwrap();

        let found = &report.evidence.signature;
        assert_eq!(report.orphan_count(), 1);
        assert_eq!(
            found
                .orphan_certificates_by_ref_origin(CertificateRefOrigin::CompleteCertificateRefs)
                .len(),
            1
        );
        assert_eq!(report.indication, Indication::Indeterminate);
        assert_eq!(report.sub_indication, Some(SubIndication::NoCertificateChainFound));
        assert_eq!(report.process.final_state, ProcessState::Xcv);
    }

    // =========================================================================
    // CHAIN AND REVOCATION
    // =========================================================================

    #[test]
    fn test_full_chain_with_crls_passes() {
        let hierarchy = Hierarchy::new();
        let report = service(hierarchy.anchors())
            .validate_signature(&hierarchy.signature("S-1"))
            .unwrap();

        assert_eq!(report.indication, Indication::TotalPassed, "{:?}", report.process.first_blocking_failure());
        assert_eq!(
            report.chain.certificates,
            vec![hierarchy.signer.id(), hierarchy.ca.id(), hierarchy.root.id()]
        );
        assert!(report.chain.trusted);
        // signer and CA each judged one CRL
        assert_eq!(report.chain.revocation_acceptance.len(), 2);
        assert!(report.chain.revocation_acceptance.iter().all(|block| block.is_passed()));
    }

    /// A signer without nonRepudiation passes with the key-usage warning
    /// raised inside SubXCV visible on the process conclusion.
    #[test]
    fn test_signer_key_usage_warning_reaches_report() {
        let mut hierarchy = Hierarchy::new();
        hierarchy.signer = certificate_with("CN=Alice Signer,O=DSV,C=BE", "CN=Issuing CA,O=DSV,C=BE", 3, |info| {
            info.key_usages.insert(KeyUsage::DigitalSignature);
        });
        let report = service(hierarchy.anchors())
            .validate_signature(&hierarchy.signature("S-1"))
            .unwrap();

        assert_eq!(report.indication, Indication::TotalPassed);
        assert!(report.process.conclusion.warnings.contains(&MessageTag::XcvKeyUsageAns));
        assert!(report.process.conclusion.errors.is_empty());

        let json = serde_json::to_value(&report.process).unwrap();
        assert_eq!(json["finalState"], "CONCLUDED");
        let warnings = json["conclusion"]["warnings"].as_array().unwrap();
        assert!(warnings.iter().any(|tag| *tag == "BBB_XCV_ISCGKU_ANS"));
    }

    #[test]
    fn test_revoked_signer_indeterminate() {
        let hierarchy = Hierarchy::new();
        let mut input = hierarchy.signature("S-1");
        input.revocation_source.add_revocation(
            RevocationOrigin::RevocationValues,
            crate::fixtures::crl(
                "ca-crl-revoking",
                &hierarchy.ca,
                validation_time() - Duration::hours(6),
                vec![revoked(
                    &hierarchy.signer,
                    validation_time() - Duration::hours(12),
                    RevocationReason::KeyCompromise,
                )],
            ),
        );

        let report = service(hierarchy.anchors()).validate_signature(&input).unwrap();
        assert_eq!(report.indication, Indication::Indeterminate);
        assert_eq!(report.sub_indication, Some(SubIndication::RevokedNoPoe));
    }

    /// A hold is reported as such, not as a revocation.
    #[test]
    fn test_signer_on_hold() {
        let hierarchy = Hierarchy::new();
        let mut input = hierarchy.signature("S-1");
        input.revocation_source.add_revocation(
            RevocationOrigin::RevocationValues,
            crate::fixtures::crl(
                "ca-crl-hold",
                &hierarchy.ca,
                validation_time() - Duration::hours(6),
                vec![revoked(
                    &hierarchy.signer,
                    validation_time() - Duration::days(3),
                    RevocationReason::CertificateHold,
                )],
            ),
        );

        let report = service(hierarchy.anchors()).validate_signature(&input).unwrap();
        let xcv = report.process.stage(ProcessState::Xcv).unwrap();
        assert!(xcv.check("CertificateNotRevoked").is_some_and(|c| c.passed));
        assert!(xcv.check("CertificateNotOnHold").is_some_and(|c| !c.passed));
        assert_eq!(report.indication, Indication::Indeterminate);
        assert_eq!(report.sub_indication, Some(SubIndication::TryLater));
    }

    #[test]
    fn test_missing_revocation_data_try_later() {
        let hierarchy = Hierarchy::new();
        let mut input = signed_by("S-1", SignatureFormat::XAdES, &hierarchy.signer, CertificateOrigin::KeyInfo);
        input
            .certificate_source
            .add_certificate(CertificateOrigin::CertificateValues, hierarchy.ca.clone());

        let report = service(hierarchy.anchors()).validate_signature(&input).unwrap();
        assert_eq!(report.indication, Indication::Indeterminate);
        assert_eq!(report.sub_indication, Some(SubIndication::TryLater));
    }

    #[test]
    fn test_expired_signer_out_of_bounds() {
        let hierarchy = Hierarchy::new();
        let expired = certificate_with("CN=Expired", "CN=Issuing CA,O=DSV,C=BE", 12, |info| {
            info.not_before = validation_time() - Duration::days(400);
            info.not_after = validation_time() - Duration::days(30);
        });
        let mut input = signed_by("S-1", SignatureFormat::XAdES, &expired, CertificateOrigin::KeyInfo);
        input
            .certificate_source
            .add_certificate(CertificateOrigin::CertificateValues, hierarchy.ca.clone());

        let report = service(hierarchy.anchors()).validate_signature(&input).unwrap();
        assert_eq!(report.indication, Indication::Indeterminate);
        assert_eq!(report.sub_indication, Some(SubIndication::OutOfBoundsNoPoe));
    }

    // =========================================================================
    // CRYPTOGRAPHIC VERIFICATION AND ACCEPTANCE
    // =========================================================================

    #[test]
    fn test_altered_signed_data_total_failed() {
        let signer = certificate("CN=Carol", "CN=Carol", 13);
        let mut input = signed_by("S-1", SignatureFormat::XAdES, &signer, CertificateOrigin::KeyInfo);
        input.digest_matchers = vec![DigestMatcher {
            data_intact: false,
            ..DigestMatcher::intact(DigestMatcherKind::Reference)
        }];

        let report = service(TrustedCertificates::new().with(signer))
            .validate_signature(&input)
            .unwrap();
        assert_eq!(report.indication, Indication::TotalFailed);
        assert_eq!(report.sub_indication, Some(SubIndication::HashFailure));
        assert_eq!(report.process.final_state, ProcessState::Cv);
    }

    #[test]
    fn test_weak_signer_key_rejected() {
        let signer = certificate_with("CN=Dave", "CN=Dave", 14, |info| info.public_key_size_bits = 1024);
        let input = signed_by("S-1", SignatureFormat::CAdES, &signer, CertificateOrigin::SignedData);

        let report = service(TrustedCertificates::new().with(signer))
            .validate_signature(&input)
            .unwrap();
        assert_eq!(report.indication, Indication::Indeterminate);
        assert_eq!(report.sub_indication, Some(SubIndication::CryptoConstraintsFailureNoPoe));
        assert_eq!(report.process.final_state, ProcessState::Sav);
    }

    #[test]
    fn test_no_signing_certificate() {
        let input = SignatureInput::new("S-1", SignatureFormat::JAdES);
        let report = service(TrustedCertificates::new()).validate_signature(&input).unwrap();

        assert!(!report.signing_certificate_identified);
        assert_eq!(report.indication, Indication::Indeterminate);
        assert_eq!(report.sub_indication, Some(SubIndication::NoSigningCertificateFound));
        assert_eq!(report.process.final_state, ProcessState::Isc);
    }

    /// Report-all keeps the first failure as the conclusion.
    #[test]
    fn test_report_all_mode_full_detail() {
        let input = SignatureInput::new("S-1", SignatureFormat::JAdES);
        let report = service(TrustedCertificates::new())
            .with_config(EngineConfig::default().with_mode(ProcessingMode::ReportAll))
            .validate_signature(&input)
            .unwrap();

        assert_eq!(report.sub_indication, Some(SubIndication::NoSigningCertificateFound));
        assert_eq!(report.process.stages.len(), 5);
        assert_eq!(report.process.final_state, ProcessState::Concluded);
    }

    // =========================================================================
    // DETERMINISM AND BOUNDS
    // =========================================================================

    #[test]
    fn test_rerun_is_deterministic() {
        let hierarchy = Hierarchy::new();
        let service = service(hierarchy.anchors());
        let input = hierarchy.signature("S-1");

        let first = service.validate_signature(&input).unwrap();
        let second = service.validate_signature(&input).unwrap();
        assert_eq!(first.indication, second.indication);
        assert_eq!(first.sub_indication, second.sub_indication);
        assert_eq!(first.process, second.process);
        let origins = |report: &dsv_03_validation::SignatureReport| {
            report
                .evidence
                .pool
                .iter()
                .map(|token| (token.id(), token.origins().clone()))
                .collect::<Vec<_>>()
        };
        assert_eq!(origins(&first), origins(&second));
    }

    /// Many cross-referencing entries stay within the time budget.
    #[test]
    fn test_large_reference_set_bounded() {
        let signer = certificate("CN=Erin", "CN=Erin", 15);
        let mut input = signed_by("S-1", SignatureFormat::XAdES, &signer, CertificateOrigin::KeyInfo);
        for i in 0..400u64 {
            let extra = certificate(&format!("CN=Extra {}", i), "CN=Erin", 100 + i);
            input
                .certificate_source
                .add_certificate(CertificateOrigin::CertificateValues, extra.clone());
            input.certificate_source.add_reference(digest_reference(
                CertificateRefOrigin::CompleteCertificateRefs,
                extra.encoded(),
            ));
            input.certificate_source.add_reference(digest_reference(
                CertificateRefOrigin::CompleteCertificateRefs,
                format!("missing-{}", i).as_bytes(),
            ));
        }

        let started = Instant::now();
        let report = service(TrustedCertificates::new().with(signer))
            .validate_signature(&input)
            .unwrap();
        assert!(started.elapsed() < std::time::Duration::from_secs(5));
        assert_eq!(report.evidence.signature.related_certificates().len(), 401);
        assert_eq!(report.evidence.signature.orphan_count(), 400);
    }

    #[test]
    fn test_run_recorded_in_metrics() {
        let hierarchy = Hierarchy::new();
        service(hierarchy.anchors())
            .validate_signature(&hierarchy.signature("S-1"))
            .unwrap();

        let text = dsv_telemetry::encode_metrics().unwrap();
        assert!(text.contains("dsv_signatures_validated_total"));
        assert!(text.contains("dsv_validation_duration_seconds"));
    }

    #[test]
    fn test_oversized_input_rejected() {
        let signer = certificate("CN=Frank", "CN=Frank", 16);
        let input = signed_by("S-1", SignatureFormat::XAdES, &signer, CertificateOrigin::KeyInfo);
        let config = EngineConfig {
            limits: ReconciliationLimits {
                max_references: 0,
                ..Default::default()
            },
            ..Default::default()
        };

        let err = service(TrustedCertificates::new())
            .with_config(config)
            .validate_signature(&input)
            .unwrap_err();
        assert!(matches!(err, ValidationError::Evidence(_)));
    }
}
