//! # Timestamp Scenarios
//!
//! Timestamps are validated with their own constraint set and lift a
//! passed signature to the T and A technical levels.

#[cfg(test)]
mod tests {
    use crate::fixtures::{certificate_with, digest_reference, service, timestamp, Hierarchy};
    use dsv_01_evidence::domain::invariants::check_owner_invariants;
    use dsv_01_evidence::{CertificateRefOrigin, CertificateToken, TimestampType};
    use dsv_03_validation::{ProcessState, SignatureValidationApi};
    use shared_types::Indication;
    use std::sync::Arc;

    fn tsa() -> Arc<CertificateToken> {
        certificate_with("CN=Time Stamping Unit,O=DSV,C=BE", "CN=Issuing CA,O=DSV,C=BE", 50, |info| {
            info.extended_key_usages.insert("timeStamping".to_string());
        })
    }

    // =========================================================================
    // TECHNICAL LEVELS
    // =========================================================================

    #[test]
    fn test_signature_and_archive_timestamps_reach_a_level() {
        let hierarchy = Hierarchy::new();
        let tsa = tsa();
        let mut input = hierarchy.signature("S-1");
        input
            .timestamps
            .push(timestamp("T-1", TimestampType::SignatureTimestamp, &tsa));
        input
            .timestamps
            .push(timestamp("T-2", TimestampType::ArchiveTimestamp, &tsa));

        let report = service(hierarchy.anchors()).validate_signature(&input).unwrap();

        assert_eq!(report.indication, Indication::TotalPassed);
        assert_eq!(report.timestamps.len(), 2);
        assert!(report.timestamps.iter().all(|ts| ts.is_passed()));
        assert_eq!(report.timestamp("T-1").unwrap().signing_certificate, Some(tsa.id()));
        assert!(report.b_level_technically_valid);
        assert!(report.t_level_technically_valid);
        assert!(report.a_level_technically_valid);
    }

    /// A content timestamp predates the signature value and proves nothing
    /// about it.
    #[test]
    fn test_content_timestamp_alone_gives_no_t_level() {
        let hierarchy = Hierarchy::new();
        let mut input = hierarchy.signature("S-1");
        input
            .timestamps
            .push(timestamp("T-1", TimestampType::ContentTimestamp, &tsa()));

        let report = service(hierarchy.anchors()).validate_signature(&input).unwrap();
        assert!(report.timestamp("T-1").unwrap().is_passed());
        assert!(report.b_level_technically_valid);
        assert!(!report.t_level_technically_valid);
        assert!(!report.a_level_technically_valid);
    }

    /// A references-only timestamp covers the validation data references,
    /// not the signature value.
    #[test]
    fn test_refs_only_timestamp_gives_no_t_level() {
        let hierarchy = Hierarchy::new();
        let mut input = hierarchy.signature("S-1");
        input.timestamps.push(timestamp(
            "T-1",
            TimestampType::ValidationDataRefsOnlyTimestamp,
            &tsa(),
        ));

        let report = service(hierarchy.anchors()).validate_signature(&input).unwrap();
        assert!(report.timestamp("T-1").unwrap().is_passed());
        assert!(report.b_level_technically_valid);
        assert!(!report.t_level_technically_valid);
    }

    #[test]
    fn test_altered_archive_timestamp_keeps_t_level() {
        let hierarchy = Hierarchy::new();
        let tsa = tsa();
        let mut input = hierarchy.signature("S-1");
        input
            .timestamps
            .push(timestamp("T-1", TimestampType::SignatureTimestamp, &tsa));
        let mut archive = timestamp("T-2", TimestampType::ArchiveTimestamp, &tsa);
        archive.message_imprint_intact = false;
        input.timestamps.push(archive);

        let report = service(hierarchy.anchors()).validate_signature(&input).unwrap();
        let archive = report.timestamp("T-2").unwrap();
        assert_eq!(archive.indication(), Indication::Failed);
        assert_eq!(archive.process.final_state, ProcessState::Cv);

        // a failed timestamp never changes the signature's own indication
        assert_eq!(report.indication, Indication::TotalPassed);
        assert!(report.t_level_technically_valid);
        assert!(!report.a_level_technically_valid);
    }

    #[test]
    fn test_untrusted_tsa_timestamp_indeterminate() {
        let hierarchy = Hierarchy::new();
        let rogue = certificate_with("CN=Rogue TSA", "CN=Rogue CA", 51, |_| {});
        let mut input = hierarchy.signature("S-1");
        input
            .timestamps
            .push(timestamp("T-1", TimestampType::SignatureTimestamp, &rogue));

        let report = service(hierarchy.anchors()).validate_signature(&input).unwrap();
        assert_eq!(report.timestamp("T-1").unwrap().indication(), Indication::Indeterminate);
        assert!(!report.t_level_technically_valid);
    }

    // =========================================================================
    // PER-TIMESTAMP EVIDENCE
    // =========================================================================

    /// Orphans declared by a timestamp stay with that timestamp.
    #[test]
    fn test_timestamp_orphan_stays_with_timestamp() {
        let hierarchy = Hierarchy::new();
        let tsa = tsa();
        let mut stamped = timestamp("T-1", TimestampType::SignatureTimestamp, &tsa);
        stamped.certificate_source.add_reference(digest_reference(
            CertificateRefOrigin::CompleteCertificateRefs,
            b"missing-tsa-ca",
        ));
        let mut input = hierarchy.signature("S-1");
        input.timestamps.push(stamped);

        let report = service(hierarchy.anchors()).validate_signature(&input).unwrap();
        let evidence = &report.evidence;
        let found = evidence.timestamp("T-1").unwrap();

        assert_eq!(found.orphan_count(), 1);
        assert_eq!(evidence.signature.orphan_count(), 0);
        assert_eq!(report.orphan_count(), 1);
        assert!(check_owner_invariants(
            &input.timestamps[0].certificate_source,
            &input.timestamps[0].revocation_source,
            found,
            &evidence.pool
        ));
        assert!(check_owner_invariants(
            &input.certificate_source,
            &input.revocation_source,
            &evidence.signature,
            &evidence.pool
        ));
    }

    /// The TSA certificate is pooled once even when two timestamps carry it.
    #[test]
    fn test_shared_tsa_certificate_pooled_once() {
        let hierarchy = Hierarchy::new();
        let tsa = tsa();
        let mut input = hierarchy.signature("S-1");
        input
            .timestamps
            .push(timestamp("T-1", TimestampType::SignatureTimestamp, &tsa));
        input
            .timestamps
            .push(timestamp("T-2", TimestampType::ValidationDataTimestamp, &tsa));

        let report = service(hierarchy.anchors()).validate_signature(&input).unwrap();
        let pooled = report
            .evidence
            .pool
            .iter()
            .filter(|token| token.id() == tsa.id())
            .count();
        assert_eq!(pooled, 1);
        assert_eq!(report.evidence.timestamps.len(), 2);
        assert!(report.evidence.signature.related_certificate(tsa.id()).is_none());
    }
}
