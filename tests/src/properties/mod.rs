//! # Reconciliation Properties
//!
//! Randomized signatures with embedded, duplicated and dangling
//! references. Whatever the mix, every declared token and reference is
//! accounted for exactly once and reruns agree.

#[cfg(test)]
mod tests {
    use crate::fixtures::{certificate, digest_reference, service, validation_time, Hierarchy};
    use dsv_01_evidence::domain::invariants::check_owner_invariants;
    use dsv_01_evidence::{
        reconcile_signature, CertificateOrigin, CertificateRefOrigin, CertificateToken, ReconciliationLimits,
        ReferenceResolver, SignatureEvidence, SignatureFormat, SignatureInput, TimestampInput, TimestampType,
        TokenIdentity,
    };
    use dsv_03_validation::SignatureValidationApi;
    use proptest::prelude::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    const EMBED_ORIGINS: [CertificateOrigin; 4] = [
        CertificateOrigin::KeyInfo,
        CertificateOrigin::CertificateValues,
        CertificateOrigin::SignedData,
        CertificateOrigin::DssDictionary,
    ];

    const REF_ORIGINS: [CertificateRefOrigin; 3] = [
        CertificateRefOrigin::SigningCertificate,
        CertificateRefOrigin::CompleteCertificateRefs,
        CertificateRefOrigin::AttributeCertificateRefs,
    ];

    /// One certificate entry: which certificate, at which origin.
    fn arb_embedded() -> impl Strategy<Value = (usize, usize)> {
        (0usize..6, 0usize..EMBED_ORIGINS.len())
    }

    /// One reference: a certificate of the universe (or a dangling one past
    /// its end) and the declaring attribute.
    fn arb_reference() -> impl Strategy<Value = (usize, usize)> {
        (0usize..9, 0usize..REF_ORIGINS.len())
    }

    fn universe() -> Vec<Arc<CertificateToken>> {
        (0..6u64)
            .map(|i| certificate(&format!("CN=Holder {}", i), "CN=Property CA", i + 1))
            .collect()
    }

    fn build_input(
        universe: &[Arc<CertificateToken>],
        embedded: &[(usize, usize)],
        references: &[(usize, usize)],
        stamped: &[(usize, usize)],
    ) -> SignatureInput {
        let reference_to = |(target, origin): (usize, usize)| match universe.get(target) {
            Some(cert) => digest_reference(REF_ORIGINS[origin], cert.encoded()),
            None => digest_reference(REF_ORIGINS[origin], format!("dangling-{}", target).as_bytes()),
        };

        let mut input = SignatureInput::new("S-1", SignatureFormat::XAdES);
        for &(cert, origin) in embedded {
            input
                .certificate_source
                .add_certificate(EMBED_ORIGINS[origin], universe[cert].clone());
        }
        for &reference in references {
            input.certificate_source.add_reference(reference_to(reference));
        }

        if !stamped.is_empty() {
            let mut timestamp = TimestampInput::new("T-1", TimestampType::SignatureTimestamp, validation_time());
            for &(cert, origin) in stamped {
                timestamp
                    .certificate_source
                    .add_certificate(EMBED_ORIGINS[origin], universe[cert].clone());
                timestamp.certificate_source.add_reference(reference_to((cert + 1, origin % 3)));
            }
            input.timestamps.push(timestamp);
        }
        input
    }

    fn reconcile(input: &SignatureInput) -> SignatureEvidence {
        reconcile_signature(input, &ReconciliationLimits::default()).unwrap()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        // =================================================================
        // Accounting
        // =================================================================

        #[test]
        fn prop_every_owner_accounts_for_its_sources(
            embedded in prop::collection::vec(arb_embedded(), 0..10),
            references in prop::collection::vec(arb_reference(), 0..12),
            stamped in prop::collection::vec(arb_embedded(), 0..4),
        ) {
            let universe = universe();
            let input = build_input(&universe, &embedded, &references, &stamped);
            let evidence = reconcile(&input);

            prop_assert!(check_owner_invariants(
                &input.certificate_source,
                &input.revocation_source,
                &evidence.signature,
                &evidence.pool,
            ));
            for (timestamp, found) in input.timestamps.iter().zip(&evidence.timestamps) {
                prop_assert!(check_owner_invariants(
                    &timestamp.certificate_source,
                    &timestamp.revocation_source,
                    found,
                    &evidence.pool,
                ));
            }
        }

        #[test]
        fn prop_pool_holds_each_token_once(
            embedded in prop::collection::vec(arb_embedded(), 0..16),
            stamped in prop::collection::vec(arb_embedded(), 0..6),
        ) {
            let universe = universe();
            let input = build_input(&universe, &embedded, &[], &stamped);
            let evidence = reconcile(&input);

            let distinct: HashSet<_> = embedded
                .iter()
                .chain(stamped.iter())
                .map(|&(cert, _)| universe[cert].id())
                .collect();
            prop_assert_eq!(evidence.pool.len(), distinct.len());

            let origins: HashSet<_> = embedded.iter().map(|&(_, origin)| EMBED_ORIGINS[origin]).collect();
            let related_origins: HashSet<_> = evidence
                .signature
                .related_certificates()
                .iter()
                .flat_map(|related| related.origins.iter().copied())
                .collect();
            prop_assert_eq!(origins, related_origins);
        }

        // =================================================================
        // Resolution and reruns
        // =================================================================

        #[test]
        fn prop_resolution_is_idempotent(
            embedded in prop::collection::vec(arb_embedded(), 1..10),
            references in prop::collection::vec(arb_reference(), 1..12),
        ) {
            let universe = universe();
            let input = build_input(&universe, &embedded, &references, &[]);
            let evidence = reconcile(&input);
            let resolver = ReferenceResolver::new(&evidence.pool);

            for reference in input.certificate_source.references() {
                let first = resolver.resolve_certificate(reference);
                prop_assert_eq!(&first, &resolver.resolve_certificate(reference));
                let embedded_target = first
                    .resolution
                    .token_id()
                    .map(|id| evidence.pool.contains(id));
                prop_assert_ne!(embedded_target, Some(false));
            }
        }

        #[test]
        fn prop_reconciliation_is_deterministic(
            embedded in prop::collection::vec(arb_embedded(), 0..10),
            references in prop::collection::vec(arb_reference(), 0..12),
            stamped in prop::collection::vec(arb_embedded(), 0..4),
        ) {
            let universe = universe();
            let input = build_input(&universe, &embedded, &references, &stamped);
            let first = reconcile(&input);
            let second = reconcile(&input);

            let pooled = |evidence: &SignatureEvidence| {
                evidence
                    .pool
                    .iter()
                    .map(|token| (token.id(), token.origins().clone()))
                    .collect::<Vec<_>>()
            };
            prop_assert_eq!(pooled(&first), pooled(&second));

            let orphans = |evidence: &SignatureEvidence| {
                evidence
                    .owners()
                    .flat_map(|found| found.orphan_certificates().iter().map(|o| o.id.clone()))
                    .collect::<Vec<_>>()
            };
            prop_assert_eq!(orphans(&first), orphans(&second));
            prop_assert_eq!(first.orphan_count(), second.orphan_count());
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        /// Full validation agrees with itself across reruns, however many
        /// dangling references the signature declares.
        #[test]
        fn prop_validation_is_deterministic(dangling in 0usize..20) {
            let hierarchy = Hierarchy::new();
            let mut input = hierarchy.signature("S-1");
            for i in 0..dangling {
                input.certificate_source.add_reference(digest_reference(
                    CertificateRefOrigin::CompleteCertificateRefs,
                    format!("absent-{}", i).as_bytes(),
                ));
            }

            let service = service(hierarchy.anchors());
            let first = service.validate_signature(&input).unwrap();
            let second = service.validate_signature(&input).unwrap();

            prop_assert_eq!(first.indication, second.indication);
            prop_assert_eq!(first.sub_indication, second.sub_indication);
            prop_assert_eq!(&first.process, &second.process);
            prop_assert_eq!(first.orphan_count(), dangling);
        }
    }
}
