//! # Reconciliation Benchmarks
//!
//! | Stage | Input | Target |
//! |-------|-------|--------|
//! | Reconciliation | 1000 tokens, 2000 references | < 1s |
//! | Full validation | same, three-level chain | < 5s |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dsv_01_evidence::{
    reconcile_signature, CertificateOrigin, CertificateRefOrigin, ReconciliationLimits, SignatureInput,
    TokenIdentity,
};
use dsv_03_validation::SignatureValidationApi;
use dsv_tests::fixtures::{certificate, digest_reference, service, Hierarchy};
use std::time::Duration;

/// Hierarchy signature padded with `extra` certificates, each referenced
/// twice, plus `extra` dangling references.
fn padded_signature(hierarchy: &Hierarchy, extra: usize) -> SignatureInput {
    let mut input = hierarchy.signature("S-1");
    for i in 0..extra {
        let cert = certificate(&format!("CN=Padding {}", i), "CN=Issuing CA,O=DSV,C=BE", 1_000 + i as u64);
        input
            .certificate_source
            .add_certificate(CertificateOrigin::CertificateValues, cert.clone());
        input.certificate_source.add_reference(digest_reference(
            CertificateRefOrigin::CompleteCertificateRefs,
            cert.encoded(),
        ));
        input.certificate_source.add_reference(digest_reference(
            CertificateRefOrigin::AttributeCertificateRefs,
            cert.encoded(),
        ));
        input.certificate_source.add_reference(digest_reference(
            CertificateRefOrigin::CompleteCertificateRefs,
            format!("dangling-{}", i).as_bytes(),
        ));
    }
    input
}

fn bench_reconciliation(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsv-01-reconciliation");
    group.measurement_time(Duration::from_secs(10));

    let hierarchy = Hierarchy::new();
    let limits = ReconciliationLimits::default();
    for size in [10usize, 100, 300, 600] {
        let input = padded_signature(&hierarchy, size);
        group.throughput(Throughput::Elements(input.reference_count() as u64));
        group.bench_with_input(BenchmarkId::new("reconcile_signature", size), &input, |b, input| {
            b.iter(|| black_box(reconcile_signature(input, &limits).map(|evidence| evidence.orphan_count())))
        });
    }

    group.finish();
}

fn bench_full_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsv-03-validation");
    group.sample_size(20);

    let hierarchy = Hierarchy::new();
    let service = service(hierarchy.anchors());
    for size in [0usize, 100, 600] {
        let input = padded_signature(&hierarchy, size);
        group.bench_with_input(BenchmarkId::new("validate_signature", size), &input, |b, input| {
            b.iter(|| black_box(service.validate_signature(input).map(|report| report.indication)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_reconciliation, bench_full_validation);
criterion_main!(benches);
