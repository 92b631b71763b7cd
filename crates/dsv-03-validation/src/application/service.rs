//! Signature Validation Service
//!
//! Main service implementing SignatureValidationApi.

use crate::adapters::{NameChainingVerifier, SystemTimeSource};
use crate::algorithms::validate_signature_evidence;
use crate::config::EngineConfig;
use crate::domain::context::{TrustedCertificates, ValidationContext};
use crate::domain::document::DocumentInput;
use crate::domain::errors::ValidationError;
use crate::domain::report::{DocumentReport, SignatureReport};
use crate::ports::inbound::SignatureValidationApi;
use crate::ports::outbound::{CertificateVerifier, TimeSource};
use dsv_01_evidence::{reconcile_signature, CertificateToken, Inconsistency, SignatureEvidence, SignatureInput};
use dsv_02_constraints::{Level, ValidationPolicy};
use rayon::prelude::*;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

/// Signature Validation Service
///
/// Orchestrates one validation run per signature:
/// 1. Check the input contract
/// 2. Reconcile evidence into a deduplicated pool
/// 3. Validate timestamps, then the signature
/// 4. Record metrics and return the report
pub struct SignatureValidationService {
    policy: Arc<ValidationPolicy>,
    config: EngineConfig,
    trust_anchors: TrustedCertificates,
    verifier: Arc<dyn CertificateVerifier>,
    clock: Arc<dyn TimeSource>,
}

impl SignatureValidationService {
    /// Create a service with the default policy and configuration
    pub fn new() -> Self {
        Self {
            policy: Arc::new(ValidationPolicy::default_policy().clone()),
            config: EngineConfig::default(),
            trust_anchors: TrustedCertificates::new(),
            verifier: Arc::new(NameChainingVerifier),
            clock: Arc::new(SystemTimeSource),
        }
    }

    pub fn with_policy(mut self, policy: ValidationPolicy) -> Self {
        self.policy = Arc::new(policy);
        self
    }

    /// Load the policy from a JSON file.
    pub fn with_policy_file(self, path: impl AsRef<Path>) -> Result<Self, ValidationError> {
        let policy = ValidationPolicy::load(path)?;
        info!(policy = %policy.name, "Validation policy loaded");
        Ok(self.with_policy(policy))
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_trust_anchor(mut self, certificate: impl Into<Arc<CertificateToken>>) -> Self {
        self.trust_anchors.add(certificate);
        self
    }

    pub fn with_trust_anchors(mut self, anchors: TrustedCertificates) -> Self {
        self.trust_anchors = anchors;
        self
    }

    pub fn with_verifier(mut self, verifier: Arc<dyn CertificateVerifier>) -> Self {
        self.verifier = verifier;
        self
    }

    pub fn with_time_source(mut self, clock: Arc<dyn TimeSource>) -> Self {
        self.clock = clock;
        self
    }

    pub fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn context(&self) -> ValidationContext<'_> {
        ValidationContext {
            policy: &self.policy,
            config: &self.config,
            trust_anchors: &self.trust_anchors,
            verifier: self.verifier.as_ref(),
            validation_time: self.clock.now(),
        }
    }

    fn log_inconsistencies(evidence: &SignatureEvidence) {
        for inconsistency in evidence.inconsistencies() {
            match inconsistency {
                Inconsistency::AmbiguousReference {
                    owner,
                    candidates,
                    chosen,
                } => warn!(
                    owner = %owner,
                    candidates = candidates.len(),
                    chosen = %chosen,
                    "Ambiguous reference, first discovered token chosen"
                ),
            }
        }
    }

    fn record_metrics(report: &SignatureReport) {
        dsv_telemetry::record_signature(&report.indication.to_string(), report.duration.as_secs_f64());

        let (certificates, revocations) = report.evidence.owners().fold((0, 0), |(c, r), found| {
            (c + found.orphan_certificates().len(), r + found.orphan_revocations().len())
        });
        dsv_telemetry::record_orphans("certificate", certificates);
        dsv_telemetry::record_orphans("revocation", revocations);

        for check in report.process.all_checks().into_iter().filter(|c| !c.passed && c.evaluated) {
            if check.level != Level::Ignore {
                dsv_telemetry::record_failed_check(&check.level.to_string());
            }
        }
    }
}

impl Default for SignatureValidationService {
    fn default() -> Self {
        Self::new()
    }
}

impl SignatureValidationApi for SignatureValidationService {
    fn validate_signature(&self, input: &SignatureInput) -> Result<SignatureReport, ValidationError> {
        let run_id = Uuid::new_v4();
        let span = info_span!("validate_signature", %run_id, signature_id = %input.id);
        let _enter = span.enter();
        let started = Instant::now();

        // 1. Contract
        input.validate_contract()?;

        // 2. Reconcile
        let evidence = reconcile_signature(input, &self.config.limits)?;
        Self::log_inconsistencies(&evidence);
        debug!(
            pool_size = evidence.pool.len(),
            orphans = evidence.orphan_count(),
            "Evidence reconciled"
        );

        // 3. Validate
        let ctx = self.context();
        let report = validate_signature_evidence(input, evidence, &ctx, started);

        // 4. Record
        Self::record_metrics(&report);
        info!(
            indication = %report.indication,
            sub_indication = ?report.sub_indication,
            timestamps = report.timestamps.len(),
            b_level = report.b_level_technically_valid,
            t_level = report.t_level_technically_valid,
            a_level = report.a_level_technically_valid,
            duration_ms = report.duration.as_millis() as u64,
            "Signature validation complete"
        );

        Ok(report)
    }

    fn validate_document(&self, document: &DocumentInput) -> Result<DocumentReport, ValidationError> {
        let started = Instant::now();
        document.validate_contract()?;

        let inputs = document.signature_inputs();
        dsv_telemetry::log_event!(
            info,
            "validation",
            "Validating document",
            document = %document.document_name,
            signatures = inputs.len()
        );

        let signatures = inputs
            .par_iter()
            .map(|input| self.validate_signature(input))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DocumentReport {
            document_name: document.document_name.clone(),
            signatures,
            duration: started.elapsed(),
        })
    }

    fn validate_batch(&self, documents: &[DocumentInput]) -> Vec<Result<DocumentReport, ValidationError>> {
        dsv_telemetry::log_event!(info, "validation", "Validating batch", documents = documents.len());
        documents
            .par_iter()
            .map(|document| self.validate_document(document))
            .collect()
    }
}
