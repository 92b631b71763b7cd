//! # Validation Reports
//!
//! Results handed to the report assembler: one conclusion per process plus
//! the block detail and reconciled evidence behind it.

use super::entities::{IdentificationMethod, ProcessState};
use dsv_01_evidence::{SignatureEvidence, SignatureFormat, TimestampType};
use dsv_02_constraints::{BlockResult, CheckResult, Conclusion};
use chrono::{DateTime, Utc};
use serde::Serialize;
use shared_types::{Indication, SubIndication, TokenId};
use std::time::Duration;

/// Outcome of one run of the process state machine.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessReport {
    /// Blocks evaluated, in visiting order.
    pub stages: Vec<(ProcessState, BlockResult)>,
    pub conclusion: Conclusion,
    /// Last state reached; `Concluded` unless the process stopped early.
    pub final_state: ProcessState,
}

impl ProcessReport {
    pub fn is_passed(&self) -> bool {
        self.conclusion.is_passed()
    }

    pub fn stage(&self, state: ProcessState) -> Option<&BlockResult> {
        self.stages.iter().find(|(s, _)| *s == state).map(|(_, block)| block)
    }

    pub fn all_checks(&self) -> Vec<&CheckResult> {
        self.stages.iter().flat_map(|(_, block)| block.all_checks()).collect()
    }

    /// First FAIL-level check that did not pass.
    pub fn first_blocking_failure(&self) -> Option<&CheckResult> {
        self.all_checks().into_iter().find(|check| check.is_blocking())
    }
}

/// Certificate chain of a signature or timestamp.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainReport {
    /// Signing certificate first.
    pub certificates: Vec<TokenId>,
    pub trusted: bool,
    /// Revocation acceptance blocks of every chain certificate.
    pub revocation_acceptance: Vec<BlockResult>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimestampReport {
    pub id: String,
    pub timestamp_type: TimestampType,
    pub production_time: DateTime<Utc>,
    pub signing_certificate: Option<TokenId>,
    pub chain: ChainReport,
    pub process: ProcessReport,
}

impl TimestampReport {
    pub fn indication(&self) -> Indication {
        self.process.conclusion.indication
    }

    pub fn is_passed(&self) -> bool {
        self.process.is_passed()
    }
}

/// Per-signature result.
#[derive(Clone, Debug)]
pub struct SignatureReport {
    pub signature_id: String,
    pub format: SignatureFormat,
    /// `TOTAL_PASSED`, `TOTAL_FAILED` or `INDETERMINATE`.
    pub indication: Indication,
    pub sub_indication: Option<SubIndication>,
    pub process: ProcessReport,
    pub signing_certificate: Option<TokenId>,
    pub signing_certificate_identified: bool,
    pub identification_method: Option<IdentificationMethod>,
    pub chain: ChainReport,
    pub timestamps: Vec<TimestampReport>,
    pub b_level_technically_valid: bool,
    pub t_level_technically_valid: bool,
    pub a_level_technically_valid: bool,
    /// Reconciled tokens of the signature, its timestamps and revocation data.
    pub evidence: SignatureEvidence,
    pub validation_time: DateTime<Utc>,
    pub duration: Duration,
}

impl SignatureReport {
    pub fn is_total_passed(&self) -> bool {
        self.indication == Indication::TotalPassed
    }

    pub fn timestamp(&self, id: &str) -> Option<&TimestampReport> {
        self.timestamps.iter().find(|ts| ts.id == id)
    }

    pub fn orphan_count(&self) -> usize {
        self.evidence.orphan_count()
    }
}

/// Reports of every signature of a document, in input order.
#[derive(Clone, Debug)]
pub struct DocumentReport {
    pub document_name: String,
    pub signatures: Vec<SignatureReport>,
    pub duration: Duration,
}

impl DocumentReport {
    pub fn signature(&self, id: &str) -> Option<&SignatureReport> {
        self.signatures.iter().find(|s| s.signature_id == id)
    }

    /// Every signature concluded `TOTAL_PASSED`.
    pub fn all_passed(&self) -> bool {
        !self.signatures.is_empty() && self.signatures.iter().all(SignatureReport::is_total_passed)
    }
}
