//! # Check Blocks
//!
//! Ordered groups of checks forming one basic building block. Children are
//! evaluated in declaration order; the first FAIL-level failure becomes the
//! block conclusion.

use super::check::{CheckResult, ConstraintCheck};
use super::message_tags::MessageTag;
use crate::policy::Level;
use serde::{Deserialize, Serialize};
use shared_types::{Indication, SubIndication};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Basic building block identifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockKind {
    /// Identification of the signing certificate
    Isc,
    /// Validation context initialization
    Vci,
    /// X.509 certificate validation
    Xcv,
    /// Validation of one certificate of the chain
    SubXcv,
    /// Cryptographic verification
    Cv,
    /// Signature acceptance validation
    Sav,
    /// Revocation data acceptance
    Rac,
}

impl BlockKind {
    pub fn code(&self) -> &'static str {
        match self {
            BlockKind::Isc => "ISC",
            BlockKind::Vci => "VCI",
            BlockKind::Xcv => "XCV",
            BlockKind::SubXcv => "SUB_XCV",
            BlockKind::Cv => "CV",
            BlockKind::Sav => "SAV",
            BlockKind::Rac => "RAC",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// What happens after a blocking failure.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProcessingMode {
    /// Stop at the first FAIL-level failure.
    #[default]
    StopOnFirstFailure,
    /// Keep evaluating for diagnostics; the first failure stays the conclusion.
    ReportAll,
}

impl FromStr for ProcessingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stop-on-first-failure" | "stop" => Ok(ProcessingMode::StopOnFirstFailure),
            "report-all" | "all" => Ok(ProcessingMode::ReportAll),
            other => Err(format!("unknown processing mode: {}", other)),
        }
    }
}

impl fmt::Display for ProcessingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessingMode::StopOnFirstFailure => f.write_str("stop-on-first-failure"),
            ProcessingMode::ReportAll => f.write_str("report-all"),
        }
    }
}

/// Child of a block.
#[derive(Clone, Debug)]
pub enum BlockChild {
    Check(ConstraintCheck),
    Block(CheckBlock),
}

/// Indication of a block or process plus the messages collected on the way.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conclusion {
    pub indication: Indication,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_indication: Option<SubIndication>,
    pub errors: Vec<MessageTag>,
    pub warnings: Vec<MessageTag>,
    pub infos: Vec<MessageTag>,
}

impl Conclusion {
    pub fn passed() -> Self {
        Self::with(Indication::Passed, None)
    }

    pub fn with(indication: Indication, sub_indication: Option<SubIndication>) -> Self {
        Self {
            indication,
            sub_indication,
            errors: Vec::new(),
            warnings: Vec::new(),
            infos: Vec::new(),
        }
    }

    pub fn is_passed(&self) -> bool {
        self.indication.is_passed()
    }

    /// Record a failed check at its level.
    fn record(&mut self, result: &CheckResult) {
        match result.level {
            Level::Fail => self.errors.push(result.error_message_tag),
            Level::Warn => self.warnings.push(result.error_message_tag),
            Level::Inform => self.infos.push(result.error_message_tag),
            Level::Ignore => {}
        }
    }

    /// Carry up the messages of a nested block, passed or not.
    fn absorb(&mut self, nested: &Conclusion) {
        self.errors.extend(nested.errors.iter().copied());
        self.warnings.extend(nested.warnings.iter().copied());
        self.infos.extend(nested.infos.iter().copied());
    }
}

/// Evaluated block.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockResult {
    pub kind: BlockKind,
    pub id: String,
    pub conclusion: Conclusion,
    pub checks: Vec<CheckResult>,
    pub sub_blocks: Vec<BlockResult>,
    /// Children left unevaluated after a stop.
    pub skipped: usize,
}

impl BlockResult {
    pub fn is_passed(&self) -> bool {
        self.conclusion.is_passed()
    }

    /// Own checks followed by those of nested blocks, depth first.
    pub fn all_checks(&self) -> Vec<&CheckResult> {
        let mut all: Vec<&CheckResult> = self.checks.iter().collect();
        for block in &self.sub_blocks {
            all.extend(block.all_checks());
        }
        all
    }

    pub fn failed_checks(&self) -> Vec<&CheckResult> {
        self.all_checks().into_iter().filter(|c| !c.passed).collect()
    }

    pub fn check(&self, name: &str) -> Option<&CheckResult> {
        self.all_checks().into_iter().find(|c| c.check == name)
    }
}

/// Ordered children of one building block.
#[derive(Clone, Debug)]
pub struct CheckBlock {
    pub kind: BlockKind,
    pub id: String,
    children: Vec<BlockChild>,
}

impl CheckBlock {
    pub fn new(kind: BlockKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
            children: Vec::new(),
        }
    }

    pub fn with_check(mut self, check: ConstraintCheck) -> Self {
        self.push_check(check);
        self
    }

    pub fn push_check(&mut self, check: ConstraintCheck) {
        self.children.push(BlockChild::Check(check));
    }

    pub fn push_block(&mut self, block: CheckBlock) {
        self.children.push(BlockChild::Block(block));
    }

    pub fn children(&self) -> &[BlockChild] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Evaluate children in order.
    ///
    /// The first failing FAIL-level check, or the first failing nested block,
    /// sets the conclusion. WARN and INFORM failures are recorded without
    /// changing the indication.
    pub fn evaluate(&self, mode: ProcessingMode) -> BlockResult {
        let mut conclusion = Conclusion::passed();
        let mut checks = Vec::new();
        let mut sub_blocks = Vec::new();
        let mut concluded = false;
        let mut skipped = 0;

        for (position, child) in self.children.iter().enumerate() {
            if concluded && mode == ProcessingMode::StopOnFirstFailure {
                skipped = self.children.len() - position;
                break;
            }
            match child {
                BlockChild::Check(check) => {
                    let result = check.evaluate();
                    if !result.passed {
                        conclusion.record(&result);
                        if result.is_blocking() && !concluded {
                            conclusion.indication = result.failure_indication;
                            conclusion.sub_indication = result.failure_sub_indication;
                            concluded = true;
                        }
                    }
                    checks.push(result);
                }
                BlockChild::Block(block) => {
                    let result = block.evaluate(mode);
                    conclusion.absorb(&result.conclusion);
                    if !result.is_passed() {
                        if !concluded {
                            conclusion.indication = result.conclusion.indication;
                            conclusion.sub_indication = result.conclusion.sub_indication;
                            concluded = true;
                        }
                    }
                    sub_blocks.push(result);
                }
            }
        }

        debug!(
            block = %self.kind,
            id = %self.id,
            indication = %conclusion.indication,
            skipped,
            "Block evaluated"
        );

        BlockResult {
            kind: self.kind,
            id: self.id.clone(),
            conclusion,
            checks,
            sub_blocks,
            skipped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::check::CheckKind;
    use crate::policy::Constraint;

    fn intact(value: bool, constraint: Constraint) -> ConstraintCheck {
        ConstraintCheck::new(CheckKind::SignatureIntact { intact: value }, Some(&constraint))
    }

    fn found(value: bool) -> ConstraintCheck {
        ConstraintCheck::new(CheckKind::ReferenceDataExistence { found: value }, Some(&Constraint::fail()))
    }

    fn time_present() -> ConstraintCheck {
        ConstraintCheck::new(
            CheckKind::SigningTime {
                signing_time: Some(chrono::Utc::now()),
            },
            Some(&Constraint::fail()),
        )
    }

    /// [A pass, B fail, C pass]
    fn abc() -> CheckBlock {
        CheckBlock::new(BlockKind::Cv, "S-1")
            .with_check(found(true))
            .with_check(intact(false, Constraint::fail()))
            .with_check(time_present())
    }

    /// B's failure concludes the block and C is never evaluated.
    #[test]
    fn test_stop_on_first_failure() {
        let result = abc().evaluate(ProcessingMode::StopOnFirstFailure);
        assert_eq!(result.conclusion.indication, Indication::Failed);
        assert_eq!(result.conclusion.sub_indication, Some(SubIndication::SigCryptoFailure));
        assert_eq!(result.checks.len(), 2);
        assert_eq!(result.skipped, 1);
        assert_eq!(result.conclusion.errors, vec![MessageTag::CvSignatureIntactAns]);
    }

    /// C is evaluated but does not change the conclusion.
    #[test]
    fn test_report_all() {
        let result = abc().evaluate(ProcessingMode::ReportAll);
        assert_eq!(result.conclusion.indication, Indication::Failed);
        assert_eq!(result.conclusion.sub_indication, Some(SubIndication::SigCryptoFailure));
        assert_eq!(result.checks.len(), 3);
        assert_eq!(result.skipped, 0);
        assert!(result.checks[2].passed);
    }

    /// Report-all keeps the first failure even when a later one differs.
    #[test]
    fn test_report_all_keeps_first_failure() {
        let block = CheckBlock::new(BlockKind::Cv, "S-1")
            .with_check(found(false))
            .with_check(intact(false, Constraint::fail()));
        let result = block.evaluate(ProcessingMode::ReportAll);
        assert_eq!(result.conclusion.indication, Indication::Indeterminate);
        assert_eq!(result.conclusion.sub_indication, Some(SubIndication::SignedDataNotFound));
        assert_eq!(result.conclusion.errors.len(), 2);
    }

    #[test]
    fn test_warn_does_not_change_indication() {
        let block = CheckBlock::new(BlockKind::Cv, "S-1")
            .with_check(intact(false, Constraint::warn()))
            .with_check(found(true));
        let result = block.evaluate(ProcessingMode::StopOnFirstFailure);
        assert!(result.is_passed());
        assert_eq!(result.conclusion.warnings, vec![MessageTag::CvSignatureIntactAns]);
        assert_eq!(result.checks.len(), 2);
    }

    #[test]
    fn test_inform_recorded() {
        let block = CheckBlock::new(BlockKind::Cv, "S-1").with_check(intact(false, Constraint::inform()));
        let result = block.evaluate(ProcessingMode::StopOnFirstFailure);
        assert!(result.is_passed());
        assert_eq!(result.conclusion.infos.len(), 1);
    }

    #[test]
    fn test_empty_block_passes() {
        let result = CheckBlock::new(BlockKind::Sav, "S-1").evaluate(ProcessingMode::ReportAll);
        assert_eq!(result.conclusion, Conclusion::passed());
    }

    /// A failing nested block concludes its parent.
    #[test]
    fn test_nested_block_propagates() {
        let mut inner = CheckBlock::new(BlockKind::SubXcv, "C-1");
        inner.push_check(intact(false, Constraint::fail()));
        let mut outer = CheckBlock::new(BlockKind::Xcv, "S-1");
        outer.push_check(found(true));
        outer.push_block(inner);
        outer.push_check(found(true));

        let result = outer.evaluate(ProcessingMode::StopOnFirstFailure);
        assert_eq!(result.conclusion.indication, Indication::Failed);
        assert_eq!(result.sub_blocks.len(), 1);
        assert_eq!(result.skipped, 1);
        assert_eq!(result.failed_checks().len(), 1);
        assert!(result.check("SignatureIntact").is_some());
    }

    /// Warnings and infos of a passing nested block reach the parent.
    #[test]
    fn test_nested_block_messages_carried_up() {
        let usages = ConstraintCheck::new(
            CheckKind::KeyUsage {
                usages: vec!["keyEncipherment".to_string()],
            },
            Some(&Constraint::warn().with_values(["nonRepudiation"])),
        );
        let mut inner = CheckBlock::new(BlockKind::SubXcv, "C-1");
        inner.push_check(usages);
        inner.push_check(intact(false, Constraint::inform()));
        let mut outer = CheckBlock::new(BlockKind::Xcv, "S-1");
        outer.push_block(inner);

        let result = outer.evaluate(ProcessingMode::StopOnFirstFailure);
        assert!(result.is_passed());
        assert_eq!(result.sub_blocks[0].conclusion.warnings, vec![MessageTag::XcvKeyUsageAns]);
        assert_eq!(result.conclusion.warnings, vec![MessageTag::XcvKeyUsageAns]);
        assert_eq!(result.conclusion.infos, vec![MessageTag::CvSignatureIntactAns]);
        assert!(result.conclusion.errors.is_empty());
    }

    #[test]
    fn test_processing_mode_parse() {
        assert_eq!("report-all".parse::<ProcessingMode>().unwrap(), ProcessingMode::ReportAll);
        assert_eq!(
            "Stop-On-First-Failure".parse::<ProcessingMode>().unwrap(),
            ProcessingMode::StopOnFirstFailure
        );
        assert!("sometimes".parse::<ProcessingMode>().is_err());
        assert_eq!(ProcessingMode::ReportAll.to_string(), "report-all");
    }
}
