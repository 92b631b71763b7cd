//! # Validation Process State Machine
//!
//! A process is an ordered plan of stages. Each stage builds one check block
//! from the subject and the context; the machine evaluates the blocks in
//! order and concludes with the first hard failure.
//!
//! ## Transitions
//!
//! ```text
//! INITIALIZED → stage 1 → stage 2 → ... → CONCLUDED
//!                  │ FAIL-level failure (stop-on-first-failure)
//!                  └──────────────────────────────→ stop
//! ```
//!
//! In report-all mode every stage runs; the first failure stays the
//! conclusion and later stages only add diagnostics.

use crate::domain::context::ValidationContext;
use crate::domain::entities::ProcessState;
use crate::domain::report::ProcessReport;
use dsv_02_constraints::{CheckBlock, Conclusion, ProcessingMode};
use tracing::{debug, warn};

/// Builds the block of one stage.
pub type StageBuilder<S> = fn(&S, &ValidationContext<'_>) -> CheckBlock;

pub struct Stage<S> {
    pub state: ProcessState,
    pub build: StageBuilder<S>,
}

/// An ordered plan of stages over subject `S`.
pub struct ValidationProcess<S> {
    name: &'static str,
    stages: Vec<Stage<S>>,
}

impl<S> ValidationProcess<S> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            stages: Vec::new(),
        }
    }

    /// Append a stage. A stage that would move the machine backwards is
    /// dropped.
    pub fn with_stage(mut self, state: ProcessState, build: StageBuilder<S>) -> Self {
        let last = self
            .stages
            .last()
            .map(|stage| stage.state)
            .unwrap_or(ProcessState::Initialized);
        if last.can_transition_to(state) && state != ProcessState::Concluded {
            self.stages.push(Stage { state, build });
        } else {
            warn!(process = self.name, from = %last, to = %state, "Rejected stage out of order");
        }
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn states(&self) -> Vec<ProcessState> {
        self.stages.iter().map(|stage| stage.state).collect()
    }

    /// Run every stage in order under the context's processing mode.
    pub fn run(&self, subject: &S, ctx: &ValidationContext<'_>) -> ProcessReport {
        let mode = ctx.config.mode;
        let mut conclusion = Conclusion::passed();
        let mut stages = Vec::with_capacity(self.stages.len());
        let mut final_state = ProcessState::Concluded;

        for stage in &self.stages {
            let block = (stage.build)(subject, ctx).evaluate(mode);

            conclusion.warnings.extend(block.conclusion.warnings.iter().copied());
            conclusion.infos.extend(block.conclusion.infos.iter().copied());
            conclusion.errors.extend(block.conclusion.errors.iter().copied());

            let failed = !block.is_passed();
            if failed && conclusion.is_passed() {
                conclusion.indication = block.conclusion.indication;
                conclusion.sub_indication = block.conclusion.sub_indication;
            }
            debug!(
                process = self.name,
                state = %stage.state,
                indication = %block.conclusion.indication,
                "Stage evaluated"
            );
            stages.push((stage.state, block));

            if failed && mode == ProcessingMode::StopOnFirstFailure {
                final_state = stage.state;
                break;
            }
        }

        ProcessReport {
            stages,
            conclusion,
            final_state,
        }
    }
}
