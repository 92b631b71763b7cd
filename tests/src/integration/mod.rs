//! # Integration Scenarios
//!
//! Full validation runs across evidence reconciliation, constraint
//! evaluation and the validation process.

pub mod e2e_scenarios;
pub mod pades_dss;
pub mod timestamps;
