//! Algorithms module for Signature Validation
//!
//! Contains:
//! - Process state machine
//! - Signing certificate identification
//! - Certificate chain building
//! - Revocation data acceptance
//! - Building block stages and signature orchestration

pub mod chain_builder;
pub mod process;
pub mod revocation_acceptance;
pub mod signature_validation;
pub mod signer_identification;
pub mod stages;

pub use chain_builder::build_chain;
pub use process::ValidationProcess;
pub use revocation_acceptance::{assess_certificate, assess_chain};
pub use signature_validation::{validate_signature_evidence, validate_timestamp};
pub use signer_identification::{identify_signing_certificate, SignerHints};
pub use stages::{signature_process, timestamp_process};
