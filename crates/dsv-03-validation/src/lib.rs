//! # DSV-03: Signature Validation Process
//!
//! Runs the basic building blocks of AdES validation over reconciled
//! evidence and concludes one indication per signature.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Process
//!
//! ```text
//! INITIALIZED → ISC → VCI → XCV → CV → SAV → CONCLUDED
//! ```
//!
//! | Block | Question |
//! |-------|----------|
//! | ISC | Which certificate signed it? |
//! | VCI | Is the signature policy acceptable? |
//! | XCV | Does the signing certificate chain to a trust anchor? |
//! | CV | Are the signed data and signature value intact? |
//! | SAV | Do the signed attributes and algorithms meet the policy? |
//!
//! Timestamps run ISC, XCV, CV and SAV with their own constraints. Each
//! revocation token of a chain certificate runs RAC before it may decide
//! that certificate's status.
//!
//! ## Module Structure
//!
//! ```text
//! dsv-03-validation/
//! ├── domain/          # Process states, chains, reports, errors
//! ├── algorithms/      # State machine, identification, chains, blocks
//! ├── ports/           # API trait (inbound) + verifier and clock (outbound)
//! ├── adapters/        # Name-chaining verifier, clocks
//! ├── application/     # SignatureValidationService
//! └── config.rs        # EngineConfig
//! ```

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::{FixedTimeSource, NameChainingVerifier, SystemTimeSource};
pub use algorithms::{signature_process, timestamp_process, validate_signature_evidence, ValidationProcess};
pub use application::SignatureValidationService;
pub use config::EngineConfig;
pub use domain::{
    CertificateChain, ChainLink, ChainReport, DocumentInput, DocumentReport, IdentificationMethod, ProcessReport,
    ProcessState, RevocationAssessment, SignatureReport, SigningCertificateIdentification, TimestampReport,
    TrustedCertificates, ValidationContext, ValidationError,
};
pub use ports::{CertificateVerifier, SignatureValidationApi, TimeSource};
