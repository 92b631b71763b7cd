//! Domain layer for the validation process

pub mod context;
pub mod document;
pub mod entities;
pub mod errors;
pub mod report;

pub use context::{TrustedCertificates, ValidationContext};
pub use document::DocumentInput;
pub use entities::{
    CertificateChain, ChainLink, IdentificationMethod, ProcessState, RevocationAssessment,
    SigningCertificateIdentification,
};
pub use errors::ValidationError;
pub use report::{ChainReport, DocumentReport, ProcessReport, SignatureReport, TimestampReport};
