//! # Ports Layer (Hexagonal Architecture)

pub mod inbound;
pub mod outbound;

pub use inbound::SignatureValidationApi;
pub use outbound::{CertificateVerifier, TimeSource};
