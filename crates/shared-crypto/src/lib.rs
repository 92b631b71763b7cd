//! # Shared Crypto - Digest Primitives
//!
//! Signature and key mathematics are provided by an external primitive
//! library. This crate only covers what the evidence layer computes itself:
//! content digests for token identity and digest-based reference matching.
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `hashing` | SHA-1, SHA-2, SHA-3 | Token identity, reference digests |
//! | `algorithms` | RSA, ECDSA, EdDSA, DSA | Key-size constraints |

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algorithms;
pub mod errors;
pub mod hashing;

// Re-exports
pub use algorithms::EncryptionAlgorithm;
pub use errors::CryptoError;
pub use hashing::{compute_digest, sha256, Digest, DigestAlgorithm};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
