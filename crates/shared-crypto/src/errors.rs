//! Crypto error types.

use thiserror::Error;

/// Digest and algorithm errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CryptoError {
    /// Algorithm name not recognized
    #[error("Unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    /// Digest value length does not match the algorithm output size
    #[error("Invalid digest length for {algorithm}: expected {expected}, got {actual}")]
    InvalidDigestLength {
        /// Algorithm name
        algorithm: &'static str,
        /// Expected length in bytes
        expected: usize,
        /// Actual length in bytes
        actual: usize,
    },

    /// Hex decoding failed
    #[error("Invalid hex encoding: {0}")]
    InvalidHex(String),
}
