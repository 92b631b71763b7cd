//! # Digest Computation
//!
//! One-shot digests over DER encodings.
//!
//! Token identity always uses SHA-256. Declared references may use any of the
//! algorithms below, so reference matching recomputes the token digest with
//! the algorithm the reference names.

use crate::errors::CryptoError;
use serde::{Deserialize, Serialize};
use sha2::Digest as _;
use std::fmt;
use std::str::FromStr;

/// Digest algorithms recognized in signed references.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DigestAlgorithm {
    /// SHA-1 (legacy, 20 bytes)
    Sha1,
    /// SHA-224
    Sha224,
    /// SHA-256
    Sha256,
    /// SHA-384
    Sha384,
    /// SHA-512
    Sha512,
    /// SHA3-256
    Sha3_256,
    /// SHA3-384
    Sha3_384,
    /// SHA3-512
    Sha3_512,
}

impl DigestAlgorithm {
    /// All supported algorithms, strongest last within each family.
    pub const ALL: [DigestAlgorithm; 8] = [
        DigestAlgorithm::Sha1,
        DigestAlgorithm::Sha224,
        DigestAlgorithm::Sha256,
        DigestAlgorithm::Sha384,
        DigestAlgorithm::Sha512,
        DigestAlgorithm::Sha3_256,
        DigestAlgorithm::Sha3_384,
        DigestAlgorithm::Sha3_512,
    ];

    /// Canonical name as used in validation policies.
    pub fn name(&self) -> &'static str {
        match self {
            DigestAlgorithm::Sha1 => "SHA1",
            DigestAlgorithm::Sha224 => "SHA224",
            DigestAlgorithm::Sha256 => "SHA256",
            DigestAlgorithm::Sha384 => "SHA384",
            DigestAlgorithm::Sha512 => "SHA512",
            DigestAlgorithm::Sha3_256 => "SHA3-256",
            DigestAlgorithm::Sha3_384 => "SHA3-384",
            DigestAlgorithm::Sha3_512 => "SHA3-512",
        }
    }

    /// Output length in bytes.
    pub fn output_len(&self) -> usize {
        match self {
            DigestAlgorithm::Sha1 => 20,
            DigestAlgorithm::Sha224 => 28,
            DigestAlgorithm::Sha256 | DigestAlgorithm::Sha3_256 => 32,
            DigestAlgorithm::Sha384 | DigestAlgorithm::Sha3_384 => 48,
            DigestAlgorithm::Sha512 | DigestAlgorithm::Sha3_512 => 64,
        }
    }

    /// Compute the digest of `data`.
    pub fn compute(&self, data: &[u8]) -> Vec<u8> {
        match self {
            DigestAlgorithm::Sha1 => sha1::Sha1::digest(data).to_vec(),
            DigestAlgorithm::Sha224 => sha2::Sha224::digest(data).to_vec(),
            DigestAlgorithm::Sha256 => sha2::Sha256::digest(data).to_vec(),
            DigestAlgorithm::Sha384 => sha2::Sha384::digest(data).to_vec(),
            DigestAlgorithm::Sha512 => sha2::Sha512::digest(data).to_vec(),
            DigestAlgorithm::Sha3_256 => sha3::Sha3_256::digest(data).to_vec(),
            DigestAlgorithm::Sha3_384 => sha3::Sha3_384::digest(data).to_vec(),
            DigestAlgorithm::Sha3_512 => sha3::Sha3_512::digest(data).to_vec(),
        }
    }
}

impl Default for DigestAlgorithm {
    fn default() -> Self {
        DigestAlgorithm::Sha256
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DigestAlgorithm {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('_', "-");
        let algorithm = match normalized.as_str() {
            "SHA1" | "SHA-1" => DigestAlgorithm::Sha1,
            "SHA224" | "SHA-224" => DigestAlgorithm::Sha224,
            "SHA256" | "SHA-256" => DigestAlgorithm::Sha256,
            "SHA384" | "SHA-384" => DigestAlgorithm::Sha384,
            "SHA512" | "SHA-512" => DigestAlgorithm::Sha512,
            "SHA3-256" => DigestAlgorithm::Sha3_256,
            "SHA3-384" => DigestAlgorithm::Sha3_384,
            "SHA3-512" => DigestAlgorithm::Sha3_512,
            _ => return Err(CryptoError::UnknownAlgorithm(s.to_string())),
        };
        Ok(algorithm)
    }
}

/// A digest value together with the algorithm that produced it.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Digest {
    /// Algorithm used
    pub algorithm: DigestAlgorithm,
    /// Raw digest bytes
    pub value: Vec<u8>,
}

impl Digest {
    /// Build a digest, checking the value length against the algorithm.
    pub fn new(algorithm: DigestAlgorithm, value: Vec<u8>) -> Result<Self, CryptoError> {
        if value.len() != algorithm.output_len() {
            return Err(CryptoError::InvalidDigestLength {
                algorithm: algorithm.name(),
                expected: algorithm.output_len(),
                actual: value.len(),
            });
        }
        Ok(Self { algorithm, value })
    }

    /// Parse a hex-encoded digest value.
    pub fn from_hex(algorithm: DigestAlgorithm, hex_value: &str) -> Result<Self, CryptoError> {
        let value = hex::decode(hex_value).map_err(|e| CryptoError::InvalidHex(e.to_string()))?;
        Self::new(algorithm, value)
    }

    /// Whether this digest was computed over `data`.
    pub fn matches(&self, data: &[u8]) -> bool {
        self.algorithm.compute(data) == self.value
    }

    /// Upper-case hex rendering of the value.
    pub fn to_hex(&self) -> String {
        hex::encode_upper(&self.value)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Compute a `Digest` of `data` with `algorithm`.
pub fn compute_digest(algorithm: DigestAlgorithm, data: &[u8]) -> Digest {
    Digest {
        algorithm,
        value: algorithm.compute(data),
    }
}

/// SHA-256 of `data` (token identity).
pub fn sha256(data: &[u8]) -> [u8; 32] {
    sha2::Sha256::digest(data).into()
}
