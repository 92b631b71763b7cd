//! Public key algorithm families referenced by cryptographic constraints.

use crate::errors::CryptoError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Public key (encryption) algorithm of a signature or certificate key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EncryptionAlgorithm {
    /// RSA (PKCS#1 v1.5 or PSS)
    Rsa,
    /// ECDSA over a named curve
    Ecdsa,
    /// EdDSA (Ed25519 / Ed448)
    Eddsa,
    /// DSA
    Dsa,
}

impl EncryptionAlgorithm {
    /// Canonical name as used in validation policies.
    pub fn name(&self) -> &'static str {
        match self {
            EncryptionAlgorithm::Rsa => "RSA",
            EncryptionAlgorithm::Ecdsa => "ECDSA",
            EncryptionAlgorithm::Eddsa => "EdDSA",
            EncryptionAlgorithm::Dsa => "DSA",
        }
    }
}

impl Default for EncryptionAlgorithm {
    fn default() -> Self {
        EncryptionAlgorithm::Rsa
    }
}

impl fmt::Display for EncryptionAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EncryptionAlgorithm {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RSA" | "RSASSA-PSS" => Ok(EncryptionAlgorithm::Rsa),
            "ECDSA" | "EC" => Ok(EncryptionAlgorithm::Ecdsa),
            "EDDSA" | "ED25519" | "ED448" => Ok(EncryptionAlgorithm::Eddsa),
            "DSA" => Ok(EncryptionAlgorithm::Dsa),
            _ => Err(CryptoError::UnknownAlgorithm(s.to_string())),
        }
    }
}
