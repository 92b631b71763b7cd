//! # Core Entities
//!
//! Identity values shared across the evidence and validation subsystems.
//!
//! ## Identifier Format
//!
//! Token identifiers render as `<prefix>-<UPPERCASE HEX>` where the prefix is
//! `C` for certificates and `R` for revocation data (OCSP responses and CRLs).
//! The hex part is the SHA-256 digest of the token's DER encoding.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 32-byte SHA-256 digest.
pub type Hash = [u8; 32];

/// Kind of a discovered token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    /// An X.509 certificate.
    Certificate,
    /// A basic OCSP response.
    Ocsp,
    /// A certificate revocation list.
    Crl,
}

impl TokenKind {
    /// Whether this kind carries revocation status.
    pub fn is_revocation(&self) -> bool {
        matches!(self, TokenKind::Ocsp | TokenKind::Crl)
    }

    /// Prefix used when rendering identifiers of this kind.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            TokenKind::Certificate => "C",
            TokenKind::Ocsp | TokenKind::Crl => "R",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Certificate => "CERTIFICATE",
            TokenKind::Ocsp => "OCSP",
            TokenKind::Crl => "CRL",
        };
        f.write_str(name)
    }
}

/// Stable identity of a certificate or revocation token.
///
/// Two tokens are the same token if and only if their kind and content
/// digest are equal. Ordering is total so identities can key ordered maps.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TokenId {
    kind: TokenKind,
    digest: Hash,
}

impl TokenId {
    /// Build an identity from an already computed content digest.
    pub fn new(kind: TokenKind, digest: Hash) -> Self {
        Self { kind, digest }
    }

    /// Token kind.
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// SHA-256 digest of the token's encoding.
    pub fn digest(&self) -> &Hash {
        &self.digest
    }

    /// Identifier as rendered in diagnostic output.
    pub fn as_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            self.kind.id_prefix(),
            hex::encode_upper(self.digest)
        )
    }
}

impl fmt::Debug for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Short form keeps test failure output readable.
        write!(
            f,
            "{}-{}",
            self.kind.id_prefix(),
            hex::encode_upper(&self.digest[..6])
        )
    }
}
