//! # Token Identity
//!
//! Canonical identity and equality of certificates and revocation data.
//!
//! A token is identified by the SHA-256 digest of its DER encoding together
//! with its kind. References identify their targets through other schemes
//! (issuer and serial, responder name or key hash), so this module also holds
//! the normalized forms those schemes compare.

use serde::{Deserialize, Serialize};
use shared_crypto::sha256;
use shared_types::{ContractError, TokenId, TokenKind};
use std::fmt;

/// Anything with a stable content identity.
pub trait TokenIdentity {
    /// Identity derived from the encoding.
    fn token_id(&self) -> TokenId;

    /// Raw DER encoding the identity was derived from.
    fn encoded(&self) -> &[u8];

    /// Token kind.
    fn kind(&self) -> TokenKind {
        self.token_id().kind()
    }
}

/// Derive the identity of a token from its binary form.
///
/// The only failure is an empty encoding, which a format adapter must never
/// hand over.
pub fn derive_token_id(kind: TokenKind, encoded: &[u8]) -> Result<TokenId, ContractError> {
    if encoded.is_empty() {
        return Err(ContractError::EmptyEncoding(kind_label(kind)));
    }
    Ok(TokenId::new(kind, sha256(encoded)))
}

fn kind_label(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::Certificate => "certificate",
        TokenKind::Ocsp => "OCSP",
        TokenKind::Crl => "CRL",
    }
}

// =============================================================================
// DISTINGUISHED NAMES
// =============================================================================

/// An X.500 distinguished name in RFC 4514 string form.
///
/// Equality ignores attribute-type case, value case and redundant
/// whitespace, which is how the name comparisons of certificate path
/// processing behave in practice for string-typed attributes.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct DistinguishedName {
    raw: String,
    normalized: String,
}

impl DistinguishedName {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let normalized = normalize_dn(&raw);
        Self { raw, normalized }
    }

    /// Name as supplied.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Comparison form.
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }

    /// First value of the given attribute type (e.g. `CN`), if any.
    pub fn attribute(&self, attribute_type: &str) -> Option<String> {
        split_rdns(&self.raw).into_iter().find_map(|rdn| {
            let (ty, value) = rdn.split_once('=')?;
            if ty.trim().eq_ignore_ascii_case(attribute_type) {
                Some(unescape(value.trim()))
            } else {
                None
            }
        })
    }
}

impl PartialEq for DistinguishedName {
    fn eq(&self, other: &Self) -> bool {
        self.normalized == other.normalized
    }
}

impl Eq for DistinguishedName {}

impl std::hash::Hash for DistinguishedName {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.normalized.hash(state);
    }
}

impl PartialOrd for DistinguishedName {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DistinguishedName {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.normalized.cmp(&other.normalized)
    }
}

impl From<String> for DistinguishedName {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl From<&str> for DistinguishedName {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<DistinguishedName> for String {
    fn from(dn: DistinguishedName) -> Self {
        dn.raw
    }
}

impl fmt::Display for DistinguishedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl fmt::Debug for DistinguishedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DN({})", self.raw)
    }
}

/// Split on RDN separators, honouring backslash escapes.
fn split_rdns(raw: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut escaped = false;
    for (i, c) in raw.char_indices() {
        match c {
            '\\' if !escaped => escaped = true,
            ',' | ';' if !escaped => {
                parts.push(&raw[start..i]);
                start = i + 1;
            }
            _ => escaped = false,
        }
    }
    parts.push(&raw[start..]);
    parts.retain(|p| !p.trim().is_empty());
    parts
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut escaped = false;
    for c in value.chars() {
        if c == '\\' && !escaped {
            escaped = true;
            continue;
        }
        escaped = false;
        out.push(c);
    }
    out
}

fn normalize_dn(raw: &str) -> String {
    split_rdns(raw)
        .into_iter()
        .map(|rdn| match rdn.split_once('=') {
            Some((ty, value)) => format!(
                "{}={}",
                ty.trim().to_ascii_uppercase(),
                collapse_whitespace(value).to_lowercase()
            ),
            None => collapse_whitespace(rdn).to_lowercase(),
        })
        .collect::<Vec<_>>()
        .join(",")
}

fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

// =============================================================================
// SERIAL NUMBERS AND KEY IDENTIFIERS
// =============================================================================

/// Certificate serial number as unsigned big-endian bytes.
///
/// Leading zero bytes are not significant.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SerialNumber(Vec<u8>);

impl SerialNumber {
    pub fn new(bytes: impl AsRef<[u8]>) -> Self {
        let bytes = bytes.as_ref();
        let first = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
        Self(bytes[first..].to_vec())
    }

    pub fn from_u64(value: u64) -> Self {
        Self::new(value.to_be_bytes())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        if self.0.is_empty() {
            return "00".to_string();
        }
        hex::encode_upper(&self.0)
    }
}

impl fmt::Display for SerialNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for SerialNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Serial({})", self.to_hex())
    }
}

/// Subject or authority key identifier.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct KeyIdentifier(pub Vec<u8>);

impl fmt::Debug for KeyIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyId({})", hex::encode_upper(&self.0))
    }
}

/// Issuer name plus serial number: the classic certificate designator.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IssuerSerial {
    pub issuer: DistinguishedName,
    pub serial_number: SerialNumber,
}

impl IssuerSerial {
    pub fn new(issuer: impl Into<DistinguishedName>, serial_number: SerialNumber) -> Self {
        Self {
            issuer: issuer.into(),
            serial_number,
        }
    }
}

impl fmt::Display for IssuerSerial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.issuer, self.serial_number)
    }
}

/// How an OCSP response names its responder.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResponderId {
    /// Responder certificate subject name.
    ByName(DistinguishedName),
    /// Hash of the responder public key, matched against the subject key
    /// identifier.
    ByKey(KeyIdentifier),
}

impl fmt::Display for ResponderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponderId::ByName(name) => write!(f, "name:{}", name.normalized()),
            ResponderId::ByKey(key) => write!(f, "key:{}", hex::encode_upper(&key.0)),
        }
    }
}
