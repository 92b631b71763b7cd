//! # Verdict Codes
//!
//! Indications and sub-indications of ETSI EN 319 102-1.
//!
//! Basic building blocks conclude with `Passed`, `Failed` or `Indeterminate`.
//! A signature validation process concludes with `TotalPassed`, `TotalFailed`
//! or `Indeterminate`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// High-level outcome of a building block or validation process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Indication {
    /// Final verdict: every mandated check passed.
    TotalPassed,
    /// Final verdict: the signature is definitively invalid.
    TotalFailed,
    /// Building block outcome: all FAIL-level checks passed.
    Passed,
    /// Building block outcome: a check proved the object invalid.
    Failed,
    /// The available evidence does not allow a positive or negative verdict.
    Indeterminate,
}

impl Indication {
    /// Whether this indication represents success at any level.
    pub fn is_passed(&self) -> bool {
        matches!(self, Indication::Passed | Indication::TotalPassed)
    }

    /// Whether this indication represents a definitive failure.
    pub fn is_failed(&self) -> bool {
        matches!(self, Indication::Failed | Indication::TotalFailed)
    }

    /// Map a building block indication to a process-level indication.
    pub fn to_total(self) -> Self {
        match self {
            Indication::Passed | Indication::TotalPassed => Indication::TotalPassed,
            Indication::Failed | Indication::TotalFailed => Indication::TotalFailed,
            Indication::Indeterminate => Indication::Indeterminate,
        }
    }
}

impl fmt::Display for Indication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Indication::TotalPassed => "TOTAL_PASSED",
            Indication::TotalFailed => "TOTAL_FAILED",
            Indication::Passed => "PASSED",
            Indication::Failed => "FAILED",
            Indication::Indeterminate => "INDETERMINATE",
        };
        f.write_str(name)
    }
}

/// Refinement of a `Failed` or `Indeterminate` indication.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubIndication {
    FormatFailure,
    HashFailure,
    SigCryptoFailure,
    Revoked,
    SigConstraintsFailure,
    ChainConstraintsFailure,
    CertificateChainGeneralFailure,
    CryptoConstraintsFailure,
    Expired,
    NotYetValid,
    PolicyProcessingError,
    SignaturePolicyNotAvailable,
    TimestampOrderFailure,
    NoSigningCertificateFound,
    NoCertificateChainFound,
    RevokedNoPoe,
    RevokedCaNoPoe,
    OutOfBoundsNoPoe,
    OutOfBoundsNotRevoked,
    CryptoConstraintsFailureNoPoe,
    NoPoe,
    TryLater,
    SignedDataNotFound,
    Generic,
}

impl SubIndication {
    /// Whether the sub-indication belongs to the "certificate chain not found"
    /// family (the chain could not be built or anchored).
    pub fn is_chain_not_found(&self) -> bool {
        matches!(
            self,
            SubIndication::NoCertificateChainFound | SubIndication::NoSigningCertificateFound
        )
    }

    /// Whether a proof of existence before a time-related event could turn
    /// this sub-indication into a pass.
    pub fn is_time_dependent(&self) -> bool {
        matches!(
            self,
            SubIndication::RevokedNoPoe
                | SubIndication::RevokedCaNoPoe
                | SubIndication::OutOfBoundsNoPoe
                | SubIndication::OutOfBoundsNotRevoked
                | SubIndication::CryptoConstraintsFailureNoPoe
                | SubIndication::TryLater
        )
    }
}

impl fmt::Display for SubIndication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SubIndication::FormatFailure => "FORMAT_FAILURE",
            SubIndication::HashFailure => "HASH_FAILURE",
            SubIndication::SigCryptoFailure => "SIG_CRYPTO_FAILURE",
            SubIndication::Revoked => "REVOKED",
            SubIndication::SigConstraintsFailure => "SIG_CONSTRAINTS_FAILURE",
            SubIndication::ChainConstraintsFailure => "CHAIN_CONSTRAINTS_FAILURE",
            SubIndication::CertificateChainGeneralFailure => "CERTIFICATE_CHAIN_GENERAL_FAILURE",
            SubIndication::CryptoConstraintsFailure => "CRYPTO_CONSTRAINTS_FAILURE",
            SubIndication::Expired => "EXPIRED",
            SubIndication::NotYetValid => "NOT_YET_VALID",
            SubIndication::PolicyProcessingError => "POLICY_PROCESSING_ERROR",
            SubIndication::SignaturePolicyNotAvailable => "SIGNATURE_POLICY_NOT_AVAILABLE",
            SubIndication::TimestampOrderFailure => "TIMESTAMP_ORDER_FAILURE",
            SubIndication::NoSigningCertificateFound => "NO_SIGNING_CERTIFICATE_FOUND",
            SubIndication::NoCertificateChainFound => "NO_CERTIFICATE_CHAIN_FOUND",
            SubIndication::RevokedNoPoe => "REVOKED_NO_POE",
            SubIndication::RevokedCaNoPoe => "REVOKED_CA_NO_POE",
            SubIndication::OutOfBoundsNoPoe => "OUT_OF_BOUNDS_NO_POE",
            SubIndication::OutOfBoundsNotRevoked => "OUT_OF_BOUNDS_NOT_REVOKED",
            SubIndication::CryptoConstraintsFailureNoPoe => "CRYPTO_CONSTRAINTS_FAILURE_NO_POE",
            SubIndication::NoPoe => "NO_POE",
            SubIndication::TryLater => "TRY_LATER",
            SubIndication::SignedDataNotFound => "SIGNED_DATA_NOT_FOUND",
            SubIndication::Generic => "GENERIC",
        };
        f.write_str(name)
    }
}
