//! # Validation Policy
//!
//! Serde model of a validation policy document. Constraints absent from a
//! document are not evaluated. The built-in default policy is embedded JSON
//! parsed once and shared read-only across validation runs.

pub mod constraint;

pub use constraint::{Constraint, CryptographicConstraint, Level, ANY_VALUE};

use crate::domain::errors::PolicyError;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use shared_crypto::{DigestAlgorithm, EncryptionAlgorithm};
use std::path::Path;
use tracing::{debug, warn};

const DEFAULT_POLICY_JSON: &str = include_str!("default_policy.json");

lazy_static! {
    static ref DEFAULT_POLICY: ValidationPolicy = ValidationPolicy::from_json(DEFAULT_POLICY_JSON)
        .unwrap_or_else(|err| {
            warn!(error = %err, "Embedded default policy rejected, using baseline");
            ValidationPolicy::baseline()
        });
}

/// Declares a group of optional constraints plus nested certificate groups,
/// with pattern compilation over every member.
macro_rules! constraint_group {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $field:ident ),* $(,)?
        }
        $( certificates { $( $cert:ident ),* $(,)? } )?
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase", default)]
        pub struct $name {
            $(
                #[serde(skip_serializing_if = "Option::is_none")]
                pub $field: Option<Constraint>,
            )*
            $( $( pub $cert: CertificateConstraints, )* )?
        }

        impl $name {
            fn compile(&mut self, prefix: &str) -> Result<(), PolicyError> {
                $(
                    if let Some(constraint) = self.$field.as_mut() {
                        constraint.compile(&format!("{}.{}", prefix, stringify!($field)))?;
                    }
                )*
                $( $( self.$cert.compile(&format!("{}.{}", prefix, stringify!($cert)))?; )* )?
                Ok(())
            }
        }
    };
}

constraint_group! {
    /// Constraints applied to one certificate of a chain.
    CertificateConstraints {
        signature,
        not_expired,
        key_usage,
        extended_key_usage,
        ca,
        common_name,
        country,
        organization,
        revocation_data_available,
        revocation_data_acceptable,
        not_revoked,
        not_on_hold,
    }
}

constraint_group! {
    /// Constraints of the signature validation process.
    SignatureConstraints {
        signing_certificate_recognition,
        signing_certificate_attribute_present,
        unicity_signing_certificate,
        signing_certificate_digest_match,
        signing_certificate_issuer_serial_match,
        acceptable_policies,
        policy_digest_match,
        reference_data_existence,
        reference_data_intact,
        signature_intact,
        prospective_certificate_chain,
        signing_time,
        content_type,
        commitment_type_indication,
        claimed_roles,
        signer_location,
    }
    certificates { signing_certificate, ca_certificate }
}

constraint_group! {
    /// Constraints of the timestamp validation process.
    TimestampConstraints {
        signing_certificate_recognition,
        message_imprint_data_found,
        message_imprint_data_intact,
        signature_intact,
        prospective_certificate_chain,
    }
    certificates { signing_certificate, ca_certificate }
}

constraint_group! {
    /// Constraints of the revocation data acceptance process.
    RevocationConstraints {
        issuer_known,
        signature_intact,
        consistency,
        freshness,
    }
}

/// A complete validation policy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationPolicy {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub signature: SignatureConstraints,
    #[serde(default)]
    pub timestamp: TimestampConstraints,
    #[serde(default)]
    pub revocation: RevocationConstraints,
    #[serde(default)]
    pub cryptographic: CryptographicConstraint,
}

impl ValidationPolicy {
    /// Parse a policy document and compile its patterns.
    pub fn from_json(json: &str) -> Result<Self, PolicyError> {
        let mut policy: ValidationPolicy = serde_json::from_str(json)?;
        policy.compile()?;
        debug!(policy = %policy.name, "Validation policy loaded");
        Ok(policy)
    }

    /// Read and parse a policy document from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PolicyError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| PolicyError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Shared built-in policy.
    pub fn default_policy() -> &'static ValidationPolicy {
        &DEFAULT_POLICY
    }

    /// Compile every constraint pattern. Called by the loaders; needed only
    /// for policies assembled in code.
    pub fn compile(&mut self) -> Result<(), PolicyError> {
        self.signature.compile("signature")?;
        self.timestamp.compile("timestamp")?;
        self.revocation.compile("revocation")
    }

    /// Compiled-in policy used when the embedded document cannot be read.
    pub fn baseline() -> Self {
        let chain_certificate = |key_usage: Option<Constraint>| CertificateConstraints {
            signature: Some(Constraint::fail()),
            not_expired: Some(Constraint::fail()),
            key_usage,
            revocation_data_available: Some(Constraint::fail()),
            revocation_data_acceptable: Some(Constraint::fail()),
            not_revoked: Some(Constraint::fail()),
            not_on_hold: Some(Constraint::fail()),
            ..Default::default()
        };
        Self {
            name: "baseline".to_string(),
            description: "Compiled-in fallback policy".to_string(),
            signature: SignatureConstraints {
                signing_certificate_recognition: Some(Constraint::fail()),
                signing_certificate_attribute_present: Some(Constraint::fail()),
                unicity_signing_certificate: Some(Constraint::fail()),
                signing_certificate_digest_match: Some(Constraint::fail()),
                signing_certificate_issuer_serial_match: Some(Constraint::warn()),
                acceptable_policies: Some(Constraint::fail().with_values([ANY_VALUE])),
                policy_digest_match: Some(Constraint::fail()),
                reference_data_existence: Some(Constraint::fail()),
                reference_data_intact: Some(Constraint::fail()),
                signature_intact: Some(Constraint::fail()),
                prospective_certificate_chain: Some(Constraint::fail()),
                signing_time: Some(Constraint::fail()),
                signing_certificate: chain_certificate(Some(
                    Constraint::warn().with_values(["nonRepudiation"]),
                )),
                ca_certificate: chain_certificate(None),
                ..Default::default()
            },
            timestamp: TimestampConstraints {
                signing_certificate_recognition: Some(Constraint::fail()),
                message_imprint_data_found: Some(Constraint::fail()),
                message_imprint_data_intact: Some(Constraint::fail()),
                signature_intact: Some(Constraint::fail()),
                prospective_certificate_chain: Some(Constraint::fail()),
                signing_certificate: chain_certificate(None),
                ca_certificate: chain_certificate(None),
            },
            revocation: RevocationConstraints {
                issuer_known: Some(Constraint::fail()),
                signature_intact: Some(Constraint::fail()),
                consistency: Some(Constraint::fail()),
                freshness: Some(Constraint::warn()),
            },
            cryptographic: CryptographicConstraint {
                level: Level::Fail,
                acceptable_digest_algorithms: DigestAlgorithm::ALL
                    .iter()
                    .copied()
                    .filter(|alg| *alg != DigestAlgorithm::Sha1)
                    .collect(),
                acceptable_encryption_algorithms: vec![
                    EncryptionAlgorithm::Rsa,
                    EncryptionAlgorithm::Ecdsa,
                    EncryptionAlgorithm::Eddsa,
                    EncryptionAlgorithm::Dsa,
                ],
                min_public_key_sizes: [
                    (EncryptionAlgorithm::Rsa, 1900),
                    (EncryptionAlgorithm::Dsa, 2048),
                    (EncryptionAlgorithm::Ecdsa, 256),
                    (EncryptionAlgorithm::Eddsa, 256),
                ]
                .into_iter()
                .collect(),
            },
        }
    }
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        DEFAULT_POLICY.clone()
    }
}
