//! # Constraint Checks
//!
//! A closed set of check kinds, each carrying its own typed subject, and a
//! single `evaluate` entry point. A failed check is a [`CheckResult`] value,
//! never an error.

use super::message_tags::MessageTag;
use crate::policy::{Constraint, CryptographicConstraint, Level};
use chrono::{DateTime, Utc};
use serde::Serialize;
use shared_crypto::{DigestAlgorithm, EncryptionAlgorithm};
use shared_types::{Indication, SubIndication};
use tracing::debug;

/// Subject value of an `AcceptablePolicies` check when no policy is declared.
pub const NO_POLICY: &str = "NO_POLICY";

/// Algorithms used by a signature, certificate or revocation token.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CryptoSubject {
    pub digest_algorithm: Option<DigestAlgorithm>,
    pub encryption_algorithm: Option<EncryptionAlgorithm>,
    pub key_size_bits: Option<u32>,
}

/// Every check the engine knows, with the subject it inspects.
#[derive(Clone, Debug, PartialEq)]
pub enum CheckKind {
    // Identification of the signing certificate
    SigningCertificateRecognition { identified: bool },
    SigningCertificateAttributePresent { present: bool },
    UnicitySigningCertificate { count: usize },
    SigningCertificateDigestMatch { matched: bool },
    SigningCertificateIssuerSerialMatch { matched: bool },

    // Validation context initialization
    AcceptablePolicies { policy_id: Option<String> },
    PolicyDigestMatch { digests_match: Option<bool> },

    // Cryptographic verification
    ReferenceDataExistence { found: bool },
    ReferenceDataIntact { intact: bool },
    SignatureIntact { intact: bool },
    MessageImprintDataFound { found: bool },
    MessageImprintDataIntact { intact: bool },

    // X.509 certificate validation
    ProspectiveCertificateChain { trusted: bool },
    CertificateSignature { intact: bool },
    CertificateValidityRange {
        not_before: DateTime<Utc>,
        not_after: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    KeyUsage { usages: Vec<String> },
    ExtendedKeyUsage { usages: Vec<String> },
    CertificateCa { is_ca: bool },
    CommonName { value: Option<String> },
    Country { value: Option<String> },
    Organization { value: Option<String> },
    RevocationDataAvailable { available: bool },
    RevocationDataAcceptable { acceptable: bool },
    CertificateNotRevoked { revoked: bool, is_ca: bool },
    CertificateNotOnHold { on_hold: bool },

    // Signature acceptance validation
    SigningTime { signing_time: Option<DateTime<Utc>> },
    ContentType { value: Option<String> },
    CommitmentTypeIndication { values: Vec<String> },
    ClaimedRoles { values: Vec<String> },
    SignerLocation { value: Option<String> },
    Cryptographic {
        subject: CryptoSubject,
        rules: CryptographicConstraint,
    },

    // Revocation data acceptance
    RevocationIssuerKnown { known: bool },
    RevocationSignatureIntact { intact: bool },
    RevocationConsistent { consistent: bool },
    RevocationFresh {
        this_update: DateTime<Utc>,
        validation_time: DateTime<Utc>,
        max_age_secs: i64,
    },
}

/// Static facts about a check kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CheckDescriptor {
    pub name: &'static str,
    pub question: MessageTag,
    pub answer: MessageTag,
    pub indication: Indication,
    pub sub_indication: SubIndication,
}

const fn describe(
    name: &'static str,
    question: MessageTag,
    answer: MessageTag,
    indication: Indication,
    sub_indication: SubIndication,
) -> CheckDescriptor {
    CheckDescriptor {
        name,
        question,
        answer,
        indication,
        sub_indication,
    }
}

impl CheckKind {
    /// Name, message tags and failure verdict of this kind.
    pub fn descriptor(&self) -> CheckDescriptor {
        use Indication::{Failed, Indeterminate};
        use MessageTag as T;
        use SubIndication as S;

        match self {
            CheckKind::SigningCertificateRecognition { .. } => describe(
                "SigningCertificateRecognition",
                T::IscCandidate,
                T::IscCandidateAns,
                Indeterminate,
                S::NoSigningCertificateFound,
            ),
            CheckKind::SigningCertificateAttributePresent { .. } => describe(
                "SigningCertificateAttributePresent",
                T::IscAttributePresent,
                T::IscAttributePresentAns,
                Indeterminate,
                S::NoSigningCertificateFound,
            ),
            CheckKind::UnicitySigningCertificate { .. } => describe(
                "UnicitySigningCertificate",
                T::IscAttributeUnique,
                T::IscAttributeUniqueAns,
                Indeterminate,
                S::NoSigningCertificateFound,
            ),
            CheckKind::SigningCertificateDigestMatch { .. } => describe(
                "SigningCertificateDigestMatch",
                T::IscDigestMatch,
                T::IscDigestMatchAns,
                Indeterminate,
                S::NoSigningCertificateFound,
            ),
            CheckKind::SigningCertificateIssuerSerialMatch { .. } => describe(
                "SigningCertificateIssuerSerialMatch",
                T::IscIssuerSerialMatch,
                T::IscIssuerSerialMatchAns,
                Indeterminate,
                S::NoSigningCertificateFound,
            ),
            CheckKind::AcceptablePolicies { .. } => describe(
                "AcceptablePolicies",
                T::VciPolicyAcceptable,
                T::VciPolicyAcceptableAns,
                Indeterminate,
                S::SignaturePolicyNotAvailable,
            ),
            CheckKind::PolicyDigestMatch { .. } => describe(
                "PolicyDigestMatch",
                T::VciPolicyDigestMatch,
                T::VciPolicyDigestMatchAns,
                Indeterminate,
                S::PolicyProcessingError,
            ),
            CheckKind::ReferenceDataExistence { .. } => describe(
                "ReferenceDataExistence",
                T::CvReferenceFound,
                T::CvReferenceFoundAns,
                Indeterminate,
                S::SignedDataNotFound,
            ),
            CheckKind::ReferenceDataIntact { .. } => describe(
                "ReferenceDataIntact",
                T::CvReferenceIntact,
                T::CvReferenceIntactAns,
                Failed,
                S::HashFailure,
            ),
            CheckKind::SignatureIntact { .. } => describe(
                "SignatureIntact",
                T::CvSignatureIntact,
                T::CvSignatureIntactAns,
                Failed,
                S::SigCryptoFailure,
            ),
            CheckKind::MessageImprintDataFound { .. } => describe(
                "MessageImprintDataFound",
                T::CvImprintFound,
                T::CvImprintFoundAns,
                Indeterminate,
                S::SignedDataNotFound,
            ),
            CheckKind::MessageImprintDataIntact { .. } => describe(
                "MessageImprintDataIntact",
                T::CvImprintIntact,
                T::CvImprintIntactAns,
                Failed,
                S::HashFailure,
            ),
            CheckKind::ProspectiveCertificateChain { .. } => describe(
                "ProspectiveCertificateChain",
                T::XcvChainBuilt,
                T::XcvChainBuiltAns,
                Indeterminate,
                S::NoCertificateChainFound,
            ),
            CheckKind::CertificateSignature { .. } => describe(
                "CertificateSignature",
                T::XcvSignatureIntact,
                T::XcvSignatureIntactAns,
                Indeterminate,
                S::CertificateChainGeneralFailure,
            ),
            CheckKind::CertificateValidityRange { .. } => describe(
                "CertificateValidityRange",
                T::XcvInValidityRange,
                T::XcvInValidityRangeAns,
                Indeterminate,
                S::OutOfBoundsNoPoe,
            ),
            CheckKind::KeyUsage { .. } => describe(
                "KeyUsage",
                T::XcvKeyUsage,
                T::XcvKeyUsageAns,
                Indeterminate,
                S::ChainConstraintsFailure,
            ),
            CheckKind::ExtendedKeyUsage { .. } => describe(
                "ExtendedKeyUsage",
                T::XcvExtendedKeyUsage,
                T::XcvExtendedKeyUsageAns,
                Indeterminate,
                S::ChainConstraintsFailure,
            ),
            CheckKind::CertificateCa { .. } => describe(
                "CertificateCa",
                T::XcvCa,
                T::XcvCaAns,
                Indeterminate,
                S::ChainConstraintsFailure,
            ),
            CheckKind::CommonName { .. } => describe(
                "CommonName",
                T::XcvCommonName,
                T::XcvCommonNameAns,
                Failed,
                S::SigConstraintsFailure,
            ),
            CheckKind::Country { .. } => describe(
                "Country",
                T::XcvCountry,
                T::XcvCountryAns,
                Indeterminate,
                S::ChainConstraintsFailure,
            ),
            CheckKind::Organization { .. } => describe(
                "Organization",
                T::XcvOrganization,
                T::XcvOrganizationAns,
                Indeterminate,
                S::ChainConstraintsFailure,
            ),
            CheckKind::RevocationDataAvailable { .. } => describe(
                "RevocationDataAvailable",
                T::XcvRevocationPresent,
                T::XcvRevocationPresentAns,
                Indeterminate,
                S::TryLater,
            ),
            CheckKind::RevocationDataAcceptable { .. } => describe(
                "RevocationDataAcceptable",
                T::XcvRevocationAcceptable,
                T::XcvRevocationAcceptableAns,
                Indeterminate,
                S::TryLater,
            ),
            CheckKind::CertificateNotRevoked { is_ca, .. } => describe(
                "CertificateNotRevoked",
                T::XcvNotRevoked,
                T::XcvNotRevokedAns,
                Indeterminate,
                if *is_ca { S::RevokedCaNoPoe } else { S::RevokedNoPoe },
            ),
            CheckKind::CertificateNotOnHold { .. } => describe(
                "CertificateNotOnHold",
                T::XcvNotOnHold,
                T::XcvNotOnHoldAns,
                Indeterminate,
                S::TryLater,
            ),
            CheckKind::SigningTime { .. } => describe(
                "SigningTime",
                T::SavSigningTime,
                T::SavSigningTimeAns,
                Indeterminate,
                S::SigConstraintsFailure,
            ),
            CheckKind::ContentType { .. } => describe(
                "ContentType",
                T::SavContentType,
                T::SavContentTypeAns,
                Indeterminate,
                S::SigConstraintsFailure,
            ),
            CheckKind::CommitmentTypeIndication { .. } => describe(
                "CommitmentTypeIndication",
                T::SavCommitmentType,
                T::SavCommitmentTypeAns,
                Indeterminate,
                S::SigConstraintsFailure,
            ),
            CheckKind::ClaimedRoles { .. } => describe(
                "ClaimedRoles",
                T::SavClaimedRoles,
                T::SavClaimedRolesAns,
                Indeterminate,
                S::SigConstraintsFailure,
            ),
            CheckKind::SignerLocation { .. } => describe(
                "SignerLocation",
                T::SavSignerLocation,
                T::SavSignerLocationAns,
                Indeterminate,
                S::SigConstraintsFailure,
            ),
            CheckKind::Cryptographic { .. } => describe(
                "Cryptographic",
                T::CryptoAcceptable,
                T::CryptoAcceptableAns,
                Indeterminate,
                S::CryptoConstraintsFailureNoPoe,
            ),
            CheckKind::RevocationIssuerKnown { .. } => describe(
                "RevocationIssuerKnown",
                T::RacIssuerKnown,
                T::RacIssuerKnownAns,
                Indeterminate,
                S::NoCertificateChainFound,
            ),
            CheckKind::RevocationSignatureIntact { .. } => describe(
                "RevocationSignatureIntact",
                T::RacSignatureIntact,
                T::RacSignatureIntactAns,
                Failed,
                S::SigCryptoFailure,
            ),
            CheckKind::RevocationConsistent { .. } => describe(
                "RevocationConsistent",
                T::RacConsistent,
                T::RacConsistentAns,
                Indeterminate,
                S::TryLater,
            ),
            CheckKind::RevocationFresh { .. } => describe(
                "RevocationFresh",
                T::RacFresh,
                T::RacFreshAns,
                Indeterminate,
                S::TryLater,
            ),
        }
    }

    /// Predicate of this kind. `Err` carries the failure detail.
    fn check(&self, constraint: &Constraint) -> Result<(), String> {
        let flag = |ok: bool, detail: &str| if ok { Ok(()) } else { Err(detail.to_string()) };
        let value = |value: &Option<String>, what: &str| match value.as_deref() {
            Some(v) if constraint.accepts(v) => Ok(()),
            Some(v) => Err(format!(
                "{} '{}' does not match {}",
                what,
                v,
                constraint.describe_expectation()
            )),
            None => Err(format!("{} is absent", what)),
        };
        let values = |values: &[String], what: &str| {
            if constraint.accepts_any(values.iter().map(String::as_str)) {
                Ok(())
            } else if values.is_empty() {
                Err(format!("{} is absent", what))
            } else {
                Err(format!(
                    "{} [{}] do not match {}",
                    what,
                    values.join(", "),
                    constraint.describe_expectation()
                ))
            }
        };

        match self {
            CheckKind::SigningCertificateRecognition { identified } => {
                flag(*identified, "no signing certificate candidate")
            }
            CheckKind::SigningCertificateAttributePresent { present } => {
                flag(*present, "signing-certificate attribute absent")
            }
            CheckKind::UnicitySigningCertificate { count } => match count {
                1 => Ok(()),
                n => Err(format!("signing-certificate attribute present {} times", n)),
            },
            CheckKind::SigningCertificateDigestMatch { matched } => {
                flag(*matched, "signing certificate digest mismatch")
            }
            CheckKind::SigningCertificateIssuerSerialMatch { matched } => {
                flag(*matched, "issuer-serial mismatch")
            }
            CheckKind::AcceptablePolicies { policy_id } => {
                let id = policy_id.clone().unwrap_or_else(|| NO_POLICY.to_string());
                value(&Some(id), "signature policy")
            }
            CheckKind::PolicyDigestMatch { digests_match } => {
                flag(*digests_match != Some(false), "policy digest mismatch")
            }
            CheckKind::ReferenceDataExistence { found } => flag(*found, "signed data not found"),
            CheckKind::ReferenceDataIntact { intact } => flag(*intact, "signed data digest mismatch"),
            CheckKind::SignatureIntact { intact } => flag(*intact, "signature value invalid"),
            CheckKind::MessageImprintDataFound { found } => flag(*found, "message imprint data not found"),
            CheckKind::MessageImprintDataIntact { intact } => {
                flag(*intact, "message imprint does not match")
            }
            CheckKind::ProspectiveCertificateChain { trusted } => {
                flag(*trusted, "no chain up to a trust anchor")
            }
            CheckKind::CertificateSignature { intact } => flag(*intact, "certificate signature invalid"),
            CheckKind::CertificateValidityRange {
                not_before,
                not_after,
                at,
            } => {
                if not_before <= at && at <= not_after {
                    Ok(())
                } else {
                    Err(format!(
                        "{} outside [{}, {}]",
                        at.to_rfc3339(),
                        not_before.to_rfc3339(),
                        not_after.to_rfc3339()
                    ))
                }
            }
            CheckKind::KeyUsage { usages } => values(usages.as_slice(), "key usages"),
            CheckKind::ExtendedKeyUsage { usages } => values(usages.as_slice(), "extended key usages"),
            CheckKind::CertificateCa { is_ca } => flag(*is_ca, "certificate is not a CA"),
            CheckKind::CommonName { value: v } => value(v, "common name"),
            CheckKind::Country { value: v } => value(v, "country"),
            CheckKind::Organization { value: v } => value(v, "organization"),
            CheckKind::RevocationDataAvailable { available } => {
                flag(*available, "no revocation data")
            }
            CheckKind::RevocationDataAcceptable { acceptable } => {
                flag(*acceptable, "no acceptable revocation data")
            }
            CheckKind::CertificateNotRevoked { revoked, .. } => flag(!revoked, "certificate revoked"),
            CheckKind::CertificateNotOnHold { on_hold } => flag(!on_hold, "certificate on hold"),
            CheckKind::SigningTime { signing_time } => {
                flag(signing_time.is_some(), "signing-time absent")
            }
            CheckKind::ContentType { value: v } => value(v, "content type"),
            CheckKind::CommitmentTypeIndication { values: v } => values(v.as_slice(), "commitment types"),
            CheckKind::ClaimedRoles { values: v } => values(v.as_slice(), "claimed roles"),
            CheckKind::SignerLocation { value: v } => value(v, "signer location"),
            CheckKind::Cryptographic { subject, rules } => match rules.violation(
                subject.digest_algorithm,
                subject.encryption_algorithm,
                subject.key_size_bits,
            ) {
                None => Ok(()),
                Some(violation) => Err(violation),
            },
            CheckKind::RevocationIssuerKnown { known } => flag(*known, "revocation issuer unknown"),
            CheckKind::RevocationSignatureIntact { intact } => {
                flag(*intact, "revocation signature invalid")
            }
            CheckKind::RevocationConsistent { consistent } => {
                flag(*consistent, "revocation data inconsistent with certificate")
            }
            CheckKind::RevocationFresh {
                this_update,
                validation_time,
                max_age_secs,
            } => {
                let age = (*validation_time - *this_update).num_seconds();
                if age < 0 {
                    Err(format!(
                        "revocation data issued {}s after the validation time",
                        -age
                    ))
                } else if age <= *max_age_secs {
                    Ok(())
                } else {
                    Err(format!(
                        "revocation data is {}s old, maximum {}s",
                        age, max_age_secs
                    ))
                }
            }
        }
    }
}

/// Outcome of one check.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    pub check: &'static str,
    pub passed: bool,
    pub level: Level,
    pub message_tag: MessageTag,
    pub error_message_tag: MessageTag,
    pub failure_indication: Indication,
    pub failure_sub_indication: Option<SubIndication>,
    /// False when the constraint level is IGNORE.
    pub evaluated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl CheckResult {
    /// Failed at FAIL level.
    pub fn is_blocking(&self) -> bool {
        !self.passed && self.level == Level::Fail
    }
}

/// One check bound to its constraint.
#[derive(Clone, Debug, PartialEq)]
pub struct ConstraintCheck {
    pub kind: CheckKind,
    pub constraint: Constraint,
}

impl ConstraintCheck {
    /// A missing constraint means the check is ignored.
    pub fn new(kind: CheckKind, constraint: Option<&Constraint>) -> Self {
        Self {
            kind,
            constraint: constraint.cloned().unwrap_or_else(Constraint::ignore),
        }
    }

    /// Cryptographic check governed by the rules' own level.
    pub fn cryptographic(subject: CryptoSubject, rules: &CryptographicConstraint) -> Self {
        Self {
            constraint: Constraint::new(rules.level),
            kind: CheckKind::Cryptographic {
                subject,
                rules: rules.clone(),
            },
        }
    }

    pub fn level(&self) -> Level {
        self.constraint.level
    }

    pub fn evaluate(&self) -> CheckResult {
        let descriptor = self.kind.descriptor();
        let level = self.constraint.level;
        let (passed, evaluated, detail) = if level == Level::Ignore {
            (true, false, None)
        } else {
            match self.kind.check(&self.constraint) {
                Ok(()) => (true, true, None),
                Err(detail) => (false, true, Some(detail)),
            }
        };

        debug!(
            check = descriptor.name,
            level = %level,
            passed,
            evaluated,
            "Constraint check evaluated"
        );

        CheckResult {
            check: descriptor.name,
            passed,
            level,
            message_tag: descriptor.question,
            error_message_tag: descriptor.answer,
            failure_indication: descriptor.indication,
            failure_sub_indication: Some(descriptor.sub_indication),
            evaluated,
            detail,
        }
    }
}
