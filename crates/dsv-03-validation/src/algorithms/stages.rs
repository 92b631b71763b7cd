//! # Basic Building Blocks
//!
//! Stage builders for the signature and timestamp processes. Each builder
//! turns a precomputed subject into one ordered check block; the order of
//! checks inside a block is the order they are evaluated in.

use super::process::ValidationProcess;
use crate::domain::context::ValidationContext;
use crate::domain::entities::{CertificateChain, ChainLink, ProcessState, SigningCertificateIdentification};
use dsv_01_evidence::{CertificateToken, SignatureInput, TimestampInput};
use dsv_02_constraints::{
    BlockKind, CertificateConstraints, CheckBlock, CheckKind, Constraint, ConstraintCheck, CryptoSubject, ValidationPolicy,
};

/// A signature with its signing certificate and assessed chain.
pub struct SignatureSubject<'a> {
    pub input: &'a SignatureInput,
    pub identification: SigningCertificateIdentification,
    pub chain: CertificateChain,
}

/// A timestamp with its signing certificate and assessed chain.
pub struct TimestampSubject<'a> {
    pub input: &'a TimestampInput,
    pub identification: SigningCertificateIdentification,
    pub chain: CertificateChain,
}

/// ISC → VCI → XCV → CV → SAV
pub fn signature_process<'a>() -> ValidationProcess<SignatureSubject<'a>> {
    ValidationProcess::new("signature")
        .with_stage(ProcessState::Isc, signature_isc)
        .with_stage(ProcessState::Vci, signature_vci)
        .with_stage(ProcessState::Xcv, signature_xcv)
        .with_stage(ProcessState::Cv, signature_cv)
        .with_stage(ProcessState::Sav, signature_sav)
}

/// ISC → XCV → CV → SAV
pub fn timestamp_process<'a>() -> ValidationProcess<TimestampSubject<'a>> {
    ValidationProcess::new("timestamp")
        .with_stage(ProcessState::Isc, timestamp_isc)
        .with_stage(ProcessState::Xcv, timestamp_xcv)
        .with_stage(ProcessState::Cv, timestamp_cv)
        .with_stage(ProcessState::Sav, timestamp_sav)
}

/// Public key size, zero meaning unknown.
pub(crate) fn known_key_size(certificate: &CertificateToken) -> Option<u32> {
    Some(certificate.info.public_key_size_bits).filter(|bits| *bits > 0)
}

// =============================================================================
// SIGNATURE
// =============================================================================

fn signature_isc(subject: &SignatureSubject<'_>, ctx: &ValidationContext<'_>) -> CheckBlock {
    let constraints = &ctx.policy.signature;
    let identification = &subject.identification;

    let mut block = CheckBlock::new(BlockKind::Isc, subject.input.id.clone());
    block.push_check(ConstraintCheck::new(
        CheckKind::SigningCertificateRecognition {
            identified: identification.is_identified(),
        },
        constraints.signing_certificate_recognition.as_ref(),
    ));
    block.push_check(ConstraintCheck::new(
        CheckKind::SigningCertificateAttributePresent {
            present: identification.attribute_count > 0,
        },
        constraints.signing_certificate_attribute_present.as_ref(),
    ));
    if identification.attribute_count > 0 {
        block.push_check(ConstraintCheck::new(
            CheckKind::UnicitySigningCertificate {
                count: identification.attribute_count,
            },
            constraints.unicity_signing_certificate.as_ref(),
        ));
        block.push_check(ConstraintCheck::new(
            CheckKind::SigningCertificateDigestMatch {
                matched: identification.digest_match,
            },
            constraints.signing_certificate_digest_match.as_ref(),
        ));
        block.push_check(ConstraintCheck::new(
            CheckKind::SigningCertificateIssuerSerialMatch {
                matched: identification.issuer_serial_match,
            },
            constraints.signing_certificate_issuer_serial_match.as_ref(),
        ));
    }
    block
}

fn signature_vci(subject: &SignatureSubject<'_>, ctx: &ValidationContext<'_>) -> CheckBlock {
    let constraints = &ctx.policy.signature;
    let policy = subject.input.policy_identifier.as_ref();

    let mut block = CheckBlock::new(BlockKind::Vci, subject.input.id.clone());
    block.push_check(ConstraintCheck::new(
        CheckKind::AcceptablePolicies {
            policy_id: policy.map(|p| p.id.clone()),
        },
        constraints.acceptable_policies.as_ref(),
    ));
    if let Some(policy) = policy {
        block.push_check(ConstraintCheck::new(
            CheckKind::PolicyDigestMatch {
                digests_match: policy.digests_match,
            },
            constraints.policy_digest_match.as_ref(),
        ));
    }
    block
}

fn signature_xcv(subject: &SignatureSubject<'_>, ctx: &ValidationContext<'_>) -> CheckBlock {
    let constraints = &ctx.policy.signature;
    xcv_block(
        &subject.input.id,
        &subject.chain,
        constraints.prospective_certificate_chain.as_ref(),
        false,
        ctx,
    )
}

fn signature_cv(subject: &SignatureSubject<'_>, ctx: &ValidationContext<'_>) -> CheckBlock {
    let constraints = &ctx.policy.signature;
    let matchers = &subject.input.digest_matchers;

    let mut block = CheckBlock::new(BlockKind::Cv, subject.input.id.clone());
    if matchers.is_empty() {
        block.push_check(ConstraintCheck::new(
            CheckKind::ReferenceDataExistence { found: false },
            constraints.reference_data_existence.as_ref(),
        ));
    }
    for matcher in matchers {
        block.push_check(ConstraintCheck::new(
            CheckKind::ReferenceDataExistence {
                found: matcher.data_found,
            },
            constraints.reference_data_existence.as_ref(),
        ));
    }
    for matcher in matchers.iter().filter(|m| m.data_found) {
        block.push_check(ConstraintCheck::new(
            CheckKind::ReferenceDataIntact {
                intact: matcher.data_intact,
            },
            constraints.reference_data_intact.as_ref(),
        ));
    }
    block.push_check(ConstraintCheck::new(
        CheckKind::SignatureIntact {
            intact: subject.input.signature_intact,
        },
        constraints.signature_intact.as_ref(),
    ));
    block
}

fn signature_sav(subject: &SignatureSubject<'_>, ctx: &ValidationContext<'_>) -> CheckBlock {
    let constraints = &ctx.policy.signature;
    let input = subject.input;
    let signer = subject.identification.certificate.as_deref();

    let mut block = CheckBlock::new(BlockKind::Sav, input.id.clone());
    block.push_check(ConstraintCheck::new(
        CheckKind::SigningTime {
            signing_time: input.signing_time,
        },
        constraints.signing_time.as_ref(),
    ));
    block.push_check(ConstraintCheck::new(
        CheckKind::ContentType {
            value: input.content_type.clone(),
        },
        constraints.content_type.as_ref(),
    ));
    block.push_check(ConstraintCheck::new(
        CheckKind::CommitmentTypeIndication {
            values: input.commitment_types.clone(),
        },
        constraints.commitment_type_indication.as_ref(),
    ));
    block.push_check(ConstraintCheck::new(
        CheckKind::ClaimedRoles {
            values: input.claimed_roles.clone(),
        },
        constraints.claimed_roles.as_ref(),
    ));
    block.push_check(ConstraintCheck::new(
        CheckKind::SignerLocation {
            value: input.signer_location.clone(),
        },
        constraints.signer_location.as_ref(),
    ));
    block.push_check(ConstraintCheck::cryptographic(
        CryptoSubject {
            digest_algorithm: Some(input.signature_digest_algorithm),
            encryption_algorithm: Some(input.encryption_algorithm),
            key_size_bits: input.signer_key_size_bits.or_else(|| signer.and_then(known_key_size)),
        },
        &ctx.policy.cryptographic,
    ));
    block
}

// =============================================================================
// TIMESTAMP
// =============================================================================

fn timestamp_isc(subject: &TimestampSubject<'_>, ctx: &ValidationContext<'_>) -> CheckBlock {
    CheckBlock::new(BlockKind::Isc, subject.input.id.clone()).with_check(ConstraintCheck::new(
        CheckKind::SigningCertificateRecognition {
            identified: subject.identification.is_identified(),
        },
        ctx.policy.timestamp.signing_certificate_recognition.as_ref(),
    ))
}

fn timestamp_xcv(subject: &TimestampSubject<'_>, ctx: &ValidationContext<'_>) -> CheckBlock {
    let constraints = &ctx.policy.timestamp;
    xcv_block(
        &subject.input.id,
        &subject.chain,
        constraints.prospective_certificate_chain.as_ref(),
        true,
        ctx,
    )
}

fn timestamp_cv(subject: &TimestampSubject<'_>, ctx: &ValidationContext<'_>) -> CheckBlock {
    let constraints = &ctx.policy.timestamp;
    let input = subject.input;

    let mut block = CheckBlock::new(BlockKind::Cv, input.id.clone());
    block.push_check(ConstraintCheck::new(
        CheckKind::MessageImprintDataFound {
            found: input.message_imprint_found,
        },
        constraints.message_imprint_data_found.as_ref(),
    ));
    block.push_check(ConstraintCheck::new(
        CheckKind::MessageImprintDataIntact {
            intact: input.message_imprint_found && input.message_imprint_intact,
        },
        constraints.message_imprint_data_intact.as_ref(),
    ));
    block.push_check(ConstraintCheck::new(
        CheckKind::SignatureIntact {
            intact: input.signature_intact,
        },
        constraints.signature_intact.as_ref(),
    ));
    block
}

fn timestamp_sav(subject: &TimestampSubject<'_>, ctx: &ValidationContext<'_>) -> CheckBlock {
    let tsa = subject.identification.certificate.as_deref();
    CheckBlock::new(BlockKind::Sav, subject.input.id.clone()).with_check(ConstraintCheck::cryptographic(
        CryptoSubject {
            digest_algorithm: Some(subject.input.digest_algorithm),
            encryption_algorithm: tsa.map(|c| c.info.public_key_algorithm),
            key_size_bits: tsa.and_then(known_key_size),
        },
        &ctx.policy.cryptographic,
    ))
}

// =============================================================================
// X.509 CERTIFICATE VALIDATION
// =============================================================================

/// Chain check followed by one SubXCV block per certificate that is not a
/// trust anchor, signing certificate first.
fn xcv_block(
    owner_id: &str,
    chain: &CertificateChain,
    prospective_chain: Option<&Constraint>,
    timestamp: bool,
    ctx: &ValidationContext<'_>,
) -> CheckBlock {
    let mut block = CheckBlock::new(BlockKind::Xcv, owner_id);
    block.push_check(ConstraintCheck::new(
        CheckKind::ProspectiveCertificateChain { trusted: chain.trusted },
        prospective_chain,
    ));
    for (position, link) in chain.links.iter().enumerate() {
        if link.trust_anchor {
            continue;
        }
        let constraints = certificate_constraints(ctx.policy, timestamp, position);
        block.push_block(sub_xcv_block(link, constraints, position > 0, ctx));
    }
    block
}

fn sub_xcv_block(
    link: &ChainLink,
    constraints: &CertificateConstraints,
    is_ca: bool,
    ctx: &ValidationContext<'_>,
) -> CheckBlock {
    let certificate = &link.certificate;
    let info = &certificate.info;
    let revocation = &link.revocation;
    let check = |kind: CheckKind, constraint: &Option<Constraint>| {
        ConstraintCheck::new(kind, constraint.as_ref())
    };

    let mut block = CheckBlock::new(BlockKind::SubXcv, certificate.id().to_string());
    block.push_check(check(
        CheckKind::CertificateSignature {
            intact: link.issuer.is_some() && info.signature_intact != Some(false),
        },
        &constraints.signature,
    ));
    block.push_check(check(
        CheckKind::CertificateValidityRange {
            not_before: info.not_before,
            not_after: info.not_after,
            at: ctx.validation_time,
        },
        &constraints.not_expired,
    ));
    block.push_check(check(
        CheckKind::KeyUsage {
            usages: info.key_usages.iter().map(|usage| usage.name().to_string()).collect(),
        },
        &constraints.key_usage,
    ));
    block.push_check(check(
        CheckKind::ExtendedKeyUsage {
            usages: info.extended_key_usages.iter().cloned().collect(),
        },
        &constraints.extended_key_usage,
    ));
    block.push_check(check(CheckKind::CertificateCa { is_ca: info.is_ca }, &constraints.ca));
    block.push_check(check(
        CheckKind::CommonName {
            value: info.common_name.clone(),
        },
        &constraints.common_name,
    ));
    block.push_check(check(
        CheckKind::Country {
            value: info.country.clone(),
        },
        &constraints.country,
    ));
    block.push_check(check(
        CheckKind::Organization {
            value: info.organization.clone(),
        },
        &constraints.organization,
    ));
    block.push_check(check(
        CheckKind::RevocationDataAvailable {
            available: revocation.is_available(),
        },
        &constraints.revocation_data_available,
    ));
    block.push_check(check(
        CheckKind::RevocationDataAcceptable {
            acceptable: revocation.is_acceptable(),
        },
        &constraints.revocation_data_acceptable,
    ));
    block.push_check(check(
        CheckKind::CertificateNotRevoked {
            revoked: revocation.is_revoked_at(ctx.validation_time),
            is_ca,
        },
        &constraints.not_revoked,
    ));
    block.push_check(check(
        CheckKind::CertificateNotOnHold {
            on_hold: revocation.is_on_hold(),
        },
        &constraints.not_on_hold,
    ));
    block.push_check(ConstraintCheck::cryptographic(
        CryptoSubject {
            digest_algorithm: Some(info.signature_digest_algorithm),
            encryption_algorithm: Some(info.public_key_algorithm),
            key_size_bits: known_key_size(certificate),
        },
        &ctx.policy.cryptographic,
    ));
    block
}

/// Constraints for the chain certificate at `position`, signing certificate first.
fn certificate_constraints(policy: &ValidationPolicy, timestamp: bool, position: usize) -> &CertificateConstraints {
    match (timestamp, position) {
        (false, 0) => &policy.signature.signing_certificate,
        (false, _) => &policy.signature.ca_certificate,
        (true, 0) => &policy.timestamp.signing_certificate,
        (true, _) => &policy.timestamp.ca_certificate,
    }
}
