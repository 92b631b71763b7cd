//! Structural locations tokens and references are found in.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a certificate was physically found.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CertificateOrigin {
    /// Signature key material (XML `KeyInfo`, JWS `x5c`).
    KeyInfo,
    /// Embedded certificate values attribute.
    CertificateValues,
    /// Validation data attached to a timestamp.
    TimestampValidationData,
    /// Attribute authority certificate values.
    AttrAuthoritiesCertValues,
    /// CMS `SignedData.certificates`.
    SignedData,
    /// Document security store dictionary.
    DssDictionary,
    /// Validation-related-information dictionary.
    VriDictionary,
    /// Certificates carried inside a basic OCSP response.
    BasicOcspResponse,
}

impl CertificateOrigin {
    pub const ALL: [CertificateOrigin; 8] = [
        CertificateOrigin::KeyInfo,
        CertificateOrigin::CertificateValues,
        CertificateOrigin::TimestampValidationData,
        CertificateOrigin::AttrAuthoritiesCertValues,
        CertificateOrigin::SignedData,
        CertificateOrigin::DssDictionary,
        CertificateOrigin::VriDictionary,
        CertificateOrigin::BasicOcspResponse,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CertificateOrigin::KeyInfo => "KEY_INFO",
            CertificateOrigin::CertificateValues => "CERTIFICATE_VALUES",
            CertificateOrigin::TimestampValidationData => "TIMESTAMP_VALIDATION_DATA",
            CertificateOrigin::AttrAuthoritiesCertValues => "ATTR_AUTHORITIES_CERT_VALUES",
            CertificateOrigin::SignedData => "SIGNED_DATA",
            CertificateOrigin::DssDictionary => "DSS_DICTIONARY",
            CertificateOrigin::VriDictionary => "VRI_DICTIONARY",
            CertificateOrigin::BasicOcspResponse => "BASIC_OCSP_RESPONSE",
        }
    }
}

/// Where a revocation token was physically found.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RevocationOrigin {
    /// Embedded revocation values attribute.
    RevocationValues,
    /// Validation data attached to a timestamp.
    TimestampValidationData,
    /// Document security store dictionary.
    DssDictionary,
    /// Validation-related-information dictionary.
    VriDictionary,
    /// Adobe `revocationInfoArchival` signed attribute.
    AdbeRevocationInfoArchival,
    /// CMS `SignedData.crls`.
    CmsSignedData,
}

impl RevocationOrigin {
    pub const ALL: [RevocationOrigin; 6] = [
        RevocationOrigin::RevocationValues,
        RevocationOrigin::TimestampValidationData,
        RevocationOrigin::DssDictionary,
        RevocationOrigin::VriDictionary,
        RevocationOrigin::AdbeRevocationInfoArchival,
        RevocationOrigin::CmsSignedData,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RevocationOrigin::RevocationValues => "REVOCATION_VALUES",
            RevocationOrigin::TimestampValidationData => "TIMESTAMP_VALIDATION_DATA",
            RevocationOrigin::DssDictionary => "DSS_DICTIONARY",
            RevocationOrigin::VriDictionary => "VRI_DICTIONARY",
            RevocationOrigin::AdbeRevocationInfoArchival => "ADBE_REVOCATION_INFO_ARCHIVAL",
            RevocationOrigin::CmsSignedData => "CMS_SIGNED_DATA",
        }
    }
}

/// Origin of any token kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum Origin {
    Certificate(CertificateOrigin),
    Revocation(RevocationOrigin),
}

impl Origin {
    pub fn as_certificate(&self) -> Option<CertificateOrigin> {
        match self {
            Origin::Certificate(origin) => Some(*origin),
            Origin::Revocation(_) => None,
        }
    }

    pub fn as_revocation(&self) -> Option<RevocationOrigin> {
        match self {
            Origin::Revocation(origin) => Some(*origin),
            Origin::Certificate(_) => None,
        }
    }
}

impl From<CertificateOrigin> for Origin {
    fn from(origin: CertificateOrigin) -> Self {
        Origin::Certificate(origin)
    }
}

impl From<RevocationOrigin> for Origin {
    fn from(origin: RevocationOrigin) -> Self {
        Origin::Revocation(origin)
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Certificate(origin) => f.write_str(origin.name()),
            Origin::Revocation(origin) => f.write_str(origin.name()),
        }
    }
}

/// Signed structure a certificate reference was declared in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CertificateRefOrigin {
    /// Signing certificate (v1 or v2) attribute.
    SigningCertificate,
    /// Complete certificate references attribute.
    CompleteCertificateRefs,
    /// Attribute certificate references attribute.
    AttributeCertificateRefs,
    /// Responder identifier of an OCSP response.
    OcspResponderId,
}

impl CertificateRefOrigin {
    pub const ALL: [CertificateRefOrigin; 4] = [
        CertificateRefOrigin::SigningCertificate,
        CertificateRefOrigin::CompleteCertificateRefs,
        CertificateRefOrigin::AttributeCertificateRefs,
        CertificateRefOrigin::OcspResponderId,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CertificateRefOrigin::SigningCertificate => "SIGNING_CERTIFICATE",
            CertificateRefOrigin::CompleteCertificateRefs => "COMPLETE_CERTIFICATE_REFS",
            CertificateRefOrigin::AttributeCertificateRefs => "ATTRIBUTE_CERTIFICATE_REFS",
            CertificateRefOrigin::OcspResponderId => "OCSP_RESPONDER_ID",
        }
    }
}

impl fmt::Display for CertificateRefOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Signed structure a revocation reference was declared in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RevocationRefOrigin {
    CompleteRevocationRefs,
    AttributeRevocationRefs,
}

impl RevocationRefOrigin {
    pub const ALL: [RevocationRefOrigin; 2] = [
        RevocationRefOrigin::CompleteRevocationRefs,
        RevocationRefOrigin::AttributeRevocationRefs,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RevocationRefOrigin::CompleteRevocationRefs => "COMPLETE_REVOCATION_REFS",
            RevocationRefOrigin::AttributeRevocationRefs => "ATTRIBUTE_REVOCATION_REFS",
        }
    }
}

impl fmt::Display for RevocationRefOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
