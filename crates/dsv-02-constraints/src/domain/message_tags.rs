//! # Message Tags
//!
//! Stable codes and English texts for every check question and its failure
//! answer. The report assembler keys translations on `code()`.

use serde::{Serialize, Serializer};
use std::fmt;

macro_rules! message_tags {
    ($( $(#[$meta:meta])* $variant:ident => ($code:literal, $text:literal) ),+ $(,)?) => {
        /// Check question or failure answer.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum MessageTag {
            $( $(#[$meta])* $variant, )+
        }

        impl MessageTag {
            /// Every tag, in declaration order.
            pub const ALL: &'static [MessageTag] = &[ $( MessageTag::$variant, )+ ];

            /// Stable code.
            pub fn code(&self) -> &'static str {
                match self {
                    $( MessageTag::$variant => $code, )+
                }
            }

            /// English text.
            pub fn message(&self) -> &'static str {
                match self {
                    $( MessageTag::$variant => $text, )+
                }
            }
        }
    };
}

message_tags! {
    // --- Identification of the signing certificate ---
    IscCandidate => ("BBB_ICS_ISCI", "Is there an identified candidate for the signing certificate?"),
    IscCandidateAns => ("BBB_ICS_ISCI_ANS", "There is no candidate for the signing certificate!"),
    IscAttributePresent => ("BBB_ICS_ISASCP", "Is the signed attribute: 'signing-certificate' present?"),
    IscAttributePresentAns => ("BBB_ICS_ISASCP_ANS", "The signed attribute: 'signing-certificate' is absent!"),
    IscAttributeUnique => ("BBB_ICS_ISASCPU", "Is the signed attribute: 'signing-certificate' present only once?"),
    IscAttributeUniqueAns => ("BBB_ICS_ISASCPU_ANS", "The signed attribute: 'signing-certificate' is present more than once!"),
    IscDigestMatch => ("BBB_ICS_ICDVV", "Is the certificate's digest value valid?"),
    IscDigestMatchAns => ("BBB_ICS_ICDVV_ANS", "The signing certificate digest value does not match!"),
    IscIssuerSerialMatch => ("BBB_ICS_AIDNASNE", "Are the issuer distinguished name and the serial number equal?"),
    IscIssuerSerialMatchAns => ("BBB_ICS_AIDNASNE_ANS", "The 'issuer-serial' attribute is absent or does not match!"),

    // --- Validation context initialization ---
    VciPolicyAcceptable => ("BBB_VCI_ISPK", "Is the signature policy known?"),
    VciPolicyAcceptableAns => ("BBB_VCI_ISPK_ANS", "The signature policy is not known!"),
    VciPolicyDigestMatch => ("BBB_VCI_ISPM", "Does the digest of the signature policy document match?"),
    VciPolicyDigestMatchAns => ("BBB_VCI_ISPM_ANS", "The signature policy document digest does not match!"),

    // --- Cryptographic verification ---
    CvReferenceFound => ("BBB_CV_IRDOF", "Is the reference data object found?"),
    CvReferenceFoundAns => ("BBB_CV_IRDOF_ANS", "The reference data object is not found!"),
    CvReferenceIntact => ("BBB_CV_IRDOI", "Is the reference data object intact?"),
    CvReferenceIntactAns => ("BBB_CV_IRDOI_ANS", "The reference data object has been modified!"),
    CvSignatureIntact => ("BBB_CV_ISI", "Is the signature intact?"),
    CvSignatureIntactAns => ("BBB_CV_ISI_ANS", "The signature is not intact!"),
    CvImprintFound => ("BBB_CV_TSP_IRDOF", "Is the timestamp message imprint data found?"),
    CvImprintFoundAns => ("BBB_CV_TSP_IRDOF_ANS", "The timestamp message imprint data is not found!"),
    CvImprintIntact => ("BBB_CV_TSP_IRDOI", "Is the timestamp message imprint data intact?"),
    CvImprintIntactAns => ("BBB_CV_TSP_IRDOI_ANS", "The timestamp message imprint data is not intact!"),

    // --- X.509 certificate validation ---
    XcvChainBuilt => ("BBB_XCV_CCCBB", "Can the certificate chain be built till a trust anchor?"),
    XcvChainBuiltAns => ("BBB_XCV_CCCBB_ANS", "The certificate chain is not trusted, it does not contain a trust anchor."),
    XcvSignatureIntact => ("BBB_XCV_ICSI", "Is the certificate's signature intact?"),
    XcvSignatureIntactAns => ("BBB_XCV_ICSI_ANS", "The certificate's signature is not intact!"),
    XcvInValidityRange => ("BBB_XCV_ICTIVRSC", "Is the validation time in the validity range of the certificate?"),
    XcvInValidityRangeAns => ("BBB_XCV_ICTIVRSC_ANS", "The validation time is not in the validity range of the certificate!"),
    XcvKeyUsage => ("BBB_XCV_ISCGKU", "Has the certificate given key-usage?"),
    XcvKeyUsageAns => ("BBB_XCV_ISCGKU_ANS", "The certificate has not expected key-usage!"),
    XcvExtendedKeyUsage => ("BBB_XCV_ISCGEKU", "Has the certificate given extended key-usage?"),
    XcvExtendedKeyUsageAns => ("BBB_XCV_ISCGEKU_ANS", "The certificate has not expected extended key-usage!"),
    XcvCa => ("BBB_XCV_ICBCA", "Is the certificate allowed to issue certificates?"),
    XcvCaAns => ("BBB_XCV_ICBCA_ANS", "The certificate is not a CA certificate!"),
    XcvCommonName => ("BBB_XCV_ISCGCOMMONN", "Has the certificate given common name?"),
    XcvCommonNameAns => ("BBB_XCV_ISCGCOMMONN_ANS", "The certificate does not have an expected common name!"),
    XcvCountry => ("BBB_XCV_ISCGCOUN", "Has the certificate given country code?"),
    XcvCountryAns => ("BBB_XCV_ISCGCOUN_ANS", "The certificate does not have an expected country code!"),
    XcvOrganization => ("BBB_XCV_ISCGON", "Has the certificate given organization name?"),
    XcvOrganizationAns => ("BBB_XCV_ISCGON_ANS", "The certificate does not have an expected organization name!"),
    XcvRevocationPresent => ("BBB_XCV_IRDPFC", "Is the revocation data present for the certificate?"),
    XcvRevocationPresentAns => ("BBB_XCV_IRDPFC_ANS", "No revocation data for the certificate!"),
    XcvRevocationAcceptable => ("BBB_XCV_IARDPFC", "Is an acceptable revocation data present for the certificate?"),
    XcvRevocationAcceptableAns => ("BBB_XCV_IARDPFC_ANS", "No acceptable revocation data for the certificate!"),
    XcvNotRevoked => ("BBB_XCV_ISCR", "Is the certificate not revoked?"),
    XcvNotRevokedAns => ("BBB_XCV_ISCR_ANS", "The certificate is revoked!"),
    XcvNotOnHold => ("BBB_XCV_ISCOH", "Is the certificate not on hold?"),
    XcvNotOnHoldAns => ("BBB_XCV_ISCOH_ANS", "The certificate is on hold!"),

    // --- Signature acceptance validation ---
    SavSigningTime => ("BBB_SAV_ISQPSTP", "Is the signed qualifying property: 'signing-time' present?"),
    SavSigningTimeAns => ("BBB_SAV_ISQPSTP_ANS", "The signed qualifying property: 'signing-time' is not present!"),
    SavContentType => ("BBB_SAV_ISQPCTP", "Is the signed qualifying property: 'content-type' acceptable?"),
    SavContentTypeAns => ("BBB_SAV_ISQPCTP_ANS", "The signed qualifying property: 'content-type' is absent or not acceptable!"),
    SavCommitmentType => ("BBB_SAV_ISQPXTIP", "Is the signed qualifying property: 'commitment-type-indication' acceptable?"),
    SavCommitmentTypeAns => ("BBB_SAV_ISQPXTIP_ANS", "The signed qualifying property: 'commitment-type-indication' is absent or not acceptable!"),
    SavClaimedRoles => ("BBB_SAV_ICRM", "Is the claimed role acceptable?"),
    SavClaimedRolesAns => ("BBB_SAV_ICRM_ANS", "The claimed role is absent or not acceptable!"),
    SavSignerLocation => ("BBB_SAV_ISQPSLP", "Is the signed qualifying property: 'signer-location' present?"),
    SavSignerLocationAns => ("BBB_SAV_ISQPSLP_ANS", "The signed qualifying property: 'signer-location' is not present!"),
    CryptoAcceptable => ("ASCCM", "Are the cryptographic constraints met?"),
    CryptoAcceptableAns => ("ASCCM_ANS", "The cryptographic constraints are not met!"),

    // --- Revocation data acceptance ---
    RacIssuerKnown => ("RAC_IRIK", "Is the revocation data issuer known?"),
    RacIssuerKnownAns => ("RAC_IRIK_ANS", "The revocation data issuer is not known!"),
    RacSignatureIntact => ("RAC_IRSI", "Is the revocation data signature intact?"),
    RacSignatureIntactAns => ("RAC_IRSI_ANS", "The revocation data signature is not intact!"),
    RacConsistent => ("RAC_IRDC", "Is the revocation data consistent?"),
    RacConsistentAns => ("RAC_IRDC_ANS", "The revocation data is not consistent!"),
    RacFresh => ("RAC_IRDF", "Is the revocation data fresh?"),
    RacFreshAns => ("RAC_IRDF_ANS", "The revocation data is not fresh!"),
}

impl fmt::Display for MessageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for MessageTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}
