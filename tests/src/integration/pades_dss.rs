//! # Document-Level Validation Data
//!
//! PAdES documents carry shared certificates and revocation data in the
//! DSS and VRI dictionaries. Every signature of the document sees them.

#[cfg(test)]
mod tests {
    use crate::fixtures::{certificate_with, service, signed_by, validation_time, Hierarchy};
    use chrono::Duration;
    use dsv_01_evidence::{
        CertificateOrigin, CertificateRef, CertificateRefOrigin, CertificateStatus, CertificateToken, Origin,
        ResponderId, RevocationEntry, RevocationInfo, RevocationOrigin, RevocationToken, SignatureFormat,
    };
    use dsv_03_validation::{DocumentInput, SignatureValidationApi, ValidationError};
    use shared_types::Indication;
    use std::sync::Arc;

    fn document(hierarchy: &Hierarchy, name: &str) -> DocumentInput {
        let mut document = DocumentInput::new(name)
            .with_signature(signed_by("S-1", SignatureFormat::PAdES, &hierarchy.signer, CertificateOrigin::SignedData))
            .with_signature(signed_by("S-2", SignatureFormat::PAdES, &hierarchy.signer, CertificateOrigin::SignedData));
        document
            .document_certificates
            .add_certificate(CertificateOrigin::DssDictionary, hierarchy.ca.clone());
        document
            .document_certificates
            .add_certificate(CertificateOrigin::VriDictionary, hierarchy.ca.clone());
        document
            .document_revocations
            .add_revocation(RevocationOrigin::DssDictionary, hierarchy.root_crl());
        document
    }

    fn ocsp_responder() -> Arc<CertificateToken> {
        certificate_with("CN=OCSP Responder,O=DSV,C=BE", "CN=Issuing CA,O=DSV,C=BE", 40, |info| {
            info.extended_key_usages.insert("OCSPSigning".to_string());
        })
    }

    /// OCSP response for the signer, carrying its responder certificate.
    fn ocsp_response(hierarchy: &Hierarchy, responder: &Arc<CertificateToken>) -> Arc<RevocationToken> {
        let responder_id = ResponderId::ByName(responder.info.subject_dn.clone());
        let mut info = RevocationInfo::ocsp(responder_id.clone(), validation_time() - Duration::hours(1));
        info.entries.push(RevocationEntry {
            certificate: hierarchy.signer.issuer_serial(),
            status: CertificateStatus::Good,
        });
        info.certificate_source
            .add_certificate(CertificateOrigin::BasicOcspResponse, responder.clone());
        info.certificate_source.add_reference(CertificateRef::by_responder(responder_id));
        Arc::new(RevocationToken::new(b"ocsp:signer".to_vec(), info).unwrap())
    }

    // =========================================================================
    // DSS AND VRI
    // =========================================================================

    #[test]
    fn test_dss_data_validates_every_signature() {
        let hierarchy = Hierarchy::new();
        let mut document = document(&hierarchy, "signed.pdf");
        document
            .document_revocations
            .add_revocation(RevocationOrigin::DssDictionary, hierarchy.ca_crl("ca-crl", Vec::new()));

        let report = service(hierarchy.anchors()).validate_document(&document).unwrap();

        assert_eq!(report.signatures.len(), 2);
        assert!(report.all_passed());
        assert_eq!(report.signatures[0].signature_id, "S-1");
        assert_eq!(report.signatures[1].signature_id, "S-2");
    }

    /// One CA in both dictionaries is one pool token with both origins.
    #[test]
    fn test_dss_and_vri_copies_deduplicated() {
        let hierarchy = Hierarchy::new();
        let mut document = document(&hierarchy, "signed.pdf");
        document
            .document_revocations
            .add_revocation(RevocationOrigin::DssDictionary, hierarchy.ca_crl("ca-crl", Vec::new()));

        let report = service(hierarchy.anchors()).validate_document(&document).unwrap();
        let signature = report.signature("S-2").unwrap();

        let pooled = signature.evidence.pool.get(hierarchy.ca.id()).unwrap();
        assert!(pooled.has_origin(Origin::from(CertificateOrigin::DssDictionary)));
        assert!(pooled.has_origin(Origin::from(CertificateOrigin::VriDictionary)));

        let found = &signature.evidence.signature;
        let related = found.related_certificate(hierarchy.ca.id()).unwrap();
        assert_eq!(related.origins.len(), 2);
        assert_eq!(found.related_certificates_by_origin(CertificateOrigin::DssDictionary).len(), 1);
        assert_eq!(found.related_certificates().len(), 2);
        assert_eq!(signature.orphan_count(), 0);
    }

    /// Without the issuing CA's CRL the signer's status cannot be decided.
    #[test]
    fn test_dss_without_signer_revocation_data() {
        let hierarchy = Hierarchy::new();
        let document = document(&hierarchy, "unrevoked.pdf");

        let report = service(hierarchy.anchors()).validate_document(&document).unwrap();
        assert!(!report.all_passed());
        assert!(report
            .signatures
            .iter()
            .all(|signature| signature.indication == Indication::Indeterminate));
    }

    // =========================================================================
    // OCSP RESPONDER CERTIFICATES
    // =========================================================================

    #[test]
    fn test_ocsp_responder_belongs_to_revocation_owner() {
        let hierarchy = Hierarchy::new();
        let responder = ocsp_responder();
        let ocsp = ocsp_response(&hierarchy, &responder);
        let mut document = document(&hierarchy, "ocsp.pdf");
        document
            .document_revocations
            .add_revocation(RevocationOrigin::DssDictionary, ocsp.clone());

        let report = service(hierarchy.anchors()).validate_document(&document).unwrap();
        let signature = &report.signatures[0];
        let evidence = &signature.evidence;

        assert!(evidence
            .signature
            .related_certificates_by_origin(CertificateOrigin::BasicOcspResponse)
            .is_empty());
        let by_ocsp = evidence.revocation(ocsp.id()).unwrap();
        assert_eq!(by_ocsp.related_certificates_by_origin(CertificateOrigin::BasicOcspResponse).len(), 1);
        assert_eq!(by_ocsp.related_certificates_by_ref_origin(CertificateRefOrigin::OcspResponderId).len(), 1);
        assert_eq!(by_ocsp.orphan_count(), 0);
        assert!(evidence
            .pool
            .get(responder.id())
            .unwrap()
            .has_origin(Origin::from(CertificateOrigin::BasicOcspResponse)));

        assert_eq!(signature.indication, Indication::TotalPassed);
    }

    /// A responder reference whose certificate is absent is an orphan of the
    /// OCSP response, not of the signature.
    #[test]
    fn test_missing_responder_certificate_orphan() {
        let hierarchy = Hierarchy::new();
        let responder = ocsp_responder();
        let responder_id = ResponderId::ByName(responder.info.subject_dn.clone());
        let mut info = RevocationInfo::ocsp(responder_id.clone(), validation_time() - Duration::hours(1));
        info.certificate_source.add_reference(CertificateRef::by_responder(responder_id));
        let ocsp = Arc::new(RevocationToken::new(b"ocsp:no-responder".to_vec(), info).unwrap());

        let mut document = document(&hierarchy, "orphan.pdf");
        document
            .document_revocations
            .add_revocation(RevocationOrigin::DssDictionary, ocsp.clone());

        let report = service(hierarchy.anchors()).validate_document(&document).unwrap();
        let evidence = &report.signatures[0].evidence;
        assert_eq!(evidence.signature.orphan_count(), 0);
        assert_eq!(evidence.revocation(ocsp.id()).unwrap().orphan_count(), 1);
    }

    // =========================================================================
    // DOCUMENT CONTRACT
    // =========================================================================

    #[test]
    fn test_document_without_signatures_rejected() {
        let hierarchy = Hierarchy::new();
        let err = service(hierarchy.anchors())
            .validate_document(&DocumentInput::new("blank.pdf"))
            .unwrap_err();
        assert!(matches!(err, ValidationError::EmptyDocument(_)));
    }
}
