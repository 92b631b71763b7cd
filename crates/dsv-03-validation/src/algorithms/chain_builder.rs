//! Prospective certificate chain building
//!
//! Walks issuer links from the signing certificate over the run's token pool
//! and the trust anchors. Trust anchors are preferred as issuers. The walk
//! ends at a trust anchor (trusted), at a certificate without a known
//! issuer, or when an issuer repeats.

use crate::domain::context::ValidationContext;
use crate::domain::entities::{CertificateChain, ChainLink};
use dsv_01_evidence::{CertificateToken, TokenStore};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Build the chain of `signing` without revocation assessment.
pub fn build_chain(signing: &Arc<CertificateToken>, pool: &TokenStore, ctx: &ValidationContext<'_>) -> CertificateChain {
    let mut chain = CertificateChain::default();
    let mut visited = HashSet::new();
    let mut current = signing.clone();

    loop {
        visited.insert(current.id());

        if ctx.trust_anchors.contains(current.id()) {
            chain.links.push(link(current, None, true));
            chain.trusted = true;
            break;
        }

        let issuer = find_issuer(&current, pool, ctx);
        chain.links.push(link(current, issuer.clone(), false));

        match issuer {
            Some(issuer) if !visited.contains(&issuer.id()) => current = issuer,
            _ => break,
        }
    }

    debug!(
        signing_certificate = %signing.id(),
        length = chain.len(),
        trusted = chain.trusted,
        "Certificate chain built"
    );
    chain
}

fn link(certificate: Arc<CertificateToken>, issuer: Option<Arc<CertificateToken>>, trust_anchor: bool) -> ChainLink {
    ChainLink {
        certificate,
        issuer,
        trust_anchor,
        revocation: Default::default(),
    }
}

/// First verified issuer, anchors before pool certificates. A self-signed
/// certificate that is not an anchor has no issuer other than itself.
fn find_issuer(
    certificate: &CertificateToken,
    pool: &TokenStore,
    ctx: &ValidationContext<'_>,
) -> Option<Arc<CertificateToken>> {
    ctx.trust_anchors
        .iter()
        .chain(pool.certificates())
        .filter(|candidate| candidate.id() != certificate.id())
        .find(|candidate| ctx.verifier.verify_issued_by(certificate, candidate))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::NameChainingVerifier;
    use crate::config::EngineConfig;
    use crate::domain::context::TrustedCertificates;
    use dsv_01_evidence::{CertificateInfo, CertificateOrigin};
    use dsv_02_constraints::ValidationPolicy;

    fn cert(subject: &str, issuer: &str) -> Arc<CertificateToken> {
        Arc::new(
            CertificateToken::new(
                format!("{}<-{}", subject, issuer).into_bytes(),
                CertificateInfo {
                    subject_dn: subject.into(),
                    issuer_dn: issuer.into(),
                    ..Default::default()
                },
            )
            .unwrap(),
        )
    }

    fn pool(certificates: &[&Arc<CertificateToken>]) -> TokenStore {
        let mut store = TokenStore::new();
        for certificate in certificates {
            store.add_certificate((*certificate).clone(), CertificateOrigin::CertificateValues);
        }
        store
    }

    fn chain_with(anchors: TrustedCertificates, signing: &Arc<CertificateToken>, store: &TokenStore) -> CertificateChain {
        let config = EngineConfig::default();
        let ctx = ValidationContext {
            policy: ValidationPolicy::default_policy(),
            config: &config,
            trust_anchors: &anchors,
            verifier: &NameChainingVerifier,
            validation_time: chrono::Utc::now(),
        };
        build_chain(signing, store, &ctx)
    }

    #[test]
    fn test_chain_to_anchor() {
        let root = cert("CN=Root", "CN=Root");
        let ca = cert("CN=CA", "CN=Root");
        let signer = cert("CN=Signer", "CN=CA");
        let store = pool(&[&signer, &ca]);

        let chain = chain_with(TrustedCertificates::new().with(root.clone()), &signer, &store);
        assert!(chain.trusted);
        assert_eq!(chain.ids(), vec![signer.id(), ca.id(), root.id()]);
        assert!(chain.links[2].trust_anchor);
        assert_eq!(chain.links[0].issuer.as_ref().map(|c| c.id()), Some(ca.id()));
    }

    #[test]
    fn test_missing_issuer_untrusted() {
        let signer = cert("CN=Signer", "CN=Absent CA");
        let store = pool(&[&signer]);

        let chain = chain_with(TrustedCertificates::new(), &signer, &store);
        assert!(!chain.trusted);
        assert_eq!(chain.len(), 1);
        assert!(chain.links[0].issuer.is_none());
    }

    /// Cross-issued certificates end the walk instead of looping.
    #[test]
    fn test_issuer_cycle_terminates() {
        let a = cert("CN=A", "CN=B");
        let b = cert("CN=B", "CN=A");
        let store = pool(&[&a, &b]);

        let chain = chain_with(TrustedCertificates::new(), &a, &store);
        assert!(!chain.trusted);
        assert_eq!(chain.len(), 2);
    }

    #[test]
    fn test_signing_anchor_is_single_link() {
        let signer = cert("CN=Signer", "CN=CA");
        let store = pool(&[&signer]);

        let chain = chain_with(TrustedCertificates::new().with(signer.clone()), &signer, &store);
        assert!(chain.trusted);
        assert_eq!(chain.len(), 1);
    }
}
