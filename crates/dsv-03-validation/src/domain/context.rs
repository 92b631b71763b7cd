//! Trust anchors and the per-run validation context.

use crate::config::EngineConfig;
use crate::ports::outbound::CertificateVerifier;
use chrono::{DateTime, Utc};
use dsv_01_evidence::CertificateToken;
use dsv_02_constraints::ValidationPolicy;
use shared_types::TokenId;
use std::collections::HashSet;
use std::sync::Arc;

/// Certificates trusted without further chain validation.
#[derive(Clone, Debug, Default)]
pub struct TrustedCertificates {
    certificates: Vec<Arc<CertificateToken>>,
    ids: HashSet<TokenId>,
}

impl TrustedCertificates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an anchor; duplicates are ignored.
    pub fn add(&mut self, certificate: impl Into<Arc<CertificateToken>>) {
        let certificate = certificate.into();
        if self.ids.insert(certificate.id()) {
            self.certificates.push(certificate);
        }
    }

    pub fn with(mut self, certificate: impl Into<Arc<CertificateToken>>) -> Self {
        self.add(certificate);
        self
    }

    pub fn contains(&self, id: TokenId) -> bool {
        self.ids.contains(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<CertificateToken>> + '_ {
        self.certificates.iter()
    }

    pub fn len(&self) -> usize {
        self.certificates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.certificates.is_empty()
    }
}

impl FromIterator<Arc<CertificateToken>> for TrustedCertificates {
    fn from_iter<I: IntoIterator<Item = Arc<CertificateToken>>>(iter: I) -> Self {
        let mut anchors = Self::new();
        for certificate in iter {
            anchors.add(certificate);
        }
        anchors
    }
}

/// Everything a validation run reads besides the signature itself.
#[derive(Clone, Copy)]
pub struct ValidationContext<'a> {
    pub policy: &'a ValidationPolicy,
    pub config: &'a EngineConfig,
    pub trust_anchors: &'a TrustedCertificates,
    pub verifier: &'a dyn CertificateVerifier,
    pub validation_time: DateTime<Utc>,
}
