//! Trusted + intermediary composition consumed by the validator

use super::{
    CertificateStore, IntermediaryCertificateStore, StoreKind, TrustedCertificateStore,
};
use crate::token::{CertificateToken, DistinguishedName, Fingerprint};

/// A possible issuer together with the store it came from
#[derive(Debug, Clone, Copy)]
pub struct IssuerCandidate<'a> {
    /// The candidate certificate
    pub token: &'a CertificateToken,
    /// Store it was found in
    pub source: StoreKind,
}

impl IssuerCandidate<'_> {
    /// Whether the candidate was found among the trust anchors
    #[must_use]
    pub fn is_trust_anchor(&self) -> bool {
        self.source == StoreKind::Trusted
    }
}

/// Exactly one trusted and one intermediary store
#[derive(Debug, Clone, Default)]
pub struct CertificatesStore {
    trusted: TrustedCertificateStore,
    intermediary: IntermediaryCertificateStore,
}

impl CertificatesStore {
    /// Compose the two stores
    #[must_use]
    pub fn new(trusted: TrustedCertificateStore, intermediary: IntermediaryCertificateStore) -> Self {
        tracing::debug!(
            trusted = trusted.len(),
            intermediary = intermediary.len(),
            "certificates store assembled"
        );
        Self {
            trusted,
            intermediary,
        }
    }

    /// The trust anchors
    #[must_use]
    pub fn trusted(&self) -> &TrustedCertificateStore {
        &self.trusted
    }

    /// The intermediate certificates
    #[must_use]
    pub fn intermediary(&self) -> &IntermediaryCertificateStore {
        &self.intermediary
    }

    /// Certificates whose subject is `issuer_dn`: intermediary matches first,
    /// then trusted ones
    #[must_use]
    pub fn find_issuer_candidates(&self, issuer_dn: &DistinguishedName) -> Vec<IssuerCandidate<'_>> {
        let intermediary = self
            .intermediary
            .get_by_subject(issuer_dn)
            .into_iter()
            .map(|token| IssuerCandidate {
                token,
                source: StoreKind::Intermediary,
            });
        let trusted = self
            .trusted
            .get_by_subject(issuer_dn)
            .into_iter()
            .map(|token| IssuerCandidate {
                token,
                source: StoreKind::Trusted,
            });

        intermediary.chain(trusted).collect()
    }

    /// [`CertificatesStore::find_issuer_candidates`] without the source tags
    #[must_use]
    pub fn find_issuer(&self, issuer_dn: &DistinguishedName) -> Vec<&CertificateToken> {
        self.find_issuer_candidates(issuer_dn)
            .into_iter()
            .map(|candidate| candidate.token)
            .collect()
    }

    /// Whether `fingerprint` is a trust anchor
    #[must_use]
    pub fn contains_trusted(&self, fingerprint: &Fingerprint) -> bool {
        self.trusted.contains(fingerprint)
    }
}
