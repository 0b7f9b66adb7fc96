//! Trust anchors

use super::collection::CertificateCollection;
use super::{impl_certificate_store, StoreKind};

/// Certificates the operator trusts a priori.
///
/// Only self-signed members terminate a chain as trusted.
#[derive(Debug, Clone, Default)]
pub struct TrustedCertificateStore {
    certificates: CertificateCollection,
}

impl TrustedCertificateStore {
    /// Empty trusted store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl_certificate_store!(TrustedCertificateStore, StoreKind::Trusted);
