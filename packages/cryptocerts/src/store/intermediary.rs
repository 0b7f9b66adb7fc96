//! Intermediate CA certificates

use super::collection::CertificateCollection;
use super::{impl_certificate_store, StoreKind};

/// CA certificates offered to path building without being trusted themselves
#[derive(Debug, Clone, Default)]
pub struct IntermediaryCertificateStore {
    certificates: CertificateCollection,
}

impl IntermediaryCertificateStore {
    /// Empty intermediary store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl_certificate_store!(IntermediaryCertificateStore, StoreKind::Intermediary);
