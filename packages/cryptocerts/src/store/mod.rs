//! Certificate stores
//!
//! Stores are populate-then-query collections keyed by fingerprint:
//! - `collection`: the shared keyed storage behind every store
//! - `trusted`: trust anchors chosen by the operator
//! - `intermediary`: CA certificates available for path building only
//! - `certificates`: the composition the validator consumes
//!
//! Stores do no internal locking. Populate them up front, or wrap them in a
//! `RwLock` when insertion and validation have to interleave across threads.

mod certificates;
mod collection;
mod intermediary;
mod trusted;

use std::path::Path;

pub use certificates::{CertificatesStore, IssuerCandidate};
pub use intermediary::IntermediaryCertificateStore;
pub use trusted::TrustedCertificateStore;

use crate::error::{CertificateError, Result};
use crate::token::{CertificateToken, DistinguishedName, Fingerprint};

/// Which role a store plays in path building
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKind {
    /// Trust anchors
    Trusted,
    /// Path-building material only
    Intermediary,
}

impl std::fmt::Display for StoreKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Trusted => "trusted",
            Self::Intermediary => "intermediary",
        })
    }
}

/// Insertion and lookup contract shared by every store variant
pub trait CertificateStore {
    /// Role of this store
    fn kind(&self) -> StoreKind;

    /// Insert `token`, failing with [`CertificateError::CertificateAlreadyStored`]
    /// when its fingerprint is already present
    fn add_certificate(&mut self, token: CertificateToken) -> Result<()>;

    /// Certificate stored under `fingerprint`
    fn get_by_fingerprint(&self, fingerprint: &Fingerprint) -> Option<&CertificateToken>;

    /// Every certificate with this subject, in insertion order
    fn get_by_subject(&self, subject: &DistinguishedName) -> Vec<&CertificateToken>;

    /// Number of stored certificates
    fn len(&self) -> usize;

    /// Stored certificates in no particular order
    fn iter(&self) -> Box<dyn Iterator<Item = &CertificateToken> + '_>;

    /// Whether nothing is stored
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a certificate with `fingerprint` is stored
    fn contains(&self, fingerprint: &Fingerprint) -> bool {
        self.get_by_fingerprint(fingerprint).is_some()
    }

    /// Insert every token, stopping at the first duplicate
    fn add_certificates<I>(&mut self, tokens: I) -> Result<usize>
    where
        I: IntoIterator<Item = CertificateToken>,
        Self: Sized,
    {
        let mut added = 0;
        for token in tokens {
            self.add_certificate(token)?;
            added += 1;
        }
        Ok(added)
    }

    /// Insert every certificate found in a PEM, DER or PKCS7 container
    fn load_bundle(&mut self, bytes: &[u8]) -> Result<usize>
    where
        Self: Sized,
    {
        let tokens = CertificateToken::parse_all(bytes)?;
        let added = self.add_certificates(tokens)?;
        tracing::debug!(store = %self.kind(), added, "certificate bundle loaded");
        Ok(added)
    }

    /// [`CertificateStore::load_bundle`] on the contents of `path`
    fn load_bundle_file<P: AsRef<Path>>(&mut self, path: P) -> Result<usize>
    where
        Self: Sized,
    {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| CertificateError::io(path, e))?;
        self.load_bundle(&bytes)
    }
}

/// Implement [`CertificateStore`] for a newtype over `CertificateCollection`
macro_rules! impl_certificate_store {
    ($store:ty, $kind:expr) => {
        impl $crate::store::CertificateStore for $store {
            fn kind(&self) -> $crate::store::StoreKind {
                $kind
            }

            fn add_certificate(
                &mut self,
                token: $crate::token::CertificateToken,
            ) -> $crate::error::Result<()> {
                self.certificates.insert(token, $kind)
            }

            fn get_by_fingerprint(
                &self,
                fingerprint: &$crate::token::Fingerprint,
            ) -> Option<&$crate::token::CertificateToken> {
                self.certificates.get(fingerprint)
            }

            fn get_by_subject(
                &self,
                subject: &$crate::token::DistinguishedName,
            ) -> Vec<&$crate::token::CertificateToken> {
                self.certificates.by_subject(subject)
            }

            fn len(&self) -> usize {
                self.certificates.len()
            }

            fn iter(&self) -> Box<dyn Iterator<Item = &$crate::token::CertificateToken> + '_> {
                Box::new(self.certificates.iter())
            }
        }
    };
}

pub(crate) use impl_certificate_store;
