//! Keyed storage shared by the store variants

use std::collections::HashMap;

use super::StoreKind;
use crate::error::{CertificateError, Result};
use crate::token::{CertificateToken, DistinguishedName, Fingerprint};

#[derive(Debug, Clone, Default)]
pub(crate) struct CertificateCollection {
    by_fingerprint: HashMap<Fingerprint, CertificateToken>,
    by_subject: HashMap<DistinguishedName, Vec<Fingerprint>>,
}

impl CertificateCollection {
    pub(crate) fn insert(&mut self, token: CertificateToken, kind: StoreKind) -> Result<()> {
        let fingerprint = token.fingerprint();
        if self.by_fingerprint.contains_key(&fingerprint) {
            tracing::warn!(
                store = %kind,
                fingerprint = %fingerprint.short(),
                subject = %token.subject(),
                "duplicate certificate rejected"
            );
            return Err(CertificateError::CertificateAlreadyStored { fingerprint });
        }

        tracing::debug!(
            store = %kind,
            fingerprint = %fingerprint.short(),
            subject = %token.subject(),
            "certificate stored"
        );
        self.by_subject
            .entry(token.subject().clone())
            .or_default()
            .push(fingerprint);
        self.by_fingerprint.insert(fingerprint, token);
        Ok(())
    }

    pub(crate) fn get(&self, fingerprint: &Fingerprint) -> Option<&CertificateToken> {
        self.by_fingerprint.get(fingerprint)
    }

    pub(crate) fn by_subject(&self, subject: &DistinguishedName) -> Vec<&CertificateToken> {
        self.by_subject
            .get(subject)
            .map(|fingerprints| {
                fingerprints
                    .iter()
                    .filter_map(|fp| self.by_fingerprint.get(fp))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub(crate) fn len(&self) -> usize {
        self.by_fingerprint.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &CertificateToken> {
        self.by_fingerprint.values()
    }
}
