//! Validation outcomes

use std::time::SystemTime;

use crate::error::{CertificateError, Result};
use crate::token::{CertificateToken, DistinguishedName, Fingerprint};

/// Overall verdict of one validation call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationConclusion {
    /// The chain reached a trust anchor
    Valid,
    /// Something in `errors` stopped the walk
    Invalid,
}

/// Problems found while walking a chain. Recorded in the result, never raised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationErrorKind {
    /// `evaluated_at` is after the certificate's `not_after`
    #[error("certificate {subject} expired (not after {not_after:?})")]
    CertificateExpired {
        /// Subject of the expired certificate
        subject: DistinguishedName,
        /// Its fingerprint
        fingerprint: Fingerprint,
        /// End of its validity window
        not_after: SystemTime,
    },

    /// `evaluated_at` is before the certificate's `not_before`
    #[error("certificate {subject} is not yet valid (not before {not_before:?})")]
    CertificateNotYetValid {
        /// Subject of the certificate
        subject: DistinguishedName,
        /// Its fingerprint
        fingerprint: Fingerprint,
        /// Start of its validity window
        not_before: SystemTime,
    },

    /// The walk ended at a self-signed certificate that is not a trust anchor
    #[error("self-signed root {subject} is not in the trusted store")]
    UntrustedRoot {
        /// Subject of the root
        subject: DistinguishedName,
        /// Its fingerprint
        fingerprint: Fingerprint,
    },

    /// No candidate named as the issuer verified the signature
    #[error("no issuer {issuer} found for {subject}")]
    IssuerNotFound {
        /// Subject of the certificate left unresolved
        subject: DistinguishedName,
        /// Issuer name that was searched for
        issuer: DistinguishedName,
        /// Fingerprint of the unresolved certificate
        fingerprint: Fingerprint,
    },

    /// More issuer hops than the configured bound
    #[error("chain longer than {max_depth} issuers, cycle suspected")]
    ChainTooLong {
        /// The bound that was exceeded
        max_depth: usize,
    },
}

impl ValidationErrorKind {
    /// Whether the error comes from a validity window check
    #[must_use]
    pub fn is_validity_error(&self) -> bool {
        matches!(
            self,
            Self::CertificateExpired { .. } | Self::CertificateNotYetValid { .. }
        )
    }
}

/// Result of [`crate::CertificateValidator::validate_certificate`].
///
/// `valid_to_trusted_root` implies a `Valid` conclusion and a `built_chain` that
/// ends in a self-signed trust anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    /// Overall verdict
    pub validation_conclusion: ValidationConclusion,
    /// Whether the built chain ends in a trust anchor
    pub valid_to_trusted_root: bool,
    /// Certificates actually used, leaf first
    pub built_chain: Vec<CertificateToken>,
    /// Why the chain is not trusted; empty when it is
    pub errors: Vec<ValidationErrorKind>,
    /// Instant the validity windows were checked against
    pub evaluated_at: SystemTime,
}

impl ValidationResult {
    /// Whether the conclusion is [`ValidationConclusion::Valid`]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validation_conclusion == ValidationConclusion::Valid
    }

    /// Last certificate of the built chain
    #[must_use]
    pub fn root(&self) -> Option<&CertificateToken> {
        self.built_chain.last()
    }

    /// Fail closed: turn an untrusted result into [`CertificateError::InvalidChain`]
    pub fn into_trusted(self) -> Result<Self> {
        if self.valid_to_trusted_root {
            Ok(self)
        } else {
            Err(CertificateError::InvalidChain {
                errors: self.errors,
            })
        }
    }
}
