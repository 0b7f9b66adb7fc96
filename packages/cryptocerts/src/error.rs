//! Error types for certificate parsing, storage and fail-closed validation

use std::path::PathBuf;

use crate::token::Fingerprint;
use crate::validator::ValidationErrorKind;

/// Errors raised to the caller.
///
/// Trust decisions are not errors: an untrusted or expired chain comes back as an
/// `INVALID` [`crate::ValidationResult`]. Only [`CertificateError::InvalidChain`]
/// carries validation outcomes, and only from the fail-closed wrappers.
#[derive(Debug, thiserror::Error)]
pub enum CertificateError {
    /// Input matched none of the supported certificate encodings
    #[error("Parse error: {0}")]
    ParseError(String),

    /// A store already holds a certificate with this fingerprint
    #[error("Certificate already stored: {fingerprint}")]
    CertificateAlreadyStored {
        /// Fingerprint of the rejected certificate
        fingerprint: Fingerprint,
    },

    /// A fail-closed validation did not reach a trust anchor
    #[error("Invalid certificate chain: {}", join_errors(.errors))]
    InvalidChain {
        /// What the chain walk recorded
        errors: Vec<ValidationErrorKind>,
    },

    /// Reading a certificate or configuration file failed
    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        /// File that could not be read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Rejected validator configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CertificateError {
    pub(crate) fn parse(message: impl Into<String>) -> Self {
        Self::ParseError(message.into())
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

fn join_errors(errors: &[ValidationErrorKind]) -> String {
    if errors.is_empty() {
        return "no trust path".to_string();
    }
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, CertificateError>;
