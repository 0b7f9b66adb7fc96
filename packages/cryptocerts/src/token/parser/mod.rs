//! Container format detection
//!
//! Raw input is run through an ordered table of strategies (DER, PEM, PKCS7).
//! The first strategy that yields at least one structurally valid certificate
//! decides the format; nothing downstream branches on the input encoding again.

mod der_format;
mod pem_format;
mod pkcs7_format;

use crate::error::{CertificateError, Result};
use crate::token::CertificateFormat;

/// Certificates recovered from one input, in container order
#[derive(Debug)]
pub(crate) struct ParsedContainer {
    pub format: CertificateFormat,
    /// DER encoding of each certificate
    pub certificates: Vec<Vec<u8>>,
    /// Index of the certificate the container is about
    pub primary: usize,
}

impl ParsedContainer {
    pub(crate) fn single(format: CertificateFormat, der: Vec<u8>) -> Self {
        Self {
            format,
            certificates: vec![der],
            primary: 0,
        }
    }

    /// Whether the container is a bundle whose members become the token chain
    pub(crate) fn is_bundle(&self) -> bool {
        self.format == CertificateFormat::Pkcs7 || self.certificates.len() > 1
    }
}

type ParseStrategy = fn(&[u8]) -> Result<ParsedContainer>;

const STRATEGIES: &[(CertificateFormat, ParseStrategy)] = &[
    (CertificateFormat::Der, der_format::parse),
    (CertificateFormat::Pem, pem_format::parse),
    (CertificateFormat::Pkcs7, pkcs7_format::parse),
];

/// Detect the container format and extract its certificates
pub(crate) fn parse_container(bytes: &[u8]) -> Result<ParsedContainer> {
    if bytes.is_empty() {
        return Err(CertificateError::parse("empty input"));
    }

    let mut failures = Vec::with_capacity(STRATEGIES.len());
    for (format, strategy) in STRATEGIES {
        match strategy(bytes) {
            Ok(container) => {
                tracing::trace!(
                    format = %format,
                    certificates = container.certificates.len(),
                    "certificate container parsed"
                );
                return Ok(container);
            }
            Err(e) => failures.push(format!("{format}: {e}")),
        }
    }

    Err(CertificateError::parse(format!(
        "no supported certificate format matched ({})",
        failures.join("; ")
    )))
}
