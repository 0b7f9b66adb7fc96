//! PEM text holding one or more `CERTIFICATE` blocks

use der::Decode;
use x509_cert::Certificate;

use super::ParsedContainer;
use crate::error::{CertificateError, Result};
use crate::token::CertificateFormat;

pub(super) fn parse(bytes: &[u8]) -> Result<ParsedContainer> {
    let mut cursor = std::io::Cursor::new(bytes);
    let certificates = rustls_pemfile::certs(&mut cursor)
        .map(|cert| {
            let cert_der =
                cert.map_err(|e| CertificateError::parse(format!("Failed to parse PEM: {e}")))?;
            Certificate::from_der(&cert_der)
                .map_err(|e| CertificateError::parse(format!("X.509 parsing failed: {e}")))?;
            Ok(cert_der.to_vec())
        })
        .collect::<Result<Vec<_>>>()?;

    if certificates.is_empty() {
        return Err(CertificateError::parse("No certificate in PEM data"));
    }

    Ok(ParsedContainer {
        format: CertificateFormat::Pem,
        certificates,
        primary: 0,
    })
}
