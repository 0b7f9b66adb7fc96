//! Single binary DER certificate

use der::Decode;
use x509_cert::Certificate;

use super::ParsedContainer;
use crate::error::{CertificateError, Result};
use crate::token::CertificateFormat;

pub(super) fn parse(bytes: &[u8]) -> Result<ParsedContainer> {
    Certificate::from_der(bytes)
        .map_err(|e| CertificateError::parse(format!("X.509 parsing failed: {e}")))?;

    Ok(ParsedContainer::single(
        CertificateFormat::Der,
        bytes.to_vec(),
    ))
}
