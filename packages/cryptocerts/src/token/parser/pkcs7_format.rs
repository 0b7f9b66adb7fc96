//! PKCS#7 / CMS `SignedData` certificate bundles (P7B, P7C)
//!
//! Accepts the binary `ContentInfo`, a PEM armoured one (`PKCS7`, `CMS`) or a bare
//! base64 body as some CAs publish it.
//!
//! Members keep the order they have in the file. Only DER is accepted: BER
//! bundles with indefinite lengths, as some Windows exports produce, are
//! rejected with a parse error.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use cms::content_info::ContentInfo;
use const_oid::ObjectIdentifier;
use der::{Decode, Encode, Header, Reader, SliceReader, Tag, TagNumber, Tagged};
use x509_cert::Certificate;

use super::ParsedContainer;
use crate::error::{CertificateError, Result};
use crate::token::CertificateFormat;

const ID_SIGNED_DATA: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.7.2");

const PEM_LABELS: &[&str] = &["PKCS7", "CMS", "PKCS #7 SIGNED DATA"];

pub(super) fn parse(bytes: &[u8]) -> Result<ParsedContainer> {
    let envelope = unwrap_envelope(bytes)?;
    let members = extract_certificates(&envelope)?;
    let primary = select_primary(&members);
    let certificates = members.into_iter().map(|(der, _)| der).collect();

    Ok(ParsedContainer {
        format: CertificateFormat::Pkcs7,
        certificates,
        primary,
    })
}

/// Binary `ContentInfo` bytes from any of the accepted wrappings
fn unwrap_envelope(bytes: &[u8]) -> Result<Vec<u8>> {
    if bytes.first() == Some(&0x30) {
        return Ok(bytes.to_vec());
    }

    let text = std::str::from_utf8(bytes)
        .map_err(|_| CertificateError::parse("PKCS7 input is neither DER nor text"))?;

    if text.contains("-----BEGIN") {
        let blocks = pem::parse_many(text)
            .map_err(|e| CertificateError::parse(format!("Failed to parse PEM: {e}")))?;
        return blocks
            .into_iter()
            .find(|block| PEM_LABELS.contains(&block.tag()))
            .map(pem::Pem::into_contents)
            .ok_or_else(|| CertificateError::parse("No PKCS7 block in PEM data"));
    }

    let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    STANDARD
        .decode(compact)
        .map_err(|e| CertificateError::parse(format!("Invalid base64 PKCS7 body: {e}")))
}

/// Certificates of the `SignedData` in the order they appear in the file.
///
/// The `certificates` field is walked element by element instead of decoded as a
/// `SET OF`, which would re-sort the members into DER order.
fn extract_certificates(envelope: &[u8]) -> Result<Vec<(Vec<u8>, Certificate)>> {
    let content_info = ContentInfo::from_der(envelope)
        .map_err(|e| CertificateError::parse(format!("Failed to parse PKCS7 ContentInfo: {e}")))?;

    if content_info.content_type != ID_SIGNED_DATA {
        return Err(CertificateError::parse(format!(
            "PKCS7 content type {} is not signedData",
            content_info.content_type
        )));
    }

    if content_info.content.tag() != Tag::Sequence {
        return Err(CertificateError::parse("PKCS7 SignedData is not a SEQUENCE"));
    }

    let members = certificate_set(content_info.content.value())
        .map_err(|e| CertificateError::parse(format!("Failed to parse PKCS7 SignedData: {e}")))?;

    let certificates = members
        .into_iter()
        .map(|der| {
            let cert = Certificate::from_der(der).map_err(|e| {
                CertificateError::parse(format!("X.509 parsing failed in PKCS7 bundle: {e}"))
            })?;
            Ok((der.to_vec(), cert))
        })
        .collect::<Result<Vec<_>>>()?;

    if certificates.is_empty() {
        return Err(CertificateError::parse("PKCS7 bundle carries no certificates"));
    }

    tracing::debug!(
        count = certificates.len(),
        "PKCS7 bundle certificates extracted"
    );
    Ok(certificates)
}

/// Raw `Certificate` elements of the `[0] IMPLICIT CertificateSet` field.
///
/// `signed_data` is the body of the `SignedData` SEQUENCE. Other certificate
/// choices (attribute and extended certificates) are skipped.
fn certificate_set(signed_data: &[u8]) -> der::Result<Vec<&[u8]>> {
    let mut reader = SliceReader::new(signed_data)?;

    // version, digestAlgorithms, encapContentInfo
    for _ in 0..3 {
        read_tlv(&mut reader)?;
    }

    if reader.is_finished() {
        return Ok(Vec::new());
    }
    let header = reader.peek_header()?;
    if !(header.tag.is_context_specific() && header.tag.number() == TagNumber::N0) {
        return Ok(Vec::new());
    }

    let header = Header::decode(&mut reader)?;
    let mut set = SliceReader::new(reader.read_slice(header.length)?)?;

    let mut members = Vec::new();
    while !set.is_finished() {
        let tag = set.peek_header()?.tag;
        let element = read_tlv(&mut set)?;
        if tag == Tag::Sequence {
            members.push(element);
        }
    }
    Ok(members)
}

/// One complete tag-length-value element
fn read_tlv<'a>(reader: &mut SliceReader<'a>) -> der::Result<&'a [u8]> {
    let header = reader.peek_header()?;
    let len = (header.encoded_len()? + header.length)?;
    reader.read_slice(len)
}

/// The leaf of the bundle: the first certificate that did not issue another one
fn select_primary(certificates: &[(Vec<u8>, Certificate)]) -> usize {
    let issues_another = |candidate: &Certificate| {
        let subject = &candidate.tbs_certificate.subject;
        certificates.iter().any(|(_, other)| {
            let tbs = &other.tbs_certificate;
            tbs.subject != tbs.issuer && &tbs.issuer == subject && !std::ptr::eq(other, candidate)
        })
    };

    certificates
        .iter()
        .position(|(_, cert)| !issues_another(cert))
        .unwrap_or(0)
}
