//! Certificate tokens
//!
//! A [`CertificateToken`] is the immutable, cheaply clonable view of one X.509
//! certificate parsed from PEM, DER or a PKCS7 bundle. Sub-modules:
//!
//! - `parser`: ordered format detection strategies
//! - `name`: distinguished names
//! - `key`: subject public key material
//! - `signature`: signature verification

mod key;
mod name;
mod parser;
mod signature;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::sync::Arc;
use std::time::SystemTime;

use const_oid::ObjectIdentifier;
use der::Decode;
use ring::digest::{self, SHA256};
use x509_cert::Certificate;

pub use key::PublicKeyInfo;
pub use name::DistinguishedName;

use crate::error::{CertificateError, Result};

/// Encoding the certificate was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CertificateFormat {
    /// Base64 text between `CERTIFICATE` armour lines
    Pem,
    /// Binary DER
    Der,
    /// PKCS#7 `SignedData` bundle (P7B, P7C)
    Pkcs7,
}

impl fmt::Display for CertificateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pem => "PEM",
            Self::Der => "DER",
            Self::Pkcs7 => "PKCS7",
        })
    }
}

/// SHA-256 over the certificate's DER encoding
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Fingerprint of `der`
    #[must_use]
    pub fn of(der: &[u8]) -> Self {
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(digest::digest(&SHA256, der).as_ref());
        Self(bytes)
    }

    /// Raw digest bytes
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// First 12 hex characters, for log lines
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..6])
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.short())
    }
}

#[derive(Clone)]
struct TokenInner {
    der: Vec<u8>,
    tbs: Vec<u8>,
    format: CertificateFormat,
    subject: DistinguishedName,
    issuer: DistinguishedName,
    not_before: SystemTime,
    not_after: SystemTime,
    public_key: PublicKeyInfo,
    signature: Vec<u8>,
    signature_algorithm: ObjectIdentifier,
    serial_number: Vec<u8>,
    fingerprint: Fingerprint,
    chain: Vec<CertificateToken>,
}

/// An immutable parsed X.509 certificate.
///
/// Clones share the parsed data. Two tokens are equal iff their fingerprints are.
#[derive(Clone)]
pub struct CertificateToken(Arc<TokenInner>);

impl CertificateToken {
    /// Parse a certificate from DER, PEM or PKCS7 bytes, tried in that order.
    ///
    /// Multi-certificate inputs yield the primary certificate with every member of
    /// the container (primary included) in [`CertificateToken::chain`].
    pub fn new(bytes: &[u8]) -> Result<Self> {
        let container = parser::parse_container(bytes)?;
        let is_bundle = container.is_bundle();
        let primary = container.primary;

        let mut members = container
            .certificates
            .into_iter()
            .map(|der| Self::from_der(der, container.format, Vec::new()))
            .collect::<Result<Vec<_>>>()?;

        if !is_bundle {
            return members
                .pop()
                .ok_or_else(|| CertificateError::parse("container held no certificate"));
        }

        let mut inner = members
            .get(primary)
            .map(|token| (*token.0).clone())
            .ok_or_else(|| CertificateError::parse("primary certificate out of range"))?;
        inner.chain = members;
        Ok(Self(Arc::new(inner)))
    }

    /// Read `path` and parse its contents with [`CertificateToken::new`]
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| CertificateError::io(path, e))?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "certificate file read");
        Self::new(&bytes)
    }

    /// Every certificate in a container as its own token, in container order
    pub fn parse_all(bytes: &[u8]) -> Result<Vec<Self>> {
        let container = parser::parse_container(bytes)?;
        container
            .certificates
            .into_iter()
            .map(|der| Self::from_der(der, container.format, Vec::new()))
            .collect()
    }

    fn from_der(der: Vec<u8>, format: CertificateFormat, chain: Vec<Self>) -> Result<Self> {
        let cert = Certificate::from_der(&der)
            .map_err(|e| CertificateError::parse(format!("X.509 parsing failed: {e}")))?;
        let tbs_certificate = &cert.tbs_certificate;

        let tbs = signature::raw_tbs_certificate(&der)
            .map_err(|e| CertificateError::parse(format!("Failed to locate TBS: {e}")))?
            .to_vec();

        let signature = cert
            .signature
            .as_bytes()
            .ok_or_else(|| CertificateError::parse("Signature has unused bits"))?
            .to_vec();

        let validity = &tbs_certificate.validity;

        Ok(Self(Arc::new(TokenInner {
            fingerprint: Fingerprint::of(&der),
            tbs,
            format,
            subject: DistinguishedName::from_name(&tbs_certificate.subject)?,
            issuer: DistinguishedName::from_name(&tbs_certificate.issuer)?,
            not_before: validity.not_before.to_system_time(),
            not_after: validity.not_after.to_system_time(),
            public_key: PublicKeyInfo::from_spki(&tbs_certificate.subject_public_key_info)?,
            signature,
            signature_algorithm: cert.signature_algorithm.oid,
            serial_number: tbs_certificate.serial_number.as_bytes().to_vec(),
            chain,
            der,
        })))
    }

    /// DER encoding of this certificate
    #[must_use]
    pub fn der(&self) -> &[u8] {
        &self.0.der
    }

    /// Container the certificate was parsed from
    #[must_use]
    pub fn format(&self) -> CertificateFormat {
        self.0.format
    }

    /// Subject distinguished name
    #[must_use]
    pub fn subject(&self) -> &DistinguishedName {
        &self.0.subject
    }

    /// Issuer distinguished name
    #[must_use]
    pub fn issuer(&self) -> &DistinguishedName {
        &self.0.issuer
    }

    /// Subject `CN`, if present
    #[must_use]
    pub fn common_name(&self) -> Option<&str> {
        self.0.subject.common_name()
    }

    /// Recognised subject attributes as `(short name, value)` pairs
    #[must_use]
    pub fn subject_attributes(&self) -> &[(String, String)] {
        self.0.subject.attributes()
    }

    /// Start of the validity window
    #[must_use]
    pub fn not_before(&self) -> SystemTime {
        self.0.not_before
    }

    /// End of the validity window
    #[must_use]
    pub fn not_after(&self) -> SystemTime {
        self.0.not_after
    }

    /// Subject public key
    #[must_use]
    pub fn public_key(&self) -> &PublicKeyInfo {
        &self.0.public_key
    }

    /// Signature value
    #[must_use]
    pub fn signature(&self) -> &[u8] {
        &self.0.signature
    }

    /// OID of the algorithm the issuer signed with
    #[must_use]
    pub fn signature_algorithm(&self) -> ObjectIdentifier {
        self.0.signature_algorithm
    }

    /// Serial number, big-endian
    #[must_use]
    pub fn serial_number(&self) -> &[u8] {
        &self.0.serial_number
    }

    /// Serial number as lowercase hex
    #[must_use]
    pub fn serial_number_hex(&self) -> String {
        hex::encode(&self.0.serial_number)
    }

    /// SHA-256 fingerprint, the store key
    #[must_use]
    pub fn fingerprint(&self) -> Fingerprint {
        self.0.fingerprint
    }

    /// Certificates bundled in the same container, empty for single certificates
    #[must_use]
    pub fn chain(&self) -> &[CertificateToken] {
        &self.0.chain
    }

    /// Whether `at` falls inside `[not_before, not_after]`
    #[must_use]
    pub fn is_valid_at(&self, at: SystemTime) -> bool {
        self.0.not_before <= at && at <= self.0.not_after
    }

    /// Whether `issuer`'s public key verifies this certificate's signature.
    ///
    /// Names are not compared; see [`CertificateToken::is_issued_by`].
    #[must_use]
    pub fn verify_signature_with(&self, issuer: &CertificateToken) -> bool {
        match signature::verify_signature(
            &self.0.tbs,
            self.0.signature_algorithm,
            &self.0.signature,
            issuer.public_key(),
        ) {
            Ok(()) => true,
            Err(e) => {
                tracing::trace!(
                    subject = %self.0.subject,
                    candidate = %issuer.fingerprint().short(),
                    error = %e,
                    "signature check failed"
                );
                false
            }
        }
    }

    /// Issuer name matches `issuer`'s subject and its key verifies the signature
    #[must_use]
    pub fn is_issued_by(&self, issuer: &CertificateToken) -> bool {
        self.0.issuer == issuer.0.subject && self.verify_signature_with(issuer)
    }

    /// Subject equals issuer and the certificate verifies under its own key.
    ///
    /// The signature is authoritative; a name match with a foreign signature is
    /// not self-signed.
    #[must_use]
    pub fn is_self_signed(&self) -> bool {
        self.is_issued_by(self)
    }

    /// PEM encoding of this certificate
    #[must_use]
    pub fn to_pem(&self) -> String {
        pem::encode(&pem::Pem::new("CERTIFICATE", self.0.der.clone()))
    }
}

impl PartialEq for CertificateToken {
    fn eq(&self, other: &Self) -> bool {
        self.0.fingerprint == other.0.fingerprint
    }
}

impl Eq for CertificateToken {}

impl Hash for CertificateToken {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.fingerprint.hash(state);
    }
}

impl fmt::Debug for CertificateToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CertificateToken")
            .field("subject", &self.0.subject)
            .field("issuer", &self.0.issuer)
            .field("format", &self.0.format)
            .field("fingerprint", &self.0.fingerprint)
            .field("chain", &self.0.chain.len())
            .finish()
    }
}
