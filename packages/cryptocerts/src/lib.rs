#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]

//! X.509 certificate trust-chain validation
//!
//! Parses certificates from PEM, DER or PKCS7 bundles into [`CertificateToken`]s,
//! keeps trust anchors and intermediates in explicit stores, and walks each target
//! certificate up to a trusted root, checking signatures and validity windows on
//! the way.
//!
//! ```no_run
//! use cryptocerts::{
//!     CertificateStore, CertificateToken, CertificateValidator, CertificatesStore,
//!     IntermediaryCertificateStore, TrustedCertificateStore,
//! };
//!
//! # fn main() -> cryptocerts::Result<()> {
//! let mut trusted = TrustedCertificateStore::new();
//! trusted.add_certificate(CertificateToken::load_from_file("root.pem")?)?;
//!
//! let mut intermediary = IntermediaryCertificateStore::new();
//! intermediary.add_certificate(CertificateToken::load_from_file("intermediate.der")?)?;
//!
//! let validator = CertificateValidator::new(CertificatesStore::new(trusted, intermediary));
//! let result = validator.validate_certificate(&CertificateToken::load_from_file("leaf.p7b")?, None);
//! assert!(result.valid_to_trusted_root);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod store;
pub mod token;
pub mod validator;

pub use config::ValidatorConfig;
pub use error::{CertificateError, Result};
pub use store::{
    CertificateStore, CertificatesStore, IntermediaryCertificateStore, IssuerCandidate,
    StoreKind, TrustedCertificateStore,
};
pub use token::{CertificateFormat, CertificateToken, DistinguishedName, Fingerprint, PublicKeyInfo};
pub use validator::{
    CertificateValidator, ValidationConclusion, ValidationErrorKind, ValidationResult,
};
