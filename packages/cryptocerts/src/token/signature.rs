//! Certificate signature verification with `ring`

use const_oid::db::rfc5912::{ID_EC_PUBLIC_KEY, SECP_256_R_1, SECP_384_R_1};
use const_oid::db::rfc8410::ID_ED_25519;
use const_oid::ObjectIdentifier;
use der::{Encode, Reader, SliceReader};
use ring::signature::{self, UnparsedPublicKey, VerificationAlgorithm};

use super::key::{PublicKeyInfo, RSA_ENCRYPTION};

const SHA1_WITH_RSA: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.5");
const SHA256_WITH_RSA: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.11");
const SHA384_WITH_RSA: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.12");
const SHA512_WITH_RSA: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.13");
const ECDSA_WITH_SHA256: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.4.3.2");
const ECDSA_WITH_SHA384: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.4.3.3");

#[derive(Debug, thiserror::Error)]
pub(crate) enum SignatureError {
    #[error("unsupported signature algorithm {0}")]
    UnsupportedAlgorithm(ObjectIdentifier),
    #[error("signature algorithm {signature} cannot be checked with a {key} key")]
    KeyMismatch {
        signature: ObjectIdentifier,
        key: &'static str,
    },
    #[error("signature does not verify")]
    BadSignature,
}

/// Verify `signature` over `tbs` with the issuer's public key
pub(crate) fn verify_signature(
    tbs: &[u8],
    signature_algorithm: ObjectIdentifier,
    signature: &[u8],
    issuer_key: &PublicKeyInfo,
) -> Result<(), SignatureError> {
    let algorithm = select_algorithm(signature_algorithm, issuer_key)?;
    UnparsedPublicKey::new(algorithm, issuer_key.key_bytes())
        .verify(tbs, signature)
        .map_err(|_| SignatureError::BadSignature)
}

fn select_algorithm(
    signature_algorithm: ObjectIdentifier,
    key: &PublicKeyInfo,
) -> Result<&'static dyn VerificationAlgorithm, SignatureError> {
    let mismatch = || SignatureError::KeyMismatch {
        signature: signature_algorithm,
        key: key.algorithm_name(),
    };

    match signature_algorithm {
        SHA1_WITH_RSA | SHA256_WITH_RSA | SHA384_WITH_RSA | SHA512_WITH_RSA => {
            if key.algorithm() != RSA_ENCRYPTION {
                return Err(mismatch());
            }
            Ok(match signature_algorithm {
                SHA1_WITH_RSA => &signature::RSA_PKCS1_2048_8192_SHA1_FOR_LEGACY_USE_ONLY,
                SHA256_WITH_RSA => &signature::RSA_PKCS1_2048_8192_SHA256,
                SHA384_WITH_RSA => &signature::RSA_PKCS1_2048_8192_SHA384,
                _ => &signature::RSA_PKCS1_2048_8192_SHA512,
            })
        }
        ECDSA_WITH_SHA256 | ECDSA_WITH_SHA384 => {
            if key.algorithm() != ID_EC_PUBLIC_KEY {
                return Err(mismatch());
            }
            let sha384 = signature_algorithm == ECDSA_WITH_SHA384;
            match (key.curve(), sha384) {
                (Some(SECP_256_R_1), false) => Ok(&signature::ECDSA_P256_SHA256_ASN1),
                (Some(SECP_256_R_1), true) => Ok(&signature::ECDSA_P256_SHA384_ASN1),
                (Some(SECP_384_R_1), false) => Ok(&signature::ECDSA_P384_SHA256_ASN1),
                (Some(SECP_384_R_1), true) => Ok(&signature::ECDSA_P384_SHA384_ASN1),
                _ => Err(mismatch()),
            }
        }
        ID_ED_25519 => {
            if key.algorithm() != ID_ED_25519 {
                return Err(mismatch());
            }
            Ok(&signature::ED25519)
        }
        other => Err(SignatureError::UnsupportedAlgorithm(other)),
    }
}

/// Raw `tbsCertificate` bytes exactly as they were signed
pub(crate) fn raw_tbs_certificate(cert_der: &[u8]) -> der::Result<&[u8]> {
    let mut reader = SliceReader::new(cert_der)?;

    // Step into the outer Certificate SEQUENCE
    let outer = reader.peek_header()?;
    reader.read_slice(outer.encoded_len()?)?;

    let tbs = reader.peek_header()?;
    let tbs_len = (tbs.encoded_len()? + tbs.length)?;
    reader.read_slice(tbs_len)
}
