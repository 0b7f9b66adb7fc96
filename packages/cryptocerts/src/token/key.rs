//! Subject public key material
//!
//! Keeps the raw key bits next to the algorithm and curve identifiers so that
//! signature verification can pick a verifier without re-decoding the SPKI.

use const_oid::db::rfc5912::{
    ID_EC_PUBLIC_KEY, SECP_224_R_1, SECP_256_R_1, SECP_384_R_1, SECP_521_R_1,
};
use const_oid::db::rfc8410::{ID_ED_25519, ID_ED_448, ID_X_25519, ID_X_448};
use const_oid::ObjectIdentifier;
use der::asn1::UintRef;
use der::{Decode, Encode, Sequence, Tag, Tagged};
use spki::SubjectPublicKeyInfoOwned;

use crate::error::{CertificateError, Result};

pub(crate) const RSA_ENCRYPTION: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");
const DSA: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10040.4.1");

/// Public key taken from a certificate's `subjectPublicKeyInfo`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKeyInfo {
    spki_der: Vec<u8>,
    algorithm: ObjectIdentifier,
    curve: Option<ObjectIdentifier>,
    key_bytes: Vec<u8>,
}

impl PublicKeyInfo {
    pub(crate) fn from_spki(spki: &SubjectPublicKeyInfoOwned) -> Result<Self> {
        let spki_der = spki
            .to_der()
            .map_err(|e| CertificateError::parse(format!("Failed to encode public key: {e}")))?;

        let key_bytes = spki
            .subject_public_key
            .as_bytes()
            .ok_or_else(|| CertificateError::parse("Public key has unused bits"))?
            .to_vec();

        // Only named curves are carried as an OID parameter
        let curve = spki
            .algorithm
            .parameters
            .as_ref()
            .filter(|params| params.tag() == Tag::ObjectIdentifier)
            .and_then(|params| ObjectIdentifier::from_bytes(params.value()).ok());

        Ok(Self {
            spki_der,
            algorithm: spki.algorithm.oid,
            curve,
            key_bytes,
        })
    }

    /// DER encoding of the whole `SubjectPublicKeyInfo`
    #[must_use]
    pub fn spki_der(&self) -> &[u8] {
        &self.spki_der
    }

    /// Key algorithm OID
    #[must_use]
    pub fn algorithm(&self) -> ObjectIdentifier {
        self.algorithm
    }

    /// Named curve for EC keys
    #[must_use]
    pub fn curve(&self) -> Option<ObjectIdentifier> {
        self.curve
    }

    /// Contents of the `subjectPublicKey` bit string
    #[must_use]
    pub fn key_bytes(&self) -> &[u8] {
        &self.key_bytes
    }

    /// Human readable algorithm name
    #[must_use]
    pub fn algorithm_name(&self) -> &'static str {
        let oid = self.algorithm;
        if oid == RSA_ENCRYPTION {
            "RSA"
        } else if oid == DSA {
            "DSA"
        } else if oid == ID_EC_PUBLIC_KEY {
            "ECDSA"
        } else if oid == ID_X_25519 {
            "X25519"
        } else if oid == ID_X_448 {
            "X448"
        } else if oid == ID_ED_25519 {
            "Ed25519"
        } else if oid == ID_ED_448 {
            "Ed448"
        } else {
            "Unknown"
        }
    }

    /// Key size in bits, when it can be determined
    #[must_use]
    pub fn key_size(&self) -> Option<u32> {
        let oid = self.algorithm;
        if oid == RSA_ENCRYPTION {
            rsa_modulus_bits(&self.key_bytes)
        } else if oid == ID_EC_PUBLIC_KEY {
            match self.curve? {
                SECP_224_R_1 => Some(224),
                SECP_256_R_1 => Some(256),
                SECP_384_R_1 => Some(384),
                SECP_521_R_1 => Some(521),
                _ => None,
            }
        } else if oid == ID_X_25519 || oid == ID_ED_25519 {
            Some(256)
        } else if oid == ID_X_448 || oid == ID_ED_448 {
            Some(448)
        } else {
            None
        }
    }
}

/// PKCS#1 `RSAPublicKey`
#[derive(Sequence)]
struct RsaPublicKey<'a> {
    modulus: UintRef<'a>,
    public_exponent: UintRef<'a>,
}

fn rsa_modulus_bits(key_bytes: &[u8]) -> Option<u32> {
    let key = RsaPublicKey::from_der(key_bytes).ok()?;
    compute_bit_length(key.modulus.as_bytes())
}

/// Bit length of a big-endian unsigned integer
fn compute_bit_length(bytes: &[u8]) -> Option<u32> {
    let start = bytes.iter().position(|&b| b != 0)?;
    let effective = &bytes[start..];
    let high_bits = 8u32 - effective[0].leading_zeros();
    let rest_bits = u32::try_from((effective.len() - 1) * 8).ok()?;
    Some(high_bits + rest_bits)
}
