//! Shared fixtures: certificate hierarchies generated with rcgen and PKCS7
//! bundles assembled as raw DER

#![allow(dead_code)]

use std::time::{Duration, SystemTime};

use const_oid::ObjectIdentifier;
use cryptocerts::{
    CertificateStore, CertificateToken, CertificateValidator, CertificatesStore,
    IntermediaryCertificateStore, TrustedCertificateStore,
};
use der::Encode;
use rcgen::{
    BasicConstraints, CertificateParams, DistinguishedName, DnType, IsCa, Issuer, KeyPair,
    SignatureAlgorithm,
};

const ID_DATA: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.7.1");
const ID_SIGNED_DATA: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.7.2");

const RSA_2048_KEY: &str = include_str!("../fixtures/rsa2048_key.pem");

/// A generated CA: its certificate and the issuer used to sign below it
pub struct Authority {
    pub der: Vec<u8>,
    pub pem: String,
    pub issuer: Issuer<'static, KeyPair>,
}

impl Authority {
    pub fn token(&self) -> CertificateToken {
        CertificateToken::new(&self.der).expect("authority certificate should parse")
    }
}

/// A generated end-entity certificate
pub struct Leaf {
    pub der: Vec<u8>,
    pub pem: String,
}

impl Leaf {
    pub fn token(&self) -> CertificateToken {
        CertificateToken::new(&self.der).expect("leaf certificate should parse")
    }
}

pub fn params(common_name: &str, is_ca: bool) -> CertificateParams {
    let mut params =
        CertificateParams::new(Vec::default()).expect("Failed to create certificate params");

    let mut dn = DistinguishedName::new();
    dn.push(DnType::OrganizationName, "Cryptocerts Test");
    dn.push(DnType::CommonName, common_name);
    params.distinguished_name = dn;

    if is_ca {
        params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    }
    params
}

pub fn expired(mut params: CertificateParams) -> CertificateParams {
    params.not_before = rcgen::date_time_ymd(2000, 1, 1);
    params.not_after = rcgen::date_time_ymd(2001, 1, 1);
    params
}

pub fn not_yet_valid(mut params: CertificateParams) -> CertificateParams {
    params.not_before = rcgen::date_time_ymd(2090, 1, 1);
    params.not_after = rcgen::date_time_ymd(2091, 1, 1);
    params
}

pub fn root(common_name: &str) -> Authority {
    root_with(params(common_name, true), KeyPair::generate().expect("key generation"))
}

pub fn ed25519_root(common_name: &str) -> Authority {
    root_with(params(common_name, true), generate_key(&rcgen::PKCS_ED25519))
}

/// Root with a fixed RSA-2048 key; everything it issues is signed with
/// sha256WithRSAEncryption
pub fn rsa_root(common_name: &str) -> Authority {
    let key_pair = KeyPair::from_pem_and_sign_algo(RSA_2048_KEY, &rcgen::PKCS_RSA_SHA256)
        .expect("RSA key should load");
    root_with(params(common_name, true), key_pair)
}

pub fn root_with(params: CertificateParams, key_pair: KeyPair) -> Authority {
    let cert = params
        .clone()
        .self_signed(&key_pair)
        .expect("Failed to create self-signed certificate");
    Authority {
        der: cert.der().to_vec(),
        pem: cert.pem(),
        issuer: Issuer::new(params, key_pair),
    }
}

pub fn intermediate(common_name: &str, parent: &Authority) -> Authority {
    intermediate_with(params(common_name, true), parent)
}

pub fn intermediate_with(params: CertificateParams, parent: &Authority) -> Authority {
    let key_pair = KeyPair::generate().expect("key generation");
    let cert = params
        .signed_by(&key_pair, &parent.issuer)
        .expect("Failed to sign intermediate certificate");
    Authority {
        der: cert.der().to_vec(),
        pem: cert.pem(),
        issuer: Issuer::new(params, key_pair),
    }
}

pub fn leaf(common_name: &str, parent: &Authority) -> Leaf {
    leaf_with(params(common_name, false), parent)
}

pub fn leaf_with(params: CertificateParams, parent: &Authority) -> Leaf {
    let key_pair = KeyPair::generate().expect("key generation");
    let cert = params
        .signed_by(&key_pair, &parent.issuer)
        .expect("Failed to sign leaf certificate");
    Leaf {
        der: cert.der().to_vec(),
        pem: cert.pem(),
    }
}

/// Subject equals issuer, but the signature comes from an unrelated key
pub fn forged_self_named(common_name: &str) -> Leaf {
    let subject_key = KeyPair::generate().expect("key generation");
    let impostor = Issuer::new(
        params(common_name, true),
        KeyPair::generate().expect("key generation"),
    );
    let cert = params(common_name, true)
        .signed_by(&subject_key, &impostor)
        .expect("Failed to sign forged certificate");
    Leaf {
        der: cert.der().to_vec(),
        pem: cert.pem(),
    }
}

/// Two CAs that certify each other, so issuer lookup never reaches a root
pub fn cross_signed_pair(name_a: &str, name_b: &str) -> (Authority, Authority) {
    let key_a = KeyPair::generate().expect("key generation");
    let key_b = KeyPair::generate().expect("key generation");

    let issuer_a = Issuer::new(params(name_a, true), copy_key(&key_a));
    let issuer_b = Issuer::new(params(name_b, true), copy_key(&key_b));

    let cert_a = params(name_a, true)
        .signed_by(&key_a, &issuer_b)
        .expect("Failed to cross-sign A");
    let cert_b = params(name_b, true)
        .signed_by(&key_b, &issuer_a)
        .expect("Failed to cross-sign B");

    (
        Authority {
            der: cert_a.der().to_vec(),
            pem: cert_a.pem(),
            issuer: issuer_a,
        },
        Authority {
            der: cert_b.der().to_vec(),
            pem: cert_b.pem(),
            issuer: issuer_b,
        },
    )
}

fn generate_key(algorithm: &'static SignatureAlgorithm) -> KeyPair {
    KeyPair::generate_for(algorithm).expect("key generation")
}

fn copy_key(key_pair: &KeyPair) -> KeyPair {
    KeyPair::from_pem(&key_pair.serialize_pem()).expect("key round trip")
}

/// Certificates-only PKCS7 `SignedData` (a P7B/P7C bundle), DER encoded.
///
/// Members are written in the given order rather than sorted as a DER `SET OF`,
/// matching bundles exported by common tooling.
pub fn pkcs7_bundle(certificates: &[&[u8]]) -> Vec<u8> {
    let encap_content_info = tlv(0x30, &ID_DATA.to_der().expect("oid encoding"));
    let certificate_set = tlv(0xa0, &certificates.concat());

    let fields: [&[u8]; 5] = [
        &[0x02, 0x01, 0x01], // version 1
        &[0x31, 0x00],       // digestAlgorithms
        &encap_content_info,
        &certificate_set,
        &[0x31, 0x00], // signerInfos
    ];
    let signed_data = tlv(0x30, &fields.concat());

    tlv(
        0x30,
        &[
            ID_SIGNED_DATA.to_der().expect("oid encoding"),
            tlv(0xa0, &signed_data),
        ]
        .concat(),
    )
}

/// Tag, DER definite length, contents
fn tlv(tag: u8, contents: &[u8]) -> Vec<u8> {
    let mut out = vec![tag];
    let len = contents.len();
    if len < 0x80 {
        out.push(len as u8);
    } else {
        let bytes = len.to_be_bytes();
        let skip = bytes.iter().take_while(|&&b| b == 0).count();
        out.push(0x80 | (bytes.len() - skip) as u8);
        out.extend_from_slice(&bytes[skip..]);
    }
    out.extend_from_slice(contents);
    out
}

/// PEM armoured PKCS7 bundle
pub fn pkcs7_pem(certificates: &[&[u8]]) -> String {
    pem::encode(&pem::Pem::new("PKCS7", pkcs7_bundle(certificates)))
}

pub fn validator(trusted: &[&[u8]], intermediary: &[&[u8]]) -> CertificateValidator {
    cryptocerts::logging::init_test();

    let mut trusted_store = TrustedCertificateStore::new();
    for der in trusted {
        trusted_store
            .add_certificate(CertificateToken::new(der).expect("trusted certificate"))
            .expect("trusted insertion");
    }

    let mut intermediary_store = IntermediaryCertificateStore::new();
    for der in intermediary {
        intermediary_store
            .add_certificate(CertificateToken::new(der).expect("intermediary certificate"))
            .expect("intermediary insertion");
    }

    CertificateValidator::new(CertificatesStore::new(trusted_store, intermediary_store))
}

/// A fixed instant inside rcgen's default validity window
pub fn mid_century() -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(2_524_608_000) // 2050-01-01
}
