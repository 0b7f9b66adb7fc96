//! Certificate token parsing across PEM, DER and PKCS7 inputs

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::io::Write;

use base64::Engine;
use cryptocerts::{CertificateError, CertificateFormat, CertificateToken};

#[test]
fn test_der_certificate_parses() {
    let root = common::root("Parsing Root");
    let token = CertificateToken::new(&root.der).unwrap();

    assert_eq!(token.format(), CertificateFormat::Der);
    assert_eq!(token.der(), root.der.as_slice());
    assert_eq!(token.common_name(), Some("Parsing Root"));
    assert_eq!(token.subject().attribute("O"), Some("Cryptocerts Test"));
    assert!(token.chain().is_empty(), "single DER certificate has no chain");
}

#[test]
fn test_pem_certificate_parses_to_same_fingerprint() {
    let root = common::root("PEM Root");
    let from_pem = CertificateToken::new(root.pem.as_bytes()).unwrap();
    let from_der = CertificateToken::new(&root.der).unwrap();

    assert_eq!(from_pem.format(), CertificateFormat::Pem);
    assert!(from_pem.chain().is_empty());
    assert_eq!(from_pem.fingerprint(), from_der.fingerprint());
    assert_eq!(from_pem, from_der);
}

#[test]
fn test_concatenated_pem_fills_chain_in_order() {
    let root = common::root("Concat Root");
    let intermediate = common::intermediate("Concat Intermediate", &root);
    let leaf = common::leaf("concat.example", &intermediate);

    let bundle = format!("{}{}{}", leaf.pem, intermediate.pem, root.pem);
    let token = CertificateToken::new(bundle.as_bytes()).unwrap();

    assert_eq!(token.format(), CertificateFormat::Pem);
    assert_eq!(token.common_name(), Some("concat.example"));
    let names: Vec<_> = token.chain().iter().map(|t| t.common_name()).collect();
    assert_eq!(
        names,
        vec![
            Some("concat.example"),
            Some("Concat Intermediate"),
            Some("Concat Root")
        ]
    );
}

#[test]
fn test_pkcs7_bundle_chain_holds_every_certificate() {
    let root = common::root("P7 Root");
    let leaf = common::leaf("p7.example", &root);

    let bundle = common::pkcs7_bundle(&[&root.der, &leaf.der]);
    let token = CertificateToken::new(&bundle).unwrap();

    assert_eq!(token.format(), CertificateFormat::Pkcs7);
    assert_eq!(token.chain().len(), 2);
    assert_eq!(
        token.common_name(),
        Some("p7.example"),
        "primary certificate should be the bundle's leaf"
    );
    assert!(token.chain().contains(&leaf.token()));
    assert!(token.chain().contains(&root.token()));
}

#[test]
fn test_pkcs7_chain_keeps_file_order() {
    let root = common::root("Order Root");
    let intermediate = common::intermediate("Order Intermediate", &root);
    let leaf = common::leaf("order.example", &intermediate);

    let names = |token: &CertificateToken| -> Vec<_> {
        token
            .chain()
            .iter()
            .map(|t| t.common_name().map(str::to_string))
            .collect()
    };

    let leaf_first =
        CertificateToken::new(&common::pkcs7_bundle(&[&leaf.der, &intermediate.der, &root.der]))
            .unwrap();
    assert_eq!(
        names(&leaf_first),
        vec![
            Some("order.example".to_string()),
            Some("Order Intermediate".to_string()),
            Some("Order Root".to_string())
        ]
    );
    assert_eq!(leaf_first, leaf.token());

    let root_first =
        CertificateToken::new(&common::pkcs7_bundle(&[&root.der, &intermediate.der, &leaf.der]))
            .unwrap();
    assert_eq!(
        names(&root_first),
        vec![
            Some("Order Root".to_string()),
            Some("Order Intermediate".to_string()),
            Some("order.example".to_string())
        ]
    );
    assert_eq!(root_first, leaf.token(), "primary is the leaf wherever it sits");

    let members =
        CertificateToken::parse_all(&common::pkcs7_bundle(&[&root.der, &intermediate.der, &leaf.der]))
            .unwrap();
    assert_eq!(members, vec![root.token(), intermediate.token(), leaf.token()]);
}

#[test]
fn test_pkcs7_members_keep_their_exact_encoding() {
    let root = common::root("Bytes Root");
    let token = CertificateToken::new(&common::pkcs7_bundle(&[&root.der])).unwrap();
    assert_eq!(token.der(), root.der.as_slice());
}

#[test]
fn test_indefinite_length_pkcs7_is_rejected() {
    let root = common::root("BER Root");
    let der = common::pkcs7_bundle(&[&root.der]);

    let header_len = if der[1] < 0x80 {
        2
    } else {
        2 + usize::from(der[1] & 0x7f)
    };
    let parts: [&[u8]; 3] = [&[0x30, 0x80], &der[header_len..], &[0x00, 0x00]];
    let ber = parts.concat();

    assert!(matches!(
        CertificateToken::new(&ber),
        Err(CertificateError::ParseError(_))
    ));
}

#[test]
fn test_pkcs7_pem_armour_and_bare_base64() {
    let root = common::root("Armoured Root");
    let leaf = common::leaf("armoured.example", &root);

    let armoured = common::pkcs7_pem(&[&leaf.der, &root.der]);
    let token = CertificateToken::new(armoured.as_bytes()).unwrap();
    assert_eq!(token.format(), CertificateFormat::Pkcs7);
    assert_eq!(token.chain().len(), 2);

    let bare = base64::engine::general_purpose::STANDARD
        .encode(common::pkcs7_bundle(&[&leaf.der, &root.der]));
    let token = CertificateToken::new(bare.as_bytes()).unwrap();
    assert_eq!(token.format(), CertificateFormat::Pkcs7);
    assert_eq!(token.common_name(), Some("armoured.example"));
}

#[test]
fn test_single_certificate_pkcs7_keeps_its_chain_entry() {
    let root = common::root("Lonely Root");
    let token = CertificateToken::new(&common::pkcs7_bundle(&[&root.der])).unwrap();

    assert_eq!(token.format(), CertificateFormat::Pkcs7);
    assert_eq!(token.chain().len(), 1);
    assert_eq!(token.chain()[0], token);
}

#[test]
fn test_garbage_input_is_parse_error() {
    let inputs: [&[u8]; 4] = [
        b"definitely not a certificate",
        &[0x30, 0x82, 0x01, 0x00, 0xde, 0xad],
        b"-----BEGIN CERTIFICATE-----\nAAAA\n-----END CERTIFICATE-----\n",
        &[0xff; 64],
    ];

    for input in inputs {
        match CertificateToken::new(input) {
            Err(CertificateError::ParseError(msg)) => {
                assert!(msg.contains("no supported certificate format"), "{msg}");
            }
            other => panic!("Expected ParseError, got {other:?}"),
        }
    }
}

#[test]
fn test_load_from_file_reads_and_parses() {
    let root = common::root("File Root");
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(root.pem.as_bytes()).unwrap();

    let token = CertificateToken::load_from_file(file.path()).unwrap();
    assert_eq!(token, root.token());
}

#[test]
fn test_load_from_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.pem");

    match CertificateToken::load_from_file(&missing) {
        Err(CertificateError::Io { path, .. }) => assert_eq!(path, missing),
        other => panic!("Expected Io error, got {other:?}"),
    }
}

#[test]
fn test_self_signed_requires_valid_signature() {
    let root = common::root("Self Root");
    let leaf = common::leaf("self.example", &root);
    let forged = common::forged_self_named("Forged Root");

    assert!(root.token().is_self_signed());
    assert!(!leaf.token().is_self_signed());

    let forged = forged.token();
    assert_eq!(forged.subject(), forged.issuer(), "names match");
    assert!(!forged.is_self_signed(), "foreign signature is authoritative");
}

#[test]
fn test_issued_by_checks_name_and_signature() {
    let root = common::root("Issuer Root");
    let other = common::root("Other Root");
    let leaf = common::leaf("issued.example", &root).token();

    assert!(leaf.is_issued_by(&root.token()));
    assert!(!leaf.is_issued_by(&other.token()));
    assert!(!leaf.verify_signature_with(&other.token()));
}

#[test]
fn test_public_key_details() {
    let p256 = common::root("P256 Root").token();
    assert_eq!(p256.public_key().algorithm_name(), "ECDSA");
    assert_eq!(p256.public_key().key_size(), Some(256));

    let ed25519 = common::ed25519_root("Ed25519 Root").token();
    assert_eq!(ed25519.public_key().algorithm_name(), "Ed25519");
    assert_eq!(ed25519.public_key().key_size(), Some(256));
    assert!(ed25519.is_self_signed());
}

#[test]
fn test_rsa_certificates_verify() {
    let root = common::rsa_root("RSA Root");
    let token = root.token();
    assert_eq!(token.public_key().algorithm_name(), "RSA");
    assert_eq!(token.public_key().key_size(), Some(2048));
    assert_eq!(
        token.signature_algorithm().to_string(),
        "1.2.840.113549.1.1.11",
        "sha256WithRSAEncryption"
    );
    assert!(token.is_self_signed());

    let leaf = common::leaf("rsa.example", &root).token();
    assert!(leaf.is_issued_by(&token));

    // An EC key under the same name cannot check an RSA signature
    let ec_lookalike = common::root("RSA Root").token();
    assert_eq!(ec_lookalike.subject(), token.subject());
    assert!(!leaf.is_issued_by(&ec_lookalike));
}

#[test]
fn test_validity_window_is_inclusive() {
    let token = common::root("Window Root").token();

    assert!(token.is_valid_at(token.not_before()));
    assert!(token.is_valid_at(token.not_after()));
    assert!(token.is_valid_at(common::mid_century()));
    assert!(!token.is_valid_at(token.not_before() - std::time::Duration::from_secs(1)));
}

#[test]
fn test_parse_all_returns_each_member() {
    let root = common::root("All Root");
    let leaf = common::leaf("all.example", &root);

    let tokens = CertificateToken::parse_all(format!("{}{}", leaf.pem, root.pem).as_bytes())
        .unwrap();
    assert_eq!(tokens.len(), 2);
    assert!(tokens.iter().all(|t| t.chain().is_empty()));
    assert_eq!(tokens[0], leaf.token());
    assert_eq!(tokens[1], root.token());
}

#[test]
fn test_to_pem_round_trips() {
    let root = common::root("Round Root").token();
    let again = CertificateToken::new(root.to_pem().as_bytes()).unwrap();
    assert_eq!(again, root);
    assert!(!root.serial_number_hex().is_empty());
}
