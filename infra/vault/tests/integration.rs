use mymeds_vault::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Document {
    items: Vec<String>,
    last_decay_date: Option<String>,
}

fn sample_document() -> Document {
    Document {
        items: vec!["Aspirin".to_owned(), "Ibuprofen".to_owned()],
        last_decay_date: Some("2025-06-01".to_owned()),
    }
}

#[test]
fn document_roundtrip() {
    let salt = generate_salt().expect("salt");
    let cipher = DocumentCipher::new(&derive_key("correct-horse", &salt));

    let document = sample_document();
    let sealed = cipher.seal(&document).expect("seal");
    let restored: Document = cipher.open(&sealed.ciphertext, &sealed.nonce).expect("open");

    assert_eq!(restored, document);
}

#[test]
fn wrong_password_is_authentication_failure_not_garbage() {
    let salt = generate_salt().expect("salt");
    let sealed =
        DocumentCipher::new(&derive_key("right", &salt)).seal(&sample_document()).expect("seal");

    let wrong = DocumentCipher::new(&derive_key("wrong", &salt));
    let result: Result<Document, _> = wrong.open(&sealed.ciphertext, &sealed.nonce);

    assert!(
        matches!(result, Err(VaultError::Decryption { .. })),
        "wrong password must fail authentication, never parse"
    );
}

#[test]
fn same_password_different_salt_cannot_open() {
    let sealed = DocumentCipher::new(&derive_key("pw", &[1u8; SALT_LEN]))
        .seal_bytes(b"payload")
        .expect("seal");

    let other = DocumentCipher::new(&derive_key("pw", &[2u8; SALT_LEN]));
    assert!(other.open_bytes(&sealed.ciphertext, &sealed.nonce).is_err());
}

// Random 96-bit nonces: any collision within 10k draws points at a broken
// RNG rather than bad luck.
#[test]
fn nonces_never_collide_across_ten_thousand_seals() {
    let cipher = DocumentCipher::new(&derive_key("pw", &[9u8; SALT_LEN]));

    let mut seen = HashSet::with_capacity(10_000);
    for _ in 0..10_000 {
        let sealed = cipher.seal_bytes(b"x").expect("seal");
        assert!(seen.insert(sealed.nonce), "nonce collision");
    }
}

#[test]
fn empty_document_still_authenticates() {
    let cipher = DocumentCipher::new(&derive_key("pw", &[3u8; SALT_LEN]));
    let sealed = cipher.seal_bytes(b"").expect("seal");
    let opened = cipher.open_bytes(&sealed.ciphertext, &sealed.nonce).expect("open");
    assert!(opened.is_empty());

    let mut tampered = sealed.ciphertext.clone();
    tampered[0] ^= 0xff;
    assert!(cipher.open_bytes(&tampered, &sealed.nonce).is_err());
}
