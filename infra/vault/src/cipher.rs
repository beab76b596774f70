//! Authenticated document encryption.
//!
//! [`DocumentCipher`] wraps AES-256-GCM for one derived key and seals whole
//! JSON documents. Every seal draws a fresh 96-bit random nonce; the nonce
//! travels alongside the ciphertext in the vault record's key parameters
//! instead of being embedded in the blob.
//!
//! ## Nonce policy
//!
//! Nonces must never repeat under the same key — GCM loses both
//! confidentiality and integrity on reuse. Random 96-bit nonces are safe at
//! this workload (a handful of saves per day per vault); regeneration on
//! every encryption is a correctness requirement, not a style choice.

use crate::error::{VaultError, VaultErrorExt};
use crate::kdf::DerivedKey;
use aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use serde::Serialize;
use serde::de::DeserializeOwned;
use zeroize::Zeroizing;

/// AEAD nonce length in bytes (96-bit).
pub const NONCE_LEN: usize = 12;

/// The output of one seal operation.
///
/// Both halves are required for decryption; the nonce is public and stored
/// next to the ciphertext, while the key is re-derived from the password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedDocument {
    pub nonce: [u8; NONCE_LEN],
    pub ciphertext: Vec<u8>,
}

/// An AES-256-GCM cipher bound to one derived vault key.
pub struct DocumentCipher {
    cipher: Aes256Gcm,
}

impl std::fmt::Debug for DocumentCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentCipher").finish_non_exhaustive()
    }
}

impl DocumentCipher {
    /// Builds a cipher for the given derived key.
    #[must_use]
    pub fn new(key: &DerivedKey) -> Self {
        let cipher = Aes256Gcm::new_from_slice(key.as_bytes()).expect("32-byte AES-256-GCM key");
        Self { cipher }
    }

    fn next_nonce() -> Result<[u8; NONCE_LEN], VaultError> {
        let mut nonce = [0u8; NONCE_LEN];
        getrandom::getrandom(&mut nonce).map_err(|e| VaultError::RandomSource {
            message: e.to_string().into(),
            context: Some("Nonce generation".into()),
        })?;
        Ok(nonce)
    }

    /// Serializes a document to JSON and encrypts it under a fresh nonce.
    ///
    /// # Errors
    /// * [`VaultError::Serialization`] if the document cannot be encoded.
    /// * [`VaultError::RandomSource`] if no nonce could be drawn.
    /// * [`VaultError::Encryption`] if the AEAD operation fails.
    pub fn seal<T: Serialize>(&self, document: &T) -> Result<SealedDocument, VaultError> {
        let plaintext = Zeroizing::new(
            serde_json::to_vec(document).context("Encoding document for encryption")?,
        );
        self.seal_bytes(&plaintext)
    }

    /// Encrypts raw plaintext bytes under a fresh nonce.
    ///
    /// # Errors
    /// See [`DocumentCipher::seal`].
    pub fn seal_bytes(&self, plaintext: &[u8]) -> Result<SealedDocument, VaultError> {
        let nonce = Self::next_nonce()?;

        let ciphertext =
            self.cipher.encrypt(Nonce::from_slice(&nonce), plaintext).map_err(|_| {
                VaultError::Encryption {
                    message: "AEAD encryption failed".into(),
                    context: None,
                }
            })?;

        Ok(SealedDocument { nonce, ciphertext })
    }

    /// Decrypts and parses a sealed JSON document.
    ///
    /// # Errors
    /// * [`VaultError::Decryption`] if authentication fails — wrong key,
    ///   mismatched nonce, or tampered ciphertext. Corrupted-but-parsed data
    ///   is impossible; GCM rejects the blob before any bytes are released.
    /// * [`VaultError::Serialization`] if the decrypted bytes are not the
    ///   expected document shape.
    pub fn open<T: DeserializeOwned>(
        &self,
        ciphertext: &[u8],
        nonce: &[u8; NONCE_LEN],
    ) -> Result<T, VaultError> {
        let plaintext = self.open_bytes(ciphertext, nonce)?;
        serde_json::from_slice(&plaintext).context("Decoding decrypted document")
    }

    /// Decrypts raw ciphertext, returning the plaintext in a zeroizing
    /// buffer.
    ///
    /// # Errors
    /// Returns [`VaultError::Decryption`] if authentication fails.
    pub fn open_bytes(
        &self,
        ciphertext: &[u8],
        nonce: &[u8; NONCE_LEN],
    ) -> Result<Zeroizing<Vec<u8>>, VaultError> {
        self.cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map(Zeroizing::new)
            .map_err(|_| VaultError::Decryption {
                message: "AEAD authentication failed".into(),
                context: None,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kdf::{SALT_LEN, derive_key};

    fn cipher_for(password: &str) -> DocumentCipher {
        DocumentCipher::new(&derive_key(password, &[42u8; SALT_LEN]))
    }

    #[test]
    fn seal_open_bytes_roundtrip() {
        let cipher = cipher_for("pw");
        let sealed = cipher.seal_bytes(b"secret bytes").unwrap();
        let opened = cipher.open_bytes(&sealed.ciphertext, &sealed.nonce).unwrap();
        assert_eq!(opened.as_slice(), b"secret bytes");
    }

    #[test]
    fn wrong_key_fails_authentication() {
        let sealed = cipher_for("right").seal_bytes(b"data").unwrap();
        let result = cipher_for("wrong").open_bytes(&sealed.ciphertext, &sealed.nonce);
        assert!(matches!(result, Err(VaultError::Decryption { .. })));
    }

    #[test]
    fn wrong_nonce_fails_authentication() {
        let cipher = cipher_for("pw");
        let sealed = cipher.seal_bytes(b"data").unwrap();
        let result = cipher.open_bytes(&sealed.ciphertext, &[0u8; NONCE_LEN]);
        assert!(matches!(result, Err(VaultError::Decryption { .. })));
    }

    #[test]
    fn tampered_ciphertext_fails_authentication() {
        let cipher = cipher_for("pw");
        let mut sealed = cipher.seal_bytes(b"data").unwrap();
        sealed.ciphertext[0] ^= 0x01;
        let result = cipher.open_bytes(&sealed.ciphertext, &sealed.nonce);
        assert!(matches!(result, Err(VaultError::Decryption { .. })));
    }

    #[test]
    fn every_seal_uses_a_fresh_nonce() {
        let cipher = cipher_for("pw");
        let a = cipher.seal_bytes(b"same plaintext").unwrap();
        let b = cipher.seal_bytes(b"same plaintext").unwrap();
        assert_ne!(a.nonce, b.nonce);
        assert_ne!(a.ciphertext, b.ciphertext);
    }
}
