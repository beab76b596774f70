//! Cryptographic core of the MyMeds vault subsystem.
//!
//! Two building blocks, kept deliberately small:
//!
//! * [`kdf`] — PBKDF2-HMAC-SHA256 password key derivation (100 000
//!   iterations, 16-byte salt, 256-bit key). Deterministic per
//!   `(password, salt)`, so only the salt is ever stored.
//! * [`cipher`] — AES-256-GCM authenticated encryption of whole JSON
//!   documents, one fresh 96-bit random nonce per seal.
//!
//! Tampering and wrong-password decryption both surface as
//! [`VaultError::Decryption`]; callers can rely on never receiving
//! corrupted-but-parsed plaintext.
//!
//! Key material lives in zeroizing wrappers and is wiped on drop. Perfect
//! erasure cannot be guaranteed in a managed runtime, but nothing in this
//! crate keeps a second copy alive.
//!
//! ## Example
//!
//! ```rust
//! use mymeds_vault::prelude::*;
//!
//! # fn main() -> Result<(), VaultError> {
//! let salt = generate_salt()?;
//! let key = derive_key("correct-horse", &salt);
//! let cipher = DocumentCipher::new(&key);
//!
//! let sealed = cipher.seal(&vec!["aspirin", "ibuprofen"])?;
//! let restored: Vec<String> = cipher.open(&sealed.ciphertext, &sealed.nonce)?;
//! assert_eq!(restored, vec!["aspirin", "ibuprofen"]);
//! # Ok(())
//! # }
//! ```

pub mod cipher;
mod error;
pub mod kdf;

pub use cipher::{DocumentCipher, NONCE_LEN, SealedDocument};
pub use error::{VaultError, VaultErrorExt};
pub use kdf::{DerivedKey, KEY_LEN, PBKDF2_ITERATIONS, SALT_LEN, derive_key, generate_salt};

pub mod prelude {
    pub use crate::cipher::{DocumentCipher, NONCE_LEN, SealedDocument};
    pub use crate::error::{VaultError, VaultErrorExt};
    pub use crate::kdf::{DerivedKey, SALT_LEN, derive_key, generate_salt};
}
