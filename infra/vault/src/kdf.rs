//! Password-based key derivation.
//!
//! A vault key is re-derived from `(password, salt)` at every unlock via
//! PBKDF2-HMAC-SHA256 with a deliberately high iteration count; the key
//! itself is never stored. The salt is generated once per vault and kept in
//! the record's public key parameters — it must be random and unique per
//! vault so precomputed-table attacks cannot span vaults.

use crate::error::VaultError;
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Salt length in bytes.
pub const SALT_LEN: usize = 16;
/// Derived key length in bytes (AES-256).
pub const KEY_LEN: usize = 32;
/// PBKDF2 iteration count.
///
/// The slowness is the point: it is the brute-force deterrent for stolen
/// vault files. Do not lower it; callers must not impose timeouts on
/// derivation.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// A 256-bit symmetric key derived from a password.
///
/// Wiped from memory on drop. The raw bytes are only reachable through
/// [`DerivedKey::as_bytes`] and never appear in `Debug` output.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey([u8; KEY_LEN]);

impl DerivedKey {
    #[must_use]
    pub(crate) const fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("DerivedKey").field(&"<redacted>").finish()
    }
}

/// Generates a fresh random salt for a new vault.
///
/// # Errors
/// Returns [`VaultError::RandomSource`] if the system RNG is unavailable.
pub fn generate_salt() -> Result<[u8; SALT_LEN], VaultError> {
    let mut salt = [0u8; SALT_LEN];
    getrandom::getrandom(&mut salt).map_err(|e| VaultError::RandomSource {
        message: e.to_string().into(),
        context: Some("Salt generation".into()),
    })?;
    Ok(salt)
}

/// Derives the vault key from a password and its stored salt.
///
/// Deterministic: the same `(password, salt)` pair always yields the same
/// key, which is what makes storing only the salt sufficient.
#[must_use]
pub fn derive_key(password: &str, salt: &[u8; SALT_LEN]) -> DerivedKey {
    let mut key = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, PBKDF2_ITERATIONS, &mut key);
    DerivedKey(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_is_deterministic() {
        let salt = [7u8; SALT_LEN];
        let a = derive_key("correct-horse", &salt);
        let b = derive_key("correct-horse", &salt);
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn different_passwords_yield_different_keys() {
        let salt = [7u8; SALT_LEN];
        let a = derive_key("correct-horse", &salt);
        let b = derive_key("battery-staple", &salt);
        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn different_salts_yield_different_keys() {
        let a = derive_key("correct-horse", &[1u8; SALT_LEN]);
        let b = derive_key("correct-horse", &[2u8; SALT_LEN]);
        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn salts_are_unique() {
        let a = generate_salt().unwrap();
        let b = generate_salt().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn debug_output_is_redacted() {
        let key = derive_key("secret", &[0u8; SALT_LEN]);
        let printed = format!("{key:?}");
        assert!(printed.contains("redacted"));
    }
}
