//! # Vault Errors
//!
//! [`VaultError`] covers key derivation, AEAD, and document codec failures.
//! Variants carry an owned message plus an optional context string; the
//! [`VaultErrorExt`] trait attaches context to a `Result` the same way the
//! rest of the workspace does.

use std::borrow::Cow;

/// A specialized error enum for vault cryptography failures.
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    /// The system RNG was unavailable while generating a salt or nonce.
    #[error("Random generation error{}: {message}", format_context(.context))]
    RandomSource { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Failure during the encryption process.
    #[error("Encryption error{}: {message}", format_context(.context))]
    Encryption { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Authentication failed during decryption.
    ///
    /// This means the key is wrong (wrong password), the nonce does not
    /// belong to this ciphertext, or the blob was tampered with. It is a
    /// distinct variant so callers can never confuse it with a missing
    /// record or a parse error.
    #[error("Decryption error{}: {message}", format_context(.context))]
    Decryption { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Failure serializing or deserializing the plaintext JSON document.
    #[error("Document codec error{}: {source}", format_context(.context))]
    Serialization { source: serde_json::Error, context: Option<Cow<'static, str>> },

    /// A salt, nonce, or key of the wrong shape was supplied.
    #[error("Invalid parameter{}: {message}", format_context(.context))]
    InvalidParameter { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Result alias for vault operations.
pub type Result<T> = std::result::Result<T, VaultError>;

impl From<serde_json::Error> for VaultError {
    #[inline]
    fn from(source: serde_json::Error) -> Self {
        Self::Serialization { source, context: None }
    }
}

/// Adds `.context(...)` to results carrying a [`VaultError`].
pub trait VaultErrorExt<T> {
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T>;
}

impl<T> VaultErrorExt<T> for Result<T> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Self {
        self.map_err(|mut e| {
            let slot = match &mut e {
                VaultError::RandomSource { context: c, .. }
                | VaultError::Encryption { context: c, .. }
                | VaultError::Decryption { context: c, .. }
                | VaultError::Serialization { context: c, .. }
                | VaultError::InvalidParameter { context: c, .. } => c,
            };
            *slot = Some(context.into());
            e
        })
    }
}

impl<T> VaultErrorExt<T> for std::result::Result<T, serde_json::Error> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T> {
        self.map_err(|source| VaultError::Serialization { source, context: Some(context.into()) })
    }
}

pub(crate) fn format_context(context: &Option<Cow<'static, str>>) -> Cow<'static, str> {
    context.as_ref().map_or(Cow::Borrowed(""), |c| Cow::Owned(format!(" ({c})")))
}
