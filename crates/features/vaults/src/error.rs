use std::borrow::Cow;

/// Failures surfaced by the vault feature slice.
#[derive(Debug, thiserror::Error)]
pub enum VaultsError {
    /// Wrong password or corrupted/tampered ciphertext. Unlock also returns
    /// this for unknown vault ids so callers cannot enumerate which ids
    /// exist separately from guessing passwords.
    #[error("Could not unlock the vault{}", format_context(.context))]
    AuthenticationFailed { context: Option<Cow<'static, str>> },

    /// A data-management operation referenced a vault that no longer exists.
    #[error("Vault not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// An operation was called in the wrong session state, e.g. `save`
    /// while no vault is open.
    #[error("Invalid session state{}: {message}", format_context(.context))]
    InvalidState { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The import file is not valid JSON or is missing the required
    /// `meds`/`calendar` arrays. Rejected before any vault state is touched.
    #[error("Invalid import format{}: {message}", format_context(.context))]
    ImportFormat { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The durable store failed underneath us.
    #[error("Storage failure{}: {source}", format_context(.context))]
    Storage { source: mymeds_storage::StorageError, context: Option<Cow<'static, str>> },

    /// A cryptographic primitive failed for a reason other than
    /// authentication (RNG unavailable, encoding).
    #[error("Crypto failure{}: {source}", format_context(.context))]
    Crypto { source: mymeds_vault::VaultError, context: Option<Cow<'static, str>> },

    /// A stored vault record could not be encoded or decoded.
    #[error("Record codec failure{}: {source}", format_context(.context))]
    Codec { source: postcard::Error, context: Option<Cow<'static, str>> },

    /// Internal logic errors.
    #[error("Internal vault error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Result alias for vault feature operations.
pub type Result<T> = std::result::Result<T, VaultsError>;

impl From<mymeds_storage::StorageError> for VaultsError {
    #[inline]
    fn from(source: mymeds_storage::StorageError) -> Self {
        Self::Storage { source, context: None }
    }
}

impl From<mymeds_vault::VaultError> for VaultsError {
    #[inline]
    fn from(source: mymeds_vault::VaultError) -> Self {
        Self::Crypto { source, context: None }
    }
}

impl From<postcard::Error> for VaultsError {
    #[inline]
    fn from(source: postcard::Error) -> Self {
        Self::Codec { source, context: None }
    }
}

/// Adds `.context(...)` to results that convert into [`VaultsError`].
pub trait VaultsErrorExt<T> {
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T>;
}

impl<T> VaultsErrorExt<T> for Result<T> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Self {
        self.map_err(|mut e| {
            match &mut e {
                VaultsError::AuthenticationFailed { context: c }
                | VaultsError::NotFound { context: c, .. }
                | VaultsError::InvalidState { context: c, .. }
                | VaultsError::ImportFormat { context: c, .. }
                | VaultsError::Storage { context: c, .. }
                | VaultsError::Crypto { context: c, .. }
                | VaultsError::Codec { context: c, .. }
                | VaultsError::Internal { context: c, .. } => *c = Some(context.into()),
            }
            e
        })
    }
}

impl<T> VaultsErrorExt<T> for std::result::Result<T, mymeds_storage::StorageError> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T> {
        self.map_err(|source| VaultsError::Storage { source, context: Some(context.into()) })
    }
}

impl<T> VaultsErrorExt<T> for std::result::Result<T, postcard::Error> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T> {
        self.map_err(|source| VaultsError::Codec { source, context: Some(context.into()) })
    }
}

pub(crate) fn format_context(context: &Option<Cow<'static, str>>) -> Cow<'static, str> {
    context.as_ref().map_or(Cow::Borrowed(""), |c| Cow::Owned(format!(" ({c})")))
}
