use crate::engine::Storage;
use crate::error::{StorageError, StorageErrorExt};
use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamespaceName(pub String);

impl TryFrom<String> for NamespaceName {
    type Error = StorageError;

    fn try_from(value: String) -> Result<Self, StorageError> {
        Self::try_from(value.as_str())
    }
}

impl TryFrom<&str> for NamespaceName {
    type Error = StorageError;

    fn try_from(value: &str) -> Result<Self, StorageError> {
        let name = value.to_lowercase();

        if name.is_empty() {
            return Err(StorageError::PathTraversalAttempt {
                message: "EMPTY".into(),
                context: Some("Namespace cannot be empty".into()),
            });
        }

        if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(StorageError::PathTraversalAttempt {
                message: name.into(),
                context: Some("Namespace contains illegal characters".into()),
            });
        }

        Ok(Self(name))
    }
}

impl AsRef<str> for NamespaceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NamespaceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A lightweight, namespaced view of the storage engine.
///
/// All paths are prefixed with the namespace directory while the sandbox,
/// compression, and atomic-write behavior are inherited from the parent
/// [`Storage`]. Cloning is cheap; the view only holds a reference-counted
/// handle to the core engine.
#[derive(Debug, Clone)]
pub struct NamespacedStorage {
    storage: Storage,
    namespace: Arc<Cow<'static, str>>,
}

impl NamespacedStorage {
    pub(crate) fn new(storage: Storage, namespace: impl Into<Cow<'static, str>>) -> Self {
        Self { storage, namespace: Arc::new(namespace.into()) }
    }

    /// Resolves a relative path to its physical location inside the
    /// namespace directory.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::PathTraversalAttempt`] if the path tries to
    /// escape the sandbox, or [`StorageError::Io`] if the path cannot be
    /// verified on the filesystem.
    pub fn resolve(&self, path: impl AsRef<Path>) -> Result<PathBuf, StorageError> {
        self.storage.resolve_internal(Some(&self.namespace), path)
    }

    /// Reads the entire contents of a file into a byte vector, transparently
    /// decompressing when compression is enabled.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::FileNotFound`] if the path does not exist.
    /// Returns [`StorageError::Decompress`] if the data is corrupted or
    /// compression is misconfigured.
    pub async fn read(&self, path: impl AsRef<Path>) -> Result<Vec<u8>, StorageError> {
        self.storage.read_internal(Some(&self.namespace), path).await
    }

    /// Writes data to a file atomically, compressing first when compression
    /// is enabled. See [`Storage::write`] for the swap sequence.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::PathTraversalAttempt`] if the path escapes the
    /// sandbox, or [`StorageError::Io`] on disk failure.
    pub async fn write(&self, path: impl AsRef<Path>, data: &[u8]) -> Result<(), StorageError> {
        self.storage.write_internal(Some(&self.namespace), path, data).await
    }

    /// Deletes a file inside the namespace.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::FileNotFound`] if the file does not exist and
    /// [`StorageError::Io`] on permission or hardware failures.
    pub async fn delete(&self, path: impl AsRef<Path>) -> Result<(), StorageError> {
        self.storage.delete_internal(Some(&self.namespace), path).await
    }

    /// Checks whether a file exists inside the namespace.
    ///
    /// # Errors
    ///
    /// Returns `Ok(false)` when the file is not found. An `Err` only means
    /// path resolution failed.
    pub fn exists(&self, path: impl AsRef<Path>) -> Result<bool, StorageError> {
        let resolved = self.storage.resolve_internal(Some(&self.namespace), path)?;
        Ok(resolved.exists())
    }

    /// Retrieves filesystem metadata for a file inside the namespace.
    ///
    /// With compression enabled, `len()` reports the compressed on-disk size.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the target does not exist or cannot
    /// be inspected.
    pub async fn metadata(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<std::fs::Metadata, StorageError> {
        let resolved = self.storage.resolve_internal(Some(&self.namespace), path)?;
        fs::metadata(&resolved)
            .await
            .context(format!("Failed to get metadata: {}", resolved.display()))
    }

    /// Lists file names stored at the top level of the namespace, sorted
    /// lexicographically. A namespace that was never written to yields an
    /// empty list.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the namespace directory cannot be
    /// traversed.
    pub async fn list(&self) -> Result<Vec<String>, StorageError> {
        self.storage.list_internal(Some(&self.namespace), ".").await
    }
}
