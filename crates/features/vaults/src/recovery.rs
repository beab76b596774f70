//! One-shot session recovery across an unexpected reload.
//!
//! A [`RecoveryTicket`] holds the open vault's id and password so the next
//! startup can re-unlock automatically after the process was torn down
//! mid-session (e.g. a platform file picker suspending the app). Holding the
//! password at rest is a deliberate, narrowly-scoped weakening of the
//! "password is never persisted" property; the ticket lives in a
//! runtime-scoped location, not the durable store, and [`RecoveryStore::take`]
//! clears it unconditionally on the first read so it never survives more
//! than one recovery attempt.

use crate::error::Result;
use mymeds_storage::{NamespacedStorage, Storage, StorageError};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use zeroize::{Zeroize, ZeroizeOnDrop};

const RUNTIME_NAMESPACE: &str = "runtime";
const TICKET_FILE: &str = "recovery.json";

/// Transient credentials for one automatic re-unlock.
#[derive(Clone, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct RecoveryTicket {
    pub vault_id: String,
    pub password: String,
}

impl std::fmt::Debug for RecoveryTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecoveryTicket")
            .field("vault_id", &self.vault_id)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Persists at most one recovery ticket.
#[derive(Debug, Clone)]
pub struct RecoveryStore {
    files: NamespacedStorage,
}

impl RecoveryStore {
    /// Opens the runtime namespace on the given storage engine. Pass a
    /// storage instance rooted in a temp/runtime directory, not the durable
    /// data root.
    ///
    /// # Errors
    /// Returns [`crate::VaultsError::Storage`] if the namespace cannot be
    /// created.
    pub fn new(storage: &Storage) -> Result<Self> {
        let files = storage.namespace(RUNTIME_NAMESPACE)?;
        Ok(Self { files })
    }

    /// Writes the ticket, replacing any previous one.
    pub async fn save(&self, ticket: &RecoveryTicket) -> Result<()> {
        let bytes = serde_json::to_vec(ticket).map_err(|e| crate::VaultsError::Internal {
            message: format!("Unencodable recovery ticket: {e}").into(),
            context: None,
        })?;
        self.files.write(TICKET_FILE, &bytes).await?;
        debug!("Recovery ticket saved");
        Ok(())
    }

    /// Reads and clears the ticket in one step.
    ///
    /// The clear is unconditional: a ticket that fails to parse is still
    /// removed, so no ticket ever outlives a single recovery attempt.
    pub async fn take(&self) -> Result<Option<RecoveryTicket>> {
        let bytes = match self.files.read(TICKET_FILE).await {
            Ok(bytes) => bytes,
            Err(StorageError::FileNotFound { .. }) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        self.clear().await?;

        match serde_json::from_slice(&bytes) {
            Ok(ticket) => Ok(Some(ticket)),
            Err(e) => {
                warn!(error = %e, "Discarding unparseable recovery ticket");
                Ok(None)
            },
        }
    }

    /// Removes the ticket if present.
    pub async fn clear(&self) -> Result<()> {
        match self.files.delete(TICKET_FILE).await {
            Ok(()) | Err(StorageError::FileNotFound { .. }) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
