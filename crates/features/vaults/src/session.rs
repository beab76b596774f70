//! The vault session state machine.
//!
//! One [`VaultSession`] is the single source of truth for "is a vault open,
//! with which plaintext, under which key". States move
//! `Locked -> Unlocking -> Unlocked -> Locked`; nothing skips `Unlocking`.
//! The derived key stays in memory for the lifetime of the unlocked state so
//! saves do not pay the PBKDF2 cost again, and is wiped on lock.

use crate::decay::apply_decay;
use crate::error::{Result, VaultsError};
use crate::record::{KeyParams, VaultMetadata, VaultRecord};
use crate::store::VaultStore;
use chrono::{NaiveDate, Utc};
use mymeds_domain::plaintext::VaultPlaintext;
use mymeds_vault::{DerivedKey, DocumentCipher, SALT_LEN, VaultError, derive_key, generate_salt};
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

enum SessionState {
    Locked,
    Unlocking,
    Unlocked { record: VaultRecord, key: DerivedKey, plaintext: VaultPlaintext },
}

impl std::fmt::Debug for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Locked => f.write_str("Locked"),
            Self::Unlocking => f.write_str("Unlocking"),
            Self::Unlocked { record, .. } => {
                f.debug_struct("Unlocked").field("id", &record.id).finish_non_exhaustive()
            },
        }
    }
}

/// Orchestrates create/unlock/save/lock/delete over the vault store and the
/// cryptographic core.
///
/// Single-writer by design: one session per process, all operations `&mut`.
#[derive(Debug)]
pub struct VaultSession {
    store: VaultStore,
    state: SessionState,
}

impl VaultSession {
    #[must_use]
    pub const fn new(store: VaultStore) -> Self {
        Self { store, state: SessionState::Locked }
    }

    /// Whether a vault is currently open.
    #[must_use]
    pub const fn is_unlocked(&self) -> bool {
        matches!(self.state, SessionState::Unlocked { .. })
    }

    /// The id of the currently open vault, if any.
    #[must_use]
    pub fn current_id(&self) -> Option<&str> {
        match &self.state {
            SessionState::Unlocked { record, .. } => Some(&record.id),
            _ => None,
        }
    }

    /// Read access to the open vault's document.
    #[must_use]
    pub const fn plaintext(&self) -> Option<&VaultPlaintext> {
        match &self.state {
            SessionState::Unlocked { plaintext, .. } => Some(plaintext),
            _ => None,
        }
    }

    /// Mutable access to the open vault's document. Changes stay in memory
    /// until [`VaultSession::save`] is called.
    ///
    /// # Errors
    /// Returns [`VaultsError::InvalidState`] when no vault is open.
    pub fn plaintext_mut(&mut self) -> Result<&mut VaultPlaintext> {
        match &mut self.state {
            SessionState::Unlocked { plaintext, .. } => Ok(plaintext),
            _ => Err(VaultsError::InvalidState {
                message: "No vault is open".into(),
                context: None,
            }),
        }
    }

    /// Creates a new vault: fresh salt, derived key, an empty document with
    /// the decay clock started at `today`, sealed and persisted.
    ///
    /// Creation does not open the vault; the session stays in its current
    /// state and the caller unlocks explicitly.
    pub async fn create(
        &self,
        name: impl Into<String>,
        password: &str,
        today: NaiveDate,
    ) -> Result<VaultMetadata> {
        let salt = generate_salt()?;
        let key = derive_key_blocking(password, salt).await?;
        let cipher = DocumentCipher::new(&key);

        let sealed = cipher.seal(&VaultPlaintext::empty(today))?;
        let key_params = KeyParams::Password { salt, nonce: sealed.nonce };

        let record = self.store.create(name, key_params, sealed.ciphertext).await?;
        Ok(record.metadata())
    }

    /// Unlocks a vault: reads the record, re-derives the key from its stored
    /// salt, decrypts, runs the daily decay pass, then exposes the document.
    ///
    /// A decay pass that changed anything is persisted immediately so the
    /// on-disk record never lags behind what the user sees.
    ///
    /// # Errors
    /// Returns [`VaultsError::InvalidState`] when a vault is already open:
    /// switching vaults requires an explicit [`VaultSession::lock`] (after
    /// saving, if there are edits to keep), so unsaved changes are never
    /// silently dropped. Returns [`VaultsError::AuthenticationFailed`] for a
    /// wrong password, a tampered record, or an unknown id — deliberately
    /// indistinguishable, so failed unlocks leak nothing about which vault
    /// ids exist.
    pub async fn unlock(&mut self, id: &str, password: &str, today: NaiveDate) -> Result<()> {
        if self.is_unlocked() {
            return Err(VaultsError::InvalidState {
                message: "A vault is already open; lock it first".into(),
                context: None,
            });
        }
        self.state = SessionState::Unlocking;

        match self.try_unlock(id, password, today).await {
            Ok(()) => Ok(()),
            Err(e) => {
                self.state = SessionState::Locked;
                Err(e)
            },
        }
    }

    async fn try_unlock(&mut self, id: &str, password: &str, today: NaiveDate) -> Result<()> {
        let record = match self.store.read(id).await {
            Ok(record) => record,
            // An unknown id reads exactly like a wrong password.
            Err(VaultsError::NotFound { .. }) => {
                warn!("Unlock failed");
                return Err(VaultsError::AuthenticationFailed { context: None });
            },
            Err(e) => return Err(e),
        };

        let (salt, nonce) = match &record.key_params {
            KeyParams::Password { salt, nonce } => (*salt, *nonce),
            KeyParams::Authenticator { .. } => {
                return Err(VaultsError::Internal {
                    message: "Unsupported key-derivation scheme".into(),
                    context: None,
                });
            },
        };

        let key = derive_key_blocking(password, salt).await?;
        let cipher = DocumentCipher::new(&key);

        let plaintext: VaultPlaintext = match cipher.open(&record.ciphertext, &nonce) {
            Ok(plaintext) => plaintext,
            Err(VaultError::Decryption { .. }) => {
                warn!("Unlock failed");
                return Err(VaultsError::AuthenticationFailed { context: None });
            },
            Err(e) => return Err(e.into()),
        };

        let outcome = apply_decay(&plaintext.items, plaintext.last_decay_date, today);
        let needs_save = outcome.updated;
        if !outcome.deductions.is_empty() {
            debug!(items = outcome.deductions.len(), "Applied daily consumption decay");
        }

        let plaintext = VaultPlaintext {
            items: outcome.items,
            calendar_entries: plaintext.calendar_entries,
            last_decay_date: Some(outcome.new_decay_date),
        };

        self.state = SessionState::Unlocked { record, key, plaintext };
        info!(id = %id, "Vault unlocked");

        if needs_save {
            self.save().await?;
        }
        Ok(())
    }

    /// Re-encrypts the current in-memory document under a fresh nonce and
    /// replaces the stored record. Valid only while a vault is open; does
    /// not change the session state.
    ///
    /// # Errors
    /// Returns [`VaultsError::InvalidState`] when no vault is open.
    pub async fn save(&mut self) -> Result<()> {
        let SessionState::Unlocked { record, key, plaintext } = &mut self.state else {
            return Err(VaultsError::InvalidState {
                message: "Cannot save: no vault is open".into(),
                context: None,
            });
        };

        let salt = match &record.key_params {
            KeyParams::Password { salt, .. } => *salt,
            KeyParams::Authenticator { .. } => {
                return Err(VaultsError::Internal {
                    message: "Unsupported key-derivation scheme".into(),
                    context: None,
                });
            },
        };

        let cipher = DocumentCipher::new(key);
        let sealed = cipher.seal(plaintext)?;

        record.key_params = KeyParams::Password { salt, nonce: sealed.nonce };
        record.ciphertext = sealed.ciphertext;
        record.modified_at = Utc::now();

        self.store.update(record).await?;
        debug!(id = %record.id, "Vault saved");
        Ok(())
    }

    /// Discards the in-memory key and plaintext and returns to `Locked`.
    /// Valid from any state. The dropped key zeroizes itself.
    pub fn lock(&mut self) {
        if let SessionState::Unlocked { record, .. } = &self.state {
            info!(id = %record.id, "Vault locked");
        }
        self.state = SessionState::Locked;
    }

    /// Deletes a stored vault. If the target is the currently open vault,
    /// the session locks first so no plaintext of a deleted vault stays
    /// exposed.
    pub async fn delete(&mut self, id: &str) -> Result<()> {
        if self.current_id() == Some(id) {
            self.lock();
        }
        self.store.delete(id).await
    }

    /// Lists stored vaults; available in any state.
    pub async fn list(&self) -> Result<Vec<VaultMetadata>> {
        self.store.list().await
    }
}

/// Runs PBKDF2 on the blocking pool; 100k iterations would stall the async
/// executor for tens of milliseconds otherwise.
async fn derive_key_blocking(password: &str, salt: [u8; SALT_LEN]) -> Result<DerivedKey> {
    let password = Zeroizing::new(password.to_owned());
    tokio::task::spawn_blocking(move || derive_key(&password, &salt)).await.map_err(|e| {
        VaultsError::Internal {
            message: format!("Key derivation task failed: {e}").into(),
            context: None,
        }
    })
}
