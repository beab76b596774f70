//! Durable persistence for vault records and unencrypted app settings.
//!
//! Both stores sit on namespaced views of the sandboxed storage engine:
//! vault records as one postcard file per id under `vaults/`, settings as a
//! single flat JSON map under `settings/`. Writes are atomic at the file
//! level, so a crashed save leaves the prior record untouched.

use crate::error::{Result, VaultsError, VaultsErrorExt};
use crate::record::{KeyParams, VaultMetadata, VaultRecord};
use chrono::Utc;
use mymeds_domain::settings::AppSettings;
use mymeds_storage::{NamespacedStorage, Storage, StorageError};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::info;

const VAULTS_NAMESPACE: &str = "vaults";
const SETTINGS_NAMESPACE: &str = "settings";
const SETTINGS_FILE: &str = "app.json";

/// Id length for new vaults.
const VAULT_ID_LEN: usize = 12;

/// Vault record store: one file per vault, keyed by the store-assigned id.
#[derive(Debug, Clone)]
pub struct VaultStore {
    files: NamespacedStorage,
}

impl VaultStore {
    /// Opens the vault namespace on the given storage engine.
    ///
    /// # Errors
    /// Returns [`VaultsError::Storage`] if the namespace cannot be created.
    pub fn new(storage: &Storage) -> Result<Self> {
        let files = storage.namespace(VAULTS_NAMESPACE)?;
        Ok(Self { files })
    }

    /// Lists all stored vaults as metadata. Ciphertext and key parameters
    /// never travel through this path.
    ///
    /// Results are ordered by creation time so the picker UI is stable.
    pub async fn list(&self) -> Result<Vec<VaultMetadata>> {
        let mut vaults = Vec::new();
        for id in self.files.list().await? {
            let record = self.read(&id).await?;
            vaults.push(record.metadata());
        }
        vaults.sort_by_key(|m| m.created_at);
        Ok(vaults)
    }

    /// Creates a new vault record with a fresh id and timestamps and
    /// persists it. Returns the full record.
    pub async fn create(
        &self,
        name: impl Into<String>,
        key_params: KeyParams,
        ciphertext: Vec<u8>,
    ) -> Result<VaultRecord> {
        let now = Utc::now();
        let record = VaultRecord {
            id: nanoid::nanoid!(VAULT_ID_LEN),
            name: name.into(),
            created_at: now,
            modified_at: now,
            key_params,
            ciphertext,
        };

        self.write(&record).await?;
        info!(id = %record.id, "Vault created");
        Ok(record)
    }

    /// Reads the full record for one vault.
    ///
    /// # Errors
    /// Returns [`VaultsError::NotFound`] for unknown ids.
    pub async fn read(&self, id: &str) -> Result<VaultRecord> {
        let bytes = match self.files.read(id).await {
            Ok(bytes) => bytes,
            Err(StorageError::FileNotFound { .. }) => {
                return Err(VaultsError::NotFound { message: id.to_owned().into(), context: None });
            },
            Err(e) => return Err(e.into()),
        };

        postcard::from_bytes(&bytes).context(format!("Decoding vault record {id}"))
    }

    /// Replaces a stored record wholesale. The caller supplies the complete
    /// record including refreshed ciphertext, nonce, and `modified_at`.
    ///
    /// # Errors
    /// Returns [`VaultsError::NotFound`] if the id has never been created.
    pub async fn update(&self, record: &VaultRecord) -> Result<()> {
        if !self.files.exists(&record.id)? {
            return Err(VaultsError::NotFound {
                message: record.id.clone().into(),
                context: Some("Update target missing".into()),
            });
        }
        self.write(record).await
    }

    /// Deletes a vault record.
    ///
    /// # Errors
    /// Returns [`VaultsError::NotFound`] for unknown ids.
    pub async fn delete(&self, id: &str) -> Result<()> {
        match self.files.delete(id).await {
            Ok(()) => {
                info!(id = %id, "Vault deleted");
                Ok(())
            },
            Err(StorageError::FileNotFound { .. }) => {
                Err(VaultsError::NotFound { message: id.to_owned().into(), context: None })
            },
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, record: &VaultRecord) -> Result<()> {
        let bytes = postcard::to_allocvec(record)
            .context(format!("Encoding vault record {}", record.id))?;
        self.files.write(&record.id, &bytes).await?;
        Ok(())
    }
}

/// Flat key-value settings store, independent of any vault.
///
/// All keys live in one JSON object file; reads of a missing file yield the
/// documented defaults, so the store works before anything was ever saved.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    files: NamespacedStorage,
}

impl SettingsStore {
    /// Opens the settings namespace on the given storage engine.
    ///
    /// # Errors
    /// Returns [`VaultsError::Storage`] if the namespace cannot be created.
    pub fn new(storage: &Storage) -> Result<Self> {
        let files = storage.namespace(SETTINGS_NAMESPACE)?;
        Ok(Self { files })
    }

    /// Reads one setting, falling back to `default` when the key is absent
    /// or holds a value of the wrong shape.
    pub async fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> Result<T> {
        let map = self.read_map().await?;
        Ok(map
            .get(key)
            .cloned()
            .and_then(|value| serde_json::from_value(value).ok())
            .unwrap_or(default))
    }

    /// Writes one setting, preserving all other keys.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let mut map = self.read_map().await?;
        let value = serde_json::to_value(value).map_err(|e| VaultsError::Internal {
            message: format!("Unencodable setting '{key}': {e}").into(),
            context: None,
        })?;
        map.insert(key.to_owned(), value);
        self.write_map(&map).await
    }

    /// Loads the complete typed settings. Missing keys take their documented
    /// defaults; unknown keys are ignored.
    pub async fn load(&self) -> Result<AppSettings> {
        let map = self.read_map().await?;
        Ok(serde_json::from_value(Value::Object(map)).unwrap_or_default())
    }

    /// Persists the complete typed settings, replacing the stored map.
    pub async fn save(&self, settings: &AppSettings) -> Result<()> {
        let value = serde_json::to_value(settings).map_err(|e| VaultsError::Internal {
            message: format!("Unencodable settings: {e}").into(),
            context: None,
        })?;
        match value {
            Value::Object(map) => self.write_map(&map).await,
            _ => Err(VaultsError::Internal {
                message: "Settings did not serialize to an object".into(),
                context: None,
            }),
        }
    }

    async fn read_map(&self) -> Result<Map<String, Value>> {
        let bytes = match self.files.read(SETTINGS_FILE).await {
            Ok(bytes) => bytes,
            Err(StorageError::FileNotFound { .. }) => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_slice(&bytes).map_err(|e| VaultsError::Internal {
            message: format!("Corrupt settings file: {e}").into(),
            context: None,
        })
    }

    async fn write_map(&self, map: &Map<String, Value>) -> Result<()> {
        let bytes = serde_json::to_vec(map).map_err(|e| VaultsError::Internal {
            message: format!("Unencodable settings map: {e}").into(),
            context: None,
        })?;
        self.files.write(SETTINGS_FILE, &bytes).await?;
        Ok(())
    }
}
