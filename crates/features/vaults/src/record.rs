//! At-rest representation of a vault.

use chrono::{DateTime, Utc};
use mymeds_vault::{NONCE_LEN, SALT_LEN};
use serde::{Deserialize, Serialize};

/// Public parameters of the key-derivation scheme protecting a vault.
///
/// A closed union: adding a second scheme is a new variant, not a string
/// comparison. The `Authenticator` variant is reserved for platform
/// authenticator keys and is never constructed yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyParams {
    /// Password scheme. The salt is fixed at vault creation; the nonce is
    /// replaced on every encryption and must never repeat for one key.
    Password { salt: [u8; SALT_LEN], nonce: [u8; NONCE_LEN] },
    /// Reserved for hardware-backed keys; unlocking a record carrying this
    /// variant fails as unsupported.
    Authenticator { credential_id: Vec<u8> },
}

impl KeyParams {
    /// The scheme tag exposed in vault listings.
    #[must_use]
    pub const fn strategy(&self) -> &'static str {
        match self {
            Self::Password { .. } => "password",
            Self::Authenticator { .. } => "authenticator",
        }
    }
}

/// One stored vault: metadata, key parameters, and the sealed document.
///
/// The ciphertext is opaque; only `ciphertext`, the nonce inside
/// `key_params`, and `modified_at` change on a save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaultRecord {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    pub key_params: KeyParams,
    pub ciphertext: Vec<u8>,
}

impl VaultRecord {
    /// The listing view of this record. Excludes ciphertext and key
    /// parameters.
    #[must_use]
    pub fn metadata(&self) -> VaultMetadata {
        VaultMetadata {
            id: self.id.clone(),
            name: self.name.clone(),
            created_at: self.created_at,
            modified_at: self.modified_at,
            encryption_strategy: self.key_params.strategy(),
        }
    }
}

/// What vault listings expose: everything a picker UI needs, nothing an
/// attacker could use offline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultMetadata {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    pub encryption_strategy: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_excludes_secret_material() {
        let record = VaultRecord {
            id: "abc".to_owned(),
            name: "Home".to_owned(),
            created_at: Utc::now(),
            modified_at: Utc::now(),
            key_params: KeyParams::Password { salt: [1; SALT_LEN], nonce: [2; NONCE_LEN] },
            ciphertext: vec![0xde, 0xad],
        };

        let meta = record.metadata();
        assert_eq!(meta.id, "abc");
        assert_eq!(meta.encryption_strategy, "password");

        let json = serde_json::to_value(&meta).unwrap();
        assert!(json.get("ciphertext").is_none());
        assert!(json.get("keyParams").is_none());
    }

    #[test]
    fn record_roundtrips_through_postcard() {
        let record = VaultRecord {
            id: "abc".to_owned(),
            name: "Home".to_owned(),
            created_at: Utc::now(),
            modified_at: Utc::now(),
            key_params: KeyParams::Password { salt: [1; SALT_LEN], nonce: [2; NONCE_LEN] },
            ciphertext: vec![1, 2, 3],
        };

        let bytes = postcard::to_allocvec(&record).unwrap();
        let restored: VaultRecord = postcard::from_bytes(&bytes).unwrap();
        assert_eq!(restored, record);
    }
}
