use crate::calendar::CalendarEntry;
use crate::meds::MedicationItem;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The decrypted document stored inside a vault.
///
/// Owned exclusively by the session while a vault is unlocked; it is never
/// persisted in plaintext outside process memory. `last_decay_date` is the
/// calendar day the consumption engine last deducted doses for — the
/// idempotence guard that keeps a second unlock on the same day from
/// double-deducting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultPlaintext {
    #[serde(default)]
    pub items: Vec<MedicationItem>,
    #[serde(default)]
    pub calendar_entries: Vec<CalendarEntry>,
    #[serde(default)]
    pub last_decay_date: Option<NaiveDate>,
}

impl VaultPlaintext {
    /// An empty document with the decay clock started at `today`.
    #[must_use]
    pub fn empty(today: NaiveDate) -> Self {
        Self { items: Vec::new(), calendar_entries: Vec::new(), last_decay_date: Some(today) }
    }
}
