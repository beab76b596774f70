//! Vault import and export.
//!
//! Export produces a plain-JSON snapshot of the open vault's medications and
//! calendar; it is the user's own unencrypted backup, written only on
//! explicit request. Import validates the whole file and reports comparison
//! stats first; replacing the vault contents is a separate explicit step, so
//! a malformed file can never half-overwrite a vault.

use crate::error::{Result, VaultsError};
use chrono::{DateTime, NaiveDate, Utc};
use mymeds_domain::calendar::CalendarEntry;
use mymeds_domain::meds::MedicationItem;
use mymeds_domain::plaintext::VaultPlaintext;
use serde::{Deserialize, Deserializer, Serialize};

/// The on-disk export format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_date: Option<DateTime<Utc>>,
    pub meds: Vec<MedicationItem>,
    pub calendar: Vec<CalendarEntry>,
    /// Older export files carry this in platform-specific prose formats;
    /// anything unrecognizable degrades to `None` instead of failing the
    /// whole import.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_date"
    )]
    pub last_dose_update: Option<NaiveDate>,
}

fn lenient_date<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<NaiveDate>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_lenient_date))
}

/// Accepts ISO dates and the `Date.toDateString()` style
/// ("Sat Aug 30 2025") found in exports from earlier app versions.
fn parse_lenient_date(raw: &str) -> Option<NaiveDate> {
    raw.parse().ok().or_else(|| NaiveDate::parse_from_str(raw, "%a %b %d %Y").ok())
}

/// A ready-to-write export: suggested file name plus JSON content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub content: String,
}

/// Counts shown to the user before an import replaces anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportStats {
    pub export_date: Option<DateTime<Utc>>,
    pub incoming_meds: usize,
    pub incoming_calendar: usize,
    pub current_meds: usize,
    pub current_calendar: usize,
}

/// A validated import: the parsed document and its comparison stats.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportPreview {
    pub document: ExportDocument,
    pub stats: ImportStats,
}

/// Builds the export snapshot of a vault document.
///
/// # Errors
/// Returns [`VaultsError::Internal`] if the document cannot be encoded,
/// which would indicate a bug rather than bad input.
pub fn prepare_export(plaintext: &VaultPlaintext, now: DateTime<Utc>) -> Result<ExportFile> {
    let document = ExportDocument {
        export_date: Some(now),
        meds: plaintext.items.clone(),
        calendar: plaintext.calendar_entries.clone(),
        last_dose_update: plaintext.last_decay_date,
    };

    let content =
        serde_json::to_string_pretty(&document).map_err(|e| VaultsError::Internal {
            message: format!("Unencodable export: {e}").into(),
            context: None,
        })?;

    Ok(ExportFile { file_name: export_file_name(now.date_naive()), content })
}

/// The `mymeds_daten_DD.MM.YYYY.json` naming convention.
#[must_use]
pub fn export_file_name(date: NaiveDate) -> String {
    format!("mymeds_daten_{}.json", date.format("%d.%m.%Y"))
}

/// Validates an import file against the current vault contents.
///
/// The file must be JSON with array-typed `meds` and `calendar` fields;
/// anything else is rejected before any vault state is touched. On success
/// the caller shows [`ImportStats`] for confirmation and then applies the
/// document with [`apply_import`].
///
/// # Errors
/// Returns [`VaultsError::ImportFormat`] for malformed input.
pub fn process_import(content: &str, current: &VaultPlaintext) -> Result<ImportPreview> {
    let value: serde_json::Value = serde_json::from_str(content).map_err(|e| {
        VaultsError::ImportFormat { message: format!("Not valid JSON: {e}").into(), context: None }
    })?;

    for field in ["meds", "calendar"] {
        if !value.get(field).is_some_and(serde_json::Value::is_array) {
            return Err(VaultsError::ImportFormat {
                message: format!("Missing or non-array '{field}' field").into(),
                context: None,
            });
        }
    }

    let document: ExportDocument = serde_json::from_value(value).map_err(|e| {
        VaultsError::ImportFormat {
            message: format!("Unrecognized entry shape: {e}").into(),
            context: None,
        }
    })?;

    let stats = ImportStats {
        export_date: document.export_date,
        incoming_meds: document.meds.len(),
        incoming_calendar: document.calendar.len(),
        current_meds: current.items.len(),
        current_calendar: current.calendar_entries.len(),
    };

    Ok(ImportPreview { document, stats })
}

/// Replaces the vault contents with the imported document.
///
/// The decay date carries over from the import when present; otherwise the
/// current one is kept so the next unlock does not double-deduct.
pub fn apply_import(document: ExportDocument, plaintext: &mut VaultPlaintext) {
    plaintext.items = document.meds;
    plaintext.calendar_entries = document.calendar;
    if document.last_dose_update.is_some() {
        plaintext.last_decay_date = document.last_dose_update;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_plaintext() -> VaultPlaintext {
        VaultPlaintext {
            items: vec![MedicationItem {
                name: "Aspirin".to_owned(),
                active_ingredient: None,
                count: 100.0,
                package_size: Some(50.0),
                dose: "1-0-1".to_owned(),
                color: None,
            }],
            calendar_entries: Vec::new(),
            last_decay_date: NaiveDate::from_ymd_opt(2026, 8, 30),
        }
    }

    #[test]
    fn export_file_name_follows_convention() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 5).unwrap();
        assert_eq!(export_file_name(date), "mymeds_daten_05.08.2026.json");
    }

    #[test]
    fn export_then_import_roundtrips_counts() {
        let plaintext = sample_plaintext();
        let export = prepare_export(&plaintext, Utc::now()).unwrap();

        let preview = process_import(&export.content, &VaultPlaintext::default()).unwrap();
        assert_eq!(preview.stats.incoming_meds, 1);
        assert_eq!(preview.stats.incoming_calendar, 0);
        assert_eq!(preview.stats.current_meds, 0);

        let mut target = VaultPlaintext::default();
        apply_import(preview.document, &mut target);
        assert_eq!(target.items, plaintext.items);
        assert_eq!(target.last_decay_date, plaintext.last_decay_date);
    }

    #[test]
    fn import_rejects_non_json() {
        let err = process_import("not json at all", &VaultPlaintext::default()).unwrap_err();
        assert!(matches!(err, VaultsError::ImportFormat { .. }));
    }

    #[test]
    fn import_rejects_missing_arrays() {
        let cases = [
            r#"{"meds": []}"#,
            r#"{"calendar": []}"#,
            r#"{"meds": "nope", "calendar": []}"#,
            r#"{"meds": [], "calendar": 7}"#,
        ];
        for case in cases {
            let err = process_import(case, &VaultPlaintext::default()).unwrap_err();
            assert!(matches!(err, VaultsError::ImportFormat { .. }), "case: {case}");
        }
    }

    #[test]
    fn import_accepts_legacy_date_string_formats() {
        let preview = process_import(
            r#"{"meds": [], "calendar": [], "lastDoseUpdate": "Sat Aug 30 2025"}"#,
            &VaultPlaintext::default(),
        )
        .unwrap();
        assert_eq!(preview.document.last_dose_update, NaiveDate::from_ymd_opt(2025, 8, 30));

        let preview = process_import(
            r#"{"meds": [], "calendar": [], "lastDoseUpdate": "2025-08-30"}"#,
            &VaultPlaintext::default(),
        )
        .unwrap();
        assert_eq!(preview.document.last_dose_update, NaiveDate::from_ymd_opt(2025, 8, 30));
    }

    #[test]
    fn unrecognizable_dose_update_degrades_to_none() {
        let preview = process_import(
            r#"{"meds": [], "calendar": [], "lastDoseUpdate": "sometime last week"}"#,
            &VaultPlaintext::default(),
        )
        .unwrap();
        assert!(preview.document.last_dose_update.is_none());
    }

    #[test]
    fn import_without_dose_update_keeps_current_decay_date() {
        let preview =
            process_import(r#"{"meds": [], "calendar": []}"#, &VaultPlaintext::default()).unwrap();

        let mut target = sample_plaintext();
        let before = target.last_decay_date;
        apply_import(preview.document, &mut target);
        assert_eq!(target.last_decay_date, before);
        assert!(target.items.is_empty());
    }

    #[test]
    fn export_uses_camel_case_keys() {
        let export = prepare_export(&sample_plaintext(), Utc::now()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&export.content).unwrap();
        assert!(value.get("exportDate").is_some());
        assert!(value.get("lastDoseUpdate").is_some());
        assert_eq!(value["meds"][0]["name"], "Aspirin");
    }
}
