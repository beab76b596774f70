use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The category of a calendar entry.
///
/// Categories only drive presentation and which optional fields are
/// meaningful; nothing couples an entry to a medication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Doctor,
    Vaccination,
    Illness,
    Note,
}

/// One entry in a vault's personal health calendar.
///
/// The optional fields belong to specific [`EntryKind`]s (doctor type and
/// location for appointments, method for vaccinations, end date for
/// illnesses) but are not enforced structurally — absent fields are simply
/// omitted from the serialized document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEntry {
    pub date: NaiveDate,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vaccination_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
