//! # Domain Models
//!
//! Pure data types shared across the MyMeds crates, plus the small pure
//! helpers that operate on them (dose notation parsing, stock status).
//! Keep it lean: no I/O, no crypto, no storage — just data.
//!
//! Serde output uses `camelCase` field names so exported documents match
//! the established MyMeds JSON file format.

pub mod calendar;
pub mod dose;
pub mod meds;
pub mod settings;

pub mod plaintext;

pub use calendar::{CalendarEntry, EntryKind};
pub use meds::{MedicationItem, StockStatus};
pub use plaintext::VaultPlaintext;
pub use settings::{AppSettings, DisplayMode, SortMode, Theme, UiScale};
