//! Unencrypted application settings.
//!
//! Settings live outside any vault: they exist before the first vault is
//! created and survive vault deletion. The serialized names double as the
//! keys of the flat settings store.

use serde::{Deserialize, Serialize};

/// Default stock-warning limit (days) for the yellow level.
pub const DEFAULT_YELLOW_LIMIT: u16 = 21;
/// Default stock-warning limit (days) for the red level.
pub const DEFAULT_RED_LIMIT: u16 = 7;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UiScale {
    Small,
    #[default]
    Normal,
    Large,
}

/// Order of the medication list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Insertion order.
    #[default]
    Added,
    /// Alphabetical by name.
    Name,
    /// Lowest remaining stock first.
    Stock,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Pills,
    Table,
}

/// All user-facing preferences, with the documented defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub locale: String,
    pub theme: Theme,
    pub ui_scale: UiScale,
    pub sort_mode: SortMode,
    pub display_mode: DisplayMode,
    /// Days of remaining stock below which an item is flagged yellow.
    pub yellow_limit: u16,
    /// Days of remaining stock below which an item is flagged red.
    pub red_limit: u16,
    pub show_overview: bool,
    pub last_version: Option<String>,
    pub first_run_completed: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            locale: default_locale(),
            theme: Theme::default(),
            ui_scale: UiScale::default(),
            sort_mode: SortMode::default(),
            display_mode: DisplayMode::default(),
            yellow_limit: DEFAULT_YELLOW_LIMIT,
            red_limit: DEFAULT_RED_LIMIT,
            show_overview: true,
            last_version: None,
            first_run_completed: false,
        }
    }
}

/// Picks the startup locale from the platform language: German environments
/// get `de`, everything else falls back to `en`.
#[must_use]
pub fn default_locale() -> String {
    let platform = std::env::var("LC_ALL")
        .or_else(|_| std::env::var("LC_MESSAGES"))
        .or_else(|_| std::env::var("LANG"))
        .unwrap_or_default();

    if platform.to_lowercase().starts_with("de") { "de".to_owned() } else { "en".to_owned() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let settings = AppSettings::default();
        assert_eq!(settings.theme, Theme::Light);
        assert_eq!(settings.ui_scale, UiScale::Normal);
        assert_eq!(settings.sort_mode, SortMode::Added);
        assert_eq!(settings.display_mode, DisplayMode::Pills);
        assert_eq!(settings.yellow_limit, 21);
        assert_eq!(settings.red_limit, 7);
        assert!(settings.show_overview);
        assert!(!settings.first_run_completed);
    }

    #[test]
    fn settings_round_trip_through_camel_case_json() {
        let settings = AppSettings { yellow_limit: 30, ..AppSettings::default() };
        let json = serde_json::to_value(&settings).unwrap();
        assert_eq!(json["yellowLimit"], 30);
        assert_eq!(json["displayMode"], "pills");

        let restored: AppSettings = serde_json::from_value(json).unwrap();
        assert_eq!(restored, settings);
    }
}
