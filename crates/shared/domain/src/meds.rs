use crate::dose::parse_dose;
use serde::{Deserialize, Serialize};

/// One tracked medication inside a vault.
///
/// `count` is the remaining stock in units (tablets, drops, ...) and may be
/// fractional. `dose` holds the daily-dose expression described in
/// [`crate::dose`]; it is kept as the user typed it and parsed on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicationItem {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_ingredient: Option<String>,
    pub count: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_size: Option<f64>,
    #[serde(default)]
    pub dose: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl MedicationItem {
    /// Whole days of stock left at the current daily dose.
    ///
    /// Returns `None` when the item has no effective dose (stock never
    /// depletes, so "days remaining" is meaningless).
    #[must_use]
    pub fn days_remaining(&self) -> Option<i64> {
        let dose = parse_dose(&self.dose);
        if dose <= 0.0 {
            return None;
        }
        #[allow(clippy::cast_possible_truncation)]
        Some((self.count / dose).floor() as i64)
    }

    /// Classifies the remaining stock against the configured warning limits
    /// (days until the supply runs out).
    #[must_use]
    pub fn stock_status(&self, yellow_limit: u16, red_limit: u16) -> StockStatus {
        match self.days_remaining() {
            None => StockStatus::Ok,
            Some(days) if days <= i64::from(red_limit) => StockStatus::Red,
            Some(days) if days <= i64::from(yellow_limit) => StockStatus::Yellow,
            Some(_) => StockStatus::Ok,
        }
    }
}

/// Traffic-light stock level derived from the warning limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockStatus {
    Ok,
    Yellow,
    Red,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(count: f64, dose: &str) -> MedicationItem {
        MedicationItem {
            name: "Aspirin".to_owned(),
            active_ingredient: None,
            count,
            package_size: None,
            dose: dose.to_owned(),
            color: None,
        }
    }

    #[test]
    fn days_remaining_floors_partial_days() {
        assert_eq!(item(10.0, "1").days_remaining(), Some(10));
        assert_eq!(item(10.0, "3").days_remaining(), Some(3));
        assert_eq!(item(1.0, "1-0-1").days_remaining(), Some(0));
    }

    #[test]
    fn no_dose_means_no_depletion() {
        assert_eq!(item(10.0, "").days_remaining(), None);
        assert_eq!(item(10.0, "0").days_remaining(), None);
    }

    #[test]
    fn stock_status_respects_limits() {
        assert_eq!(item(100.0, "1").stock_status(21, 7), StockStatus::Ok);
        assert_eq!(item(20.0, "1").stock_status(21, 7), StockStatus::Yellow);
        assert_eq!(item(7.0, "1").stock_status(21, 7), StockStatus::Red);
        assert_eq!(item(10.0, "").stock_status(21, 7), StockStatus::Ok);
    }

    #[test]
    fn serializes_with_camel_case_names() {
        let json = serde_json::to_value(item(3.0, "1-0-1")).unwrap();
        assert_eq!(json["name"], "Aspirin");
        assert_eq!(json["count"], 3.0);
        assert_eq!(json["dose"], "1-0-1");
        assert!(json.get("activeIngredient").is_none());
    }
}
