//! Daily consumption decay.
//!
//! A pure, deterministic function of `(items, last_decay_date, today)`.
//! The calendar-date equality check is the idempotence guard: unlocking the
//! same vault twice in one day must never double-deduct. The elapsed count
//! is a number of days, not a boolean, so a vault untouched for a week loses
//! a week's worth of doses in one catch-up pass.

use chrono::NaiveDate;
use mymeds_domain::dose::parse_dose;
use mymeds_domain::meds::MedicationItem;
use std::collections::BTreeMap;

/// What one decay pass changed.
#[derive(Debug, Clone, PartialEq)]
pub struct DecayOutcome {
    /// Items with counts after deduction. Unchanged when `updated` is false.
    pub items: Vec<MedicationItem>,
    /// The decay date to store: always `today` once a pass ran.
    pub new_decay_date: NaiveDate,
    /// Whether the document changed and needs persisting.
    pub updated: bool,
    /// Deducted amount per item name, only for nonzero deductions.
    ///
    /// Reports what actually left the stock, clamped by the available count,
    /// not the theoretical `dose * days`. An item that ran out mid-catch-up
    /// shows its remaining count here, so the numbers the user sees always
    /// add up against the before/after counts.
    pub deductions: BTreeMap<String, f64>,
}

/// Deducts the elapsed days' doses from every item.
///
/// Rules:
/// * `last_decay_date == today` is a no-op.
/// * `last_decay_date == None` starts the decay clock at `today` without
///   deducting anything.
/// * Once the dates differ, the elapsed day count is at least 1, even for a
///   reload straddling midnight.
/// * New counts floor at 0 and are rounded to 2 decimals to suppress
///   floating-point artifacts.
///
/// Malformed dose expressions parse to 0; this function never fails.
#[must_use]
pub fn apply_decay(
    items: &[MedicationItem],
    last_decay_date: Option<NaiveDate>,
    today: NaiveDate,
) -> DecayOutcome {
    let Some(last) = last_decay_date else {
        return DecayOutcome {
            items: items.to_vec(),
            new_decay_date: today,
            updated: true,
            deductions: BTreeMap::new(),
        };
    };

    if last == today {
        return DecayOutcome {
            items: items.to_vec(),
            new_decay_date: today,
            updated: false,
            deductions: BTreeMap::new(),
        };
    }

    let elapsed_days = (today - last).num_days().unsigned_abs().max(1);

    let mut deductions = BTreeMap::new();
    let items = items
        .iter()
        .map(|item| {
            let dose = parse_dose(&item.dose);
            #[allow(clippy::cast_precision_loss)]
            let deducted = dose * elapsed_days as f64;
            let new_count = round2((item.count - deducted).max(0.0));

            let actually_deducted = round2(item.count - new_count);
            if actually_deducted > 0.0 {
                deductions.insert(item.name.clone(), actually_deducted);
            }

            MedicationItem { count: new_count, ..item.clone() }
        })
        .collect();

    DecayOutcome { items, new_decay_date: today, updated: true, deductions }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn item(name: &str, count: f64, dose: &str) -> MedicationItem {
        MedicationItem {
            name: name.to_owned(),
            active_ingredient: None,
            count,
            package_size: None,
            dose: dose.to_owned(),
            color: None,
        }
    }

    #[test]
    fn same_day_is_a_noop() {
        let today = date(2026, 8, 30);
        let outcome = apply_decay(&[item("A", 10.0, "1")], Some(today), today);
        assert!(!outcome.updated);
        assert_eq!(outcome.items[0].count, 10.0);
        assert!(outcome.deductions.is_empty());
    }

    #[test]
    fn running_twice_deducts_once() {
        let items = vec![item("A", 10.0, "1")];
        let first = apply_decay(&items, Some(date(2026, 8, 29)), date(2026, 8, 30));
        assert!(first.updated);
        assert_eq!(first.items[0].count, 9.0);

        let second = apply_decay(&first.items, Some(first.new_decay_date), date(2026, 8, 30));
        assert!(!second.updated);
        assert_eq!(second.items[0].count, 9.0);
    }

    #[test]
    fn three_day_catch_up() {
        let outcome = apply_decay(&[item("A", 10.0, "1")], Some(date(2026, 8, 27)), date(2026, 8, 30));
        assert!(outcome.updated);
        assert_eq!(outcome.items[0].count, 7.0);
        assert_eq!(outcome.deductions["A"], 3.0);
    }

    #[test]
    fn count_floors_at_zero() {
        let outcome = apply_decay(&[item("A", 5.0, "2")], Some(date(2026, 8, 27)), date(2026, 8, 30));
        assert_eq!(outcome.items[0].count, 0.0);
        // Only what was actually available is reported as deducted.
        assert_eq!(outcome.deductions["A"], 5.0);
    }

    #[test]
    fn schedule_expression_sums_slots() {
        let outcome = apply_decay(&[item("A", 10.0, "1-0-1")], Some(date(2026, 8, 29)), date(2026, 8, 30));
        assert_eq!(outcome.items[0].count, 8.0);
    }

    #[test]
    fn fractional_doses_round_to_two_decimals() {
        let outcome =
            apply_decay(&[item("A", 1.0, "1/3")], Some(date(2026, 8, 29)), date(2026, 8, 30));
        assert_eq!(outcome.items[0].count, 0.67);
    }

    #[test]
    fn zero_dose_items_are_untouched_and_unreported() {
        let outcome = apply_decay(
            &[item("A", 10.0, ""), item("B", 10.0, "garbage")],
            Some(date(2026, 8, 27)),
            date(2026, 8, 30),
        );
        assert!(outcome.updated);
        assert_eq!(outcome.items[0].count, 10.0);
        assert_eq!(outcome.items[1].count, 10.0);
        assert!(outcome.deductions.is_empty());
    }

    #[test]
    fn clock_rollback_deducts_absolute_day_span() {
        // The stored date is in the future relative to "today": the day
        // count is the absolute difference, never negative.
        let outcome = apply_decay(&[item("A", 10.0, "1")], Some(date(2026, 9, 1)), date(2026, 8, 30));
        assert!(outcome.updated);
        assert_eq!(outcome.items[0].count, 8.0);
        assert_eq!(outcome.new_decay_date, date(2026, 8, 30));
    }

    #[test]
    fn missing_decay_date_initializes_without_deducting() {
        let today = date(2026, 8, 30);
        let outcome = apply_decay(&[item("A", 10.0, "1")], None, today);
        assert!(outcome.updated);
        assert_eq!(outcome.new_decay_date, today);
        assert_eq!(outcome.items[0].count, 10.0);
    }
}
