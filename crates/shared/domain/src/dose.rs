//! Daily-dose notation parsing.
//!
//! A dose expression is either a single numeric token or a dash-joined
//! intake schedule whose slots are summed:
//!
//! - `"2"` — two units per day
//! - `"1,5"` / `"1.5"` — decimal comma and decimal point both accepted
//! - `"1/2"` — fractions
//! - `"1-0-1-0"` — morning/noon/evening/night schedule, here 2 per day
//!
//! Parsing never fails: malformed tokens contribute a dose of 0 so a typo
//! in one medication can never block unlocking a vault.

/// Parses a dose expression into the effective units consumed per day.
#[must_use]
pub fn parse_dose(expr: &str) -> f64 {
    let expr = expr.trim();
    if expr.is_empty() {
        return 0.0;
    }

    if expr.contains('-') {
        return expr.split('-').map(|slot| parse_slot(slot.trim())).sum();
    }

    parse_slot(expr)
}

/// Parses a single numeric token: decimal (point or comma) or `a/b` fraction.
fn parse_slot(token: &str) -> f64 {
    if token.is_empty() {
        return 0.0;
    }

    if let Some((numerator, denominator)) = token.split_once('/') {
        let n: f64 = numerator.trim().parse().unwrap_or(0.0);
        let d: f64 = denominator.trim().parse().unwrap_or(0.0);
        let value = n / d;
        // Division by zero yields a non-finite value, treat it as no dose.
        return if value.is_finite() { value } else { 0.0 };
    }

    token.replace(',', ".").parse().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_integers() {
        assert_eq!(parse_dose("1"), 1.0);
        assert_eq!(parse_dose("2"), 2.0);
    }

    #[test]
    fn parses_decimals_with_point_and_comma() {
        assert_eq!(parse_dose("0.5"), 0.5);
        assert_eq!(parse_dose("1.5"), 1.5);
        assert_eq!(parse_dose("1,5"), 1.5);
    }

    #[test]
    fn parses_fractions() {
        assert_eq!(parse_dose("1/2"), 0.5);
        assert_eq!(parse_dose("1/4"), 0.25);
        assert_eq!(parse_dose("3/4"), 0.75);
    }

    #[test]
    fn sums_schedules() {
        assert_eq!(parse_dose("1-0-1"), 2.0);
        assert_eq!(parse_dose("1-0-0-1"), 2.0);
        assert_eq!(parse_dose("0.5-0-0.5"), 1.0);
        assert_eq!(parse_dose("1/2-0-1/2"), 1.0);
    }

    #[test]
    fn malformed_input_is_zero() {
        assert_eq!(parse_dose(""), 0.0);
        assert_eq!(parse_dose("   "), 0.0);
        assert_eq!(parse_dose("abc"), 0.0);
        assert_eq!(parse_dose("1/0"), 0.0);
        assert_eq!(parse_dose("x-y-z"), 0.0);
    }

    #[test]
    fn schedule_with_partial_garbage_keeps_valid_slots() {
        assert_eq!(parse_dose("1-x-1"), 2.0);
    }
}
