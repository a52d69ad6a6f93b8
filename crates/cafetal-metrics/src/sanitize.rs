//! Numeric sanitization
//!
//! Every value that reaches a chart or KPI card passes through one of these
//! functions. None of them fail: malformed input degrades to a default.

use serde_json::Value;

/// Coerce a JSON scalar to a finite number
///
/// Numbers pass through, numeric strings are parsed, booleans map to 1/0.
/// Blank strings, null and containers have no numeric value.
#[must_use]
pub fn coerce_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    };
    n.filter(|n| n.is_finite())
}

/// Finite number or `default`
#[inline]
#[must_use]
pub fn to_finite(value: Option<&Value>, default: f64) -> f64 {
    value.and_then(coerce_number).unwrap_or(default)
}

/// `value` when finite and non-negative, otherwise `default`
#[inline]
#[must_use]
pub fn to_non_negative_number(value: f64, default: f64) -> f64 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        default
    }
}

/// Magnitude from an optional JSON value, defaulting to 0
#[inline]
#[must_use]
pub fn non_negative(value: Option<&Value>) -> f64 {
    value
        .and_then(coerce_number)
        .map_or(0.0, |n| to_non_negative_number(n, 0.0))
}

/// Clamp a rate into `[0, 100]`; non-finite input becomes 0
#[inline]
#[must_use]
pub fn clamp_pct(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// Rate from an optional JSON value
#[inline]
#[must_use]
pub fn pct(value: Option<&Value>) -> f64 {
    clamp_pct(to_finite(value, 0.0))
}

/// Reconstruct the previous-period value from a current value and its delta
///
/// `delta_pct` is `(C - P) / P * 100`, so `P = C / (1 + delta_pct / 100)`.
/// Deltas at or below -100% (or non-finite) leave `P` unknown, reported as 0.
#[must_use]
pub fn previous_period(current: f64, delta_pct: f64) -> f64 {
    if !delta_pct.is_finite() || delta_pct <= -100.0 {
        return 0.0;
    }
    let previous = current / (1.0 + delta_pct / 100.0);
    to_non_negative_number(previous, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn non_negative_number_contract() {
        assert_eq!(to_non_negative_number(-5.0, 0.0), 0.0);
        assert_eq!(to_non_negative_number(f64::NAN, 0.0), 0.0);
        assert_eq!(to_non_negative_number(f64::INFINITY, 7.0), 7.0);
        assert_eq!(to_non_negative_number(42.0, 0.0), 42.0);
        assert_eq!(to_non_negative_number(0.0, 9.0), 0.0);
    }

    #[test]
    fn clamp_pct_contract() {
        assert_eq!(clamp_pct(150.0), 100.0);
        assert_eq!(clamp_pct(-10.0), 0.0);
        assert_eq!(clamp_pct(73.4), 73.4);
        assert_eq!(clamp_pct(f64::NAN), 0.0);
    }

    #[test]
    fn previous_period_reconstruction() {
        assert_eq!(previous_period(1000.0, 25.0), 800.0);
        assert_eq!(previous_period(1000.0, -150.0), 0.0);
        assert_eq!(previous_period(1000.0, -100.0), 0.0);
        assert_eq!(previous_period(1000.0, f64::NAN), 0.0);
        assert_eq!(previous_period(1000.0, 0.0), 1000.0);
        assert_eq!(previous_period(0.0, 50.0), 0.0);
    }

    #[test]
    fn coerce_handles_drifting_types() {
        assert_eq!(coerce_number(&json!(12)), Some(12.0));
        assert_eq!(coerce_number(&json!("12.5")), Some(12.5));
        assert_eq!(coerce_number(&json!(" 3 ")), Some(3.0));
        assert_eq!(coerce_number(&json!(true)), Some(1.0));
        assert_eq!(coerce_number(&json!("")), None);
        assert_eq!(coerce_number(&json!("abc")), None);
        assert_eq!(coerce_number(&json!("NaN")), None);
        assert_eq!(coerce_number(&json!("inf")), None);
        assert_eq!(coerce_number(&Value::Null), None);
        assert_eq!(coerce_number(&json!([1])), None);
    }

    #[test]
    fn value_helpers() {
        assert_eq!(non_negative(Some(&json!(-3))), 0.0);
        assert_eq!(non_negative(Some(&json!("8"))), 8.0);
        assert_eq!(non_negative(None), 0.0);
        assert_eq!(pct(Some(&json!(120))), 100.0);
        assert_eq!(pct(Some(&json!("x"))), 0.0);
        assert_eq!(to_finite(Some(&json!(-4.5)), 0.0), -4.5);
    }
}
