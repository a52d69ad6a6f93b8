//! Display formatting for money, rates, quantities, months and timestamps

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const SHORT_MONTHS: [&str; 12] = [
    "Ene.", "Feb.", "Mar.", "Abr.", "May.", "Jun.", "Jul.", "Ago.", "Set.", "Oct.", "Nov.", "Dic.",
];

/// Placeholder for a missing value
pub const EMPTY: &str = "—";

fn group_thousands(mut n: u64) -> String {
    let mut groups = Vec::new();
    loop {
        if n < 1000 {
            groups.push(n.to_string());
            break;
        }
        groups.push(format!("{:03}", n % 1000));
        n /= 1000;
    }
    groups.reverse();
    groups.join(",")
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn split_fixed(value: f64, scale: f64) -> (u64, u64) {
    let scaled = (value.abs() * scale).round();
    ((scaled / scale).trunc() as u64, (scaled % scale) as u64)
}

/// Peruvian soles, `S/ 1,234.50`
#[must_use]
pub fn format_money(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let (whole, cents) = split_fixed(value, 100.0);
    let sign = if value < 0.0 && (whole > 0 || cents > 0) {
        "-"
    } else {
        ""
    };
    format!("{sign}S/ {}.{cents:02}", group_thousands(whole))
}

/// One decimal and a percent sign
#[must_use]
pub fn format_pct(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    format!("{value:.1}%")
}

/// Grouped quantity with up to three decimals
#[must_use]
pub fn format_quantity(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let (whole, milli) = split_fixed(value, 1000.0);
    let sign = if value < 0.0 && (whole > 0 || milli > 0) {
        "-"
    } else {
        ""
    };
    if milli == 0 {
        format!("{sign}{}", group_thousands(whole))
    } else {
        let fraction = format!("{milli:03}");
        format!(
            "{sign}{}.{}",
            group_thousands(whole),
            fraction.trim_end_matches('0')
        )
    }
}

/// Short Spanish month label for a `YYYY-MM` string
///
/// Month 0 or an unparseable month maps to January; an out-of-range month
/// leaves the input as is.
#[must_use]
pub fn short_month_label(ym: &str) -> String {
    if ym.is_empty() {
        return EMPTY.to_string();
    }
    if ym.chars().count() < 7 {
        return ym.to_string();
    }
    let month = ym
        .get(5..7)
        .and_then(|m| m.trim().parse::<i64>().ok())
        .unwrap_or(0);
    let month = if month == 0 { 1 } else { month };
    usize::try_from(month - 1)
        .ok()
        .and_then(|i| SHORT_MONTHS.get(i))
        .map_or_else(|| ym.to_string(), |m| (*m).to_string())
}

/// Parse a backend timestamp, falling back to `now`
#[must_use]
pub fn safe_timestamp(raw: Option<&str>, now: DateTime<Utc>) -> DateTime<Utc> {
    let Some(s) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return now;
    };
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return dt.with_timezone(&Utc);
    }
    for pattern in [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, pattern) {
            return naive.and_utc();
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map_or(now, |naive| naive.and_utc())
}

/// First ten characters of a date-like string, `-` when absent
#[must_use]
pub fn date_prefix(raw: Option<&str>) -> String {
    match raw {
        Some(s) if !s.is_empty() => s.chars().take(10).collect(),
        _ => "-".to_string(),
    }
}
