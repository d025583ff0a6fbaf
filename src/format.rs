//! Display formatting for amounts, hours, names and dates

use chrono::NaiveDate;

/// Hours with two decimals (`7.5` → `"7.50"`)
pub fn hours(value: f64) -> String {
    format!("{:.2}", value)
}

/// Seconds as `"7h 30m"`
pub fn hours_minutes(seconds: i64) -> String {
    let sign = if seconds < 0 { "-" } else { "" };
    let seconds = seconds.unsigned_abs();
    format!("{}{}h {:02}m", sign, seconds / 3600, (seconds % 3600) / 60)
}

/// Currency amount with thousands separators (`-1234.5` → `"-$1,234.50"`)
pub fn money(value: f64, symbol: &str) -> String {
    let cents = (value * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    format!(
        "{}{}{}.{:02}",
        sign,
        symbol,
        group_thousands(cents / 100),
        cents % 100
    )
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Percentage with up to two decimals, trailing zeros dropped (`"12.5%"`)
pub fn percent(value: f64) -> String {
    let s = format!("{:.2}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    format!("{}%", s)
}

/// First and last name joined, skipping blanks
pub fn full_name(first: Option<&str>, last: Option<&str>) -> String {
    [first, last]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Date as `YYYY-MM-DD`, or `-` when absent
pub fn date(value: Option<NaiveDate>) -> String {
    value
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Optional text, or `-` when absent or blank
pub fn text(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => "-".to_string(),
    }
}
