//! Date and Duration Formatting
//!
//! Renders backend unix timestamps and durations the way the console tables
//! display them.

use chrono::{DateTime, Datelike, Timelike, Utc};

const SECONDS_IN_DAY: i64 = 60 * 60 * 24;

/// Format a unix timestamp (seconds) with the console's format tokens.
///
/// Supported tokens: `dd`, `MM`, `yyyy`, `h` (24h hours), `mm`, `ss`.
/// Each token is replaced once. Returns an empty string for timestamps
/// chrono cannot represent.
pub fn format_timestamp(ts: i64, fmt: &str) -> String {
    let Some(dt) = DateTime::<Utc>::from_timestamp(ts, 0) else {
        tracing::debug!("[Datetime] Unrepresentable timestamp: {}", ts);
        return String::new();
    };

    fmt.replacen("dd", &format!("{:02}", dt.day()), 1)
        .replacen("MM", &format!("{:02}", dt.month()), 1)
        .replacen("yyyy", &dt.year().to_string(), 1)
        .replacen('h', &format!("{:02}", dt.hour()), 1)
        .replacen("mm", &format!("{:02}", dt.minute()), 1)
        .replacen("ss", &format!("{:02}", dt.second()), 1)
}

/// Format a duration as `N Day(s) HH:MM:SS`, or `N/A` below one second.
pub fn format_seconds(seconds: i64) -> String {
    if seconds < 1 {
        return "N/A".to_string();
    }

    let mut formatted = String::new();
    let mut remaining = seconds;
    if remaining >= SECONDS_IN_DAY {
        let days = remaining / SECONDS_IN_DAY;
        let label = if days == 1 { "Day" } else { "Days" };
        formatted.push_str(&format!("{} {} ", days, label));
        remaining -= days * SECONDS_IN_DAY;
    }

    formatted.push_str(&format!(
        "{:02}:{:02}:{:02}",
        remaining / 3600,
        (remaining % 3600) / 60,
        remaining % 60
    ));
    formatted
}
