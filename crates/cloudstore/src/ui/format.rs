//! Human-readable sizes and relative times.

use chrono::{DateTime, Utc};

const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];

/// Formats a byte count with two decimals in 1024-based units.
///
/// `0` renders as `0 B`; negative sizes keep their sign.
pub fn format_size(bytes: i64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }
    if bytes < 0 {
        return format!("-{}", format_size_abs(bytes.unsigned_abs()));
    }
    format_size_abs(bytes.unsigned_abs())
}

fn format_size_abs(bytes: u64) -> String {
    let mut exponent = 0;
    let mut scale = 1u64;
    while exponent + 1 < UNITS.len() && bytes / scale >= 1024 {
        scale *= 1024;
        exponent += 1;
    }
    format!("{:.2} {}", bytes as f64 / scale as f64, UNITS[exponent])
}

/// Formats a byte count in kibibytes, e.g. `2.00 KB`.
pub fn format_kib(bytes: i64) -> String {
    format!("{:.2} KB", bytes as f64 / 1024.0)
}

/// Describes how long ago `then` was, relative to `now`.
///
/// Future times read "in ...".
pub fn format_relative(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds();
    let distance = describe_distance(secs.unsigned_abs());
    if secs < 0 {
        format!("in {}", distance)
    } else {
        format!("{} ago", distance)
    }
}

fn plural(n: u64, unit: &str) -> String {
    if n == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", n, unit)
    }
}

fn rounded_div(n: u64, d: u64) -> u64 {
    (n + d / 2) / d
}

fn describe_distance(secs: u64) -> String {
    const MINUTE: u64 = 60;
    const HOUR: u64 = 60 * MINUTE;
    const DAY: u64 = 24 * HOUR;
    const MONTH: u64 = 30 * DAY;
    const YEAR: u64 = 365 * DAY;

    if secs < 30 {
        return "less than a minute".to_string();
    }

    let minutes = rounded_div(secs, MINUTE);
    if minutes < 45 {
        return plural(minutes, "minute");
    }
    if minutes < 90 {
        return "about 1 hour".to_string();
    }
    if secs < DAY {
        return format!("about {}", plural(rounded_div(secs, HOUR).min(23), "hour"));
    }
    if secs < 42 * HOUR {
        return "1 day".to_string();
    }
    if secs < MONTH {
        return plural(rounded_div(secs, DAY), "day");
    }
    if secs < 60 * DAY {
        return format!("about {}", plural(rounded_div(secs, MONTH), "month"));
    }
    if secs < YEAR {
        return plural(rounded_div(secs, MONTH).min(11), "month");
    }
    format!("about {}", plural(secs / YEAR, "year"))
}
