use std::sync::OnceLock;

use regex::Regex;

/// Scan pattern for `<int> / <int> / <int>` with optional whitespace
/// around each slash. Anything after the third field is ignored.
fn date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\s*(\d+)\s*/\s*(\d+)\s*/\s*(\d+)").unwrap())
}

/// Extract the day, month and year fields from a candidate date string.
/// Exactly three integer fields must be found for the scan to succeed;
/// fields too large for `i64` are treated as not found.
pub fn scan_date(text: &str) -> Option<(i64, i64, i64)> {
    let caps = date_pattern().captures(text)?;
    let day = caps[1].parse().ok()?;
    let month = caps[2].parse().ok()?;
    let year = caps[3].parse().ok()?;
    Some((day, month, year))
}

/// Gregorian leap year rule, including the century exceptions.
pub fn is_leap_year(year: i64) -> bool {
    year % 400 == 0 || (year % 100 != 0 && year % 4 == 0)
}

const DAYS_IN_MONTH: [i64; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// True if `text` scans as day/month/year and denotes a real calendar date.
pub fn is_valid_date(text: &str) -> bool {
    let Some((day, month, year)) = scan_date(text) else {
        return false;
    };

    if year < 1 {
        return false;
    }

    if !(1..=12).contains(&month) {
        return false;
    }

    if day < 1 {
        return false;
    }

    let max_day = if month == 2 && is_leap_year(year) {
        29
    } else {
        DAYS_IN_MONTH[(month - 1) as usize]
    };

    day <= max_day
}

/// Re-render a valid date as `day/month/year` with no zero padding and no
/// inner spaces. This is the only form ever stored. Returns `None` if the
/// input is not a valid date.
pub fn canonicalize(text: &str) -> Option<String> {
    if !is_valid_date(text) {
        return None;
    }
    let (day, month, year) = scan_date(text)?;
    Some(format!("{}/{}/{}", day, month, year))
}
