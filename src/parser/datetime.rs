//! Date and time recognition for the `일시` line.
//!
//! Only reformats what is written; nothing here consults the clock.

use std::sync::LazyLock;

use regex::Regex;

static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{4})-(\d{2})-(\d{2})").expect("valid iso date regex"));

static SLASH_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{1,2})/(\d{1,2})/(\d{4})").expect("valid slash date regex")
});

static KOREAN_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{4})년\s*(\d{1,2})월\s*(\d{1,2})일").expect("valid korean date regex")
});

static TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d{1,2}:\d{2}|\d{1,2}시(?:[ \t]*\d{1,2}분)?").expect("valid time regex")
});

/// Extracts a `YYYY-MM-DD` date from free text.
///
/// Patterns are tried in priority order: ISO, `MM/DD/YYYY`, then
/// `YYYY년 M월 D일`. A slash date whose first field cannot be a month but whose
/// second can is read as `DD/MM/YYYY`, the usual European order. A month or
/// day out of range makes the date unrecognized.
pub fn extract_date(text: &str) -> Option<String> {
    if let Some(caps) = ISO_DATE.captures(text) {
        return Some(format!("{}-{}-{}", &caps[1], &caps[2], &caps[3]));
    }
    if let Some(caps) = SLASH_DATE.captures(text) {
        let first: u32 = caps[1].parse().ok()?;
        let second: u32 = caps[2].parse().ok()?;
        let (month, day) = if first > 12 && second <= 12 {
            (second, first)
        } else {
            (first, second)
        };
        return calendar_date(&caps[3], month, day);
    }
    if let Some(caps) = KOREAN_DATE.captures(text) {
        let month: u32 = caps[2].parse().ok()?;
        let day: u32 = caps[3].parse().ok()?;
        return calendar_date(&caps[1], month, day);
    }
    None
}

fn calendar_date(year: &str, month: u32, day: u32) -> Option<String> {
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }
    Some(format!("{year}-{month:02}-{day:02}"))
}

/// Extracts the first `H:MM` or `N시` time mention.
pub fn extract_time(text: &str) -> Option<String> {
    TIME.find(text).map(|m| m.as_str().to_string())
}
