//! Date normalization and age calculation.
//!
//! Case files mix ISO dates, slash and kanji separated dates, and era dates
//! such as `令和5年4月1日`. Everything is normalized to `YYYY-MM-DD`; text that
//! matches no known form normalizes to an empty string rather than failing.

mod era;

pub use era::*;

use chrono::{Datelike, Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

const ISO_FORMAT: &str = "%Y-%m-%d";

static ISO_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").unwrap());
static ERA_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(令和|平成|昭和|大正|明治)\s*([0-9]+|元)\s*年?[\s\-/.]*([0-9]+)\s*月?[\s\-/.]*([0-9]+)\s*日?")
        .unwrap()
});
static SLASH_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]{4})\s*/\s*([0-9]{1,2})\s*/\s*([0-9]{1,2})").unwrap());
static KANJI_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]{4})年\s*([0-9]{1,2})月\s*([0-9]{1,2})日?").unwrap());
static HYPHEN_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]{4})\s*-\s*([0-9]{1,2})\s*-\s*([0-9]{1,2})").unwrap());

/// Normalize a date string to `YYYY-MM-DD`.
///
/// Forms are tried in a fixed order and the first match wins:
/// ISO, era, slash separated, kanji separated, loose hyphen separated.
/// Returns an empty string when nothing matches.
pub fn normalize(text: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        return String::new();
    }

    if ISO_DATE.is_match(text) {
        return text.to_string();
    }

    // An era date that cannot be converted is not retried as a Gregorian one
    if let Some(caps) = ERA_DATE.captures(text) {
        return era_date(&caps).unwrap_or_default();
    }

    [&SLASH_DATE, &KANJI_DATE, &HYPHEN_DATE]
        .into_iter()
        .find_map(|pattern| pattern.captures(text).and_then(|caps| gregorian_date(&caps)))
        .unwrap_or_default()
}

fn era_date(caps: &Captures<'_>) -> Option<String> {
    let era = Era::from_name(&caps[1])?;
    // 元年 is the first year of an era
    let era_year = match &caps[2] {
        "元" => 1,
        digits => digits.parse().ok()?,
    };
    let month: u32 = caps[3].parse().ok()?;
    let day: u32 = caps[4].parse().ok()?;
    let year = era.to_gregorian(era_year).filter(|y| (0..=9999).contains(y))?;
    Some(format_ymd(year, month, day))
}

fn gregorian_date(caps: &Captures<'_>) -> Option<String> {
    let year: i32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let day: u32 = caps[3].parse().ok()?;
    Some(format_ymd(year, month, day))
}

fn format_ymd(year: i32, month: u32, day: u32) -> String {
    format!("{:04}-{:02}-{:02}", year, month, day)
}

/// Normalize and parse into a real calendar date.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let normalized = normalize(text);
    if normalized.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(&normalized, ISO_FORMAT).ok()
}

/// Check that a date string normalizes to a real calendar date.
pub fn is_valid(text: &str) -> bool {
    parse_date(text).is_some()
}

/// Today's date in local time.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Age in whole years as of today.
pub fn calculate_age(birth_date: &str) -> i32 {
    calculate_age_on(birth_date, today())
}

/// Age in whole years as of `reference`.
///
/// Returns 0 for an empty or unparseable ISO birth date.
pub fn calculate_age_on(birth_date: &str, reference: NaiveDate) -> i32 {
    let Ok(birth) = NaiveDate::parse_from_str(birth_date.trim(), ISO_FORMAT) else {
        return 0;
    };

    let mut age = reference.year() - birth.year();
    if (reference.month(), reference.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_iso_passthrough() {
        for date in ["2021-04-15", "1999-12-31", "2024-02-29"] {
            assert_eq!(normalize(date), date);
        }
    }

    #[test]
    fn test_era_dates_at_boundaries() {
        assert_eq!(normalize("令和元年5月1日"), "2019-05-01");
        assert_eq!(normalize("平成31年4月30日"), "2019-04-30");
        assert_eq!(normalize("昭和64年1月7日"), "1989-01-07");
        assert_eq!(normalize("大正15年12月25日"), "1926-12-25");
        assert_eq!(normalize("明治45年7月30日"), "1912-07-30");
    }

    #[test]
    fn test_era_year_out_of_range_is_empty() {
        assert_eq!(normalize("令和2147483647年1月1日"), "");
        assert_eq!(normalize("令和99999999999年4月1日"), "");
        assert_eq!(normalize("平成99999年4月1日"), "");
        assert!(!is_valid("令和2147483647年1月1日"));
    }

    #[test]
    fn test_era_date_with_separators() {
        assert_eq!(normalize("令和5-4-1"), "2023-04-01");
        assert_eq!(normalize("平成25年12月31日"), "2013-12-31");
    }

    #[test]
    fn test_separated_forms() {
        assert_eq!(normalize("2023/4/1"), "2023-04-01");
        assert_eq!(normalize("2021/04/15"), "2021-04-15");
        assert_eq!(normalize("2021年4月15日"), "2021-04-15");
        assert_eq!(normalize("2023-4-1"), "2023-04-01");
        assert_eq!(normalize(" 2023 - 4 - 1 "), "2023-04-01");
    }

    #[test]
    fn test_unparseable_is_empty() {
        assert_eq!(normalize("invalid"), "");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("令和"), "");
        assert_eq!(normalize("April 1st"), "");
    }

    #[test]
    fn test_is_valid() {
        assert!(is_valid("2023-04-01"));
        assert!(is_valid("令和5年4月1日"));
        assert!(is_valid("2023/4/1"));
        assert!(!is_valid("invalid"));
        // Matches a pattern but is not a calendar date
        assert!(!is_valid("2023/2/30"));
        assert!(!is_valid("2023-13-01"));
    }

    #[test]
    fn test_calculate_age_birthday_boundary() {
        let birth = "2000-04-15";
        assert_eq!(calculate_age_on(birth, ymd(2025, 4, 14)), 24);
        assert_eq!(calculate_age_on(birth, ymd(2025, 4, 15)), 25);
    }

    #[test]
    fn test_calculate_age_monotonic() {
        let birth = "1955-03-15";
        let mut reference = ymd(2020, 1, 1);
        let mut previous = calculate_age_on(birth, reference);
        for _ in 0..800 {
            reference = reference.succ_opt().unwrap();
            let age = calculate_age_on(birth, reference);
            assert!(age >= previous);
            previous = age;
        }
    }

    #[test]
    fn test_calculate_age_invalid_birth() {
        assert_eq!(calculate_age_on("", ymd(2025, 1, 1)), 0);
        assert_eq!(calculate_age_on("not a date", ymd(2025, 1, 1)), 0);
        assert!(calculate_age("2000-01-01") >= 25);
    }
}
