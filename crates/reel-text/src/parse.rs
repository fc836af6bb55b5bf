//! Release-date and running-time parsing for scraped text.
//!
//! Scraped pages format these fields every way imaginable. Anything we cannot
//! read is an `Err`; callers degrade it to "unknown" rather than rejecting the
//! film.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ─── Release dates ───────────────────────────────────────────────────────────

/// How much of a release date the source actually gave us.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatePrecision {
  Day,
  Month,
  Year,
}

/// A release date, resolved to the last day of its period when the source only
/// gave a month or a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseDate {
  pub date:      NaiveDate,
  pub precision: DatePrecision,
}

impl ReleaseDate {
  pub fn day(date: NaiveDate) -> Self {
    Self { date, precision: DatePrecision::Day }
  }

  /// December 31st of `year`.
  pub fn year(year: i32) -> Option<Self> {
    NaiveDate::from_ymd_opt(year, 12, 31)
      .map(|date| Self { date, precision: DatePrecision::Year })
  }

  /// Last day of `month` in `year`.
  pub fn month(year: i32, month: u32) -> Option<Self> {
    let next = if month == 12 {
      NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
      NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    next
      .filter(|_| (1..=12).contains(&month))
      .and_then(|d| d.pred_opt())
      .map(|date| Self { date, precision: DatePrecision::Month })
  }

  pub fn year_number(&self) -> i32 { self.date.year() }
}

const DAY_FORMATS: [&str; 10] = [
  "%Y-%m-%d",
  "%Y/%m/%d",
  "%Y.%m.%d",
  "%d/%m/%Y",
  "%d.%m.%Y",
  "%B %d, %Y",
  "%B %d %Y",
  "%d %B %Y",
  "%d %B, %Y",
  "%b. %d, %Y",
];

static YEAR_ONLY: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^\(?(\d{4})\)?$").expect("year regex"));

static YEAR_MONTH: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^(\d{4})[-/.](\d{1,2})$").expect("year-month regex")
});

/// Parse a release date as scraped from a film page.
pub fn parse_release_date(text: &str) -> Result<ReleaseDate> {
  let trimmed = text.trim().trim_end_matches('.');
  let collapsed = trimmed.split_whitespace().collect::<Vec<_>>().join(" ");

  if let Some(caps) = YEAR_ONLY.captures(&collapsed)
    && let Ok(year) = caps[1].parse::<i32>()
    && let Some(date) = ReleaseDate::year(year)
  {
    return Ok(date);
  }

  if let Some(caps) = YEAR_MONTH.captures(&collapsed)
    && let (Ok(year), Ok(month)) = (caps[1].parse::<i32>(), caps[2].parse::<u32>())
    && let Some(date) = ReleaseDate::month(year, month)
  {
    return Ok(date);
  }

  DAY_FORMATS
    .iter()
    .find_map(|fmt| NaiveDate::parse_from_str(&collapsed, fmt).ok())
    .map(ReleaseDate::day)
    .ok_or_else(|| Error::InvalidDate(text.to_string()))
}

// ─── Running time ────────────────────────────────────────────────────────────

/// `1:30:00`: hours, minutes, seconds.
static HMS: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^(\d{1,2}):(\d{2}):(\d{2})$").expect("h:m:s regex")
});

/// `90:12`: minutes and seconds.
static MS: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^(\d{1,3}):(\d{2})$").expect("m:s regex"));

/// `90`, `90 min`, `90 mins.`, `90 minutes`.
static MINUTES: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?i)^(\d{1,4})\s*(?:m|min|mins|minutes?)?\.?$")
    .expect("minutes regex")
});

/// `1h 30m`, `1 hr 30 mins`, `2 hours`.
static HOURS_MINUTES: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(
    r"(?i)^(\d{1,2})\s*(?:h|hr|hrs|hours?)\.?(?:\s*(\d{1,2})\s*(?:m|min|mins|minutes?)?\.?)?$",
  )
  .expect("hours regex")
});

/// Parse a running time into whole minutes, rounding seconds to the nearest
/// minute.
pub fn parse_duration_minutes(text: &str) -> Result<u32> {
  let s = text.trim();
  let invalid = || Error::InvalidDuration(text.to_string());
  let num = |m: Option<regex::Match<'_>>| -> Result<u32> {
    m.map_or(Ok(0), |m| m.as_str().parse::<u32>().map_err(|_| invalid()))
  };

  if let Some(caps) = HMS.captures(s) {
    let (h, m, sec) = (num(caps.get(1))?, num(caps.get(2))?, num(caps.get(3))?);
    return Ok(h * 60 + m + u32::from(sec >= 30));
  }
  if let Some(caps) = MS.captures(s) {
    let (m, sec) = (num(caps.get(1))?, num(caps.get(2))?);
    return Ok(m + u32::from(sec >= 30));
  }
  if let Some(caps) = MINUTES.captures(s) {
    return num(caps.get(1));
  }
  if let Some(caps) = HOURS_MINUTES.captures(s) {
    return Ok(num(caps.get(1))? * 60 + num(caps.get(2))?);
  }
  Err(invalid())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  // ── Dates ────────────────────────────────────────────────────────────────

  #[test]
  fn year_only_is_december_31st() {
    let d = parse_release_date("2019").unwrap();
    assert_eq!(d.date, ymd(2019, 12, 31));
    assert_eq!(d.precision, DatePrecision::Year);
    assert_eq!(parse_release_date("(2004)").unwrap().date, ymd(2004, 12, 31));
  }

  #[test]
  fn year_month_is_last_day_of_month() {
    assert_eq!(parse_release_date("2019-02").unwrap().date, ymd(2019, 2, 28));
    assert_eq!(parse_release_date("2020-02").unwrap().date, ymd(2020, 2, 29));
    assert_eq!(parse_release_date("2019-12").unwrap().date, ymd(2019, 12, 31));
    assert!(parse_release_date("2019-13").is_err());
  }

  #[test]
  fn full_dates_in_common_layouts() {
    let expected = ymd(2019, 6, 1);
    for text in [
      "2019-06-01",
      "2019/06/01",
      "01/06/2019",
      "June 1, 2019",
      "Jun 01, 2019",
      "1 June 2019",
      "  June   1,  2019 ",
    ] {
      let d = parse_release_date(text).unwrap_or_else(|e| panic!("{text}: {e}"));
      assert_eq!(d.date, expected, "{text}");
      assert_eq!(d.precision, DatePrecision::Day);
    }
  }

  #[test]
  fn garbage_date_is_an_error() {
    assert!(matches!(
      parse_release_date("coming soon"),
      Err(Error::InvalidDate(_))
    ));
    assert!(parse_release_date("").is_err());
  }

  // ── Durations ────────────────────────────────────────────────────────────

  #[test]
  fn plain_minutes() {
    assert_eq!(parse_duration_minutes("90").unwrap(), 90);
    assert_eq!(parse_duration_minutes("90 min").unwrap(), 90);
    assert_eq!(parse_duration_minutes("90 mins.").unwrap(), 90);
    assert_eq!(parse_duration_minutes("90 Minutes").unwrap(), 90);
  }

  #[test]
  fn clock_formats() {
    assert_eq!(parse_duration_minutes("1:30:00").unwrap(), 90);
    assert_eq!(parse_duration_minutes("1:29:45").unwrap(), 90);
    assert_eq!(parse_duration_minutes("90:12").unwrap(), 90);
  }

  #[test]
  fn hours_and_minutes() {
    assert_eq!(parse_duration_minutes("1h 30m").unwrap(), 90);
    assert_eq!(parse_duration_minutes("1 hr 30 mins").unwrap(), 90);
    assert_eq!(parse_duration_minutes("2 hours").unwrap(), 120);
  }

  #[test]
  fn non_numeric_duration_is_an_error() {
    assert!(matches!(
      parse_duration_minutes("unknown"),
      Err(Error::InvalidDuration(_))
    ));
    assert!(parse_duration_minutes("").is_err());
  }
}
