//! Filename convention: `Studio - Title (Year)`.
//!
//! The studio segment may carry the authority database's own name for the
//! studio in parentheses, e.g. `Studio X (Studio X Productions) - Title (2019)`.
//! A trailing `cd1`, `disc 2`, `pt3`, `1of2` (or `part 2` after the year) marks one
//! file of a stacked release.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFilename {
  pub studio:     String,
  pub alt_studio: Option<String>,
  pub title:      String,
  pub year:       Option<i32>,
  pub stacked:    bool,
}

static STACK_AFTER_YEAR: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?i)^(?P<body>.*\(\d{4}\))[\s._-]*(?:(?:cd|dvd|disc|disk|part|pt)[\s._-]*\d{1,2}|\d{1,2}\s?of\s?\d{1,2})$")
    .expect("stack-after-year regex")
});

static STACK_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?i)^(?P<body>.*?)[\s._-]+(?:(?:cd|dvd|disc|disk|pt)[\s._-]*\d{1,2}|\d{1,2}\s?of\s?\d{1,2})$")
    .expect("stack suffix regex")
});

static LAYOUT: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^(?P<studio>.+?)\s+-\s+(?P<title>.+?)(?:\s*\((?P<year>\d{4})\))?$")
    .expect("filename layout regex")
});

static EMBEDDED_STUDIO: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^(?P<name>.+?)\s*\((?P<alt>[^()]+)\)$").expect("embedded studio regex")
});

/// Split a filename stem (no extension) into its parts.
pub fn parse_filename(stem: &str) -> Result<ParsedFilename> {
  let trimmed = stem.trim();
  let unrecognised = || Error::UnrecognisedFilename(stem.to_string());

  let (body, stacked) = match STACK_AFTER_YEAR
    .captures(trimmed)
    .or_else(|| STACK_SUFFIX.captures(trimmed))
  {
    Some(caps) => (caps.name("body").map_or(trimmed, |m| m.as_str()), true),
    None => (trimmed, false),
  };

  let caps = LAYOUT.captures(body.trim()).ok_or_else(unrecognised)?;
  let studio_segment = caps.name("studio").map_or("", |m| m.as_str()).trim();
  let title = caps.name("title").map_or("", |m| m.as_str()).trim();
  if studio_segment.is_empty() || title.is_empty() {
    return Err(unrecognised());
  }

  let year = caps
    .name("year")
    .map(|m| m.as_str().parse::<i32>().map_err(|_| unrecognised()))
    .transpose()?;

  let (studio, alt_studio) = match EMBEDDED_STUDIO.captures(studio_segment) {
    Some(inner) => (
      inner.name("name").map_or(studio_segment, |m| m.as_str()).trim(),
      inner.name("alt").map(|m| m.as_str().trim().to_string()),
    ),
    None => (studio_segment, None),
  };

  Ok(ParsedFilename {
    studio: studio.to_string(),
    alt_studio,
    title: title.to_string(),
    year,
    stacked,
  })
}
