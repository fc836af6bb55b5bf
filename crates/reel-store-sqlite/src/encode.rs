//! Conversions between authority records and the plain-text values stored in
//! SQLite columns.
//!
//! Dates are stored as `YYYY-MM-DD`. Enumerations are stored as lower-case
//! words.

use chrono::NaiveDate;
use reel_core::{
  authority::{AuthorityPerson, PersonTable},
  person::PersonRole,
};
use reel_text::{DEFAULT_SOUNDEX_LENGTH, NormalizeOptions, name_key, search_terms, soundex};

use crate::{Error, Result};

// ─── NaiveDate ───────────────────────────────────────────────────────────────

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_date(date: NaiveDate) -> String { date.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── PersonTable ─────────────────────────────────────────────────────────────

pub fn encode_table(table: PersonTable) -> &'static str {
  match table {
    PersonTable::Male => "male",
    PersonTable::Female => "female",
    PersonTable::Unknown => "unknown",
  }
}

pub fn decode_table(s: &str) -> Result<PersonTable> {
  match s {
    "male" => Ok(PersonTable::Male),
    "female" => Ok(PersonTable::Female),
    "unknown" => Ok(PersonTable::Unknown),
    other => Err(Error::UnknownValue { kind: "person table", value: other.to_string() }),
  }
}

// ─── PersonRole ──────────────────────────────────────────────────────────────

pub fn encode_role(role: PersonRole) -> &'static str {
  match role {
    PersonRole::Cast => "cast",
    PersonRole::Director => "director",
  }
}

// ─── Search columns ──────────────────────────────────────────────────────────

/// Space-padded search words, so `LIKE '% word %'` matches whole words only.
pub fn encode_title_words(title: &str) -> String {
  format!(" {} ", search_terms(title, NormalizeOptions::AUTHORITY))
}

pub fn person_key(person: &AuthorityPerson) -> String {
  match &person.url {
    Some(url) => url.clone(),
    None => format!("name:{}", name_key(&person.name)),
  }
}

pub fn name_soundex(name: &str) -> String { soundex(name, DEFAULT_SOUNDEX_LENGTH) }

// ─── Raw rows ────────────────────────────────────────────────────────────────

/// A `films` row as read from SQLite, before decoding.
pub struct RawFilm {
  pub url:              String,
  pub title:            String,
  pub release_date:     Option<String>,
  pub date_added:       Option<String>,
  pub duration_minutes: Option<u32>,
  pub compilation:      bool,
}

impl RawFilm {
  pub fn decode_dates(&self) -> Result<(Option<NaiveDate>, Option<NaiveDate>)> {
    Ok((
      self.release_date.as_deref().map(decode_date).transpose()?,
      self.date_added.as_deref().map(decode_date).transpose()?,
    ))
  }
}

/// A `people` row as read from SQLite; aliases are loaded separately.
pub struct RawPerson {
  pub person_key:   String,
  pub name:         String,
  pub url:          Option<String>,
  pub career_start: Option<i32>,
  pub career_end:   Option<i32>,
  pub table:        String,
}

impl RawPerson {
  pub const COLUMNS: &'static str =
    "p.person_key, p.name, p.url, p.career_start, p.career_end, p.person_table";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      person_key:   row.get(0)?,
      name:         row.get(1)?,
      url:          row.get(2)?,
      career_start: row.get(3)?,
      career_end:   row.get(4)?,
      table:        row.get(5)?,
    })
  }

  pub fn into_person(self, aliases: Vec<String>) -> Result<AuthorityPerson> {
    Ok(AuthorityPerson {
      name: self.name,
      aliases,
      url: self.url,
      career_start: self.career_start,
      career_end: self.career_end,
      table: decode_table(&self.table)?,
    })
  }
}
