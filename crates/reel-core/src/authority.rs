//! The `AuthorityClient` trait and the records it returns.
//!
//! The trait is implemented by backends that can answer questions about the
//! authority database (e.g. `reel-store-sqlite`, a local mirror). The matching
//! engine depends on this abstraction only, and never on how the records were
//! fetched.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::person::PersonRole;

// ─── Records ─────────────────────────────────────────────────────────────────

/// The table the authority database files a person under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonTable {
  Male,
  Female,
  #[default]
  Unknown,
}

/// One row of a person search, or one credit on a film page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorityPerson {
  pub name:         String,
  #[serde(default)]
  pub aliases:      Vec<String>,
  #[serde(default)]
  pub url:          Option<String>,
  #[serde(default)]
  pub career_start: Option<i32>,
  #[serde(default)]
  pub career_end:   Option<i32>,
  #[serde(default)]
  pub table:        PersonTable,
}

/// One row of a film search result list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilmSummary {
  pub title: String,
  pub url:   String,
  pub year:  Option<i32>,
}

/// Everything the authority film page tells us.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorityFilm {
  pub title:            String,
  pub url:              String,
  /// Studio first, then distributor(s).
  #[serde(default)]
  pub studios:          Vec<String>,
  #[serde(default)]
  pub release_date:     Option<NaiveDate>,
  #[serde(default)]
  pub date_added:       Option<NaiveDate>,
  /// Release dates listed by cross-linked retail sites.
  #[serde(default)]
  pub cross_site_dates: Vec<NaiveDate>,
  #[serde(default)]
  pub duration_minutes: Option<u32>,
  #[serde(default)]
  pub compilation:      bool,
  #[serde(default)]
  pub cast:             Vec<AuthorityPerson>,
  #[serde(default)]
  pub directors:        Vec<AuthorityPerson>,
}

impl AuthorityFilm {
  /// The earliest date the page offers anywhere.
  pub fn earliest_date(&self) -> Option<NaiveDate> {
    self
      .release_date
      .into_iter()
      .chain(self.date_added)
      .chain(self.cross_site_dates.iter().copied())
      .min()
  }

  pub fn summary(&self) -> FilmSummary {
    FilmSummary {
      title: self.title.clone(),
      url:   self.url.clone(),
      year:  self.release_date.map(|d| chrono::Datelike::year(&d)),
    }
  }
}

// ─── Queries ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilmSearch {
  /// Lower-case words, punctuation removed.
  pub text: String,
  pub year: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonSearch {
  pub name: String,
  pub role: PersonRole,
}

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Why the authority database could not answer. "No results" is not an
/// error; it is an empty list.
#[derive(Debug, thiserror::Error)]
pub enum AuthorityError {
  #[error("access denied by the authority database")]
  AccessDenied,

  #[error("authority database unavailable: {0}")]
  Unavailable(String),

  #[error("authority backend error: {0}")]
  Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl AuthorityError {
  pub fn is_access_denied(&self) -> bool { matches!(self, Self::AccessDenied) }

  pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Backend(Box::new(err))
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Read-only access to the authority database.
///
/// Calls block; rate limiting, timeouts and cancellation belong to the
/// implementation or to wrappers around it.
pub trait AuthorityClient {
  /// Search films by title words, optionally narrowed to a release year.
  /// Results come back in the authority database's own ranking order.
  fn search_films(
    &self,
    search: &FilmSearch,
  ) -> Result<Vec<FilmSummary>, AuthorityError>;

  /// Fetch the full film page behind a search result.
  fn film_details(
    &self,
    summary: &FilmSummary,
  ) -> Result<AuthorityFilm, AuthorityError>;

  /// Search people credited in `search.role` by name.
  fn search_people(
    &self,
    search: &PersonSearch,
  ) -> Result<Vec<AuthorityPerson>, AuthorityError>;
}

impl<C: AuthorityClient + ?Sized> AuthorityClient for &C {
  fn search_films(
    &self,
    search: &FilmSearch,
  ) -> Result<Vec<FilmSummary>, AuthorityError> {
    (**self).search_films(search)
  }

  fn film_details(
    &self,
    summary: &FilmSummary,
  ) -> Result<AuthorityFilm, AuthorityError> {
    (**self).film_details(summary)
  }

  fn search_people(
    &self,
    search: &PersonSearch,
  ) -> Result<Vec<AuthorityPerson>, AuthorityError> {
    (**self).search_people(search)
  }
}
