//! Film location: walk the authority search results until one candidate
//! passes every field matcher.
//!
//! ```text
//! Searching ─▶ Candidate(0) ─▶ Candidate(1) ─▶ … ─▶ Exhausted
//!                   │               │
//!                   └───────────────┴──▶ Confirmed
//! ```

use std::ops::ControlFlow;

use reel_core::{
  authority::{AuthorityClient, AuthorityFilm, FilmSearch, FilmSummary},
  config::MatchConfig,
  film::FilmQuery,
  outcome::MatchOutcome,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::field::{
  DateTolerance, match_any_studio, match_duration, match_release_date, match_title,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "film", rename_all = "snake_case")]
pub enum LocatorState {
  Searching,
  /// Testing the n-th search result.
  Candidate(usize),
  Confirmed(Box<AuthorityFilm>),
  Exhausted,
}

/// A search result that was not our film, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
  pub candidate: FilmSummary,
  pub reason:    String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Location {
  pub state:            LocatorState,
  pub rejections:       Vec<Rejection>,
  pub authority_errors: Vec<String>,
}

impl Location {
  pub fn film(&self) -> Option<&AuthorityFilm> {
    match &self.state {
      LocatorState::Confirmed(film) => Some(film),
      _ => None,
    }
  }

  pub fn is_confirmed(&self) -> bool { self.film().is_some() }
}

pub struct FilmLocator<'a, C: ?Sized> {
  client: &'a C,
  config: &'a MatchConfig,
}

impl<'a, C: AuthorityClient + ?Sized> FilmLocator<'a, C> {
  pub fn new(client: &'a C, config: &'a MatchConfig) -> Self { Self { client, config } }

  pub fn locate(&self, query: &FilmQuery) -> Location {
    let mut location = Location {
      state:            LocatorState::Searching,
      rejections:       Vec::new(),
      authority_errors: Vec::new(),
    };

    let search = FilmSearch { text: query.search_text(), year: query.year };
    let candidates = match self.client.search_films(&search) {
      Ok(candidates) => candidates,
      Err(err) => {
        warn!(title = %query.title, "film search failed: {err}");
        location.authority_errors.push(format!("search {:?}: {err}", search.text));
        location.state = LocatorState::Exhausted;
        return location;
      }
    };
    debug!(text = %search.text, count = candidates.len(), "film search returned");

    let flow = candidates.iter().enumerate().try_fold(
      location.state.clone(),
      |_, (n, summary)| match self.examine(query, summary, &mut location.authority_errors) {
        Ok(film) => ControlFlow::Break(LocatorState::Confirmed(Box::new(film))),
        Err(reason) => {
          debug!(candidate = %summary.title, %reason, "candidate rejected");
          location.rejections.push(Rejection { candidate: summary.clone(), reason });
          ControlFlow::Continue(LocatorState::Candidate(n))
        }
      },
    );

    location.state = match flow {
      ControlFlow::Break(confirmed) => confirmed,
      ControlFlow::Continue(_) => LocatorState::Exhausted,
    };
    match &location.state {
      LocatorState::Confirmed(film) => info!(title = %film.title, url = %film.url, "film located"),
      _ => info!(title = %query.title, rejected = location.rejections.len(), "film not located"),
    }
    location
  }

  /// Title is checked on the search row before paying for the detail page.
  fn examine(
    &self,
    query: &FilmQuery,
    summary: &FilmSummary,
    errors: &mut Vec<String>,
  ) -> Result<AuthorityFilm, String> {
    if let MatchOutcome::Fail(reason) = match_title(query, &summary.title) {
      return Err(reason);
    }

    let film = self.client.film_details(summary).map_err(|err| {
      warn!(url = %summary.url, "film page unavailable: {err}");
      errors.push(format!("{}: {err}", summary.url));
      format!("film page unavailable: {err}")
    })?;

    let outcome = match_any_studio(query, &film.studios)
      .and_then(|| match_duration(query, film.duration_minutes, self.config))
      .and_then(|| {
        match_release_date(query, film.earliest_date(), DateTolerance::Authority, self.config)
      });
    match outcome {
      MatchOutcome::Pass => Ok(film),
      MatchOutcome::Fail(reason) => Err(reason),
    }
  }
}
