//! Randomised pause before every authority request.

use std::{thread, time::Duration};

use rand::Rng as _;
use reel_core::authority::{
  AuthorityClient, AuthorityError, AuthorityFilm, AuthorityPerson, FilmSearch,
  FilmSummary, PersonSearch,
};

use crate::settings::ThrottleConfig;

/// Wraps an [`AuthorityClient`] and sleeps a uniformly random delay before
/// delegating each call.
pub struct Throttled<C> {
  inner:  C,
  config: ThrottleConfig,
}

impl<C> Throttled<C> {
  pub fn new(inner: C, config: ThrottleConfig) -> Self { Self { inner, config } }

  fn next_delay(&self) -> Duration {
    let ms = rand::thread_rng().gen_range(self.config.min_delay_ms..=self.config.max_delay_ms);
    Duration::from_millis(ms)
  }

  fn pause(&self) {
    let delay = self.next_delay();
    tracing::trace!(?delay, "throttling authority request");
    thread::sleep(delay);
  }
}

impl<C: AuthorityClient> AuthorityClient for Throttled<C> {
  fn search_films(&self, search: &FilmSearch) -> Result<Vec<FilmSummary>, AuthorityError> {
    self.pause();
    self.inner.search_films(search)
  }

  fn film_details(&self, summary: &FilmSummary) -> Result<AuthorityFilm, AuthorityError> {
    self.pause();
    self.inner.film_details(summary)
  }

  fn search_people(&self, search: &PersonSearch) -> Result<Vec<AuthorityPerson>, AuthorityError> {
    self.pause();
    self.inner.search_people(search)
  }
}
