//! One film, end to end: locate it, then resolve its credits.

use std::collections::BTreeMap;

use reel_core::{
  authority::{AuthorityClient, AuthorityPerson},
  config::MatchConfig,
  film::{CastComposition, FilmQuery},
  person::{PersonRecord, PersonRole, RoleStatus},
};
use serde::Serialize;

use crate::{
  locate::{FilmLocator, Location},
  resolve::{IdentityResolver, Resolution},
};

/// Everything learned about one film, ready for a metadata sink.
#[derive(Debug, Clone, Serialize)]
pub struct Enrichment {
  pub film:             Location,
  pub cast:             Resolution,
  pub directors:        Resolution,
  /// Every authority failure met along the way, film and people alike.
  pub authority_errors: Vec<String>,
}

/// Locate `query` in the authority database, then resolve the scraped cast
/// and directors. Confirmed identities are added to `query.known_cast` and
/// `query.known_directors`.
///
/// When the film is not located the resolver runs with no known credits.
pub fn enrich<C, S>(
  query: &mut FilmQuery,
  scraped_cast: &[S],
  scraped_directors: &[S],
  client: &C,
  config: &MatchConfig,
) -> Enrichment
where
  C: AuthorityClient + ?Sized,
  S: AsRef<str>,
{
  let location = FilmLocator::new(client, config).locate(query);

  if let Some(film) = location.film() {
    if query.cast_composition == CastComposition::Unclassified {
      query.cast_composition = CastComposition::infer(film.cast.iter().map(|p| p.table));
    }
    query.is_compilation |= film.compilation;
    credit(&mut query.known_cast, &film.cast);
    credit(&mut query.known_directors, &film.directors);
  }

  let resolver = IdentityResolver::new(client, config);
  let cast = resolver.resolve(query, PersonRole::Cast, scraped_cast, &query.known_cast);
  let directors =
    resolver.resolve(query, PersonRole::Director, scraped_directors, &query.known_directors);

  remember(&mut query.known_cast, &cast);
  remember(&mut query.known_directors, &directors);

  let authority_errors = location
    .authority_errors
    .iter()
    .chain(&cast.authority_errors)
    .chain(&directors.authority_errors)
    .cloned()
    .collect();

  Enrichment { film: location, cast, directors, authority_errors }
}

fn credit(known: &mut BTreeMap<String, PersonRecord>, people: &[AuthorityPerson]) {
  for person in people {
    known
      .entry(person.name.clone())
      .or_insert_with(|| PersonRecord::from_authority(person, RoleStatus::Found));
  }
}

fn remember(known: &mut BTreeMap<String, PersonRecord>, resolution: &Resolution) {
  for record in resolution.found() {
    known
      .entry(record.display_name.clone())
      .or_insert_with(|| record.clone());
  }
}
