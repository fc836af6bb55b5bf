//! Scenario tests for the locator, the resolver and `enrich` against an
//! in-memory authority.

use std::{cell::RefCell, collections::HashMap};

use chrono::NaiveDate;
use reel_core::{
  authority::{
    AuthorityClient, AuthorityError, AuthorityFilm, AuthorityPerson, FilmSearch,
    FilmSummary, PersonSearch, PersonTable,
  },
  config::MatchConfig,
  film::{CastComposition, FilmQuery},
  person::{PersonRecord, PersonRole, RoleStatus},
};

use crate::{FilmLocator, IdentityResolver, LocatorState, enrich};

// ─── Fake authority ──────────────────────────────────────────────────────────

#[derive(Default)]
struct FakeAuthority {
  films:              Vec<AuthorityFilm>,
  people:             HashMap<(PersonRole, String), Vec<AuthorityPerson>>,
  unavailable_people: Vec<String>,
  deny_film_search:   bool,
  broken_pages:       Vec<String>,
  pages_fetched:      RefCell<Vec<String>>,
  people_searched:    RefCell<Vec<String>>,
}

impl FakeAuthority {
  fn with_people(mut self, role: PersonRole, name: &str, found: Vec<AuthorityPerson>) -> Self {
    self.people.insert((role, name.to_string()), found);
    self
  }
}

impl AuthorityClient for FakeAuthority {
  fn search_films(&self, _: &FilmSearch) -> Result<Vec<FilmSummary>, AuthorityError> {
    if self.deny_film_search {
      return Err(AuthorityError::AccessDenied);
    }
    Ok(self.films.iter().map(AuthorityFilm::summary).collect())
  }

  fn film_details(&self, summary: &FilmSummary) -> Result<AuthorityFilm, AuthorityError> {
    self.pages_fetched.borrow_mut().push(summary.url.clone());
    if self.broken_pages.contains(&summary.url) {
      return Err(AuthorityError::Unavailable("timed out".into()));
    }
    self
      .films
      .iter()
      .find(|f| f.url == summary.url)
      .cloned()
      .ok_or_else(|| AuthorityError::Unavailable("no such page".into()))
  }

  fn search_people(&self, search: &PersonSearch) -> Result<Vec<AuthorityPerson>, AuthorityError> {
    self.people_searched.borrow_mut().push(search.name.clone());
    if self.unavailable_people.contains(&search.name) {
      return Err(AuthorityError::AccessDenied);
    }
    Ok(
      self
        .people
        .get(&(search.role, search.name.clone()))
        .cloned()
        .unwrap_or_default(),
    )
  }
}

// ─── Fixtures ────────────────────────────────────────────────────────────────

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(y, m, d).unwrap() }

fn person(name: &str, aliases: &[&str], table: PersonTable) -> AuthorityPerson {
  AuthorityPerson {
    name: name.into(),
    aliases: aliases.iter().map(|a| a.to_string()).collect(),
    url: Some(format!("https://authority.test/person/{}", reel_text::name_key(name))),
    career_start: Some(2012),
    career_end: None,
    table,
  }
}

fn boys_page() -> AuthorityFilm {
  AuthorityFilm {
    title:            "Boys In The Sand".into(),
    url:              "https://authority.test/film/boys".into(),
    studios:          vec!["Studio X Productions".into()],
    release_date:     Some(ymd(2019, 6, 1)),
    date_added:       None,
    cross_site_dates: vec![],
    duration_minutes: None,
    compilation:      false,
    cast:             vec![],
    directors:        vec![],
  }
}

fn boys_query() -> FilmQuery {
  FilmQuery::builder("Studio X", "Boys in the Sand")
    .year(2019)
    .build(&MatchConfig::default())
    .unwrap()
}

fn lenient() -> MatchConfig {
  MatchConfig { duration_tolerance_minutes: 10, ..MatchConfig::default() }
}

// ─── Film locator ────────────────────────────────────────────────────────────

#[test]
fn boys_in_the_sand_is_confirmed() {
  let authority = FakeAuthority { films: vec![boys_page()], ..Default::default() };
  let config = MatchConfig::default();
  let location = FilmLocator::new(&authority, &config).locate(&boys_query());

  let film = location.film().expect("confirmed");
  assert_eq!(film.url, "https://authority.test/film/boys");
  assert!(location.rejections.is_empty());
  assert!(location.authority_errors.is_empty());
}

#[test]
fn duration_mismatch_rejects_candidate() {
  let mut short = boys_page();
  short.duration_minutes = Some(40);
  let authority = FakeAuthority { films: vec![short], ..Default::default() };

  let mut query = boys_query();
  query.duration_minutes = Some(90);
  let config = lenient();
  let location = FilmLocator::new(&authority, &config).locate(&query);

  assert_eq!(location.state, LocatorState::Exhausted);
  assert_eq!(location.rejections.len(), 1);
  assert!(location.rejections[0].reason.contains("running time"));
}

#[test]
fn locator_moves_on_to_next_candidate() {
  let mut short = boys_page();
  short.duration_minutes = Some(40);
  let mut full = boys_page();
  full.url = "https://authority.test/film/boys-uncut".into();
  full.duration_minutes = Some(88);
  let authority = FakeAuthority { films: vec![short, full], ..Default::default() };

  let mut query = boys_query();
  query.duration_minutes = Some(90);
  let config = lenient();
  let location = FilmLocator::new(&authority, &config).locate(&query);

  assert_eq!(
    location.film().map(|f| f.url.as_str()),
    Some("https://authority.test/film/boys-uncut")
  );
  assert_eq!(location.rejections.len(), 1);
}

#[test]
fn title_mismatch_skips_detail_page() {
  let mut other = boys_page();
  other.title = "Boys in the City".into();
  other.url = "https://authority.test/film/city".into();
  let authority = FakeAuthority { films: vec![other, boys_page()], ..Default::default() };

  let config = MatchConfig::default();
  let location = FilmLocator::new(&authority, &config).locate(&boys_query());

  assert!(location.is_confirmed());
  assert_eq!(
    *authority.pages_fetched.borrow(),
    vec!["https://authority.test/film/boys".to_string()]
  );
}

#[test]
fn earliest_page_date_is_used() {
  let mut page = boys_page();
  page.release_date = Some(ymd(2023, 1, 1));
  page.cross_site_dates = vec![ymd(2019, 2, 1)];
  let authority = FakeAuthority { films: vec![page], ..Default::default() };

  let config = MatchConfig::default();
  assert!(FilmLocator::new(&authority, &config).locate(&boys_query()).is_confirmed());
}

#[test]
fn studio_must_match_some_listed_field() {
  let mut page = boys_page();
  page.studios = vec!["Falcon".into(), "Raging Stallion".into()];
  let authority = FakeAuthority { films: vec![page], ..Default::default() };

  let config = MatchConfig::default();
  let location = FilmLocator::new(&authority, &config).locate(&boys_query());
  assert_eq!(location.state, LocatorState::Exhausted);

  let mut page = boys_page();
  page.studios = vec!["Falcon".into(), "Studio X".into()];
  let authority = FakeAuthority { films: vec![page], ..Default::default() };
  assert!(FilmLocator::new(&authority, &config).locate(&boys_query()).is_confirmed());
}

#[test]
fn refused_search_exhausts_with_error() {
  let authority = FakeAuthority {
    films: vec![boys_page()],
    deny_film_search: true,
    ..Default::default()
  };
  let config = MatchConfig::default();
  let location = FilmLocator::new(&authority, &config).locate(&boys_query());

  assert_eq!(location.state, LocatorState::Exhausted);
  assert_eq!(location.authority_errors.len(), 1);
  assert!(authority.pages_fetched.borrow().is_empty());
}

#[test]
fn broken_page_is_recorded_and_skipped() {
  let mut mirror = boys_page();
  mirror.url = "https://authority.test/film/boys-mirror".into();
  let authority = FakeAuthority {
    films: vec![boys_page(), mirror],
    broken_pages: vec!["https://authority.test/film/boys".into()],
    ..Default::default()
  };
  let config = MatchConfig::default();
  let location = FilmLocator::new(&authority, &config).locate(&boys_query());

  assert_eq!(
    location.film().map(|f| f.url.as_str()),
    Some("https://authority.test/film/boys-mirror")
  );
  assert_eq!(location.authority_errors.len(), 1);
  assert_eq!(location.rejections.len(), 1);
}

// ─── Identity resolver ───────────────────────────────────────────────────────

fn resolve_cast(
  authority: &FakeAuthority,
  query: &FilmQuery,
  names: &[&str],
) -> crate::Resolution {
  let config = MatchConfig::default();
  IdentityResolver::new(authority, &config).resolve(
    query,
    PersonRole::Cast,
    names,
    &Default::default(),
  )
}

#[test]
fn exact_name_is_found() {
  let authority = FakeAuthority::default().with_people(
    PersonRole::Cast,
    "Leo Rocha",
    vec![person("Leo Rocha", &[], PersonTable::Male)],
  );
  let r = resolve_cast(&authority, &boys_query(), &["Leo Rocha"]);
  let record = &r.records["Leo Rocha"];
  assert_eq!(record.role, RoleStatus::Found);
  assert!(record.url.is_some());
}

#[test]
fn alias_match_is_annotated() {
  let authority = FakeAuthority::default().with_people(
    PersonRole::Cast,
    "Jimmy Durano",
    vec![person("J. Deano", &["Jimmy Durano"], PersonTable::Male)],
  );
  let r = resolve_cast(&authority, &boys_query(), &["Jimmy Durano"]);
  let record = &r.records["Jimmy Durano"];
  assert_eq!(record.display_name, "J. Deano");
  assert_eq!(record.role.annotation().as_deref(), Some("AKA: Jimmy Durano"));
}

#[test]
fn one_typo_per_word_is_tolerated() {
  for typo in ["Lee Rocha", "Leo Rochaa", "Lee Rochaa"] {
    let authority = FakeAuthority::default().with_people(
      PersonRole::Cast,
      "Leo Rocha",
      vec![person(typo, &[], PersonTable::Male)],
    );
    let r = resolve_cast(&authority, &boys_query(), &["Leo Rocha"]);
    assert!(r.records["Leo Rocha"].role.is_found(), "{typo} should match");
  }

  // "Leo Mocka" is two edits from "Leo Rocha" in one word and codes L5200,
  // so neither the edit budget nor soundex can accept it.
  for other in ["Rocha Leo", "Leo Stone", "Leo Mocka"] {
    let authority = FakeAuthority::default().with_people(
      PersonRole::Cast,
      "Leo Rocha",
      vec![person(other, &[], PersonTable::Male)],
    );
    let r = resolve_cast(&authority, &boys_query(), &["Leo Rocha"]);
    assert_eq!(
      r.records["Leo Rocha"].role,
      RoleStatus::AbsentFromAuthority,
      "{other} should not match"
    );
  }
}

#[test]
fn transposed_letters_fall_through_to_soundex() {
  let authority = FakeAuthority::default().with_people(
    PersonRole::Cast,
    "Leo Rocha",
    vec![person("Leo Rocah", &[], PersonTable::Male)],
  );
  let r = resolve_cast(&authority, &boys_query(), &["Leo Rocha"]);
  assert_eq!(r.records["Leo Rocha"].display_name, "Leo Rocah");
}

#[test]
fn soundex_is_last_resort() {
  let authority = FakeAuthority::default().with_people(
    PersonRole::Cast,
    "Jon Smith",
    vec![person("Johnny Smyth", &[], PersonTable::Male)],
  );
  let r = resolve_cast(&authority, &boys_query(), &["Jon Smith"]);
  assert_eq!(r.records["Jon Smith"].display_name, "Johnny Smyth");
}

#[test]
fn duplicate_person_is_not_added_twice() {
  let deano = person("J. Deano", &["James Dean"], PersonTable::Male);
  let authority = FakeAuthority::default()
    .with_people(PersonRole::Cast, "J Deano", vec![deano.clone()])
    .with_people(PersonRole::Cast, "James Dean", vec![deano]);

  let r = resolve_cast(&authority, &boys_query(), &["J. Deano", "James Dean"]);
  assert_eq!(r.records.len(), 1);
  assert_eq!(r.records["J. Deano"].display_name, "J. Deano");
  assert_eq!(r.duplicates["James Dean"], "J. Deano");
}

#[test]
fn known_alias_resolves_without_search() {
  let deano = person("J. Deano", &["James Dean"], PersonTable::Male);
  let known = std::collections::BTreeMap::from([(
    deano.name.clone(),
    PersonRecord::from_authority(&deano, RoleStatus::Found),
  )]);
  let authority = FakeAuthority::default();
  let config = MatchConfig::default();
  let r = IdentityResolver::new(&authority, &config).resolve(
    &boys_query(),
    PersonRole::Cast,
    &["James Dean"],
    &known,
  );

  assert_eq!(r.records.len(), 1);
  assert_eq!(r.records["James Dean"].display_name, "J. Deano");
  assert!(authority.people_searched.borrow().is_empty());
}

#[test]
fn ambiguity_ceiling_precedes_matching() {
  let crowd = |n: usize| {
    (0..n)
      .map(|i| {
        let mut p = person("Leo Rocha", &[], PersonTable::Male);
        p.url = Some(format!("https://authority.test/person/leorocha-{i}"));
        p
      })
      .collect::<Vec<_>>()
  };

  let authority = FakeAuthority::default().with_people(PersonRole::Cast, "Leo Rocha", crowd(14));
  let r = resolve_cast(&authority, &boys_query(), &["Leo Rocha"]);
  assert_eq!(r.records["Leo Rocha"].role, RoleStatus::AbsentFromAuthority);
  assert_eq!(r.ambiguous, vec!["Leo Rocha".to_string()]);

  let authority = FakeAuthority::default().with_people(PersonRole::Cast, "Leo Rocha", crowd(13));
  let r = resolve_cast(&authority, &boys_query(), &["Leo Rocha"]);
  assert!(r.records["Leo Rocha"].role.is_found());
  assert!(r.ambiguous.is_empty());
}

#[test]
fn director_ceiling_is_lower() {
  let crowd: Vec<_> = (0..6)
    .map(|_| person("Chi Chi LaRue", &[], PersonTable::Unknown))
    .collect();
  let authority =
    FakeAuthority::default().with_people(PersonRole::Director, "Chi Chi LaRue", crowd);
  let config = MatchConfig::default();
  let r = IdentityResolver::new(&authority, &config).resolve(
    &boys_query(),
    PersonRole::Director,
    &["Chi Chi LaRue"],
    &Default::default(),
  );
  assert_eq!(r.ambiguous.len(), 1);
}

#[test]
fn unavailable_is_distinct_from_absent() {
  let mut authority = FakeAuthority::default().with_people(
    PersonRole::Cast,
    "Leo Rocha",
    vec![person("Leo Rocha", &[], PersonTable::Male)],
  );
  authority.unavailable_people = vec!["Dean Monroe".into()];

  let r = resolve_cast(&authority, &boys_query(), &["Dean Monroe", "Leo Rocha", "Nobody"]);
  assert_eq!(r.records["Dean Monroe"].role, RoleStatus::AuthorityUnavailable);
  assert_eq!(r.records["Nobody"].role, RoleStatus::AbsentFromAuthority);
  assert!(r.records["Leo Rocha"].role.is_found());
  assert_eq!(r.authority_errors.len(), 1);
  assert!(r.authority_errors[0].starts_with("Dean Monroe"));
}

#[test]
fn career_range_filters_unless_compilation() {
  let mut veteran = person("Leo Rocha", &[], PersonTable::Male);
  veteran.career_start = Some(1995);
  veteran.career_end = Some(2001);
  let authority =
    FakeAuthority::default().with_people(PersonRole::Cast, "Leo Rocha", vec![veteran]);

  let r = resolve_cast(&authority, &boys_query(), &["Leo Rocha"]);
  assert_eq!(r.records["Leo Rocha"].role, RoleStatus::AbsentFromAuthority);

  let mut compilation = boys_query();
  compilation.is_compilation = true;
  let r = resolve_cast(&authority, &compilation, &["Leo Rocha"]);
  assert!(r.records["Leo Rocha"].role.is_found());
}

#[test]
fn table_filter_follows_cast_composition() {
  let authority = FakeAuthority::default()
    .with_people(
      PersonRole::Cast,
      "Alex Moore",
      vec![person("Alex Moore", &[], PersonTable::Female)],
    )
    .with_people(
      PersonRole::Director,
      "Alex Moore",
      vec![person("Alex Moore", &[], PersonTable::Female)],
    );

  let mut query = boys_query();
  query.cast_composition = CastComposition::Male;
  let r = resolve_cast(&authority, &query, &["Alex Moore"]);
  assert_eq!(r.records["Alex Moore"].role, RoleStatus::AbsentFromAuthority);

  let config = MatchConfig::default();
  let r = IdentityResolver::new(&authority, &config).resolve(
    &query,
    PersonRole::Director,
    &["Alex Moore"],
    &Default::default(),
  );
  assert!(r.records["Alex Moore"].role.is_found());
}

#[test]
fn shadowed_short_name_is_not_searched() {
  let authority = FakeAuthority::default();
  resolve_cast(&authority, &boys_query(), &["Leo", "Leo Rocha"]);
  assert_eq!(*authority.people_searched.borrow(), vec!["Leo Rocha".to_string()]);
}

#[test]
fn records_are_keyed_by_scraped_spelling() {
  let authority = FakeAuthority::default().with_people(
    PersonRole::Cast,
    "Leo Rocha",
    vec![person("Leo Rocha", &[], PersonTable::Male)],
  );
  let r = resolve_cast(
    &authority,
    &boys_query(),
    &["Leo Rocha (aka Leo R.)", "Leo", "LEO ROCHA", "Nobody's"],
  );

  let keys: Vec<&str> = r.records.keys().map(String::as_str).collect();
  assert_eq!(keys, vec!["LEO ROCHA", "Leo", "Leo Rocha (aka Leo R.)", "Nobody's"]);
  for key in ["Leo Rocha (aka Leo R.)", "Leo", "LEO ROCHA"] {
    assert_eq!(r.records[key].display_name, "Leo Rocha", "{key}");
    assert!(r.records[key].role.is_found(), "{key}");
  }
  assert_eq!(r.records["Nobody's"].role, RoleStatus::AbsentFromAuthority);
  assert_eq!(*authority.people_searched.borrow(), vec!["Leo Rocha", "Nobody"]);
}

#[test]
fn unavailable_keeps_scraped_spelling() {
  let mut authority = FakeAuthority::default();
  authority.unavailable_people = vec!["JT Sloan".into()];
  let r = resolve_cast(&authority, &boys_query(), &["J.T. Sloan"]);
  assert_eq!(r.records["J.T. Sloan"].role, RoleStatus::AuthorityUnavailable);
}

// ─── Enrichment ──────────────────────────────────────────────────────────────

#[test]
fn enrich_uses_page_credits_then_searches_the_rest() {
  let mut page = boys_page();
  page.cast = vec![
    person("J. Deano", &["James Dean"], PersonTable::Male),
    person("Leo Rocha", &[], PersonTable::Male),
  ];
  page.directors = vec![person("Chi Chi LaRue", &[], PersonTable::Unknown)];

  let authority = FakeAuthority { films: vec![page], ..Default::default() }.with_people(
    PersonRole::Cast,
    "Brent Corrigan",
    vec![person("Brent Corrigan", &[], PersonTable::Male)],
  );

  let mut query = boys_query();
  let config = MatchConfig::default();
  let result = enrich(
    &mut query,
    &["James Dean", "Leo Rocha", "Brent Corrigan"],
    &["Chi Chi LaRue"],
    &authority,
    &config,
  );

  assert!(result.film.is_confirmed());
  assert_eq!(query.cast_composition, CastComposition::Male);
  assert_eq!(
    result.cast.records["James Dean"].role,
    RoleStatus::FoundWithAlias("James Dean".into())
  );
  assert!(result.cast.records["Brent Corrigan"].role.is_found());
  assert!(result.directors.records["Chi Chi LaRue"].role.is_found());
  assert_eq!(*authority.people_searched.borrow(), vec!["Brent Corrigan".to_string()]);

  assert!(query.known_cast.contains_key("Brent Corrigan"));
  assert_eq!(query.known_cast.len(), 3);
  assert!(result.authority_errors.is_empty());
}

#[test]
fn enrich_without_located_film_still_resolves_people() {
  let authority = FakeAuthority::default().with_people(
    PersonRole::Cast,
    "Leo Rocha",
    vec![person("Leo Rocha", &[], PersonTable::Male)],
  );
  let mut query = boys_query();
  let config = MatchConfig::default();
  let result = enrich(&mut query, &["Leo Rocha"], &[], &authority, &config);

  assert_eq!(result.film.state, LocatorState::Exhausted);
  assert!(result.cast.records["Leo Rocha"].role.is_found());
  assert!(result.directors.records.is_empty());
}

#[test]
fn enrichment_serialises_for_a_sink() {
  let authority = FakeAuthority { films: vec![boys_page()], ..Default::default() };
  let mut query = boys_query();
  let config = MatchConfig::default();
  let result = enrich(&mut query, &["Nobody"], &[], &authority, &config);

  let json = serde_json::to_value(&result).unwrap();
  assert_eq!(json["film"]["state"]["state"], "confirmed");
  assert_eq!(json["cast"]["records"]["Nobody"]["role"]["status"], "absent_from_authority");
}
