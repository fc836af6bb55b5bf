//! Field matchers: one candidate field against the local [`FilmQuery`].
//!
//! Every matcher is pure. A `Fail` rejects the candidate under test and
//! nothing else.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::{Captures, Regex};
use reel_core::{config::MatchConfig, film::FilmQuery, outcome::MatchOutcome};
use reel_text::{NormalizeOptions, normalize, normalize_with, title_key};

static PARENTHETICAL: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"\s*[(\[]([^()\[\]]*)[)\]]").expect("parenthetical regex")
});

fn studio_key(text: &str) -> String { normalize_with(text, NormalizeOptions::STUDIO) }

// ─── Title ───────────────────────────────────────────────────────────────────

/// Drop bracketed text that only repeats the studio name, e.g.
/// `Boys in the Sand (Studio X Productions)`.
fn strip_studio_parentheticals<'t>(
  query: &FilmQuery,
  title: &'t str,
) -> std::borrow::Cow<'t, str> {
  PARENTHETICAL.replace_all(title, |caps: &Captures| {
    let inner = studio_key(caps.get(1).map_or("", |m| m.as_str()));
    let names_studio = !inner.is_empty()
      && (inner.contains(&query.compare_studio)
        || query
          .compare_alt_studio
          .as_deref()
          .is_some_and(|alt| !alt.is_empty() && inner.contains(alt)));
    if names_studio {
      String::new()
    } else {
      caps[0].to_string()
    }
  })
}

pub fn match_title(query: &FilmQuery, candidate: &str) -> MatchOutcome {
  let stripped = strip_studio_parentheticals(query, candidate);
  if query.compare_title_keys.contains(&title_key(&stripped)) {
    return MatchOutcome::Pass;
  }

  // Candidates sometimes prepend a series banner to the episode title.
  let haystack = normalize(&stripped);
  let episode_found = query
    .episode_titles
    .iter()
    .map(|episode| normalize(episode))
    .any(|needle| !needle.is_empty() && haystack.contains(&needle));
  if episode_found {
    return MatchOutcome::Pass;
  }

  MatchOutcome::fail(format!("title {candidate:?} does not match {:?}", query.title))
}

// ─── Studio ──────────────────────────────────────────────────────────────────

pub fn match_studio(query: &FilmQuery, candidate: &str) -> MatchOutcome {
  let theirs = studio_key(candidate);
  if theirs.is_empty() {
    return MatchOutcome::fail("candidate lists an empty studio");
  }

  let ours: Vec<&str> = std::iter::once(query.compare_studio.as_str())
    .chain(query.compare_alt_studio.as_deref())
    .filter(|s| !s.is_empty())
    .collect();

  if ours.iter().any(|s| *s == theirs) {
    return MatchOutcome::Pass;
  }
  if ours
    .iter()
    .any(|s| theirs.contains(s) || s.contains(theirs.as_str()))
  {
    return MatchOutcome::Pass;
  }
  MatchOutcome::fail(format!("studio {candidate:?} does not match {:?}", query.studio))
}

/// Try every studio and distributor the candidate lists; the first pass
/// wins.
pub fn match_any_studio<S: AsRef<str>>(query: &FilmQuery, candidates: &[S]) -> MatchOutcome {
  if candidates.iter().any(|s| match_studio(query, s.as_ref()).is_pass()) {
    return MatchOutcome::Pass;
  }
  if candidates.is_empty() {
    return MatchOutcome::fail("candidate lists no studio");
  }
  let listed: Vec<&str> = candidates.iter().map(|s| s.as_ref()).collect();
  MatchOutcome::fail(format!(
    "none of {listed:?} matches studio {:?}",
    query.studio
  ))
}

// ─── Release date ────────────────────────────────────────────────────────────

/// Which window applies to a date comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateTolerance {
  /// Both dates come from the same site.
  SameSource,
  /// The candidate date comes from the authority database, which may list a
  /// later distribution year.
  Authority,
}

impl DateTolerance {
  pub fn days(self, config: &MatchConfig) -> i64 {
    match self {
      Self::SameSource => config.same_source_tolerance_days,
      Self::Authority => config.authority_tolerance_days,
    }
  }
}

/// Skipped (vacuous `Pass`) when the local year is unknown or the candidate
/// offers no date at all.
pub fn match_release_date(
  query:     &FilmQuery,
  candidate: Option<NaiveDate>,
  tolerance: DateTolerance,
  config:    &MatchConfig,
) -> MatchOutcome {
  let (Some(_), Some(ours), Some(theirs)) = (query.year, query.compare_date, candidate)
  else {
    return MatchOutcome::Pass;
  };

  let delta = (ours - theirs).num_days().abs();
  let allowed = tolerance.days(config);
  if delta <= allowed {
    MatchOutcome::Pass
  } else {
    MatchOutcome::fail(format!(
      "release date {theirs} is {delta} days from {ours} (allowed {allowed})"
    ))
  }
}

// ─── Duration ────────────────────────────────────────────────────────────────

/// Skipped for stacked releases and whenever either side has no running time.
pub fn match_duration(
  query:     &FilmQuery,
  candidate: Option<u32>,
  config:    &MatchConfig,
) -> MatchOutcome {
  if query.is_stacked {
    return MatchOutcome::Pass;
  }
  let (Some(ours), Some(theirs)) = (query.duration_minutes, candidate) else {
    return MatchOutcome::Pass;
  };

  let delta = ours.abs_diff(theirs);
  let allowed = config.duration_tolerance_minutes;
  if delta <= allowed {
    MatchOutcome::Pass
  } else {
    MatchOutcome::fail(format!(
      "running time {theirs} min is {delta} min from {ours} min (allowed {allowed})"
    ))
  }
}

/// [`match_duration`] on raw page text. Text that is not a running time is
/// skipped rather than failed.
pub fn match_duration_text(
  query:     &FilmQuery,
  candidate: &str,
  config:    &MatchConfig,
) -> MatchOutcome {
  match reel_text::parse_duration_minutes(candidate) {
    Ok(minutes) => match_duration(query, Some(minutes), config),
    Err(err) => {
      tracing::debug!("skipping duration check: {err}");
      MatchOutcome::Pass
    }
  }
}
