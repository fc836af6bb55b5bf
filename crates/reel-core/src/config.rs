//! Matching configuration.
//!
//! Built once at start-up (usually deserialised from the `[matching]` table of
//! `reel.toml`) and passed by reference into every matcher. Nothing here is
//! read from process-wide state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::person::PersonRole;

/// Cast searches returning more candidates than this are too ambiguous to
/// trust.
pub const CAST_CANDIDATE_CEILING: usize = 13;
/// Director searches returning more candidates than this are too ambiguous to
/// trust.
pub const DIRECTOR_CANDIDATE_CEILING: usize = 5;
/// Edits allowed in each word of a name before it stops counting as the
/// same name.
pub const LEVENSHTEIN_SLACK: usize = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
  /// Largest running-time difference, in minutes, still considered the same
  /// film.
  pub duration_tolerance_minutes: u32,
  /// Release-date window when both dates come from the same source.
  pub same_source_tolerance_days: i64,
  /// Release-date window against the authority database, which may record a
  /// later distribution year.
  pub authority_tolerance_days:   i64,
  pub cast_candidate_ceiling:     usize,
  pub director_candidate_ceiling: usize,
  /// Edit distance allowed per word, so a two-word name tolerates one
  /// typo in each word.
  pub levenshtein_slack:          usize,
  pub soundex_length:             usize,
  /// Years added to each end of a career range before checking a film year
  /// against it.
  pub career_padding_years:       i32,
  /// Source studio name → authority studio name, for studios the authority
  /// database lists under a different name.
  pub studio_aliases:             BTreeMap<String, String>,
}

impl Default for MatchConfig {
  fn default() -> Self {
    Self {
      duration_tolerance_minutes: 5,
      same_source_tolerance_days: 366,
      authority_tolerance_days:   731,
      cast_candidate_ceiling:     CAST_CANDIDATE_CEILING,
      director_candidate_ceiling: DIRECTOR_CANDIDATE_CEILING,
      levenshtein_slack:          LEVENSHTEIN_SLACK,
      soundex_length:             reel_text::DEFAULT_SOUNDEX_LENGTH,
      career_padding_years:       1,
      studio_aliases:             BTreeMap::new(),
    }
  }
}

impl MatchConfig {
  pub fn candidate_ceiling(&self, role: PersonRole) -> usize {
    match role {
      PersonRole::Cast => self.cast_candidate_ceiling,
      PersonRole::Director => self.director_candidate_ceiling,
    }
  }

  /// The authority studio name configured for `studio`, compared on
  /// normalised forms.
  pub fn studio_alias(&self, studio: &str) -> Option<&str> {
    let key = |s: &str| reel_text::normalize_with(s, reel_text::NormalizeOptions::STUDIO);
    let wanted = key(studio);
    self
      .studio_aliases
      .iter()
      .find(|(source, _)| key(source) == wanted)
      .map(|(_, authority)| authority.as_str())
  }
}
