//! Identity resolution: tie scraped names to authority identities.
//!
//! Pass A reconciles names against records already known for the film (the
//! credits on its authority page). Pass B searches the authority database for
//! each name still unresolved. Each step below yields to the next only when
//! it has nothing to say.
//!
//! ```text
//! local name ─┬─ Pass A: known name ─ known alias ─ inside name ─ inside alias
//!             └─ Pass B: search ─ table/career filter ─ ceiling
//!                          └─ per candidate: name ─ alias ─ edit distance ─ soundex
//!                               └─ duplicate-person guard
//! ```
//!
//! Results are keyed by the scraped strings as given. Spellings folded
//! together during preparation share one record.

use std::collections::BTreeMap;

use reel_core::{
  authority::{AuthorityClient, AuthorityPerson, PersonSearch},
  config::MatchConfig,
  film::FilmQuery,
  person::{PersonRecord, PersonRole, RoleStatus, career_admits},
};
use reel_text::{name_key, soundex};
use serde::Serialize;
use strsim::levenshtein;
use tracing::{debug, info, warn};

use crate::names::{LocalName, prepare_local_names};

// ─── Report ──────────────────────────────────────────────────────────────────

/// Outcome of resolving one credit list.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Resolution {
  /// Scraped name → record, for every scraped name with comparable
  /// characters, resolved or not.
  pub records:          BTreeMap<String, PersonRecord>,
  /// Scraped names discarded as another spelling of an already-resolved
  /// person, mapped to that person's display name.
  pub duplicates:       BTreeMap<String, String>,
  /// Scraped names whose search returned too many candidates to trust.
  pub ambiguous:        Vec<String>,
  pub authority_errors: Vec<String>,
}

impl Resolution {
  /// Records tied to an authority identity.
  pub fn found(&self) -> impl Iterator<Item = &PersonRecord> {
    self.records.values().filter(|r| r.role.is_found())
  }

  /// File `record` under every scraped spelling of `local`.
  fn settle(&mut self, local: &LocalName, record: PersonRecord) {
    for original in &local.originals {
      self.records.insert(original.clone(), record.clone());
    }
  }
}

// ─── Resolver ────────────────────────────────────────────────────────────────

pub struct IdentityResolver<'a, C: ?Sized> {
  client: &'a C,
  config: &'a MatchConfig,
}

impl<'a, C: AuthorityClient + ?Sized> IdentityResolver<'a, C> {
  pub fn new(client: &'a C, config: &'a MatchConfig) -> Self { Self { client, config } }

  /// Resolve `local_names` credited in `role` on the film described by
  /// `query`. `known` holds identities already confirmed for this film,
  /// keyed by display name.
  pub fn resolve<S: AsRef<str>>(
    &self,
    query: &FilmQuery,
    role: PersonRole,
    local_names: &[S],
    known: &BTreeMap<String, PersonRecord>,
  ) -> Resolution {
    let mut resolution = Resolution::default();
    let mut unresolved = Vec::new();

    // ── Pass A ──
    for local in prepare_local_names(local_names) {
      match reconcile_known(&local.name, known) {
        Some(record) => {
          debug!(name = %local.name, matched = %record.display_name, "reconciled with film credits");
          resolution.settle(&local, record);
        }
        None => unresolved.push(local),
      }
    }

    // ── Pass B ──
    for local in &unresolved {
      self.look_up(query, role, local, known, &mut resolution);
    }
    resolution
  }

  fn look_up(
    &self,
    query: &FilmQuery,
    role: PersonRole,
    local: &LocalName,
    known: &BTreeMap<String, PersonRecord>,
    resolution: &mut Resolution,
  ) {
    let name = local.name.as_str();
    let search = PersonSearch { name: name.to_string(), role };
    let candidates = match self.client.search_people(&search) {
      Ok(candidates) => candidates,
      Err(err) => {
        warn!(%name, ?role, "person search failed: {err}");
        resolution.authority_errors.push(format!("{name}: {err}"));
        resolution.settle(local, PersonRecord::unavailable(name));
        return;
      }
    };

    let candidates: Vec<AuthorityPerson> = candidates
      .into_iter()
      .filter(|c| self.plausible(query, role, c))
      .collect();

    let ceiling = self.config.candidate_ceiling(role);
    if candidates.is_empty() {
      debug!(%name, "no plausible authority candidates");
      resolution.settle(local, PersonRecord::absent(name));
      return;
    }
    if candidates.len() > ceiling {
      debug!(%name, count = candidates.len(), ceiling, "too many candidates to trust");
      resolution.ambiguous.extend(local.originals.iter().cloned());
      resolution.settle(local, PersonRecord::absent(name));
      return;
    }

    let Some((candidate, status)) = candidates
      .iter()
      .find_map(|c| self.match_candidate(name, c).map(|status| (c, status)))
    else {
      debug!(%name, tried = candidates.len(), "no candidate matched");
      resolution.settle(local, PersonRecord::absent(name));
      return;
    };

    let record = PersonRecord::from_authority(candidate, status);
    let already = known
      .values()
      .chain(resolution.found())
      .find(|existing| existing.shares_identity_with(&record))
      .map(|existing| existing.display_name.clone());
    if let Some(existing) = already {
      debug!(%name, %existing, "same person already credited");
      for original in &local.originals {
        resolution.duplicates.insert(original.clone(), existing.clone());
      }
      return;
    }

    info!(%name, matched = %record.display_name, "resolved against authority");
    resolution.settle(local, record);
  }

  /// Table and career-range filters.
  fn plausible(&self, query: &FilmQuery, role: PersonRole, candidate: &AuthorityPerson) -> bool {
    if role == PersonRole::Cast && !query.cast_composition.admits(candidate.table) {
      return false;
    }
    if query.is_compilation {
      return true;
    }
    query.year.is_none_or(|year| {
      career_admits(
        candidate.career_start,
        candidate.career_end,
        year,
        self.config.career_padding_years,
      )
    })
  }

  /// Tests one candidate, strongest signal first.
  fn match_candidate(&self, local: &str, candidate: &AuthorityPerson) -> Option<RoleStatus> {
    let key = name_key(local);
    let their_name = name_key(&candidate.name);
    let aliases: Vec<(&str, String)> = candidate
      .aliases
      .iter()
      .map(|a| (a.as_str(), name_key(a)))
      .filter(|(_, k)| !k.is_empty())
      .collect();
    let with_alias = |alias: &str| RoleStatus::FoundWithAlias(alias.to_string());

    if their_name == key {
      return Some(RoleStatus::Found);
    }
    if let Some((alias, _)) = aliases.iter().find(|(_, k)| *k == key) {
      return Some(with_alias(*alias));
    }

    let per_word = self.config.levenshtein_slack;
    if within_edit_budget(local, &candidate.name, per_word) {
      return Some(RoleStatus::Found);
    }
    if let Some((alias, _)) = aliases
      .iter()
      .find(|(alias, _)| within_edit_budget(local, alias, per_word))
    {
      return Some(with_alias(*alias));
    }

    let length = self.config.soundex_length;
    let code = soundex(local, length);
    if soundex(&candidate.name, length) == code {
      return Some(RoleStatus::Found);
    }
    aliases
      .iter()
      .find(|(alias, _)| soundex(alias, length) == code)
      .map(|(alias, _)| with_alias(*alias))
  }
}

/// Whether `candidate` is within `per_word` edits of `local` in every word.
///
/// Words are paired in order. Names that split into a different number of
/// words ("JT Sloan" and "J T Sloan") are compared whole against a single
/// word's budget.
fn within_edit_budget(local: &str, candidate: &str, per_word: usize) -> bool {
  let words = |name: &str| -> Vec<String> {
    name
      .split_whitespace()
      .map(name_key)
      .filter(|k| !k.is_empty())
      .collect()
  };
  let (ours, theirs) = (words(local), words(candidate));
  if ours.is_empty() || theirs.is_empty() {
    return false;
  }
  if ours.len() == theirs.len() {
    return ours.iter().zip(&theirs).all(|(a, b)| levenshtein(a, b) <= per_word);
  }
  levenshtein(&ours.concat(), &theirs.concat()) <= per_word
}

/// Pass A for one name: exact name, exact alias, then containment in a name
/// or alias. Each tier is tried across every known record before the next.
fn reconcile_known(
  name: &str,
  known: &BTreeMap<String, PersonRecord>,
) -> Option<PersonRecord> {
  let key = name_key(name);
  if key.is_empty() {
    return None;
  }
  let alias_of = |record: &PersonRecord, test: &dyn Fn(&str) -> bool| {
    record
      .compare_aliases
      .iter()
      .position(|k| test(k.as_str()))
      .and_then(|i| record.aliases.get(i))
      .map(|alias| record.clone().with_role(RoleStatus::FoundWithAlias(alias.clone())))
  };

  known
    .values()
    .find(|r| r.compare_name == key)
    .cloned()
    .or_else(|| known.values().find_map(|r| alias_of(r, &|k: &str| k == key)))
    .or_else(|| known.values().find(|r| r.compare_name.contains(&key)).cloned())
    .or_else(|| known.values().find_map(|r| alias_of(r, &|k: &str| k.contains(key.as_str()))))
}
