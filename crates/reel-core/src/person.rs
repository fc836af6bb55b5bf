//! People credited on a film and what we have learned about them.

use serde::{Deserialize, Serialize};

use crate::authority::AuthorityPerson;

/// Which credit list a name came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonRole {
  Cast,
  Director,
}

/// How (or whether) a name was tied to an authority identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "alias", rename_all = "snake_case")]
pub enum RoleStatus {
  Found,
  /// Matched only through one of the person's aliases.
  FoundWithAlias(String),
  AbsentFromAuthority,
  AuthorityUnavailable,
}

impl RoleStatus {
  pub fn is_found(&self) -> bool {
    matches!(self, Self::Found | Self::FoundWithAlias(_))
  }

  /// Text shown in the role column, e.g. `AKA: Jimmy Dean`.
  pub fn annotation(&self) -> Option<String> {
    match self {
      Self::FoundWithAlias(alias) => Some(format!("AKA: {alias}")),
      _ => None,
    }
  }
}

/// A resolved or partially-resolved identity.
///
/// Built through [`PersonRecord::from_authority`], [`PersonRecord::absent`] or
/// [`PersonRecord::unavailable`]; a record absent from the authority never
/// carries a URL or career range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRecord {
  pub display_name:    String,
  pub aliases:         Vec<String>,
  pub compare_name:    String,
  pub compare_aliases: Vec<String>,
  pub url:             Option<String>,
  pub career_start:    Option<i32>,
  pub career_end:      Option<i32>,
  pub role:            RoleStatus,
}

impl PersonRecord {
  pub fn from_authority(person: &AuthorityPerson, role: RoleStatus) -> Self {
    Self {
      display_name:    person.name.clone(),
      aliases:         person.aliases.clone(),
      compare_name:    reel_text::name_key(&person.name),
      compare_aliases: person.aliases.iter().map(|a| reel_text::name_key(a)).collect(),
      url:             person.url.clone(),
      career_start:    person.career_start,
      career_end:      person.career_end,
      role,
    }
  }

  /// A name the authority database has no record of.
  pub fn absent(name: &str) -> Self { Self::local_only(name, RoleStatus::AbsentFromAuthority) }

  /// A name we could not look up because the authority database refused or
  /// failed the request.
  pub fn unavailable(name: &str) -> Self {
    Self::local_only(name, RoleStatus::AuthorityUnavailable)
  }

  fn local_only(name: &str, role: RoleStatus) -> Self {
    Self {
      display_name: name.to_string(),
      aliases: Vec::new(),
      compare_name: reel_text::name_key(name),
      compare_aliases: Vec::new(),
      url: None,
      career_start: None,
      career_end: None,
      role,
    }
  }

  pub fn with_role(self, role: RoleStatus) -> Self { Self { role, ..self } }

  /// The compare name followed by every non-empty compare alias.
  pub fn identity_keys(&self) -> impl Iterator<Item = &str> {
    std::iter::once(self.compare_name.as_str())
      .chain(self.compare_aliases.iter().map(String::as_str))
      .filter(|k| !k.is_empty())
  }

  /// Whether the two records describe the same person under different
  /// spellings: any name or alias key in common.
  pub fn shares_identity_with(&self, other: &PersonRecord) -> bool {
    self
      .identity_keys()
      .any(|key| other.identity_keys().any(|theirs| theirs == key))
  }
}

/// Whether a career range, widened by `padding` years at each end, contains
/// `year`. Open ends admit everything on that side.
pub fn career_admits(
  start:   Option<i32>,
  end:     Option<i32>,
  year:    i32,
  padding: i32,
) -> bool {
  start.is_none_or(|s| year >= s - padding) && end.is_none_or(|e| year <= e + padding)
}
