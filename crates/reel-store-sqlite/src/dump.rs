//! JSON dump format accepted by [`SqliteMirror::import`](crate::SqliteMirror::import).
//!
//! ```json
//! {
//!   "films":  [{ "title": "Boys In The Sand", "url": "…", "studios": ["…"],
//!                "cast": [{ "name": "Leo Rocha", "table": "male" }] }],
//!   "people": [{ "name": "Chi Chi LaRue", "roles": ["director"] }]
//! }
//! ```
//!
//! People credited on a film are searchable in that role without appearing
//! under `people`; the `people` list adds detail and extra roles.

use std::path::Path;

use reel_core::{
  authority::{AuthorityFilm, AuthorityPerson},
  person::PersonRole,
};
use serde::{Deserialize, Serialize};

use crate::Result;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthorityDump {
  #[serde(default)]
  pub films:  Vec<AuthorityFilm>,
  #[serde(default)]
  pub people: Vec<DumpPerson>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DumpPerson {
  #[serde(flatten)]
  pub person: AuthorityPerson,
  #[serde(default)]
  pub roles:  Vec<PersonRole>,
}

impl AuthorityDump {
  pub fn from_json(json: &str) -> Result<Self> { Ok(serde_json::from_str(json)?) }

  pub fn read(path: impl AsRef<Path>) -> Result<Self> {
    let text = std::fs::read_to_string(path)?;
    Self::from_json(&text)
  }
}

/// Row counts written by one import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
  pub films:   usize,
  pub people:  usize,
  pub credits: usize,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn sparse_dump_parses() {
    let dump = AuthorityDump::from_json(
      r#"{
        "films": [{ "title": "Boys In The Sand", "url": "https://authority.test/film/boys" }],
        "people": [{ "name": "Chi Chi LaRue", "roles": ["director"] }]
      }"#,
    )
    .unwrap();
    assert_eq!(dump.films.len(), 1);
    assert!(dump.films[0].studios.is_empty());
    assert_eq!(dump.people[0].person.name, "Chi Chi LaRue");
    assert_eq!(dump.people[0].roles, vec![PersonRole::Director]);
  }

  #[test]
  fn empty_object_is_an_empty_dump() {
    let dump = AuthorityDump::from_json("{}").unwrap();
    assert!(dump.films.is_empty() && dump.people.is_empty());
  }
}
