//! The verdict returned by every field matcher.

use serde::{Deserialize, Serialize};

/// `Fail` is a normal outcome meaning "this candidate is not our film, try
/// the next one"; it never aborts a resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum MatchOutcome {
  Pass,
  Fail(String),
}

impl MatchOutcome {
  pub fn fail(reason: impl Into<String>) -> Self { Self::Fail(reason.into()) }

  pub fn is_pass(&self) -> bool { matches!(self, Self::Pass) }

  /// Run `next` only if this outcome passed.
  pub fn and_then(self, next: impl FnOnce() -> MatchOutcome) -> MatchOutcome {
    match self {
      Self::Pass => next(),
      fail => fail,
    }
  }

  pub fn reason(&self) -> Option<&str> {
    match self {
      Self::Pass => None,
      Self::Fail(reason) => Some(reason),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn and_then_short_circuits_on_fail() {
    let mut called = false;
    let out = MatchOutcome::fail("title").and_then(|| {
      called = true;
      MatchOutcome::Pass
    });
    assert!(!called);
    assert_eq!(out.reason(), Some("title"));
  }

  #[test]
  fn and_then_chains_passes() {
    let out = MatchOutcome::Pass.and_then(|| MatchOutcome::fail("studio"));
    assert_eq!(out, MatchOutcome::Fail("studio".into()));
  }

  #[test]
  fn serialises_with_reason() {
    let json = serde_json::to_string(&MatchOutcome::fail("too long")).unwrap();
    assert_eq!(json, r#"{"outcome":"fail","reason":"too long"}"#);
  }
}
