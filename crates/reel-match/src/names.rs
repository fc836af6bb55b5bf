//! Clean-up of scraped credit lists before resolution.

use std::sync::LazyLock;

use regex::Regex;

/// `Leo Rocha (aka Leo R.)`, `Leo Rocha [as Leo]`
static AKA_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"\s*[(\[][^()\[\]]*[)\]]\s*$").expect("aka suffix regex")
});

static POSSESSIVE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?i)['\u{2019}]s\b").expect("possessive regex"));

/// One name worth resolving, and every scraped string it stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalName {
  /// Cleaned form used for searching and comparison.
  pub name:      String,
  /// Scraped spellings folded into this name, first occurrence first.
  pub originals: Vec<String>,
}

/// Reduce scraped names to the set worth resolving.
///
/// Parenthetical suffixes, possessives and periods are removed. Duplicates
/// (case-insensitive) fold into the first spelling, and a name that is a
/// substring of a longer surviving name folds into it, so "Leo" does not
/// shadow "Leo Rocha". Names with no comparable characters are left out.
pub fn prepare_local_names<I, S>(names: I) -> Vec<LocalName>
where
  I: IntoIterator<Item = S>,
  S: AsRef<str>,
{
  let mut deduped: Vec<LocalName> = Vec::new();
  for raw in names {
    let raw = raw.as_ref();
    let name = clean_name(raw);
    if reel_text::name_key(&name).is_empty() {
      continue;
    }
    match deduped
      .iter_mut()
      .find(|seen| seen.name.to_lowercase() == name.to_lowercase())
    {
      Some(seen) => seen.originals.push(raw.to_string()),
      None => deduped.push(LocalName { name, originals: vec![raw.to_string()] }),
    }
  }

  let lowered: Vec<String> = deduped.iter().map(|n| n.name.to_lowercase()).collect();
  let shadowed_by = |i: usize| {
    (0..lowered.len()).find(|&j| {
      j != i && lowered[j].len() > lowered[i].len() && lowered[j].contains(&lowered[i])
    })
  };
  let survives: Vec<bool> = (0..deduped.len()).map(|i| shadowed_by(i).is_none()).collect();

  let mut prepared: Vec<Option<LocalName>> = deduped.into_iter().map(Some).collect();
  for i in 0..prepared.len() {
    if survives[i] {
      continue;
    }
    // Containment is transitive, so some survivor always absorbs a
    // shadowed name.
    let host = (0..lowered.len()).find(|&j| survives[j] && lowered[j].contains(&lowered[i]));
    if let Some(host) = host
      && let Some(absorbed) = prepared[i].take()
      && let Some(target) = prepared[host].as_mut()
    {
      target.originals.extend(absorbed.originals);
    }
  }
  prepared.into_iter().flatten().collect()
}

fn clean_name(raw: &str) -> String {
  let s = AKA_SUFFIX.replace(raw.trim(), "");
  let s = POSSESSIVE.replace_all(&s, "");
  let s = s.replace('.', "");
  s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
  use super::*;

  fn names(prepared: &[LocalName]) -> Vec<&str> {
    prepared.iter().map(|n| n.name.as_str()).collect()
  }

  #[test]
  fn strips_aka_possessive_and_periods() {
    let prepared = prepare_local_names(["Leo Rocha (aka Leo R.)", "Dean's", "J.T. Sloan"]);
    assert_eq!(names(&prepared), vec!["Leo Rocha", "Dean", "JT Sloan"]);
    assert_eq!(prepared[2].originals, vec!["J.T. Sloan".to_string()]);
  }

  #[test]
  fn initial_with_period_keeps_its_word() {
    let prepared = prepare_local_names(["J. Deano"]);
    assert_eq!(names(&prepared), vec!["J Deano"]);
  }

  #[test]
  fn duplicates_fold_into_first_spelling() {
    let prepared = prepare_local_names(["Leo Rocha", "LEO ROCHA", "leo  rocha"]);
    assert_eq!(names(&prepared), vec!["Leo Rocha"]);
    assert_eq!(prepared[0].originals, vec!["Leo Rocha", "LEO ROCHA", "leo  rocha"]);
  }

  #[test]
  fn shorter_name_inside_longer_is_absorbed() {
    let prepared = prepare_local_names(["Leo", "Leo Rocha", "Rocco"]);
    assert_eq!(names(&prepared), vec!["Leo Rocha", "Rocco"]);
    assert_eq!(prepared[0].originals, vec!["Leo Rocha", "Leo"]);
  }

  #[test]
  fn partial_word_is_a_substring_too() {
    let prepared = prepare_local_names(["Leon", "Leonardo Rocha"]);
    assert_eq!(names(&prepared), vec!["Leonardo Rocha"]);
    assert_eq!(prepared[0].originals, vec!["Leonardo Rocha", "Leon"]);
  }

  #[test]
  fn nested_shadows_land_on_the_survivor() {
    let prepared = prepare_local_names(["Leo", "Leo R", "Leo Rocha"]);
    assert_eq!(names(&prepared), vec!["Leo Rocha"]);
    assert_eq!(prepared[0].originals.len(), 3);
  }

  #[test]
  fn empty_and_punctuation_only_names_are_dropped() {
    assert!(prepare_local_names(["", " . ", "()"]).is_empty());
  }
}
