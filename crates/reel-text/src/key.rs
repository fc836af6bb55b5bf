//! Comparison keys built on top of [`normalize`](crate::normalize).

use crate::normalize::{
  NormalizeOptions, canonicalise_punctuation, normalize, transliterate,
};

const LEADING_ARTICLES: [&str; 3] = ["the ", "a ", "an "];

/// Order-insensitive key: the digit run in original order followed by the
/// letters sorted alphabetically.
///
/// Titles differing only in word order collapse together; titles differing in
/// an embedded number ("12" vs "21") stay apart.
pub fn sort_key(normalized: &str) -> String {
  let mut digits = String::new();
  let mut letters: Vec<char> = Vec::with_capacity(normalized.len());
  for c in normalized.chars() {
    if c.is_ascii_digit() {
      digits.push(c);
    } else if !c.is_whitespace() {
      letters.push(c);
    }
  }
  letters.sort_unstable();
  digits.extend(letters);
  digits
}

/// `sort_key(normalize(text))`.
pub fn title_key(text: &str) -> String { sort_key(&normalize(text)) }

/// Alphanumeric-only lower-case form of a person's name, used for exact,
/// substring and edit-distance comparisons.
pub fn name_key(name: &str) -> String {
  let s = canonicalise_punctuation(&name.trim().to_lowercase());
  transliterate(&s)
    .chars()
    .filter(char::is_ascii_alphanumeric)
    .collect()
}

/// Number of whitespace-separated words in a display name.
pub fn word_count(name: &str) -> usize { name.split_whitespace().count() }

/// Drop a leading English article ("The", "A", "An") if any words remain.
pub fn strip_leading_article(title: &str) -> &str {
  let trimmed = title.trim_start();
  for article in LEADING_ARTICLES {
    if let Some(head) = trimmed.get(..article.len())
      && head.eq_ignore_ascii_case(article)
    {
      let rest = trimmed[article.len()..].trim_start();
      if !rest.is_empty() {
        return rest;
      }
    }
  }
  trimmed
}

/// Lower-case space-separated words suitable for an authority search box.
///
/// With [`NormalizeOptions::AUTHORITY`] ampersands are kept as their own word.
pub fn search_terms(text: &str, options: NormalizeOptions) -> String {
  let s = canonicalise_punctuation(&text.trim().to_lowercase());
  let mut spaced = String::with_capacity(s.len());
  for c in transliterate(&s).chars() {
    match c {
      c if c.is_ascii_alphanumeric() => spaced.push(c),
      // "men's" searches as "mens"
      '\'' => {}
      '&' if options.keep_ampersand => spaced.push_str(" & "),
      _ => spaced.push(' '),
    }
  }
  spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}
