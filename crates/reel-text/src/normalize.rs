//! Comparison-string normaliser.
//!
//! Pipeline:
//!   raw &str
//!     └─ arabicise_trailing_numeral()   "Pissing III" → "Pissing 3"
//!          └─ trim + lower-case
//!               └─ canonicalise_punctuation()
//!                    └─ `&` → "and", ": " → " - "
//!                         └─ transliterate()        → ASCII
//!                              └─ strip_noise()     → [a-z0-9]*
//!
//! The output is pure lower-case ASCII alphanumerics and `normalize` is
//! idempotent.

use std::{borrow::Cow, sync::LazyLock};

use regex::Regex;
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

// ─── Options ─────────────────────────────────────────────────────────────────

/// Switches for the few rules that depend on who we are comparing against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeOptions {
  /// Leave `&` in place instead of spelling it out as "and". The authority
  /// database keeps ampersands in its own titles and studio names.
  pub keep_ampersand: bool,
  /// Skip trailing Roman numeral conversion. Studio names such as
  /// "Studio X" end in a capital letter that is not a sequel number.
  pub keep_numerals:  bool,
}

impl NormalizeOptions {
  /// Conventions of the authority database.
  pub const AUTHORITY: Self = Self { keep_ampersand: true, keep_numerals: false };
  /// Studio and distributor names.
  pub const STUDIO: Self = Self { keep_ampersand: false, keep_numerals: true };
}

// ─── Patterns ────────────────────────────────────────────────────────────────

/// An upper-case numeral as the last whitespace-delimited word.
static TRAILING_NUMERAL: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?:^|\s)([MDCLXVI]+)\s*$").expect("trailing numeral regex")
});

/// Well-formed numerals between 1 and 3999.
static CANONICAL_NUMERAL: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^M{0,3}(?:CM|CD|D?C{0,3})(?:XC|XL|L?X{0,3})(?:IX|IV|V?I{0,3})$")
    .expect("canonical numeral regex")
});

static DOMAIN_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(
    r"\bwww\.|\.(?:com|net|org|info|biz|tv|xxx|co\.uk|uk|de|nl|eu|us|fr|es|it)\b",
  )
  .expect("domain suffix regex")
});

static VOLUME_ABBREVIATION: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\bvols?\.").expect("volume abbreviation regex"));

/// Whole words dropped when they are not the only word left.
const VOLUME_WORDS: [&str; 3] = ["part", "volume", "volumes"];

// ─── Public API ──────────────────────────────────────────────────────────────

/// Normalise `text` with the default (source-site) conventions.
pub fn normalize(text: &str) -> String {
  normalize_with(text, NormalizeOptions::default())
}

/// Normalise `text` into a lower-case ASCII alphanumeric comparison string.
pub fn normalize_with(text: &str, options: NormalizeOptions) -> String {
  let s = if options.keep_numerals {
    Cow::Borrowed(text)
  } else {
    arabicise_trailing_numeral(text)
  };
  let s = s.trim().to_lowercase();
  let s = canonicalise_punctuation(&s);
  let s = if options.keep_ampersand {
    s
  } else {
    s.replace('&', " and ")
  };
  let s = s.replace(": ", " - ");
  let s = transliterate(&s);
  strip_noise(&s)
}

/// Decode a Roman numeral in 1..=3999. Lower-case input is rejected; titles
/// write numerals in capitals and lower-case runs are ordinary words.
pub fn roman_to_arabic(numeral: &str) -> Option<u32> {
  if numeral.is_empty() || !CANONICAL_NUMERAL.is_match(numeral) {
    return None;
  }

  let mut total = 0u32;
  let mut largest_seen = 0u32;
  for c in numeral.chars().rev() {
    let value = match c {
      'I' => 1,
      'V' => 5,
      'X' => 10,
      'L' => 50,
      'C' => 100,
      'D' => 500,
      'M' => 1000,
      _ => return None,
    };
    if value < largest_seen {
      total -= value;
    } else {
      total += value;
      largest_seen = value;
    }
  }
  Some(total)
}

// ─── Pipeline stages ─────────────────────────────────────────────────────────

fn arabicise_trailing_numeral(text: &str) -> Cow<'_, str> {
  let Some(numeral) = TRAILING_NUMERAL.captures(text).and_then(|c| c.get(1))
  else {
    return Cow::Borrowed(text);
  };
  let Some(value) = roman_to_arabic(numeral.as_str()) else {
    return Cow::Borrowed(text);
  };

  let mut out = String::with_capacity(text.len());
  out.push_str(&text[..numeral.start()]);
  out.push_str(&value.to_string());
  Cow::Owned(out)
}

/// Map typographic quotes to `'`/`"` and every dash variant to `-`.
pub(crate) fn canonicalise_punctuation(s: &str) -> String {
  s.chars()
    .map(|c| match c {
      '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' | '\u{2032}'
      | '\u{0060}' | '\u{00B4}' => '\'',
      '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' | '\u{2033}'
      | '\u{00AB}' | '\u{00BB}' => '"',
      '\u{00AD}' | '\u{058A}' | '\u{05BE}' | '\u{1400}' | '\u{1806}'
      | '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2014}'
      | '\u{2015}' | '\u{2043}' | '\u{2212}' | '\u{2E17}' | '\u{2E1A}'
      | '\u{2E3A}' | '\u{2E3B}' | '\u{301C}' | '\u{FE58}' | '\u{FE63}'
      | '\u{FF0D}' => '-',
      other => other,
    })
    .collect()
}

/// Reduce to ASCII: decompose, drop combining marks, spell out the common
/// ligatures and letters that have no decomposition, discard the rest.
pub(crate) fn transliterate(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  for c in s.nfkd() {
    if c.is_ascii() {
      out.push(c.to_ascii_lowercase());
      continue;
    }
    if is_combining_mark(c) {
      continue;
    }
    match c {
      'ß' => out.push_str("ss"),
      'æ' | 'Æ' => out.push_str("ae"),
      'œ' | 'Œ' => out.push_str("oe"),
      'ø' | 'Ø' => out.push('o'),
      'đ' | 'Đ' | 'ð' | 'Ð' => out.push('d'),
      'ł' | 'Ł' => out.push('l'),
      'þ' | 'Þ' => out.push_str("th"),
      'ı' => out.push('i'),
      'ħ' | 'Ħ' => out.push('h'),
      'ŋ' | 'Ŋ' => out.push('n'),
      _ => {}
    }
  }
  out
}

fn strip_noise(s: &str) -> String {
  let s = DOMAIN_SUFFIX.replace_all(s, " ");
  let s = VOLUME_ABBREVIATION.replace_all(&s, " ");

  let words: Vec<&str> = s.split_whitespace().collect();
  let kept: Vec<&str> = words
    .iter()
    .copied()
    .filter(|w| {
      let bare = w.trim_matches(|c: char| !c.is_ascii_alphanumeric());
      !VOLUME_WORDS.contains(&bare)
    })
    .collect();
  let joined = if kept.is_empty() {
    words.join(" ")
  } else {
    kept.join(" ")
  };

  strip_lone_ones(&joined)
    .chars()
    .filter(char::is_ascii_alphanumeric)
    .collect()
}

/// Drop every `1` that is not part of a longer number, so "Title" and
/// "Title 1" compare equal while "Title 12" keeps its digits.
fn strip_lone_ones(s: &str) -> String {
  let chars: Vec<char> = s.chars().collect();
  chars
    .iter()
    .enumerate()
    .filter(|&(i, &c)| {
      if c != '1' {
        return true;
      }
      let before = i.checked_sub(1).map(|j| chars[j].is_ascii_digit());
      let after = chars.get(i + 1).map(char::is_ascii_digit);
      before.unwrap_or(false) || after.unwrap_or(false)
    })
    .map(|(_, &c)| c)
    .collect()
}
