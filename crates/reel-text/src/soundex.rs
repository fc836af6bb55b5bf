//! Odell–Russell Soundex.
//!
//! Only used as a last-resort phonetic fallback when matching names.

use crate::normalize::transliterate;

pub const DEFAULT_SOUNDEX_LENGTH: usize = 5;

/// Soundex digit per letter, `A` through `Z`.
const DIGITS: &[u8; 26] = b"01230120022455012623010202";

/// Phonetic code for `name`: first letter kept literally, consecutive
/// duplicate codes collapsed, `0`s elided, zero-padded or truncated to
/// `length`.
pub fn soundex(name: &str, length: usize) -> String {
  let letters: Vec<u8> = transliterate(&name.to_lowercase())
    .bytes()
    .filter(u8::is_ascii_alphabetic)
    .map(|b| b.to_ascii_uppercase())
    .collect();

  let mut codes: Vec<u8> = Vec::with_capacity(letters.len());
  for &letter in &letters {
    let digit = DIGITS[usize::from(letter - b'A')];
    if codes.last() != Some(&digit) {
      codes.push(digit);
    }
  }

  let mut code = String::with_capacity(length);
  if let Some(&first) = letters.first() {
    code.push(char::from(first));
    code.extend(codes.iter().skip(1).filter(|&&d| d != b'0').map(|&d| char::from(d)));
  }
  while code.len() < length {
    code.push('0');
  }
  code.truncate(length);
  code
}
