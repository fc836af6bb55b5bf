//! Text canonicalisation for Reel.
//!
//! Turns free-text titles, studio names and cast/director names scraped from
//! arbitrary HTML into comparison strings. Pure synchronous; no HTTP or
//! database dependencies.
//!
//! # Quick start
//!
//! ```
//! use reel_text::{normalize, sort_key};
//!
//! let a = sort_key(&normalize("The Best of Zak Spears"));
//! let b = sort_key(&normalize("Best of Zak Spears, The"));
//! assert_eq!(a, b);
//! ```

pub mod error;
mod filename;
mod key;
mod normalize;
mod parse;
mod soundex;

pub use error::{Error, Result};
pub use filename::{ParsedFilename, parse_filename};
pub use key::{
  name_key, search_terms, sort_key, strip_leading_article, title_key,
  word_count,
};
pub use normalize::{
  NormalizeOptions, normalize, normalize_with, roman_to_arabic,
};
pub use parse::{DatePrecision, ReleaseDate, parse_duration_minutes, parse_release_date};
pub use soundex::{DEFAULT_SOUNDEX_LENGTH, soundex};
