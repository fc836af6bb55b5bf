//! Error type for `reel-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("i/o error: {0}")]
  Io(#[from] std::io::Error),

  #[error("date parse error: {0}")]
  DateParse(String),

  #[error("unknown {kind} value in database: {value:?}")]
  UnknownValue { kind: &'static str, value: String },

  #[error("no film stored at {0}")]
  FilmNotFound(String),

  /// A previous holder of the connection panicked.
  #[error("database connection poisoned")]
  Poisoned,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
