//! Error types for `reel-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("film title is empty")]
  EmptyTitle,

  #[error("studio name is empty")]
  EmptyStudio,

  #[error("title has no comparable characters: {0:?}")]
  NoComparableTitle(String),

  #[error("invalid year: {0}")]
  InvalidYear(i32),

  #[error("text error: {0}")]
  Text(#[from] reel_text::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
