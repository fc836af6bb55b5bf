//! Error types for the reel-text parsers.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("filename does not follow `Studio - Title (Year)`: {0:?}")]
  UnrecognisedFilename(String),

  #[error("unrecognised release date: {0:?}")]
  InvalidDate(String),

  #[error("unrecognised duration: {0:?}")]
  InvalidDuration(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
