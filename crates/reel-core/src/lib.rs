//! Core types and trait definitions for Reel.
//!
//! This crate is deliberately free of HTTP and database dependencies. It
//! describes what we know about a film locally ([`film::FilmQuery`]), what we
//! learn about people ([`person::PersonRecord`]), and the seam to the
//! authority database ([`authority::AuthorityClient`]).

pub mod authority;
pub mod config;
pub mod error;
pub mod film;
pub mod outcome;
pub mod person;

pub use error::{Error, Result};
