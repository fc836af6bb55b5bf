//! The matching engine: field matchers, the film locator and the identity
//! resolver, plus [`enrich`] which chains them for one film.
//!
//! Everything here is synchronous and free of I/O of its own; all lookups go
//! through the [`AuthorityClient`](reel_core::authority::AuthorityClient)
//! passed in by the caller.

pub mod enrich;
pub mod field;
pub mod locate;
pub mod names;
pub mod resolve;

pub use enrich::{Enrichment, enrich};
pub use locate::{FilmLocator, Location, LocatorState, Rejection};
pub use resolve::{IdentityResolver, Resolution};

#[cfg(test)]
mod tests;
