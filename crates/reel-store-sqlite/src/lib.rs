//! SQLite mirror of authority database records.
//!
//! [`SqliteMirror`] answers [`AuthorityClient`](reel_core::authority::AuthorityClient)
//! queries from a local file populated by [`SqliteMirror::import`], so the
//! matching engine can run without touching the network.

mod encode;
mod schema;
mod store;

pub mod dump;
pub mod error;

pub use dump::{AuthorityDump, DumpPerson, ImportSummary};
pub use error::{Error, Result};
pub use store::SqliteMirror;
