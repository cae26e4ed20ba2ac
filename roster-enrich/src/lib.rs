//! roster-enrich library interface
//!
//! Enriches a chess player roster with membership status, club registration
//! and a reconciled display name gathered from independent third-party
//! authorities. Exposes the pipeline pieces for the binary and for
//! integration testing.

pub mod authority;
pub mod error;
pub mod pipeline;
pub mod resolvers;
pub mod sheet_io;
pub mod types;

pub use crate::error::{AuthorityError, EnrichError, EnrichResult};
