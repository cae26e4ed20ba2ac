//! Error types for roster-enrich
//!
//! [`AuthorityError`] covers everything that can go wrong talking to one
//! authority about one identifier. These are always recoverable: the resolver
//! that issued the call turns them into a row diagnostic.
//!
//! [`EnrichError`] is fatal to the whole batch (row store failures).

use thiserror::Error;

/// Per-identifier authority failure
///
/// `Clone` so a single lookup result can be shared by every stage of a row.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthorityError {
    /// Request failed or returned a non-success status
    #[error("Network error: {0}")]
    Network(String),

    /// Response body does not have the expected JSON/HTML shape
    #[error("Decode error: {0}")]
    Decode(String),

    /// Zero matching records
    #[error("No record found for {0}")]
    NotFound(String),

    /// More than one matching record; never auto-disambiguated
    #[error("Identifier {id} matched {count} records")]
    AmbiguousId { id: String, count: usize },

    /// Empty or malformed identifier, rejected before any request
    #[error("Invalid identifier: {0}")]
    Validation(String),
}

/// Batch-aborting failure
#[derive(Debug, Error)]
pub enum EnrichError {
    /// Row store read/write/persist failure
    #[error("Row store error: {0}")]
    Store(#[from] roster_common::Error),

    /// The sheet's header row cannot be mapped to identity columns
    #[error("Sheet layout error: {0}")]
    Layout(String),
}

pub type EnrichResult<T> = Result<T, EnrichError>;
