//! Authority clients
//!
//! Two independent third-party sources:
//! - Membership Authority: JSON player lookup by national or international ID
//! - Club Authority: HTML registration listing searched by national ID
//!
//! [`AuthorityClient`] is the seam the resolvers depend on. [`HttpAuthorityClient`]
//! is the network implementation; tests substitute the in-memory fake
//! (`test-util` feature).

pub mod club_listing;
#[cfg(any(test, feature = "test-util"))]
pub mod fake;
pub mod http;
pub mod membership;

pub use http::HttpAuthorityClient;

use crate::error::AuthorityError;
use crate::types::{ClubRegistrationCandidate, PlayerRecord};
use async_trait::async_trait;

#[async_trait]
pub trait AuthorityClient: Send + Sync {
    /// Look up exactly one player record by national or international ID
    async fn lookup_player(&self, id: &str) -> Result<PlayerRecord, AuthorityError>;

    /// First results page of the Club Authority listing for a national ID,
    /// in listing order
    async fn scrape_club_listing(
        &self,
        id: &str,
    ) -> Result<Vec<ClubRegistrationCandidate>, AuthorityError>;
}
