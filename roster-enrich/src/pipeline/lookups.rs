//! Row-scoped authority session
//!
//! Identity back-fill, membership aggregation and name reconciliation all
//! need the Membership Authority's record for the same identifiers. Within a
//! row each identifier is requested at most once and every stage sees the
//! same result. A `RowLookups` is created per row and dropped with it, so
//! nothing is carried between rows.

use crate::authority::AuthorityClient;
use crate::error::AuthorityError;
use crate::types::{ClubRegistrationCandidate, PlayerRecord};
use std::collections::HashMap;

pub struct RowLookups<'a> {
    client: &'a dyn AuthorityClient,
    players: HashMap<String, Result<PlayerRecord, AuthorityError>>,
    requests: usize,
}

impl<'a> RowLookups<'a> {
    pub fn new(client: &'a dyn AuthorityClient) -> Self {
        Self {
            client,
            players: HashMap::new(),
            requests: 0,
        }
    }

    pub async fn player(&mut self, id: &str) -> Result<PlayerRecord, AuthorityError> {
        if let Some(result) = self.players.get(id) {
            return result.clone();
        }

        self.requests += 1;
        let result = self.client.lookup_player(id).await;
        self.players.insert(id.to_string(), result.clone());
        result
    }

    pub async fn club_listing(
        &mut self,
        id: &str,
    ) -> Result<Vec<ClubRegistrationCandidate>, AuthorityError> {
        self.requests += 1;
        self.client.scrape_club_listing(id).await
    }

    /// Outbound requests issued so far for this row
    pub fn requests(&self) -> usize {
        self.requests
    }
}
