//! In-memory [`AuthorityClient`] for tests
//!
//! Answers from canned tables and records every call in order, so callers can
//! assert exactly which requests a pipeline issued. Player lookups without a
//! canned answer resolve to `NotFound`; listings to an empty page.

use super::AuthorityClient;
use crate::error::AuthorityError;
use crate::types::{ClubRegistrationCandidate, PlayerRecord};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    LookupPlayer(String),
    ScrapeClubListing(String),
}

#[derive(Default)]
pub struct FakeAuthority {
    players: HashMap<String, Result<PlayerRecord, AuthorityError>>,
    listings: HashMap<String, Result<Vec<ClubRegistrationCandidate>, AuthorityError>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeAuthority {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_player(mut self, id: &str, record: PlayerRecord) -> Self {
        self.players.insert(id.to_string(), Ok(record));
        self
    }

    pub fn with_player_error(mut self, id: &str, error: AuthorityError) -> Self {
        self.players.insert(id.to_string(), Err(error));
        self
    }

    pub fn with_listing(mut self, id: &str, candidates: Vec<ClubRegistrationCandidate>) -> Self {
        self.listings.insert(id.to_string(), Ok(candidates));
        self
    }

    pub fn with_listing_error(mut self, id: &str, error: AuthorityError) -> Self {
        self.listings.insert(id.to_string(), Err(error));
        self
    }

    /// Every call so far, in issue order
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn log(&self, call: Call) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

/// Record with the given identifier, membership flag and name fragments
pub fn player(identifier: &str, active: bool, first: &str, middle: &str, last: &str) -> PlayerRecord {
    PlayerRecord {
        identifier: identifier.to_string(),
        membership_active: active,
        first_name: first.to_string(),
        middle_name: middle.to_string(),
        last_name: last.to_string(),
    }
}

/// Listing candidate; any non-empty `status` marks it active
pub fn candidate(name: &str, license: &str, status: &str) -> ClubRegistrationCandidate {
    ClubRegistrationCandidate {
        display_name: name.to_string(),
        license_code: license.to_string(),
        is_active: !status.is_empty(),
    }
}

#[async_trait]
impl AuthorityClient for FakeAuthority {
    async fn lookup_player(&self, id: &str) -> Result<PlayerRecord, AuthorityError> {
        self.log(Call::LookupPlayer(id.to_string()));
        self.players
            .get(id)
            .cloned()
            .unwrap_or_else(|| Err(AuthorityError::NotFound(id.to_string())))
    }

    async fn scrape_club_listing(
        &self,
        id: &str,
    ) -> Result<Vec<ClubRegistrationCandidate>, AuthorityError> {
        self.log(Call::ScrapeClubListing(id.to_string()));
        self.listings.get(id).cloned().unwrap_or_else(|| Ok(Vec::new()))
    }
}
