//! Club registration resolution
//!
//! National IDs outside the Club Authority's region are rejected before any
//! request. Among the scraped candidates the first active one with a license
//! code wins; listing order is preserved from the source page.

use crate::error::AuthorityError;
use crate::pipeline::lookups::RowLookups;
use crate::types::ClubRegistrationCandidate;
use roster_common::config::ClubConfig;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct ClubRegistrationResolver {
    min_len: usize,
    region_code: String,
}

impl ClubRegistrationResolver {
    pub fn new(min_len: usize, region_code: impl Into<String>) -> Self {
        Self {
            min_len,
            region_code: region_code.into(),
        }
    }

    pub fn from_config(config: &ClubConfig) -> Self {
        Self::new(config.id_min_len, config.region_code.clone())
    }

    /// Reject IDs the Club Authority cannot know about
    pub fn validate(&self, national_id: Option<&str>) -> Result<String, AuthorityError> {
        let id = national_id.map(str::trim).unwrap_or_default();

        if id.is_empty() {
            return Err(AuthorityError::Validation("national ID is empty".to_string()));
        }
        if id.chars().count() < self.min_len {
            return Err(AuthorityError::Validation(format!(
                "{id} is shorter than {} characters",
                self.min_len
            )));
        }
        if !id.to_ascii_uppercase().contains(&self.region_code.to_ascii_uppercase()) {
            return Err(AuthorityError::Validation(format!(
                "{id} does not carry region code {}",
                self.region_code
            )));
        }
        Ok(id.to_string())
    }

    pub async fn resolve(
        &self,
        national_id: Option<&str>,
        lookups: &mut RowLookups<'_>,
    ) -> Result<ClubRegistrationCandidate, AuthorityError> {
        let id = self.validate(national_id)?;
        let candidates = lookups.club_listing(&id).await?;
        debug!(id = %id, candidates = candidates.len(), "Selecting club registration");
        select_candidate(&id, candidates)
    }
}

/// First candidate that is active and has a license code
pub fn select_candidate(
    id: &str,
    candidates: Vec<ClubRegistrationCandidate>,
) -> Result<ClubRegistrationCandidate, AuthorityError> {
    candidates
        .into_iter()
        .filter(|c| c.is_active)
        .find(|c| !c.license_code.is_empty())
        .ok_or_else(|| AuthorityError::NotFound(id.to_string()))
}
