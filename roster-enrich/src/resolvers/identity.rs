//! Identity back-fill
//!
//! When a row only carries the international ID, the Membership Authority's
//! record for it supplies the national ID.

use crate::error::AuthorityError;
use crate::pipeline::lookups::RowLookups;
use crate::types::PlayerIdentity;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityOutcome {
    /// Nothing needed filling, or the back-fill succeeded
    Resolved(PlayerIdentity),
    /// Back-fill failed; continue with the fields that are present
    Partial {
        identity: PlayerIdentity,
        error: AuthorityError,
    },
    /// Both IDs empty; no request was made
    Unresolvable,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityResolver;

impl IdentityResolver {
    pub fn new() -> Self {
        Self
    }

    pub async fn resolve(
        &self,
        identity: PlayerIdentity,
        lookups: &mut RowLookups<'_>,
    ) -> IdentityOutcome {
        if identity.is_empty() {
            return IdentityOutcome::Unresolvable;
        }

        let international_id = match (identity.national_id(), identity.international_id()) {
            (None, Some(international_id)) => international_id.to_string(),
            _ => return IdentityOutcome::Resolved(identity),
        };

        match lookups.player(&international_id).await {
            Ok(record) if !record.identifier.trim().is_empty() => {
                debug!(
                    international_id = %international_id,
                    national_id = %record.identifier,
                    "Back-filled national ID"
                );
                IdentityOutcome::Resolved(identity.with_national_id(&record.identifier))
            }
            Ok(_) => IdentityOutcome::Partial {
                identity,
                error: AuthorityError::Decode(format!(
                    "record for {international_id} has an empty identifier"
                )),
            },
            Err(error) => IdentityOutcome::Partial { identity, error },
        }
    }
}
