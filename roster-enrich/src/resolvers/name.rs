//! Display name reconciliation
//!
//! The international record's name wins when it is non-empty; the national
//! record is the fallback. Lookup failures here are not recorded again: the
//! same memoized results were already reported by the membership stage.

use crate::pipeline::lookups::RowLookups;
use crate::types::PlayerIdentity;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default)]
pub struct NameReconciler;

impl NameReconciler {
    pub fn new() -> Self {
        Self
    }

    /// Reconciled name; empty when neither source had one
    pub async fn resolve_name(
        &self,
        identity: &PlayerIdentity,
        lookups: &mut RowLookups<'_>,
    ) -> String {
        let international = name_for(identity.international_id(), lookups).await;
        let national = name_for(identity.national_id(), lookups).await;

        if international.is_empty() {
            national
        } else {
            international
        }
    }
}

async fn name_for(id: Option<&str>, lookups: &mut RowLookups<'_>) -> String {
    let Some(id) = id else {
        return String::new();
    };

    match lookups.player(id).await {
        Ok(record) => record.display_name(),
        Err(error) => {
            debug!(id = %id, %error, "No name from lookup");
            String::new()
        }
    }
}
