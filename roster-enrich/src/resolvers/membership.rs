//! Membership aggregation
//!
//! The two identifiers are looked up independently and OR-ed: the
//! authorities' datasets are maintained separately and may lag each other,
//! so one positive answer is enough. A failed lookup counts as "not shown
//! active" and never blocks evaluation of the other ID.

use crate::pipeline::lookups::RowLookups;
use crate::types::{Diagnostics, MembershipClassification, PlayerIdentity, Stage};
use tracing::debug;

#[derive(Debug, Clone, Copy, Default)]
pub struct MembershipAggregator;

impl MembershipAggregator {
    pub fn new() -> Self {
        Self
    }

    pub async fn aggregate(
        &self,
        identity: &PlayerIdentity,
        lookups: &mut RowLookups<'_>,
        diagnostics: &mut Diagnostics,
    ) -> MembershipClassification {
        let mut active = false;

        // Every ID is queried even after a positive answer so that failures
        // on either source still show up as diagnostics
        for id in identity.ids() {
            match lookups.player(id).await {
                Ok(record) => {
                    debug!(id = %id, membership = record.membership_active, "Membership lookup");
                    active |= record.membership_active;
                }
                Err(error) => diagnostics.record(Stage::Membership, id, error),
            }
        }

        if active {
            MembershipClassification::Active
        } else {
            MembershipClassification::CheckManually
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authority::fake::{player, FakeAuthority};
    use crate::error::AuthorityError;

    async fn classify(fake: &FakeAuthority, identity: PlayerIdentity) -> (MembershipClassification, usize) {
        let mut lookups = RowLookups::new(fake);
        let mut diagnostics = Diagnostics::new(2);
        let c = MembershipAggregator::new()
            .aggregate(&identity, &mut lookups, &mut diagnostics)
            .await;
        (c, diagnostics.into_entries().len())
    }

    #[tokio::test]
    async fn test_either_source_true_is_active() {
        let fake = FakeAuthority::new()
            .with_player("F1", player("N1", false, "", "", ""))
            .with_player("N1", player("N1", true, "", "", ""));
        assert_eq!(
            classify(&fake, PlayerIdentity::new("N1", "F1")).await,
            (MembershipClassification::Active, 0)
        );
    }

    #[tokio::test]
    async fn test_true_survives_other_source_failure() {
        let fake = FakeAuthority::new()
            .with_player("F1", player("N1", true, "", "", ""))
            .with_player_error("N1", AuthorityError::AmbiguousId { id: "N1".into(), count: 2 });
        assert_eq!(
            classify(&fake, PlayerIdentity::new("N1", "F1")).await,
            (MembershipClassification::Active, 1)
        );
    }

    #[tokio::test]
    async fn test_all_false_or_failed_needs_review() {
        let fake = FakeAuthority::new()
            .with_player("F1", player("N1", false, "", "", ""))
            .with_player_error("N1", AuthorityError::Network("down".into()));
        assert_eq!(
            classify(&fake, PlayerIdentity::new("N1", "F1")).await,
            (MembershipClassification::CheckManually, 1)
        );
    }

    #[tokio::test]
    async fn test_only_present_ids_are_queried() {
        let fake = FakeAuthority::new().with_player("F1", player("", true, "", "", ""));
        let (c, _) = classify(&fake, PlayerIdentity::new("", "F1")).await;
        assert_eq!(c, MembershipClassification::Active);
        assert_eq!(fake.calls().len(), 1);
    }
}
