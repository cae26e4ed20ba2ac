//! Row enrichment orchestrator
//!
//! Per-row stages:
//! ```text
//! Start → IdentityResolved → MembershipEvaluated → RegistrationEvaluated
//!       → NameReconciled → Emitted
//! ```
//! A row with no IDs at all jumps from `Start` to `Emitted` without
//! contacting any authority, as `CheckManually` unless the sheet already
//! records it as active. Every other stage runs even when an earlier one
//! failed; failures only blank the affected field.
//!
//! Rows are processed strictly one after another and each authority request
//! is awaited before the next is issued.

use super::lookups::RowLookups;
use super::politeness::PolitenessPolicy;
use super::{RowSink, RowSource, SourceRow};
use crate::authority::AuthorityClient;
use crate::error::EnrichResult;
use crate::resolvers::{
    ClubRegistrationResolver, IdentityOutcome, IdentityResolver, MembershipAggregator,
    NameReconciler,
};
use crate::types::{BatchSummary, Diagnostics, EnrichedRow, MembershipClassification, Stage};
use std::sync::Arc;
use tracing::{debug, info};

pub struct RowEnrichmentOrchestrator {
    client: Arc<dyn AuthorityClient>,
    politeness: Box<dyn PolitenessPolicy>,
    identity: IdentityResolver,
    membership: MembershipAggregator,
    club: ClubRegistrationResolver,
    names: NameReconciler,
}

impl RowEnrichmentOrchestrator {
    pub fn new(
        client: Arc<dyn AuthorityClient>,
        politeness: Box<dyn PolitenessPolicy>,
        club: ClubRegistrationResolver,
    ) -> Self {
        Self {
            client,
            politeness,
            identity: IdentityResolver::new(),
            membership: MembershipAggregator::new(),
            club,
            names: NameReconciler::new(),
        }
    }

    /// Enrich every row the source yields, emitting each as it completes
    ///
    /// The politeness pause runs before a row whose predecessor contacted an
    /// authority, so the batch never ends on a pause.
    pub async fn run<R>(&self, roster: &mut R) -> EnrichResult<BatchSummary>
    where
        R: RowSource + RowSink,
    {
        let mut summary = BatchSummary::default();
        let mut previous_contacted = false;

        while let Some(source_row) = roster.next_row()? {
            if previous_contacted {
                self.politeness.pause().await;
            }

            let (row, requests) = self.process_row(source_row).await;
            previous_contacted = requests > 0;

            roster.emit(&row)?;
            summary.record(&row);
            info!(
                row = row.row_index,
                membership = %row.membership,
                license = row.registration.as_ref().map(|r| r.license_code.as_str()).unwrap_or(""),
                diagnostics = row.diagnostics.len(),
                "Row enriched"
            );
        }

        Ok(summary)
    }

    /// Enrich a single row
    pub async fn enrich_row(&self, source_row: SourceRow) -> EnrichedRow {
        self.process_row(source_row).await.0
    }

    /// Enriched row plus the number of authority requests it took
    async fn process_row(&self, source_row: SourceRow) -> (EnrichedRow, usize) {
        let SourceRow {
            row_index,
            identity,
            stored_membership,
        } = source_row;

        let mut lookups = RowLookups::new(self.client.as_ref());
        let mut diagnostics = Diagnostics::new(row_index);
        let stored_active = stored_membership == Some(MembershipClassification::Active);

        // Start → IdentityResolved
        let identity = match self.identity.resolve(identity, &mut lookups).await {
            IdentityOutcome::Resolved(identity) => identity,
            IdentityOutcome::Partial { identity, error } => {
                let id = identity.international_id().unwrap_or_default().to_string();
                diagnostics.record(Stage::Identity, &id, error);
                identity
            }
            IdentityOutcome::Unresolvable => {
                let membership = if stored_active {
                    MembershipClassification::Active
                } else {
                    debug!(row = row_index, "No IDs on row, needs manual review");
                    MembershipClassification::CheckManually
                };
                let row = EnrichedRow {
                    row_index,
                    identity: Default::default(),
                    membership,
                    registration: None,
                    resolved_name: None,
                    diagnostics: Vec::new(),
                };
                return (row, 0);
            }
        };

        // → MembershipEvaluated
        let membership = if stored_active {
            debug!(row = row_index, "Membership already recorded as active");
            MembershipClassification::Active
        } else {
            self.membership
                .aggregate(&identity, &mut lookups, &mut diagnostics)
                .await
        };

        // → RegistrationEvaluated
        let registration = match self.club.resolve(identity.national_id(), &mut lookups).await {
            Ok(candidate) => Some(candidate),
            Err(error) => {
                let id = identity.national_id().unwrap_or_default().to_string();
                diagnostics.record(Stage::Registration, &id, error);
                None
            }
        };

        // → NameReconciled
        let name = self.names.resolve_name(&identity, &mut lookups).await;

        let requests = lookups.requests();
        let row = EnrichedRow {
            row_index,
            identity,
            membership,
            registration,
            resolved_name: (!name.is_empty()).then_some(name),
            diagnostics: diagnostics.into_entries(),
        };
        (row, requests)
    }
}
