//! Row enrichment pipeline
//!
//! Rows are pulled from a [`RowSource`], enriched one at a time and pushed to
//! a [`RowSink`] immediately. Store failures on either side abort the batch;
//! everything an authority does wrong stays inside the row.

pub mod lookups;
pub mod orchestrator;
pub mod politeness;

pub use orchestrator::RowEnrichmentOrchestrator;
pub use politeness::{FixedDelay, NoDelay, PolitenessPolicy};

use crate::types::{EnrichedRow, MembershipClassification, PlayerIdentity};

/// One data row as read from the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRow {
    pub row_index: u32,
    pub identity: PlayerIdentity,
    /// Classification already stored by an earlier run, if any
    pub stored_membership: Option<MembershipClassification>,
}

pub trait RowSource {
    /// Next data row, or `None` once the table has ended
    fn next_row(&mut self) -> roster_common::Result<Option<SourceRow>>;
}

pub trait RowSink {
    /// Write and persist one finished row
    fn emit(&mut self, row: &EnrichedRow) -> roster_common::Result<()>;
}
