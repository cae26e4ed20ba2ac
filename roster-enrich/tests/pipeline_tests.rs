//! Orchestrator behaviour over an in-memory roster
//!
//! Uses the in-memory authority so every outbound request is visible.

use std::sync::Arc;

use roster_enrich::authority::fake::{candidate, player, Call, FakeAuthority};
use roster_enrich::error::AuthorityError;
use roster_enrich::pipeline::{
    NoDelay, PolitenessPolicy, RowEnrichmentOrchestrator, RowSink, RowSource, SourceRow,
};
use roster_enrich::resolvers::ClubRegistrationResolver;
use roster_enrich::types::{EnrichedRow, MembershipClassification, PlayerIdentity, Stage};

/// Roster backed by vectors; records emitted rows in order
#[derive(Default)]
struct MemoryRoster {
    pending: Vec<SourceRow>,
    emitted: Vec<EnrichedRow>,
    fail_emit_at: Option<u32>,
}

impl MemoryRoster {
    fn new(rows: Vec<SourceRow>) -> Self {
        let mut pending = rows;
        pending.reverse();
        Self {
            pending,
            ..Default::default()
        }
    }
}

impl RowSource for MemoryRoster {
    fn next_row(&mut self) -> roster_common::Result<Option<SourceRow>> {
        Ok(self.pending.pop())
    }
}

impl RowSink for MemoryRoster {
    fn emit(&mut self, row: &EnrichedRow) -> roster_common::Result<()> {
        if self.fail_emit_at == Some(row.row_index) {
            return Err(roster_common::Error::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )));
        }
        self.emitted.push(row.clone());
        Ok(())
    }
}

/// Counts pauses instead of sleeping
#[derive(Default, Clone)]
struct CountingDelay(Arc<std::sync::atomic::AtomicUsize>);

#[async_trait::async_trait]
impl PolitenessPolicy for CountingDelay {
    async fn pause(&self) {
        self.0.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    }
}

fn row(index: u32, national: &str, international: &str) -> SourceRow {
    SourceRow {
        row_index: index,
        identity: PlayerIdentity::new(national, international),
        stored_membership: None,
    }
}

fn orchestrator(fake: Arc<FakeAuthority>) -> RowEnrichmentOrchestrator {
    RowEnrichmentOrchestrator::new(fake, Box::new(NoDelay), ClubRegistrationResolver::new(5, "MH"))
}

#[tokio::test]
async fn test_empty_identity_short_circuits() {
    let fake = Arc::new(FakeAuthority::new());
    let row = orchestrator(fake.clone()).enrich_row(row(2, "", " ")).await;

    assert_eq!(row.membership, MembershipClassification::CheckManually);
    assert_eq!(row.registration, None);
    assert_eq!(row.resolved_name, None);
    assert!(row.diagnostics.is_empty());
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn test_full_row_enrichment() {
    let fake = Arc::new(
        FakeAuthority::new()
            .with_player("FIDE123", player("25MH00421", false, "Jane", "Q", "Doe"))
            .with_player("25MH00421", player("25MH00421", true, "J", "", "Doe"))
            .with_listing(
                "25MH00421",
                vec![candidate("Jane Doe", "", "active"), candidate("Jane Doe", "PO77", "active")],
            ),
    );

    let row = orchestrator(fake.clone()).enrich_row(row(3, "", "FIDE123")).await;

    assert_eq!(row.identity, PlayerIdentity::new("25MH00421", "FIDE123"));
    assert_eq!(row.membership, MembershipClassification::Active);
    assert_eq!(row.registration.as_ref().map(|r| r.license_code.as_str()), Some("PO77"));
    assert_eq!(row.resolved_name.as_deref(), Some("Jane Q Doe"));
    assert!(row.diagnostics.is_empty());

    // Each identifier is looked up once even though three stages use it
    assert_eq!(
        fake.calls(),
        vec![
            Call::LookupPlayer("FIDE123".into()),
            Call::LookupPlayer("25MH00421".into()),
            Call::ScrapeClubListing("25MH00421".into()),
        ]
    );
}

#[tokio::test]
async fn test_failed_backfill_continues_with_international_only() {
    let fake = Arc::new(
        FakeAuthority::new().with_player_error("FIDE123", AuthorityError::Network("down".into())),
    );

    let row = orchestrator(fake.clone()).enrich_row(row(4, "", "FIDE123")).await;

    assert_eq!(row.identity, PlayerIdentity::new("", "FIDE123"));
    assert_eq!(row.membership, MembershipClassification::CheckManually);
    assert_eq!(row.registration, None);
    assert_eq!(row.resolved_name, None);

    let stages: Vec<Stage> = row.diagnostics.iter().map(|d| d.stage).collect();
    assert_eq!(stages, vec![Stage::Identity, Stage::Membership, Stage::Registration]);
    assert!(matches!(row.diagnostics[2].error, AuthorityError::Validation(_)));

    // Back-fill and membership share the single failed lookup; no scrape
    assert_eq!(fake.calls(), vec![Call::LookupPlayer("FIDE123".into())]);
}

#[tokio::test]
async fn test_international_active_wins_over_failing_national() {
    let fake = Arc::new(
        FakeAuthority::new()
            .with_player("FIDE9", player("25MH00999", true, "Ravi", "", "Patil"))
            .with_player_error(
                "25MH00999",
                AuthorityError::AmbiguousId { id: "25MH00999".into(), count: 3 },
            ),
    );

    let row = orchestrator(fake).enrich_row(row(5, "25MH00999", "FIDE9")).await;

    assert_eq!(row.membership, MembershipClassification::Active);
    assert_eq!(row.resolved_name.as_deref(), Some("Ravi Patil"));
}

#[tokio::test]
async fn test_stored_active_is_kept_without_membership_recheck() {
    let fake = Arc::new(
        FakeAuthority::new().with_player("25MH00421", player("25MH00421", false, "J", "", "Doe")),
    );
    let mut source = row(6, "25MH00421", "");
    source.stored_membership = Some(MembershipClassification::Active);

    let row = orchestrator(fake).enrich_row(source).await;

    assert_eq!(row.membership, MembershipClassification::Active);
}

#[tokio::test]
async fn test_stored_active_kept_on_row_without_ids() {
    let fake = Arc::new(FakeAuthority::new());
    let mut source = row(7, "", "");
    source.stored_membership = Some(MembershipClassification::Active);

    let row = orchestrator(fake.clone()).enrich_row(source).await;

    assert_eq!(row.membership, MembershipClassification::Active);
    assert!(row.diagnostics.is_empty());
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn test_run_emits_every_row_in_order_and_pauses_between_rows() {
    let fake = Arc::new(
        FakeAuthority::new().with_player("25MH00001", player("25MH00001", true, "A", "", "B")),
    );
    let delay = CountingDelay::default();
    let orchestrator = RowEnrichmentOrchestrator::new(
        fake,
        Box::new(delay.clone()),
        ClubRegistrationResolver::new(5, "MH"),
    );
    let mut roster = MemoryRoster::new(vec![
        row(2, "25MH00001", ""),
        row(3, "", ""),
        row(4, "X", ""),
    ]);

    let summary = orchestrator.run(&mut roster).await.unwrap();

    let indices: Vec<u32> = roster.emitted.iter().map(|r| r.row_index).collect();
    assert_eq!(indices, vec![2, 3, 4]);
    assert_eq!(summary.rows, 3);
    assert_eq!(summary.active, 1);
    assert_eq!(summary.check_manually, 2);
    // Only row 3 follows a row that made requests; nothing waits after row 4
    assert_eq!(delay.0.load(std::sync::atomic::Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_single_contacting_row_never_pauses() {
    let fake = Arc::new(FakeAuthority::new());
    let delay = CountingDelay::default();
    let orchestrator = RowEnrichmentOrchestrator::new(
        fake.clone(),
        Box::new(delay.clone()),
        ClubRegistrationResolver::new(5, "MH"),
    );
    let mut roster = MemoryRoster::new(vec![row(2, "25MH00001", "")]);

    orchestrator.run(&mut roster).await.unwrap();

    assert!(!fake.calls().is_empty());
    assert_eq!(delay.0.load(std::sync::atomic::Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_sink_failure_aborts_batch() {
    let fake = Arc::new(FakeAuthority::new());
    let mut roster = MemoryRoster::new(vec![row(2, "", ""), row(3, "", ""), row(4, "", "")]);
    roster.fail_emit_at = Some(3);

    let result = orchestrator(fake).run(&mut roster).await;

    assert!(result.is_err());
    assert_eq!(roster.emitted.len(), 1);
    assert_eq!(roster.pending.len(), 1, "row 4 must not be read after the failure");
}
