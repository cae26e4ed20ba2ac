//! roster-enrich - Chess roster eligibility enrichment
//!
//! Reads a roster CSV, enriches each player row with membership status,
//! club registration and reconciled name, and writes the results back row
//! by row.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use roster_common::config::TomlConfig;
use roster_common::sheet::CsvSheet;
use tracing::info;

use roster_enrich::authority::HttpAuthorityClient;
use roster_enrich::pipeline::{FixedDelay, RowEnrichmentOrchestrator};
use roster_enrich::resolvers::ClubRegistrationResolver;
use roster_enrich::sheet_io::SheetRoster;

/// Command-line arguments for roster-enrich
#[derive(Parser, Debug)]
#[command(name = "roster-enrich")]
#[command(about = "Enrich a chess player roster with membership and club registration data")]
#[command(version)]
struct Args {
    /// Roster CSV file
    input: PathBuf,

    /// Row holding the column headers (data starts on the next row)
    #[arg(long, default_value_t = 1)]
    header_row: u32,

    /// Write the enriched roster here instead of updating the input in place
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Config file (overrides ROSTER_CONFIG and the platform default)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pause between rows in milliseconds
    #[arg(long, env = "ROSTER_DELAY_MS")]
    delay_ms: Option<u64>,

    /// Log level for roster crates when RUST_LOG is unset
    #[arg(long, env = "ROSTER_LOG_LEVEL")]
    log_level: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    let started = Instant::now();

    let (mut config, config_source) =
        TomlConfig::resolve(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(delay_ms) = args.delay_ms {
        config.politeness.delay_ms = delay_ms;
    }
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }
    config.validate().context("Invalid configuration")?;

    roster_common::logging::init_tracing(&config.logging.level);

    info!("Starting roster-enrich {}", env!("CARGO_PKG_VERSION"));
    config_source.report();
    info!("Input: {}", args.input.display());

    let mut sheet = CsvSheet::open(&args.input)
        .with_context(|| format!("Failed to open {}", args.input.display()))?;
    if let Some(output) = args.output {
        sheet = sheet.redirect(output);
    }
    info!("Output: {}", sheet.target().display());

    let client = HttpAuthorityClient::new(&config).context("Failed to build HTTP client")?;
    let orchestrator = RowEnrichmentOrchestrator::new(
        Arc::new(client),
        Box::new(FixedDelay::from_millis(config.politeness.delay_ms)),
        ClubRegistrationResolver::from_config(&config.club),
    );

    let mut roster = SheetRoster::open(sheet, args.header_row).context("Failed to prepare roster sheet")?;
    let summary = orchestrator
        .run(&mut roster)
        .await
        .context("Enrichment aborted")?;

    info!(
        rows = summary.rows,
        active = summary.active,
        check_manually = summary.check_manually,
        registered = summary.registered,
        with_diagnostics = summary.with_diagnostics,
        "Enrichment complete"
    );
    info!("Time taken: {:.1?}", started.elapsed());

    Ok(())
}
