use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use strikehit_core::pipeline::{self, FixedDelay};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "strikehit_worker")]
struct Args {
    /// Alerts CSV (Time,Sym,Strike,Spot,C/P,Exp,Orders,Vol,Prems,ITM).
    #[arg(long, default_value = "alerts.csv")]
    alerts: PathBuf,

    /// Report CSV; replaced if it exists.
    #[arg(long, default_value = "results.csv")]
    output: PathBuf,

    /// Evaluation date (YYYY-MM-DD) used for expiry of unhit alerts. Defaults to today at the
    /// market UTC offset.
    #[arg(long)]
    as_of_date: Option<String>,

    /// Pause between symbols in milliseconds. Overrides SYMBOL_DELAY_MS.
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Read and normalize alerts without fetching prices or writing the report.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = strikehit_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    let result = run(args, settings).await;
    if let Err(err) = &result {
        sentry_anyhow::capture_anyhow(err);
        tracing::error!(error = ?err, "strike-hit run failed");
    }
    result
}

async fn run(args: Args, settings: strikehit_core::config::Settings) -> anyhow::Result<()> {
    let as_of_date = strikehit_core::time::resolve_evaluation_date(
        args.as_of_date.as_deref(),
        chrono::Utc::now(),
        settings.market_offset()?,
    )?;

    let records = strikehit_core::ingest::alerts_csv::read_alerts_file(&args.alerts)?;
    let batches = pipeline::group_by_symbol(records);
    tracing::info!(
        alerts = %args.alerts.display(),
        symbols = batches.len(),
        %as_of_date,
        "alerts loaded"
    );

    if args.dry_run {
        let mut invalid = 0usize;
        for batch in &batches {
            match pipeline::normalize_batch(batch.records.clone()) {
                Ok(alerts) => {
                    tracing::info!(symbol = %batch.symbol, alerts = alerts.len(), "batch ok")
                }
                Err(err) => {
                    invalid += 1;
                    tracing::warn!(symbol = %batch.symbol, error = %err, "batch would be abandoned");
                }
            }
        }
        tracing::info!(
            dry_run = true,
            symbols = batches.len(),
            invalid,
            "dry run finished"
        );
        return Ok(());
    }

    let provider = strikehit_core::ingest::YahooChartProvider::from_settings(&settings)?;
    let delay = args
        .delay_ms
        .map(Duration::from_millis)
        .unwrap_or(settings.symbol_delay);
    let pacer = FixedDelay::new(delay);

    let report = pipeline::run(batches, &provider, &pacer, as_of_date).await;
    let rows = report.rows();

    strikehit_core::report::write_report_file(&args.output, &rows)
        .with_context(|| format!("failed to write report {}", args.output.display()))?;

    tracing::info!(
        output = %args.output.display(),
        rows = rows.len(),
        symbols = report.symbols_total,
        errors = report.error_count(),
        "report written"
    );
    Ok(())
}

fn init_sentry(settings: &strikehit_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
