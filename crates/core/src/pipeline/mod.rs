pub mod pacing;

pub use pacing::{FixedDelay, NoPause, Pacer};

use crate::domain::{Alert, RawAlertRecord};
use crate::error::{FetchError, ParseError};
use crate::evaluate::{evaluate_alert, AlertEvaluation};
use crate::ingest::PriceBarProvider;
use crate::report::ReportRow;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use thiserror::Error;

/// All raw alerts that share one underlying symbol.
#[derive(Debug, Clone)]
pub struct SymbolBatch {
    pub symbol: String,
    pub records: Vec<RawAlertRecord>,
}

/// Why a whole symbol batch was abandoned.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
}

#[derive(Debug)]
pub struct FailedSymbol {
    pub symbol: String,
    pub error: BatchError,
}

/// Everything a run produced, owned by the caller.
#[derive(Debug, Default)]
pub struct RunReport {
    pub symbols_total: usize,
    pub evaluations: Vec<AlertEvaluation>,
    pub failures: Vec<FailedSymbol>,
}

impl RunReport {
    pub fn error_count(&self) -> usize {
        self.failures.len()
    }

    pub fn rows(&self) -> Vec<ReportRow> {
        self.evaluations.iter().map(ReportRow::from_evaluation).collect()
    }
}

/// Groups records by their trimmed `Sym`, in symbol order.
pub fn group_by_symbol(records: Vec<RawAlertRecord>) -> Vec<SymbolBatch> {
    let mut by_symbol: BTreeMap<String, Vec<RawAlertRecord>> = BTreeMap::new();
    for record in records {
        by_symbol
            .entry(record.sym.trim().to_string())
            .or_default()
            .push(record);
    }

    by_symbol
        .into_iter()
        .map(|(symbol, records)| SymbolBatch { symbol, records })
        .collect()
}

/// Normalizes every record of a batch, oldest alert first. One bad record fails the batch.
pub fn normalize_batch(records: Vec<RawAlertRecord>) -> Result<Vec<Alert>, ParseError> {
    let mut alerts = records
        .into_iter()
        .map(RawAlertRecord::validate_and_into_alert)
        .collect::<Result<Vec<_>, _>>()?;
    alerts.sort_by_key(|a| a.alert_time);
    Ok(alerts)
}

/// Evaluates symbols one at a time, pausing between them.
///
/// A parse or fetch failure abandons only that symbol's batch and is recorded
/// in [`RunReport::failures`].
pub async fn run(
    batches: Vec<SymbolBatch>,
    provider: &dyn PriceBarProvider,
    pacer: &dyn Pacer,
    as_of: NaiveDate,
) -> RunReport {
    let total = batches.len();
    let mut report = RunReport {
        symbols_total: total,
        ..RunReport::default()
    };

    for (idx, batch) in batches.into_iter().enumerate() {
        if idx != 0 {
            pacer.pause().await;
        }

        let symbol = batch.symbol.clone();
        match evaluate_batch(batch, provider, as_of).await {
            Ok(evaluations) => report.evaluations.extend(evaluations),
            Err(error) => {
                tracing::warn!(
                    %symbol,
                    provider = provider.provider_name(),
                    error = %error,
                    "abandoning symbol batch"
                );
                report.failures.push(FailedSymbol { symbol, error });
            }
        }

        tracing::info!(
            processed = idx + 1,
            total,
            rows = report.evaluations.len(),
            failures = report.error_count(),
            "progress"
        );
    }

    report
}

async fn evaluate_batch(
    batch: SymbolBatch,
    provider: &dyn PriceBarProvider,
    as_of: NaiveDate,
) -> Result<Vec<AlertEvaluation>, BatchError> {
    let alerts = normalize_batch(batch.records)?;
    // `group_by_symbol` never yields an empty batch, but callers may build their own.
    let Some(start) = alerts.first().map(Alert::alert_date) else {
        return Ok(Vec::new());
    };

    let series = provider.fetch_daily_bars(&batch.symbol, start).await?;
    tracing::debug!(
        symbol = %batch.symbol,
        %start,
        bars = series.len(),
        alerts = alerts.len(),
        "evaluating symbol"
    );

    Ok(alerts
        .into_iter()
        .map(|alert| evaluate_alert(&series, alert, as_of))
        .collect())
}
