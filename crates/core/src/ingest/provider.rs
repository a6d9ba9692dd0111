use crate::domain::BarSeries;
use crate::error::FetchError;
use chrono::NaiveDate;

/// Source of historical daily bars.
///
/// One call per symbol per run; the pipeline never retries a failed fetch.
#[async_trait::async_trait]
pub trait PriceBarProvider: Send + Sync {
    fn provider_name(&self) -> &'static str;

    /// Daily bars for `symbol` from `start` up to the latest available session.
    async fn fetch_daily_bars(
        &self,
        symbol: &str,
        start: NaiveDate,
    ) -> Result<BarSeries, FetchError>;
}
