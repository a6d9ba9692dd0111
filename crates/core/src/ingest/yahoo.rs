use crate::config::Settings;
use crate::domain::{BarSeries, PriceBar};
use crate::error::FetchError;
use crate::ingest::provider::PriceBarProvider;
use anyhow::Context;
use chrono::{NaiveDate, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    meta: ChartMeta,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
struct ChartMeta {
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteData {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

/// Daily bars from the Yahoo Finance v8 chart endpoint.
#[derive(Debug, Clone)]
pub struct YahooChartProvider {
    http: reqwest::Client,
    base_url: String,
}

impl YahooChartProvider {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(settings.provider_timeout)
            .user_agent(USER_AGENT)
            .build()
            .context("failed to build yahoo http client")?;

        Ok(Self {
            http,
            base_url: settings.yahoo_base_url.clone(),
        })
    }

    fn chart_url(&self, symbol: &str) -> String {
        format!(
            "{}/v8/finance/chart/{}",
            self.base_url.trim_end_matches('/'),
            symbol
        )
    }
}

#[async_trait::async_trait]
impl PriceBarProvider for YahooChartProvider {
    fn provider_name(&self) -> &'static str {
        "yahoo_finance"
    }

    async fn fetch_daily_bars(
        &self,
        symbol: &str,
        start: NaiveDate,
    ) -> Result<BarSeries, FetchError> {
        let period1 = start.and_time(chrono::NaiveTime::MIN).and_utc().timestamp();
        let period2 = Utc::now().timestamp();

        let res = self
            .http
            .get(self.chart_url(symbol))
            .query(&[
                ("period1", period1.to_string()),
                ("period2", period2.to_string()),
                ("interval", "1d".to_string()),
                ("events", "history".to_string()),
            ])
            .send()
            .await?;

        let status = res.status();
        let text = res.text().await?;

        // Yahoo reports unknown symbols as a 404 with a chart error body.
        let chart = match serde_json::from_str::<ChartResponse>(&text) {
            Ok(chart) if status.is_success() || chart.chart.error.is_some() => chart,
            Err(err) if status.is_success() => {
                return Err(FetchError::ResponseFormat(format!(
                    "chart response for {symbol} is not valid JSON: {err}"
                )))
            }
            _ => {
                return Err(FetchError::Http {
                    symbol: symbol.to_string(),
                    status: status.as_u16(),
                })
            }
        };

        let bars = parse_chart(symbol, chart)?;
        tracing::debug!(symbol, bars = bars.len(), "yahoo chart fetched");
        Ok(bars)
    }
}

fn parse_chart(symbol: &str, resp: ChartResponse) -> Result<BarSeries, FetchError> {
    if let Some(err) = resp.chart.error {
        if err.code == "Not Found" {
            return Err(FetchError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        return Err(FetchError::ResponseFormat(format!(
            "{}: {}",
            err.code, err.description
        )));
    }

    let data = resp
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| FetchError::ResponseFormat("empty chart result".into()))?;

    // No timestamps means no sessions in the requested range.
    let Some(timestamps) = data.timestamp else {
        return Ok(BarSeries::default());
    };

    let quote = data.indicators.quote.into_iter().next().unwrap_or_default();
    let offset = data.meta.gmtoffset;

    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        let date = chrono::DateTime::from_timestamp(ts + offset, 0)
            .map(|dt| dt.date_naive())
            .ok_or_else(|| FetchError::ResponseFormat(format!("invalid timestamp: {ts}")))?;

        let field = |v: &Vec<Option<f64>>| v.get(i).copied().flatten().and_then(Decimal::from_f64);
        let (Some(open), Some(high), Some(low), Some(close)) = (
            field(&quote.open),
            field(&quote.high),
            field(&quote.low),
            field(&quote.close),
        ) else {
            tracing::debug!(symbol, %date, "skipping bar with missing prices");
            continue;
        };
        let volume = quote
            .volume
            .get(i)
            .copied()
            .flatten()
            .map(Decimal::from)
            .unwrap_or_default();

        bars.push(PriceBar {
            date,
            open,
            high,
            low,
            close,
            volume,
        });
    }

    Ok(BarSeries::new(bars))
}
