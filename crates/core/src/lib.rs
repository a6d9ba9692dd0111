pub mod domain;
pub mod error;
pub mod evaluate;
pub mod ingest;
pub mod pipeline;
pub mod report;
pub mod time;

pub mod config {
    use anyhow::Context;
    use std::time::Duration;

    const DEFAULT_YAHOO_BASE_URL: &str = "https://query2.finance.yahoo.com";
    const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 30;
    const DEFAULT_SYMBOL_DELAY_MS: u64 = 800;
    const DEFAULT_MARKET_UTC_OFFSET_HOURS: i32 = -5;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub sentry_dsn: Option<String>,
        pub yahoo_base_url: String,
        pub provider_timeout: Duration,
        pub symbol_delay: Duration,
        pub market_utc_offset_hours: i32,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            let yahoo_base_url = std::env::var("YAHOO_BASE_URL")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_YAHOO_BASE_URL.to_string());

            let timeout_secs = parse_env_or("PROVIDER_TIMEOUT_SECS", DEFAULT_PROVIDER_TIMEOUT_SECS)?;
            let delay_ms = parse_env_or("SYMBOL_DELAY_MS", DEFAULT_SYMBOL_DELAY_MS)?;
            let offset = parse_env_or("MARKET_UTC_OFFSET_HOURS", DEFAULT_MARKET_UTC_OFFSET_HOURS)?;
            anyhow::ensure!(
                (-12..=14).contains(&offset),
                "MARKET_UTC_OFFSET_HOURS must be -12..=14 (got {offset})"
            );

            Ok(Self {
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
                yahoo_base_url,
                provider_timeout: Duration::from_secs(timeout_secs),
                symbol_delay: Duration::from_millis(delay_ms),
                market_utc_offset_hours: offset,
            })
        }

        pub fn market_offset(&self) -> anyhow::Result<chrono::FixedOffset> {
            chrono::FixedOffset::east_opt(self.market_utc_offset_hours * 3600)
                .context("invalid market UTC offset")
        }
    }

    fn parse_env_or<T>(key: &str, default: T) -> anyhow::Result<T>
    where
        T: std::str::FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        match std::env::var(key) {
            Ok(s) if !s.trim().is_empty() => s
                .trim()
                .parse::<T>()
                .with_context(|| format!("{key} is not valid: {s:?}")),
            _ => Ok(default),
        }
    }
}
