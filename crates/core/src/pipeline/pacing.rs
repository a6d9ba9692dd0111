use std::time::Duration;

/// Called by the pipeline between two consecutive symbols.
#[async_trait::async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self);
}

/// Sleeps for a fixed delay to stay under the provider's request rate.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait::async_trait]
impl Pacer for FixedDelay {
    async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoPause;

#[async_trait::async_trait]
impl Pacer for NoPause {
    async fn pause(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn fixed_delay_sleeps_for_configured_duration() {
        let started = tokio::time::Instant::now();
        FixedDelay::new(Duration::from_millis(800)).pause().await;
        assert!(started.elapsed() >= Duration::from_millis(800));
    }
}
