//! Inter-row politeness policies
//!
//! The orchestrator consults its policy after every row that contacted an
//! authority. Production uses [`FixedDelay`]; tests inject [`NoDelay`].

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

#[async_trait]
pub trait PolitenessPolicy: Send + Sync {
    async fn pause(&self);
}

/// Sleep for a fixed interval
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay(pub Duration);

impl FixedDelay {
    pub fn from_millis(ms: u64) -> Self {
        Self(Duration::from_millis(ms))
    }
}

#[async_trait]
impl PolitenessPolicy for FixedDelay {
    async fn pause(&self) {
        if self.0.is_zero() {
            return;
        }
        debug!(sleep_ms = self.0.as_millis() as u64, "Politeness delay before next row");
        tokio::time::sleep(self.0).await;
    }
}

/// Never wait
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

#[async_trait]
impl PolitenessPolicy for NoDelay {
    async fn pause(&self) {}
}
