//! Injectable response latency

use async_trait::async_trait;
use std::time::Duration;

/// Delay before the reply starts "typing"
pub const TYPING_DELAY: Duration = Duration::from_millis(1000);
/// Delay while the reply is "generated"
pub const GENERATION_DELAY: Duration = Duration::from_millis(2000);

/// The two sequential waits of a simulated completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Typing,
    Generation,
}

/// Strategy for how long each phase takes
#[async_trait]
pub trait Latency: Send + Sync {
    async fn pause(&self, phase: Phase);
}

/// Real timer-backed delays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedLatency {
    pub typing: Duration,
    pub generation: Duration,
}

impl FixedLatency {
    pub fn new(typing: Duration, generation: Duration) -> Self {
        Self { typing, generation }
    }

    pub fn total(&self) -> Duration {
        self.typing + self.generation
    }
}

impl Default for FixedLatency {
    fn default() -> Self {
        Self::new(TYPING_DELAY, GENERATION_DELAY)
    }
}

#[async_trait]
impl Latency for FixedLatency {
    async fn pause(&self, phase: Phase) {
        let delay = match phase {
            Phase::Typing => self.typing,
            Phase::Generation => self.generation,
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Zero delay, for tests
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLatency;

#[async_trait]
impl Latency for NoLatency {
    async fn pause(&self, _phase: Phase) {}
}
