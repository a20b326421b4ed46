//! Simulated completion backend
//!
//! Waits out two fixed phases, then answers with one of a handful of canned
//! openings stamped with the model name.

use super::latency::{FixedLatency, Latency, Phase};
use super::{BackendError, CompletionBackend, CompletionRequest};
use crate::clock::{Clock, SystemClock};
use crate::ids::IdGenerator;
use crate::types::{Chat, Message};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex, PoisonError};

pub const CANNED_OPENINGS: [&str; 8] = [
    "I'd be happy to help you with that! Let me break this down step by step.",
    "That's an interesting question. Here's what I think about this topic.",
    "Based on your request, I can provide some insights and suggestions.",
    "Let me analyze this and give you a comprehensive response.",
    "Great question! This is a topic that has several important aspects to consider.",
    "I understand what you're looking for. Here's my detailed response.",
    "That's a complex topic, but I'll do my best to explain it clearly.",
    "Thanks for asking! This is something I can definitely help you with.",
];

pub const SIMULATION_DISCLAIMER: &str = "*This is a simulated response. In a real application, this would be connected to the actual AI model API.*";

pub struct SimulatedBackend {
    latency: Arc<dyn Latency>,
    ids: Arc<IdGenerator>,
    clock: Arc<dyn Clock>,
    rng: Mutex<StdRng>,
    /// Probability in `0.0..=1.0` that a completion fails
    failure_rate: f64,
}

impl SimulatedBackend {
    /// Backend with the default 1s + 2s latency, an entropy-seeded random
    /// source and no failures
    pub fn new(ids: Arc<IdGenerator>) -> Self {
        Self {
            latency: Arc::new(FixedLatency::default()),
            ids,
            clock: Arc::new(SystemClock),
            rng: Mutex::new(StdRng::from_entropy()),
            failure_rate: 0.0,
        }
    }

    #[must_use]
    pub fn with_latency(mut self, latency: Arc<dyn Latency>) -> Self {
        self.latency = latency;
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    /// Make completions fail with the given probability (clamped to `0..=1`)
    #[must_use]
    pub fn with_failure_rate(mut self, rate: f64) -> Self {
        self.failure_rate = if rate.is_finite() { rate.clamp(0.0, 1.0) } else { 0.0 };
        self
    }

    /// Pick an opening and decide whether this attempt fails
    fn roll(&self) -> (&'static str, bool) {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let opening = CANNED_OPENINGS[rng.gen_range(0..CANNED_OPENINGS.len())];
        let fails = self.failure_rate > 0.0 && rng.gen_bool(self.failure_rate);
        (opening, fails)
    }
}

/// Reply body: opening, provenance line, disclaimer
pub fn render_reply(opening: &str, model: &str) -> String {
    format!("{opening}\n\n**Model used:** {model}\n\n{SIMULATION_DISCLAIMER}")
}

#[async_trait]
impl CompletionBackend for SimulatedBackend {
    async fn request_completion(&self, request: &CompletionRequest) -> Result<Message, BackendError> {
        self.latency.pause(Phase::Typing).await;
        let (opening, fails) = self.roll();
        self.latency.pause(Phase::Generation).await;

        if fails {
            return Err(BackendError::Simulated {
                chat_id: request.chat_id.clone(),
            });
        }

        Ok(Message::assistant(
            self.ids.message_id(),
            render_reply(opening, &request.model),
            Some(request.model.clone()),
            self.clock.now(),
        ))
    }

    async fn create_chat(&self, title: Option<&str>) -> Result<Chat, BackendError> {
        let now = self.clock.now();
        let title = match title.map(str::trim) {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => format!("New Chat {}", now.format("%-m/%-d/%Y")),
        };
        Ok(Chat::new(self.ids.chat_id(), title, now))
    }
}
