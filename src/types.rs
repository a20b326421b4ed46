//! Chat domain types
//!
//! Messages and chats are plain values. Catalog entries (models and
//! templates) are `'static` so they can be shared freely.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

define_id!(ChatId);
define_id!(MessageId);

/// Author of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Upper-case label used when rendering transcripts
    pub fn label(self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Assistant => "ASSISTANT",
        }
    }
}

/// One turn in a chat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub content: String,
    pub role: Role,
    pub timestamp: DateTime<Utc>,
    /// Name of the model that generated the message (assistant only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl Message {
    pub fn user(id: MessageId, content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            content: content.into(),
            role: Role::User,
            timestamp,
            model: None,
        }
    }

    pub fn assistant(
        id: MessageId,
        content: impl Into<String>,
        model: Option<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            content: content.into(),
            role: Role::Assistant,
            timestamp,
            model,
        }
    }
}

/// A conversation thread. Messages are append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    pub id: ChatId,
    pub title: String,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Chat {
    /// Create an empty chat
    pub fn new(id: ChatId, title: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: title.into(),
            messages: Vec::new(),
            created_at,
            updated_at: created_at,
        }
    }

    pub fn contains_message(&self, id: &MessageId) -> bool {
        self.messages.iter().any(|m| &m.id == id)
    }

    pub fn message(&self, id: &MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| &m.id == id)
    }

    /// Copy of this chat with `message` appended.
    ///
    /// `updated_at` never moves before `created_at`, even if the supplied
    /// clock reading is behind the creation time.
    #[must_use]
    pub fn with_message(&self, message: Message, now: DateTime<Utc>) -> Self {
        let mut messages = Vec::with_capacity(self.messages.len() + 1);
        messages.extend(self.messages.iter().cloned());
        messages.push(message);
        Self {
            id: self.id.clone(),
            title: self.title.clone(),
            messages,
            created_at: self.created_at,
            updated_at: now.max(self.created_at),
        }
    }
}

/// Catalog entry for a selectable model preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiModel {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub max_tokens: u32,
    pub provider: &'static str,
}

/// Reusable prompt prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PromptTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub content: &'static str,
    pub category: &'static str,
}

impl PromptTemplate {
    /// Prefix `draft` with the template text
    pub fn compose(&self, draft: &str) -> String {
        let draft = draft.trim();
        if draft.is_empty() {
            return self.content.to_string();
        }
        if self.content.ends_with(char::is_whitespace) {
            format!("{}{draft}", self.content)
        } else {
            format!("{}\n\n{draft}", self.content)
        }
    }
}

// ============================================================================
// Generation parameters
// ============================================================================

/// Inclusive numeric bounds of a parameter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds<T> {
    pub min: T,
    pub max: T,
}

pub const TEMPERATURE_BOUNDS: Bounds<f64> = Bounds { min: 0.0, max: 2.0 };
pub const MAX_TOKENS_BOUNDS: Bounds<u32> = Bounds { min: 64, max: 4096 };
pub const TOP_P_BOUNDS: Bounds<f64> = Bounds { min: 0.1, max: 1.0 };
pub const FREQUENCY_PENALTY_BOUNDS: Bounds<f64> = Bounds { min: -2.0, max: 2.0 };

/// Parameter names, used to report which fields an update had to clamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamField {
    Temperature,
    MaxTokens,
    TopP,
    FrequencyPenalty,
}

impl ParamField {
    pub fn name(self) -> &'static str {
        match self {
            ParamField::Temperature => "temperature",
            ParamField::MaxTokens => "maxTokens",
            ParamField::TopP => "topP",
            ParamField::FrequencyPenalty => "frequencyPenalty",
        }
    }
}

impl fmt::Display for ParamField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Generation-control values sent alongside a completion request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatParameters {
    pub temperature: f64,
    pub max_tokens: u32,
    pub top_p: f64,
    pub frequency_penalty: f64,
}

impl ChatParameters {
    pub fn is_within_bounds(&self) -> bool {
        in_bounds(self.temperature, TEMPERATURE_BOUNDS)
            && (MAX_TOKENS_BOUNDS.min..=MAX_TOKENS_BOUNDS.max).contains(&self.max_tokens)
            && in_bounds(self.top_p, TOP_P_BOUNDS)
            && in_bounds(self.frequency_penalty, FREQUENCY_PENALTY_BOUNDS)
    }

    /// Overwrite the supplied fields, keeping the rest.
    ///
    /// Values outside their bounds are clamped and non-finite values leave
    /// the field untouched; either case is reported in the returned list.
    pub fn merged(&self, update: &ParameterUpdate) -> (ChatParameters, Vec<ParamField>) {
        let mut adjusted = Vec::new();
        let mut next = *self;

        if let Some(value) = update.temperature {
            next.temperature = clamp_float(
                value,
                self.temperature,
                TEMPERATURE_BOUNDS,
                ParamField::Temperature,
                &mut adjusted,
            );
        }
        if let Some(value) = update.max_tokens {
            let clamped = value.clamp(MAX_TOKENS_BOUNDS.min, MAX_TOKENS_BOUNDS.max);
            if clamped != value {
                adjusted.push(ParamField::MaxTokens);
            }
            next.max_tokens = clamped;
        }
        if let Some(value) = update.top_p {
            next.top_p = clamp_float(value, self.top_p, TOP_P_BOUNDS, ParamField::TopP, &mut adjusted);
        }
        if let Some(value) = update.frequency_penalty {
            next.frequency_penalty = clamp_float(
                value,
                self.frequency_penalty,
                FREQUENCY_PENALTY_BOUNDS,
                ParamField::FrequencyPenalty,
                &mut adjusted,
            );
        }

        (next, adjusted)
    }
}

fn in_bounds(value: f64, bounds: Bounds<f64>) -> bool {
    value.is_finite() && value >= bounds.min && value <= bounds.max
}

fn clamp_float(
    value: f64,
    prior: f64,
    bounds: Bounds<f64>,
    field: ParamField,
    adjusted: &mut Vec<ParamField>,
) -> f64 {
    if !value.is_finite() {
        adjusted.push(field);
        return prior;
    }
    let clamped = value.clamp(bounds.min, bounds.max);
    if in_bounds(value, bounds) {
        value
    } else {
        adjusted.push(field);
        clamped
    }
}

/// Partial parameter update; `None` fields keep their current value
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,
}

impl ParameterUpdate {
    #[must_use]
    pub fn temperature(mut self, value: f64) -> Self {
        self.temperature = Some(value);
        self
    }

    #[must_use]
    pub fn max_tokens(mut self, value: u32) -> Self {
        self.max_tokens = Some(value);
        self
    }

    #[must_use]
    pub fn top_p(mut self, value: f64) -> Self {
        self.top_p = Some(value);
        self
    }

    #[must_use]
    pub fn frequency_penalty(mut self, value: f64) -> Self {
        self.frequency_penalty = Some(value);
        self
    }
}

impl From<ChatParameters> for ParameterUpdate {
    fn from(params: ChatParameters) -> Self {
        Self {
            temperature: Some(params.temperature),
            max_tokens: Some(params.max_tokens),
            top_p: Some(params.top_p),
            frequency_penalty: Some(params.frequency_penalty),
        }
    }
}
