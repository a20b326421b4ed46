//! Session configuration from the environment

use crate::catalog::{self, Preset};
use crate::types::AiModel;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const TYPING_DELAY_VAR: &str = "CHATDECK_TYPING_DELAY_MS";
pub const GENERATION_DELAY_VAR: &str = "CHATDECK_GENERATION_DELAY_MS";
pub const FAILURE_RATE_VAR: &str = "CHATDECK_FAILURE_RATE";
pub const SEED_VAR: &str = "CHATDECK_SEED";
pub const DEFAULT_MODEL_VAR: &str = "CHATDECK_DEFAULT_MODEL";
pub const EXPORT_DIR_VAR: &str = "CHATDECK_EXPORT_DIR";
pub const PRESET_VAR: &str = "CHATDECK_PRESET";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{var} has invalid value {value:?}")]
    InvalidValue { var: &'static str, value: String },
    #[error("CHATDECK_FAILURE_RATE must be within 0..=1, got {0}")]
    FailureRateOutOfRange(f64),
    #[error("unknown model {0:?}")]
    UnknownModel(String),
    #[error("unknown preset {0:?}")]
    UnknownPreset(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub typing_delay: Duration,
    pub generation_delay: Duration,
    pub failure_rate: f64,
    /// Fixed seed for the reply picker; entropy when unset
    pub seed: Option<u64>,
    pub default_model: AiModel,
    pub export_dir: PathBuf,
    /// Starting parameters; the catalog defaults when unset
    pub preset: Option<Preset>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            typing_delay: crate::backend::TYPING_DELAY,
            generation_delay: crate::backend::GENERATION_DELAY,
            failure_rate: 0.0,
            seed: None,
            default_model: catalog::default_model(),
            export_dir: PathBuf::from("./exports"),
            preset: None,
        }
    }
}

impl SessionConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from any variable source; unset and blank variables keep
    /// their defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(ms) = parse::<u64>(TYPING_DELAY_VAR, get(TYPING_DELAY_VAR))? {
            config.typing_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = parse::<u64>(GENERATION_DELAY_VAR, get(GENERATION_DELAY_VAR))? {
            config.generation_delay = Duration::from_millis(ms);
        }
        if let Some(rate) = parse::<f64>(FAILURE_RATE_VAR, get(FAILURE_RATE_VAR))? {
            if !(0.0..=1.0).contains(&rate) {
                return Err(ConfigError::FailureRateOutOfRange(rate));
            }
            config.failure_rate = rate;
        }
        config.seed = parse::<u64>(SEED_VAR, get(SEED_VAR))?;
        if let Some(id) = get(DEFAULT_MODEL_VAR) {
            let id = id.trim();
            config.default_model =
                catalog::find_model(id).ok_or_else(|| ConfigError::UnknownModel(id.to_string()))?;
        }
        if let Some(dir) = get(EXPORT_DIR_VAR) {
            config.export_dir = PathBuf::from(dir);
        }
        if let Some(name) = get(PRESET_VAR) {
            let name = name.trim();
            let preset = Preset::from_name(name)
                .ok_or_else(|| ConfigError::UnknownPreset(name.to_string()))?;
            config.preset = Some(preset);
        }

        Ok(config)
    }
}

fn parse<T: FromStr>(var: &'static str, raw: Option<String>) -> Result<Option<T>, ConfigError> {
    raw.map(|value| {
        value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { var, value })
    })
    .transpose()
}
