use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;

use crate::analysis::{AnalysisConfig, ScoringConfig};
use crate::error::WellnessError;
use crate::wellness::DEFAULT_HISTORY_CAPACITY;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub audio: AudioConfig,
    pub analysis: AnalysisConfig,
    pub scoring: ScoringConfig,
    pub history: HistoryConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 5003,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Rate the external decoder resamples to
    pub target_sample_rate: u32,
    /// External decoder executable (name on PATH or absolute path)
    pub ffmpeg_path: String,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            target_sample_rate: 16000,
            ffmpeg_path: "ffmpeg".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub path: PathBuf,
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("wellness_history.json"),
            capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl Config {
    /// Load defaults, then an optional config file, then `VOCAL_WELLNESS__*` env overrides
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("VOCAL_WELLNESS").separator("__"))
            .build()?;

        let cfg: Config = settings.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), WellnessError> {
        self.analysis.validate()?;
        if self.audio.target_sample_rate == 0 {
            return Err(WellnessError::InvalidConfig(
                "audio.target_sample_rate must be positive".to_string(),
            ));
        }
        if self.history.capacity == 0 {
            return Err(WellnessError::InvalidConfig(
                "history.capacity must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
