//! Voice analysis: framing, acoustic feature extraction and score mapping
//!
//! waveform → [`FrameSet`] → [`FeatureVector`] → [`ScorePair`]

pub mod features;
pub mod frame;
pub mod scoring;

pub use features::{FeatureExtractor, FeatureVector};
pub use frame::{hann_window, FrameSet};
pub use scoring::{scale, ScoreModel, ScorePair, ScoringConfig, WeightedRange};

use serde::Deserialize;

use crate::error::WellnessError;

/// Framing and pitch-search tunables; lengths are converted to samples per clip
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub frame_ms: u32,
    pub hop_ms: u32,
    pub pitch_min_hz: f64,
    pub pitch_max_hz: f64,
    /// Audio time between pitch estimates
    pub pitch_step_ms: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            frame_ms: 32,
            hop_ms: 10,
            pitch_min_hz: 50.0,
            pitch_max_hz: 400.0,
            pitch_step_ms: 50,
        }
    }
}

fn ms_to_samples(ms: u32, sample_rate: u32) -> usize {
    (ms as u64 * sample_rate as u64 / 1000) as usize
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<(), WellnessError> {
        if self.hop_ms == 0 || self.frame_ms < self.hop_ms {
            return Err(WellnessError::InvalidConfig(format!(
                "analysis.frame_ms ({}) must be >= analysis.hop_ms ({}) > 0",
                self.frame_ms, self.hop_ms
            )));
        }
        if !(self.pitch_min_hz > 0.0 && self.pitch_min_hz < self.pitch_max_hz) {
            return Err(WellnessError::InvalidConfig(format!(
                "pitch band {}-{} Hz is empty",
                self.pitch_min_hz, self.pitch_max_hz
            )));
        }
        Ok(())
    }

    /// Frame length in samples, at least one
    pub fn frame_len(&self, sample_rate: u32) -> usize {
        ms_to_samples(self.frame_ms, sample_rate).max(self.hop_len(sample_rate))
    }

    /// Hop length in samples, at least one
    pub fn hop_len(&self, sample_rate: u32) -> usize {
        ms_to_samples(self.hop_ms, sample_rate).max(1)
    }

    /// Frames between pitch estimates, at least one
    pub fn pitch_step_frames(&self, sample_rate: u32) -> usize {
        (ms_to_samples(self.pitch_step_ms, sample_rate) / self.hop_len(sample_rate)).max(1)
    }
}
