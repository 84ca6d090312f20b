//! Heuristic mapping from acoustic features to bounded stress/fatigue scores

use serde::{Deserialize, Serialize};
use tracing::info;

use super::features::FeatureVector;

/// Linearly map `x` from `[lo, hi]` onto `[0, 100]`, saturating outside the range
///
/// With `invert`, lower inputs give higher scores. A degenerate range
/// (`lo == hi`) behaves as a step at `hi`.
pub fn scale(x: f64, lo: f64, hi: f64, invert: bool) -> f64 {
    let t = if hi == lo {
        if x >= hi {
            1.0
        } else {
            0.0
        }
    } else {
        ((x - lo) / (hi - lo)).clamp(0.0, 1.0)
    };

    if invert {
        100.0 * (1.0 - t)
    } else {
        100.0 * t
    }
}

/// Round half to even and clamp into `[0, 100]`
fn to_score(value: f64) -> u8 {
    value.clamp(0.0, 100.0).round_ties_even() as u8
}

/// One weighted term of a score: `weight * scale(feature, lo, hi)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightedRange {
    pub weight: f64,
    pub lo: f64,
    pub hi: f64,
}

impl WeightedRange {
    pub const fn new(weight: f64, lo: f64, hi: f64) -> Self {
        Self { weight, lo, hi }
    }

    fn contribution(&self, x: f64, invert: bool) -> f64 {
        self.weight * scale(x, self.lo, self.hi, invert)
    }
}

/// Weights and normalization ranges of the score model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub stress_zcr: WeightedRange,
    pub stress_pitch_spread: WeightedRange,
    pub stress_energy_spread: WeightedRange,
    /// Inverted: quiet speech reads as fatigue
    pub fatigue_energy: WeightedRange,
    /// Inverted: low pitch reads as fatigue
    pub fatigue_pitch: WeightedRange,
    pub fatigue_pause: WeightedRange,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            stress_zcr: WeightedRange::new(0.5, 0.02, 0.25),
            stress_pitch_spread: WeightedRange::new(0.3, 0.0, 30.0),
            stress_energy_spread: WeightedRange::new(0.2, 0.0, 0.05),
            fatigue_energy: WeightedRange::new(0.5, 0.02, 0.15),
            fatigue_pitch: WeightedRange::new(0.2, 90.0, 220.0),
            fatigue_pause: WeightedRange::new(0.3, 0.05, 0.6),
        }
    }
}

/// Stress and fatigue scores, each in `[0, 100]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScorePair {
    pub stress_score: u8,
    pub fatigue_score: u8,
}

impl ScorePair {
    /// Clamp arbitrary integers into range
    pub fn new(stress: i64, fatigue: i64) -> Self {
        Self {
            stress_score: stress.clamp(0, 100) as u8,
            fatigue_score: fatigue.clamp(0, 100) as u8,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScoreModel {
    config: ScoringConfig,
}

impl ScoreModel {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn stress(&self, f: &FeatureVector) -> f64 {
        let c = &self.config;
        c.stress_zcr.contribution(f.zcr_mean, false)
            + c.stress_pitch_spread.contribution(f.pitch_spread, false)
            + c.stress_energy_spread.contribution(f.energy_spread, false)
    }

    pub fn fatigue(&self, f: &FeatureVector) -> f64 {
        let c = &self.config;
        c.fatigue_energy.contribution(f.energy_mean, true)
            + c.fatigue_pitch.contribution(f.pitch_mean, true)
            + c.fatigue_pause.contribution(f.pause_ratio, false)
    }

    pub fn score(&self, features: &FeatureVector) -> ScorePair {
        let stress = self.stress(features);
        let fatigue = self.fatigue(features);

        let pair = ScorePair {
            stress_score: to_score(stress),
            fatigue_score: to_score(fatigue),
        };

        info!(
            "Scores: stress {} ({:.2}), fatigue {} ({:.2})",
            pair.stress_score, stress, pair.fatigue_score, fatigue
        );

        pair
    }
}
