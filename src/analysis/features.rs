//! Per-frame and per-clip acoustic indicators

use serde::Serialize;
use tracing::debug;

use super::frame::{hann_window, FrameSet};
use super::AnalysisConfig;
use crate::audio::Waveform;
use crate::error::WellnessError;

/// Added under the square root so pure silence has a defined RMS
const RMS_EPSILON: f64 = 1e-12;

/// Frames at or below this RMS are digital silence and always count as pauses
const SILENCE_FLOOR: f64 = 1e-5;

/// Centred samples within this distance of zero mean a flat frame
const FLAT_TOLERANCE: f64 = 1e-8;

/// Clip-level acoustic features
///
/// Every field is always defined; a clip with no voiced frames reports 0.0
/// for both pitch statistics.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct FeatureVector {
    /// Mean windowed-frame RMS energy
    pub energy_mean: f64,
    /// Population standard deviation of frame RMS energy
    pub energy_spread: f64,
    /// Mean frame zero-crossing rate
    pub zcr_mean: f64,
    /// Fraction of frames quieter than half the clip's median energy
    pub pause_ratio: f64,
    /// Mean pitch (Hz) over frames that produced one
    pub pitch_mean: f64,
    /// Population standard deviation of pitch (Hz)
    pub pitch_spread: f64,
}

/// `sqrt(mean(x^2) + ε)`
pub fn rms(frame: &[f32]) -> f64 {
    if frame.is_empty() {
        return RMS_EPSILON.sqrt();
    }
    let sum: f64 = frame.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum / frame.len() as f64 + RMS_EPSILON).sqrt()
}

/// Fraction of adjacent sample pairs whose sign differs; zero counts as positive
pub fn zero_crossing_rate(frame: &[f32]) -> f64 {
    if frame.len() < 2 {
        return 0.0;
    }
    let crossings = frame
        .windows(2)
        .filter(|pair| (pair[0] >= 0.0) != (pair[1] >= 0.0))
        .count();
    crossings as f64 / (frame.len() - 1) as f64
}

/// Fraction of frames whose energy falls below half the median frame energy
pub fn pause_ratio(energies: &[f64]) -> f64 {
    if energies.is_empty() {
        return 0.0;
    }
    let threshold = 0.5 * median(energies);
    let pauses = energies
        .iter()
        .filter(|&&e| e < threshold || e <= SILENCE_FLOOR)
        .count();
    pauses as f64 / energies.len() as f64
}

/// Autocorrelation pitch estimate restricted to `[min_hz, max_hz]`
///
/// Returns `None` for flat frames and for frames too short to hold the
/// longest lag in the band.
pub fn estimate_pitch(frame: &[f32], sample_rate: u32, min_hz: f64, max_hz: f64) -> Option<f64> {
    if frame.is_empty() || sample_rate == 0 || min_hz <= 0.0 || max_hz <= 0.0 {
        return None;
    }

    let mean = frame.iter().map(|&s| s as f64).sum::<f64>() / frame.len() as f64;
    let centred: Vec<f64> = frame.iter().map(|&s| s as f64 - mean).collect();
    if centred.iter().all(|s| s.abs() <= FLAT_TOLERANCE) {
        return None;
    }

    let max_lag = (sample_rate as f64 / min_hz) as usize;
    let min_lag = (sample_rate as f64 / max_hz) as usize;
    if max_lag <= min_lag || max_lag >= centred.len() {
        return None;
    }

    let energy = autocorrelation(&centred, 0);
    if energy <= 0.0 || !energy.is_finite() {
        return None;
    }

    let mut best_lag = min_lag;
    let mut best = f64::NEG_INFINITY;
    for lag in min_lag..max_lag {
        let corr = autocorrelation(&centred, lag) / energy;
        if corr > best {
            best = corr;
            best_lag = lag;
        }
    }

    if best_lag == 0 {
        return None;
    }
    let freq = sample_rate as f64 / best_lag as f64;
    freq.is_finite().then_some(freq)
}

fn autocorrelation(x: &[f64], lag: usize) -> f64 {
    x.iter().zip(&x[lag..]).map(|(a, b)| a * b).sum()
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}

fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        0.5 * (sorted[mid - 1] + sorted[mid])
    } else {
        sorted[mid]
    }
}

/// Frames a waveform and computes its [`FeatureVector`]
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    config: AnalysisConfig,
}

impl FeatureExtractor {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn extract(&self, waveform: &Waveform) -> Result<FeatureVector, WellnessError> {
        if waveform.is_empty() {
            return Err(WellnessError::EmptyAudio);
        }

        let rate = waveform.sample_rate;
        let frame_len = self.config.frame_len(rate);
        let hop_len = self.config.hop_len(rate);

        let mut frames = FrameSet::frame(waveform, frame_len, hop_len)?;
        frames.apply_window(&hann_window(frame_len));

        let energies: Vec<f64> = frames.iter().map(rms).collect();
        let zcrs: Vec<f64> = frames.iter().map(zero_crossing_rate).collect();

        let step = self.config.pitch_step_frames(rate);
        let pitches: Vec<f64> = frames
            .iter()
            .step_by(step)
            .filter_map(|frame| {
                estimate_pitch(
                    frame,
                    rate,
                    self.config.pitch_min_hz,
                    self.config.pitch_max_hz,
                )
            })
            .collect();

        let features = FeatureVector {
            energy_mean: mean(&energies),
            energy_spread: std_dev(&energies),
            zcr_mean: mean(&zcrs),
            pause_ratio: pause_ratio(&energies),
            pitch_mean: mean(&pitches),
            pitch_spread: std_dev(&pitches),
        };

        debug!(
            "Extracted features from {} frames ({} voiced pitch samples): {:?}",
            frames.len(),
            pitches.len(),
            features
        );

        Ok(features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f64, amplitude: f64, rate: u32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|n| (amplitude * (2.0 * std::f64::consts::PI * freq * n as f64 / rate as f64).sin()) as f32)
            .collect()
    }

    #[test]
    fn test_rms_of_silence_is_defined() {
        let value = rms(&[0.0; 64]);
        assert!(value > 0.0);
        assert!((value - 1e-6).abs() < 1e-12);
    }

    #[test]
    fn test_rms_of_constant() {
        assert!((rms(&[0.5; 16]) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_zcr_counts_zero_as_positive() {
        // + 0 - 0 + : crossings at 0->-, -->0
        assert!((zero_crossing_rate(&[1.0, 0.0, -1.0, 0.0, 1.0]) - 0.5).abs() < 1e-12);
        assert_eq!(zero_crossing_rate(&[0.0; 8]), 0.0);
        assert_eq!(zero_crossing_rate(&[1.0, -1.0, 1.0]), 1.0);
    }

    #[test]
    fn test_median_even_and_odd() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
    }

    #[test]
    fn test_pause_ratio_is_relative_to_median() {
        let loud = [0.2, 0.2, 0.2, 0.01];
        assert!((pause_ratio(&loud) - 0.25).abs() < 1e-12);

        // Same shape at a tenth of the gain gives the same ratio
        let quiet: Vec<f64> = loud.iter().map(|e| e * 0.1).collect();
        assert!((pause_ratio(&quiet) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_pause_ratio_of_silence() {
        assert_eq!(pause_ratio(&[1e-6; 10]), 1.0);
    }

    #[test]
    fn test_pitch_of_pure_tone() {
        let frame = sine(200.0, 0.5, 16000, 512);
        let pitch = estimate_pitch(&frame, 16000, 50.0, 400.0).unwrap();
        assert!((pitch - 200.0).abs() < 5.0, "pitch was {}", pitch);
    }

    #[test]
    fn test_pitch_of_flat_frame_is_none() {
        assert!(estimate_pitch(&[0.0; 512], 16000, 50.0, 400.0).is_none());
        // DC offset is removed before the flatness check
        assert!(estimate_pitch(&[0.3; 512], 16000, 50.0, 400.0).is_none());
    }

    #[test]
    fn test_pitch_needs_room_for_longest_lag() {
        let frame = sine(200.0, 0.5, 16000, 256);
        assert!(estimate_pitch(&frame, 16000, 50.0, 400.0).is_none());
    }
}
