// End-to-end tests: waveform → features → scores → wellness → recommendations
//
// The silent-clip and pure-tone reports are pinned regression fixtures for the
// default weights and ranges.

mod common;

use anyhow::Result;
use common::{sine_samples, test_pipeline, wav_bytes_i16};
use tempfile::TempDir;
use vocal_wellness::analysis::{AnalysisConfig, FeatureExtractor};
use vocal_wellness::wellness::Trend;
use vocal_wellness::{Category, RiskLevel, TrendReport, Urgency, Waveform};

#[test]
fn test_pure_tone_pitch() -> Result<()> {
    let extractor = FeatureExtractor::new(AnalysisConfig::default());
    let wave = Waveform::new(sine_samples(150.0, 0.5, 16000, 16000), 16000);

    let features = extractor.extract(&wave)?;

    assert!(
        (features.pitch_mean - 150.0).abs() < 5.0,
        "pitch mean was {}",
        features.pitch_mean
    );
    assert!(features.pitch_spread < 1.0);
    assert_eq!(features.pause_ratio, 0.0);
    Ok(())
}

#[test]
fn test_silent_clip_regression() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let pipeline = test_pipeline(&temp_dir.path().join("history.json"));
    let silence = Waveform::new(vec![0.0; 5 * 16000], 16000);

    let report = pipeline.analyze_waveform(&silence)?;

    assert_eq!(report.features.pause_ratio, 1.0);
    assert_eq!(report.features.zcr_mean, 0.0);
    assert_eq!(report.features.pitch_mean, 0.0);
    assert_eq!(report.features.pitch_spread, 0.0);

    let wellness = &report.wellness;
    assert_eq!(wellness.stress_score, 0);
    assert_eq!(wellness.fatigue_score, 100);
    assert_eq!(wellness.wellness_index, 60.0);
    assert_eq!(wellness.category, Category::Moderate);
    assert_eq!(wellness.indicator, "🟠");
    assert_eq!(wellness.risk_level, RiskLevel::Low);
    assert!(wellness.persisted);

    let reco = &report.recommendations;
    assert_eq!(reco.immediate_action.urgency, Urgency::High);
    assert_eq!(reco.breathing_exercise.name, "Box Breathing (4-4-4-4)");
    assert_eq!(reco.personalized_recommendations.len(), 3);
    Ok(())
}

#[test]
fn test_pure_tone_regression() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let pipeline = test_pipeline(&temp_dir.path().join("history.json"));
    let tone = Waveform::new(sine_samples(150.0, 0.5, 16000, 16000), 16000);

    let report = pipeline.analyze_waveform(&tone)?;

    assert_eq!(report.wellness.stress_score, 0);
    assert_eq!(report.wellness.fatigue_score, 10);
    assert_eq!(report.wellness.wellness_index, 96.0);
    assert_eq!(report.wellness.category, Category::Excellent);
    assert_eq!(report.recommendations.immediate_action.urgency, Urgency::Low);
    assert_eq!(report.recommendations.breathing_exercise.name, "Coherent Breathing (5-5)");
    Ok(())
}

#[test]
fn test_wav_bytes_match_waveform_path() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let pipeline = test_pipeline(&temp_dir.path().join("history.json"));

    let bytes = wav_bytes_i16(&vec![0i16; 5 * 16000], 1, 16000);
    let report = pipeline.analyze_bytes(&bytes, Some("silence.wav"))?;

    assert_eq!(report.wellness.stress_score, 0);
    assert_eq!(report.wellness.fatigue_score, 100);
    assert_eq!(report.wellness.category, Category::Moderate);
    Ok(())
}

#[test]
fn test_clip_shorter_than_one_frame_is_padded() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let pipeline = test_pipeline(&temp_dir.path().join("history.json"));
    let blip = Waveform::new(sine_samples(200.0, 0.3, 16000, 100), 16000);

    let report = pipeline.analyze_waveform(&blip)?;

    assert!(report.wellness.stress_score <= 100);
    assert!(report.wellness.fatigue_score <= 100);
    assert!((0.0..=100.0).contains(&report.wellness.wellness_index));
    Ok(())
}

#[test]
fn test_empty_waveform_is_rejected() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let pipeline = test_pipeline(&temp_dir.path().join("history.json"));

    let err = pipeline.analyze_waveform(&Waveform::new(Vec::new(), 16000)).unwrap_err();

    assert!(err.is_input_error());
    assert!(pipeline.history().is_empty());
    Ok(())
}

#[test]
fn test_every_analysis_appends_history() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let history_path = temp_dir.path().join("history.json");
    let pipeline = test_pipeline(&history_path);

    assert!(matches!(pipeline.trend(), TrendReport::NotEnoughData { .. }));

    pipeline.analyze_waveform(&Waveform::new(vec![0.0; 16000], 16000))?;
    pipeline.analyze_waveform(&Waveform::new(sine_samples(150.0, 0.5, 16000, 16000), 16000))?;

    let history = pipeline.history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].category, Category::Moderate);
    assert_eq!(history[1].category, Category::Excellent);

    match pipeline.trend() {
        TrendReport::Summary {
            average_wellness,
            trend,
            sessions_count,
        } => {
            assert_eq!(average_wellness, 78.0);
            assert_eq!(trend, Trend::Up);
            assert_eq!(sessions_count, 2);
        }
        other => panic!("expected summary, got {:?}", other),
    }

    // A fresh pipeline sees the persisted history
    let reopened = test_pipeline(&history_path);
    assert_eq!(reopened.history(), history);
    Ok(())
}
