//! End-to-end analysis: bytes → waveform → features → scores → wellness → recommendations

use serde::Serialize;
use tracing::info;

use crate::analysis::{FeatureExtractor, FeatureVector, ScoreModel};
use crate::audio::{AudioDecoder, Waveform};
use crate::config::Config;
use crate::error::{Result, WellnessError};
use crate::recommendation::{RecommendationEngine, RecommendationReport};
use crate::wellness::{
    HistoryStore, JsonFileHistory, TrendReport, WellnessAssessment, WellnessCalculator,
    WellnessRecord,
};

/// Everything produced for one analyzed utterance
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub features: FeatureVector,
    pub wellness: WellnessAssessment,
    pub recommendations: RecommendationReport,
}

/// Wires the pipeline stages together; each stage only sees its predecessor's output
pub struct WellnessPipeline {
    decoder: AudioDecoder,
    extractor: FeatureExtractor,
    scorer: ScoreModel,
    calculator: WellnessCalculator,
    recommender: RecommendationEngine,
}

impl WellnessPipeline {
    pub fn new(
        decoder: AudioDecoder,
        extractor: FeatureExtractor,
        scorer: ScoreModel,
        history: Box<dyn HistoryStore>,
    ) -> Self {
        Self {
            decoder,
            extractor,
            scorer,
            calculator: WellnessCalculator::new(history),
            recommender: RecommendationEngine::new(),
        }
    }

    /// Standard pipeline with history persisted at the configured path
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;

        let history = JsonFileHistory::open(&config.history.path, config.history.capacity);

        Ok(Self::new(
            AudioDecoder::new(&config.audio),
            FeatureExtractor::new(config.analysis.clone()),
            ScoreModel::new(config.scoring),
            Box::new(history),
        ))
    }

    /// Decode an audio blob and analyze it
    pub fn analyze_bytes(&self, bytes: &[u8], filename: Option<&str>) -> Result<AnalysisReport> {
        let waveform = self.decoder.decode(bytes, filename)?;
        self.analyze_waveform(&waveform)
    }

    /// Analyze an already decoded waveform
    pub fn analyze_waveform(&self, waveform: &Waveform) -> Result<AnalysisReport> {
        if waveform.is_empty() || waveform.sample_rate == 0 {
            return Err(WellnessError::EmptyAudio);
        }

        info!(
            "Analyzing {:.2}s of audio at {}Hz",
            waveform.duration_seconds(),
            waveform.sample_rate
        );

        let features = self.extractor.extract(waveform)?;
        let scores = self.scorer.score(&features);
        let wellness = self.calculator.analyze_complete(scores);
        let recommendations = self.recommender.generate_report(&wellness);

        Ok(AnalysisReport {
            features,
            wellness,
            recommendations,
        })
    }

    pub fn decoder(&self) -> &AudioDecoder {
        &self.decoder
    }

    pub fn history(&self) -> Vec<WellnessRecord> {
        self.calculator.history()
    }

    pub fn trend(&self) -> TrendReport {
        self.calculator.trend()
    }
}
