pub mod analysis;
pub mod audio;
pub mod config;
pub mod error;
pub mod http;
pub mod pipeline;
pub mod recommendation;
pub mod wellness;

pub use analysis::{AnalysisConfig, FeatureExtractor, FeatureVector, FrameSet, ScoreModel, ScorePair, ScoringConfig};
pub use audio::{AudioDecoder, AudioFile, DecodeStrategy, Waveform};
pub use config::Config;
pub use error::{DecodeError, PersistenceError, WellnessError};
pub use http::{create_router, AppState};
pub use pipeline::{AnalysisReport, WellnessPipeline};
pub use recommendation::{RecommendationEngine, RecommendationReport, Urgency};
pub use wellness::{
    Category, HistoryStore, JsonFileHistory, MemoryHistory, RiskLevel, TrendReport,
    WellnessAssessment, WellnessCalculator, WellnessRecord,
};
