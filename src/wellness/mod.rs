//! Wellness index, category and risk derivation plus the rolling history
//!
//! The history store is the only mutable state in the pipeline. It is owned by
//! [`WellnessCalculator`] and reached only through its append/read operations.

mod calculator;
mod history;

pub use calculator::{
    indicator, wellness_index, Category, RiskLevel, WellnessAssessment, WellnessCalculator,
};
pub use history::{
    HistoryStore, JsonFileHistory, MemoryHistory, Trend, TrendReport, WellnessRecord,
    DEFAULT_HISTORY_CAPACITY, TREND_WINDOW,
};
