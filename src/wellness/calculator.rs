use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

use super::history::{HistoryStore, TrendReport, WellnessRecord};
use crate::analysis::ScorePair;

/// Qualitative bucket of the wellness index, best first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Excellent,
    Good,
    Fair,
    Moderate,
    Significant,
    Critical,
}

impl Category {
    /// Step function over the index; each boundary belongs to the higher category
    pub fn from_index(index: f64) -> Self {
        if index >= 90.0 {
            Category::Excellent
        } else if index >= 80.0 {
            Category::Good
        } else if index >= 70.0 {
            Category::Fair
        } else if index >= 60.0 {
            Category::Moderate
        } else if index >= 50.0 {
            Category::Significant
        } else {
            Category::Critical
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Excellent => "Excellent",
            Category::Good => "Good",
            Category::Fair => "Fair",
            Category::Moderate => "Moderate",
            Category::Significant => "Significant",
            Category::Critical => "Critical",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Urgency bucket from the weighted stress/fatigue burden
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    pub fn from_scores(scores: ScorePair) -> Self {
        let burden = burden(scores);
        if burden >= 80.0 {
            RiskLevel::High
        } else if burden >= 60.0 {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        }
    }
}

/// Traffic-light glyph for an index
pub fn indicator(index: f64) -> &'static str {
    if index >= 80.0 {
        "🟢"
    } else if index >= 70.0 {
        "🟡"
    } else if index >= 60.0 {
        "🟠"
    } else {
        "🔴"
    }
}

fn burden(scores: ScorePair) -> f64 {
    0.6 * scores.stress_score.min(100) as f64 + 0.4 * scores.fatigue_score.min(100) as f64
}

/// `clamp(100 - (0.6 stress + 0.4 fatigue), 0, 100)`, rounded to 2 decimals
pub fn wellness_index(scores: ScorePair) -> f64 {
    let index = (100.0 - burden(scores)).clamp(0.0, 100.0);
    (index * 100.0).round_ties_even() / 100.0
}

/// Result of one assessment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WellnessAssessment {
    pub stress_score: u8,
    pub fatigue_score: u8,
    pub wellness_index: f64,
    pub category: Category,
    pub indicator: &'static str,
    pub risk_level: RiskLevel,
    pub timestamp: String,
    /// False when the record is only held in memory
    pub persisted: bool,
}

impl WellnessAssessment {
    pub fn record(&self) -> WellnessRecord {
        WellnessRecord {
            timestamp: self.timestamp.clone(),
            stress_score: self.stress_score,
            fatigue_score: self.fatigue_score,
            wellness_index: self.wellness_index,
            category: self.category,
        }
    }
}

/// Derives wellness assessments and owns the history store
///
/// The store sits behind a single lock: appends (append, trim, persist) are
/// serialized and readers see the history before or after an append, never
/// in between.
pub struct WellnessCalculator {
    history: Mutex<Box<dyn HistoryStore>>,
}

impl WellnessCalculator {
    pub fn new(history: Box<dyn HistoryStore>) -> Self {
        debug!("Wellness history capacity: {}", history.capacity());
        Self {
            history: Mutex::new(history),
        }
    }

    fn store(&self) -> MutexGuard<'_, Box<dyn HistoryStore>> {
        // A panic mid-append leaves at worst an untrimmed in-memory history
        self.history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Assess one pair of scores and append the record to history
    pub fn analyze_complete(&self, scores: ScorePair) -> WellnessAssessment {
        let scores = ScorePair::new(scores.stress_score as i64, scores.fatigue_score as i64);
        let wellness_index = wellness_index(scores);

        let mut assessment = WellnessAssessment {
            stress_score: scores.stress_score,
            fatigue_score: scores.fatigue_score,
            wellness_index,
            category: Category::from_index(wellness_index),
            indicator: indicator(wellness_index),
            risk_level: RiskLevel::from_scores(scores),
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            persisted: true,
        };

        if let Err(e) = self.store().append(assessment.record()) {
            warn!("History kept in memory only: {}", e);
            assessment.persisted = false;
        }

        info!(
            "Wellness {} {:.2} ({}), risk {:?}",
            assessment.indicator, assessment.wellness_index, assessment.category, assessment.risk_level
        );

        assessment
    }

    pub fn history(&self) -> Vec<WellnessRecord> {
        self.store().records()
    }

    pub fn trend(&self) -> TrendReport {
        TrendReport::from_records(&self.store().records())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(stress: u8, fatigue: u8) -> ScorePair {
        ScorePair {
            stress_score: stress,
            fatigue_score: fatigue,
        }
    }

    #[test]
    fn test_index_extremes() {
        assert_eq!(wellness_index(pair(0, 0)), 100.0);
        assert_eq!(wellness_index(pair(100, 100)), 0.0);
        assert_eq!(wellness_index(pair(0, 100)), 60.0);
        assert_eq!(wellness_index(pair(33, 17)), 73.4);
    }

    #[test]
    fn test_index_monotonic() {
        for stress in (0..=100).step_by(5) {
            for fatigue in (0..=100).step_by(5) {
                let here = wellness_index(pair(stress, fatigue));
                if stress < 100 {
                    assert!(wellness_index(pair(stress + 5, fatigue)) <= here);
                }
                if fatigue < 100 {
                    assert!(wellness_index(pair(stress, fatigue + 5)) <= here);
                }
            }
        }
    }

    #[test]
    fn test_category_boundaries() {
        assert_eq!(Category::from_index(100.0), Category::Excellent);
        assert_eq!(Category::from_index(90.0), Category::Excellent);
        assert_eq!(Category::from_index(89.99), Category::Good);
        assert_eq!(Category::from_index(80.0), Category::Good);
        assert_eq!(Category::from_index(70.0), Category::Fair);
        assert_eq!(Category::from_index(60.0), Category::Moderate);
        assert_eq!(Category::from_index(50.0), Category::Significant);
        assert_eq!(Category::from_index(49.99), Category::Critical);
        assert_eq!(Category::from_index(0.0), Category::Critical);
    }

    #[test]
    fn test_risk_uses_raw_burden() {
        assert_eq!(RiskLevel::from_scores(pair(100, 50)), RiskLevel::High);
        assert_eq!(RiskLevel::from_scores(pair(60, 60)), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_scores(pair(0, 100)), RiskLevel::Low);
    }

    #[test]
    fn test_indicator() {
        assert_eq!(indicator(85.0), "🟢");
        assert_eq!(indicator(70.0), "🟡");
        assert_eq!(indicator(60.0), "🟠");
        assert_eq!(indicator(59.99), "🔴");
    }

    #[test]
    fn test_category_serializes_by_name() {
        let json = serde_json::to_string(&Category::Significant).unwrap();
        assert_eq!(json, "\"Significant\"");
    }
}
