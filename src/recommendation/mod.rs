//! Actionable guidance derived from a wellness assessment
//!
//! Everything here is a pure function of category, scores and index; nothing
//! is persisted.

use serde::Serialize;

use crate::analysis::ScorePair;
use crate::wellness::{wellness_index, Category, WellnessAssessment, WellnessRecord};

/// Maximum number of personalized tips in a report
pub const MAX_RECOMMENDATIONS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Urgency {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImmediateAction {
    pub urgency: Urgency,
    pub action: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreathingExercise {
    pub name: &'static str,
    pub instructions: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationReport {
    pub immediate_action: ImmediateAction,
    pub personalized_recommendations: Vec<&'static str>,
    pub breathing_exercise: BreathingExercise,
}

/// The fields a report is derived from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommendationInput {
    pub category: Category,
    pub stress_score: u8,
    pub fatigue_score: u8,
    pub wellness_index: f64,
}

impl RecommendationInput {
    /// Build from raw scores, deriving index and category
    pub fn from_scores(scores: ScorePair) -> Self {
        let index = wellness_index(scores);
        Self {
            category: Category::from_index(index),
            stress_score: scores.stress_score,
            fatigue_score: scores.fatigue_score,
            wellness_index: index,
        }
    }
}

impl From<&WellnessAssessment> for RecommendationInput {
    fn from(a: &WellnessAssessment) -> Self {
        Self {
            category: a.category,
            stress_score: a.stress_score,
            fatigue_score: a.fatigue_score,
            wellness_index: a.wellness_index,
        }
    }
}

impl From<&WellnessRecord> for RecommendationInput {
    fn from(r: &WellnessRecord) -> Self {
        Self {
            category: r.category,
            stress_score: r.stress_score,
            fatigue_score: r.fatigue_score,
            wellness_index: r.wellness_index,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RecommendationEngine;

impl RecommendationEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn generate_report(&self, input: impl Into<RecommendationInput>) -> RecommendationReport {
        let input = input.into();
        RecommendationReport {
            immediate_action: immediate_action(input.category, input.stress_score, input.fatigue_score),
            personalized_recommendations: personalized(&input),
            breathing_exercise: breathing_exercise(input.category),
        }
    }
}

pub fn immediate_action(category: Category, stress: u8, fatigue: u8) -> ImmediateAction {
    if matches!(category, Category::Critical | Category::Significant) || stress >= 80 || fatigue >= 80 {
        return ImmediateAction {
            urgency: Urgency::High,
            action: "Take a 5–10 minute break now. Hydrate, step away from screens, and do a guided breathing cycle before continuing.",
        };
    }
    if matches!(category, Category::Moderate | Category::Fair) {
        return ImmediateAction {
            urgency: Urgency::Medium,
            action: "Plan a short rest in the next 30 minutes. Reduce cognitive load and check posture and lighting.",
        };
    }
    ImmediateAction {
        urgency: Urgency::Low,
        action: "Maintain current routine. Do a brief stretch and continue to monitor energy levels.",
    }
}

pub fn breathing_exercise(category: Category) -> BreathingExercise {
    match category {
        Category::Critical | Category::Significant | Category::Moderate => BreathingExercise {
            name: "Box Breathing (4-4-4-4)",
            instructions: vec![
                "Inhale through the nose for 4 seconds",
                "Hold for 4 seconds",
                "Exhale through the mouth for 4 seconds",
                "Hold for 4 seconds and repeat for 1–2 minutes",
            ],
        },
        _ => BreathingExercise {
            name: "Coherent Breathing (5-5)",
            instructions: vec![
                "Inhale gently for 5 seconds",
                "Exhale gently for 5 seconds",
                "Repeat 10–12 cycles",
            ],
        },
    }
}

/// Conditional tips in fixed order, each condition contributing once
pub fn personalized(input: &RecommendationInput) -> Vec<&'static str> {
    let mut tips = Vec::new();

    if input.stress_score >= 70 {
        tips.push("Reduce multitasking; focus on one task for the next 20 minutes.");
        tips.push("Use a short mindfulness check-in (body scan, 1 minute).");
    }
    if input.fatigue_score >= 70 {
        tips.push("Hydrate and consider a light snack (protein + complex carbs).");
        tips.push("Stand up and do 1–2 minutes of light movement or stretching.");
    }
    if input.wellness_index < 70.0 {
        tips.push("Adjust environment: lower screen brightness, reduce noise, optimize seating.");
    }
    if input.wellness_index >= 80.0 {
        tips.push("Maintain current habits; schedule a brief walk later today.");
    }
    if input.stress_score < 40 && input.fatigue_score < 40 {
        tips.push("Consider a focused deep-work block of 45–60 minutes.");
    }

    if tips.is_empty() {
        tips.push("Keep monitoring and aim for consistent sleep and nutrition routines.");
    }
    tips.truncate(MAX_RECOMMENDATIONS);
    tips
}
