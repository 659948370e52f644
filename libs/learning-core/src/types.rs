//! Core types shared across the learning engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Certification exam domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExamDomain {
    AskingQuestions,
    RefiningQuestions,
    TakingAction,
    NavigationModules,
    ReportingExport,
}

impl ExamDomain {
    /// Official blueprint weight of this domain, in percent.
    pub fn exam_weight(self) -> u32 {
        match self {
            Self::AskingQuestions => 22,
            Self::RefiningQuestions => 23,
            Self::TakingAction => 15,
            Self::NavigationModules => 23,
            Self::ReportingExport => 17,
        }
    }

    /// Stable snake_case identifier, matching the serialized form.
    pub fn slug(self) -> &'static str {
        match self {
            Self::AskingQuestions => "asking_questions",
            Self::RefiningQuestions => "refining_questions",
            Self::TakingAction => "taking_action",
            Self::NavigationModules => "navigation_modules",
            Self::ReportingExport => "reporting_export",
        }
    }
}

/// Question difficulty on the bank's four-step scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl Difficulty {
    /// Whether this counts as a higher-difficulty question for
    /// consistency metrics (Advanced and Expert do).
    pub fn is_higher(self) -> bool {
        matches!(self, Self::Advanced | Self::Expert)
    }
}

/// One selectable answer choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub id: String,
    pub text: String,
}

/// Immutable question record supplied by the external question bank.
///
/// `correct_answer_ids` is non-empty; single-answer questions carry exactly
/// one entry. The engine does not validate choice contents (a bank concern).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub domain: ExamDomain,
    pub difficulty: Difficulty,
    pub category: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objective_id: Option<String>,
    pub correct_answer_ids: Vec<String>,
    pub choices: Vec<Choice>,
}

/// One recorded review outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub timestamp: DateTime<Utc>,
    pub correct: bool,
}

/// One spaced-repetition unit.
///
/// `interval_index` points into the scheduler's interval ladder; `history`
/// is append-only and feeds trend analytics. Items are only ever mutated by
/// the scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewItem {
    pub id: String,
    pub title: String,
    pub module_id: String,
    pub interval_index: usize,
    pub next_review: DateTime<Utc>,
    pub total_reviews: u32,
    pub retention: u8,
    pub history: Vec<ReviewRecord>,
}

impl ReviewItem {
    /// Length of the trailing run of correct outcomes in `history`.
    pub fn correct_streak(&self) -> usize {
        self.history.iter().rev().take_while(|r| r.correct).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn item_with_history(outcomes: &[bool]) -> ReviewItem {
        let base = Utc::now();
        ReviewItem {
            id: "item-1".into(),
            title: "Sensor queries".into(),
            module_id: "module-1".into(),
            interval_index: 0,
            next_review: base,
            total_reviews: outcomes.len() as u32,
            retention: 80,
            history: outcomes
                .iter()
                .map(|&correct| ReviewRecord {
                    timestamp: base,
                    correct,
                })
                .collect(),
        }
    }

    #[test]
    fn correct_streak_counts_trailing_run() {
        assert_eq!(item_with_history(&[]).correct_streak(), 0);
        assert_eq!(item_with_history(&[true, true]).correct_streak(), 2);
        assert_eq!(item_with_history(&[false, true, true]).correct_streak(), 2);
        assert_eq!(item_with_history(&[true, true, false]).correct_streak(), 0);
    }

    #[test]
    fn exam_weights_cover_the_blueprint() {
        let total: u32 = [
            ExamDomain::AskingQuestions,
            ExamDomain::RefiningQuestions,
            ExamDomain::TakingAction,
            ExamDomain::NavigationModules,
            ExamDomain::ReportingExport,
        ]
        .iter()
        .map(|d| d.exam_weight())
        .sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn slug_matches_the_serialized_name() {
        let json = serde_json::to_value(ExamDomain::NavigationModules).unwrap();
        assert_eq!(json, ExamDomain::NavigationModules.slug());
    }

    #[test]
    fn higher_difficulty_splits_the_scale() {
        assert!(!Difficulty::Beginner.is_higher());
        assert!(!Difficulty::Intermediate.is_higher());
        assert!(Difficulty::Advanced.is_higher());
        assert!(Difficulty::Expert.is_higher());
    }
}
