//! Answer evaluation for assessment responses.
//!
//! Correctness is a set comparison against the question's correct choice
//! ids, decided once at answer time and stored on the response.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::types::Question;

/// A learner's answer to one question.
///
/// "Unanswered" is the explicit `Skipped` state — never an empty string —
/// so scoring cannot mistake a missing answer for a wrong-but-present one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Selection {
    Skipped,
    Choice(String),
    Choices(Vec<String>),
}

impl Selection {
    /// Whether the learner committed to anything at all.
    pub fn is_answered(&self) -> bool {
        !matches!(self, Self::Skipped)
    }

    /// Set-equality comparison against the correct choice ids.
    pub fn matches(&self, correct_answer_ids: &[String]) -> bool {
        match self {
            Self::Skipped => false,
            Self::Choice(id) => correct_answer_ids.len() == 1 && correct_answer_ids[0] == *id,
            Self::Choices(ids) => {
                let chosen: BTreeSet<&str> = ids.iter().map(String::as_str).collect();
                let expected: BTreeSet<&str> =
                    correct_answer_ids.iter().map(String::as_str).collect();
                !chosen.is_empty() && chosen == expected
            }
        }
    }
}

/// Evaluate a selection against a question.
pub fn evaluate(question: &Question, selection: &Selection) -> bool {
    selection.matches(&question.correct_answer_ids)
}
