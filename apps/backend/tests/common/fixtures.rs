//! Factory functions for API test data.

use chrono::{DateTime, Utc};
use serde_json::json;

use learning_core::{Choice, Difficulty, ExamDomain, Question, ReviewItem};

/// Four-choice question; "a" is the correct choice.
pub fn question(id: &str, domain: ExamDomain, tags: &[&str]) -> Question {
    Question {
        id: id.to_string(),
        domain,
        difficulty: Difficulty::Intermediate,
        category: format!("category {}", id),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        objective_id: Some(format!("obj-{}", id)),
        correct_answer_ids: vec!["a".to_string()],
        choices: ["a", "b", "c", "d"]
            .iter()
            .map(|c| Choice {
                id: c.to_string(),
                text: format!("Choice {}", c),
            })
            .collect(),
    }
}

/// Bank of `count` questions in one domain, ids `q-0` onward.
pub fn bank(count: usize, domain: ExamDomain) -> Vec<Question> {
    (0..count)
        .map(|i| question(&format!("q-{}", i), domain, &["prompts"]))
        .collect()
}

/// Start-practice payload that takes every question in one domain.
pub fn start_request(user_id: &str, domain: &str) -> serde_json::Value {
    json!({
        "user_id": user_id,
        "assessment_type": "module_quiz",
        "time_limit_minutes": 20,
        "targeting": {
            "primary_domain": domain,
            "min_questions": 1,
            "ideal_questions": 20,
        },
    })
}

/// Answer payload committing to a single choice.
pub fn answer_request(question_id: &str, choice: &str) -> serde_json::Value {
    json!({
        "question_id": question_id,
        "selection": { "kind": "choice", "value": choice },
        "time_spent_secs": 12,
    })
}

/// Answer payload that explicitly skips the question.
pub fn skip_request(question_id: &str) -> serde_json::Value {
    json!({
        "question_id": question_id,
        "selection": { "kind": "skipped" },
    })
}

/// Review item with an empty history at the given schedule position.
pub fn review_item(
    id: &str,
    retention: u8,
    interval_index: usize,
    next_review: DateTime<Utc>,
) -> ReviewItem {
    ReviewItem {
        id: id.to_string(),
        title: format!("Concept {}", id),
        module_id: "module-1".to_string(),
        interval_index,
        next_review,
        total_reviews: 0,
        retention,
        history: Vec::new(),
    }
}
