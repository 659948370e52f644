//! Stored records and API types for the learning service

use chrono::{DateTime, Utc};
use learning_core::{
    AssessmentConfig, AssessmentResult, AssessmentSession, AssessmentType, Choice, Difficulty,
    ExamDomain, FallbackTier, PracticeTargeting, Question, QuestionPool, RecommendedFallback,
    ReviewItem, Selection, SessionStatus,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// === Stored Records ===

/// Session record as held by the store.
///
/// Navigation position is presentation state, so it lives here beside the
/// core session rather than inside it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSession {
    pub user_id: String,
    pub current_index: usize,
    pub session: AssessmentSession,
}

impl StoredSession {
    /// Wrap a freshly opened session, positioned on the first question.
    pub fn new(user_id: String, session: AssessmentSession) -> Self {
        Self {
            user_id,
            current_index: 0,
            session,
        }
    }

    /// Client-facing view with answer keys stripped.
    pub fn view(&self) -> SessionView {
        SessionView {
            id: self.session.id.clone(),
            user_id: self.user_id.clone(),
            config: self.session.config.clone(),
            status: self.session.status,
            start_time: self.session.start_time,
            end_time: self.session.end_time,
            current_index: self.current_index,
            answered_count: answered_count(&self.session),
            questions: self.session.questions.iter().map(QuestionView::from).collect(),
        }
    }
}

pub(crate) fn answered_count(session: &AssessmentSession) -> usize {
    session
        .responses
        .iter()
        .filter(|r| r.selection.is_answered())
        .count()
}

// === API Views ===

/// Question as served to clients. The answer key stays server-side;
/// correctness comes back per answer instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionView {
    pub id: String,
    pub domain: ExamDomain,
    pub difficulty: Difficulty,
    pub category: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objective_id: Option<String>,
    pub choices: Vec<Choice>,
}

impl From<&Question> for QuestionView {
    fn from(q: &Question) -> Self {
        Self {
            id: q.id.clone(),
            domain: q.domain,
            difficulty: q.difficulty,
            category: q.category.clone(),
            tags: q.tags.clone(),
            objective_id: q.objective_id.clone(),
            choices: q.choices.clone(),
        }
    }
}

/// Session as served to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionView {
    pub id: String,
    pub user_id: String,
    pub config: AssessmentConfig,
    pub status: SessionStatus,
    pub start_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    pub current_index: usize,
    pub answered_count: usize,
    pub questions: Vec<QuestionView>,
}

/// Targeting outcome without the question bodies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolSummary {
    pub tier: FallbackTier,
    pub total_count: usize,
    pub domain_distribution: BTreeMap<ExamDomain, usize>,
    pub difficulty_distribution: BTreeMap<Difficulty, usize>,
    pub is_empty: bool,
    pub has_minimum: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommended_fallback: Option<RecommendedFallback>,
}

impl From<&QuestionPool> for PoolSummary {
    fn from(pool: &QuestionPool) -> Self {
        Self {
            tier: pool.tier,
            total_count: pool.total_count,
            domain_distribution: pool.domain_distribution.clone(),
            difficulty_distribution: pool.difficulty_distribution.clone(),
            is_empty: pool.is_empty,
            has_minimum: pool.has_minimum,
            recommended_fallback: pool.recommended_fallback.clone(),
        }
    }
}

/// Past-session row for history listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: String,
    pub assessment_type: AssessmentType,
    pub status: SessionStatus,
    pub start_time: DateTime<Utc>,
    pub question_count: usize,
    pub answered_count: usize,
}

impl From<&StoredSession> for SessionSummary {
    fn from(stored: &StoredSession) -> Self {
        Self {
            id: stored.session.id.clone(),
            assessment_type: stored.session.config.assessment_type,
            status: stored.session.status,
            start_time: stored.session.start_time,
            question_count: stored.session.questions.len(),
            answered_count: answered_count(&stored.session),
        }
    }
}

// === Practice Session Requests/Responses ===

/// Request body for POST /api/practice/start
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartPracticeRequest {
    pub user_id: String,
    pub assessment_type: AssessmentType,
    pub time_limit_minutes: u32,
    pub targeting: PracticeTargeting,
    /// Fixed shuffle seed; omit for a random question order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// Response for POST /api/practice/start
///
/// An empty pool is a valid outcome: `pool` reports it and `session`
/// stays absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartPracticeResponse {
    pub pool: PoolSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionView>,
}

/// Query string for GET /api/sessions
#[derive(Debug, Clone, Deserialize)]
pub struct SessionListQuery {
    pub user_id: String,
}

/// Response for GET /api/sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionListResponse {
    pub sessions: Vec<SessionSummary>,
}

/// Request body for POST /api/sessions/{id}/answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerRequest {
    pub question_id: String,
    pub selection: Selection,
    #[serde(default)]
    pub time_spent_secs: u32,
}

/// Response for POST /api/sessions/{id}/answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub question_id: String,
    pub is_correct: bool,
    pub answered_count: usize,
    pub current_index: usize,
}

/// Request body for POST /api/sessions/{id}/navigate
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "direction", rename_all = "snake_case")]
pub enum NavigateRequest {
    Next,
    Previous,
    Jump { index: usize },
}

/// Response for POST /api/sessions/{id}/navigate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigateResponse {
    pub current_index: usize,
    pub question_id: String,
}

/// Response for POST /api/sessions/{id}/submit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub result: AssessmentResult,
    /// Missed questions newly imported into the review queue.
    pub review_items_added: usize,
}

// === Review Requests/Responses ===

/// Query string for the GET /api/review/* endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewQuery {
    pub user_id: String,
    /// Evaluation instant; defaults to now.
    #[serde(default)]
    pub as_of: Option<DateTime<Utc>>,
}

/// Response for GET /api/review/queue
///
/// `due_today` covers everything due by the end of the day, `overdue` is
/// the subset carried over from earlier days.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewQueueResponse {
    pub due_today: Vec<ReviewItem>,
    pub overdue: Vec<ReviewItem>,
}

/// Request body for POST /api/review/{item_id}
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewOutcomeRequest {
    pub user_id: String,
    pub correct: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use learning_core::Difficulty;
    use pretty_assertions::assert_eq;

    fn question(id: &str) -> Question {
        Question {
            id: id.to_string(),
            domain: ExamDomain::AskingQuestions,
            difficulty: Difficulty::Intermediate,
            category: "prompt basics".to_string(),
            tags: vec!["prompts".to_string()],
            objective_id: Some("obj-1".to_string()),
            correct_answer_ids: vec!["a".to_string()],
            choices: vec![
                Choice {
                    id: "a".to_string(),
                    text: "Right".to_string(),
                },
                Choice {
                    id: "b".to_string(),
                    text: "Wrong".to_string(),
                },
            ],
        }
    }

    fn stored_session() -> StoredSession {
        let config = AssessmentConfig {
            assessment_type: AssessmentType::ModuleQuiz,
            module_id: Some("module-1".to_string()),
            domain_filter: None,
            question_count: 1,
            time_limit_minutes: 20,
        };
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let session =
            AssessmentSession::new("sess-1".to_string(), config, vec![question("q-1")], start);
        StoredSession::new("user-1".to_string(), session)
    }

    #[test]
    fn question_view_drops_the_answer_key() {
        let view = QuestionView::from(&question("q-1"));

        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("correct_answer_ids").is_none());
        assert_eq!(json["choices"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn session_view_counts_only_committed_answers() {
        let mut stored = stored_session();
        let response = learning_core::QuestionResponse {
            question_id: "q-1".to_string(),
            selection: Selection::Skipped,
            is_correct: false,
            time_spent_secs: 5,
            timestamp: stored.session.start_time,
        };
        stored.session.record_response(response).unwrap();

        let view = stored.view();
        assert_eq!(view.answered_count, 0);
        assert_eq!(view.questions.len(), 1);
    }

    #[test]
    fn navigate_request_parses_tagged_directions() {
        let next: NavigateRequest = serde_json::from_value(serde_json::json!({
            "direction": "next"
        }))
        .unwrap();
        assert!(matches!(next, NavigateRequest::Next));

        let jump: NavigateRequest = serde_json::from_value(serde_json::json!({
            "direction": "jump",
            "index": 3
        }))
        .unwrap();
        assert!(matches!(jump, NavigateRequest::Jump { index: 3 }));
    }

    #[test]
    fn start_request_defaults_the_seed() {
        let request: StartPracticeRequest = serde_json::from_value(serde_json::json!({
            "user_id": "user-1",
            "assessment_type": "module_quiz",
            "time_limit_minutes": 20,
            "targeting": { "primary_domain": "asking_questions" }
        }))
        .unwrap();

        assert_eq!(request.seed, None);
        assert_eq!(request.targeting.min_questions, 5);
        assert_eq!(request.targeting.ideal_questions, 15);
    }
}
