//! Practice session orchestration
//!
//! Wires targeting, session state, scoring, and the review import
//! together. All rules live in the core engine; this module only
//! sequences them and talks to the store.

use std::sync::Arc;

use chrono::Utc;
use learning_core::{
    evaluate, score, select, select_seeded, AssessmentConfig, AssessmentSession, Question,
    QuestionResponse, SessionStatus,
};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::{
    answered_count, AnswerRequest, AnswerResponse, NavigateRequest, NavigateResponse, PoolSummary,
    SessionListResponse, SessionSummary, SessionView, StartPracticeRequest, StartPracticeResponse,
    StoredSession, SubmitResponse,
};
use crate::services::review::ReviewService;
use crate::store::StudyStore;

/// Assessment session lifecycle over a store.
pub struct SessionService {
    store: Arc<dyn StudyStore>,
}

impl SessionService {
    pub fn new(store: Arc<dyn StudyStore>) -> Self {
        Self { store }
    }

    /// Run targeting over the bank and open a session on the result.
    ///
    /// An empty pool is not an error: the response carries the pool
    /// summary with its fallback recommendation and no session.
    pub async fn start(&self, request: StartPracticeRequest) -> Result<StartPracticeResponse> {
        let bank = self.store.load_questions().await?;
        let pool = match request.seed {
            Some(seed) => select_seeded(&bank, &request.targeting, seed)?,
            None => select(&bank, &request.targeting)?,
        };
        let summary = PoolSummary::from(&pool);

        if pool.is_empty {
            tracing::info!("No questions matched practice targeting for {}", request.user_id);
            return Ok(StartPracticeResponse {
                pool: summary,
                session: None,
            });
        }

        let config = AssessmentConfig {
            assessment_type: request.assessment_type,
            module_id: request.targeting.module_id.clone(),
            domain_filter: Some(request.targeting.primary_domain),
            question_count: pool.questions.len(),
            time_limit_minutes: request.time_limit_minutes,
        };
        let session = AssessmentSession::new(
            Uuid::new_v4().to_string(),
            config,
            pool.questions,
            Utc::now(),
        );
        let stored = StoredSession::new(request.user_id, session);
        let view = stored.view();
        self.store.save_session(stored).await?;

        tracing::info!(
            "Started session {} with {} questions at tier {:?}",
            view.id,
            view.questions.len(),
            summary.tier
        );
        Ok(StartPracticeResponse {
            pool: summary,
            session: Some(view),
        })
    }

    /// Fetch one session by id.
    pub async fn get(&self, session_id: &str) -> Result<SessionView> {
        Ok(self.load(session_id).await?.view())
    }

    /// Past sessions for a user, newest first.
    pub async fn list(&self, user_id: &str) -> Result<SessionListResponse> {
        let rows = self.store.list_sessions(user_id).await?;
        Ok(SessionListResponse {
            sessions: rows.iter().map(SessionSummary::from).collect(),
        })
    }

    /// Record an answer and advance the position.
    ///
    /// Correctness is evaluated here, once, and stored with the
    /// response. Re-answering a question replaces the earlier response.
    pub async fn answer(&self, session_id: &str, request: AnswerRequest) -> Result<AnswerResponse> {
        let mut stored = self.load(session_id).await?;
        if stored.session.status == SessionStatus::Completed {
            return Err(ApiError::BadRequest(format!(
                "session {} is already completed",
                session_id
            )));
        }

        let question = stored
            .session
            .questions
            .iter()
            .find(|q| q.id == request.question_id)
            .ok_or_else(|| {
                ApiError::BadRequest(format!(
                    "question {} is not part of session {}",
                    request.question_id, session_id
                ))
            })?;
        let is_correct = evaluate(question, &request.selection);

        stored.session.record_response(QuestionResponse {
            question_id: request.question_id.clone(),
            selection: request.selection,
            is_correct,
            time_spent_secs: request.time_spent_secs,
            timestamp: Utc::now(),
        })?;

        // Advance, holding on the last question.
        if stored.current_index + 1 < stored.session.questions.len() {
            stored.current_index += 1;
        }

        let response = AnswerResponse {
            question_id: request.question_id,
            is_correct,
            answered_count: answered_count(&stored.session),
            current_index: stored.current_index,
        };
        self.store.save_session(stored).await?;
        Ok(response)
    }

    /// Move the position without touching any answers.
    ///
    /// Next and Previous clamp at the ends; an explicit jump outside
    /// the question list is rejected.
    pub async fn navigate(
        &self,
        session_id: &str,
        request: NavigateRequest,
    ) -> Result<NavigateResponse> {
        let mut stored = self.load(session_id).await?;
        if stored.session.questions.is_empty() {
            return Err(ApiError::Internal(format!(
                "session {} has no questions",
                session_id
            )));
        }
        let last = stored.session.questions.len() - 1;

        let target = match request {
            NavigateRequest::Next => (stored.current_index + 1).min(last),
            NavigateRequest::Previous => stored.current_index.saturating_sub(1),
            NavigateRequest::Jump { index } => {
                if index > last {
                    return Err(ApiError::BadRequest(format!(
                        "index {} outside 0..={}",
                        index, last
                    )));
                }
                index
            }
        };

        stored.current_index = target;
        let question_id = stored.session.questions[target].id.clone();
        self.store.save_session(stored).await?;
        Ok(NavigateResponse {
            current_index: target,
            question_id,
        })
    }

    /// Close the session, score it, and feed misses into the review
    /// queue.
    ///
    /// Submitting an already-completed session returns the stored
    /// result without importing anything twice.
    pub async fn submit(&self, session_id: &str) -> Result<SubmitResponse> {
        let mut stored = self.load(session_id).await?;

        if stored.session.status == SessionStatus::Completed {
            if let Some(result) = self.store.load_result(session_id).await? {
                return Ok(SubmitResponse {
                    result,
                    review_items_added: 0,
                });
            }
        }

        let now = Utc::now();
        if stored.session.status != SessionStatus::Completed {
            stored.session.complete(now);
        }
        let result = score(&stored.session, now)?;

        let missed: Vec<Question> = stored
            .session
            .questions
            .iter()
            .filter(|q| {
                stored
                    .session
                    .response_for(&q.id)
                    .is_none_or(|r| !r.is_correct)
            })
            .cloned()
            .collect();
        let reviews = ReviewService::new(Arc::clone(&self.store));
        let added = reviews
            .import_missed(&stored.user_id, &stored.session.config, &missed, now)
            .await?;

        self.store.save_result(result.clone()).await?;
        self.store.save_session(stored).await?;

        tracing::info!(
            "Session {} scored {} ({} missed questions sent to review)",
            session_id,
            result.overall_score,
            added
        );
        Ok(SubmitResponse {
            result,
            review_items_added: added,
        })
    }

    async fn load(&self, session_id: &str) -> Result<StoredSession> {
        self.store
            .load_session(session_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("session {}", session_id)))
    }
}
