//! Persistence seam for the question bank, sessions, results, and
//! review items

use async_trait::async_trait;
use learning_core::{AssessmentResult, Question, ReviewItem};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::models::StoredSession;

/// Storage operations the services run on.
///
/// Everything is keyed by plain string ids so a database-backed
/// implementation can slot in without touching the services.
#[async_trait]
pub trait StudyStore: Send + Sync {
    /// Full question bank, in stable insertion order.
    async fn load_questions(&self) -> Result<Vec<Question>>;

    async fn load_session(&self, session_id: &str) -> Result<Option<StoredSession>>;
    async fn save_session(&self, session: StoredSession) -> Result<()>;
    /// Sessions for one user, most recent first.
    async fn list_sessions(&self, user_id: &str) -> Result<Vec<StoredSession>>;

    async fn load_result(&self, session_id: &str) -> Result<Option<AssessmentResult>>;
    async fn save_result(&self, result: AssessmentResult) -> Result<()>;

    async fn load_review_items(&self, user_id: &str) -> Result<Vec<ReviewItem>>;
    async fn save_review_items(&self, user_id: &str, items: Vec<ReviewItem>) -> Result<()>;
}

/// In-memory store behind `tokio::sync::RwLock`.
///
/// Single-process deployments and the test suite run on this.
#[derive(Default)]
pub struct MemoryStore {
    questions: RwLock<Vec<Question>>,
    sessions: RwLock<HashMap<String, StoredSession>>,
    results: RwLock<HashMap<String, AssessmentResult>>,
    review_items: RwLock<HashMap<String, Vec<ReviewItem>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a question bank.
    pub fn with_questions(questions: Vec<Question>) -> Self {
        Self {
            questions: RwLock::new(questions),
            ..Self::default()
        }
    }
}

#[async_trait]
impl StudyStore for MemoryStore {
    async fn load_questions(&self) -> Result<Vec<Question>> {
        Ok(self.questions.read().await.clone())
    }

    async fn load_session(&self, session_id: &str) -> Result<Option<StoredSession>> {
        Ok(self.sessions.read().await.get(session_id).cloned())
    }

    async fn save_session(&self, session: StoredSession) -> Result<()> {
        self.sessions
            .write()
            .await
            .insert(session.session.id.clone(), session);
        Ok(())
    }

    async fn list_sessions(&self, user_id: &str) -> Result<Vec<StoredSession>> {
        let sessions = self.sessions.read().await;
        let mut rows: Vec<StoredSession> = sessions
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        // Map order is arbitrary, so impose one: newest first, id as
        // tie-break.
        rows.sort_by(|a, b| {
            b.session
                .start_time
                .cmp(&a.session.start_time)
                .then_with(|| a.session.id.cmp(&b.session.id))
        });
        Ok(rows)
    }

    async fn load_result(&self, session_id: &str) -> Result<Option<AssessmentResult>> {
        Ok(self.results.read().await.get(session_id).cloned())
    }

    async fn save_result(&self, result: AssessmentResult) -> Result<()> {
        self.results
            .write()
            .await
            .insert(result.session_id.clone(), result);
        Ok(())
    }

    async fn load_review_items(&self, user_id: &str) -> Result<Vec<ReviewItem>> {
        Ok(self
            .review_items
            .read()
            .await
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn save_review_items(&self, user_id: &str, items: Vec<ReviewItem>) -> Result<()> {
        self.review_items
            .write()
            .await
            .insert(user_id.to_string(), items);
        Ok(())
    }
}
