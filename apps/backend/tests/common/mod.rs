//! Common test utilities for integration tests.
//!
//! Everything runs against the in-memory store, so tests need no
//! external services and no environment setup.

pub mod fixtures;

use std::sync::Arc;

use axum::Router;

use examprep_backend::router;
use examprep_backend::store::MemoryStore;
use learning_core::Question;

/// Test context holding the seeded store and the app router.
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    app: Router,
}

impl TestContext {
    /// Context over an empty question bank.
    pub fn new() -> Self {
        Self::with_questions(Vec::new())
    }

    /// Context over a seeded question bank.
    pub fn with_questions(questions: Vec<Question>) -> Self {
        let store = Arc::new(MemoryStore::with_questions(questions));
        let app = router(store.clone());
        Self { store, app }
    }

    /// Router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }
}
