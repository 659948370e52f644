//! Review queue workflows on top of the scheduler

use std::sync::Arc;

use chrono::{DateTime, Utc};
use learning_core::{
    difficulty, due_today, overdue, AssessmentConfig, PerformanceAnalytics, Question,
    Recommendation, ReviewItem, ReviewScheduler, ReviewStats,
};

use crate::error::{ApiError, Result};
use crate::models::ReviewQueueResponse;
use crate::store::StudyStore;

/// Spaced-repetition workflows for one user's review items.
pub struct ReviewService {
    store: Arc<dyn StudyStore>,
    scheduler: ReviewScheduler,
}

impl ReviewService {
    pub fn new(store: Arc<dyn StudyStore>) -> Self {
        Self {
            store,
            scheduler: ReviewScheduler::default(),
        }
    }

    /// Due and overdue items for the day.
    pub async fn queue(&self, user_id: &str, as_of: DateTime<Utc>) -> Result<ReviewQueueResponse> {
        let items = self.store.load_review_items(user_id).await?;
        Ok(ReviewQueueResponse {
            due_today: due_today(&items, as_of).into_iter().cloned().collect(),
            overdue: overdue(&items, as_of).into_iter().cloned().collect(),
        })
    }

    /// Apply one review outcome and persist the rescheduled item.
    pub async fn record_outcome(
        &self,
        user_id: &str,
        item_id: &str,
        correct: bool,
        now: DateTime<Utc>,
    ) -> Result<ReviewItem> {
        let mut items = self.store.load_review_items(user_id).await?;
        let slot = items
            .iter_mut()
            .find(|i| i.id == item_id)
            .ok_or_else(|| ApiError::NotFound(format!("review item {}", item_id)))?;

        let updated = self.scheduler.schedule(slot, correct, now)?;
        *slot = updated.clone();
        self.store.save_review_items(user_id, items).await?;

        tracing::debug!(
            "Review {} for {}: correct={}, next interval index {}",
            item_id,
            user_id,
            correct,
            updated.interval_index
        );
        Ok(updated)
    }

    /// Aggregate queue statistics.
    pub async fn stats(&self, user_id: &str, as_of: DateTime<Utc>) -> Result<ReviewStats> {
        let items = self.store.load_review_items(user_id).await?;
        Ok(difficulty::review_stats(&items, as_of))
    }

    /// Tier distribution across the user's items.
    pub async fn analytics(&self, user_id: &str) -> Result<PerformanceAnalytics> {
        let items = self.store.load_review_items(user_id).await?;
        Ok(difficulty::performance_analytics(&items))
    }

    /// Study recommendations derived from the queue state.
    pub async fn recommendations(
        &self,
        user_id: &str,
        as_of: DateTime<Utc>,
    ) -> Result<Vec<Recommendation>> {
        let items = self.store.load_review_items(user_id).await?;
        Ok(difficulty::recommendations(&items, as_of))
    }

    /// Create review items for questions missed in an assessment.
    ///
    /// Items already in the queue keep their schedule; only questions
    /// without one get a fresh item at the initial ladder step. Returns
    /// the number created.
    pub async fn import_missed(
        &self,
        user_id: &str,
        config: &AssessmentConfig,
        missed: &[Question],
        now: DateTime<Utc>,
    ) -> Result<usize> {
        if missed.is_empty() {
            return Ok(0);
        }

        let mut items = self.store.load_review_items(user_id).await?;
        let mut added = 0;
        for question in missed {
            if items.iter().any(|i| i.id == question.id) {
                continue;
            }
            let module_id = config
                .module_id
                .clone()
                .unwrap_or_else(|| question.domain.slug().to_string());
            items.push(self.scheduler.initial_item(
                question.id.clone(),
                question.category.clone(),
                module_id,
                now,
            ));
            added += 1;
        }

        if added > 0 {
            self.store.save_review_items(user_id, items).await?;
            tracing::info!("Imported {} missed questions into review for {}", added, user_id);
        }
        Ok(added)
    }
}
