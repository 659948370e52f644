//! Interval-ladder review scheduler (the "2357 method").
//!
//! Intervals walk a fixed ladder of day counts. A correct review climbs one
//! rung (two under acceleration), an incorrect review always falls back one.
//! Retention feeds a difficulty multiplier that stretches or shrinks the
//! resulting interval.

mod queries;

pub use queries::{due_today, due_within_days, overdue};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::difficulty::DifficultyTier;
use crate::error::{EngineError, Result};
use crate::rounding::round_half_to_even;
use crate::types::{ReviewItem, ReviewRecord};

/// Review interval ladder in days.
pub const DEFAULT_LADDER: [u32; 5] = [1, 3, 7, 16, 35];

/// Ladder scheduler policy.
///
/// The ladder, the retention smoothing weight, and the acceleration streak
/// are tuned constants carried as fields so they stay in one place and can
/// be adjusted without touching the scheduling logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewScheduler {
    /// Interval ladder in days, indexed by `ReviewItem::interval_index`.
    /// The last rung is the graduated interval.
    pub ladder: [u32; 5],
    /// Weight of the previous retention value in the rolling update;
    /// the remainder goes to the newest outcome.
    pub retention_smoothing: f64,
    /// Trailing correct reviews required before a mastered item may skip
    /// an extra ladder rung.
    pub acceleration_streak: usize,
}

impl Default for ReviewScheduler {
    fn default() -> Self {
        Self {
            ladder: DEFAULT_LADDER,
            retention_smoothing: 0.7,
            acceleration_streak: 2,
        }
    }
}

impl ReviewScheduler {
    /// Top ladder index; items holding it are graduated.
    pub fn max_index(&self) -> usize {
        self.ladder.len() - 1
    }

    /// Item for a concept entering the review system, due one ladder step
    /// out. Retention starts at 100 and finds its level as reviews land.
    pub fn initial_item(
        &self,
        id: String,
        title: String,
        module_id: String,
        now: DateTime<Utc>,
    ) -> ReviewItem {
        ReviewItem {
            id,
            title,
            module_id,
            interval_index: 0,
            next_review: now + Duration::days(i64::from(self.ladder[0])),
            total_reviews: 0,
            retention: 100,
            history: Vec::new(),
        }
    }

    /// Schedule the next review, deriving the effective multiplier from the
    /// item's current difficulty tier.
    pub fn schedule(
        &self,
        item: &ReviewItem,
        was_correct: bool,
        now: DateTime<Utc>,
    ) -> Result<ReviewItem> {
        let tier = DifficultyTier::from_retention(item.retention);
        self.schedule_with_multiplier(item, was_correct, tier.interval_multiplier(), now)
    }

    /// Schedule the next review with an explicit effective multiplier.
    ///
    /// Fails fast on malformed input state; scheduling itself cannot fail.
    pub fn schedule_with_multiplier(
        &self,
        item: &ReviewItem,
        was_correct: bool,
        multiplier: f64,
        now: DateTime<Utc>,
    ) -> Result<ReviewItem> {
        self.validate(item)?;

        let tier = DifficultyTier::from_retention(item.retention);
        let retention = self.smoothed_retention(item.retention, was_correct);
        let interval_index = self.next_index(item, tier, was_correct, retention);

        let mut history = item.history.clone();
        history.push(ReviewRecord {
            timestamp: now,
            correct: was_correct,
        });

        Ok(ReviewItem {
            id: item.id.clone(),
            title: item.title.clone(),
            module_id: item.module_id.clone(),
            interval_index,
            next_review: self.next_review_date(now, interval_index, multiplier),
            total_reviews: item.total_reviews + 1,
            retention,
            history,
        })
    }

    /// Rolling retention update: old value weighted by the smoothing
    /// factor, newest outcome (100 or 0) by the remainder.
    fn smoothed_retention(&self, old: u8, was_correct: bool) -> u8 {
        let outcome = if was_correct { 100.0 } else { 0.0 };
        let blended =
            self.retention_smoothing * f64::from(old) + (1.0 - self.retention_smoothing) * outcome;
        round_half_to_even(blended) as u8
    }

    /// Ladder movement rules.
    ///
    /// Incorrect always falls one rung, floor zero, regardless of tier.
    /// Correct climbs one rung, except: a struggling item holds its rung
    /// until retention recovers out of the struggling band, and a mastered
    /// item on a long enough correct streak climbs two.
    fn next_index(
        &self,
        item: &ReviewItem,
        tier: DifficultyTier,
        was_correct: bool,
        new_retention: u8,
    ) -> usize {
        if !was_correct {
            return item.interval_index.saturating_sub(1);
        }

        match tier {
            DifficultyTier::Struggling
                if DifficultyTier::from_retention(new_retention) == DifficultyTier::Struggling =>
            {
                item.interval_index
            }
            DifficultyTier::Mastered if item.correct_streak() >= self.acceleration_streak => {
                (item.interval_index + 2).min(self.max_index())
            }
            _ => (item.interval_index + 1).min(self.max_index()),
        }
    }

    /// Next due date: ladder days at the new index, stretched by the
    /// multiplier, rounded to whole days, at least one day out.
    fn next_review_date(
        &self,
        now: DateTime<Utc>,
        interval_index: usize,
        multiplier: f64,
    ) -> DateTime<Utc> {
        let days = round_half_to_even(f64::from(self.ladder[interval_index]) * multiplier).max(1);
        now + Duration::days(days)
    }

    fn validate(&self, item: &ReviewItem) -> Result<()> {
        if item.interval_index > self.max_index() {
            return Err(EngineError::IntervalIndexOutOfRange {
                index: item.interval_index,
                max: self.max_index(),
            });
        }
        if item.retention > 100 {
            return Err(EngineError::RetentionOutOfRange {
                value: item.retention,
            });
        }
        Ok(())
    }
}
