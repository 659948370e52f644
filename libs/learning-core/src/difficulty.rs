//! Retention-based difficulty classification and reporting.
//!
//! The tier is never stored; it is recomputed from retention on every read
//! so there is no second copy of the truth to drift. The analytics in this
//! module are read-only summaries and never feed back into scheduling.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::rounding::percentage;
use crate::scheduler::{due_today, overdue};
use crate::types::{ReviewItem, ReviewRecord};

/// Difficulty tier derived from rolling retention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyTier {
    Struggling,
    Normal,
    Mastered,
}

impl DifficultyTier {
    /// Classify a retention percentage: under 70 struggling, over 90
    /// mastered, the band between is normal.
    pub fn from_retention(retention: u8) -> Self {
        if retention < 70 {
            Self::Struggling
        } else if retention > 90 {
            Self::Mastered
        } else {
            Self::Normal
        }
    }

    /// Effective interval multiplier: struggling items review 30% sooner,
    /// mastered items 30% later.
    pub fn interval_multiplier(self) -> f64 {
        match self {
            Self::Struggling => 0.7,
            Self::Normal => 1.0,
            Self::Mastered => 1.3,
        }
    }
}

/// Tier counts and trend summary across a collection of items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceAnalytics {
    pub struggling: usize,
    pub normal: usize,
    pub mastered: usize,
    /// Ids of items whose last three outcomes climbed from incorrect to
    /// correct.
    pub improving_items: Vec<String>,
    /// Ids of items whose last three outcomes slid from correct to
    /// incorrect.
    pub declining_items: Vec<String>,
    /// Percent correct over the most recent ten review events across all
    /// items; 0 when nothing has been reviewed.
    pub average_retention_trend: u8,
}

/// Headline counters for the review dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewStats {
    pub total_items: usize,
    pub due_today: usize,
    pub overdue: usize,
    /// Mean retention, rounded; 100 for an empty collection.
    pub average_retention: u8,
    /// Item counts keyed by ladder index.
    pub items_by_interval: BTreeMap<usize, usize>,
}

/// Study suggestion categories, ordered by urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    OverdueBacklog,
    StrugglingFocus,
    MasteredProgress,
    DecliningRetention,
    ImprovingProgress,
    ConsistentPerformance,
    GettingStarted,
}

/// One prioritized study suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub detail: String,
}

#[derive(PartialEq)]
enum Trend {
    Up,
    Down,
    Flat,
}

/// Trend over the last three outcomes. Upward means the run started
/// incorrect and ended correct without dipping back; downward is the
/// mirror. Anything shorter or mixed is flat.
fn recent_trend(history: &[ReviewRecord]) -> Trend {
    if history.len() < 3 {
        return Trend::Flat;
    }
    let last: Vec<bool> = history[history.len() - 3..].iter().map(|r| r.correct).collect();
    let climbing = last.windows(2).all(|w| w[0] <= w[1]);
    let sliding = last.windows(2).all(|w| w[0] >= w[1]);

    if climbing && !last[0] && last[2] {
        Trend::Up
    } else if sliding && last[0] && !last[2] {
        Trend::Down
    } else {
        Trend::Flat
    }
}

/// Tier counts plus improving/declining items and the recent-review trend.
pub fn performance_analytics(items: &[ReviewItem]) -> PerformanceAnalytics {
    let mut analytics = PerformanceAnalytics {
        struggling: 0,
        normal: 0,
        mastered: 0,
        improving_items: Vec::new(),
        declining_items: Vec::new(),
        average_retention_trend: recent_review_success(items),
    };

    for item in items {
        match DifficultyTier::from_retention(item.retention) {
            DifficultyTier::Struggling => analytics.struggling += 1,
            DifficultyTier::Normal => analytics.normal += 1,
            DifficultyTier::Mastered => analytics.mastered += 1,
        }
        match recent_trend(&item.history) {
            Trend::Up => analytics.improving_items.push(item.id.clone()),
            Trend::Down => analytics.declining_items.push(item.id.clone()),
            Trend::Flat => {}
        }
    }

    analytics
}

/// Percent correct over the ten most recent review events across all items.
fn recent_review_success(items: &[ReviewItem]) -> u8 {
    let mut events: Vec<&ReviewRecord> = items.iter().flat_map(|i| i.history.iter()).collect();
    events.sort_by_key(|r| r.timestamp);

    let recent = &events[events.len().saturating_sub(10)..];
    if recent.is_empty() {
        return 0;
    }
    let correct = recent.iter().filter(|r| r.correct).count();
    percentage(correct, recent.len())
}

/// Dashboard counters for a collection at a point in time.
pub fn review_stats(items: &[ReviewItem], as_of: DateTime<Utc>) -> ReviewStats {
    let average_retention = if items.is_empty() {
        100
    } else {
        let total: u32 = items.iter().map(|i| u32::from(i.retention)).sum();
        percentage(total as usize, items.len() * 100)
    };

    let mut items_by_interval = BTreeMap::new();
    for item in items {
        *items_by_interval.entry(item.interval_index).or_insert(0) += 1;
    }

    ReviewStats {
        total_items: items.len(),
        due_today: due_today(items, as_of).len(),
        overdue: overdue(items, as_of).len(),
        average_retention,
        items_by_interval,
    }
}

/// Prioritized study suggestions derived from stats and analytics.
pub fn recommendations(items: &[ReviewItem], as_of: DateTime<Utc>) -> Vec<Recommendation> {
    let stats = review_stats(items, as_of);
    let analytics = performance_analytics(items);
    let mut out = Vec::new();

    if stats.overdue > 0 {
        out.push(Recommendation {
            kind: RecommendationKind::OverdueBacklog,
            detail: format!(
                "{} overdue review(s) waiting; complete these first to prevent forgetting",
                stats.overdue
            ),
        });
    }
    if analytics.struggling > 0 {
        out.push(Recommendation {
            kind: RecommendationKind::StrugglingFocus,
            detail: format!(
                "{} concept(s) need extra attention; revisit the source material before the next session",
                analytics.struggling
            ),
        });
    }
    if analytics.mastered > 0 {
        out.push(Recommendation {
            kind: RecommendationKind::MasteredProgress,
            detail: format!(
                "{} concept(s) mastered; these will come up less often",
                analytics.mastered
            ),
        });
    }
    if !analytics.declining_items.is_empty() {
        out.push(Recommendation {
            kind: RecommendationKind::DecliningRetention,
            detail: format!(
                "{} concept(s) show declining retention; re-read the source material",
                analytics.declining_items.len()
            ),
        });
    }
    if !analytics.improving_items.is_empty() {
        out.push(Recommendation {
            kind: RecommendationKind::ImprovingProgress,
            detail: format!(
                "{} concept(s) improving with each review",
                analytics.improving_items.len()
            ),
        });
    }
    if stats.average_retention >= 80 && stats.overdue == 0 && stats.total_items > 0 {
        out.push(Recommendation {
            kind: RecommendationKind::ConsistentPerformance,
            detail: format!(
                "average retention is {}%; keep up the daily reviews",
                stats.average_retention
            ),
        });
    }
    if stats.total_items == 0 {
        out.push(Recommendation {
            kind: RecommendationKind::GettingStarted,
            detail: "complete an assessment to seed the review schedule".into(),
        });
    }

    out
}
