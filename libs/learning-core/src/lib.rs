//! Core adaptive learning engine for the exam-preparation platform.
//!
//! Provides:
//! - Interval-ladder review scheduling with retention-adaptive multipliers
//! - Difficulty classification and read-only review analytics
//! - Tiered practice-question targeting with deterministic fallbacks
//! - Assessment scoring, breakdowns, and remediation planning
//! - Shared types (Question, ReviewItem, AssessmentSession, etc.)
//!
//! Everything here is pure computation over data; persistence and HTTP
//! live in the backend application.

pub mod answer;
pub mod difficulty;
pub mod error;
pub mod rounding;
pub mod scheduler;
pub mod scoring;
pub mod session;
pub mod targeting;
pub mod types;

pub use answer::{evaluate, Selection};
pub use difficulty::{
    performance_analytics, recommendations, review_stats, DifficultyTier, PerformanceAnalytics,
    Recommendation, RecommendationKind, ReviewStats,
};
pub use error::{EngineError, Result};
pub use scheduler::{due_today, due_within_days, overdue, ReviewScheduler, DEFAULT_LADDER};
pub use scoring::{
    pass_threshold, score, AssessmentResult, MasteryLevel, PerformanceMetrics, PriorityObjective,
    RemediationPlan, ScoreBreakdown,
};
pub use session::{
    AssessmentConfig, AssessmentSession, AssessmentType, QuestionResponse, SessionStatus,
};
pub use targeting::{
    select, select_seeded, FallbackStrategy, FallbackTier, PracticeTargeting, QuestionPool,
    RecommendedFallback,
};
pub use types::{Choice, Difficulty, ExamDomain, Question, ReviewItem, ReviewRecord};
