//! Review queue endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use learning_core::{PerformanceAnalytics, Recommendation, ReviewItem, ReviewStats};

use crate::error::Result;
use crate::models::*;
use crate::services::review::ReviewService;
use crate::AppState;

/// GET /api/review/queue
pub async fn queue(
    State(state): State<AppState>,
    Query(query): Query<ReviewQuery>,
) -> Result<Json<ReviewQueueResponse>> {
    let service = ReviewService::new(state.store.clone());
    let as_of = query.as_of.unwrap_or_else(Utc::now);
    Ok(Json(service.queue(&query.user_id, as_of).await?))
}

/// POST /api/review/{item_id}
pub async fn record(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
    Json(payload): Json<ReviewOutcomeRequest>,
) -> Result<Json<ReviewItem>> {
    let service = ReviewService::new(state.store.clone());
    let item = service
        .record_outcome(&payload.user_id, &item_id, payload.correct, Utc::now())
        .await?;
    Ok(Json(item))
}

/// GET /api/review/stats
pub async fn stats(
    State(state): State<AppState>,
    Query(query): Query<ReviewQuery>,
) -> Result<Json<ReviewStats>> {
    let service = ReviewService::new(state.store.clone());
    let as_of = query.as_of.unwrap_or_else(Utc::now);
    Ok(Json(service.stats(&query.user_id, as_of).await?))
}

/// GET /api/review/analytics
pub async fn analytics(
    State(state): State<AppState>,
    Query(query): Query<ReviewQuery>,
) -> Result<Json<PerformanceAnalytics>> {
    let service = ReviewService::new(state.store.clone());
    Ok(Json(service.analytics(&query.user_id).await?))
}

/// GET /api/review/recommendations
pub async fn recommendations(
    State(state): State<AppState>,
    Query(query): Query<ReviewQuery>,
) -> Result<Json<Vec<Recommendation>>> {
    let service = ReviewService::new(state.store.clone());
    let as_of = query.as_of.unwrap_or_else(Utc::now);
    Ok(Json(service.recommendations(&query.user_id, as_of).await?))
}
