//! Session endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::error::Result;
use crate::models::*;
use crate::services::session::SessionService;
use crate::AppState;

/// GET /api/sessions
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<SessionListQuery>,
) -> Result<Json<SessionListResponse>> {
    let service = SessionService::new(state.store.clone());
    Ok(Json(service.list(&query.user_id).await?))
}

/// GET /api/sessions/{id}
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>> {
    let service = SessionService::new(state.store.clone());
    Ok(Json(service.get(&id).await?))
}

/// POST /api/sessions/{id}/answer
pub async fn answer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<AnswerRequest>,
) -> Result<Json<AnswerResponse>> {
    let service = SessionService::new(state.store.clone());
    Ok(Json(service.answer(&id, payload).await?))
}

/// POST /api/sessions/{id}/navigate
pub async fn navigate(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<NavigateRequest>,
) -> Result<Json<NavigateResponse>> {
    let service = SessionService::new(state.store.clone());
    Ok(Json(service.navigate(&id, payload).await?))
}

/// POST /api/sessions/{id}/submit
pub async fn submit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SubmitResponse>> {
    let service = SessionService::new(state.store.clone());
    Ok(Json(service.submit(&id).await?))
}
