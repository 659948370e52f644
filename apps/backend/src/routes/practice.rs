//! Practice session creation

use axum::{extract::State, Json};

use crate::error::Result;
use crate::models::*;
use crate::services::session::SessionService;
use crate::AppState;

/// POST /api/practice/start
pub async fn start(
    State(state): State<AppState>,
    Json(payload): Json<StartPracticeRequest>,
) -> Result<Json<StartPracticeResponse>> {
    let service = SessionService::new(state.store.clone());
    Ok(Json(service.start(payload).await?))
}
