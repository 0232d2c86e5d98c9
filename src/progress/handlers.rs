use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::instrument;

use super::{
    dto::{LoadProgressResponse, SaveProgressRequest, SaveProgressResponse},
    services,
};
use crate::{auth::extractors::AuthUser, error::ErrorResponse, state::AppState, web};

/// `GET /progress`
#[instrument(skip(state))]
pub async fn load(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<LoadProgressResponse>, ErrorResponse> {
    let game_stats = services::load_progress(state.store.as_ref(), user_id)
        .await
        .map_err(|e| e.localize(&state.config.messages))?;
    Ok(Json(LoadProgressResponse {
        success: true,
        game_stats,
    }))
}

/// `POST|PUT /progress`
#[instrument(skip(state, payload))]
pub async fn save(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<SaveProgressRequest>, JsonRejection>,
) -> Result<Json<SaveProgressResponse>, ErrorResponse> {
    let messages = &state.config.messages;
    let Json(req) = payload.map_err(|e| web::body_error(e).localize(messages))?;
    let saved_at = services::save_progress(state.store.as_ref(), user_id, req.game_stats)
        .await
        .map_err(|e| e.localize(messages))?;
    Ok(Json(SaveProgressResponse {
        success: true,
        message: messages.progress_saved.clone(),
        saved_at,
    }))
}
