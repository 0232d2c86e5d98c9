use axum::{
    extract::{rejection::JsonRejection, FromRef, State},
    Json,
};
use tracing::instrument;

use super::{
    dto::{AuthRequest, AuthResponse},
    jwt::JwtKeys,
    services,
    validation::{validate_login, validate_register},
};
use crate::{
    error::{ApiError, ErrorResponse},
    state::AppState,
    web,
};

/// `POST /auth`: register when `action == "register"`, otherwise log in.
#[instrument(skip(state, payload))]
pub async fn authenticate(
    State(state): State<AppState>,
    payload: Result<Json<AuthRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ErrorResponse> {
    let messages = &state.config.messages;
    let Json(req) = payload.map_err(|e| web::body_error(e).localize(messages))?;
    dispatch(&state, req)
        .await
        .map(Json)
        .map_err(|e| e.localize(messages))
}

async fn dispatch(state: &AppState, req: AuthRequest) -> Result<AuthResponse, ApiError> {
    let keys = JwtKeys::from_ref(state);
    if req.is_register() {
        let input = validate_register(&req)?;
        services::register(state.store.as_ref(), &keys, input).await
    } else {
        let input = validate_login(&req)?;
        services::login(state.store.as_ref(), &keys, input).await
    }
}
