//! Request/response plumbing shared by the `/auth` and `/progress` routes.

use std::time::Duration;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    Router,
};
use tower_http::timeout::TimeoutLayer;
use tracing::warn;

use crate::{
    error::{ApiError, ErrorResponse, ValidationErrors},
    state::AppState,
};

/// CORS headers attached to every response of one endpoint.
#[derive(Debug)]
pub struct CorsPolicy {
    pub methods: &'static str,
    pub headers: &'static str,
}

pub static AUTH_CORS: CorsPolicy = CorsPolicy {
    methods: "GET, POST, OPTIONS",
    headers: "Content-Type, X-User-Id, X-Auth-Token, X-Session-Id",
};

pub static PROGRESS_CORS: CorsPolicy = CorsPolicy {
    methods: "GET, POST, PUT, OPTIONS",
    headers: "Content-Type, X-Auth-Token, Authorization",
};

impl CorsPolicy {
    pub fn apply(&self, headers: &mut HeaderMap) {
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(self.methods),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(self.headers),
        );
        headers.insert(
            header::ACCESS_CONTROL_MAX_AGE,
            HeaderValue::from_static("86400"),
        );
    }
}

/// Wrap an endpoint's routes: per-request timeout innermost, then the
/// localized timeout body, then CORS on everything that comes out.
pub fn endpoint(
    routes: Router<AppState>,
    policy: &'static CorsPolicy,
    state: &AppState,
) -> Router<AppState> {
    let timeout = Duration::from_secs(state.config.server.request_timeout_secs);
    routes
        .layer(TimeoutLayer::new(timeout))
        .layer(middleware::map_response_with_state(state.clone(), localize_timeout))
        .layer(middleware::map_response(move |res: Response| with_cors(policy, res)))
}

/// `TimeoutLayer` answers with a bare 408; give it the usual `{error}` body.
async fn localize_timeout(State(state): State<AppState>, res: Response) -> Response {
    if res.status() != StatusCode::REQUEST_TIMEOUT {
        return res;
    }
    warn!(
        timeout_secs = state.config.server.request_timeout_secs,
        "request timed out"
    );
    ApiError::Timeout.localize(&state.config.messages).into_response()
}

pub async fn with_cors(policy: &'static CorsPolicy, mut res: Response) -> Response {
    policy.apply(res.headers_mut());
    res
}

/// `OPTIONS` on any endpoint: 200 with an empty body.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

pub async fn method_not_allowed(State(state): State<AppState>) -> ErrorResponse {
    ApiError::MethodNotAllowed.localize(&state.config.messages)
}

/// Unparseable or mistyped JSON bodies are validation failures.
pub fn body_error(rejection: JsonRejection) -> ApiError {
    ApiError::Validation(ValidationErrors::single("body", rejection.body_text()))
}
