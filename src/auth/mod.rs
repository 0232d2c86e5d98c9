use axum::{routing::post, Router};

use crate::{state::AppState, web};

pub mod dto;
pub(crate) mod extractors;
pub mod handlers;
pub mod jwt;
pub mod password;
pub mod services;
pub mod validation;

pub fn router(state: &AppState) -> Router<AppState> {
    let routes = Router::new().route(
        "/auth",
        post(handlers::authenticate)
            .options(web::preflight)
            .fallback(web::method_not_allowed),
    );
    web::endpoint(routes, &web::AUTH_CORS, state)
}
