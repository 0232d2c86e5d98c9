use axum::{routing::get, Router};

use crate::{state::AppState, web};

pub mod dto;
pub mod handlers;
pub mod services;

pub fn router(state: &AppState) -> Router<AppState> {
    let routes = Router::new().route(
        "/progress",
        get(handlers::load)
            .post(handlers::save)
            .put(handlers::save)
            .head(web::method_not_allowed)
            .options(web::preflight)
            .fallback(web::method_not_allowed),
    );
    web::endpoint(routes, &web::PROGRESS_CORS, state)
}
