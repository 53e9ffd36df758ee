use axum::{Router, routing::post};

use crate::modules::auth::handlers;
use crate::shared::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/auth/register", post(handlers::register))
        .route("/auth/login", post(handlers::login))
        .route("/auth/google", post(handlers::google))
        .with_state(state)
}
