use axum::{
    Router,
    routing::{get, put},
};

use crate::modules::users::handlers;
use crate::shared::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/users/:id", get(handlers::get_user))
        .route("/users/:id/profile", put(handlers::update_profile))
        .route("/users/:id/password", put(handlers::change_password))
        .route("/users/:id/avatar", put(handlers::set_avatar))
        .with_state(state)
}
