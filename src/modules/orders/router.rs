use axum::{
    Router,
    routing::{get, post},
};

use crate::modules::orders::handlers;
use crate::shared::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/orders", get(handlers::list_user_orders))
        .route("/orders/create", post(handlers::create_order))
        .with_state(state)
}
