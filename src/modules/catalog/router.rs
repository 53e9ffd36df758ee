use axum::{Router, routing::get};

use crate::modules::catalog::handlers;
use crate::shared::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(handlers::list_categories))
        .route("/products", get(handlers::list_products))
        .route("/products/:id", get(handlers::get_product))
        .with_state(state)
}
