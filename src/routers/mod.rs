use axum::{Json, Router, routing::get};
use serde_json::{Value, json};

use crate::modules::{auth, cart, catalog, courier, orders, users};
use crate::shared::state::AppState;

async fn health() -> Json<Value> {
    Json(json!({ "success": true, "status": "ok" }))
}

pub fn init_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(catalog::router::router(state.clone()))
        .merge(auth::router::router(state.clone()))
        .merge(users::router::router(state.clone()))
        .merge(cart::router::router(state.clone()))
        .merge(orders::router::router(state.clone()))
        .merge(courier::router::router(state));

    Router::new().route("/health", get(health)).nest("/api", api)
}
