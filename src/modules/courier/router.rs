use axum::{
    Router,
    routing::{get, post},
};

use crate::modules::courier::handlers;
use crate::shared::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/courier/orders", get(handlers::list_orders))
        .route("/courier/orders/accept", post(handlers::accept_order))
        .route("/courier/orders/complete", post(handlers::complete_order))
        .route("/courier/orders/cancel", post(handlers::cancel_order))
        .route("/courier/profile", get(handlers::profile))
        .route("/courier/messages", get(handlers::inbox))
        .route("/courier/messages/read", post(handlers::mark_messages_read))
        .route("/courier/chat", get(handlers::chat))
        .route("/courier/chat/send", post(handlers::send_chat_message))
        .with_state(state)
}
