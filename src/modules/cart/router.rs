use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::modules::cart::handlers;
use crate::shared::{middleware::require_known_user, state::AppState};

pub fn router(state: AppState) -> Router {
    // Query-keyed routes get the user-existence middleware; body-keyed
    // handlers validate the user themselves.
    let query_keyed = Router::new()
        .route(
            "/cart",
            get(handlers::get_cart).delete(handlers::clear_cart),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_known_user,
        ));

    Router::new()
        .route("/cart/add", post(handlers::add_item))
        .route(
            "/cart/:item_id",
            put(handlers::update_quantity).delete(handlers::remove_item),
        )
        .merge(query_keyed)
        .with_state(state)
}
