use axum::{
    extract::{Query, Request, State},
    middleware::Next,
    response::Response,
};
use serde::Deserialize;

use crate::modules::users::service::UserService;
use crate::shared::{
    error::{AppError, AppResult},
    state::AppState,
};

#[derive(Deserialize)]
pub struct UserIdParam {
    user_id: Option<i32>,
}

/// Rejects query-keyed requests whose `user_id` does not name an existing
/// user. Body-keyed handlers run the same check themselves.
pub async fn require_known_user(
    State(state): State<AppState>,
    Query(params): Query<UserIdParam>,
    request: Request,
    next: Next,
) -> AppResult<Response> {
    let user_id = params
        .user_id
        .ok_or_else(|| AppError::BadRequest("user_id is required".to_string()))?;

    UserService::ensure_exists(&state.db, user_id).await?;

    Ok(next.run(request).await)
}
