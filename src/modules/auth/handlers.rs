use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};

use super::service::AuthService;
use crate::modules::users::service::UserService;
use crate::shared::{
    error::{AppError, AppResult},
    state::AppState,
};

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct GoogleLoginRequest {
    pub credential: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<Json<Value>> {
    if payload.username.is_empty() {
        return Err(AppError::BadRequest("Username is required".to_string()));
    }
    if payload.email.is_empty() || !payload.email.contains('@') {
        return Err(AppError::BadRequest("A valid email is required".to_string()));
    }
    if payload.password.len() < 6 {
        return Err(AppError::BadRequest(
            "Password must be at least 6 characters".to_string(),
        ));
    }

    let user = UserService::register(
        &state.db,
        state.hasher.as_ref(),
        payload.username,
        payload.email,
        payload.password,
        payload.phone,
    )
    .await?;

    Ok(Json(json!({ "success": true, "user": user })))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<Value>> {
    if payload.username.is_empty() || payload.password.is_empty() {
        return Err(AppError::BadRequest(
            "Username and password are required".to_string(),
        ));
    }

    let user = UserService::login(
        &state.db,
        state.hasher.as_ref(),
        &payload.username,
        &payload.password,
    )
    .await?;

    Ok(Json(json!({ "success": true, "user": user })))
}

pub async fn google(
    State(state): State<AppState>,
    Json(payload): Json<GoogleLoginRequest>,
) -> AppResult<Json<Value>> {
    if payload.credential.is_empty() {
        return Err(AppError::BadRequest("credential is required".to_string()));
    }

    let identity = state.google.verify(&payload.credential).await?;
    let user = AuthService::google_login(&state.db, state.hasher.as_ref(), identity).await?;

    Ok(Json(json!({ "success": true, "user": user })))
}
