use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, Set};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::modules::users::entities::user;
use crate::modules::users::service::UserService;
use crate::shared::{
    error::{AppError, AppResult},
    state::AppState,
};

#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

#[derive(Deserialize)]
pub struct SetAvatarRequest {
    pub avatar: String,
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Value>> {
    let user = UserService::ensure_exists(&state.db, id).await?;
    Ok(Json(json!({ "success": true, "user": user })))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateProfileRequest>,
) -> AppResult<Json<Value>> {
    let user = UserService::ensure_exists(&state.db, id).await?;

    if let Some(username) = &payload.username {
        if username.is_empty() {
            return Err(AppError::BadRequest("Username cannot be empty".to_string()));
        }
        if *username != user.username {
            UserService::check_username_free(&state.db, username).await?;
        }
    }
    if let Some(email) = &payload.email {
        if email.is_empty() {
            return Err(AppError::BadRequest("Email cannot be empty".to_string()));
        }
        if *email != user.email {
            UserService::check_email_free(&state.db, email).await?;
        }
    }

    let mut active: user::ActiveModel = user.into();
    if let Some(username) = payload.username {
        active.username = Set(username);
    }
    if let Some(email) = payload.email {
        active.email = Set(email);
    }
    if let Some(phone) = payload.phone {
        active.phone = Set(Some(phone));
    }
    active.updated_at = Set(Utc::now().naive_utc());

    let user = active.update(&state.db).await?;
    Ok(Json(json!({ "success": true, "user": user })))
}

pub async fn change_password(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<ChangePasswordRequest>,
) -> AppResult<Json<Value>> {
    if payload.new_password.len() < 6 {
        return Err(AppError::BadRequest(
            "Password must be at least 6 characters".to_string(),
        ));
    }

    let user = UserService::ensure_exists(&state.db, id).await?;

    if !state.hasher.verify(&user.password_hash, &payload.old_password)? {
        return Err(AppError::Unauthorized(
            "Current password is incorrect".to_string(),
        ));
    }

    let new_hash = state.hasher.hash(&payload.new_password)?;
    let mut active: user::ActiveModel = user.into();
    active.password_hash = Set(new_hash);
    active.updated_at = Set(Utc::now().naive_utc());
    active.update(&state.db).await?;

    Ok(Json(json!({ "success": true })))
}

pub async fn set_avatar(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<SetAvatarRequest>,
) -> AppResult<Json<Value>> {
    let user = UserService::ensure_exists(&state.db, id).await?;

    let mut active: user::ActiveModel = user.into();
    active.avatar = Set(Some(payload.avatar));
    active.updated_at = Set(Utc::now().naive_utc());
    let user = active.update(&state.db).await?;

    Ok(Json(json!({ "success": true, "user": user })))
}
