use axum::{
    Json,
    extract::{Query, State},
};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder};
use serde::Deserialize;
use serde_json::{Value, json};

use super::service::CourierService;
use crate::modules::orders::entities::{delivery_order, enums::OrderStatus, order_item};
use crate::modules::orders::service::OrderService;
use crate::shared::{
    error::{AppError, AppResult},
    state::AppState,
};

#[derive(Deserialize)]
pub struct CourierQuery {
    pub user_id: i32,
}

#[derive(Deserialize)]
pub struct BoardQuery {
    pub user_id: Option<i32>,
}

#[derive(Deserialize)]
pub struct OrderActionRequest {
    pub order_id: i32,
    pub user_id: i32,
}

#[derive(Deserialize)]
pub struct MarkReadRequest {
    pub user_id: i32,
    pub message_id: Option<i32>,
}

#[derive(Deserialize)]
pub struct SendChatRequest {
    pub user_id: i32,
    pub body: String,
}

/// Pending orders are visible to every courier; a known courier also sees
/// the orders currently assigned to them.
pub async fn list_orders(
    State(state): State<AppState>,
    Query(params): Query<BoardQuery>,
) -> AppResult<Json<Value>> {
    let mut visible = Condition::any().add(delivery_order::Column::Status.eq(OrderStatus::Pending));

    if let Some(user_id) = params.user_id {
        let courier = CourierService::ensure_for_user(&state.db, user_id).await?;
        visible = visible.add(
            Condition::all()
                .add(delivery_order::Column::Status.eq(OrderStatus::Assigned))
                .add(delivery_order::Column::CourierId.eq(courier.id)),
        );
    }

    let orders = delivery_order::Entity::find()
        .filter(visible)
        .order_by_desc(delivery_order::Column::CreatedAt)
        .find_with_related(order_item::Entity)
        .all(&state.db)
        .await?;

    let orders: Vec<Value> = orders
        .into_iter()
        .map(|(order, items)| json!({ "order": order, "items": items }))
        .collect();

    Ok(Json(json!({ "success": true, "orders": orders })))
}

pub async fn accept_order(
    State(state): State<AppState>,
    Json(payload): Json<OrderActionRequest>,
) -> AppResult<Json<Value>> {
    let courier = CourierService::ensure_for_user(&state.db, payload.user_id).await?;
    let order = OrderService::accept(&state.db, payload.order_id, &courier).await?;
    Ok(Json(json!({ "success": true, "order": order })))
}

pub async fn complete_order(
    State(state): State<AppState>,
    Json(payload): Json<OrderActionRequest>,
) -> AppResult<Json<Value>> {
    let courier = CourierService::ensure_for_user(&state.db, payload.user_id).await?;
    let order = OrderService::complete(&state.db, payload.order_id, &courier).await?;
    Ok(Json(json!({ "success": true, "order": order })))
}

pub async fn cancel_order(
    State(state): State<AppState>,
    Json(payload): Json<OrderActionRequest>,
) -> AppResult<Json<Value>> {
    let courier = CourierService::ensure_for_user(&state.db, payload.user_id).await?;
    let order = OrderService::cancel(&state.db, payload.order_id, &courier).await?;
    Ok(Json(json!({ "success": true, "order": order })))
}

pub async fn profile(
    State(state): State<AppState>,
    Query(params): Query<CourierQuery>,
) -> AppResult<Json<Value>> {
    let courier = CourierService::ensure_for_user(&state.db, params.user_id).await?;

    let goal_progress = if courier.daily_goal > Decimal::ZERO {
        ((courier.today_earnings / courier.daily_goal) * Decimal::from(100)).round_dp(1)
    } else {
        Decimal::ZERO
    };

    Ok(Json(json!({
        "success": true,
        "courier": courier,
        "goal_progress": goal_progress,
    })))
}

pub async fn inbox(
    State(state): State<AppState>,
    Query(params): Query<CourierQuery>,
) -> AppResult<Json<Value>> {
    let courier = CourierService::ensure_for_user(&state.db, params.user_id).await?;
    let (messages, unread) = CourierService::inbox(&state.db, courier.id).await?;

    Ok(Json(json!({
        "success": true,
        "messages": messages,
        "unread": unread,
    })))
}

pub async fn mark_messages_read(
    State(state): State<AppState>,
    Json(payload): Json<MarkReadRequest>,
) -> AppResult<Json<Value>> {
    let courier = CourierService::ensure_for_user(&state.db, payload.user_id).await?;
    let updated =
        CourierService::mark_messages_read(&state.db, courier.id, payload.message_id).await?;

    Ok(Json(json!({ "success": true, "updated": updated })))
}

pub async fn chat(
    State(state): State<AppState>,
    Query(params): Query<CourierQuery>,
) -> AppResult<Json<Value>> {
    let courier = CourierService::ensure_for_user(&state.db, params.user_id).await?;
    let chat = CourierService::ensure_chat(&state.db, courier.id).await?;
    let (messages, unread) = CourierService::transcript(&state.db, chat.id).await?;

    Ok(Json(json!({
        "success": true,
        "chat_id": chat.id,
        "messages": messages,
        "unread": unread,
    })))
}

pub async fn send_chat_message(
    State(state): State<AppState>,
    Json(payload): Json<SendChatRequest>,
) -> AppResult<Json<Value>> {
    if payload.body.trim().is_empty() {
        return Err(AppError::BadRequest("Message body is required".to_string()));
    }

    let courier = CourierService::ensure_for_user(&state.db, payload.user_id).await?;
    let chat = CourierService::ensure_chat(&state.db, courier.id).await?;
    let message = CourierService::send_message(&state.db, chat.id, payload.body).await?;

    Ok(Json(json!({ "success": true, "message": message })))
}
