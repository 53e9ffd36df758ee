use axum::{
    Json,
    extract::{Query, State},
};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::Deserialize;
use serde_json::{Value, json};

use super::entities::{delivery_order, order_item};
use super::service::{CreateOrderInput, OrderService};
use crate::modules::users::service::UserService;
use crate::shared::{
    error::{AppError, AppResult},
    state::AppState,
};

#[derive(Deserialize)]
pub struct CreateOrderRequest {
    pub user_id: i32,
    pub product_id: i32,
    pub quantity: Option<i32>,
    pub total_amount: Decimal,
    pub address: String,
    pub contact_phone: String,
}

#[derive(Deserialize)]
pub struct UserOrdersQuery {
    pub user_id: i32,
}

pub async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<Json<Value>> {
    let quantity = payload.quantity.unwrap_or(1);
    if quantity < 1 {
        return Err(AppError::BadRequest(
            "Quantity must be at least 1".to_string(),
        ));
    }
    if payload.address.is_empty() {
        return Err(AppError::BadRequest(
            "Delivery address is required".to_string(),
        ));
    }
    if payload.contact_phone.is_empty() {
        return Err(AppError::BadRequest(
            "Contact phone is required".to_string(),
        ));
    }
    if payload.total_amount <= Decimal::ZERO {
        return Err(AppError::BadRequest(
            "Total amount must be positive".to_string(),
        ));
    }

    UserService::ensure_exists(&state.db, payload.user_id).await?;

    let (order, item) = OrderService::create(
        &state.db,
        CreateOrderInput {
            user_id: payload.user_id,
            product_id: payload.product_id,
            quantity,
            total_amount: payload.total_amount,
            delivery_address: payload.address,
            contact_phone: payload.contact_phone,
        },
    )
    .await?;

    // The response never waits on the dispatcher channel.
    let notifier = state.notifier.clone();
    let notify_order = order.clone();
    let notify_item = item.clone();
    tokio::spawn(async move {
        notifier.order_created(&notify_order, &notify_item).await;
    });

    Ok(Json(json!({ "success": true, "order": order, "items": [item] })))
}

pub async fn list_user_orders(
    State(state): State<AppState>,
    Query(params): Query<UserOrdersQuery>,
) -> AppResult<Json<Value>> {
    UserService::ensure_exists(&state.db, params.user_id).await?;

    let orders = delivery_order::Entity::find()
        .filter(delivery_order::Column::UserId.eq(params.user_id))
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
