use axum::{
    Json,
    extract::{Path, Query, State},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};

use super::entities::cart_item;
use super::service::CartService;
use crate::modules::catalog::entities::product;
use crate::modules::users::service::UserService;
use crate::shared::{
    error::{AppError, AppResult},
    state::AppState,
};

#[derive(Deserialize)]
pub struct CartQuery {
    pub user_id: i32,
}

#[derive(Deserialize)]
pub struct AddItemRequest {
    pub user_id: i32,
    pub product_id: i32,
    pub quantity: Option<i32>,
}

#[derive(Deserialize)]
pub struct UpdateQuantityRequest {
    pub user_id: i32,
    pub quantity: i32,
}

/// Enriches cart rows with live product attributes; totals are computed at
/// read time, never stored. Rows whose product vanished are skipped.
fn shape_cart(rows: Vec<(cart_item::Model, Option<product::Model>)>) -> (Vec<Value>, Decimal) {
    let mut total = Decimal::ZERO;
    let mut items = Vec::with_capacity(rows.len());

    for (item, product) in rows {
        let Some(product) = product else { continue };
        let line_total = product.price * Decimal::from(item.quantity);
        total += line_total;

        items.push(json!({
            "id": item.id,
            "product_id": product.id,
            "name": product.name,
            "price": product.price,
            "image": product.image,
            "in_stock": product.in_stock,
            "quantity": item.quantity,
            "line_total": line_total,
        }));
    }

    (items, total)
}

pub async fn get_cart(
    State(state): State<AppState>,
    Query(params): Query<CartQuery>,
) -> AppResult<Json<Value>> {
    let rows = CartService::get_items(&state.db, params.user_id).await?;
    let (items, total) = shape_cart(rows);

    Ok(Json(json!({ "success": true, "items": items, "total": total })))
}

pub async fn add_item(
    State(state): State<AppState>,
    Json(payload): Json<AddItemRequest>,
) -> AppResult<Json<Value>> {
    let quantity = payload.quantity.unwrap_or(1);
    if quantity < 1 {
        return Err(AppError::BadRequest(
            "Quantity must be at least 1".to_string(),
        ));
    }

    UserService::ensure_exists(&state.db, payload.user_id).await?;
    let item =
        CartService::add_item(&state.db, payload.user_id, payload.product_id, quantity).await?;

    Ok(Json(json!({ "success": true, "item": item })))
}

pub async fn update_quantity(
    State(state): State<AppState>,
    Path(item_id): Path<i32>,
    Json(payload): Json<UpdateQuantityRequest>,
) -> AppResult<Json<Value>> {
    if payload.quantity < 1 {
        return Err(AppError::BadRequest(
            "Quantity must be at least 1".to_string(),
        ));
    }

    CartService::update_quantity(&state.db, item_id, payload.user_id, payload.quantity).await?;
    Ok(Json(json!({ "success": true })))
}

pub async fn remove_item(
    State(state): State<AppState>,
    Path(item_id): Path<i32>,
    Query(params): Query<CartQuery>,
) -> AppResult<Json<Value>> {
    CartService::remove_item(&state.db, item_id, params.user_id).await?;
    Ok(Json(json!({ "success": true })))
}

pub async fn clear_cart(
    State(state): State<AppState>,
    Query(params): Query<CartQuery>,
) -> AppResult<Json<Value>> {
    let removed = CartService::clear(&state.db, params.user_id).await?;
    Ok(Json(json!({ "success": true, "removed": removed })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(id: i32, price: Decimal) -> product::Model {
        product::Model {
            id,
            category_id: 1,
            name: format!("Product {}", id),
            description: None,
            manufacturer: None,
            price,
            old_price: None,
            stock_quantity: 10,
            is_popular: false,
            is_new: false,
            in_stock: true,
            image: None,
            created_at: Utc::now().naive_utc(),
        }
    }

    fn item(id: i32, product_id: i32, quantity: i32) -> cart_item::Model {
        cart_item::Model {
            id,
            user_id: 1,
            product_id,
            quantity,
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
        }
    }

    #[test]
    fn cart_total_reflects_live_prices() {
        let rows = vec![
            (item(1, 10, 5), Some(product(10, Decimal::new(250, 2)))), // 5 x 2.50
            (item(2, 11, 1), Some(product(11, Decimal::new(999, 2)))), // 1 x 9.99
        ];

        let (items, total) = shape_cart(rows);
        assert_eq!(items.len(), 2);
        assert_eq!(total, Decimal::new(2249, 2));
        assert_eq!(items[0]["line_total"], json!("12.50"));
    }

    #[test]
    fn rows_without_product_are_dropped() {
        let rows = vec![(item(1, 10, 2), None)];
        let (items, total) = shape_cart(rows);
        assert!(items.is_empty());
        assert_eq!(total, Decimal::ZERO);
    }
}
