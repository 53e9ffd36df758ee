use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, QueryFilter, TransactionTrait,
};

use super::entities::{delivery_order, enums::OrderStatus, order_item};
use crate::modules::catalog::entities::product;
use crate::modules::courier::entities::courier;
use crate::shared::error::{AppError, AppResult};

/// Flat commission a courier earns on every delivered order.
fn commission_rate() -> Decimal {
    Decimal::new(10, 2) // 0.10
}

/// Human-readable order identifier derived from the creation instant.
pub fn generate_order_code(now: DateTime<Utc>) -> String {
    format!("ORD-{}", now.format("%Y%m%d%H%M%S%3f"))
}

pub struct CreateOrderInput {
    pub user_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub total_amount: Decimal,
    pub delivery_address: String,
    pub contact_phone: String,
}

pub struct OrderService;

impl OrderService {
    /// Creates the order row and its snapshot item row atomically; a missing
    /// product aborts before anything is written.
    pub async fn create(
        db: &DatabaseConnection,
        input: CreateOrderInput,
    ) -> AppResult<(delivery_order::Model, order_item::Model)> {
        let txn = db.begin().await?;

        let product = product::Entity::find_by_id(input.product_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

        let created_at = Utc::now();
        let now = created_at.naive_utc();

        let order = delivery_order::ActiveModel {
            order_code: Set(generate_order_code(created_at)),
            user_id: Set(input.user_id),
            courier_id: Set(None),
            status: Set(OrderStatus::Pending),
            total_amount: Set(input.total_amount),
            delivery_address: Set(input.delivery_address),
            contact_phone: Set(input.contact_phone),
            created_at: Set(now),
            assigned_at: Set(None),
            delivered_at: Set(None),
            cancelled_at: Set(None),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let unit_price = product.price;
        let item = order_item::ActiveModel {
            order_id: Set(order.id),
            product_id: Set(product.id),
            product_name: Set(product.name),
            quantity: Set(input.quantity),
            unit_price: Set(unit_price),
            total_price: Set(unit_price * Decimal::from(input.quantity)),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        Ok((order, item))
    }

    /// pending -> assigned. The status predicate makes the row-level update
    /// the only arbiter between racing couriers; the loser matches nothing.
    pub async fn accept(
        db: &DatabaseConnection,
        order_id: i32,
        courier: &courier::Model,
    ) -> AppResult<delivery_order::Model> {
        let now = Utc::now().naive_utc();

        let result = delivery_order::Entity::update_many()
            .col_expr(
                delivery_order::Column::Status,
                Expr::value(OrderStatus::Assigned),
            )
            .col_expr(delivery_order::Column::CourierId, Expr::value(courier.id))
            .col_expr(delivery_order::Column::AssignedAt, Expr::value(now))
            .filter(delivery_order::Column::Id.eq(order_id))
            .filter(delivery_order::Column::Status.eq(OrderStatus::Pending))
            .exec(db)
            .await?;

        if result.rows_affected == 0 {
            return Err(Self::transition_failure(db, order_id, OrderStatus::Assigned, courier).await);
        }

        Self::fetch(db, order_id).await
    }

    /// assigned -> delivered, scoped to the assigned courier. Completion and
    /// earnings accrual commit together or not at all.
    pub async fn complete(
        db: &DatabaseConnection,
        order_id: i32,
        courier: &courier::Model,
    ) -> AppResult<delivery_order::Model> {
        let now = Utc::now().naive_utc();
        let txn = db.begin().await?;

        let result = delivery_order::Entity::update_many()
            .col_expr(
                delivery_order::Column::Status,
                Expr::value(OrderStatus::Delivered),
            )
            .col_expr(delivery_order::Column::DeliveredAt, Expr::value(now))
            .filter(delivery_order::Column::Id.eq(order_id))
            .filter(delivery_order::Column::Status.eq(OrderStatus::Assigned))
            .filter(delivery_order::Column::CourierId.eq(courier.id))
            .exec(&txn)
            .await?;

        if result.rows_affected == 0 {
            txn.rollback().await?;
            return Err(
                Self::transition_failure(db, order_id, OrderStatus::Delivered, courier).await,
            );
        }

        let order = Self::fetch(&txn, order_id).await?;

        let commission = order.total_amount * commission_rate();
        courier::Entity::update_many()
            .col_expr(
                courier::Column::CompletedOrders,
                Expr::col((courier::Entity, courier::Column::CompletedOrders)).add(1),
            )
            .col_expr(
                courier::Column::TotalEarnings,
                Expr::col((courier::Entity, courier::Column::TotalEarnings)).add(commission),
            )
            .col_expr(
                courier::Column::TodayEarnings,
                Expr::col((courier::Entity, courier::Column::TodayEarnings)).add(commission),
            )
            .col_expr(courier::Column::UpdatedAt, Expr::value(now))
            .filter(courier::Column::Id.eq(courier.id))
            .exec(&txn)
            .await?;

        txn.commit().await?;

        Ok(order)
    }

    /// assigned -> cancelled, scoped to the assigned courier.
    pub async fn cancel(
        db: &DatabaseConnection,
        order_id: i32,
        courier: &courier::Model,
    ) -> AppResult<delivery_order::Model> {
        let now = Utc::now().naive_utc();

        let result = delivery_order::Entity::update_many()
            .col_expr(
                delivery_order::Column::Status,
                Expr::value(OrderStatus::Cancelled),
            )
            .col_expr(delivery_order::Column::CancelledAt, Expr::value(now))
            .filter(delivery_order::Column::Id.eq(order_id))
            .filter(delivery_order::Column::Status.eq(OrderStatus::Assigned))
            .filter(delivery_order::Column::CourierId.eq(courier.id))
            .exec(db)
            .await?;

        if result.rows_affected == 0 {
            return Err(
                Self::transition_failure(db, order_id, OrderStatus::Cancelled, courier).await,
            );
        }

        Self::fetch(db, order_id).await
    }

    async fn fetch<C>(db: &C, order_id: i32) -> AppResult<delivery_order::Model>
    where
        C: ConnectionTrait,
    {
        delivery_order::Entity::find_by_id(order_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))
    }

    /// A guarded update that matched nothing is either a missing order, a
    /// state that cannot move to `attempted`, or another courier's order.
    async fn transition_failure(
        db: &DatabaseConnection,
        order_id: i32,
        attempted: OrderStatus,
        courier: &courier::Model,
    ) -> AppError {
        let order = match delivery_order::Entity::find_by_id(order_id).one(db).await {
            Ok(Some(order)) => order,
            Ok(None) => return AppError::NotFound("Order not found".to_string()),
            Err(e) => return e.into(),
        };

        if !order.status.can_transition_to(attempted) {
            let message = match attempted {
                OrderStatus::Assigned => "Order already taken",
                OrderStatus::Delivered => "Order cannot be completed in its current state",
                OrderStatus::Cancelled => "Order cannot be cancelled in its current state",
                OrderStatus::Pending => "Order cannot return to pending",
            };
            return AppError::Conflict(message.to_string());
        }

        if order.courier_id != Some(courier.id) {
            return AppError::Conflict("Order is assigned to another courier".to_string());
        }

        AppError::Conflict("Order state changed concurrently".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::courier::entities::enums::CourierStatus;
    use chrono::TimeZone;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn courier() -> courier::Model {
        courier::Model {
            id: 3,
            user_id: 9,
            status: CourierStatus::Available,
            rating: 5.0,
            completed_orders: 0,
            total_earnings: Decimal::ZERO,
            today_earnings: Decimal::ZERO,
            daily_goal: Decimal::new(500000, 2),
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
        }
    }

    fn order(status: OrderStatus, courier_id: Option<i32>) -> delivery_order::Model {
        delivery_order::Model {
            id: 1,
            order_code: "ORD-20260807120000000".to_owned(),
            user_id: 2,
            courier_id,
            status,
            total_amount: Decimal::new(25000, 2),
            delivery_address: "10 Main St".to_owned(),
            contact_phone: "+100000000".to_owned(),
            created_at: Utc::now().naive_utc(),
            assigned_at: None,
            delivered_at: None,
            cancelled_at: None,
        }
    }

    #[test]
    fn order_code_is_time_derived() {
        let at = Utc.with_ymd_and_hms(2026, 8, 7, 14, 23, 1).unwrap();
        assert_eq!(generate_order_code(at), "ORD-20260807142301000");
    }

    #[tokio::test]
    async fn accept_assigns_a_pending_order() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .append_query_results([vec![order(OrderStatus::Assigned, Some(3))]])
            .into_connection();

        let accepted = OrderService::accept(&db, 1, &courier()).await.unwrap();
        assert_eq!(accepted.status, OrderStatus::Assigned);
        assert_eq!(accepted.courier_id, Some(3));
    }

    #[tokio::test]
    async fn second_accept_loses_the_race() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .append_query_results([vec![order(OrderStatus::Assigned, Some(8))]])
            .into_connection();

        let result = OrderService::accept(&db, 1, &courier()).await;
        match result {
            Err(AppError::Conflict(msg)) => assert_eq!(msg, "Order already taken"),
            other => panic!("expected Conflict, got {:?}", other.map(|o| o.status)),
        }
    }

    #[tokio::test]
    async fn accept_of_unknown_order_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .append_query_results([Vec::<delivery_order::Model>::new()])
            .into_connection();

        let result = OrderService::accept(&db, 1, &courier()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn complete_before_accept_is_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .append_query_results([vec![order(OrderStatus::Pending, None)]])
            .into_connection();

        let result = OrderService::complete(&db, 1, &courier()).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn complete_delivers_and_accrues_commission() {
        let mut delivered = order(OrderStatus::Delivered, Some(3));
        delivered.delivered_at = Some(Utc::now().naive_utc());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }, // order update
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }, // courier accrual
            ])
            .append_query_results([vec![delivered]])
            .into_connection();

        let completed = OrderService::complete(&db, 1, &courier()).await.unwrap();
        assert_eq!(completed.status, OrderStatus::Delivered);
        assert!(completed.delivered_at.is_some());
    }

    #[tokio::test]
    async fn create_requires_an_existing_product() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<product::Model>::new()])
            .into_connection();

        let result = OrderService::create(
            &db,
            CreateOrderInput {
                user_id: 2,
                product_id: 99,
                quantity: 1,
                total_amount: Decimal::new(25000, 2),
                delivery_address: "10 Main St".to_string(),
                contact_phone: "+100000000".to_string(),
            },
        )
        .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn commission_is_ten_percent() {
        let total = Decimal::new(25000, 2); // 250.00
        assert_eq!(total * commission_rate(), Decimal::new(250000, 4)); // 25.00
    }
}
