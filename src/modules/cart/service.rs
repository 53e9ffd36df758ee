use chrono::{NaiveDateTime, Utc};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, Insert, QueryFilter,
};

use super::entities::cart_item;
use crate::modules::catalog::entities::product;
use crate::shared::error::{AppError, AppResult};

pub struct CartService;

impl CartService {
    /// Insert-or-increment on the (user_id, product_id) uniqueness pair.
    fn upsert_statement(
        user_id: i32,
        product_id: i32,
        quantity: i32,
        now: NaiveDateTime,
    ) -> Insert<cart_item::ActiveModel> {
        let row = cart_item::ActiveModel {
            user_id: Set(user_id),
            product_id: Set(product_id),
            quantity: Set(quantity),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        cart_item::Entity::insert(row).on_conflict(
            OnConflict::columns([cart_item::Column::UserId, cart_item::Column::ProductId])
                .value(
                    cart_item::Column::Quantity,
                    Expr::col((cart_item::Entity, cart_item::Column::Quantity)).add(quantity),
                )
                .value(cart_item::Column::UpdatedAt, Expr::val(now))
                .to_owned(),
        )
    }

    pub async fn add_item(
        db: &DatabaseConnection,
        user_id: i32,
        product_id: i32,
        quantity: i32,
    ) -> AppResult<cart_item::Model> {
        product::Entity::find_by_id(product_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

        let now = Utc::now().naive_utc();
        let item = Self::upsert_statement(user_id, product_id, quantity, now)
            .exec_with_returning(db)
            .await?;

        Ok(item)
    }

    pub async fn get_items(
        db: &DatabaseConnection,
        user_id: i32,
    ) -> AppResult<Vec<(cart_item::Model, Option<product::Model>)>> {
        let rows = cart_item::Entity::find()
            .filter(cart_item::Column::UserId.eq(user_id))
            .find_also_related(product::Entity)
            .all(db)
            .await?;
        Ok(rows)
    }

    pub async fn update_quantity(
        db: &DatabaseConnection,
        item_id: i32,
        user_id: i32,
        quantity: i32,
    ) -> AppResult<()> {
        let result = cart_item::Entity::update_many()
            .col_expr(cart_item::Column::Quantity, Expr::value(quantity))
            .col_expr(
                cart_item::Column::UpdatedAt,
                Expr::value(Utc::now().naive_utc()),
            )
            .filter(cart_item::Column::Id.eq(item_id))
            .filter(cart_item::Column::UserId.eq(user_id))
            .exec(db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound("Cart item not found".to_string()));
        }
        Ok(())
    }

    pub async fn remove_item(
        db: &DatabaseConnection,
        item_id: i32,
        user_id: i32,
    ) -> AppResult<()> {
        let result = cart_item::Entity::delete_many()
            .filter(cart_item::Column::Id.eq(item_id))
            .filter(cart_item::Column::UserId.eq(user_id))
            .exec(db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound("Cart item not found".to_string()));
        }
        Ok(())
    }

    pub async fn clear(db: &DatabaseConnection, user_id: i32) -> AppResult<u64> {
        let result = cart_item::Entity::delete_many()
            .filter(cart_item::Column::UserId.eq(user_id))
            .exec(db)
            .await?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, DbBackend, MockDatabase, MockExecResult, QueryTrait};

    #[test]
    fn upsert_increments_quantity_on_conflict() {
        let now = Utc::now().naive_utc();
        let sql = CartService::upsert_statement(1, 2, 3, now)
            .build(DbBackend::Postgres)
            .to_string();

        assert!(sql.contains("ON CONFLICT (\"user_id\", \"product_id\") DO UPDATE"));
        assert!(sql.contains("\"quantity\" = \"cart_items\".\"quantity\" + 3"));
    }

    #[tokio::test]
    async fn repeat_add_accumulates_into_one_row() {
        let product = product::Model {
            id: 2,
            category_id: 1,
            name: "Ibuprofen 200mg".to_owned(),
            description: None,
            manufacturer: None,
            price: rust_decimal::Decimal::new(599, 2),
            old_price: None,
            stock_quantity: 50,
            is_popular: false,
            is_new: false,
            in_stock: true,
            image: None,
            created_at: Utc::now().naive_utc(),
        };
        // A prior add of 2 plus this add of 3 lands in the same row.
        let merged = cart_item::Model {
            id: 1,
            user_id: 1,
            product_id: 2,
            quantity: 5,
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![product]])
            .append_query_results([vec![merged]])
            .into_connection();

        let item = CartService::add_item(&db, 1, 2, 3).await.unwrap();
        assert_eq!(item.quantity, 5);
    }

    #[tokio::test]
    async fn add_item_requires_existing_product() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<product::Model>::new()])
            .into_connection();

        let result = CartService::add_item(&db, 1, 99, 2).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn update_quantity_of_foreign_item_is_not_found() {
        // Scoping by user_id means touching someone else's row matches nothing.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let result = CartService::update_quantity(&db, 10, 2, 5).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn remove_item_scoped_by_owner_succeeds() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        assert!(CartService::remove_item(&db, 10, 1).await.is_ok());
    }
}
