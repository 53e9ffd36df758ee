use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};

use super::entities::{chat, chat_message, courier, enums::ChatSender, enums::CourierStatus, message};
use crate::modules::users::service::UserService;
use crate::shared::error::AppResult;

/// Starting target for a fresh courier profile.
fn default_daily_goal() -> Decimal {
    Decimal::new(500000, 2) // 5000.00
}

pub struct CourierService;

impl CourierService {
    /// A courier profile is 1:1 with a user and materializes on the first
    /// courier-side operation.
    pub async fn ensure_for_user(
        db: &DatabaseConnection,
        user_id: i32,
    ) -> AppResult<courier::Model> {
        UserService::ensure_exists(db, user_id).await?;

        if let Some(existing) = courier::Entity::find()
            .filter(courier::Column::UserId.eq(user_id))
            .one(db)
            .await?
        {
            return Ok(existing);
        }

        let now = Utc::now().naive_utc();
        let created = courier::ActiveModel {
            user_id: Set(user_id),
            status: Set(CourierStatus::Available),
            rating: Set(5.0),
            completed_orders: Set(0),
            total_earnings: Set(Decimal::ZERO),
            today_earnings: Set(Decimal::ZERO),
            daily_goal: Set(default_daily_goal()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;

        Ok(created)
    }

    pub async fn inbox(
        db: &DatabaseConnection,
        courier_id: i32,
    ) -> AppResult<(Vec<message::Model>, u64)> {
        let messages = message::Entity::find()
            .filter(message::Column::CourierId.eq(courier_id))
            .order_by_desc(message::Column::CreatedAt)
            .all(db)
            .await?;

        let unread = messages.iter().filter(|m| !m.is_read).count() as u64;
        Ok((messages, unread))
    }

    /// Marks one message read, or the whole inbox when no id is given.
    pub async fn mark_messages_read(
        db: &DatabaseConnection,
        courier_id: i32,
        message_id: Option<i32>,
    ) -> AppResult<u64> {
        let mut update = message::Entity::update_many()
            .col_expr(message::Column::IsRead, Expr::value(true))
            .filter(message::Column::CourierId.eq(courier_id))
            .filter(message::Column::IsRead.eq(false));

        if let Some(id) = message_id {
            update = update.filter(message::Column::Id.eq(id));
        }

        let result = update.exec(db).await?;
        Ok(result.rows_affected)
    }

    pub async fn ensure_chat(db: &DatabaseConnection, courier_id: i32) -> AppResult<chat::Model> {
        if let Some(existing) = chat::Entity::find()
            .filter(chat::Column::CourierId.eq(courier_id))
            .one(db)
            .await?
        {
            return Ok(existing);
        }

        let created = chat::ActiveModel {
            courier_id: Set(courier_id),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(db)
        .await?;

        Ok(created)
    }

    /// Returns the transcript oldest-first and the number of operator
    /// messages that were unread at fetch time, then marks them read.
    pub async fn transcript(
        db: &DatabaseConnection,
        chat_id: i32,
    ) -> AppResult<(Vec<chat_message::Model>, u64)> {
        let messages = chat_message::Entity::find()
            .filter(chat_message::Column::ChatId.eq(chat_id))
            .order_by_asc(chat_message::Column::CreatedAt)
            .all(db)
            .await?;

        let unread = messages
            .iter()
            .filter(|m| m.sender == ChatSender::Operator && !m.is_read)
            .count() as u64;

        if unread > 0 {
            chat_message::Entity::update_many()
                .col_expr(chat_message::Column::IsRead, Expr::value(true))
                .filter(chat_message::Column::ChatId.eq(chat_id))
                .filter(chat_message::Column::Sender.eq(ChatSender::Operator))
                .filter(chat_message::Column::IsRead.eq(false))
                .exec(db)
                .await?;
        }

        Ok((messages, unread))
    }

    pub async fn send_message(
        db: &DatabaseConnection,
        chat_id: i32,
        body: String,
    ) -> AppResult<chat_message::Model> {
        let sent = chat_message::ActiveModel {
            chat_id: Set(chat_id),
            sender: Set(ChatSender::Courier),
            body: Set(body),
            is_read: Set(false),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(db)
        .await?;

        Ok(sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::users::entities::user;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn plain_user(id: i32) -> user::Model {
        user::Model {
            id,
            username: "dmitry".to_owned(),
            email: "dmitry@example.com".to_owned(),
            password_hash: "$argon2id$stored".to_owned(),
            phone: None,
            avatar: None,
            google_id: None,
            is_admin: false,
            login_count: 0,
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
            last_login_at: None,
        }
    }

    fn fresh_courier(id: i32, user_id: i32) -> courier::Model {
        courier::Model {
            id,
            user_id,
            status: CourierStatus::Available,
            rating: 5.0,
            completed_orders: 0,
            total_earnings: Decimal::ZERO,
            today_earnings: Decimal::ZERO,
            daily_goal: default_daily_goal(),
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
        }
    }

    fn chat_msg(id: i32, sender: ChatSender, is_read: bool) -> chat_message::Model {
        chat_message::Model {
            id,
            chat_id: 1,
            sender,
            body: "hello".to_owned(),
            is_read,
            created_at: Utc::now().naive_utc(),
        }
    }

    #[tokio::test]
    async fn first_courier_operation_creates_the_profile() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![plain_user(9)]])
            .append_query_results([Vec::<courier::Model>::new()])
            .append_query_results([vec![fresh_courier(3, 9)]])
            .into_connection();

        let courier = CourierService::ensure_for_user(&db, 9).await.unwrap();
        assert_eq!(courier.user_id, 9);
        assert_eq!(courier.completed_orders, 0);
    }

    #[tokio::test]
    async fn existing_profile_is_reused() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![plain_user(9)]])
            .append_query_results([vec![fresh_courier(3, 9)]])
            .into_connection();

        let courier = CourierService::ensure_for_user(&db, 9).await.unwrap();
        assert_eq!(courier.id, 3);
    }

    #[tokio::test]
    async fn transcript_counts_then_clears_unread_operator_messages() {
        let rows = vec![
            chat_msg(1, ChatSender::Courier, true),
            chat_msg(2, ChatSender::Operator, false),
            chat_msg(3, ChatSender::Operator, true),
        ];

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([rows])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let (messages, unread) = CourierService::transcript(&db, 1).await.unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(unread, 1);
    }

    #[tokio::test]
    async fn inbox_reports_unread_count() {
        let rows = vec![
            message::Model {
                id: 1,
                courier_id: 3,
                title: "Schedule".to_owned(),
                body: "Shift starts at 9".to_owned(),
                is_read: false,
                created_at: Utc::now().naive_utc(),
            },
            message::Model {
                id: 2,
                courier_id: 3,
                title: "Bonus".to_owned(),
                body: "Weekend bonus active".to_owned(),
                is_read: true,
                created_at: Utc::now().naive_utc(),
            },
        ];

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([rows])
            .into_connection();

        let (messages, unread) = CourierService::inbox(&db, 3).await.unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(unread, 1);
    }
}
