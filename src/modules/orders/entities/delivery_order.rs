use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::enums::OrderStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "delivery_orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    // Human-readable, time-derived; distinct from the primary key.
    #[sea_orm(unique)]
    pub order_code: String,
    pub user_id: i32,
    pub courier_id: Option<i32>,
    pub status: OrderStatus,
    pub total_amount: Decimal,
    pub delivery_address: String,
    pub contact_phone: String,
    #[serde(skip_deserializing)]
    pub created_at: DateTime,
    pub assigned_at: Option<DateTime>,
    pub delivered_at: Option<DateTime>,
    pub cancelled_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::modules::users::entities::user::Entity",
        from = "Column::UserId",
        to = "crate::modules::users::entities::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "crate::modules::courier::entities::courier::Entity",
        from = "Column::CourierId",
        to = "crate::modules::courier::entities::courier::Column::Id"
    )]
    Courier,
    #[sea_orm(has_many = "super::order_item::Entity")]
    Items,
}

impl Related<crate::modules::users::entities::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<crate::modules::courier::entities::courier::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Courier.def()
    }
}

impl Related<super::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
