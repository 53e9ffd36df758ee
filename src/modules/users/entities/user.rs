use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique, index)]
    pub username: String,
    #[sea_orm(unique, index)]
    pub email: String,
    // Argon2 PHC string; never leaves the server.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub phone: Option<String>,
    pub avatar: Option<String>,
    #[sea_orm(unique, nullable)]
    pub google_id: Option<String>,
    pub is_admin: bool,
    pub login_count: i32,
    #[serde(skip_deserializing)]
    pub created_at: DateTime,
    #[serde(skip_deserializing)]
    pub updated_at: DateTime,
    pub last_login_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "crate::modules::cart::entities::cart_item::Entity")]
    CartItems,
    #[sea_orm(has_many = "crate::modules::orders::entities::delivery_order::Entity")]
    DeliveryOrders,
    #[sea_orm(has_one = "crate::modules::courier::entities::courier::Entity")]
    Courier,
}

impl Related<crate::modules::cart::entities::cart_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CartItems.def()
    }
}

impl Related<crate::modules::orders::entities::delivery_order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DeliveryOrders.def()
    }
}

impl Related<crate::modules::courier::entities::courier::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Courier.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
