use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DeliveryOrders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DeliveryOrders::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DeliveryOrders::OrderCode)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(DeliveryOrders::UserId).integer().not_null())
                    .col(ColumnDef::new(DeliveryOrders::CourierId).integer())
                    .col(
                        ColumnDef::new(DeliveryOrders::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(DeliveryOrders::TotalAmount)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DeliveryOrders::DeliveryAddress)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DeliveryOrders::ContactPhone)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DeliveryOrders::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(DeliveryOrders::AssignedAt).timestamp())
                    .col(ColumnDef::new(DeliveryOrders::DeliveredAt).timestamp())
                    .col(ColumnDef::new(DeliveryOrders::CancelledAt).timestamp())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_delivery_orders_user")
                            .from(DeliveryOrders::Table, DeliveryOrders::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_delivery_orders_status")
                    .table(DeliveryOrders::Table)
                    .col(DeliveryOrders::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DeliveryOrderItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DeliveryOrderItems::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DeliveryOrderItems::OrderId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DeliveryOrderItems::ProductId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DeliveryOrderItems::ProductName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DeliveryOrderItems::Quantity)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DeliveryOrderItems::UnitPrice)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DeliveryOrderItems::TotalPrice)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_delivery_order_items_order")
                            .from(DeliveryOrderItems::Table, DeliveryOrderItems::OrderId)
                            .to(DeliveryOrders::Table, DeliveryOrders::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DeliveryOrderItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DeliveryOrders::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum DeliveryOrders {
    Table,
    Id,
    OrderCode,
    UserId,
    CourierId,
    Status,
    TotalAmount,
    DeliveryAddress,
    ContactPhone,
    CreatedAt,
    AssignedAt,
    DeliveredAt,
    CancelledAt,
}

#[derive(DeriveIden)]
enum DeliveryOrderItems {
    Table,
    Id,
    OrderId,
    ProductId,
    ProductName,
    Quantity,
    UnitPrice,
    TotalPrice,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
