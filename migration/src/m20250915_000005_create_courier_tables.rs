use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Couriers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Couriers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Couriers::UserId)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Couriers::Status)
                            .string()
                            .not_null()
                            .default("available"),
                    )
                    .col(
                        ColumnDef::new(Couriers::Rating)
                            .double()
                            .not_null()
                            .default(5.0),
                    )
                    .col(
                        ColumnDef::new(Couriers::CompletedOrders)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Couriers::TotalEarnings)
                            .decimal_len(10, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Couriers::TodayEarnings)
                            .decimal_len(10, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Couriers::DailyGoal)
                            .decimal_len(10, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Couriers::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Couriers::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_couriers_user")
                            .from(Couriers::Table, Couriers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // delivery_orders.courier_id could not reference couriers before
        // this migration ran.
        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name("fk_delivery_orders_courier")
                    .from(DeliveryOrders::Table, DeliveryOrders::CourierId)
                    .to(Couriers::Table, Couriers::Id)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CourierMessages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CourierMessages::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CourierMessages::CourierId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CourierMessages::Title).string().not_null())
                    .col(ColumnDef::new(CourierMessages::Body).text().not_null())
                    .col(
                        ColumnDef::new(CourierMessages::IsRead)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(CourierMessages::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_courier_messages_courier")
                            .from(CourierMessages::Table, CourierMessages::CourierId)
                            .to(Couriers::Table, Couriers::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CourierChats::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CourierChats::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CourierChats::CourierId)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(CourierChats::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_courier_chats_courier")
                            .from(CourierChats::Table, CourierChats::CourierId)
                            .to(Couriers::Table, Couriers::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ChatMessages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ChatMessages::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ChatMessages::ChatId).integer().not_null())
                    .col(ColumnDef::new(ChatMessages::Sender).string().not_null())
                    .col(ColumnDef::new(ChatMessages::Body).text().not_null())
                    .col(
                        ColumnDef::new(ChatMessages::IsRead)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ChatMessages::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_chat_messages_chat")
                            .from(ChatMessages::Table, ChatMessages::ChatId)
                            .to(CourierChats::Table, CourierChats::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name("fk_delivery_orders_courier")
                    .table(DeliveryOrders::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(ChatMessages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CourierChats::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CourierMessages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Couriers::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Couriers {
    Table,
    Id,
    UserId,
    Status,
    Rating,
    CompletedOrders,
    TotalEarnings,
    TodayEarnings,
    DailyGoal,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum CourierMessages {
    Table,
    Id,
    CourierId,
    Title,
    Body,
    IsRead,
    CreatedAt,
}

#[derive(DeriveIden)]
enum CourierChats {
    Table,
    Id,
    CourierId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ChatMessages {
    Table,
    Id,
    ChatId,
    Sender,
    IsRead,
    Body,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum DeliveryOrders {
    Table,
    CourierId,
}
