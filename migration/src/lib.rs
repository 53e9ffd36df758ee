pub use sea_orm_migration::prelude::*;

mod m20250915_000001_create_users_table;
mod m20250915_000002_create_catalog_tables;
mod m20250915_000003_create_cart_table;
mod m20250915_000004_create_order_tables;
mod m20250915_000005_create_courier_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250915_000001_create_users_table::Migration),
            Box::new(m20250915_000002_create_catalog_tables::Migration),
            Box::new(m20250915_000003_create_cart_table::Migration),
            Box::new(m20250915_000004_create_order_tables::Migration),
            Box::new(m20250915_000005_create_courier_tables::Migration),
        ]
    }
}
