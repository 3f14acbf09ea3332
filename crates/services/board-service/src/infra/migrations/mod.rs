//! Database migrations.
//!
//! Each migration is a separate module following SeaORM conventions.
//! Migration names follow the pattern: m{YYYYMMDD}_{NNNNNN}_{description}

use sea_orm_migration::prelude::*;

mod m20240101_000001_create_member_and_board;
mod m20240101_000002_create_profile;
mod m20240101_000003_create_product_and_orders;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    // Own bookkeeping table so the todo service can share the database
    fn migration_table_name() -> sea_orm::DynIden {
        Alias::new("board_service_migrations").into_iden()
    }

    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_member_and_board::Migration),
            Box::new(m20240101_000002_create_profile::Migration),
            Box::new(m20240101_000003_create_product_and_orders::Migration),
        ]
    }
}
