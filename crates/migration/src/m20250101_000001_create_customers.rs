//! Create `customers` table.
//!
//! Business columns plus the audit block (timestamps, principals,
//! soft-delete flag, optimistic version).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Customers::Table)
                    .if_not_exists()
                    .col(big_integer(Customers::Id).auto_increment().primary_key())
                    .col(string_len(Customers::FirstName, 100).not_null())
                    .col(string_len(Customers::LastName, 100).not_null())
                    .col(string_len(Customers::Email, 255).not_null())
                    .col(string_len_null(Customers::PhoneNumber, 20))
                    .col(text_null(Customers::Address))
                    .col(timestamp_with_time_zone(Customers::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Customers::UpdatedAt).not_null())
                    .col(string_len(Customers::CreatedBy, 64).not_null())
                    .col(string_len(Customers::UpdatedBy, 64).not_null())
                    .col(boolean(Customers::IsDeleted).not_null().default(false))
                    .col(big_integer(Customers::Version).not_null().default(0))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Customers::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Customers {
    Table,
    Id,
    FirstName,
    LastName,
    Email,
    PhoneNumber,
    Address,
    CreatedAt,
    UpdatedAt,
    CreatedBy,
    UpdatedBy,
    IsDeleted,
    Version,
}
