use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// Email uniqueness only binds live rows, so the index is partial.
const CREATE_UNIQUE_EMAIL: &str =
    "CREATE UNIQUE INDEX IF NOT EXISTS uniq_customers_email_live ON customers (email) WHERE is_deleted = false";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(CREATE_UNIQUE_EMAIL)
            .await?;

        // Customers: listing filters on is_deleted
        manager
            .create_index(
                Index::create()
                    .name("idx_customers_is_deleted")
                    .table(Customers::Table)
                    .col(Customers::IsDeleted)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_customers_is_deleted").table(Customers::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("uniq_customers_email_live").table(Customers::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Customers { Table, IsDeleted }
