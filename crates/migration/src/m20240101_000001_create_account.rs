//! Create `account` table.
//!
//! Email and phone are both nullable; an account only has to be reachable
//! through one of them. Uniqueness for the two columns is added separately
//! as partial indexes.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Account::Table)
                    .if_not_exists()
                    .col(uuid(Account::Id).primary_key())
                    // Explicitly nullable contact columns; two accounts may
                    // both lack an email, so NOT NULL is wrong here.
                    .col(ColumnDef::new(Account::Email).string_len(255).null())
                    .col(ColumnDef::new(Account::Phone).string_len(32).null())
                    .col(string_len(Account::PasswordHash, 255).not_null())
                    .col(string_len(Account::FirstName, 100).not_null())
                    .col(string_len(Account::LastName, 100).not_null())
                    .col(string_len(Account::Role, 32).not_null())
                    .col(string_len(Account::Status, 32).not_null())
                    .col(timestamp_with_time_zone(Account::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Account::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Account::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Account {
    Table,
    Id,
    Email,
    Phone,
    PasswordHash,
    FirstName,
    LastName,
    Role,
    Status,
    CreatedAt,
    UpdatedAt,
}
