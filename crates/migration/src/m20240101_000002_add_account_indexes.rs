//! Partial unique indexes on `account.email` and `account.phone`.
//!
//! The uniqueness contract is scoped to non-null values: absent contact
//! fields are exempt, so any number of accounts may have `email IS NULL`.
//! These indexes are the system of record for duplicate detection; the
//! application-level existence checks are only an optimization. sea-query's
//! index builder has no WHERE clause, so the statements are raw SQL.
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            "CREATE UNIQUE INDEX IF NOT EXISTS uniq_account_email \
             ON account (email) WHERE email IS NOT NULL",
        )
        .await?;
        db.execute_unprepared(
            "CREATE UNIQUE INDEX IF NOT EXISTS uniq_account_phone \
             ON account (phone) WHERE phone IS NOT NULL",
        )
        .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared("DROP INDEX IF EXISTS uniq_account_email").await?;
        db.execute_unprepared("DROP INDEX IF EXISTS uniq_account_phone").await?;
        Ok(())
    }
}
