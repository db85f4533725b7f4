//! Database configuration module for `FinanceBuddy`.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust structs.
//! Creation is idempotent and safe to run on every startup.

use crate::entities::{Budget, BudgetColumn, Transaction};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema, sea_query::Index};
use std::path::Path;
use tracing::info;

/// Local `SQLite` file used when `DATABASE_URL` is not set.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/finance_buddy.sqlite?mode=rwc";

/// Gets the database URL from the environment or returns the default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// File path of a `sqlite://` URL, `None` for in-memory or other backends.
#[must_use]
pub fn sqlite_file_path(database_url: &str) -> Option<&Path> {
    let rest = database_url.strip_prefix("sqlite://")?;
    let path = rest.split('?').next().unwrap_or_default();
    (!path.is_empty() && !path.starts_with(":memory:")).then(|| Path::new(path))
}

/// Establishes a connection to the database named by `DATABASE_URL`.
///
/// Falls back to [`DEFAULT_DATABASE_URL`] when the variable is not set. The
/// directory of a `SQLite` file is created if missing.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    if let Some(parent) = sqlite_file_path(&database_url)
        .and_then(Path::parent)
        .filter(|parent| !parent.as_os_str().is_empty())
    {
        std::fs::create_dir_all(parent)?;
    }
    info!("Connecting to database at {database_url}");
    Database::connect(&database_url).await.map_err(Into::into)
}

/// Unique index backing the one-budget-per-category-and-month rule.
pub const BUDGET_PERIOD_INDEX: &str = "idx_budgets_user_category_period";

/// Creates the `transactions` and `budgets` tables if they do not exist yet.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut transaction_table = schema.create_table_from_entity(Transaction);
    transaction_table.if_not_exists();
    let mut budget_table = schema.create_table_from_entity(Budget);
    budget_table.if_not_exists();

    let budget_period_index = Index::create()
        .name(BUDGET_PERIOD_INDEX)
        .table(Budget)
        .col(BudgetColumn::UserId)
        .col(BudgetColumn::Category)
        .col(BudgetColumn::Month)
        .col(BudgetColumn::Year)
        .unique()
        .if_not_exists()
        .to_owned();

    db.execute(builder.build(&transaction_table)).await?;
    db.execute(builder.build(&budget_table)).await?;
    db.execute(builder.build(&budget_period_index)).await?;

    Ok(())
}
