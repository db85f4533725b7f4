//! Shared test utilities for `FinanceBuddy`.
//!
//! This module provides an in-memory database and builders for domain
//! transactions and form input with sensible defaults.

#![allow(clippy::unwrap_used)]

use crate::{
    core::{period, transaction},
    entities::{self, PaymentMethod, TransactionCategory, TransactionType},
    errors::Result,
    models::{NewTransaction, Transaction},
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Calendar date shorthand.
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Parses a decimal literal such as `"12.50"`.
pub fn dec(value: &str) -> Decimal {
    value.parse().unwrap()
}

/// A non-recurring FOOD expense paid by credit card.
///
/// # Defaults
/// * `user_id`: `"test_user"`
/// * `name`: `"Expense {id}"`
/// * `end_date`: derived from the installment count
pub fn expense(id: i64, amount: &str, on: NaiveDate, installments: u32) -> Transaction {
    Transaction {
        id,
        user_id: "test_user".to_string(),
        name: format!("Expense {id}"),
        amount: dec(amount),
        transaction_type: TransactionType::Expense,
        category: TransactionCategory::Food,
        payment_method: PaymentMethod::CreditCard,
        date: on,
        installments,
        is_recurring: false,
        end_date: period::add_calendar_months(on, installments.saturating_sub(1)),
    }
}

/// A single SALARY deposit.
pub fn deposit(id: i64, amount: &str, on: NaiveDate) -> Transaction {
    Transaction {
        name: format!("Deposit {id}"),
        transaction_type: TransactionType::Deposit,
        category: TransactionCategory::Salary,
        payment_method: PaymentMethod::BankTransfer,
        ..expense(id, amount, on, 1)
    }
}

/// A recurring HOUSING expense, open when `end_date` is `None`.
pub fn recurring(id: i64, amount: &str, on: NaiveDate, end_date: Option<NaiveDate>) -> Transaction {
    Transaction {
        name: format!("Recurring {id}"),
        category: TransactionCategory::Housing,
        payment_method: PaymentMethod::BankSlip,
        is_recurring: true,
        end_date,
        ..expense(id, amount, on, 1)
    }
}

/// Form input for a FOOD expense paid by credit card.
pub fn new_expense(name: &str, amount: &str, on: NaiveDate, installments: i64) -> NewTransaction {
    NewTransaction {
        name: name.to_string(),
        amount: dec(amount),
        transaction_type: TransactionType::Expense,
        category: TransactionCategory::Food,
        payment_method: PaymentMethod::CreditCard,
        date: on,
        installments,
        is_recurring: false,
    }
}

/// Form input for an open recurring HOUSING expense.
pub fn new_recurring(name: &str, amount: &str, on: NaiveDate) -> NewTransaction {
    NewTransaction {
        category: TransactionCategory::Housing,
        payment_method: PaymentMethod::BankSlip,
        is_recurring: true,
        ..new_expense(name, amount, on, 1)
    }
}

/// Saves `input` for `user_id` through the regular upsert path.
pub async fn create_test_transaction(
    db: &DatabaseConnection,
    user_id: &str,
    input: NewTransaction,
) -> Result<entities::TransactionModel> {
    transaction::upsert_transaction(db, user_id, &input, None).await
}

/// A stored row as the database would return it, for conversion tests.
pub fn model_from(
    id: i64,
    user_id: &str,
    amount: f64,
    on: NaiveDate,
    installments: i32,
    is_recurring: bool,
) -> entities::TransactionModel {
    let now = Utc::now();
    entities::TransactionModel {
        id,
        user_id: user_id.to_string(),
        name: format!("Stored {id}"),
        amount,
        transaction_type: TransactionType::Expense,
        category: TransactionCategory::Food,
        payment_method: PaymentMethod::CreditCard,
        date: on,
        installments,
        is_recurring,
        end_date: None,
        created_at: now,
        updated_at: now,
    }
}
