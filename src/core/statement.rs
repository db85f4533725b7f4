//! Monthly statement: the transactions active in one month, optionally filtered by
//! name and category, with the month's income and expense totals.

use crate::{
    core::{
        activity::{self, ActivityRow},
        allocation,
        period::Period,
        transaction,
    },
    entities::TransactionCategory,
    errors::Result,
    models::Transaction,
};
use rust_decimal::Decimal;
use sea_orm::ConnectionTrait;
use serde::Serialize;
use std::cmp::Reverse;
use tracing::debug;

/// Optional narrowing of a statement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatementFilter {
    /// Case-insensitive substring of the transaction name
    pub search: Option<String>,
    /// Only this category
    pub category: Option<TransactionCategory>,
}

impl StatementFilter {
    fn matches(&self, transaction: &Transaction) -> bool {
        let category_matches = self
            .category
            .is_none_or(|category| transaction.category == category);
        let search_matches = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|needle| !needle.is_empty())
            .is_none_or(|needle| {
                transaction
                    .name
                    .to_lowercase()
                    .contains(&needle.to_lowercase())
            });
        category_matches && search_matches
    }
}

/// Rows and totals for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthStatement {
    /// Selected month
    pub period: Period,
    /// Active transactions, newest first, with the carry-over separator
    pub rows: Vec<ActivityRow>,
    /// Deposits allocated to the month
    pub total_income: Decimal,
    /// Expenses allocated to the month
    pub total_expenses: Decimal,
}

/// Builds the statement from an already-loaded candidate list.
#[must_use]
pub fn build_month_statement(
    candidates: &[Transaction],
    period: Period,
    filter: &StatementFilter,
    separator_label: &str,
) -> MonthStatement {
    let (start, end) = (period.start(), period.end());

    let mut active: Vec<Transaction> = candidates
        .iter()
        .filter(|transaction| filter.matches(transaction))
        .filter(|transaction| allocation::is_candidate(transaction, start, end))
        .filter(|transaction| !allocation::amount_between(transaction, start, end).is_zero())
        .cloned()
        .collect();
    active.sort_by_key(|transaction| (Reverse(transaction.date), Reverse(transaction.id)));

    let totals = allocation::allocate(&active, start, end).by_type;

    MonthStatement {
        period,
        rows: activity::insert_separator(&active, period, separator_label),
        total_income: totals.deposits,
        total_expenses: totals.expenses,
    }
}

/// Builds the statement for the `MM` / `YYYY` period.
pub async fn build_statement<C: ConnectionTrait>(
    db: &C,
    user_id: &str,
    month: &str,
    year: &str,
    filter: &StatementFilter,
    separator_label: &str,
) -> Result<MonthStatement> {
    let period = Period::parse(month, year)?;
    let candidates = transaction::list_candidate_transactions(db, user_id, period.end()).await?;
    let statement = build_month_statement(&candidates, period, filter, separator_label);
    debug!(user_id, %period, rows = statement.rows.len(), "Built statement");
    Ok(statement)
}
