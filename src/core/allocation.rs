//! Allocation of transaction events to a date window.
//!
//! Every aggregate (dashboard, history, statement, budgets) is built from
//! [`allocate`]: expand each candidate into its events, keep the events inside the
//! window, and sum them per type and per expense category.

use crate::{
    core::installment,
    entities::{TransactionCategory, TransactionType},
    models::Transaction,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// Per-type sums for one window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TypeTotals {
    /// Sum of deposit events
    pub deposits: Decimal,
    /// Sum of expense events
    pub expenses: Decimal,
    /// Sum of investment events
    pub investments: Decimal,
}

impl TypeTotals {
    /// Sum of all three types.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.deposits + self.expenses + self.investments
    }

    /// `deposits - expenses - investments`.
    #[must_use]
    pub fn balance(&self) -> Decimal {
        self.deposits - self.expenses - self.investments
    }

    fn add(&mut self, transaction_type: TransactionType, amount: Decimal) {
        match transaction_type {
            TransactionType::Deposit => self.deposits += amount,
            TransactionType::Expense => self.expenses += amount,
            TransactionType::Investment => self.investments += amount,
        }
    }
}

/// Expense total for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    /// Expense category
    pub category: TransactionCategory,
    /// Sum of in-window expense events in that category
    pub total_amount: Decimal,
}

/// Result of allocating a set of transactions to one window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Allocation {
    /// Per-type sums
    pub by_type: TypeTotals,
    /// Expense sums per category, in category order, zero totals omitted
    pub by_category: Vec<CategoryTotal>,
}

impl Allocation {
    /// Expense total for `category`, zero if it had no events.
    #[must_use]
    pub fn expense_for(&self, category: TransactionCategory) -> Decimal {
        self.by_category
            .iter()
            .find(|total| total.category == category)
            .map_or(Decimal::ZERO, |total| total.total_amount)
    }
}

/// Cheap prefilter: can `transaction` have any event inside `[start, end]`?
///
/// True when it starts on or before `end` and has no end date or ends on or after
/// `start`. Expansion decides the exact events; this only narrows the set.
#[must_use]
pub fn is_candidate(transaction: &Transaction, start: NaiveDate, end: NaiveDate) -> bool {
    transaction.date <= end && transaction.end_date.is_none_or(|end_date| end_date >= start)
}

/// Sum of the events of `transaction` inside `[start, end]`.
#[must_use]
pub fn amount_between(transaction: &Transaction, start: NaiveDate, end: NaiveDate) -> Decimal {
    installment::events_between(transaction, start, end)
        .map(|event| event.amount)
        .sum()
}

/// Allocates every event of `transactions` that falls inside `[start, end]`.
///
/// Only expense events feed the category breakdown. An inverted window is empty.
#[must_use]
pub fn allocate(transactions: &[Transaction], start: NaiveDate, end: NaiveDate) -> Allocation {
    if start > end {
        return Allocation::default();
    }
    let mut by_type = TypeTotals::default();
    let mut by_category: BTreeMap<TransactionCategory, Decimal> = BTreeMap::new();

    for transaction in transactions {
        if !is_candidate(transaction, start, end) {
            continue;
        }
        let amount = amount_between(transaction, start, end);
        if amount.is_zero() {
            continue;
        }
        by_type.add(transaction.transaction_type, amount);
        if transaction.transaction_type == TransactionType::Expense {
            *by_category.entry(transaction.category).or_default() += amount;
        }
    }

    Allocation {
        by_type,
        by_category: by_category
            .into_iter()
            .filter(|(_, total)| !total.is_zero())
            .map(|(category, total_amount)| CategoryTotal {
                category,
                total_amount,
            })
            .collect(),
    }
}
