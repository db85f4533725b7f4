//! Dashboard aggregates: period totals, balance, percentage shares, the recent
//! activity list and a trailing 12-month income/expense series.
//!
//! [`build_snapshot`] and [`build_history`] are pure functions of an already-loaded
//! transaction list. [`build_dashboard`] loads that list with a single candidate
//! query and feeds both.

use crate::{
    core::{
        activity::{self, ActivityOptions, ActivityRow},
        allocation::{self, Allocation},
        period::{self, Period},
        transaction,
    },
    entities::TransactionCategory,
    errors::Result,
    models::Transaction,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::ConnectionTrait;
use serde::Serialize;
use tracing::{debug, info};

/// Number of months in the historical series.
pub const HISTORY_MONTHS: u32 = 12;

/// Share of each type in the period's total movement, 0-100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct TypesPercentage {
    /// Deposits as a share of all movement
    pub deposit: u8,
    /// Expenses as a share of all movement
    pub expense: u8,
    /// Investments as a share of all movement
    pub investment: u8,
}

/// Expense total of one category and its share of all expenses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryShare {
    /// Expense category
    pub category: TransactionCategory,
    /// Expenses allocated to the month in this category
    pub total_amount: Decimal,
    /// Share of all expenses, 0-100
    pub percentage_of_total: u8,
}

/// Everything shown for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSnapshot {
    /// Selected month
    pub period: Period,
    /// `deposits - investments - expenses`
    pub balance: Decimal,
    /// Deposits allocated to the month
    pub deposits_total: Decimal,
    /// Investments allocated to the month
    pub investments_total: Decimal,
    /// Expenses allocated to the month
    pub expenses_total: Decimal,
    /// Share of each type
    pub types_percentage: TypesPercentage,
    /// Expense categories with a non-zero total, in category order
    pub total_expense_per_category: Vec<CategoryShare>,
    /// Latest transactions with the carry-over separator
    pub recent_activity: Vec<ActivityRow>,
}

/// Income and expenses of one month in the historical series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyFlow {
    /// e.g. `Jan 2024`
    pub month_label: String,
    /// Deposits allocated to the month
    pub income: Decimal,
    /// Expenses allocated to the month
    pub expenses: Decimal,
}

/// Snapshot plus history, as returned by [`build_dashboard`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    /// The selected month
    pub snapshot: DashboardSnapshot,
    /// Last 12 months, oldest first
    pub history: Vec<MonthlyFlow>,
}

/// Allocates `candidates` to `period` and derives totals and percentages.
///
/// `recent` is the already-ordered recent-transaction list used for the activity rows.
#[must_use]
pub fn build_snapshot(
    candidates: &[Transaction],
    recent: &[Transaction],
    period: Period,
    separator_label: &str,
) -> DashboardSnapshot {
    let Allocation {
        by_type,
        by_category,
    } = allocation::allocate(candidates, period.start(), period.end());

    let movement = by_type.total();
    let types_percentage = TypesPercentage {
        deposit: period::percentage_of(by_type.deposits, movement),
        expense: period::percentage_of(by_type.expenses, movement),
        investment: period::percentage_of(by_type.investments, movement),
    };

    let total_expense_per_category = by_category
        .into_iter()
        .map(|total| CategoryShare {
            category: total.category,
            total_amount: total.total_amount,
            percentage_of_total: period::percentage_of(total.total_amount, by_type.expenses),
        })
        .collect();

    DashboardSnapshot {
        period,
        balance: by_type.balance(),
        deposits_total: by_type.deposits,
        investments_total: by_type.investments,
        expenses_total: by_type.expenses,
        types_percentage,
        total_expense_per_category,
        recent_activity: activity::insert_separator(recent, period, separator_label),
    }
}

/// Income and expenses for the [`HISTORY_MONTHS`] months ending with the month of
/// `as_of`, oldest first.
#[must_use]
pub fn build_history(candidates: &[Transaction], as_of: NaiveDate) -> Vec<MonthlyFlow> {
    Period::containing(as_of)
        .trailing(HISTORY_MONTHS)
        .into_iter()
        .map(|month| {
            let totals = allocation::allocate(candidates, month.start(), month.end()).by_type;
            MonthlyFlow {
                month_label: month.label(),
                income: totals.deposits,
                expenses: totals.expenses,
            }
        })
        .collect()
}

/// Builds the full dashboard for the `MM` / `YYYY` period.
///
/// # Arguments
/// * `db` - Database connection
/// * `user_id` - Owner whose transactions are aggregated
/// * `month` / `year` - Selected period, validated before any query
/// * `as_of` - Reference date; the history ends with its month
/// * `options` - Recent-activity limit and separator label
///
/// # Errors
/// Returns [`crate::errors::Error::InvalidPeriod`] for malformed input, or a
/// database error.
pub async fn build_dashboard<C: ConnectionTrait>(
    db: &C,
    user_id: &str,
    month: &str,
    year: &str,
    as_of: NaiveDate,
    options: &ActivityOptions,
) -> Result<Dashboard> {
    let period = Period::parse(month, year)?;
    let upper_bound = period.end().max(Period::containing(as_of).end());

    let candidates = transaction::list_candidate_transactions(db, user_id, upper_bound).await?;
    let recent = transaction::list_recent_transactions(db, user_id, options.limit).await?;
    debug!(
        user_id,
        candidates = candidates.len(),
        recent = recent.len(),
        "Loaded dashboard transactions"
    );

    let snapshot = build_snapshot(&candidates, &recent, period, &options.separator_label);
    let history = build_history(&candidates, as_of);

    info!(
        user_id,
        %period,
        balance = %snapshot.balance,
        "Built dashboard"
    );
    Ok(Dashboard { snapshot, history })
}

/// Builds only the historical series ending with the month of `as_of`.
pub async fn build_historical_series<C: ConnectionTrait>(
    db: &C,
    user_id: &str,
    as_of: NaiveDate,
) -> Result<Vec<MonthlyFlow>> {
    let upper_bound = Period::containing(as_of).end();
    let candidates = transaction::list_candidate_transactions(db, user_id, upper_bound).await?;
    Ok(build_history(&candidates, as_of))
}
