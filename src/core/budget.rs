//! Monthly spending limits per expense category.
//!
//! Spending is the EXPENSE allocation of the month, so installment purchases count
//! one installment and recurring expenses their full amount.

use crate::{
    core::{
        allocation::{self, Allocation},
        period::{self, Period},
        transaction,
    },
    entities::{TransactionCategory, budget},
    errors::{Error, Result},
    models,
};
use chrono::Utc;
use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive},
};
use sea_orm::{Set, prelude::*, sea_query::OnConflict};
use serde::Serialize;
use tracing::info;

/// Budget against spending for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BudgetLine {
    /// Expense category
    pub category: TransactionCategory,
    /// Limit for the month, 0 when none was set
    pub budget_amount: Decimal,
    /// Expenses allocated to the month
    pub spent_amount: Decimal,
    /// `budget - spent`, 0 when no budget was set; negative when overspent
    pub remaining_amount: Decimal,
    /// `spent / budget` as 0-100
    pub usage_percentage: u8,
}

impl BudgetLine {
    /// Whether spending went past a set limit.
    #[must_use]
    pub fn is_over_budget(&self) -> bool {
        self.budget_amount > Decimal::ZERO && self.spent_amount > self.budget_amount
    }
}

/// Creates or updates the limit for `category` in the `MM` / `YYYY` period.
///
/// The write is a single insert that updates on the unique
/// (user, category, month, year) key, so concurrent calls cannot duplicate a row.
///
/// # Errors
/// Rejects malformed periods, investment categories and amounts outside
/// `0..=999 999.99`.
pub async fn upsert_budget<C: ConnectionTrait>(
    db: &C,
    user_id: &str,
    category: TransactionCategory,
    amount: Decimal,
    month: &str,
    year: &str,
) -> Result<budget::Model> {
    let period = Period::parse(month, year)?;
    if category.is_investment() {
        return Err(Error::validation(format!(
            "budgets apply to expense categories, not {}",
            category.as_str()
        )));
    }
    let amount = amount.round_dp(2);
    if amount < Decimal::ZERO || amount > models::max_amount() {
        return Err(Error::InvalidAmount { amount });
    }
    let stored_amount = amount.to_f64().ok_or(Error::InvalidAmount { amount })?;
    let month_number = i32::try_from(period.month()).map_err(|_| Error::InvalidPeriod {
        month: month.to_string(),
        year: year.to_string(),
    })?;

    let row = budget::ActiveModel {
        user_id: Set(user_id.to_string()),
        category: Set(category),
        amount: Set(stored_amount),
        month: Set(month_number),
        year: Set(period.year()),
        updated_at: Set(Utc::now()),
        ..Default::default()
    };
    crate::entities::Budget::insert(row)
        .on_conflict(
            OnConflict::columns([
                budget::Column::UserId,
                budget::Column::Category,
                budget::Column::Month,
                budget::Column::Year,
            ])
            .update_columns([budget::Column::Amount, budget::Column::UpdatedAt])
            .to_owned(),
        )
        .exec(db)
        .await?;

    let saved = crate::entities::Budget::find()
        .filter(budget::Column::UserId.eq(user_id))
        .filter(budget::Column::Category.eq(category))
        .filter(budget::Column::Month.eq(month_number))
        .filter(budget::Column::Year.eq(period.year()))
        .one(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("budget for {period} after upsert")))?;

    info!(user_id, category = category.as_str(), %period, %amount, "Saved budget");
    Ok(saved)
}

/// Budgets the user set for `period`.
pub async fn get_budgets_for_period<C: ConnectionTrait>(
    db: &C,
    user_id: &str,
    period: Period,
) -> Result<Vec<budget::Model>> {
    let month = i32::try_from(period.month()).unwrap_or_default();
    crate::entities::Budget::find()
        .filter(budget::Column::UserId.eq(user_id))
        .filter(budget::Column::Month.eq(month))
        .filter(budget::Column::Year.eq(period.year()))
        .all(db)
        .await
        .map_err(Into::into)
}

/// One line per non-investment category, in category order.
#[must_use]
pub fn build_budget_lines(
    budgets: &[(TransactionCategory, Decimal)],
    spending: &Allocation,
) -> Vec<BudgetLine> {
    TransactionCategory::EVERYDAY
        .into_iter()
        .map(|category| {
            let budget = budgets
                .iter()
                .find(|(budgeted, _)| *budgeted == category)
                .map(|(_, amount)| *amount);
            let spent = spending.expense_for(category);
            let budget_amount = budget.unwrap_or_default();
            BudgetLine {
                category,
                budget_amount,
                spent_amount: spent,
                remaining_amount: budget.map_or(Decimal::ZERO, |limit| limit - spent),
                usage_percentage: period::percentage_of(spent, budget_amount),
            }
        })
        .collect()
}

/// Budget overview for the `MM` / `YYYY` period.
pub async fn build_budget_overview<C: ConnectionTrait>(
    db: &C,
    user_id: &str,
    month: &str,
    year: &str,
) -> Result<Vec<BudgetLine>> {
    let period = Period::parse(month, year)?;

    let budgets = get_budgets_for_period(db, user_id, period)
        .await?
        .into_iter()
        .map(|row| {
            Decimal::from_f64(row.amount)
                .map(|amount| (row.category, amount.round_dp(2)))
                .ok_or_else(|| Error::CorruptRecord {
                    table: "budgets",
                    id: row.id,
                    message: format!("amount {} is not a number", row.amount),
                })
        })
        .collect::<Result<Vec<_>>>()?;

    let candidates = transaction::list_candidate_transactions(db, user_id, period.end()).await?;
    let spending = allocation::allocate(&candidates, period.start(), period.end());

    Ok(build_budget_lines(&budgets, &spending))
}
