//! Domain records used by the allocation engine.
//!
//! The database stores amounts as `f64` and counts as `i32`; the engine works on
//! [`Transaction`], which holds a [`Decimal`] amount and a validated installment
//! count. Conversion happens once, at the persistence boundary.

use crate::{
    core::period,
    entities::{PaymentMethod, TransactionCategory, TransactionType, transaction},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use rust_decimal::{Decimal, prelude::FromPrimitive};
use serde::{Deserialize, Serialize};

/// Smallest number of installments a transaction can be split into.
pub const MIN_INSTALLMENTS: i64 = 1;
/// Largest number of installments a transaction can be split into.
pub const MAX_INSTALLMENTS: i64 = 42;
/// Longest accepted transaction name, in characters.
pub const MAX_NAME_LENGTH: usize = 100;

/// Largest accepted amount (999 999.99).
#[must_use]
pub fn max_amount() -> Decimal {
    Decimal::new(99_999_999, 2)
}

/// A transaction as seen by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Database identifier
    pub id: i64,
    /// Owner
    pub user_id: String,
    /// Display label
    pub name: String,
    /// Total amount for the whole transaction
    pub amount: Decimal,
    /// Deposit, expense or investment
    pub transaction_type: TransactionType,
    /// Category tag
    pub category: TransactionCategory,
    /// How it was paid
    pub payment_method: PaymentMethod,
    /// Date of the first installment
    pub date: NaiveDate,
    /// Declared installment count; always 1 for recurring transactions
    pub installments: u32,
    /// Repeats the full amount every month until `end_date`
    pub is_recurring: bool,
    /// Last day the transaction applies to
    pub end_date: Option<NaiveDate>,
}

impl Transaction {
    /// Value of each monthly event: the full amount for recurring transactions,
    /// otherwise `amount / installments`.
    #[must_use]
    pub fn installment_amount(&self) -> Decimal {
        if self.is_recurring {
            self.amount
        } else {
            period::divide_amount(self.amount, self.installments)
        }
    }
}

impl TryFrom<&transaction::Model> for Transaction {
    type Error = Error;

    fn try_from(model: &transaction::Model) -> Result<Self> {
        let corrupt = |message: String| Error::CorruptRecord {
            table: "transactions",
            id: model.id,
            message,
        };

        let amount = Decimal::from_f64(model.amount)
            .map(|amount| amount.round_dp(2))
            .ok_or_else(|| corrupt(format!("amount {} is not a number", model.amount)))?;
        let amount = validate_amount(amount).map_err(|e| corrupt(e.to_string()))?;

        let installments = if model.is_recurring {
            1
        } else {
            validate_installments(i64::from(model.installments))
                .map_err(|e| corrupt(e.to_string()))?
        };

        Ok(Self {
            id: model.id,
            user_id: model.user_id.clone(),
            name: model.name.clone(),
            amount,
            transaction_type: model.transaction_type,
            category: model.category,
            payment_method: model.payment_method,
            date: model.date,
            installments,
            is_recurring: model.is_recurring,
            end_date: if model.is_recurring {
                model.end_date
            } else {
                period::add_calendar_months(model.date, installments - 1)
            },
        })
    }
}

/// Input for creating or updating a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTransaction {
    /// Display label, trimmed before saving
    pub name: String,
    /// Total amount
    pub amount: Decimal,
    /// Deposit, expense or investment
    pub transaction_type: TransactionType,
    /// Category tag; must match the type's category subset
    pub category: TransactionCategory,
    /// How it was paid
    pub payment_method: PaymentMethod,
    /// Date of the first installment
    pub date: NaiveDate,
    /// Requested installment count, ignored when `is_recurring`
    pub installments: i64,
    /// Repeat the full amount every month
    pub is_recurring: bool,
}

/// One row produced by receipt or invoice extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedTransaction {
    /// Merchant or item label
    pub name: String,
    /// Total purchase amount (not the installment value)
    pub amount: Decimal,
    /// Expense category
    pub category: TransactionCategory,
    /// Date printed on the statement for this line
    pub date: NaiveDate,
    /// Which installment the statement line refers to, e.g. 3 in "3/10"
    pub current_installment: Option<u32>,
    /// Total installments, e.g. 10 in "3/10"
    pub total_installments: Option<u32>,
}

/// Rejects non-positive amounts and amounts above [`max_amount`].
pub fn validate_amount(amount: Decimal) -> Result<Decimal> {
    if amount <= Decimal::ZERO || amount > max_amount() {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(amount)
}

/// Accepts installment counts in `1..=42`.
pub fn validate_installments(count: i64) -> Result<u32> {
    if !(MIN_INSTALLMENTS..=MAX_INSTALLMENTS).contains(&count) {
        return Err(Error::InvalidInstallments { count });
    }
    u32::try_from(count).map_err(|_| Error::InvalidInstallments { count })
}

/// Trims the name and checks its length.
pub fn validate_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::validation("name is required"));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(Error::validation(format!(
            "name is longer than {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(trimmed.to_string())
}
