//! Recent-activity list with a single carry-over separator.
//!
//! The list is the user's latest transactions by anchor date. Walking it in order,
//! the first transaction anchored before the selected month is preceded by one
//! [`ActivityRow::Separator`], so a flat list shows this month's new activity
//! apart from carry-over installments.

use crate::{
    core::{
        allocation,
        installment::{self, InstallmentPosition},
        period::Period,
        transaction,
    },
    entities::{PaymentMethod, TransactionCategory, TransactionType},
    errors::Result,
    models::Transaction,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::ConnectionTrait;
use serde::Serialize;
use tracing::debug;

/// Default number of recent transactions shown.
pub const DEFAULT_RECENT_LIMIT: u64 = 15;
/// Default separator text.
pub const DEFAULT_SEPARATOR_LABEL: &str = "Installments from previous months";

/// How the recent-activity list is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityOptions {
    /// Most transactions returned
    pub limit: u64,
    /// Text of the separator row
    pub separator_label: String,
}

impl Default for ActivityOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_RECENT_LIMIT,
            separator_label: DEFAULT_SEPARATOR_LABEL.to_string(),
        }
    }
}

/// A real transaction as shown in a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionRow {
    /// Database id
    pub id: i64,
    /// Display label
    pub name: String,
    /// Deposit, expense or investment
    pub transaction_type: TransactionType,
    /// Category tag
    pub category: TransactionCategory,
    /// How it was paid
    pub payment_method: PaymentMethod,
    /// Anchor date
    pub date: NaiveDate,
    /// Total amount of the transaction
    pub amount: Decimal,
    /// Value of each monthly event
    pub installment_amount: Decimal,
    /// What the transaction contributes to the selected month
    pub period_amount: Decimal,
    /// `current/total` for multi-installment purchases active in the selected month
    pub installment: Option<InstallmentPosition>,
    /// Repeats every month
    pub is_recurring: bool,
}

impl TransactionRow {
    /// Builds the row for `transaction` as seen from `period`.
    #[must_use]
    pub fn new(transaction: &Transaction, period: Period) -> Self {
        Self {
            id: transaction.id,
            name: transaction.name.clone(),
            transaction_type: transaction.transaction_type,
            category: transaction.category,
            payment_method: transaction.payment_method,
            date: transaction.date,
            amount: transaction.amount,
            installment_amount: transaction.installment_amount(),
            period_amount: allocation::amount_between(transaction, period.start(), period.end()),
            installment: installment::position_in(transaction, period),
            is_recurring: transaction.is_recurring,
        }
    }
}

/// One line of an activity or statement list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActivityRow {
    /// A real transaction
    Transaction(TransactionRow),
    /// Marker between this month's activity and carry-over from earlier months
    Separator {
        /// User-facing text
        label: String,
    },
}

impl ActivityRow {
    /// The transaction row, if this is not a separator.
    #[must_use]
    pub const fn as_transaction(&self) -> Option<&TransactionRow> {
        match self {
            Self::Transaction(row) => Some(row),
            Self::Separator { .. } => None,
        }
    }

    /// Whether this is the separator marker.
    #[must_use]
    pub const fn is_separator(&self) -> bool {
        matches!(self, Self::Separator { .. })
    }
}

/// Turns an ordered transaction list into rows, inserting the separator once,
/// immediately before the first transaction anchored before `period`.
#[must_use]
pub fn insert_separator(
    transactions: &[Transaction],
    period: Period,
    separator_label: &str,
) -> Vec<ActivityRow> {
    let period_start = period.start();
    let mut rows = Vec::with_capacity(transactions.len() + 1);
    let mut separated = false;

    for transaction in transactions {
        if !separated && transaction.date < period_start {
            rows.push(ActivityRow::Separator {
                label: separator_label.to_string(),
            });
            separated = true;
        }
        rows.push(ActivityRow::Transaction(TransactionRow::new(
            transaction,
            period,
        )));
    }

    rows
}

/// Builds the recent-activity list for the `MM` / `YYYY` period.
///
/// The limit applies to anchor dates, not to events; the list is not filtered by
/// period.
///
/// # Errors
/// Returns a validation error for a malformed month or year, or a database error.
pub async fn build_recent_activity<C: ConnectionTrait>(
    db: &C,
    user_id: &str,
    month: &str,
    year: &str,
    options: &ActivityOptions,
) -> Result<Vec<ActivityRow>> {
    let period = Period::parse(month, year)?;
    let recent = transaction::list_recent_transactions(db, user_id, options.limit).await?;
    debug!(
        user_id,
        %period,
        count = recent.len(),
        "Building recent activity"
    );
    Ok(insert_separator(&recent, period, &options.separator_label))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{
        create_test_transaction, date, dec, expense, new_expense, setup_test_db,
    };

    fn labels(rows: &[ActivityRow]) -> Vec<String> {
        rows.iter()
            .map(|row| match row {
                ActivityRow::Transaction(row) => row.name.clone(),
                ActivityRow::Separator { .. } => "--".to_string(),
            })
            .collect()
    }

    #[test]
    fn test_separator_precedes_first_carry_over() {
        let february = Period::new(2024, 2).unwrap();
        let transactions = vec![
            Transaction {
                name: "Groceries".to_string(),
                ..expense(3, "80", date(2024, 2, 20), 1)
            },
            Transaction {
                name: "Fuel".to_string(),
                ..expense(2, "60", date(2024, 2, 3), 1)
            },
            Transaction {
                name: "Television".to_string(),
                ..expense(1, "1200", date(2023, 12, 10), 6)
            },
        ];

        let rows = insert_separator(&transactions, february, "Earlier");

        assert_eq!(labels(&rows), ["Groceries", "Fuel", "--", "Television"]);
        assert_eq!(rows.iter().filter(|row| row.is_separator()).count(), 1);

        let television = rows[3].as_transaction().unwrap();
        assert_eq!(television.installment_amount, dec("200"));
        assert_eq!(television.period_amount, dec("200"));
        assert_eq!(
            television.installment,
            Some(InstallmentPosition {
                current: 3,
                total: 6
            })
        );
    }

    #[test]
    fn test_only_one_separator_for_many_carry_overs() {
        let march = Period::new(2024, 3).unwrap();
        let transactions = vec![
            expense(3, "10", date(2024, 2, 20), 2),
            expense(2, "10", date(2024, 1, 20), 3),
            expense(1, "10", date(2023, 12, 20), 4),
        ];
        let rows = insert_separator(&transactions, march, "Earlier");
        assert!(rows[0].is_separator());
        assert_eq!(rows.iter().filter(|row| row.is_separator()).count(), 1);
        assert_eq!(rows.len(), 4);
    }

    #[test]
    fn test_no_separator_when_everything_is_current() {
        let march = Period::new(2024, 3).unwrap();
        let transactions = vec![expense(1, "10", date(2024, 3, 2), 1)];
        let rows = insert_separator(&transactions, march, "Earlier");
        assert!(rows.iter().all(|row| !row.is_separator()));
        assert!(insert_separator(&[], march, "Earlier").is_empty());
    }

    #[test]
    fn test_rows_serialize_with_kind_tag() {
        let march = Period::new(2024, 3).unwrap();
        let rows = insert_separator(&[expense(1, "10", date(2024, 2, 2), 1)], march, "Earlier");
        let json = serde_json::to_value(&rows).unwrap();
        assert_eq!(json[0]["kind"], "separator");
        assert_eq!(json[0]["label"], "Earlier");
        assert_eq!(json[1]["kind"], "transaction");
        assert_eq!(json[1]["category"], "FOOD");
    }

    #[tokio::test]
    async fn test_build_recent_activity_reads_latest_transactions() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_transaction(&db, "alice", new_expense("Old sofa", "900", date(2024, 1, 5), 3))
            .await?;
        create_test_transaction(&db, "alice", new_expense("Lunch", "25", date(2024, 2, 10), 1))
            .await?;
        create_test_transaction(&db, "bob", new_expense("Not mine", "5", date(2024, 2, 11), 1))
            .await?;

        let options = ActivityOptions {
            limit: 10,
            separator_label: "Earlier".to_string(),
        };
        let rows = build_recent_activity(&db, "alice", "02", "2024", &options).await?;

        assert_eq!(labels(&rows), ["Lunch", "--", "Old sofa"]);
        let sofa = rows[2].as_transaction().unwrap();
        assert_eq!(
            sofa.installment,
            Some(InstallmentPosition {
                current: 2,
                total: 3
            })
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_build_recent_activity_respects_limit() -> Result<()> {
        let db = setup_test_db().await?;
        for day in 1..=5 {
            create_test_transaction(
                &db,
                "alice",
                new_expense("Coffee", "3", date(2024, 2, day), 1),
            )
            .await?;
        }
        let options = ActivityOptions {
            limit: 3,
            ..ActivityOptions::default()
        };
        let rows = build_recent_activity(&db, "alice", "02", "2024", &options).await?;
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].as_transaction().unwrap().date, date(2024, 2, 5));
        Ok(())
    }

    #[tokio::test]
    async fn test_build_recent_activity_rejects_bad_period() -> Result<()> {
        let db = setup_test_db().await?;
        let result =
            build_recent_activity(&db, "alice", "2", "2024", &ActivityOptions::default()).await;
        assert!(matches!(
            result,
            Err(crate::errors::Error::InvalidPeriod { .. })
        ));
        Ok(())
    }
}
