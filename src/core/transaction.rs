//! Transaction persistence - upserts, deletion or closure, and the read queries the
//! aggregate builders consume.
//!
//! Every input is validated before the first query runs. Amounts are checked and
//! rounded as `Decimal` and stored as `f64`; reads convert back through
//! [`Transaction::try_from`].

use crate::{
    core::period::{self, Period},
    entities::{PaymentMethod, TransactionCategory, TransactionType, transaction},
    errors::{Error, Result},
    models::{
        ExtractedTransaction, NewTransaction, Transaction, validate_amount,
        validate_installments, validate_name,
    },
};
use chrono::{NaiveDate, Utc};
use rust_decimal::prelude::ToPrimitive;
use sea_orm::{ActiveValue, QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*};
use tracing::{debug, info};

/// What [`delete_transaction`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The row was removed.
    Deleted,
    /// A recurring row was kept for history and ends on `end_date`.
    Closed {
        /// Last day the transaction still applies to
        end_date: NaiveDate,
    },
}

/// Validated column values shared by inserts and updates.
#[derive(Debug, Clone)]
struct Prepared {
    name: String,
    amount: f64,
    transaction_type: TransactionType,
    category: TransactionCategory,
    payment_method: PaymentMethod,
    date: NaiveDate,
    installments: i32,
    is_recurring: bool,
    end_date: Option<NaiveDate>,
}

impl Prepared {
    fn validate(input: &NewTransaction) -> Result<Self> {
        let name = validate_name(&input.name)?;
        let amount = validate_amount(input.amount.round_dp(2))?;
        let installments = if input.is_recurring {
            1
        } else {
            validate_installments(input.installments)?
        };

        if !input.category.is_valid_for(input.transaction_type) {
            return Err(Error::validation(format!(
                "category {} is not valid for {} transactions",
                input.category.as_str(),
                input.transaction_type.as_str()
            )));
        }

        let end_date = if input.is_recurring {
            None
        } else {
            Some(
                period::add_calendar_months(input.date, installments - 1)
                    .ok_or_else(|| Error::validation("date is out of range"))?,
            )
        };

        Ok(Self {
            name,
            amount: amount
                .to_f64()
                .ok_or_else(|| Error::InvalidAmount { amount })?,
            transaction_type: input.transaction_type,
            category: input.category,
            payment_method: input.payment_method,
            date: input.date,
            installments: i32::try_from(installments).map_err(|_| Error::InvalidInstallments {
                count: input.installments,
            })?,
            is_recurring: input.is_recurring,
            end_date,
        })
    }

    fn into_active_model(self, user_id: &str) -> transaction::ActiveModel {
        let now = Utc::now();
        transaction::ActiveModel {
            user_id: Set(user_id.to_string()),
            name: Set(self.name),
            amount: Set(self.amount),
            transaction_type: Set(self.transaction_type),
            category: Set(self.category),
            payment_method: Set(self.payment_method),
            date: Set(self.date),
            installments: Set(self.installments),
            is_recurring: Set(self.is_recurring),
            end_date: Set(self.end_date),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
    }
}

/// Creates a transaction, or updates it in place when `id` is given.
///
/// Recurring transactions always store one installment and no derived end date.
/// Editing a recurring transaction that was already closed keeps its end date, and
/// its date may not move past that end date.
/// Installment purchases get `end_date = date + (installments - 1) months`.
///
/// # Arguments
/// * `db` - Database connection
/// * `user_id` - Owner of the transaction
/// * `input` - Values from the form or command
/// * `id` - Existing transaction to overwrite, if any
///
/// # Errors
/// Validation errors are returned before any query. Updating an id that does not
/// exist or belongs to someone else returns [`Error::TransactionNotFound`].
pub async fn upsert_transaction<C: ConnectionTrait>(
    db: &C,
    user_id: &str,
    input: &NewTransaction,
    id: Option<i64>,
) -> Result<transaction::Model> {
    let prepared = Prepared::validate(input)?;

    let Some(id) = id else {
        let created = prepared.into_active_model(user_id).insert(db).await?;
        info!(
            user_id,
            transaction_id = created.id,
            installments = created.installments,
            is_recurring = created.is_recurring,
            "Created transaction"
        );
        return Ok(created);
    };

    let existing = get_user_transaction(db, user_id, id).await?;
    let mut active = prepared.into_active_model(user_id);
    active.id = ActiveValue::Unchanged(id);
    active.created_at = Set(existing.created_at);
    if existing.is_recurring && input.is_recurring {
        if let Some(end_date) = existing.end_date.filter(|end_date| input.date > *end_date) {
            return Err(Error::validation(format!(
                "this recurring transaction ended on {end_date}; its date cannot move past that"
            )));
        }
        active.end_date = Set(existing.end_date);
    }

    let updated = active.update(db).await?;
    info!(user_id, transaction_id = id, "Updated transaction");
    Ok(updated)
}

/// Fetches one transaction owned by `user_id`.
///
/// # Errors
/// Returns [`Error::TransactionNotFound`] when the id is absent or owned by another user.
pub async fn get_user_transaction<C: ConnectionTrait>(
    db: &C,
    user_id: &str,
    id: i64,
) -> Result<transaction::Model> {
    crate::entities::Transaction::find_by_id(id)
        .filter(transaction::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or(Error::TransactionNotFound { id })
}

/// Deletes a transaction, or closes a recurring one so past months keep it.
///
/// A recurring transaction is closed by setting its end date to the last day of
/// the month before the `MM` / `YYYY` reference period. When the reference period
/// is its first month (or earlier) there is no history to keep and the row is
/// deleted. An existing earlier end date is never pushed later.
///
/// # Errors
/// Validation error for a malformed period, [`Error::TransactionNotFound`] for an
/// unknown or foreign id.
pub async fn delete_transaction<C: ConnectionTrait>(
    db: &C,
    user_id: &str,
    id: i64,
    month: &str,
    year: &str,
) -> Result<DeleteOutcome> {
    let reference = Period::parse(month, year)?;
    let existing = get_user_transaction(db, user_id, id).await?;

    if !existing.is_recurring || reference <= Period::containing(existing.date) {
        existing.delete(db).await?;
        info!(user_id, transaction_id = id, "Deleted transaction");
        return Ok(DeleteOutcome::Deleted);
    }

    let closing = reference.offset(-1).end();
    let end_date = existing.end_date.map_or(closing, |current| current.min(closing));

    let mut active: transaction::ActiveModel = existing.into();
    active.end_date = Set(Some(end_date));
    active.updated_at = Set(Utc::now());
    active.update(db).await?;

    info!(user_id, transaction_id = id, %end_date, "Closed recurring transaction");
    Ok(DeleteOutcome::Closed { end_date })
}

/// All of a user's transactions anchored on or before `upper_bound`, oldest first.
///
/// This is the candidate set every aggregate allocates from; window filtering is
/// done by the allocator.
pub async fn list_candidate_transactions<C: ConnectionTrait>(
    db: &C,
    user_id: &str,
    upper_bound: NaiveDate,
) -> Result<Vec<Transaction>> {
    let models = crate::entities::Transaction::find()
        .filter(transaction::Column::UserId.eq(user_id))
        .filter(transaction::Column::Date.lte(upper_bound))
        .order_by_asc(transaction::Column::Date)
        .order_by_asc(transaction::Column::Id)
        .all(db)
        .await?;

    debug!(user_id, %upper_bound, count = models.len(), "Loaded candidate transactions");
    models.iter().map(Transaction::try_from).collect()
}

/// The user's latest `limit` transactions by anchor date, newest first.
pub async fn list_recent_transactions<C: ConnectionTrait>(
    db: &C,
    user_id: &str,
    limit: u64,
) -> Result<Vec<Transaction>> {
    crate::entities::Transaction::find()
        .filter(transaction::Column::UserId.eq(user_id))
        .order_by_desc(transaction::Column::Date)
        .order_by_desc(transaction::Column::Id)
        .limit(limit)
        .all(db)
        .await?
        .iter()
        .map(Transaction::try_from)
        .collect()
}

/// Saves receipt or invoice extraction output as credit-card expenses.
///
/// A line such as "3/10" on a statement dated March becomes a 10-installment
/// purchase anchored two months earlier, so the March event is the third one.
/// All rows are validated first and written in one database transaction.
///
/// # Errors
/// Any invalid item rejects the whole batch before anything is written.
pub async fn save_extracted_transactions(
    db: &DatabaseConnection,
    user_id: &str,
    items: &[ExtractedTransaction],
) -> Result<Vec<transaction::Model>> {
    let prepared = items
        .iter()
        .map(|item| Prepared::validate(&extracted_to_input(item)?))
        .collect::<Result<Vec<_>>>()?;

    let txn = db.begin().await?;
    let mut saved = Vec::with_capacity(prepared.len());
    for row in prepared {
        saved.push(row.into_active_model(user_id).insert(&txn).await?);
    }
    txn.commit().await?;

    info!(user_id, count = saved.len(), "Saved extracted transactions");
    Ok(saved)
}

/// Maps one extracted line to form input, back-dating installment purchases.
fn extracted_to_input(item: &ExtractedTransaction) -> Result<NewTransaction> {
    let total = item.total_installments.unwrap_or(1).max(1);
    let current = item.current_installment.unwrap_or(1).clamp(1, total);

    let date = period::sub_calendar_months(item.date, current - 1)
        .ok_or_else(|| Error::validation("statement date is out of range"))?;

    Ok(NewTransaction {
        name: item.name.clone(),
        amount: item.amount,
        transaction_type: TransactionType::Expense,
        category: item.category,
        payment_method: PaymentMethod::CreditCard,
        date,
        installments: i64::from(total),
        is_recurring: false,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_upsert_validation_runs_before_queries() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let mut input = new_expense("Desk", "0", date(2024, 1, 1), 1);
        let result = upsert_transaction(&db, "alice", &input, None).await;
        assert!(matches!(result, Err(Error::InvalidAmount { .. })));

        input.amount = dec("1000000");
        let result = upsert_transaction(&db, "alice", &input, None).await;
        assert!(matches!(result, Err(Error::InvalidAmount { .. })));

        input.amount = dec("100");
        input.installments = 43;
        let result = upsert_transaction(&db, "alice", &input, None).await;
        assert!(matches!(result, Err(Error::InvalidInstallments { count: 43 })));

        input.installments = 0;
        let result = upsert_transaction(&db, "alice", &input, None).await;
        assert!(matches!(result, Err(Error::InvalidInstallments { count: 0 })));

        input.installments = 1;
        input.name = "   ".to_string();
        let result = upsert_transaction(&db, "alice", &input, None).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_upsert_rejects_category_type_mismatch() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();
        let input = NewTransaction {
            category: TransactionCategory::Crypto,
            ..new_expense("Bitcoin", "100", date(2024, 1, 1), 1)
        };
        let result = upsert_transaction(&db, "alice", &input, None).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        let input = NewTransaction {
            transaction_type: TransactionType::Investment,
            ..new_expense("Lunch", "100", date(2024, 1, 1), 1)
        };
        let result = upsert_transaction(&db, "alice", &input, None).await;
        assert!(matches!(result, Err(Error::Validation { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_create_derives_end_date_and_trims_name() -> Result<()> {
        let db = setup_test_db().await?;
        let created = create_test_transaction(
            &db,
            "alice",
            new_expense("  Laptop ", "2400", date(2024, 1, 31), 12),
        )
        .await?;

        assert_eq!(created.name, "Laptop");
        assert_eq!(created.amount, 2400.0);
        assert_eq!(created.installments, 12);
        assert_eq!(created.end_date, Some(date(2024, 12, 31)));
        Ok(())
    }

    #[tokio::test]
    async fn test_recurring_forces_single_installment() -> Result<()> {
        let db = setup_test_db().await?;
        let input = NewTransaction {
            is_recurring: true,
            installments: 99,
            ..new_expense("Rent", "1500", date(2024, 1, 1), 1)
        };
        let created = create_test_transaction(&db, "alice", input).await?;
        assert_eq!(created.installments, 1);
        assert!(created.is_recurring);
        assert_eq!(created.end_date, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_in_place_and_ownership() -> Result<()> {
        let db = setup_test_db().await?;
        let created =
            create_test_transaction(&db, "alice", new_expense("Bike", "300", date(2024, 2, 1), 1))
                .await?;

        let edit = new_expense("Bike", "450", date(2024, 2, 1), 3);
        let updated = upsert_transaction(&db, "alice", &edit, Some(created.id)).await?;
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.amount, 450.0);
        assert_eq!(updated.end_date, Some(date(2024, 4, 1)));
        assert_eq!(updated.created_at, created.created_at);

        let result = upsert_transaction(&db, "mallory", &edit, Some(created.id)).await;
        assert!(matches!(
            result,
            Err(Error::TransactionNotFound { id }) if id == created.id
        ));

        let result = upsert_transaction(&db, "alice", &edit, Some(9999)).await;
        assert!(matches!(result, Err(Error::TransactionNotFound { id: 9999 })));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_non_recurring_removes_row() -> Result<()> {
        let db = setup_test_db().await?;
        let created =
            create_test_transaction(&db, "alice", new_expense("Shoes", "120", date(2024, 2, 1), 2))
                .await?;

        let outcome = delete_transaction(&db, "alice", created.id, "03", "2024").await?;
        assert_eq!(outcome, DeleteOutcome::Deleted);
        assert!(
            get_user_transaction(&db, "alice", created.id)
                .await
                .is_err()
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_recurring_mid_life_closes_it() -> Result<()> {
        let db = setup_test_db().await?;
        let created =
            create_test_transaction(&db, "alice", new_recurring("Gym", "90", date(2024, 1, 10)))
                .await?;

        let outcome = delete_transaction(&db, "alice", created.id, "04", "2024").await?;
        assert_eq!(
            outcome,
            DeleteOutcome::Closed {
                end_date: date(2024, 3, 31)
            }
        );

        let stored = get_user_transaction(&db, "alice", created.id).await?;
        assert_eq!(stored.end_date, Some(date(2024, 3, 31)));

        // Closing again later must not extend the schedule.
        let outcome = delete_transaction(&db, "alice", created.id, "06", "2024").await?;
        assert_eq!(
            outcome,
            DeleteOutcome::Closed {
                end_date: date(2024, 3, 31)
            }
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_closed_recurring_cannot_move_past_its_end() -> Result<()> {
        let db = setup_test_db().await?;
        let created =
            create_test_transaction(&db, "alice", new_recurring("Gym", "90", date(2024, 1, 10)))
                .await?;
        delete_transaction(&db, "alice", created.id, "04", "2024").await?;

        let moved = new_recurring("Gym", "90", date(2024, 5, 10));
        let result = upsert_transaction(&db, "alice", &moved, Some(created.id)).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        let stored = get_user_transaction(&db, "alice", created.id).await?;
        assert_eq!(stored.date, date(2024, 1, 10));
        assert_eq!(stored.end_date, Some(date(2024, 3, 31)));

        // Moving within the closed range keeps the closure.
        let shifted = new_recurring("Gym", "95", date(2024, 2, 10));
        let updated = upsert_transaction(&db, "alice", &shifted, Some(created.id)).await?;
        assert_eq!(updated.date, date(2024, 2, 10));
        assert_eq!(updated.end_date, Some(date(2024, 3, 31)));

        let events = crate::core::installment::expand(&Transaction::try_from(&updated)?).count();
        assert_eq!(events, 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_recurring_in_first_month_removes_row() -> Result<()> {
        let db = setup_test_db().await?;
        let created =
            create_test_transaction(&db, "alice", new_recurring("Gym", "90", date(2024, 1, 10)))
                .await?;

        let outcome = delete_transaction(&db, "alice", created.id, "01", "2024").await?;
        assert_eq!(outcome, DeleteOutcome::Deleted);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_checks_period_and_owner() -> Result<()> {
        let db = setup_test_db().await?;
        let created =
            create_test_transaction(&db, "alice", new_expense("Book", "30", date(2024, 2, 1), 1))
                .await?;

        let result = delete_transaction(&db, "alice", created.id, "2", "2024").await;
        assert!(matches!(result, Err(Error::InvalidPeriod { .. })));

        let result = delete_transaction(&db, "bob", created.id, "02", "2024").await;
        assert!(matches!(result, Err(Error::TransactionNotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_list_candidates_filters_user_and_bound() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_transaction(&db, "alice", new_expense("Jan", "10", date(2024, 1, 5), 1)).await?;
        create_test_transaction(&db, "alice", new_expense("Mar", "10", date(2024, 3, 5), 1)).await?;
        create_test_transaction(&db, "bob", new_expense("Bob", "10", date(2024, 1, 5), 1)).await?;

        let candidates = list_candidate_transactions(&db, "alice", date(2024, 2, 29)).await?;
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name, "Jan");
        assert_eq!(candidates[0].amount, dec("10"));
        Ok(())
    }

    #[tokio::test]
    async fn test_list_recent_orders_by_date_then_id() -> Result<()> {
        let db = setup_test_db().await?;
        let first =
            create_test_transaction(&db, "alice", new_expense("A", "10", date(2024, 3, 5), 1))
                .await?;
        let second =
            create_test_transaction(&db, "alice", new_expense("B", "10", date(2024, 3, 5), 1))
                .await?;
        create_test_transaction(&db, "alice", new_expense("C", "10", date(2024, 1, 5), 1)).await?;

        let recent = list_recent_transactions(&db, "alice", 2).await?;
        assert_eq!(
            recent.iter().map(|t| t.id).collect::<Vec<_>>(),
            [second.id, first.id]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_extracted_installments_are_back_dated() -> Result<()> {
        let db = setup_test_db().await?;
        let items = vec![
            ExtractedTransaction {
                name: "Headphones".to_string(),
                amount: dec("1000"),
                category: TransactionCategory::Entertainment,
                date: date(2024, 3, 12),
                current_installment: Some(3),
                total_installments: Some(10),
            },
            ExtractedTransaction {
                name: "Market".to_string(),
                amount: dec("85.40"),
                category: TransactionCategory::Food,
                date: date(2024, 3, 2),
                current_installment: None,
                total_installments: None,
            },
        ];

        let saved = save_extracted_transactions(&db, "alice", &items).await?;
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[0].date, date(2024, 1, 12));
        assert_eq!(saved[0].installments, 10);
        assert_eq!(saved[0].payment_method, PaymentMethod::CreditCard);
        assert_eq!(saved[0].transaction_type, TransactionType::Expense);
        assert_eq!(saved[1].date, date(2024, 3, 2));
        assert_eq!(saved[1].installments, 1);

        let march = Period::new(2024, 3)?;
        let candidates = list_candidate_transactions(&db, "alice", march.end()).await?;
        let headphones = candidates.iter().find(|t| t.name == "Headphones").unwrap();
        assert_eq!(
            crate::core::installment::position_in(headphones, march).map(|p| p.current),
            Some(3)
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_extracted_batch_is_all_or_nothing() -> Result<()> {
        let db = setup_test_db().await?;
        let items = vec![
            ExtractedTransaction {
                name: "Fine".to_string(),
                amount: dec("10"),
                category: TransactionCategory::Food,
                date: date(2024, 3, 2),
                current_installment: None,
                total_installments: None,
            },
            ExtractedTransaction {
                name: "Broken".to_string(),
                amount: dec("-5"),
                category: TransactionCategory::Food,
                date: date(2024, 3, 2),
                current_installment: None,
                total_installments: None,
            },
        ];

        assert!(save_extracted_transactions(&db, "alice", &items).await.is_err());
        assert!(list_recent_transactions(&db, "alice", 10).await?.is_empty());
        Ok(())
    }
}
