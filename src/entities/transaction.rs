//! Transaction entity - Represents one purchase, income or investment, possibly
//! split into monthly installments or repeating every month.
//!
//! `amount` is always the total for the whole transaction, not the per-installment
//! value. `date` anchors the first installment. `end_date` is derived for installment
//! purchases and set on recurring rows only when they are closed.
use super::enums::{PaymentMethod, TransactionCategory, TransactionType};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Transaction database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Unique identifier for the transaction
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owner of the transaction (Discord user ID)
    pub user_id: String,
    /// Display label
    pub name: String,
    /// Total amount of the transaction
    pub amount: f64,
    /// Deposit, expense or investment
    pub transaction_type: TransactionType,
    /// Category tag
    pub category: TransactionCategory,
    /// How it was paid
    pub payment_method: PaymentMethod,
    /// Date of the first installment (or the single occurrence)
    pub date: Date,
    /// Number of equal monthly installments (1 for recurring rows)
    pub installments: i32,
    /// Whether the full amount repeats every month
    pub is_recurring: bool,
    /// Last month the transaction applies to, `None` while a recurring row is open
    pub end_date: Option<Date>,
    /// When the row was created
    pub created_at: DateTimeUtc,
    /// When the row was last modified
    pub updated_at: DateTimeUtc,
}

/// `Transaction` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
