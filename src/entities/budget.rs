//! Budget entity - A spending limit for one expense category in one calendar month.
//!
//! There is at most one row per (`user_id`, `category`, `month`, `year`); the budget
//! logic updates the existing row instead of inserting a duplicate.

use super::enums::TransactionCategory;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Budget database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owner of the budget (Discord user ID)
    pub user_id: String,
    /// Expense category the limit applies to
    pub category: TransactionCategory,
    /// Spending limit for the month
    pub amount: f64,
    /// Calendar month, 1-12
    pub month: i32,
    /// Calendar year
    pub year: i32,
    /// When this budget was last modified
    pub updated_at: DateTimeUtc,
}

/// `Budget` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
