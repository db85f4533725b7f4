//! Persisted enumerations shared by the transaction and budget tables.
//!
//! Each enum is stored as its `SCREAMING_SNAKE_CASE` name so the database stays
//! readable, and parses case-insensitively from user input.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Direction of a transaction.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    /// Money coming in (salary, refunds)
    #[sea_orm(string_value = "DEPOSIT")]
    Deposit,
    /// Money going out
    #[sea_orm(string_value = "EXPENSE")]
    Expense,
    /// Money moved into an investment
    #[sea_orm(string_value = "INVESTMENT")]
    Investment,
}

impl TransactionType {
    /// All variants in declaration order.
    pub const ALL: [Self; 3] = [Self::Deposit, Self::Expense, Self::Investment];

    /// Stored / displayed name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Deposit => "DEPOSIT",
            Self::Expense => "EXPENSE",
            Self::Investment => "INVESTMENT",
        }
    }
}

/// Category tag. The investment categories are only valid for
/// [`TransactionType::Investment`]; the others only for deposits and expenses.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionCategory {
    /// Courses, books and tuition
    #[sea_orm(string_value = "EDUCATION")]
    Education,
    /// Leisure and subscriptions
    #[sea_orm(string_value = "ENTERTAINMENT")]
    Entertainment,
    /// Groceries and restaurants
    #[sea_orm(string_value = "FOOD")]
    Food,
    /// Medical costs and insurance
    #[sea_orm(string_value = "HEALTH")]
    Health,
    /// Rent, mortgage and maintenance
    #[sea_orm(string_value = "HOUSING")]
    Housing,
    /// Anything else
    #[sea_orm(string_value = "OTHER")]
    Other,
    /// Wages and other pay
    #[sea_orm(string_value = "SALARY")]
    Salary,
    /// Fuel, fares and vehicle costs
    #[sea_orm(string_value = "TRANSPORTATION")]
    Transportation,
    /// Power, water, internet and phone
    #[sea_orm(string_value = "UTILITY")]
    Utility,
    /// Stocks
    #[sea_orm(string_value = "STOCKS")]
    Stocks,
    /// Certificate of deposit
    #[sea_orm(string_value = "CDB")]
    Cdb,
    /// Interbank deposit rate products
    #[sea_orm(string_value = "CDI")]
    Cdi,
    /// Cryptocurrencies
    #[sea_orm(string_value = "CRYPTO")]
    Crypto,
    /// Investment funds
    #[sea_orm(string_value = "FUNDS")]
    Funds,
    /// Other fixed-income securities
    #[sea_orm(string_value = "FIXED_INCOME")]
    FixedIncome,
    /// Savings account
    #[sea_orm(string_value = "SAVINGS")]
    Savings,
    /// Government bonds
    #[sea_orm(string_value = "TREASURY")]
    Treasury,
}

impl TransactionCategory {
    /// Categories valid for deposits and expenses.
    pub const EVERYDAY: [Self; 9] = [
        Self::Education,
        Self::Entertainment,
        Self::Food,
        Self::Health,
        Self::Housing,
        Self::Other,
        Self::Salary,
        Self::Transportation,
        Self::Utility,
    ];

    /// Categories valid for investments.
    pub const INVESTMENT: [Self; 8] = [
        Self::Stocks,
        Self::Cdb,
        Self::Cdi,
        Self::Crypto,
        Self::Funds,
        Self::FixedIncome,
        Self::Savings,
        Self::Treasury,
    ];

    /// Whether this category belongs to the investment subset.
    #[must_use]
    pub const fn is_investment(self) -> bool {
        matches!(
            self,
            Self::Stocks
                | Self::Cdb
                | Self::Cdi
                | Self::Crypto
                | Self::Funds
                | Self::FixedIncome
                | Self::Savings
                | Self::Treasury
        )
    }

    /// Whether a transaction of `transaction_type` may carry this category.
    #[must_use]
    pub const fn is_valid_for(self, transaction_type: TransactionType) -> bool {
        match transaction_type {
            TransactionType::Investment => self.is_investment(),
            TransactionType::Deposit | TransactionType::Expense => !self.is_investment(),
        }
    }

    /// Stored / displayed name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Education => "EDUCATION",
            Self::Entertainment => "ENTERTAINMENT",
            Self::Food => "FOOD",
            Self::Health => "HEALTH",
            Self::Housing => "HOUSING",
            Self::Other => "OTHER",
            Self::Salary => "SALARY",
            Self::Transportation => "TRANSPORTATION",
            Self::Utility => "UTILITY",
            Self::Stocks => "STOCKS",
            Self::Cdb => "CDB",
            Self::Cdi => "CDI",
            Self::Crypto => "CRYPTO",
            Self::Funds => "FUNDS",
            Self::FixedIncome => "FIXED_INCOME",
            Self::Savings => "SAVINGS",
            Self::Treasury => "TREASURY",
        }
    }
}

/// How a transaction was paid.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    /// Notes and coins
    #[sea_orm(string_value = "CASH")]
    Cash,
    /// Credit card
    #[sea_orm(string_value = "CREDIT_CARD")]
    CreditCard,
    /// Debit card
    #[sea_orm(string_value = "DEBIT_CARD")]
    DebitCard,
    /// Bank transfer
    #[sea_orm(string_value = "BANK_TRANSFER")]
    BankTransfer,
    /// Bank slip (boleto)
    #[sea_orm(string_value = "BANK_SLIP")]
    BankSlip,
    /// Instant payment
    #[sea_orm(string_value = "PIX")]
    Pix,
    /// Anything else
    #[sea_orm(string_value = "OTHER")]
    Other,
}

impl PaymentMethod {
    /// All variants in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Cash,
        Self::CreditCard,
        Self::DebitCard,
        Self::BankTransfer,
        Self::BankSlip,
        Self::Pix,
        Self::Other,
    ];

    /// Stored / displayed name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "CASH",
            Self::CreditCard => "CREDIT_CARD",
            Self::DebitCard => "DEBIT_CARD",
            Self::BankTransfer => "BANK_TRANSFER",
            Self::BankSlip => "BANK_SLIP",
            Self::Pix => "PIX",
            Self::Other => "OTHER",
        }
    }
}

/// Normalises user input such as `"credit card"` or `"credit-card"` to `CREDIT_CARD`.
fn normalize(input: &str) -> String {
    input
        .trim()
        .to_uppercase()
        .replace([' ', '-'], "_")
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = normalize(s);
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| format!("Invalid transaction type: {s}"))
    }
}

impl FromStr for TransactionCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = normalize(s);
        Self::EVERYDAY
            .into_iter()
            .chain(Self::INVESTMENT)
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| format!("Invalid category: {s}"))
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = normalize(s);
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == wanted)
            .ok_or_else(|| format!("Invalid payment method: {s}"))
    }
}
