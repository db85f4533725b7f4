//! Unified error types for `FinanceBuddy`.
//!
//! Validation failures, missing records and infrastructure failures all flow through
//! the single [`Error`] enum. [`Error::kind`] groups them so a caller can decide
//! between "bad request", "not found" and "internal" responses.

use rust_decimal::Decimal;
use thiserror::Error;

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller sent something malformed; nothing was computed or written.
    Validation,
    /// A referenced record does not exist or belongs to another user.
    NotFound,
    /// Storage, configuration or chat-framework failure.
    Internal,
}

/// Main error type for the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Month or year did not match the `MM` / `YYYY` formats.
    #[error("Invalid period: month '{month}' / year '{year}' (expected MM and YYYY)")]
    InvalidPeriod {
        /// Month as received
        month: String,
        /// Year as received
        year: String,
    },

    /// Amount is zero, negative or above the allowed maximum.
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// Amount as received
        amount: Decimal,
    },

    /// Installment count outside `1..=42`.
    #[error("Invalid installment count: {count} (must be between 1 and 42)")]
    InvalidInstallments {
        /// Count as received
        count: i64,
    },

    /// Any other rejected input.
    #[error("Validation error: {message}")]
    Validation {
        /// What was wrong with the input
        message: String,
    },

    /// Transaction id is absent or not owned by the requesting user.
    #[error("Transaction not found: {id}")]
    TransactionNotFound {
        /// Requested transaction id
        id: i64,
    },

    /// A stored row holds values the application never writes.
    #[error("Corrupt {table} record {id}: {message}")]
    CorruptRecord {
        /// Table the row came from
        table: &'static str,
        /// Primary key of the row
        id: i64,
        /// What is wrong with it
        message: String,
    },

    /// Configuration file could not be read or parsed.
    #[error("Configuration error: {message}")]
    Config {
        /// Details of the configuration problem
        message: String,
    },

    /// Database error from `SeaORM`.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or unreadable environment variable.
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Error while writing a formatted message.
    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// Serenity/Poise framework error.
    #[error("Discord error: {0}")]
    Discord(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Discord(Box::new(value))
    }
}

impl Error {
    /// Shorthand for [`Error::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Classifies the error for the calling layer.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidPeriod { .. }
            | Self::InvalidAmount { .. }
            | Self::InvalidInstallments { .. }
            | Self::Validation { .. } => ErrorKind::Validation,
            Self::TransactionNotFound { .. } => ErrorKind::NotFound,
            Self::CorruptRecord { .. }
            | Self::Config { .. }
            | Self::Database(_)
            | Self::Io(_)
            | Self::EnvVar(_)
            | Self::Fmt(_)
            | Self::Discord(_) => ErrorKind::Internal,
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
