//! Transaction Discord commands - `add_transaction`, `edit_transaction` and
//! `delete_transaction`.
//!
//! Every command acts on the author's own transactions only.

use crate::{
    entities::{PaymentMethod, TransactionCategory, TransactionType},
    models::{NewTransaction, Transaction},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Fields an edit may change; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionEdit {
    /// New display label
    pub name: Option<String>,
    /// New total amount
    pub amount: Option<Decimal>,
    /// New type
    pub transaction_type: Option<TransactionType>,
    /// New category
    pub category: Option<TransactionCategory>,
    /// New payment method
    pub payment_method: Option<PaymentMethod>,
    /// New first-installment date
    pub date: Option<NaiveDate>,
    /// New installment count
    pub installments: Option<i64>,
    /// Switch recurrence on or off
    pub is_recurring: Option<bool>,
}

impl TransactionEdit {
    /// Form input made of the stored transaction overlaid with these changes.
    #[must_use]
    pub fn apply_to(self, existing: &Transaction) -> NewTransaction {
        NewTransaction {
            name: self.name.unwrap_or_else(|| existing.name.clone()),
            amount: self.amount.unwrap_or(existing.amount),
            transaction_type: self.transaction_type.unwrap_or(existing.transaction_type),
            category: self.category.unwrap_or(existing.category),
            payment_method: self.payment_method.unwrap_or(existing.payment_method),
            date: self.date.unwrap_or(existing.date),
            installments: self
                .installments
                .unwrap_or_else(|| i64::from(existing.installments)),
            is_recurring: self.is_recurring.unwrap_or(existing.is_recurring),
        }
    }
}

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use super::TransactionEdit;
    use crate::{
        bot::{
            Context,
            commands::{parse_amount, parse_choice, parse_date, period_args, today},
            handlers::autocomplete,
        },
        core::{
            report,
            transaction::{self, DeleteOutcome},
        },
        errors::Result,
        models::{NewTransaction, Transaction},
    };

    /// Records a deposit, expense or investment.
    ///
    /// Installment purchases are split evenly over consecutive months starting at
    /// `date`. A recurring transaction repeats its full amount every month until
    /// it is deleted.
    #[allow(clippy::too_many_arguments)]
    #[poise::command(slash_command, prefix_command)]
    pub async fn add_transaction(
        ctx: Context<'_>,
        #[description = "What it was"] name: String,
        #[description = "Total amount, e.g. 49.90"] amount: String,
        #[description = "DEPOSIT, EXPENSE or INVESTMENT"]
        #[autocomplete = "autocomplete::autocomplete_transaction_type"]
        transaction_type: String,
        #[description = "Category"]
        #[autocomplete = "autocomplete::autocomplete_category"]
        category: String,
        #[description = "Payment method"]
        #[autocomplete = "autocomplete::autocomplete_payment_method"]
        payment_method: String,
        #[description = "Date as YYYY-MM-DD (defaults to today)"] date: Option<String>,
        #[description = "Number of installments, 1-42 (defaults to 1)"] installments: Option<i64>,
        #[description = "Repeat every month"] recurring: Option<bool>,
    ) -> Result<()> {
        let user_id = ctx.author().id.to_string();
        let input = NewTransaction {
            name,
            amount: parse_amount(&amount)?,
            transaction_type: parse_choice(&transaction_type)?,
            category: parse_choice(&category)?,
            payment_method: parse_choice(&payment_method)?,
            date: parse_date(date.as_deref(), today(ctx))?,
            installments: installments.unwrap_or(1),
            is_recurring: recurring.unwrap_or(false),
        };

        let saved =
            transaction::upsert_transaction(&ctx.data().database, &user_id, &input, None).await?;

        let symbol = &ctx.data().settings.display.currency_symbol;
        let summary = if saved.is_recurring {
            "every month".to_string()
        } else if saved.installments > 1 {
            format!("in {} installments", saved.installments)
        } else {
            "once".to_string()
        };
        ctx.say(format!(
            "✅ Saved `#{}` {} - {} {summary}",
            saved.id,
            input.name.trim(),
            report::format_transaction_amount(input.transaction_type, input.amount, symbol),
        ))
        .await?;
        Ok(())
    }

    /// Changes one of your transactions; omitted fields keep their value.
    #[allow(clippy::too_many_arguments)]
    #[poise::command(slash_command, prefix_command)]
    pub async fn edit_transaction(
        ctx: Context<'_>,
        #[description = "Transaction id, shown as #id in listings"] id: i64,
        #[description = "New name"] name: Option<String>,
        #[description = "New total amount"] amount: Option<String>,
        #[description = "New type"]
        #[autocomplete = "autocomplete::autocomplete_transaction_type"]
        transaction_type: Option<String>,
        #[description = "New category"]
        #[autocomplete = "autocomplete::autocomplete_category"]
        category: Option<String>,
        #[description = "New payment method"]
        #[autocomplete = "autocomplete::autocomplete_payment_method"]
        payment_method: Option<String>,
        #[description = "New date as YYYY-MM-DD"] date: Option<String>,
        #[description = "New number of installments"] installments: Option<i64>,
        #[description = "Repeat every month"] recurring: Option<bool>,
    ) -> Result<()> {
        let user_id = ctx.author().id.to_string();
        let db = &ctx.data().database;

        let edit = TransactionEdit {
            name,
            amount: amount.as_deref().map(parse_amount).transpose()?,
            transaction_type: transaction_type.as_deref().map(parse_choice).transpose()?,
            category: category.as_deref().map(parse_choice).transpose()?,
            payment_method: payment_method.as_deref().map(parse_choice).transpose()?,
            date: date
                .as_deref()
                .map(|raw| parse_date(Some(raw), today(ctx)))
                .transpose()?,
            installments,
            is_recurring: recurring,
        };

        let stored = transaction::get_user_transaction(db, &user_id, id).await?;
        let input = edit.apply_to(&Transaction::try_from(&stored)?);
        let saved = transaction::upsert_transaction(db, &user_id, &input, Some(id)).await?;

        ctx.say(format!("✅ Updated `#{}` {}", saved.id, saved.name))
            .await?;
        Ok(())
    }

    /// Deletes one of your transactions.
    ///
    /// A recurring transaction that started before the given month is ended
    /// instead, so earlier months keep showing it.
    #[poise::command(slash_command, prefix_command)]
    pub async fn delete_transaction(
        ctx: Context<'_>,
        #[description = "Transaction id, shown as #id in listings"] id: i64,
        #[description = "First month without it, as MM (defaults to the current month)"]
        month: Option<String>,
        #[description = "Year as YYYY (defaults to the current year)"] year: Option<String>,
    ) -> Result<()> {
        let user_id = ctx.author().id.to_string();
        let (month, year) = period_args(month, year, today(ctx));

        let outcome =
            transaction::delete_transaction(&ctx.data().database, &user_id, id, &month, &year)
                .await?;

        let message = match outcome {
            DeleteOutcome::Deleted => format!("🗑️ Deleted `#{id}`"),
            DeleteOutcome::Closed { end_date } => format!(
                "🛑 Ended recurring `#{id}`; last applies on {}",
                end_date.format("%Y-%m-%d")
            ),
        };
        ctx.say(message).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
