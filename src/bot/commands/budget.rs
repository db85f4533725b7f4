//! Budget Discord commands - `set_budget` and `budgets`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            Context,
            commands::{parse_amount, parse_choice, period_args, say_long, today},
            handlers::autocomplete,
        },
        core::{budget, period::Period, report},
        entities::TransactionCategory,
        errors::Result,
    };

    /// Sets the spending limit for a category in a month.
    #[poise::command(slash_command, prefix_command)]
    pub async fn set_budget(
        ctx: Context<'_>,
        #[description = "Expense category"]
        #[autocomplete = "autocomplete::autocomplete_expense_category"]
        category: String,
        #[description = "Monthly limit, e.g. 800"] amount: String,
        #[description = "Month as MM (defaults to the current month)"] month: Option<String>,
        #[description = "Year as YYYY (defaults to the current year)"] year: Option<String>,
    ) -> Result<()> {
        let user_id = ctx.author().id.to_string();
        let category: TransactionCategory = parse_choice(&category)?;
        let amount = parse_amount(&amount)?;
        let (month, year) = period_args(month, year, today(ctx));

        budget::upsert_budget(&ctx.data().database, &user_id, category, amount, &month, &year)
            .await?;

        let period = Period::parse(&month, &year)?;
        ctx.say(format!(
            "✅ Budget for **{}** in {} set to {}",
            category.as_str(),
            period.label(),
            report::format_money(amount, &ctx.data().settings.display.currency_symbol)
        ))
        .await?;
        Ok(())
    }

    /// Shows spending against budget for every expense category in a month.
    #[poise::command(slash_command, prefix_command)]
    pub async fn budgets(
        ctx: Context<'_>,
        #[description = "Month as MM (defaults to the current month)"] month: Option<String>,
        #[description = "Year as YYYY (defaults to the current year)"] year: Option<String>,
    ) -> Result<()> {
        let user_id = ctx.author().id.to_string();
        let (month, year) = period_args(month, year, today(ctx));

        let lines =
            budget::build_budget_overview(&ctx.data().database, &user_id, &month, &year).await?;

        let period = Period::parse(&month, &year)?;
        let symbol = &ctx.data().settings.display.currency_symbol;
        let text = report::format_budget_lines(&lines, symbol)?;
        say_long(ctx, &format!("**Budgets for {}**\n{text}", period.label())).await
    }
}

// Re-export all commands
pub use inner::*;
