//! Read-only Discord commands: dashboard, history, recent activity and statement.
//!
//! Month and year default to the current month. The rendered text comes from
//! `core::report`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            Context,
            commands::{parse_choice, period_args, say_long, today},
            handlers::autocomplete,
        },
        core::{activity, dashboard, report, statement},
        errors::Result,
    };

    /// Shows balance, type split, expenses by category and recent activity for a month.
    #[poise::command(slash_command, prefix_command)]
    pub async fn dashboard(
        ctx: Context<'_>,
        #[description = "Month as MM (defaults to the current month)"] month: Option<String>,
        #[description = "Year as YYYY (defaults to the current year)"] year: Option<String>,
    ) -> Result<()> {
        let user_id = ctx.author().id.to_string();
        let settings = &ctx.data().settings;
        let today = today(ctx);
        let (month, year) = period_args(month, year, today);

        let result = dashboard::build_dashboard(
            &ctx.data().database,
            &user_id,
            &month,
            &year,
            today,
            &settings.activity_options(),
        )
        .await?;

        let text = report::format_dashboard(&result.snapshot, &settings.display.currency_symbol)?;
        say_long(ctx, &text).await
    }

    /// Shows income and expenses for the last 12 months.
    #[poise::command(slash_command, prefix_command)]
    pub async fn history(ctx: Context<'_>) -> Result<()> {
        let user_id = ctx.author().id.to_string();
        let series =
            dashboard::build_historical_series(&ctx.data().database, &user_id, today(ctx)).await?;

        let text = report::format_history(&series, &ctx.data().settings.display.currency_symbol)?;
        ctx.say(text).await?;
        Ok(())
    }

    /// Lists your most recently dated transactions.
    #[poise::command(slash_command, prefix_command)]
    pub async fn recent(
        ctx: Context<'_>,
        #[description = "Month as MM (defaults to the current month)"] month: Option<String>,
        #[description = "Year as YYYY (defaults to the current year)"] year: Option<String>,
    ) -> Result<()> {
        let user_id = ctx.author().id.to_string();
        let settings = &ctx.data().settings;
        let (month, year) = period_args(month, year, today(ctx));

        let rows = activity::build_recent_activity(
            &ctx.data().database,
            &user_id,
            &month,
            &year,
            &settings.activity_options(),
        )
        .await?;

        let text = report::format_activity(&rows, &settings.display.currency_symbol)?;
        say_long(ctx, &format!("**Recent activity**\n{text}")).await
    }

    /// Lists every transaction active in a month, with optional search and category filter.
    #[poise::command(slash_command, prefix_command)]
    pub async fn statement(
        ctx: Context<'_>,
        #[description = "Month as MM (defaults to the current month)"] month: Option<String>,
        #[description = "Year as YYYY (defaults to the current year)"] year: Option<String>,
        #[description = "Only names containing this text"] search: Option<String>,
        #[description = "Only this category"]
        #[autocomplete = "autocomplete::autocomplete_category"]
        category: Option<String>,
    ) -> Result<()> {
        let user_id = ctx.author().id.to_string();
        let settings = &ctx.data().settings;
        let (month, year) = period_args(month, year, today(ctx));
        let filter = statement::StatementFilter {
            search,
            category: category.as_deref().map(parse_choice).transpose()?,
        };

        let result = statement::build_statement(
            &ctx.data().database,
            &user_id,
            &month,
            &year,
            &filter,
            &settings.display.separator_label,
        )
        .await?;

        let text = report::format_statement(&result, &settings.display.currency_symbol)?;
        say_long(ctx, &text).await
    }
}

// Re-export all commands
pub use inner::*;
