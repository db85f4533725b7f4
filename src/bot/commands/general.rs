//! General Discord commands - ping and help.
//! These commands don't touch the database.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{bot::Context, errors::Result};

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: Context<'_>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: Context<'_>) -> Result<()> {
        let help_text = "**FinanceBuddy Help**\n\
        Month and year arguments are `MM` and `YYYY` and default to the current month.\n\n\
        **Overview**\n\
        • `/dashboard [month] [year]` - Balance, type split, categories and recent activity.\n\
        • `/history` - Income and expenses for the last 12 months.\n\
        • `/recent [month] [year]` - Your most recently dated transactions.\n\
        • `/statement [month] [year] [search] [category]` - Everything active in a month.\n\n\
        **Transactions**\n\
        • `/add_transaction <name> <amount> <type> <category> <payment_method> ...`\n\
        Optional: `date`, `installments` (1-42), `recurring`.\n\
        • `/edit_transaction <id> [fields...]` - Change only the fields you give.\n\
        • `/delete_transaction <id> [month] [year]` - Recurring ones end before that month.\n\n\
        **Budgets**\n\
        • `/set_budget <category> <amount> [month] [year]` - Limit for an expense category.\n\
        • `/budgets [month] [year]` - Spending against each limit.\n\n\
        **Utility**\n\
        • `/ping` - Checks if the bot is responsive.\n\
        • `/help` - Shows this help message.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
