//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for the `FinanceBuddy` application,
//! including all slash commands, autocomplete handlers, and bot context management.
//! The Discord author id is the owner id for every stored transaction and budget.

/// Discord command implementations (dashboard, transaction, budget, general)
pub mod commands;
/// Discord interaction handlers (autocomplete, etc.)
pub mod handlers;

use crate::{
    config::settings::Settings,
    errors::{Error, ErrorKind, Result},
};
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use tracing::{error, info, warn};

/// Shared data available to all bot commands.
/// This structure holds the database connection and the loaded settings.
pub struct BotData {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
    /// Settings from config.toml
    pub settings: Settings,
}

impl BotData {
    /// Creates a new `BotData` instance with the given database connection and settings.
    #[must_use]
    pub const fn new(database: DatabaseConnection, settings: Settings) -> Self {
        Self { database, settings }
    }
}

/// Poise context used by every command.
pub type Context<'a> = poise::Context<'a, BotData, Error>;

/// Message shown to the user for a failed command.
#[must_use]
pub fn user_facing_message(error: &Error) -> String {
    match error.kind() {
        ErrorKind::Validation | ErrorKind::NotFound => format!("❌ {error}"),
        ErrorKind::Internal => {
            "❌ Something went wrong on our side. Please try again later.".to_string()
        }
    }
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            let command = ctx.command().name.clone();
            match error.kind() {
                ErrorKind::Internal => error!("Error in command `{command}`: {error:?}"),
                ErrorKind::Validation | ErrorKind::NotFound => {
                    warn!("Rejected `{command}`: {error}");
                }
            }
            if let Err(e) = ctx.say(user_facing_message(&error)).await {
                error!("Failed to send error message: {e}");
            }
        }
        other => {
            if let Err(e) = poise::builtins::on_error(other).await {
                error!("Error while handling error: {e}");
            }
        }
    }
}

/// Builds the poise framework and runs the Discord client until it stops.
///
/// # Arguments
/// * `token` - Discord bot token
/// * `database` - Open database connection with tables created
/// * `settings` - Loaded settings
pub async fn run_bot(
    token: String,
    database: DatabaseConnection,
    settings: Settings,
) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::dashboard(),
                commands::history(),
                commands::recent(),
                commands::statement(),
                commands::add_transaction(),
                commands::edit_transaction(),
                commands::delete_transaction(),
                commands::set_budget(),
                commands::budgets(),
                commands::ping(),
                commands::help(),
            ],
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(BotData::new(database, settings))
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged();

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await?;

    info!("Starting bot client...");
    client.start().await?;
    Ok(())
}

pub use commands::*;
pub use handlers::*;
