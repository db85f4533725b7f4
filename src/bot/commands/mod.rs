//! Discord command implementations organized by category.
//!
//! Commands only parse their arguments, call `core` and send the rendered text.
//! The parsing helpers below are shared by all of them.

/// Budget commands
pub mod budget;

/// Dashboard, history, recent activity, and statement commands
pub mod dashboard;

/// General utility commands
pub mod general;

/// Transaction create, edit, and delete commands
pub mod transaction;

// Export commands
pub use budget::*;
pub use dashboard::*;
pub use general::*;
pub use transaction::*;

use crate::{
    bot::Context,
    core::period::Period,
    errors::{Error, Result},
};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Discord rejects messages longer than 2000 characters.
const MESSAGE_LIMIT: usize = 1900;

/// Calendar date of `now` at `offset`.
#[must_use]
pub fn today_at(now: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    now.with_timezone(&offset).date_naive()
}

/// Today's date at the configured UTC offset.
#[must_use]
pub fn today(ctx: Context<'_>) -> NaiveDate {
    today_at(Utc::now(), ctx.data().settings.utc_offset())
}

/// Month and year arguments, defaulting to the month of `today`.
#[must_use]
pub fn period_args(
    month: Option<String>,
    year: Option<String>,
    today: NaiveDate,
) -> (String, String) {
    let (current_month, current_year) = Period::containing(today).as_args();
    (
        month.unwrap_or(current_month),
        year.unwrap_or(current_year),
    )
}

/// Parses an amount such as `49.90` or `49,90`.
pub fn parse_amount(input: &str) -> Result<Decimal> {
    let normalized = input.trim().replace(',', ".");
    Decimal::from_str(&normalized)
        .map_err(|_| Error::validation(format!("'{input}' is not a valid amount")))
}

/// Parses a `YYYY-MM-DD` date, defaulting to `today`.
pub fn parse_date(input: Option<&str>, today: NaiveDate) -> Result<NaiveDate> {
    input.map_or(Ok(today), |raw| {
        NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map_err(|_| Error::validation(format!("'{raw}' is not a date (expected YYYY-MM-DD)")))
    })
}

/// Parses one of the enum names offered by autocomplete.
pub fn parse_choice<T>(input: &str) -> Result<T>
where
    T: FromStr<Err = String>,
{
    input.parse().map_err(Error::validation)
}

/// Splits `text` at line boundaries into chunks of at most `limit` bytes.
///
/// A single line longer than `limit` is cut at character boundaries.
#[must_use]
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(5);
    let mut chunks = Vec::new();
    let mut current = String::new();
    for line in text.lines() {
        if !current.is_empty() && current.len() + line.len() + 1 > limit {
            chunks.push(std::mem::take(&mut current));
        }
        let mut rest = line;
        while rest.len() + 1 > limit {
            let mut cut = limit - 1;
            while !rest.is_char_boundary(cut) {
                cut -= 1;
            }
            chunks.push(format!("{}\n", &rest[..cut]));
            rest = &rest[cut..];
        }
        current.push_str(rest);
        current.push('\n');
    }
    if !current.trim().is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Sends `text`, split over several messages when it is too long.
pub async fn say_long(ctx: Context<'_>, text: &str) -> Result<()> {
    for chunk in split_message(text, MESSAGE_LIMIT) {
        ctx.say(chunk).await?;
    }
    Ok(())
}
