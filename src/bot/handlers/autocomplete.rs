//! Autocomplete handlers for Discord slash command parameters.
//!
//! The choices are the fixed enum names, so no database lookup is needed.

use crate::{
    bot::Context,
    entities::{PaymentMethod, TransactionCategory, TransactionType},
};

/// Discord shows at most 25 autocomplete choices.
const MAX_CHOICES: usize = 25;

/// Names containing `partial`, case-insensitively, in their given order.
#[must_use]
pub fn matching_names<I>(names: I, partial: &str) -> Vec<String>
where
    I: IntoIterator<Item = &'static str>,
{
    let partial = partial.trim().to_uppercase().replace([' ', '-'], "_");
    names
        .into_iter()
        .filter(|name| name.contains(&partial))
        .take(MAX_CHOICES)
        .map(str::to_string)
        .collect()
}

/// Suggests `DEPOSIT`, `EXPENSE` or `INVESTMENT`.
pub async fn autocomplete_transaction_type(_ctx: Context<'_>, partial: &str) -> Vec<String> {
    matching_names(TransactionType::ALL.map(TransactionType::as_str), partial)
}

/// Suggests any category, investment ones included.
pub async fn autocomplete_category(_ctx: Context<'_>, partial: &str) -> Vec<String> {
    matching_names(
        TransactionCategory::EVERYDAY
            .into_iter()
            .chain(TransactionCategory::INVESTMENT)
            .map(TransactionCategory::as_str),
        partial,
    )
}

/// Suggests the categories a budget can be set for.
pub async fn autocomplete_expense_category(_ctx: Context<'_>, partial: &str) -> Vec<String> {
    matching_names(
        TransactionCategory::EVERYDAY.map(TransactionCategory::as_str),
        partial,
    )
}

/// Suggests payment methods.
pub async fn autocomplete_payment_method(_ctx: Context<'_>, partial: &str) -> Vec<String> {
    matching_names(PaymentMethod::ALL.map(PaymentMethod::as_str), partial)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_names_is_case_insensitive() {
        let names = matching_names(PaymentMethod::ALL.map(PaymentMethod::as_str), "card");
        assert_eq!(names, ["CREDIT_CARD", "DEBIT_CARD"]);

        let names = matching_names(PaymentMethod::ALL.map(PaymentMethod::as_str), "credit c");
        assert_eq!(names, ["CREDIT_CARD"]);
    }

    #[test]
    fn test_empty_partial_lists_everything() {
        let names = matching_names(TransactionType::ALL.map(TransactionType::as_str), "");
        assert_eq!(names, ["DEPOSIT", "EXPENSE", "INVESTMENT"]);
    }
}
