//! Text rendering of dashboards, statements and budgets.
//!
//! All functions take structured data from the other `core` modules and return
//! plain strings, so the chat layer only has to send them.

use crate::{
    core::{
        activity::{ActivityRow, TransactionRow},
        budget::BudgetLine,
        dashboard::{DashboardSnapshot, MonthlyFlow},
        statement::MonthStatement,
    },
    entities::TransactionType,
    errors::Result,
};
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt::Write;

/// Formats an amount with two decimals, e.g. `$1234.50` or `-$20.00`.
#[must_use]
pub fn format_money(amount: Decimal, currency_symbol: &str) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-{currency_symbol}{:.2}", rounded.abs())
    } else {
        format!("{currency_symbol}{:.2}", rounded.abs())
    }
}

/// Formats an amount with the sign implied by its type: deposits `+`, the rest `-`.
#[must_use]
pub fn format_transaction_amount(
    transaction_type: TransactionType,
    amount: Decimal,
    currency_symbol: &str,
) -> String {
    let sign = match transaction_type {
        TransactionType::Deposit => '+',
        TransactionType::Expense | TransactionType::Investment => '-',
    };
    format!("{sign}{}", format_money(amount.abs(), currency_symbol))
}

/// Generates a progress bar like `[████████░░] 80%`.
///
/// # Arguments
/// * `percent` - Value to draw, 0-100
/// * `bar_length` - Length of the bar in characters (default 10)
#[must_use]
pub fn format_progress_bar(percent: u8, bar_length: Option<usize>) -> String {
    let length = bar_length.unwrap_or(10);
    let clamped = usize::from(percent.min(100));
    let filled = (clamped * length + 50) / 100;
    let empty = length.saturating_sub(filled);

    format!("[{}{}] {percent}%", "█".repeat(filled), "░".repeat(empty))
}

/// One line for a transaction in a list.
#[must_use]
pub fn format_transaction_row(row: &TransactionRow, currency_symbol: &str) -> String {
    let suffix = match row.installment {
        Some(position) => format!(" ({}/{})", position.current, position.total),
        None if row.is_recurring => " (monthly)".to_string(),
        None => String::new(),
    };
    format!(
        "`#{}` {} | {} | {} | {}{suffix}",
        row.id,
        row.date.format("%Y-%m-%d"),
        row.name,
        row.category.as_str(),
        format_transaction_amount(row.transaction_type, row.installment_amount, currency_symbol),
    )
}

/// Renders a list of activity rows, one per line.
pub fn format_activity(rows: &[ActivityRow], currency_symbol: &str) -> Result<String> {
    let mut out = String::new();
    if rows.is_empty() {
        writeln!(out, "_No transactions yet._")?;
        return Ok(out);
    }
    for row in rows {
        match row {
            ActivityRow::Transaction(row) => {
                writeln!(out, "{}", format_transaction_row(row, currency_symbol))?;
            }
            ActivityRow::Separator { label } => writeln!(out, "── {label} ──")?,
        }
    }
    Ok(out)
}

/// Renders the monthly dashboard.
pub fn format_dashboard(snapshot: &DashboardSnapshot, currency_symbol: &str) -> Result<String> {
    let money = |amount| format_money(amount, currency_symbol);
    let mut out = String::new();

    writeln!(out, "**Dashboard for {}**", snapshot.period.label())?;
    writeln!(out, "Balance: **{}**", money(snapshot.balance))?;
    writeln!(
        out,
        "Deposits: {} ({}%)",
        money(snapshot.deposits_total),
        snapshot.types_percentage.deposit
    )?;
    writeln!(
        out,
        "Expenses: {} ({}%)",
        money(snapshot.expenses_total),
        snapshot.types_percentage.expense
    )?;
    writeln!(
        out,
        "Investments: {} ({}%)",
        money(snapshot.investments_total),
        snapshot.types_percentage.investment
    )?;

    if !snapshot.total_expense_per_category.is_empty() {
        writeln!(out, "\n**Expenses by category**")?;
        for share in &snapshot.total_expense_per_category {
            writeln!(
                out,
                "{:<15} {} {}",
                share.category.as_str(),
                format_progress_bar(share.percentage_of_total, None),
                money(share.total_amount)
            )?;
        }
    }

    writeln!(out, "\n**Recent activity**")?;
    out.push_str(&format_activity(&snapshot.recent_activity, currency_symbol)?);
    Ok(out)
}

/// Renders the income/expense history as a small table.
pub fn format_history(history: &[MonthlyFlow], currency_symbol: &str) -> Result<String> {
    let mut out = String::from("```\n");
    writeln!(out, "{:<9} {:>14} {:>14}", "Month", "Income", "Expenses")?;
    for month in history {
        writeln!(
            out,
            "{:<9} {:>14} {:>14}",
            month.month_label,
            format_money(month.income, currency_symbol),
            format_money(month.expenses, currency_symbol)
        )?;
    }
    out.push_str("```");
    Ok(out)
}

/// Renders a monthly statement.
pub fn format_statement(statement: &MonthStatement, currency_symbol: &str) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "**Statement for {}**", statement.period.label())?;
    writeln!(
        out,
        "Income: {} | Expenses: {}",
        format_money(statement.total_income, currency_symbol),
        format_money(statement.total_expenses, currency_symbol)
    )?;
    out.push_str(&format_activity(&statement.rows, currency_symbol)?);
    Ok(out)
}

/// Renders the budget overview, skipping categories with neither budget nor spending.
pub fn format_budget_lines(lines: &[BudgetLine], currency_symbol: &str) -> Result<String> {
    let mut out = String::new();
    let mut shown = 0;
    for line in lines
        .iter()
        .filter(|line| !line.budget_amount.is_zero() || !line.spent_amount.is_zero())
    {
        let marker = if line.is_over_budget() { " ⚠️" } else { "" };
        writeln!(
            out,
            "**{}**: {} of {} {}{marker}",
            line.category.as_str(),
            format_money(line.spent_amount, currency_symbol),
            format_money(line.budget_amount, currency_symbol),
            format_progress_bar(line.usage_percentage, None)
        )?;
        writeln!(
            out,
            "  Remaining: {}",
            format_money(line.remaining_amount, currency_symbol)
        )?;
        shown += 1;
    }
    if shown == 0 {
        writeln!(out, "_No budgets or expenses for this month._")?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{
        core::{dashboard, period::Period},
        entities::TransactionCategory,
        models::Transaction,
        test_utils::*,
    };

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(dec("1234.5"), "$"), "$1234.50");
        assert_eq!(format_money(dec("-20"), "$"), "-$20.00");
        assert_eq!(format_money(dec("33.335"), "R$"), "R$33.34");
        assert_eq!(format_money(dec("-0.001"), "$"), "$0.00");
    }

    #[test]
    fn test_format_transaction_amount_sign_follows_type() {
        assert_eq!(
            format_transaction_amount(TransactionType::Deposit, dec("50"), "$"),
            "+$50.00"
        );
        assert_eq!(
            format_transaction_amount(TransactionType::Expense, dec("25.5"), "$"),
            "-$25.50"
        );
        assert_eq!(
            format_transaction_amount(TransactionType::Investment, dec("10"), "$"),
            "-$10.00"
        );
    }

    #[test]
    fn test_format_progress_bar() {
        assert_eq!(format_progress_bar(100, Some(10)), "[██████████] 100%");
        assert_eq!(format_progress_bar(50, Some(10)), "[█████░░░░░] 50%");
        assert_eq!(format_progress_bar(0, Some(10)), "[░░░░░░░░░░] 0%");
        assert_eq!(format_progress_bar(14, Some(4)), "[█░░░] 14%");
    }

    #[test]
    fn test_single_payment_row_has_no_suffix() {
        let march = Period::new(2024, 3).unwrap();
        let row = TransactionRow::new(&deposit(5, "1000", date(2024, 3, 1)), march);
        assert_eq!(
            format_transaction_row(&row, "$"),
            "`#5` 2024-03-01 | Deposit 5 | SALARY | +$1000.00"
        );
    }

    #[test]
    fn test_format_activity_marks_installments_and_separator() {
        let march = Period::new(2024, 3).unwrap();
        let rows = crate::core::activity::insert_separator(
            &[
                recurring(2, "1500", date(2024, 3, 1), None),
                Transaction {
                    name: "Tv".to_string(),
                    ..expense(1, "1200", date(2024, 1, 20), 4)
                },
            ],
            march,
            "Earlier",
        );
        let text = format_activity(&rows, "$").unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("-$1500.00 (monthly)"));
        assert_eq!(lines[1], "── Earlier ──");
        assert!(lines[2].contains("| Tv |"));
        assert!(lines[2].ends_with("-$300.00 (3/4)"));

        assert_eq!(format_activity(&[], "$").unwrap(), "_No transactions yet._\n");
    }

    #[test]
    fn test_format_dashboard_contains_totals() {
        let march = Period::new(2024, 3).unwrap();
        let candidates = vec![
            deposit(1, "1000", date(2024, 3, 1)),
            expense(2, "250", date(2024, 3, 2), 1),
        ];
        let snapshot = dashboard::build_snapshot(&candidates, &[], march, "Earlier");
        let text = format_dashboard(&snapshot, "$").unwrap();
        assert!(text.starts_with("**Dashboard for Mar 2024**"));
        assert!(text.contains("Balance: **$750.00**"));
        assert!(text.contains("Expenses: $250.00 (20%)"));
        assert!(text.contains("FOOD"));
    }

    #[test]
    fn test_format_history_has_one_line_per_month() {
        let history = dashboard::build_history(&[], date(2024, 3, 1));
        let text = format_history(&history, "$").unwrap();
        // header, 12 months, opening and closing fences
        assert_eq!(text.lines().count(), 15);
        assert!(text.contains("Mar 2024"));
    }

    #[test]
    fn test_format_budget_lines_skips_empty_categories() {
        let lines = vec![
            BudgetLine {
                category: TransactionCategory::Food,
                budget_amount: dec("100"),
                spent_amount: dec("150"),
                remaining_amount: dec("-50"),
                usage_percentage: 100,
            },
            BudgetLine {
                category: TransactionCategory::Health,
                budget_amount: Decimal::ZERO,
                spent_amount: Decimal::ZERO,
                remaining_amount: Decimal::ZERO,
                usage_percentage: 0,
            },
        ];
        let text = format_budget_lines(&lines, "$").unwrap();
        assert!(text.contains("**FOOD**: $150.00 of $100.00"));
        assert!(text.contains("⚠️"));
        assert!(text.contains("Remaining: -$50.00"));
        assert!(!text.contains("HEALTH"));

        let text = format_budget_lines(&lines[1..], "$").unwrap();
        assert!(text.contains("No budgets"));
    }
}
