//! Expansion of a stored transaction into its dated monthly events.
//!
//! A non-recurring transaction with `n` installments yields exactly `n` events,
//! one per calendar month starting at its date, each worth `amount / n`. A
//! recurring transaction yields the full amount every month until its end date,
//! capped at [`RECURRING_HORIZON_MONTHS`] events when it is still open.

use crate::{
    core::period::{self, Period},
    models::Transaction,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// Most months an open recurring transaction is expanded over.
pub const RECURRING_HORIZON_MONTHS: u32 = 120;

/// One dated event of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Installment {
    /// 1-based position in the schedule
    pub number: u32,
    /// Date the event falls on
    pub date: NaiveDate,
    /// Value of the event
    pub amount: Decimal,
}

/// Where an installment sits in its schedule, e.g. 3 of 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InstallmentPosition {
    /// 1-based installment number
    pub current: u32,
    /// Declared installment count
    pub total: u32,
}

/// Iterator over the events of one transaction, in date order.
#[derive(Debug, Clone)]
pub struct Installments {
    anchor: NaiveDate,
    amount: Decimal,
    until: Option<NaiveDate>,
    limit: u32,
    next: u32,
}

impl Iterator for Installments {
    type Item = Installment;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.limit {
            return None;
        }
        let date = period::add_calendar_months(self.anchor, self.next)?;
        if self.until.is_some_and(|until| date > until) {
            self.next = self.limit;
            return None;
        }
        self.next += 1;
        Some(Installment {
            number: self.next,
            date,
            amount: self.amount,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.limit - self.next).ok();
        (0, remaining)
    }
}

/// Expands `transaction` into its monthly events.
///
/// Installment purchases ignore `end_date` and always yield their declared count.
/// Recurring transactions stop after `end_date` or after the horizon cap.
#[must_use]
pub fn expand(transaction: &Transaction) -> Installments {
    let (limit, until) = if transaction.is_recurring {
        (RECURRING_HORIZON_MONTHS, transaction.end_date)
    } else {
        (transaction.installments.max(1), None)
    };

    Installments {
        anchor: transaction.date,
        amount: transaction.installment_amount(),
        until,
        limit,
        next: 0,
    }
}

/// Events of `transaction` that fall inside `[start, end]`.
pub fn events_between(
    transaction: &Transaction,
    start: NaiveDate,
    end: NaiveDate,
) -> impl Iterator<Item = Installment> {
    expand(transaction)
        .skip_while(move |event| event.date < start)
        .take_while(move |event| event.date <= end)
}

/// Which installment of a multi-installment purchase falls inside `period`.
///
/// Returns `None` for recurring and single-payment transactions, and for
/// periods the schedule does not reach.
#[must_use]
pub fn position_in(transaction: &Transaction, period: Period) -> Option<InstallmentPosition> {
    if transaction.is_recurring || transaction.installments <= 1 {
        return None;
    }
    events_between(transaction, period.start(), period.end())
        .next()
        .map(|event| InstallmentPosition {
            current: event.number,
            total: transaction.installments,
        })
}
