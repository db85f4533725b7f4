//! Calendar-month arithmetic and the small numeric helpers every aggregate uses.
//!
//! A [`Period`] is one calendar month. Its window is the closed interval from the
//! first day to the last day of that month. Month stepping keeps the day-of-month
//! where possible and clamps to the last day otherwise (Jan 31 + 1 month = Feb 29
//! in a leap year).

use crate::errors::{Error, Result};
use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use serde::Serialize;
use std::fmt;

/// One calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    /// Builds a period from numeric parts. Years are limited to four digits.
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) || !(1000..=9999).contains(&year) {
            return Err(Error::InvalidPeriod {
                month: month.to_string(),
                year: year.to_string(),
            });
        }
        Ok(Self { year, month })
    }

    /// Parses a `MM` month (`01`..`12`) and a `YYYY` year.
    pub fn parse(month: &str, year: &str) -> Result<Self> {
        let invalid = || Error::InvalidPeriod {
            month: month.to_string(),
            year: year.to_string(),
        };

        if month.len() != 2 || !month.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let month_number: u32 = month.parse().map_err(|_| invalid())?;
        let year_number: i32 = year.parse().map_err(|_| invalid())?;
        Self::new(year_number, month_number).map_err(|_| invalid())
    }

    /// The month a date falls in.
    #[must_use]
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Calendar year.
    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    /// Calendar month, 1-12.
    #[must_use]
    pub const fn month(self) -> u32 {
        self.month
    }

    /// First day of the month.
    #[must_use]
    pub fn start(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Last day of the month.
    #[must_use]
    pub fn end(self) -> NaiveDate {
        last_day_of_month(self.start())
    }

    /// Whether `date` falls inside this month.
    #[must_use]
    pub fn contains(self, date: NaiveDate) -> bool {
        Self::containing(date) == self
    }

    /// Steps forward (positive) or backward (negative) by whole months.
    #[must_use]
    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    pub const fn offset(self, months: i32) -> Self {
        let index = self.year * 12 + self.month as i32 - 1 + months;
        Self {
            year: index.div_euclid(12),
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    /// The `count` months ending with this one, oldest first.
    #[must_use]
    pub fn trailing(self, count: u32) -> Vec<Self> {
        let count = i32::try_from(count).unwrap_or(i32::MAX);
        (0..count).rev().map(|back| self.offset(-back)).collect()
    }

    /// Short label such as `Jan 2024`.
    #[must_use]
    pub fn label(self) -> String {
        self.start().format("%b %Y").to_string()
    }

    /// Month and year in the `MM` / `YYYY` string form used by the query API.
    #[must_use]
    pub fn as_args(self) -> (String, String) {
        (format!("{:02}", self.month), format!("{:04}", self.year))
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:04}", self.month, self.year)
    }
}

/// Closed date window `[first day, last day]` of the given month.
///
/// # Errors
/// Returns [`Error::InvalidPeriod`] when `month` is outside 1-12.
pub fn month_range(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate)> {
    let period = Period::new(year, month)?;
    Ok((period.start(), period.end()))
}

/// Last day of the month containing `date`.
#[must_use]
pub fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let first = date.with_day(1).unwrap_or(date);
    first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(date)
}

/// Adds whole calendar months, clamping the day to the target month's length.
#[must_use]
pub fn add_calendar_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(months))
}

/// Subtracts whole calendar months, clamping the day to the target month's length.
#[must_use]
pub fn sub_calendar_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.checked_sub_months(Months::new(months))
}

/// Splits `amount` into `parts` equal shares. A count of zero is treated as one.
#[must_use]
pub fn divide_amount(amount: Decimal, parts: u32) -> Decimal {
    amount / Decimal::from(parts.max(1))
}

/// `part / whole * 100`, rounded half-up to a whole number and clamped to 0-100.
/// Returns 0 when `whole` is not positive.
#[must_use]
pub fn percentage_of(part: Decimal, whole: Decimal) -> u8 {
    if whole <= Decimal::ZERO || part <= Decimal::ZERO {
        return 0;
    }
    (part * Decimal::ONE_HUNDRED / whole)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .min(Decimal::ONE_HUNDRED)
        .to_u8()
        .unwrap_or(0)
}
