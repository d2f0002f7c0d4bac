//! Navigation cursor for stepping through periods.
//!
//! The cursor pairs a granularity with a reference date. Stepping moves the
//! reference by one unit of the granularity and re-derives the filter value
//! from it; selecting a granularity re-centres on today.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Local, Months, NaiveDate};
use tracing::debug;

use super::week::week_anchor_date;
use super::{Granularity, Period};
use crate::error::{Error, Result};

/// Navigation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// One period back
    Prev,
    /// One period forward
    Next,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prev => write!(f, "prev"),
            Self::Next => write!(f, "next"),
        }
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "prev" | "previous" | "back" => Ok(Self::Prev),
            "next" | "forward" => Ok(Self::Next),
            _ => Err(Error::other(format!("unknown direction '{s}'"))),
        }
    }
}

/// Move `reference` one unit of `granularity` in `direction`.
///
/// Month and year steps clamp the day to the length of the target month, so
/// January 31st steps to the last day of February. `all` and any step that
/// would leave the four-digit years `0000..=9999` return `reference`
/// unchanged, so every stepped value parses back.
#[must_use]
pub fn step_date(reference: NaiveDate, granularity: Granularity, direction: Direction) -> NaiveDate {
    let stepped = match (granularity, direction) {
        (Granularity::All, _) => None,
        (Granularity::Day, Direction::Next) => reference.checked_add_days(Days::new(1)),
        (Granularity::Day, Direction::Prev) => reference.checked_sub_days(Days::new(1)),
        (Granularity::Week, Direction::Next) => reference.checked_add_days(Days::new(7)),
        (Granularity::Week, Direction::Prev) => reference.checked_sub_days(Days::new(7)),
        (Granularity::Month, Direction::Next) => reference.checked_add_months(Months::new(1)),
        (Granularity::Month, Direction::Prev) => reference.checked_sub_months(Months::new(1)),
        (Granularity::Year, Direction::Next) => reference.checked_add_months(Months::new(12)),
        (Granularity::Year, Direction::Prev) => reference.checked_sub_months(Months::new(12)),
    };
    stepped
        .filter(|date| (0..=9999).contains(&date.year()))
        .unwrap_or(reference)
}

/// Step `reference` and derive the filter value for the new date.
#[must_use]
pub fn advance_period(
    reference: NaiveDate,
    granularity: Granularity,
    direction: Direction,
) -> (NaiveDate, String) {
    let next = step_date(reference, granularity, direction);
    (next, Period::containing(granularity, next).value())
}

/// Reference date for a filter value coming from outside the cursor.
///
/// Days map to themselves, months to their first day and years to January
/// 1st. Weeks map to January 1st plus whole weeks, without moving to the
/// week's Monday.
pub fn derive_reference_date(granularity: Granularity, value: &str) -> Result<NaiveDate> {
    let invalid = || Error::invalid_period(granularity, value);
    match Period::parse(granularity, value)? {
        Period::All => Err(invalid()),
        Period::Year(year) => NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(invalid),
        Period::Month { year, month } => NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid),
        Period::Week { year, week } => week_anchor_date(year, week).ok_or_else(invalid),
        Period::Day(date) => Ok(date),
    }
}

/// In-memory navigation state for a period filter control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodCursor {
    granularity: Granularity,
    reference: NaiveDate,
}

impl PeriodCursor {
    /// A cursor on today's period.
    #[must_use]
    pub fn new(granularity: Granularity) -> Self {
        Self::starting_at(granularity, Local::now().date_naive())
    }

    /// A cursor on the period containing `reference`.
    #[must_use]
    pub const fn starting_at(granularity: Granularity, reference: NaiveDate) -> Self {
        Self {
            granularity,
            reference,
        }
    }

    /// A cursor synchronised with an externally held filter value.
    ///
    /// An empty value puts the cursor on `today`; a value that cannot be
    /// read leaves it there too.
    #[must_use]
    pub fn from_value(granularity: Granularity, value: &str, today: NaiveDate) -> Self {
        let mut cursor = Self::starting_at(granularity, today);
        if !value.is_empty() {
            cursor.rehydrate(value);
        }
        cursor
    }

    /// Current granularity.
    #[must_use]
    pub const fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Current reference date.
    #[must_use]
    pub const fn reference(&self) -> NaiveDate {
        self.reference
    }

    /// The period the cursor points at.
    #[must_use]
    pub fn period(&self) -> Period {
        Period::containing(self.granularity, self.reference)
    }

    /// The filter value for the current period.
    #[must_use]
    pub fn value(&self) -> String {
        self.period().value()
    }

    /// The display label for the current period.
    #[must_use]
    pub fn label(&self) -> String {
        self.period().label()
    }

    /// Switch granularity, re-centring on `today`. Returns the new value.
    pub fn select(&mut self, granularity: Granularity, today: NaiveDate) -> String {
        self.granularity = granularity;
        self.reference = today;
        self.value()
    }

    /// Keep the granularity and jump back to `today`. Returns the new value.
    pub fn reset_to(&mut self, today: NaiveDate) -> String {
        self.reference = today;
        self.value()
    }

    /// Move one period in `direction`. Returns the new value.
    pub fn step(&mut self, direction: Direction) -> String {
        let (reference, value) = advance_period(self.reference, self.granularity, direction);
        self.reference = reference;
        value
    }

    /// Synchronise the reference date with `value`.
    ///
    /// Returns whether the value was understood. On failure the previous
    /// reference date is kept.
    pub fn rehydrate(&mut self, value: &str) -> bool {
        match derive_reference_date(self.granularity, value) {
            Ok(reference) => {
                self.reference = reference;
                true
            }
            Err(e) => {
                debug!("keeping reference {}: {e}", self.reference);
                false
            }
        }
    }
}
