//! Period filtering for dated records.
//!
//! Every report and list view narrows its records to a user-selected period:
//! the whole history, a year, a month, an ISO week or a single day. The
//! period travels as a `(granularity, value)` pair whose string grammar
//! depends on the granularity:
//!
//! | granularity | value        |
//! |-------------|--------------|
//! | `all`       | empty        |
//! | `year`      | `YYYY`       |
//! | `month`     | `YYYY-MM`    |
//! | `week`      | `YYYY-Www`   |
//! | `day`       | `YYYY-MM-DD` |
//!
//! The pair is parsed once into a [`Period`] and every consumer works on
//! that. The string entry points ([`filter_by_period`], [`period_label`])
//! never fail: an empty value means "no filter" and a malformed one matches
//! nothing.

mod cursor;
mod filter;
mod label;
mod week;

pub use cursor::{advance_period, derive_reference_date, step_date, Direction, PeriodCursor};
pub use filter::{filter_by_period, filter_dated, filter_records, Dated, PeriodMatcher};
pub use label::{period_label, ALL_TIME_LABEL};
pub use week::{day_start, week_anchor_date, week_bounds, week_days, WeekBounds};

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The unit of time a period filter operates on.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// No date filter
    #[default]
    All,
    /// Calendar year
    Year,
    /// Calendar month
    Month,
    /// ISO week
    Week,
    /// Single day
    Day,
}

impl Granularity {
    /// Lowercase name, as used in values and config files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Year => "year",
            Self::Month => "month",
            Self::Week => "week",
            Self::Day => "day",
        }
    }

    /// Get all granularities, coarsest first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::All, Self::Year, Self::Month, Self::Week, Self::Day]
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|g| g.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::other(format!("unknown granularity '{s}'")))
    }
}

/// A concrete period, parsed from a `(granularity, value)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Period {
    /// The entire history
    #[default]
    All,
    /// A calendar year
    Year(i32),
    /// A calendar month (1-based)
    Month { year: i32, month: u32 },
    /// A numbered week of a year (1-based)
    Week { year: i32, week: u32 },
    /// A single calendar day
    Day(NaiveDate),
}

impl Period {
    /// Parse a filter value for the given granularity.
    ///
    /// An empty value yields [`Period::All`] whatever the granularity.
    pub fn parse(granularity: Granularity, value: &str) -> Result<Self> {
        if granularity == Granularity::All || value.is_empty() {
            return Ok(Self::All);
        }

        let parsed = match granularity {
            Granularity::All => Some(Self::All),
            Granularity::Year => parse_year(value).map(Self::Year),
            Granularity::Month => parse_month(value).map(|(year, month)| Self::Month { year, month }),
            Granularity::Week => parse_week(value).map(|(year, week)| Self::Week { year, week }),
            Granularity::Day => parse_day(value).map(Self::Day),
        };

        parsed.ok_or_else(|| Error::invalid_period(granularity, value))
    }

    /// The period of the given granularity that contains `date`.
    ///
    /// Weeks are numbered by the ISO-8601 rule, so a date early in January
    /// may belong to the last week of the previous year.
    #[must_use]
    pub fn containing(granularity: Granularity, date: NaiveDate) -> Self {
        match granularity {
            Granularity::All => Self::All,
            Granularity::Year => Self::Year(date.year()),
            Granularity::Month => Self::Month {
                year: date.year(),
                month: date.month(),
            },
            Granularity::Week => {
                let iso = date.iso_week();
                Self::Week {
                    year: iso.year(),
                    week: iso.week(),
                }
            }
            Granularity::Day => Self::Day(date),
        }
    }

    /// The granularity this period was expressed in.
    #[must_use]
    pub const fn granularity(&self) -> Granularity {
        match self {
            Self::All => Granularity::All,
            Self::Year(_) => Granularity::Year,
            Self::Month { .. } => Granularity::Month,
            Self::Week { .. } => Granularity::Week,
            Self::Day(_) => Granularity::Day,
        }
    }

    /// Whether this period applies no filtering.
    #[must_use]
    pub const fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// The canonical filter value string (empty for [`Period::All`]).
    #[must_use]
    pub fn value(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => Ok(()),
            Self::Year(year) => write!(f, "{year:04}"),
            Self::Month { year, month } => write!(f, "{year:04}-{month:02}"),
            Self::Week { year, week } => write!(f, "{year:04}-W{week:02}"),
            Self::Day(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

/// Parse a fixed-width run of ASCII digits.
fn digits(s: &str, width: usize) -> Option<u32> {
    if s.len() == width && s.bytes().all(|b| b.is_ascii_digit()) {
        s.parse().ok()
    } else {
        None
    }
}

fn parse_year(s: &str) -> Option<i32> {
    digits(s, 4).and_then(|y| i32::try_from(y).ok())
}

fn parse_month(s: &str) -> Option<(i32, u32)> {
    let (year, month) = s.split_once('-')?;
    let month = digits(month, 2).filter(|m| (1..=12).contains(m))?;
    Some((parse_year(year)?, month))
}

fn parse_week(s: &str) -> Option<(i32, u32)> {
    let (year, week) = s.split_once("-W")?;
    let week = digits(week, 2).filter(|w| (1..=53).contains(w))?;
    Some((parse_year(year)?, week))
}

fn parse_day(s: &str) -> Option<NaiveDate> {
    let mut parts = s.split('-');
    let year = parse_year(parts.next()?)?;
    let month = digits(parts.next()?, 2)?;
    let day = digits(parts.next()?, 2)?;
    if parts.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}
