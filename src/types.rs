//! Domain-specific newtypes for type safety.
//!
//! Timestamps travel as epoch milliseconds and amounts as plain numbers in
//! the stored JSON. Wrapping them keeps a timestamp from being summed like a
//! price and gives both a home for their conversions. `derive_more` removes
//! the arithmetic boilerplate.

use std::fmt;
use std::iter::Sum;
use std::ops::{AddAssign, Sub, SubAssign};

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use derive_more::{Add as DeriveAdd, From, Into};
use serde::{Deserialize, Serialize};

// ============================================================================
// Macros for reducing boilerplate
// ============================================================================

/// Generates common accessors for newtypes.
macro_rules! impl_newtype_common {
    ($type:ty, $inner:ty) => {
        impl $type {
            /// Create a new instance.
            #[must_use]
            pub const fn new(value: $inner) -> Self {
                Self(value)
            }

            /// Get the inner value.
            #[must_use]
            pub const fn get(self) -> $inner {
                self.0
            }

            /// Consume and return the inner value.
            #[must_use]
            pub const fn into_inner(self) -> $inner {
                self.0
            }
        }
    };
}

/// Generates Sub and assignment trait implementations.
macro_rules! impl_sub_traits {
    ($type:ty) => {
        impl Sub for $type {
            type Output = Self;

            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl SubAssign for $type {
            fn sub_assign(&mut self, rhs: Self) {
                self.0 -= rhs.0;
            }
        }

        impl AddAssign for $type {
            fn add_assign(&mut self, rhs: Self) {
                self.0 += rhs.0;
            }
        }
    };
}

// ============================================================================
// TimestampMs
// ============================================================================

/// A point in time as Unix-epoch milliseconds.
///
/// This is the representation every dated record carries (`createdAt`,
/// `date`, `timestamp`, ...).
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    DeriveAdd,
    From,
    Into,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct TimestampMs(pub i64);

impl_newtype_common!(TimestampMs, i64);
impl_sub_traits!(TimestampMs);

impl TimestampMs {
    /// Create from any zoned date-time.
    #[must_use]
    pub fn from_datetime<Tz: TimeZone>(dt: &DateTime<Tz>) -> Self {
        Self(dt.timestamp_millis())
    }

    /// Interpret this instant in the given time zone.
    ///
    /// Returns `None` when the value is outside chrono's representable range.
    #[must_use]
    pub fn to_datetime_in<Tz: TimeZone>(self, tz: &Tz) -> Option<DateTime<Tz>> {
        tz.timestamp_millis_opt(self.0).single()
    }

    /// Calendar date of this instant as seen in the given time zone.
    #[must_use]
    pub fn local_date<Tz: TimeZone>(self, tz: &Tz) -> Option<NaiveDate> {
        self.to_datetime_in(tz).map(|dt| dt.date_naive())
    }

    /// Shift by a number of milliseconds.
    #[must_use]
    pub const fn offset_by(self, millis: i64) -> Self {
        Self(self.0 + millis)
    }
}

impl fmt::Display for TimestampMs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime_in(&Utc) {
            Some(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.3fZ")),
            None => write!(f, "{}ms", self.0),
        }
    }
}

// ============================================================================
// Money
// ============================================================================

/// A monetary amount in the shop's currency.
///
/// Stored as a plain floating point number, matching the persisted data.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, DeriveAdd, From, Into, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(pub f64);

impl_newtype_common!(Money, f64);
impl_sub_traits!(Money);

impl Money {
    /// Zero amount.
    pub const ZERO: Self = Self(0.0);

    /// Check if the amount is zero.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0 == 0.0
    }

    /// Divide by a count, yielding zero for an empty set.
    #[must_use]
    pub fn per(self, count: usize) -> Self {
        if count == 0 {
            Self::ZERO
        } else {
            Self(self.0 / count as f64)
        }
    }

    /// This amount as a percentage of `total`, or 0 when `total` is not positive.
    #[must_use]
    pub fn percent_of(self, total: Self) -> f64 {
        if total.0 > 0.0 {
            self.0 / total.0 * 100.0
        } else {
            0.0
        }
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

// ============================================================================
// Tests
// ============================================================================
