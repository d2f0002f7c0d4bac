//! Week boundaries for `YYYY-Www` filter values.
//!
//! All week arithmetic lives here so that filtering, labels and cursor
//! rehydration agree on which days a week number covers.
//!
//! The rule: start from January 1st plus `(week - 1) * 7` days (the *anchor*
//! date). If the anchor falls on Sunday through Thursday, the week's Monday
//! is the Monday on or after the Sunday before it (`anchor - dow + 1`, with
//! `dow` counted from Sunday = 0); on Friday or Saturday it is the following
//! Monday (`anchor + 8 - dow`). For week numbers that exist in their year
//! this lands on the same Monday as ISO-8601; week 53 of a 52-week year
//! spills into week 1 of the next year.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, TimeDelta, TimeZone};

use crate::types::TimestampMs;

/// Inclusive instant bounds of a week in some time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekBounds {
    /// Monday 00:00:00.000 local time
    pub start: TimestampMs,
    /// Sunday 23:59:59.999 local time
    pub end: TimestampMs,
}

impl WeekBounds {
    /// Whether `ts` lies within the week, bounds included.
    #[must_use]
    pub fn contains(&self, ts: TimestampMs) -> bool {
        self.start <= ts && ts <= self.end
    }
}

/// January 1st of `year` plus `week - 1` whole weeks.
///
/// This is the uncorrected date the cursor rehydrates to; use [`week_days`]
/// for the actual Monday.
#[must_use]
pub fn week_anchor_date(year: i32, week: u32) -> Option<NaiveDate> {
    let offset = u64::from(week.checked_sub(1)?) * 7;
    NaiveDate::from_ymd_opt(year, 1, 1)?.checked_add_days(Days::new(offset))
}

/// Monday and Sunday of the given week.
#[must_use]
pub fn week_days(year: i32, week: u32) -> Option<(NaiveDate, NaiveDate)> {
    let anchor = week_anchor_date(year, week)?;
    let dow = i64::from(anchor.weekday().num_days_from_sunday());
    let shift = if dow <= 4 { 1 - dow } else { 8 - dow };
    let monday = anchor.checked_add_signed(TimeDelta::days(shift))?;
    let sunday = monday.checked_add_days(Days::new(6))?;
    Some((monday, sunday))
}

/// Instant bounds of the given week, with days taken in `tz`.
#[must_use]
pub fn week_bounds<Tz: TimeZone>(year: i32, week: u32, tz: &Tz) -> Option<WeekBounds> {
    let (monday, sunday) = week_days(year, week)?;
    let start = day_start(monday, tz)?;
    let end = end_of_day(tz, sunday.and_hms_milli_opt(23, 59, 59, 999)?)?;
    Some(WeekBounds { start, end })
}

/// The first instant of `date` in `tz`, normally local 00:00:00.000.
#[must_use]
pub fn day_start<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Option<TimestampMs> {
    start_of_day(tz, date.and_hms_opt(0, 0, 0)?)
}

// A local midnight can be skipped by a DST transition; the day then starts
// at the first instant after the gap.
fn start_of_day<Tz: TimeZone>(tz: &Tz, midnight: NaiveDateTime) -> Option<TimestampMs> {
    tz.from_local_datetime(&midnight)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(midnight + TimeDelta::hours(1))).earliest())
        .map(|dt| TimestampMs::from_datetime(&dt))
}

fn end_of_day<Tz: TimeZone>(tz: &Tz, last_milli: NaiveDateTime) -> Option<TimestampMs> {
    tz.from_local_datetime(&last_milli)
        .latest()
        .or_else(|| tz.from_local_datetime(&(last_milli - TimeDelta::hours(1))).latest())
        .map(|dt| TimestampMs::from_datetime(&dt))
}
