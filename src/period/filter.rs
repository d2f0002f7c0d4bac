//! Period membership and list filtering.

use chrono::{Datelike, Local, NaiveDate, TimeZone};
use tracing::debug;

use super::week::{week_bounds, WeekBounds};
use super::{Granularity, Period};
use crate::types::TimestampMs;

/// A record carrying the timestamp it is filtered on.
pub trait Dated {
    /// The epoch-millisecond timestamp used for period filtering.
    fn timestamp(&self) -> TimestampMs;
}

impl<T: Dated + ?Sized> Dated for &T {
    fn timestamp(&self) -> TimestampMs {
        (**self).timestamp()
    }
}

#[derive(Debug, Clone, Copy)]
enum Test {
    Everything,
    Nothing,
    Year(i32),
    Month(i32, u32),
    Day(NaiveDate),
    Range(WeekBounds),
}

/// A period resolved against a time zone, ready to test timestamps.
///
/// Year, month and day periods compare the calendar date a timestamp has in
/// the local zone. Week periods compare the raw instant against the week's
/// local Monday-to-Sunday bounds.
#[derive(Debug, Clone)]
pub struct PeriodMatcher<Tz: TimeZone> {
    tz: Tz,
    test: Test,
}

impl<Tz: TimeZone> PeriodMatcher<Tz> {
    /// Resolve `period` in `tz`.
    #[must_use]
    pub fn new(period: &Period, tz: &Tz) -> Self {
        let test = match *period {
            Period::All => Test::Everything,
            Period::Year(year) => Test::Year(year),
            Period::Month { year, month } => Test::Month(year, month),
            Period::Day(date) => Test::Day(date),
            Period::Week { year, week } => {
                week_bounds(year, week, tz).map_or(Test::Nothing, Test::Range)
            }
        };
        Self {
            tz: tz.clone(),
            test,
        }
    }

    /// Whether `ts` falls inside the period.
    #[must_use]
    pub fn matches(&self, ts: TimestampMs) -> bool {
        let local = || ts.local_date(&self.tz);
        match self.test {
            Test::Everything => true,
            Test::Nothing => false,
            Test::Year(year) => local().is_some_and(|d| d.year() == year),
            Test::Month(year, month) => {
                local().is_some_and(|d| d.year() == year && d.month() == month)
            }
            Test::Day(date) => local() == Some(date),
            Test::Range(bounds) => bounds.contains(ts),
        }
    }

    /// Whether this matcher lets every record through.
    #[must_use]
    pub const fn is_everything(&self) -> bool {
        matches!(self.test, Test::Everything)
    }
}

impl Period {
    /// Resolve this period against a time zone.
    #[must_use]
    pub fn matcher<Tz: TimeZone>(&self, tz: &Tz) -> PeriodMatcher<Tz> {
        PeriodMatcher::new(self, tz)
    }

    /// Whether `ts` falls inside this period in the local time zone.
    #[must_use]
    pub fn contains(&self, ts: TimestampMs) -> bool {
        self.matcher(&Local).matches(ts)
    }
}

/// Keep the records whose timestamp falls inside `period`, in order.
#[must_use]
pub fn filter_records<'a, T, F, Tz>(
    records: &'a [T],
    timestamp: F,
    period: &Period,
    tz: &Tz,
) -> Vec<&'a T>
where
    F: Fn(&T) -> TimestampMs,
    Tz: TimeZone,
{
    let matcher = period.matcher(tz);
    if matcher.is_everything() {
        return records.iter().collect();
    }
    records
        .iter()
        .filter(|record| matcher.matches(timestamp(*record)))
        .collect()
}

/// Filter records by a raw `(granularity, value)` pair.
///
/// `all` or an empty value returns every record. A value that does not
/// parse for the granularity matches no record.
#[must_use]
pub fn filter_by_period<'a, T, F, Tz>(
    records: &'a [T],
    timestamp: F,
    granularity: Granularity,
    value: &str,
    tz: &Tz,
) -> Vec<&'a T>
where
    F: Fn(&T) -> TimestampMs,
    Tz: TimeZone,
{
    match Period::parse(granularity, value) {
        Ok(period) => filter_records(records, timestamp, &period, tz),
        Err(e) => {
            debug!("{e}; filtering out all {} records", records.len());
            Vec::new()
        }
    }
}

/// Filter [`Dated`] records in the local time zone.
#[must_use]
pub fn filter_dated<'a, T: Dated>(
    records: &'a [T],
    granularity: Granularity,
    value: &str,
) -> Vec<&'a T> {
    filter_by_period(records, T::timestamp, granularity, value, &Local)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[derive(Debug, Clone, PartialEq)]
    struct Entry {
        name: &'static str,
        created_at: TimestampMs,
    }

    impl Dated for Entry {
        fn timestamp(&self) -> TimestampMs {
            self.created_at
        }
    }

    fn brt() -> FixedOffset {
        FixedOffset::west_opt(3 * 3600).unwrap()
    }

    fn at(tz: &FixedOffset, y: i32, m: u32, d: u32, h: u32) -> TimestampMs {
        TimestampMs::from_datetime(&tz.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap())
    }

    fn entry(name: &'static str, created_at: TimestampMs) -> Entry {
        Entry { name, created_at }
    }

    fn names(list: &[&Entry]) -> Vec<&'static str> {
        list.iter().map(|e| e.name).collect()
    }

    fn run(records: &[Entry], g: Granularity, v: &str) -> Vec<&'static str> {
        names(&filter_by_period(records, |e| e.created_at, g, v, &brt()))
    }

    #[test]
    fn test_all_is_identity() {
        let tz = brt();
        let records = vec![
            entry("c", at(&tz, 2024, 5, 1, 9)),
            entry("a", at(&tz, 1999, 1, 1, 0)),
            entry("b", at(&tz, 2030, 12, 31, 23)),
        ];
        for v in ["", "2024", "garbage"] {
            assert_eq!(run(&records, Granularity::All, v), vec!["c", "a", "b"]);
        }
    }

    #[test]
    fn test_empty_value_is_identity_for_any_granularity() {
        let tz = brt();
        let records = vec![entry("a", at(&tz, 2024, 1, 5, 10)), entry("b", at(&tz, 2020, 6, 1, 10))];
        for &g in Granularity::all() {
            assert_eq!(run(&records, g, ""), vec!["a", "b"]);
        }
    }

    #[test]
    fn test_month_keeps_order_and_excludes_next_month() {
        let tz = brt();
        let records = vec![
            entry("jan5", at(&tz, 2024, 1, 5, 12)),
            entry("jan31", at(&tz, 2024, 1, 31, 22)),
            entry("feb1", at(&tz, 2024, 2, 1, 8)),
        ];
        assert_eq!(run(&records, Granularity::Month, "2024-01"), vec!["jan5", "jan31"]);
    }

    #[test]
    fn test_local_date_not_utc_date_decides_day() {
        let tz = brt();
        // 22:00 local on the 31st is already February 1st in UTC
        let records = vec![entry("late", at(&tz, 2024, 1, 31, 22))];
        assert_eq!(run(&records, Granularity::Day, "2024-01-31"), vec!["late"]);
        assert!(run(&records, Granularity::Day, "2024-02-01").is_empty());
        assert_eq!(run(&records, Granularity::Month, "2024-01"), vec!["late"]);
    }

    #[test]
    fn test_day_then_next_day() {
        let tz = brt();
        let records = vec![entry("x", at(&tz, 2024, 2, 28, 0))];
        assert_eq!(run(&records, Granularity::Day, "2024-02-28"), vec!["x"]);
        assert!(run(&records, Granularity::Day, "2024-02-29").is_empty());
    }

    #[test]
    fn test_month_and_year_are_supersets() {
        let tz = brt();
        let records = vec![entry("mid_march", at(&tz, 2024, 3, 15, 12))];
        assert_eq!(run(&records, Granularity::Day, "2024-03-15"), vec!["mid_march"]);
        assert_eq!(run(&records, Granularity::Month, "2024-03"), vec!["mid_march"]);
        assert!(run(&records, Granularity::Month, "2024-04").is_empty());
        assert_eq!(run(&records, Granularity::Year, "2024"), vec!["mid_march"]);
        assert!(run(&records, Granularity::Year, "2023").is_empty());
    }

    #[test]
    fn test_year_covers_every_month() {
        let tz = brt();
        let records: Vec<Entry> = (1..=12)
            .map(|m| entry("m", at(&tz, 2023, m, 1, 0)))
            .collect();
        assert_eq!(run(&records, Granularity::Year, "2023").len(), 12);
        for m in 1..=12 {
            assert_eq!(run(&records, Granularity::Month, &format!("2023-{m:02}")).len(), 1);
        }
    }

    #[test]
    fn test_week_boundaries_are_inclusive() {
        let tz = brt();
        let bounds = week_bounds(2024, 10, &tz).unwrap();
        let records = vec![
            entry("before", bounds.start.offset_by(-1)),
            entry("start", bounds.start),
            entry("end", bounds.end),
            entry("after", bounds.end.offset_by(1)),
        ];
        assert_eq!(run(&records, Granularity::Week, "2024-W10"), vec!["start", "end"]);
    }

    #[test]
    fn test_week_spans_year_boundary() {
        let tz = brt();
        let records = vec![
            entry("dec29", at(&tz, 2025, 12, 29, 9)),
            entry("jan4", at(&tz, 2026, 1, 4, 23)),
            entry("jan5", at(&tz, 2026, 1, 5, 0)),
        ];
        assert_eq!(run(&records, Granularity::Week, "2026-W01"), vec!["dec29", "jan4"]);
    }

    #[test]
    fn test_malformed_value_matches_nothing() {
        let tz = brt();
        let records = vec![entry("a", at(&tz, 2024, 1, 5, 10))];
        assert!(run(&records, Granularity::Year, "20").is_empty());
        assert!(run(&records, Granularity::Month, "2024-1").is_empty());
        assert!(run(&records, Granularity::Week, "2024-Wxx").is_empty());
        assert!(run(&records, Granularity::Day, "yesterday").is_empty());
    }

    #[test]
    fn test_dated_trait_and_matcher() {
        let tz = brt();
        let record = entry("a", at(&tz, 2024, 7, 4, 12));
        let period = Period::Month { year: 2024, month: 7 };
        assert!(period.matcher(&tz).matches(record.timestamp()));
        assert!(!Period::Month { year: 2024, month: 8 }.matcher(&tz).matches((&record).timestamp()));
        assert!(Period::All.contains(record.timestamp()));
    }

    fn local_noon(y: i32, m: u32, d: u32) -> TimestampMs {
        TimestampMs::from_datetime(&Local.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap())
    }

    #[test]
    fn test_filter_dated_uses_local_zone() {
        let records = vec![
            entry("mar15", local_noon(2024, 3, 15)),
            entry("mar16", local_noon(2024, 3, 16)),
            entry("apr1", local_noon(2024, 4, 1)),
        ];
        assert_eq!(names(&filter_dated(&records, Granularity::Day, "2024-03-15")), vec!["mar15"]);
        assert_eq!(
            names(&filter_dated(&records, Granularity::Month, "2024-03")),
            vec!["mar15", "mar16"]
        );
        assert_eq!(
            names(&filter_dated(&records, Granularity::Week, "2024-W11")),
            vec!["mar15", "mar16"]
        );
        assert_eq!(names(&filter_dated(&records, Granularity::Week, "2024-W14")), vec!["apr1"]);
        assert_eq!(names(&filter_dated(&records, Granularity::All, "")).len(), 3);
        assert!(filter_dated(&records, Granularity::Month, "2024-3").is_empty());
    }

    #[test]
    fn test_contains_in_local_zone() {
        let ts = local_noon(2024, 3, 15);
        assert!(Period::Day(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()).contains(ts));
        assert!(!Period::Day(NaiveDate::from_ymd_opt(2024, 3, 16).unwrap()).contains(ts));
        assert!(Period::Month { year: 2024, month: 3 }.contains(ts));
        assert!(Period::Year(2024).contains(ts));
        assert!(!Period::Year(2023).contains(ts));
        assert!(Period::Week { year: 2024, week: 11 }.contains(ts));
        assert!(!Period::Week { year: 2024, week: 12 }.contains(ts));
    }
}
