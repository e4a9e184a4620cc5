//! Month / weekday filtering of a [`Dataset`].
//!
//! Each axis is either a concrete value or `All`. Axes combine with AND and
//! filtering never reorders or duplicates records.

use std::fmt;
use std::str::FromStr;

use chrono::Weekday;
use serde::Serialize;
use tracing::debug;

use crate::error::{StatsError, StatsResult};
use crate::model::{Dataset, month_name, weekday_name};

/// Months that can be selected by name. Source data only covers the first
/// half of the year.
pub const SELECTABLE_MONTHS: u32 = 6;

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonthFilter {
    #[default]
    All,
    /// 1-based calendar month.
    Month(u32),
}

impl MonthFilter {
    pub fn matches(&self, month: u32) -> bool {
        match self {
            MonthFilter::All => true,
            MonthFilter::Month(m) => *m == month,
        }
    }
}

impl FromStr for MonthFilter {
    type Err = StatsError;

    /// Accepts `all` or a full month name from January through June,
    /// ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> StatsResult<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(MonthFilter::All);
        }
        (1..=SELECTABLE_MONTHS)
            .find(|m| month_name(*m).eq_ignore_ascii_case(s))
            .map(MonthFilter::Month)
            .ok_or_else(|| StatsError::invalid("month", s))
    }
}

impl fmt::Display for MonthFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthFilter::All => f.write_str("all"),
            MonthFilter::Month(m) => f.write_str(month_name(*m)),
        }
    }
}

impl Serialize for MonthFilter {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeekdayFilter {
    #[default]
    All,
    Day(Weekday),
}

impl WeekdayFilter {
    pub fn matches(&self, day: Weekday) -> bool {
        match self {
            WeekdayFilter::All => true,
            WeekdayFilter::Day(d) => *d == day,
        }
    }
}

impl FromStr for WeekdayFilter {
    type Err = StatsError;

    /// Accepts `all` or a full weekday name, ignoring case.
    fn from_str(s: &str) -> StatsResult<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(WeekdayFilter::All);
        }
        WEEKDAYS
            .into_iter()
            .find(|d| weekday_name(*d).eq_ignore_ascii_case(s))
            .map(WeekdayFilter::Day)
            .ok_or_else(|| StatsError::invalid("weekday", s))
    }
}

impl fmt::Display for WeekdayFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeekdayFilter::All => f.write_str("all"),
            WeekdayFilter::Day(d) => f.write_str(weekday_name(*d)),
        }
    }
}

impl Serialize for WeekdayFilter {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Which axes the user wants to filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    Month,
    Weekday,
    Both,
    None,
}

impl FilterMode {
    pub fn wants_month(&self) -> bool {
        matches!(self, FilterMode::Month | FilterMode::Both)
    }

    pub fn wants_weekday(&self) -> bool {
        matches!(self, FilterMode::Weekday | FilterMode::Both)
    }
}

impl FromStr for FilterMode {
    type Err = StatsError;

    fn from_str(s: &str) -> StatsResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "m" | "month" => Ok(FilterMode::Month),
            "d" | "day" => Ok(FilterMode::Weekday),
            "b" | "both" => Ok(FilterMode::Both),
            "n" | "none" => Ok(FilterMode::None),
            _ => Err(StatsError::invalid("filter mode", s.trim())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FilterSpec {
    pub month: MonthFilter,
    pub weekday: WeekdayFilter,
}

impl FilterSpec {
    pub fn new(month: MonthFilter, weekday: WeekdayFilter) -> Self {
        FilterSpec { month, weekday }
    }

    /// Builds a selection from a filter mode, forcing axes the mode does not
    /// select back to `All`.
    pub fn from_mode(mode: FilterMode, month: MonthFilter, weekday: WeekdayFilter) -> Self {
        FilterSpec {
            month: if mode.wants_month() { month } else { MonthFilter::All },
            weekday: if mode.wants_weekday() {
                weekday
            } else {
                WeekdayFilter::All
            },
        }
    }
}

/// Keeps the records matching every non-`All` axis of `spec`, in source order.
pub fn filter(dataset: &Dataset, spec: &FilterSpec) -> Dataset {
    let records: Vec<_> = dataset
        .iter()
        .filter(|r| spec.month.matches(r.month()) && spec.weekday.matches(r.day_of_week()))
        .cloned()
        .collect();

    debug!(
        month = %spec.month,
        weekday = %spec.weekday,
        before = dataset.len(),
        after = records.len(),
        "Filter applied"
    );

    dataset.with_records(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Column, TripRecord};
    use chrono::NaiveDate;

    fn trip(m: u32, d: u32, station: &str) -> TripRecord {
        let start = NaiveDate::from_ymd_opt(2017, m, d)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        TripRecord::new(start, 300.0, station, "End")
    }

    // 2017-01-02 Mon, 2017-01-03 Tue, 2017-02-06 Mon, 2017-02-07 Tue
    fn sample() -> Dataset {
        Dataset::new(
            Column::REQUIRED,
            vec![
                trip(1, 2, "a"),
                trip(2, 6, "b"),
                trip(1, 3, "c"),
                trip(2, 7, "d"),
                trip(1, 9, "e"),
            ],
        )
    }

    fn stations(ds: &Dataset) -> Vec<&str> {
        ds.iter().map(|r| r.start_station.as_str()).collect()
    }

    #[test]
    fn test_all_keeps_everything() {
        let ds = sample();
        assert_eq!(filter(&ds, &FilterSpec::default()), ds);
    }

    #[test]
    fn test_month_filter_preserves_order() {
        let spec = FilterSpec::new(MonthFilter::Month(1), WeekdayFilter::All);
        assert_eq!(stations(&filter(&sample(), &spec)), vec!["a", "c", "e"]);
    }

    #[test]
    fn test_weekday_filter() {
        let spec = FilterSpec::new(MonthFilter::All, WeekdayFilter::Day(Weekday::Mon));
        assert_eq!(stations(&filter(&sample(), &spec)), vec!["a", "b", "e"]);
    }

    #[test]
    fn test_axes_compose_in_any_order() {
        let ds = sample();
        let both = FilterSpec::new(MonthFilter::Month(1), WeekdayFilter::Day(Weekday::Mon));
        let month_only = FilterSpec::new(MonthFilter::Month(1), WeekdayFilter::All);
        let day_only = FilterSpec::new(MonthFilter::All, WeekdayFilter::Day(Weekday::Mon));

        let direct = filter(&ds, &both);
        assert_eq!(stations(&direct), vec!["a", "e"]);
        assert_eq!(filter(&filter(&ds, &month_only), &day_only), direct);
        assert_eq!(filter(&filter(&ds, &day_only), &month_only), direct);
    }

    #[test]
    fn test_conflicting_axes_compose_to_empty() {
        let ds = sample();
        let january = FilterSpec::new(MonthFilter::Month(1), WeekdayFilter::All);
        let february = FilterSpec::new(MonthFilter::Month(2), WeekdayFilter::All);

        let out = filter(&filter(&ds, &january), &february);
        assert!(out.is_empty());
        assert_eq!(out.columns(), ds.columns());

        let monday = FilterSpec::new(MonthFilter::All, WeekdayFilter::Day(Weekday::Mon));
        let tuesday = FilterSpec::new(MonthFilter::All, WeekdayFilter::Day(Weekday::Tue));
        assert!(filter(&filter(&ds, &monday), &tuesday).is_empty());
    }

    #[test]
    fn test_empty_result_keeps_columns() {
        let spec = FilterSpec::new(MonthFilter::Month(6), WeekdayFilter::All);
        let out = filter(&sample(), &spec);
        assert!(out.is_empty());
        assert_eq!(out.columns(), sample().columns());
    }

    #[test]
    fn test_parse_month_vocabulary() {
        assert_eq!("JANUARY".parse::<MonthFilter>(), Ok(MonthFilter::Month(1)));
        assert_eq!(" june ".parse::<MonthFilter>(), Ok(MonthFilter::Month(6)));
        assert_eq!("All".parse::<MonthFilter>(), Ok(MonthFilter::All));
        assert!("july".parse::<MonthFilter>().is_err());
        assert!("jan".parse::<MonthFilter>().is_err());
    }

    #[test]
    fn test_parse_weekday_vocabulary() {
        assert_eq!("monday".parse::<WeekdayFilter>(), Ok(WeekdayFilter::Day(Weekday::Mon)));
        assert_eq!("SUNDAY".parse::<WeekdayFilter>(), Ok(WeekdayFilter::Day(Weekday::Sun)));
        assert!("funday".parse::<WeekdayFilter>().is_err());
    }

    #[test]
    fn test_from_mode_resets_unused_axes() {
        let spec = FilterSpec::from_mode(
            FilterMode::Month,
            MonthFilter::Month(2),
            WeekdayFilter::Day(Weekday::Fri),
        );
        assert_eq!(spec, FilterSpec::new(MonthFilter::Month(2), WeekdayFilter::All));

        let spec = FilterSpec::from_mode(
            FilterMode::None,
            MonthFilter::Month(2),
            WeekdayFilter::Day(Weekday::Fri),
        );
        assert_eq!(spec, FilterSpec::default());
    }

    #[test]
    fn test_parse_filter_mode() {
        assert_eq!("B".parse::<FilterMode>(), Ok(FilterMode::Both));
        assert_eq!("day".parse::<FilterMode>(), Ok(FilterMode::Weekday));
        assert!("x".parse::<FilterMode>().is_err());
    }
}
