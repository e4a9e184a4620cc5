//! Data types produced by the statistics pipeline.

use serde::Serialize;

use crate::analyzers::duration::DurationStats;
use crate::error::{StatsError, StatsResult};
use crate::model::{Column, Gender, UserType};

/// The most frequent value of a field and how many records carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModeCount<T> {
    pub value: T,
    pub count: usize,
}

/// Occurrences of one value of an enumerated field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueCount<T> {
    pub value: T,
    pub count: usize,
}

/// Most popular month, weekday, and start hour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeStats {
    /// 1-based calendar month.
    pub month: ModeCount<u32>,
    pub weekday: ModeCount<&'static str>,
    pub hour: ModeCount<u32>,
}

/// Most popular start station, end station, and start/end pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationStats {
    pub start_station: ModeCount<String>,
    pub end_station: ModeCount<String>,
    pub combination: ModeCount<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BirthYearStats {
    pub earliest: i32,
    pub most_recent: i32,
    pub most_common: ModeCount<i32>,
}

/// Outcome of one report section.
///
/// A section that cannot be computed is recorded instead of failing the
/// whole report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Section<T> {
    Ok(T),
    NoData,
    MissingField(Column),
    /// Any other error. The statistics in this crate only report empty
    /// input or a missing column; this keeps the conversion total so a
    /// new error kind still renders as text instead of being dropped.
    Failed(String),
}

impl<T> Section<T> {
    pub fn ok(&self) -> Option<&T> {
        match self {
            Section::Ok(v) => Some(v),
            _ => None,
        }
    }
}

impl<T> From<StatsResult<T>> for Section<T> {
    fn from(result: StatsResult<T>) -> Self {
        match result {
            Ok(v) => Section::Ok(v),
            Err(StatsError::EmptyInput) => Section::NoData,
            Err(StatsError::MissingField(column)) => Section::MissingField(column),
            Err(e) => Section::Failed(e.to_string()),
        }
    }
}

/// Every statistic computed for one city and filter selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripReport {
    pub city: Option<String>,
    pub filters: crate::filter::FilterSpec,
    pub trip_count: usize,
    pub time: Section<TimeStats>,
    pub stations: Section<StationStats>,
    pub durations: Section<DurationStats>,
    pub user_types: Section<Vec<ValueCount<UserType>>>,
    pub genders: Section<Vec<ValueCount<Gender>>>,
    pub birth_years: Section<BirthYearStats>,
}
