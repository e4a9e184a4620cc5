//! Trip records and the in-memory dataset they are analyzed from.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::Serialize;

use crate::error::{StatsError, StatsResult};

/// A named column of the trip source schema.
///
/// Only source columns are listed here; values derived at load time
/// (month, weekday, hour, station combination) never appear as columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Column {
    #[serde(rename = "Start Time")]
    StartTime,
    #[serde(rename = "End Time")]
    EndTime,
    #[serde(rename = "Trip Duration")]
    TripDuration,
    #[serde(rename = "Start Station")]
    StartStation,
    #[serde(rename = "End Station")]
    EndStation,
    #[serde(rename = "User Type")]
    UserType,
    Gender,
    #[serde(rename = "Birth Year")]
    BirthYear,
}

impl Column {
    /// All recognized columns in canonical schema order.
    pub const ALL: [Column; 8] = [
        Column::StartTime,
        Column::EndTime,
        Column::TripDuration,
        Column::StartStation,
        Column::EndStation,
        Column::UserType,
        Column::Gender,
        Column::BirthYear,
    ];

    /// Columns every source must carry.
    pub const REQUIRED: [Column; 4] = [
        Column::StartTime,
        Column::TripDuration,
        Column::StartStation,
        Column::EndStation,
    ];

    /// The case-sensitive header name used in source files.
    pub fn header(&self) -> &'static str {
        match self {
            Column::StartTime => "Start Time",
            Column::EndTime => "End Time",
            Column::TripDuration => "Trip Duration",
            Column::StartStation => "Start Station",
            Column::EndStation => "End Station",
            Column::UserType => "User Type",
            Column::Gender => "Gender",
            Column::BirthYear => "Birth Year",
        }
    }

    pub fn from_header(header: &str) -> Option<Column> {
        Column::ALL.into_iter().find(|c| c.header() == header)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum UserType {
    Subscriber,
    Customer,
}

impl UserType {
    pub const ALL: [UserType; 2] = [UserType::Subscriber, UserType::Customer];
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserType::Subscriber => f.write_str("Subscriber"),
            UserType::Customer => f.write_str("Customer"),
        }
    }
}

impl FromStr for UserType {
    type Err = StatsError;

    fn from_str(s: &str) -> StatsResult<Self> {
        match s {
            "Subscriber" => Ok(UserType::Subscriber),
            "Customer" => Ok(UserType::Customer),
            other => Err(StatsError::invalid("user type", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => f.write_str("Male"),
            Gender::Female => f.write_str("Female"),
        }
    }
}

impl FromStr for Gender {
    type Err = StatsError;

    fn from_str(s: &str) -> StatsResult<Self> {
        match s {
            "Male" => Ok(Gender::Male),
            "Female" => Ok(Gender::Female),
            other => Err(StatsError::invalid("gender", other)),
        }
    }
}

/// Full English name of a weekday, as used in filters and reports.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Full English name of a 1-based month number.
pub fn month_name(month: u32) -> &'static str {
    u8::try_from(month)
        .ok()
        .and_then(|m| chrono::Month::try_from(m).ok())
        .map(|m| m.name())
        .unwrap_or("Unknown")
}

/// One bicycle-share trip.
///
/// `month` and `day_of_week` are derived from `start_time` when the record
/// is built and are not part of the source row.
#[derive(Debug, Clone, PartialEq)]
pub struct TripRecord {
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
    pub trip_duration: f64,
    pub start_station: String,
    pub end_station: String,
    pub user_type: Option<UserType>,
    pub gender: Option<Gender>,
    pub birth_year: Option<i32>,
    month: u32,
    day_of_week: Weekday,
}

impl TripRecord {
    pub fn new(
        start_time: NaiveDateTime,
        trip_duration: f64,
        start_station: impl Into<String>,
        end_station: impl Into<String>,
    ) -> Self {
        TripRecord {
            start_time,
            end_time: None,
            trip_duration,
            start_station: start_station.into(),
            end_station: end_station.into(),
            user_type: None,
            gender: None,
            birth_year: None,
            month: start_time.month(),
            day_of_week: start_time.weekday(),
        }
    }

    pub fn with_end_time(mut self, end_time: Option<NaiveDateTime>) -> Self {
        self.end_time = end_time;
        self
    }

    pub fn with_user_type(mut self, user_type: Option<UserType>) -> Self {
        self.user_type = user_type;
        self
    }

    pub fn with_gender(mut self, gender: Option<Gender>) -> Self {
        self.gender = gender;
        self
    }

    pub fn with_birth_year(mut self, birth_year: Option<i32>) -> Self {
        self.birth_year = birth_year;
        self
    }

    /// Calendar month of the start time, 1–12.
    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day_of_week(&self) -> Weekday {
        self.day_of_week
    }

    /// Hour of day of the start time, 0–23.
    pub fn hour(&self) -> u32 {
        self.start_time.hour()
    }

    pub fn station_combination(&self) -> String {
        format!("{} --> {}", self.start_station, self.end_station)
    }
}

/// An ordered sequence of trips plus the columns its source provided.
///
/// Order is source order. Filtering produces a new `Dataset` that keeps the
/// same column set and a subsequence of the records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
    records: Vec<TripRecord>,
}

impl Dataset {
    /// Builds a dataset. `columns` are kept in canonical schema order
    /// regardless of the order they are given in.
    pub fn new(columns: impl IntoIterator<Item = Column>, records: Vec<TripRecord>) -> Self {
        let given: Vec<Column> = columns.into_iter().collect();
        let columns = Column::ALL
            .into_iter()
            .filter(|c| given.contains(c))
            .collect();
        Dataset { columns, records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[TripRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TripRecord> {
        self.records.iter()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn has_column(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    /// Capability check used before computing a statistic that depends on
    /// an optional column.
    pub fn require(&self, column: Column) -> StatsResult<()> {
        if self.has_column(column) {
            Ok(())
        } else {
            Err(StatsError::MissingField(column))
        }
    }

    pub(crate) fn with_records(&self, records: Vec<TripRecord>) -> Self {
        Dataset {
            columns: self.columns.clone(),
            records,
        }
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a TripRecord;
    type IntoIter = std::slice::Iter<'a, TripRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
