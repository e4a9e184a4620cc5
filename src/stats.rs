//! Statistic sections computed from a (possibly filtered) [`Dataset`].

use tracing::{debug, info};

use crate::analyzers::types::{
    BirthYearStats, Section, StationStats, TimeStats, TripReport, ValueCount,
};
use crate::analyzers::{
    DurationStats, duration_stats, mode_count, smallest_mode_count, value_counts,
};
use crate::error::{StatsError, StatsResult};
use crate::filter::FilterSpec;
use crate::model::{Column, Dataset, Gender, UserType, weekday_name};

/// Most popular month, weekday, and start hour.
#[tracing::instrument(skip_all, fields(trips = dataset.len()))]
pub fn time_stats(dataset: &Dataset) -> StatsResult<TimeStats> {
    Ok(TimeStats {
        month: mode_count(dataset.iter().map(|r| r.month()))?,
        weekday: mode_count(dataset.iter().map(|r| weekday_name(r.day_of_week())))?,
        hour: mode_count(dataset.iter().map(|r| r.hour()))?,
    })
}

/// Most popular start station, end station, and trip (start/end pair).
#[tracing::instrument(skip_all, fields(trips = dataset.len()))]
pub fn station_stats(dataset: &Dataset) -> StatsResult<StationStats> {
    Ok(StationStats {
        start_station: mode_count(dataset.iter().map(|r| r.start_station.clone()))?,
        end_station: mode_count(dataset.iter().map(|r| r.end_station.clone()))?,
        combination: mode_count(dataset.iter().map(|r| r.station_combination()))?,
    })
}

#[tracing::instrument(skip_all, fields(trips = dataset.len()))]
pub fn trip_duration_stats(dataset: &Dataset) -> StatsResult<DurationStats> {
    duration_stats(dataset.iter().map(|r| r.trip_duration))
}

/// Trips per user type. Every known type is listed, including those with
/// zero trips.
#[tracing::instrument(skip_all, fields(trips = dataset.len()))]
pub fn user_type_counts(dataset: &Dataset) -> StatsResult<Vec<ValueCount<UserType>>> {
    dataset.require(Column::UserType)?;
    if dataset.is_empty() {
        return Err(StatsError::EmptyInput);
    }
    let counts = value_counts(dataset.iter().filter_map(|r| r.user_type));
    Ok(complete_counts(&UserType::ALL, &counts))
}

#[tracing::instrument(skip_all, fields(trips = dataset.len()))]
pub fn gender_counts(dataset: &Dataset) -> StatsResult<Vec<ValueCount<Gender>>> {
    dataset.require(Column::Gender)?;
    if dataset.is_empty() {
        return Err(StatsError::EmptyInput);
    }
    let counts = value_counts(dataset.iter().filter_map(|r| r.gender));
    Ok(complete_counts(&Gender::ALL, &counts))
}

/// Earliest, most recent, and most common year of birth among riders who
/// reported one. Tied years resolve to the earliest year.
#[tracing::instrument(skip_all, fields(trips = dataset.len()))]
pub fn birth_year_stats(dataset: &Dataset) -> StatsResult<BirthYearStats> {
    dataset.require(Column::BirthYear)?;

    let years: Vec<i32> = dataset.iter().filter_map(|r| r.birth_year).collect();
    let most_common = smallest_mode_count(years.iter().copied())?;
    debug!(reported = years.len(), "Birth years collected");

    Ok(BirthYearStats {
        earliest: years.iter().copied().min().ok_or(StatsError::EmptyInput)?,
        most_recent: years.iter().copied().max().ok_or(StatsError::EmptyInput)?,
        most_common,
    })
}

fn complete_counts<T: Copy + PartialEq>(known: &[T], counts: &[(T, usize)]) -> Vec<ValueCount<T>> {
    known
        .iter()
        .map(|value| ValueCount {
            value: *value,
            count: counts
                .iter()
                .find(|(v, _)| v == value)
                .map(|(_, c)| *c)
                .unwrap_or(0),
        })
        .collect()
}

impl TripReport {
    /// Computes every section independently against the same dataset.
    pub fn from_dataset(dataset: &Dataset, filters: &FilterSpec) -> Self {
        let started = std::time::Instant::now();

        let report = TripReport {
            city: None,
            filters: *filters,
            trip_count: dataset.len(),
            time: time_stats(dataset).into(),
            stations: station_stats(dataset).into(),
            durations: trip_duration_stats(dataset).into(),
            user_types: user_type_counts(dataset).into(),
            genders: gender_counts(dataset).into(),
            birth_years: birth_year_stats(dataset).into(),
        };

        info!(
            trips = report.trip_count,
            elapsed_ms = started.elapsed().as_millis() as u64,
            no_data = matches!(report.time, Section::NoData),
            "Report computed"
        );

        report
    }

    /// Set the city the report was computed for
    pub fn with_city(mut self, city: &str) -> Self {
        self.city = Some(city.to_string());
        self
    }
}
