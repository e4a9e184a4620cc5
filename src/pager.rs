//! Raw record browser: fixed-size blocks of source rows.

use serde::Serialize;

use crate::error::{StatsError, StatsResult};
use crate::model::{Column, Dataset, TripRecord};

pub const BLOCK_SIZE: usize = 5;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One record as `(column, value)` pairs, limited to the columns the source
/// provided. Derived values are never included.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawRow {
    pub index: usize,
    pub fields: Vec<(Column, String)>,
}

impl RawRow {
    pub fn get(&self, column: Column) -> Option<&str> {
        self.fields
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, v)| v.as_str())
    }
}

/// Number of blocks needed to show every record.
pub fn block_count(dataset: &Dataset) -> usize {
    dataset.len().div_ceil(BLOCK_SIZE)
}

/// Returns records `[(block - 1) * 5, block * 5)`, clipped to the dataset.
///
/// A block past the end yields a partial or empty page.
///
/// # Errors
///
/// [`StatsError::InvalidBlock`] when `block` is 0; blocks are numbered from 1.
pub fn page(dataset: &Dataset, block: usize) -> StatsResult<Vec<RawRow>> {
    if block == 0 {
        return Err(StatsError::InvalidBlock(block));
    }

    let start = (block - 1).saturating_mul(BLOCK_SIZE);
    let rows = dataset
        .records()
        .iter()
        .enumerate()
        .skip(start)
        .take(BLOCK_SIZE)
        .map(|(index, record)| RawRow {
            index,
            fields: dataset
                .columns()
                .iter()
                .map(|column| (*column, display_value(record, *column)))
                .collect(),
        })
        .collect();

    Ok(rows)
}

fn display_value(record: &TripRecord, column: Column) -> String {
    fn opt<T: ToString>(value: &Option<T>) -> String {
        value.as_ref().map(ToString::to_string).unwrap_or_default()
    }

    match column {
        Column::StartTime => record.start_time.format(TIMESTAMP_FORMAT).to_string(),
        Column::EndTime => record
            .end_time
            .map(|t| t.format(TIMESTAMP_FORMAT).to_string())
            .unwrap_or_default(),
        Column::TripDuration => record.trip_duration.to_string(),
        Column::StartStation => record.start_station.clone(),
        Column::EndStation => record.end_station.clone(),
        Column::UserType => opt(&record.user_type),
        Column::Gender => opt(&record.gender),
        Column::BirthYear => opt(&record.birth_year),
    }
}
