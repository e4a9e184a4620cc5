//! CSV loader for trip sources.
//!
//! Reads a headered CSV into a [`Dataset`], recording which optional columns
//! the source carried. Derived month and weekday are computed here, once.

use anyhow::{Context, Result, anyhow, bail};
use chrono::NaiveDateTime;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::config::CityCatalog;
use crate::model::{Column, Dataset, Gender, TripRecord, UserType};

const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// A source row before typing. Unknown columns, including the unnamed
/// index column some exports carry, are ignored.
#[derive(Debug, Deserialize)]
struct RawTrip {
    #[serde(rename = "Start Time")]
    start_time: String,
    #[serde(rename = "End Time", default)]
    end_time: Option<String>,
    #[serde(rename = "Trip Duration")]
    trip_duration: f64,
    #[serde(rename = "Start Station")]
    start_station: String,
    #[serde(rename = "End Station")]
    end_station: String,
    #[serde(rename = "User Type", default)]
    user_type: Option<String>,
    #[serde(rename = "Gender", default)]
    gender: Option<String>,
    #[serde(rename = "Birth Year", default)]
    birth_year: Option<f64>,
}

#[derive(Debug, Default)]
struct Unrecognized {
    user_types: usize,
    genders: usize,
}

/// Loads the source configured for `city` in `catalog`.
pub fn load_city(catalog: &CityCatalog, city: &str) -> Result<Dataset> {
    let path = catalog
        .source_path(city)
        .ok_or_else(|| anyhow!("no data source configured for city '{city}'"))?;
    load_file(&path)
}

#[tracing::instrument(skip(path), fields(path = %path.display()))]
pub fn load_file(path: &Path) -> Result<Dataset> {
    let file = File::open(path).with_context(|| format!("opening '{}'", path.display()))?;
    load_reader(file).with_context(|| format!("loading '{}'", path.display()))
}

/// Reads trips from any CSV byte source.
pub fn load_reader<R: Read>(reader: R) -> Result<Dataset> {
    // Padded header names must resolve the same way for detection and for
    // the serde renames on `RawTrip`.
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let columns: Vec<Column> = rdr
        .headers()
        .context("reading CSV header")?
        .iter()
        .filter_map(Column::from_header)
        .collect();

    for required in Column::REQUIRED {
        if !columns.contains(&required) {
            bail!("required column '{required}' is missing");
        }
    }
    debug!(?columns, "Source columns detected");

    let mut records = Vec::new();
    let mut unrecognized = Unrecognized::default();

    for (i, result) in rdr.deserialize::<RawTrip>().enumerate() {
        // +2: 1-based, after the header line
        let line = i + 2;
        let raw = result.with_context(|| format!("line {line}: malformed row"))?;
        let record = to_record(raw, &mut unrecognized).with_context(|| format!("line {line}"))?;
        records.push(record);
    }

    if unrecognized.user_types > 0 || unrecognized.genders > 0 {
        warn!(
            user_types = unrecognized.user_types,
            genders = unrecognized.genders,
            "Unrecognized values treated as absent"
        );
    }
    info!(trips = records.len(), "Trip data loaded");

    Ok(Dataset::new(columns, records))
}

fn to_record(raw: RawTrip, unrecognized: &mut Unrecognized) -> Result<TripRecord> {
    let start_time = parse_timestamp(&raw.start_time)?;
    let end_time = match raw.end_time.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => Some(parse_timestamp(s)?),
        _ => None,
    };

    if !raw.trip_duration.is_finite() || raw.trip_duration < 0.0 {
        bail!("invalid trip duration {}", raw.trip_duration);
    }

    let user_type = optional_enum::<UserType>(raw.user_type, &mut unrecognized.user_types);
    let gender = optional_enum::<Gender>(raw.gender, &mut unrecognized.genders);
    let birth_year = raw
        .birth_year
        .filter(|y| y.is_finite())
        .map(|y| y.trunc() as i32);

    Ok(
        TripRecord::new(start_time, raw.trip_duration, raw.start_station, raw.end_station)
            .with_end_time(end_time)
            .with_user_type(user_type)
            .with_gender(gender)
            .with_birth_year(birth_year),
    )
}

fn optional_enum<T: std::str::FromStr>(value: Option<String>, misses: &mut usize) -> Option<T> {
    let value = value?;
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    match value.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            *misses += 1;
            None
        }
    }
}

fn parse_timestamp(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .ok_or_else(|| anyhow!("unparseable timestamp '{s}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    const CHICAGO: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year
1423854,2017-06-23 15:09:32,2017-06-23 15:14:53,321,Wood St & Hubbard St,Damen Ave & Chicago Ave,Subscriber,Male,1992.0
955915,2017-05-25 18:19:03,2017-05-25 18:45:53,1610,Theater on the Lake,Sheffield Ave & Waveland Ave,Subscriber,Female,1992.0
9031,2017-01-04 08:27:49,2017-01-04 08:34:45,416,May St & Taylor St,Wood St & Taylor St,Subscriber,Male,1981.0
304487,2017-03-06 13:49:38,2017-03-06 13:55:28,350,Christiana Ave & Lawrence Ave,St. Louis Ave & Balmoral Ave,Customer,,
";

    const WASHINGTON: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type
1621326,2017-06-21 08:36:34,2017-06-21 08:44:43,489.066,14th & Belmont St NW,15th & K St NW,Subscriber
482740,2017-03-11 10:40:00.0,2017-03-11 10:46:00,402.549,Yuma St & Tenley Circle NW,Connecticut Ave & Yuma St NW,Dependent
";

    #[test]
    fn test_load_full_schema() {
        let ds = load_reader(CHICAGO.as_bytes()).unwrap();
        assert_eq!(ds.len(), 4);
        assert_eq!(ds.columns(), &Column::ALL);

        let first = &ds.records()[0];
        assert_eq!(first.month(), 6);
        assert_eq!(first.day_of_week(), Weekday::Fri);
        assert_eq!(first.hour(), 15);
        assert_eq!(first.trip_duration, 321.0);
        assert_eq!(first.gender, Some(Gender::Male));
        assert_eq!(first.birth_year, Some(1992));
        assert!(first.end_time.is_some());
    }

    #[test]
    fn test_empty_optional_cells_are_absent() {
        let ds = load_reader(CHICAGO.as_bytes()).unwrap();
        let last = &ds.records()[3];
        assert_eq!(last.user_type, Some(UserType::Customer));
        assert_eq!(last.gender, None);
        assert_eq!(last.birth_year, None);
    }

    #[test]
    fn test_source_without_demographics() {
        let ds = load_reader(WASHINGTON.as_bytes()).unwrap();
        assert_eq!(ds.len(), 2);
        assert!(ds.has_column(Column::UserType));
        assert!(!ds.has_column(Column::Gender));
        assert!(!ds.has_column(Column::BirthYear));
        // fractional seconds are tolerated
        assert_eq!(ds.records()[1].month(), 3);
        // unknown user type becomes absent
        assert_eq!(ds.records()[1].user_type, None);
    }

    #[test]
    fn test_padded_headers_still_deserialize() {
        let csv = "\
Start Time, Trip Duration ,Start Station,End Station,Gender ,Birth Year
2017-01-02 08:00:00,600,A,B,Male,1980
";
        let ds = load_reader(csv.as_bytes()).unwrap();
        assert!(ds.has_column(Column::Gender));
        assert!(ds.has_column(Column::BirthYear));

        let record = &ds.records()[0];
        assert_eq!(record.gender, Some(Gender::Male));
        assert_eq!(record.birth_year, Some(1980));
        assert_eq!(record.trip_duration, 600.0);
    }

    #[test]
    fn test_missing_required_column() {
        let csv = "Start Time,Trip Duration,Start Station\n2017-01-01 00:00:00,10,A\n";
        let err = load_reader(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("End Station"));
    }

    #[test]
    fn test_bad_timestamp_reports_line() {
        let csv = "Start Time,Trip Duration,Start Station,End Station\n\
                   2017-01-01 00:00:00,10,A,B\n\
                   yesterday,10,A,B\n";
        let err = load_reader(csv.as_bytes()).unwrap_err();
        assert_eq!(err.to_string(), "line 3");
        assert!(format!("{err:#}").contains("yesterday"));
    }

    #[test]
    fn test_negative_duration_rejected() {
        let csv = "Start Time,Trip Duration,Start Station,End Station\n\
                   2017-01-01 00:00:00,-5,A,B\n";
        assert!(load_reader(csv.as_bytes()).is_err());
    }

    #[test]
    fn test_load_city_unknown() {
        let catalog = CityCatalog::builtin(".");
        assert!(load_city(&catalog, "atlantis").is_err());
    }

    #[test]
    fn test_load_file_from_disk() {
        let path = std::env::temp_dir().join("bikeshare_explorer_test_load.csv");
        std::fs::write(&path, WASHINGTON).unwrap();

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);

        std::fs::remove_file(&path).unwrap();
    }
}
