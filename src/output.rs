//! Console rendering of reports and raw-data pages.
//!
//! Supports plain text for the interactive session and pretty JSON for
//! scripted use.

use anyhow::Result;
use serde::Serialize;
use std::io::Write;
use tracing::debug;

use crate::analyzers::types::{Section, TripReport};
use crate::model::{Column, month_name};
use crate::pager::RawRow;

const RULE: &str = "----------------------------------------";

/// Logs a report using Rust's debug pretty-print format.
pub fn print_pretty(report: &TripReport) {
    debug!("{:#?}", report);
}

/// Serializes any report or page as pretty-printed JSON.
pub fn to_json(value: &impl Serialize) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Writes the one-line summary shown before the statistics.
pub fn write_summary<W: Write>(out: &mut W, report: &TripReport) -> Result<()> {
    if let Some(city) = &report.city {
        writeln!(out, "City: {}", title_case(city))?;
    }
    writeln!(
        out,
        "Filters: month = {}, day = {}",
        report.filters.month, report.filters.weekday
    )?;
    writeln!(
        out,
        "Your calculations will be based on {} trips.",
        report.trip_count
    )?;
    Ok(())
}

pub fn write_time_stats<W: Write>(out: &mut W, report: &TripReport) -> Result<()> {
    write_heading(out, "Travel time statistics")?;
    write_section(out, &report.time, |out, t| {
        writeln!(out, "Most popular month: {}", month_name(t.month.value))?;
        writeln!(out, "Count: {}\n", t.month.count)?;
        writeln!(out, "Most popular day: {}", t.weekday.value)?;
        writeln!(out, "Count: {}\n", t.weekday.count)?;
        writeln!(out, "Most popular hour: {}", t.hour.value)?;
        writeln!(out, "Count: {}", t.hour.count)
    })
}

pub fn write_station_stats<W: Write>(out: &mut W, report: &TripReport) -> Result<()> {
    write_heading(out, "Station statistics")?;
    write_section(out, &report.stations, |out, s| {
        writeln!(out, "Most popular start station: {}", s.start_station.value)?;
        writeln!(out, "Count: {}\n", s.start_station.count)?;
        writeln!(out, "Most popular end station: {}", s.end_station.value)?;
        writeln!(out, "Count: {}\n", s.end_station.count)?;
        writeln!(out, "Most popular combination of stations: {}", s.combination.value)?;
        writeln!(out, "Count: {}", s.combination.count)
    })
}

pub fn write_duration_stats<W: Write>(out: &mut W, report: &TripReport) -> Result<()> {
    write_heading(out, "Travel duration statistics")?;
    write_section(out, &report.durations, |out, d| {
        writeln!(out, "Total travel time: {:.2} {}", d.total_scaled, d.total_unit)?;
        writeln!(out, "Average travel time: {:.2} minutes", d.mean_minutes)
    })
}

pub fn write_user_stats<W: Write>(out: &mut W, report: &TripReport) -> Result<()> {
    write_heading(out, "User statistics")?;
    write_section(out, &report.user_types, |out, counts| {
        for c in counts {
            writeln!(out, "{}s: {}", c.value, c.count)?;
        }
        Ok(())
    })?;
    writeln!(out)?;
    write_section(out, &report.genders, |out, counts| {
        for c in counts {
            writeln!(out, "{} users: {}", c.value, c.count)?;
        }
        Ok(())
    })?;
    writeln!(out)?;
    write_section(out, &report.birth_years, |out, b| {
        writeln!(out, "Oldest user born in: {}", b.earliest)?;
        writeln!(out, "Youngest user born in: {}", b.most_recent)?;
        writeln!(out, "Most users born in: {}", b.most_common.value)
    })
}

/// Writes every section of the report in display order.
pub fn write_report<W: Write>(out: &mut W, report: &TripReport) -> Result<()> {
    write_summary(out, report)?;
    write_time_stats(out, report)?;
    write_station_stats(out, report)?;
    write_duration_stats(out, report)?;
    write_user_stats(out, report)?;
    Ok(())
}

/// Writes a page of raw rows, one `column: value` line per field.
pub fn write_page<W: Write>(out: &mut W, rows: &[RawRow]) -> Result<()> {
    if rows.is_empty() {
        writeln!(out, "No more raw data to display.")?;
        return Ok(());
    }
    for row in rows {
        writeln!(out, "{}\n", "--".repeat(5))?;
        writeln!(out, "Row {}", row.index + 1)?;
        for (column, value) in &row.fields {
            writeln!(out, "{column}: {value}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn write_heading<W: Write>(out: &mut W, title: &str) -> Result<()> {
    writeln!(out, "\n{RULE}\n\n{title}:\n")?;
    Ok(())
}

fn write_section<W, T, F>(out: &mut W, section: &Section<T>, render: F) -> Result<()>
where
    W: Write,
    F: FnOnce(&mut W, &T) -> std::io::Result<()>,
{
    match section {
        Section::Ok(value) => render(out, value)?,
        Section::NoData => writeln!(out, "No data for this selection.")?,
        Section::MissingField(column) => writeln!(out, "{}", missing_message(*column))?,
        Section::Failed(message) => writeln!(out, "Could not compute: {message}")?,
    }
    Ok(())
}

fn missing_message(column: Column) -> String {
    format!("{column} data is not available for this city.")
}

fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
