//! The interactive exploration loop.

use anyhow::Result;
use std::io::{BufRead, Write};
use tracing::{error, info};

use crate::analyzers::types::TripReport;
use crate::config::CityCatalog;
use crate::filter::filter;
use crate::loader::load_city;
use crate::model::Dataset;
use crate::output;
use crate::pager::{block_count, page};
use crate::prompt::Prompter;

/// Runs analyses until the user declines to start another one.
pub fn run<R: BufRead, W: Write>(prompter: &mut Prompter<R, W>, catalog: &CityCatalog) -> Result<()> {
    loop {
        writeln!(prompter.output(), "\nHello! Let's explore some US bikeshare data!\n")?;

        let city = prompter.ask_city(catalog)?;
        let filters = prompter.ask_filters()?;
        info!(city = %city, month = %filters.month, weekday = %filters.weekday, "Analysis requested");

        match load_city(catalog, &city) {
            Ok(dataset) => {
                let selected = filter(&dataset, &filters);
                let report = TripReport::from_dataset(&selected, &filters).with_city(&city);
                present(prompter, &report, &selected)?;
            }
            Err(e) => {
                error!(city = %city, error = %e, "Failed to load trip data");
                writeln!(prompter.output(), "\nCould not load data for {city}: {e:#}")?;
            }
        }

        if !prompter.ask_yes_no("\nWould you like to analyse more data, yes or no?")? {
            break;
        }
    }

    Ok(())
}

fn present<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    report: &TripReport,
    selected: &Dataset,
) -> Result<()> {
    output::write_summary(prompter.output(), report)?;
    prompter.pause()?;
    output::write_time_stats(prompter.output(), report)?;
    prompter.pause()?;
    output::write_station_stats(prompter.output(), report)?;
    prompter.pause()?;
    output::write_duration_stats(prompter.output(), report)?;
    prompter.pause()?;
    output::write_user_stats(prompter.output(), report)?;

    browse_raw(prompter, selected)
}

fn browse_raw<R: BufRead, W: Write>(prompter: &mut Prompter<R, W>, selected: &Dataset) -> Result<()> {
    let last = block_count(selected);
    let mut block = 0;

    while block < last {
        if !prompter.ask_yes_no("\nWould you like to see raw data, yes or no?")? {
            return Ok(());
        }
        block += 1;
        let rows = page(selected, block)?;
        output::write_page(prompter.output(), &rows)?;
    }

    if last > 0 {
        writeln!(prompter.output(), "\nThat was all the raw data for this selection.")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::path::PathBuf;

    const TRIPS: &str = "\
Start Time,Trip Duration,Start Station,End Station,User Type
2017-01-02 08:00:00,600,A,B,Subscriber
2017-01-02 09:00:00,600,A,C,Customer
2017-01-03 09:00:00,600,B,C,Subscriber
2017-02-06 10:00:00,600,C,A,Subscriber
2017-02-07 11:00:00,600,C,B,Subscriber
2017-02-08 12:00:00,600,C,B,Subscriber
";

    fn catalog(name: &str) -> (CityCatalog, PathBuf) {
        let dir = std::env::temp_dir();
        let file = format!("bikeshare_explorer_session_{name}.csv");
        let path = dir.join(&file);
        std::fs::write(&path, TRIPS).unwrap();
        let json = format!(r#"{{"testville": "{file}"}}"#);
        (CityCatalog::from_json(&json, dir).unwrap(), path)
    }

    fn run_with(catalog: &CityCatalog, input: &str) -> String {
        let mut prompter = Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
        run(&mut prompter, catalog).unwrap();
        String::from_utf8(prompter.output().clone()).unwrap()
    }

    #[test]
    fn test_full_session_with_paging() {
        let (catalog, path) = catalog("paging");
        // city, mode, 4 pauses, two raw pages, then stop
        let input = "testville\nn\n\n\n\n\nyes\nyes\nno\n";
        let out = run_with(&catalog, input);

        assert!(out.contains("based on 6 trips"));
        assert!(out.contains("Most popular month: January"));
        assert!(out.contains("Row 5"));
        assert!(out.contains("Row 6"));
        assert!(out.contains("That was all the raw data"));
        assert!(out.contains("Gender data is not available for this city."));

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_empty_selection_skips_raw_prompt() {
        let (catalog, path) = catalog("empty");
        let input = "testville\nm\nmay\n\n\n\n\nn\n";
        let out = run_with(&catalog, input);

        assert!(out.contains("based on 0 trips"));
        assert!(out.contains("No data for this selection."));
        assert!(!out.contains("Would you like to see raw data"));

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_restart_runs_second_analysis() {
        let (catalog, path) = catalog("restart");
        let input = "testville\nd\nmonday\n\n\n\n\nno\nyes\ntestville\nb\njanuary\nmonday\n\n\n\n\nno\nno\n";
        let out = run_with(&catalog, input);

        assert!(out.contains("based on 2 trips"));
        assert!(out.contains("based on 3 trips"));
        assert_eq!(out.matches("Hello!").count(), 2);

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_missing_source_does_not_end_session() {
        let catalog = CityCatalog::from_json(
            r#"{"nowhere": "bikeshare_explorer_does_not_exist.csv"}"#,
            std::env::temp_dir(),
        )
        .unwrap();
        let out = run_with(&catalog, "nowhere\nn\nno\n");
        assert!(out.contains("Could not load data for nowhere"));
    }
}
