//! Line-oriented prompts that repeat until the answer is in vocabulary.

use anyhow::{Result, bail};
use std::io::{BufRead, Write};
use tracing::debug;

use crate::config::CityCatalog;
use crate::error::{StatsError, StatsResult};
use crate::filter::{FilterMode, FilterSpec, MonthFilter, WeekdayFilter};

/// Parses `yes`/`y`/`no`/`n`, ignoring case.
pub fn parse_yes_no(answer: &str) -> StatsResult<bool> {
    match answer.trim().to_ascii_lowercase().as_str() {
        "yes" | "y" => Ok(true),
        "no" | "n" => Ok(false),
        other => Err(StatsError::invalid("answer (yes or no)", other)),
    }
}

/// Reads answers from `input` and writes questions to `output`.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    /// Asks `question` until `parse` accepts the answer.
    ///
    /// # Errors
    ///
    /// Fails only on I/O errors or when input ends before a valid answer.
    pub fn ask<T, F>(&mut self, question: &str, parse: F) -> Result<T>
    where
        F: Fn(&str) -> StatsResult<T>,
    {
        loop {
            write!(self.output, "{question} ")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                bail!("input closed while waiting for an answer");
            }

            match parse(line.trim()) {
                Ok(value) => return Ok(value),
                Err(e) => {
                    debug!(answer = line.trim(), error = %e, "Rejected answer");
                    writeln!(self.output, "{e}. Please try again.")?;
                }
            }
        }
    }

    pub fn ask_yes_no(&mut self, question: &str) -> Result<bool> {
        self.ask(question, parse_yes_no)
    }

    /// Asks for a city configured in `catalog` and returns its catalog key.
    pub fn ask_city(&mut self, catalog: &CityCatalog) -> Result<String> {
        let choices = catalog.cities().join(", ");
        let question = format!("Which city would you like to analyze ({choices})?");
        self.ask(&question, |answer| {
            catalog
                .lookup(answer)
                .map(str::to_string)
                .ok_or_else(|| StatsError::invalid("city", answer))
        })
    }

    /// Asks for a filter mode, then for the month and/or weekday it needs.
    pub fn ask_filters(&mut self) -> Result<FilterSpec> {
        let mode: FilterMode = self.ask(
            "Do you want to filter by [m]onth, [d]ay, [b]oth or [n]one?",
            str::parse::<FilterMode>,
        )?;

        let month = if mode.wants_month() {
            self.ask(
                "Which month would you like to filter by (January - June)?",
                parse_month,
            )?
        } else {
            MonthFilter::All
        };

        let weekday = if mode.wants_weekday() {
            self.ask(
                "Which day would you like to filter by (Monday - Sunday)?",
                parse_weekday,
            )?
        } else {
            WeekdayFilter::All
        };

        Ok(FilterSpec::from_mode(mode, month, weekday))
    }

    /// Waits for Enter. End of input is treated as a keypress.
    pub fn pause(&mut self) -> Result<()> {
        write!(self.output, "Press Enter to continue...")?;
        self.output.flush()?;
        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(())
    }
}

// "all" is not an answer once the user has chosen to filter on an axis.
fn parse_month(answer: &str) -> StatsResult<MonthFilter> {
    match answer.parse::<MonthFilter>()? {
        MonthFilter::All => Err(StatsError::invalid("month", answer)),
        month => Ok(month),
    }
}

fn parse_weekday(answer: &str) -> StatsResult<WeekdayFilter> {
    match answer.parse::<WeekdayFilter>()? {
        WeekdayFilter::All => Err(StatsError::invalid("weekday", answer)),
        day => Ok(day),
    }
}
