use std::fmt;

use serde::Serialize;

use crate::analyzers::utility::mean;
use crate::error::{StatsError, StatsResult};

/// Unit a total trip duration is reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    Years,
    Weeks,
    Days,
    Hours,
    Minutes,
}

impl DurationUnit {
    /// Candidate units, largest first. `Minutes` is the fallback and is not
    /// tested against a threshold.
    const CASCADE: [DurationUnit; 4] = [
        DurationUnit::Years,
        DurationUnit::Weeks,
        DurationUnit::Days,
        DurationUnit::Hours,
    ];

    pub fn seconds(&self) -> f64 {
        match self {
            DurationUnit::Years => 31_536_000.0,
            DurationUnit::Weeks => 604_800.0,
            DurationUnit::Days => 86_400.0,
            DurationUnit::Hours => 3_600.0,
            DurationUnit::Minutes => 60.0,
        }
    }

    /// Picks the largest unit in which `seconds` scales to more than 1,
    /// falling back to minutes.
    pub fn for_total(seconds: f64) -> DurationUnit {
        DurationUnit::CASCADE
            .into_iter()
            .find(|unit| seconds / unit.seconds() > 1.0)
            .unwrap_or(DurationUnit::Minutes)
    }
}

impl fmt::Display for DurationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DurationUnit::Years => "years",
            DurationUnit::Weeks => "weeks",
            DurationUnit::Days => "days",
            DurationUnit::Hours => "hours",
            DurationUnit::Minutes => "minutes",
        };
        f.write_str(name)
    }
}

/// Total and mean trip duration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DurationStats {
    pub total_seconds: f64,
    pub total_scaled: f64,
    pub total_unit: DurationUnit,
    pub mean_minutes: f64,
}

/// Sums and averages trip durations given in seconds.
///
/// # Errors
///
/// [`StatsError::EmptyInput`] if there are no durations.
pub fn duration_stats<I>(durations_seconds: I) -> StatsResult<DurationStats>
where
    I: IntoIterator<Item = f64>,
{
    let durations: Vec<f64> = durations_seconds.into_iter().collect();
    let mean_seconds = mean(&durations).ok_or(StatsError::EmptyInput)?;

    let total_seconds: f64 = durations.iter().sum();
    let total_unit = DurationUnit::for_total(total_seconds);

    Ok(DurationStats {
        total_seconds,
        total_scaled: total_seconds / total_unit.seconds(),
        total_unit,
        mean_minutes: mean_seconds / 60.0,
    })
}
