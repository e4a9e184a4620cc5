//! Aggregations over field values drawn from a trip dataset.
//!
//! These functions know nothing about records or columns: callers extract
//! the values for one field and hand them over. Empty input is reported as
//! [`StatsError::EmptyInput`](crate::error::StatsError::EmptyInput) rather
//! than producing a default.

pub mod duration;
pub mod mode;
pub mod types;
pub mod utility;

pub use duration::{DurationStats, DurationUnit, duration_stats};
pub use mode::{mode_count, smallest_mode_count, value_counts};
pub use types::ModeCount;
