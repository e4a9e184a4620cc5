//! Typed outcomes the statistics core reports to its callers.

use crate::model::Column;

/// Conditions under which a filter, statistic, or page cannot be produced.
///
/// None of these are fatal: the session layer decides whether to reprompt,
/// skip a section, or tell the user there is nothing to show.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatsError {
    #[error("no records to aggregate")]
    EmptyInput,

    #[error("column '{0}' is not present in this dataset")]
    MissingField(Column),

    #[error("'{value}' is not a recognized {kind}")]
    InvalidInput { kind: &'static str, value: String },

    #[error("block index starts at 1, got {0}")]
    InvalidBlock(usize),
}

impl StatsError {
    pub(crate) fn invalid(kind: &'static str, value: &str) -> Self {
        StatsError::InvalidInput {
            kind,
            value: value.to_string(),
        }
    }
}

pub type StatsResult<T> = Result<T, StatsError>;
