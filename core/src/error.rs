use chrono::NaiveDate;
use thiserror::Error;

use crate::model::series::SeriesKind;

/// Failures raised by the simulation core.
///
/// These propagate unmodified to the caller. A run that hits any of them
/// produces no partial result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("No {kind} observation for {date}")]
    DataGap { kind: SeriesKind, date: NaiveDate },

    #[error("Unsupported date {date}: no block reward defined before {earliest}")]
    UnsupportedDate { date: NaiveDate, earliest: NaiveDate },
}

impl SimulationError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        SimulationError::InvalidParameter(msg.into())
    }
}
