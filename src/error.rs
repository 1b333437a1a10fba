//! Error types for the chart pipeline.

use std::time::Duration;

use thiserror::Error;

/// Failure reported by an ephemeris backend.
#[derive(Debug, Error)]
pub enum EphemerisError {
    #[error("{operation} failed with code {code}: {message}")]
    Calculation {
        operation: &'static str,
        code: i32,
        message: String,
    },

    #[error("ephemeris returned a non-finite {quantity}: {value}")]
    NonFinite { quantity: &'static str, value: f64 },

    #[error("ephemeris backend unavailable: {0}")]
    Unavailable(String),

    #[error("ephemeris call exceeded the {0:?} deadline")]
    Timeout(Duration),
}

/// Errors surfaced by the chart pipeline.
#[derive(Debug, Error)]
pub enum ChartError {
    /// Caller supplied an unparseable or out-of-range value.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("ephemeris failure: {0}")]
    Oracle(#[from] EphemerisError),

    /// A derived index left its valid range; indicates an upstream bug.
    #[error("computation invariant violated: {0}")]
    Invariant(String),
}

impl ChartError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ChartError::InvalidInput(message.into())
    }

    pub fn invariant(message: impl Into<String>) -> Self {
        ChartError::Invariant(message.into())
    }
}

pub type ChartResult<T> = Result<T, ChartError>;
