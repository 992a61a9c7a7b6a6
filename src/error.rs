//! Error type shared by the sampler, the chain helpers and the summary statistics.

use ndarray_stats::errors::QuantileError;
use thiserror::Error;

/// Boxed error returned by fallible log-posterior functions.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum McmcError {
    /// Malformed input, detected before any sampling happens.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The log-posterior function failed. The run is aborted.
    #[error("log-posterior evaluation failed at {theta:?}")]
    LogpFailure {
        theta: Vec<f64>,
        #[source]
        source: BoxError,
    },

    /// The log-posterior function returned NaN.
    #[error("log-posterior returned NaN at {theta:?}")]
    NanLogp { theta: Vec<f64> },

    #[error(transparent)]
    Quantile(#[from] QuantileError),
}

pub type Result<T> = std::result::Result<T, McmcError>;

impl McmcError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        McmcError::InvalidArgument(msg.into())
    }
}
