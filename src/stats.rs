//! Per-parameter summaries of a (post-burn-in) sample matrix.

use std::fmt;

use ndarray::{ArrayView2, Axis};
use ndarray_stats::interpolate::Linear;
use ndarray_stats::QuantileExt;
use noisy_float::types::n64;

use crate::error::{McmcError, Result};

/// Posterior summary of one parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSummary {
    pub mean: f64,
    /// Sample standard deviation (`ddof = 1`).
    pub std: f64,
    pub q16: f64,
    pub median: f64,
    pub q84: f64,
}

impl fmt::Display for ParamSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prec = f.precision().unwrap_or(2);
        write!(f, "{:.prec$} ± {:.prec$}", self.mean, self.std)
    }
}

/**
Summarises each column of `samples` (shape `(n, dim)`).

Quantiles are linearly interpolated; NaN entries are skipped for the
quantiles.

# Examples

```rust
use mini_metropolis::stats::summarize;
use ndarray::arr2;

let samples = arr2(&[[1.0, 10.0], [2.0, 20.0], [3.0, 30.0]]);
let summary = summarize(samples.view()).unwrap();
assert_eq!(summary[0].mean, 2.0);
assert_eq!(summary[1].median, 20.0);
```
*/
pub fn summarize(samples: ArrayView2<'_, f64>) -> Result<Vec<ParamSummary>> {
    if samples.nrows() < 2 {
        return Err(McmcError::invalid(format!(
            "need at least 2 samples to summarize, got {}",
            samples.nrows()
        )));
    }
    let mean = samples
        .mean_axis(Axis(0))
        .ok_or_else(|| McmcError::invalid("empty sample matrix"))?;
    let std = samples.std_axis(Axis(0), 1.0);

    let mut scratch = samples.to_owned();
    let mut quantile = |q: f64| scratch.quantile_axis_skipnan_mut(Axis(0), n64(q), &Linear);
    let q16 = quantile(0.16)?;
    let median = quantile(0.5)?;
    let q84 = quantile(0.84)?;

    Ok((0..samples.ncols())
        .map(|d| ParamSummary {
            mean: mean[d],
            std: std[d],
            q16: q16[d],
            median: median[d],
            q84: q84[d],
        })
        .collect())
}
