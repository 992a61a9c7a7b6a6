//! The recorded output of a sampling run, plus the caller-side post-processing
//! (burn-in discard, thinning) applied before analysis.

use ndarray::{s, Array2, ArrayView1, ArrayView2, Axis};

use crate::error::{McmcError, Result};

/// An ordered sequence of parameter vectors, one row per sampler step.
///
/// Rejected steps repeat the previous row. Rows are never dropped by the
/// sampler; discarding burn-in is up to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Chain {
    samples: Array2<f64>,
    n_accepted: usize,
}

impl Chain {
    pub(crate) fn new(samples: Array2<f64>, n_accepted: usize) -> Self {
        Self {
            samples,
            n_accepted,
        }
    }

    /// Number of recorded steps.
    pub fn len(&self) -> usize {
        self.samples.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.nrows() == 0
    }

    /// Dimensionality of the parameter vector.
    pub fn dim(&self) -> usize {
        self.samples.ncols()
    }

    /// All samples, shaped `(n_steps, dim)`.
    pub fn samples(&self) -> ArrayView2<'_, f64> {
        self.samples.view()
    }

    pub fn into_samples(self) -> Array2<f64> {
        self.samples
    }

    /// The state recorded at step `i`.
    pub fn row(&self, i: usize) -> Option<ArrayView1<'_, f64>> {
        (i < self.len()).then(|| self.samples.row(i))
    }

    /// The trace of parameter `d` across all steps.
    pub fn column(&self, d: usize) -> Option<ArrayView1<'_, f64>> {
        (d < self.dim()).then(|| self.samples.column(d))
    }

    pub fn n_accepted(&self) -> usize {
        self.n_accepted
    }

    /// Fraction of steps whose proposal was accepted.
    pub fn acceptance_rate(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.n_accepted as f64 / self.len() as f64
    }

    /// Drops the first `burn_in` rows. Discarding more rows than the chain has
    /// leaves an empty view.
    pub fn discard(&self, burn_in: usize) -> ArrayView2<'_, f64> {
        let start = burn_in.min(self.len());
        self.samples.slice(s![start.., ..])
    }

    /// Keeps every `every`-th row after dropping `burn_in` rows.
    pub fn thin(&self, burn_in: usize, every: usize) -> Result<Array2<f64>> {
        if every == 0 {
            return Err(McmcError::invalid("thinning interval must be positive"));
        }
        let kept = self.discard(burn_in);
        let rows: Vec<usize> = (0..kept.nrows()).step_by(every).collect();
        Ok(kept.select(Axis(0), &rows))
    }
}
