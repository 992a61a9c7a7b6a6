/*!
Target and proposal distributions for the random-walk Metropolis sampler.

A target is anything that can evaluate an (unnormalized) log-posterior at a
parameter vector. Plain closures work out of the box:

```rust
use mini_metropolis::distributions::Target;

let target = |x: &[f64]| -0.5 * ((x[0] - 5.0) / 2.0).powi(2);
assert_eq!(target.unnorm_log_prob(&[5.0]).unwrap(), 0.0);
```

Closures that can fail are wrapped in [`TryFnTarget`], and their errors end the
run with [`McmcError::LogpFailure`](crate::error::McmcError::LogpFailure).

The only proposal is [`GaussianProposal`]: independent zero-mean normal noise
with one standard deviation per dimension. It is symmetric, so the sampler
needs no Hastings correction.
*/

use rand::Rng;
use rand_distr::{Distribution, Normal};
use std::f64::consts::PI;

use crate::error::{BoxError, McmcError, Result};

/// A continuous target distribution we want to sample from.
///
/// Implementations must be deterministic. Returning `f64::NEG_INFINITY` marks a
/// zero-probability point (outside the prior support) and is not an error.
pub trait Target {
    /// Returns the log of the unnormalized density at `theta`.
    fn unnorm_log_prob(&self, theta: &[f64]) -> std::result::Result<f64, BoxError>;
}

impl<F> Target for F
where
    F: Fn(&[f64]) -> f64,
{
    fn unnorm_log_prob(&self, theta: &[f64]) -> std::result::Result<f64, BoxError> {
        Ok(self(theta))
    }
}

/**
Adapts a fallible closure into a [`Target`].

```rust
use mini_metropolis::distributions::{Target, TryFnTarget};

let target = TryFnTarget(|x: &[f64]| {
    if x.len() != 1 {
        return Err(format!("expected 1 parameter, got {}", x.len()));
    }
    Ok(-0.5 * x[0] * x[0])
});
assert!(target.unnorm_log_prob(&[1.0, 2.0]).is_err());
```
*/
#[derive(Debug, Clone, Copy)]
pub struct TryFnTarget<F>(pub F);

impl<F, E> Target for TryFnTarget<F>
where
    F: Fn(&[f64]) -> std::result::Result<f64, E>,
    E: Into<BoxError>,
{
    fn unnorm_log_prob(&self, theta: &[f64]) -> std::result::Result<f64, BoxError> {
        (self.0)(theta).map_err(Into::into)
    }
}

/// Evaluates `target` at `theta`, turning failures and NaN into [`McmcError`].
pub(crate) fn eval_log_prob<T: Target + ?Sized>(target: &T, theta: &[f64]) -> Result<f64> {
    let lp = target
        .unnorm_log_prob(theta)
        .map_err(|source| McmcError::LogpFailure {
            theta: theta.to_vec(),
            source,
        })?;
    if lp.is_nan() {
        return Err(McmcError::NanLogp {
            theta: theta.to_vec(),
        });
    }
    Ok(lp)
}

/**
A diagonal Gaussian random-walk proposal.

Adds independent noise `Normal(0, widths[d])` to each coordinate of the
current state.

# Examples

```rust
use mini_metropolis::distributions::GaussianProposal;
use rand::rngs::SmallRng;
use rand::SeedableRng;

let proposal = GaussianProposal::new(&[0.5, 0.1]).unwrap();
let mut rng = SmallRng::seed_from_u64(42);
let candidate = proposal.sample(&[0.0, 0.0], &mut rng);
assert_eq!(candidate.len(), 2);
```
*/
#[derive(Debug, Clone)]
pub struct GaussianProposal {
    widths: Vec<f64>,
    noise: Vec<Normal<f64>>,
}

impl GaussianProposal {
    /// Creates a proposal with one standard deviation per dimension.
    ///
    /// Fails with [`McmcError::InvalidArgument`] if `widths` is empty or any
    /// entry is not strictly positive and finite.
    pub fn new(widths: &[f64]) -> Result<Self> {
        if widths.is_empty() {
            return Err(McmcError::invalid("proposal widths must not be empty"));
        }
        let noise = widths
            .iter()
            .enumerate()
            .map(|(d, &w)| {
                if !(w.is_finite() && w > 0.0) {
                    return Err(McmcError::invalid(format!(
                        "proposal width {d} must be positive and finite, got {w}"
                    )));
                }
                Normal::new(0.0, w).map_err(|e| McmcError::invalid(e.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            widths: widths.to_vec(),
            noise,
        })
    }

    pub fn widths(&self) -> &[f64] {
        &self.widths
    }

    pub fn dim(&self) -> usize {
        self.widths.len()
    }

    /// Samples a candidate from q(x' | x), drawing one normal per dimension in order.
    pub fn sample<R: Rng + ?Sized>(&self, current: &[f64], rng: &mut R) -> Vec<f64> {
        current
            .iter()
            .zip(&self.noise)
            .map(|(&x, normal)| x + normal.sample(rng))
            .collect()
    }

    /// Evaluates log q(to | from). Symmetric in its arguments.
    pub fn log_prob(&self, from: &[f64], to: &[f64]) -> f64 {
        from.iter()
            .zip(to)
            .zip(&self.widths)
            .map(|((&f, &t), &w)| {
                let z = (t - f) / w;
                -0.5 * z * z - w.ln() - 0.5 * (2.0 * PI).ln()
            })
            .sum()
    }
}

/**
A product of independent normals, `N(mean[d], std[d]^2)`.

Useful as a target with known moments when checking a sampler.

```rust
use mini_metropolis::distributions::{DiagGaussian, Target};

let target = DiagGaussian::new(vec![5.0], vec![2.0]).unwrap();
assert_eq!(target.unnorm_log_prob(&[7.0]).unwrap(), -0.5);
```
*/
#[derive(Debug, Clone, PartialEq)]
pub struct DiagGaussian {
    pub mean: Vec<f64>,
    pub std: Vec<f64>,
}

impl DiagGaussian {
    pub fn new(mean: Vec<f64>, std: Vec<f64>) -> Result<Self> {
        if mean.len() != std.len() {
            return Err(McmcError::invalid(format!(
                "mean has {} entries but std has {}",
                mean.len(),
                std.len()
            )));
        }
        if let Some(s) = std.iter().find(|s| !(s.is_finite() && **s > 0.0)) {
            return Err(McmcError::invalid(format!(
                "standard deviations must be positive, got {s}"
            )));
        }
        Ok(Self { mean, std })
    }
}

impl Target for DiagGaussian {
    fn unnorm_log_prob(&self, theta: &[f64]) -> std::result::Result<f64, BoxError> {
        if theta.len() != self.mean.len() {
            return Err(format!(
                "expected {} parameters, got {}",
                self.mean.len(),
                theta.len()
            )
            .into());
        }
        let sq: f64 = theta
            .iter()
            .zip(&self.mean)
            .zip(&self.std)
            .map(|((&x, &m), &s)| ((x - m) / s).powi(2))
            .sum();
        Ok(-0.5 * sq)
    }
}
