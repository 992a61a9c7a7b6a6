/*!
Ready-made posteriors for two classic fitting problems.

- [`LinearModel`]: straight line `y = m x + b` with known Gaussian noise and a
  bounded uniform prior on `(m, b)`.
- [`EmissionLine`]: a Gaussian spectral line on a flat continuum, parameters
  `[amplitude, center, width, continuum]`.

Both come with synthetic data generators so that a fit can be checked against
known true values.
*/

use ndarray::{Array1, Zip};
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::distributions::Target;
use crate::error::{BoxError, McmcError, Result};

fn check_data(x: &Array1<f64>, y: &Array1<f64>, noise: f64) -> Result<()> {
    if x.len() != y.len() {
        return Err(McmcError::invalid(format!(
            "x has {} points but y has {}",
            x.len(),
            y.len()
        )));
    }
    if x.is_empty() {
        return Err(McmcError::invalid("data must not be empty"));
    }
    if !(noise.is_finite() && noise > 0.0) {
        return Err(McmcError::invalid(format!(
            "noise level must be positive, got {noise}"
        )));
    }
    Ok(())
}

fn check_dim(theta: &[f64], expected: usize) -> std::result::Result<(), BoxError> {
    if theta.len() != expected {
        return Err(format!("expected {expected} parameters, got {}", theta.len()).into());
    }
    Ok(())
}

fn add_noise<R: Rng + ?Sized>(y: &mut Array1<f64>, noise: f64, rng: &mut R) -> Result<()> {
    if noise == 0.0 {
        return Ok(());
    }
    let normal = Normal::new(0.0, noise).map_err(|e| McmcError::invalid(e.to_string()))?;
    y.iter_mut().for_each(|v| *v += normal.sample(rng));
    Ok(())
}

/**
Posterior for a straight-line fit.

`log_likelihood(m, b) = -0.5 Σ ((y_i - (m x_i + b)) / sigma)^2` and the prior is
uniform on the open box `lower < m, b < upper` (default `(-10, 10)`).

# Examples

```rust
use mini_metropolis::distributions::Target;
use mini_metropolis::models::LinearModel;
use ndarray::Array1;

let x = Array1::range(0.0, 10.0, 1.0);
let y = x.mapv(|x| 2.5 * x - 1.0);
let model = LinearModel::new(x, y, 0.5).unwrap();
assert_eq!(model.unnorm_log_prob(&[2.5, -1.0]).unwrap(), 0.0);
assert_eq!(model.unnorm_log_prob(&[11.0, 0.0]).unwrap(), f64::NEG_INFINITY);
```
*/
#[derive(Debug, Clone, PartialEq)]
pub struct LinearModel {
    pub x: Array1<f64>,
    pub y: Array1<f64>,
    /// Known standard deviation of the measurement noise.
    pub sigma: f64,
    bounds: (f64, f64),
}

impl LinearModel {
    pub fn new(x: Array1<f64>, y: Array1<f64>, sigma: f64) -> Result<Self> {
        check_data(&x, &y, sigma)?;
        Ok(Self {
            x,
            y,
            sigma,
            bounds: (-10.0, 10.0),
        })
    }

    /// Sets the open interval of the uniform prior on both `m` and `b`.
    pub fn with_bounds(mut self, lower: f64, upper: f64) -> Result<Self> {
        if !(lower < upper) {
            return Err(McmcError::invalid(format!(
                "prior bounds must satisfy lower < upper, got ({lower}, {upper})"
            )));
        }
        self.bounds = (lower, upper);
        Ok(self)
    }

    pub fn bounds(&self) -> (f64, f64) {
        self.bounds
    }

    /// Generates `n` points on `x = linspace(0, 10, n)` with
    /// `y = m x + b + Normal(0, noise)`. A `noise` of zero gives an exact line.
    pub fn synthetic<R: Rng + ?Sized>(
        m: f64,
        b: f64,
        n: usize,
        noise: f64,
        rng: &mut R,
    ) -> Result<Self> {
        let x = Array1::linspace(0.0, 10.0, n);
        let mut y = x.mapv(|x| m * x + b);
        add_noise(&mut y, noise, rng)?;
        let sigma = if noise > 0.0 { noise } else { 0.5 };
        Self::new(x, y, sigma)
    }

    pub fn log_prior(&self, m: f64, b: f64) -> f64 {
        let (lo, hi) = self.bounds;
        if lo < m && m < hi && lo < b && b < hi {
            0.0
        } else {
            f64::NEG_INFINITY
        }
    }

    pub fn log_likelihood(&self, m: f64, b: f64) -> f64 {
        let sq: f64 = Zip::from(&self.x)
            .and(&self.y)
            .fold(0.0, |acc, &x, &y| acc + ((y - (m * x + b)) / self.sigma).powi(2));
        -0.5 * sq
    }
}

impl Target for LinearModel {
    fn unnorm_log_prob(&self, theta: &[f64]) -> std::result::Result<f64, BoxError> {
        check_dim(theta, 2)?;
        let (m, b) = (theta[0], theta[1]);
        let lp = self.log_prior(m, b);
        if !lp.is_finite() {
            return Ok(f64::NEG_INFINITY);
        }
        Ok(lp + self.log_likelihood(m, b))
    }
}

/// True parameters used by [`EmissionLine::synthetic`]:
/// amplitude, center, width, continuum.
pub const EMISSION_LINE_TRUTH: [f64; 4] = [1.2, 6525.3, 1.8, 0.5];

/**
Posterior for a Gaussian emission line on a flat continuum.

Parameters are `[amplitude, center, width, continuum]`; the model is
`continuum + amplitude * exp(-0.5 ((x - center) / width)^2)`. Points with
`width <= 0` or `amplitude < 0` have zero probability.
*/
#[derive(Debug, Clone, PartialEq)]
pub struct EmissionLine {
    /// Wavelength grid.
    pub x: Array1<f64>,
    /// Observed flux.
    pub y: Array1<f64>,
    pub sigma_noise: f64,
}

impl EmissionLine {
    pub fn new(x: Array1<f64>, y: Array1<f64>, sigma_noise: f64) -> Result<Self> {
        check_data(&x, &y, sigma_noise)?;
        Ok(Self { x, y, sigma_noise })
    }

    /// Evaluates the line profile at every wavelength.
    pub fn profile(params: &[f64; 4], x: &Array1<f64>) -> Array1<f64> {
        let [amp, center, width, cont] = *params;
        x.mapv(|x| cont + amp * (-0.5 * ((x - center) / width).powi(2)).exp())
    }

    /// `n` points on `linspace(6000, 6550, n)` around [`EMISSION_LINE_TRUTH`]
    /// with noise 0.08.
    pub fn synthetic<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Result<Self> {
        const NOISE: f64 = 0.08;
        let x = Array1::linspace(6000.0, 6550.0, n);
        let mut y = Self::profile(&EMISSION_LINE_TRUTH, &x);
        add_noise(&mut y, NOISE, rng)?;
        Self::new(x, y, NOISE)
    }
}

impl Target for EmissionLine {
    fn unnorm_log_prob(&self, theta: &[f64]) -> std::result::Result<f64, BoxError> {
        check_dim(theta, 4)?;
        let [amp, center, width, cont] = [theta[0], theta[1], theta[2], theta[3]];
        if width <= 0.0 || amp < 0.0 {
            return Ok(f64::NEG_INFINITY);
        }
        let sq: f64 = Zip::from(&self.x).and(&self.y).fold(0.0, |acc, &x, &y| {
            let model = cont + amp * (-0.5 * ((x - center) / width).powi(2)).exp();
            acc + ((y - model) / self.sigma_noise).powi(2)
        });
        Ok(-0.5 * sq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn exact_line() -> LinearModel {
        let x = Array1::range(0.0, 10.0, 1.0);
        let y = x.mapv(|x| 2.5 * x - 1.0);
        LinearModel::new(x, y, 0.5).unwrap()
    }

    #[test]
    fn linear_likelihood_is_chi_square() {
        let model = exact_line();
        // every residual is 1.0, i.e. 2 sigma
        assert_abs_diff_eq!(model.log_likelihood(2.5, 0.0), -0.5 * 10.0 * 4.0);
        assert_eq!(model.unnorm_log_prob(&[2.5, -1.0]).unwrap(), 0.0);
    }

    #[test]
    fn linear_prior_is_open_box() {
        let model = exact_line();
        assert_eq!(model.log_prior(9.99, -9.99), 0.0);
        assert_eq!(model.log_prior(10.0, 0.0), f64::NEG_INFINITY);
        assert_eq!(model.log_prior(0.0, -10.0), f64::NEG_INFINITY);

        let narrow = exact_line().with_bounds(0.0, 3.0).unwrap();
        assert_eq!(
            narrow.unnorm_log_prob(&[2.5, -1.0]).unwrap(),
            f64::NEG_INFINITY
        );
        assert!(exact_line().with_bounds(1.0, 1.0).is_err());
    }

    #[test]
    fn models_reject_wrong_dimension() {
        let model = exact_line();
        assert!(model.unnorm_log_prob(&[1.0]).is_err());
        let line = EmissionLine::synthetic(50, &mut SmallRng::seed_from_u64(0)).unwrap();
        assert!(line.unnorm_log_prob(&[1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn mismatched_data_is_rejected() {
        let x = Array1::linspace(0.0, 1.0, 5);
        let y = Array1::zeros(4);
        assert!(matches!(
            LinearModel::new(x.clone(), y.clone(), 0.5),
            Err(McmcError::InvalidArgument(_))
        ));
        assert!(EmissionLine::new(x.clone(), y, 0.08).is_err());
        assert!(LinearModel::new(x.clone(), x, 0.0).is_err());
    }

    #[test]
    fn synthetic_line_without_noise_is_exact() {
        let mut rng = SmallRng::seed_from_u64(1);
        let model = LinearModel::synthetic(2.5, -1.0, 30, 0.0, &mut rng).unwrap();
        assert_eq!(model.x.len(), 30);
        assert_abs_diff_eq!(model.x[29], 10.0);
        assert_abs_diff_eq!(model.y[29], 24.0, epsilon = 1e-12);
        assert_abs_diff_eq!(model.unnorm_log_prob(&[2.5, -1.0]).unwrap(), 0.0, epsilon = 1e-20);
    }

    #[test]
    fn emission_line_support_and_peak() {
        let mut rng = SmallRng::seed_from_u64(42);
        let line = EmissionLine::synthetic(200, &mut rng).unwrap();
        assert_eq!(line.x.len(), 200);

        assert_eq!(
            line.unnorm_log_prob(&[1.2, 6525.3, 0.0, 0.5]).unwrap(),
            f64::NEG_INFINITY
        );
        assert_eq!(
            line.unnorm_log_prob(&[-0.1, 6525.3, 1.8, 0.5]).unwrap(),
            f64::NEG_INFINITY
        );

        let at_truth = line.unnorm_log_prob(&EMISSION_LINE_TRUTH).unwrap();
        let off = line.unnorm_log_prob(&[1.2, 6520.0, 1.8, 0.5]).unwrap();
        assert!(at_truth.is_finite());
        assert!(at_truth > off);

        let peak = EmissionLine::profile(&EMISSION_LINE_TRUTH, &Array1::from(vec![6525.3]));
        assert_abs_diff_eq!(peak[0], 1.7);
    }
}
