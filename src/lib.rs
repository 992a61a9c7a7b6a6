//! # Mini Metropolis
//!
//! A compact random-walk **Metropolis** sampler for real-valued parameter
//! vectors.
//!
//! You provide a log-posterior (any `Fn(&[f64]) -> f64`, or a type implementing
//! [`distributions::Target`]), a starting point, one proposal width per
//! parameter, and a random source. The sampler returns a [`chain::Chain`] with
//! one row per step; rejected steps repeat the previous state.
//!
//! ## Example: fitting a straight line
//!
//! ```rust
//! use mini_metropolis::metropolis::run;
//! use mini_metropolis::models::LinearModel;
//! use mini_metropolis::stats::summarize;
//! use ndarray::Array1;
//! use rand::rngs::SmallRng;
//! use rand::SeedableRng;
//!
//! let x = Array1::range(0.0, 10.0, 1.0);
//! let y = x.mapv(|x| 2.5 * x - 1.0);
//! let model = LinearModel::new(x, y, 0.5).unwrap();
//!
//! let mut rng = SmallRng::seed_from_u64(42);
//! let chain = run(&model, &[0.0, 0.0], &[0.5, 0.5], 20_000, &mut rng).unwrap();
//!
//! // Discard burn-in before looking at the posterior.
//! let summary = summarize(chain.discard(2_000)).unwrap();
//! assert!((summary[0].mean - 2.5).abs() < 0.2);
//! assert!((summary[1].mean + 1.0).abs() < 0.2);
//! ```
//!
//! ## Modules
//!
//! - [`metropolis`]: the sampler.
//! - [`distributions`]: the `Target` trait and the Gaussian proposal.
//! - [`core`]: the `MarkovChain` trait and chain-driving loops.
//! - [`chain`]: the sampler output and burn-in/thinning helpers.
//! - [`stats`]: per-parameter posterior summaries.
//! - [`models`]: line-fit and emission-line posteriors.

pub mod chain;
pub mod core;
pub mod distributions;
pub mod error;
pub mod metropolis;
pub mod models;
pub mod stats;

pub use chain::Chain;
pub use error::{McmcError, Result};
pub use metropolis::{run, MetropolisChain, MetropolisHastings};
