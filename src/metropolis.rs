/*!
# Random-walk Metropolis sampler

A single-chain Metropolis sampler over real-valued parameter vectors. Each step
perturbs the current state with independent Gaussian noise (one width per
dimension), evaluates the caller's log-posterior at the candidate, and accepts
the move with probability `min(1, exp(Δ))` where `Δ` is the log-posterior
difference. Rejected steps repeat the previous state in the chain.

There are three ways in:

- [`run`]: a plain function taking the target, start point, widths, step count
  and a random source.
- [`MetropolisHastings`]: an owned, seedable configuration that can be run
  repeatedly.
- [`MetropolisChain`]: the step-by-step form, implementing
  [`MarkovChain`](crate::core::MarkovChain).

## Example

```rust
use mini_metropolis::metropolis::run;
use rand::rngs::SmallRng;
use rand::SeedableRng;

let log_posterior = |x: &[f64]| -0.5 * ((x[0] - 5.0) / 2.0).powi(2);
let mut rng = SmallRng::seed_from_u64(42);
let chain = run(&log_posterior, &[0.0], &[1.0], 1_000, &mut rng).unwrap();
assert_eq!(chain.len(), 1_000);
```
*/

use indicatif::{ProgressBar, ProgressStyle};
use rand::prelude::*;
use tracing::debug;

use crate::chain::Chain;
use crate::core::{run_chain, run_chain_with_progress, MarkovChain};
use crate::distributions::{eval_log_prob, GaussianProposal, Target};
use crate::error::{McmcError, Result};

/// Log acceptance ratio `lp_proposal - lp_current`.
///
/// Moving out of a zero-probability region gives `+∞`. When the difference is
/// undefined (both `-∞`, or both `+∞`) the result is `-∞`, so the move is
/// rejected.
pub fn log_accept_ratio(lp_current: f64, lp_proposal: f64) -> f64 {
    let delta = lp_proposal - lp_current;
    if delta.is_nan() {
        f64::NEG_INFINITY
    } else {
        delta
    }
}

/// Metropolis acceptance test for a uniform draw `u` in `[0, 1)`.
///
/// Equivalent to `u < exp(min(log_ratio, 0))`, evaluated in the log domain.
pub fn accept(log_ratio: f64, u: f64) -> bool {
    if log_ratio >= 0.0 {
        return true;
    }
    u.ln() < log_ratio
}

/**
Runs a random-walk Metropolis chain for `n_steps` steps.

Row `i` of the returned chain is the state after the accept/reject decision of
step `i`; the initial state itself is not recorded unless the first proposal
is rejected.

# Errors

- [`McmcError::InvalidArgument`] if `n_steps` is zero, `initial_state` is
  empty, the lengths of `initial_state` and `proposal_widths` differ, or a
  width is not strictly positive. Nothing is evaluated in that case.
- [`McmcError::LogpFailure`] / [`McmcError::NanLogp`] if the target fails or
  returns NaN. The run stops at once and no partial chain is returned.
*/
pub fn run<T, R>(
    log_posterior: &T,
    initial_state: &[f64],
    proposal_widths: &[f64],
    n_steps: usize,
    rng: &mut R,
) -> Result<Chain>
where
    T: Target + ?Sized,
    R: Rng + ?Sized,
{
    check_steps(n_steps)?;
    let mut chain = MetropolisChain::new(log_posterior, initial_state, proposal_widths, rng)?;
    debug!(n_steps, dim = initial_state.len(), "starting Metropolis run");
    let out = run_chain(&mut chain, n_steps)?;
    debug!(
        n_accepted = out.n_accepted(),
        acceptance_rate = out.acceptance_rate(),
        "Metropolis run finished"
    );
    Ok(out)
}

fn check_steps(n_steps: usize) -> Result<()> {
    if n_steps == 0 {
        return Err(McmcError::invalid("n_steps must be positive"));
    }
    Ok(())
}

/// A single random-walk Metropolis chain.
///
/// Borrows its target and owns its random source, so independent chains share
/// no mutable state.
pub struct MetropolisChain<'a, T: ?Sized, R> {
    target: &'a T,
    proposal: GaussianProposal,
    current_state: Vec<f64>,
    current_lp: f64,
    n_steps: usize,
    n_accepted: usize,
    rng: R,
}

impl<'a, T, R> MetropolisChain<'a, T, R>
where
    T: Target + ?Sized,
    R: Rng,
{
    /**
    Creates a chain positioned at `initial_state`.

    Validates the widths against the state, then evaluates the target once at
    the start point. A start point with log-posterior `-∞` is allowed.

    # Examples

    ```rust
    use mini_metropolis::core::MarkovChain;
    use mini_metropolis::metropolis::MetropolisChain;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    let target = |x: &[f64]| -0.5 * (x[0] * x[0] + x[1] * x[1]);
    let mut chain =
        MetropolisChain::new(&target, &[0.0, 0.0], &[1.0, 1.0], SmallRng::seed_from_u64(1))
            .unwrap();
    let state = chain.step().unwrap();
    assert_eq!(state.len(), 2);
    ```
    */
    pub fn new(
        target: &'a T,
        initial_state: &[f64],
        proposal_widths: &[f64],
        rng: R,
    ) -> Result<Self> {
        if initial_state.is_empty() {
            return Err(McmcError::invalid("initial state must not be empty"));
        }
        if initial_state.len() != proposal_widths.len() {
            return Err(McmcError::invalid(format!(
                "initial state has {} dimensions but {} proposal widths were given",
                initial_state.len(),
                proposal_widths.len()
            )));
        }
        let proposal = GaussianProposal::new(proposal_widths)?;
        let current_lp = eval_log_prob(target, initial_state)?;
        Ok(Self {
            target,
            proposal,
            current_state: initial_state.to_vec(),
            current_lp,
            n_steps: 0,
            n_accepted: 0,
            rng,
        })
    }

    /// Log-posterior at the current state.
    pub fn current_log_prob(&self) -> f64 {
        self.current_lp
    }

    pub fn proposal(&self) -> &GaussianProposal {
        &self.proposal
    }

    /// Number of steps taken so far.
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    pub fn acceptance_rate(&self) -> f64 {
        if self.n_steps == 0 {
            return 0.0;
        }
        self.n_accepted as f64 / self.n_steps as f64
    }
}

impl<T, R> MarkovChain for MetropolisChain<'_, T, R>
where
    T: Target + ?Sized,
    R: Rng,
{
    /**
    Performs one Metropolis update.

    The candidate is drawn from the proposal, the target is evaluated there,
    and a uniform number is always drawn so that the random stream advances
    identically on every step. The target value at the current state is
    carried over from the previous step.
    */
    fn step(&mut self) -> Result<&[f64]> {
        let proposed = self.proposal.sample(&self.current_state, &mut self.rng);
        let proposed_lp = eval_log_prob(self.target, &proposed)?;
        let log_ratio = log_accept_ratio(self.current_lp, proposed_lp);
        let u: f64 = self.rng.gen();
        if accept(log_ratio, u) {
            self.current_state = proposed;
            self.current_lp = proposed_lp;
            self.n_accepted += 1;
        }
        self.n_steps += 1;
        Ok(&self.current_state)
    }

    fn current_state(&self) -> &[f64] {
        &self.current_state
    }

    fn n_accepted(&self) -> usize {
        self.n_accepted
    }
}

/**
A reusable Metropolis sampler configuration.

Owns the target, start point, proposal widths and a seed. Every call to
[`run`](MetropolisHastings::run) starts again from the initial state with a
fresh `SmallRng` seeded from `seed`, so repeated calls with the same seed give
identical chains.

# Examples

```rust
use mini_metropolis::distributions::DiagGaussian;
use mini_metropolis::metropolis::MetropolisHastings;

let target = DiagGaussian::new(vec![0.0, 1.0], vec![1.0, 2.0]).unwrap();
let mh = MetropolisHastings::new(target, vec![0.0, 0.0], vec![1.0, 1.0]).set_seed(42);
let a = mh.run(500).unwrap();
let b = mh.run(500).unwrap();
assert_eq!(a, b);
```
*/
#[derive(Debug, Clone)]
pub struct MetropolisHastings<T> {
    /// The target distribution we want to sample from.
    pub target: T,
    /// Where every run starts.
    pub initial_state: Vec<f64>,
    /// One proposal standard deviation per dimension.
    pub proposal_widths: Vec<f64>,
    /// The random seed.
    pub seed: u64,
}

impl<T: Target> MetropolisHastings<T> {
    /// Creates a sampler with a random seed. Use [`set_seed`](Self::set_seed)
    /// for reproducible runs.
    pub fn new(target: T, initial_state: Vec<f64>, proposal_widths: Vec<f64>) -> Self {
        Self {
            target,
            initial_state,
            proposal_widths,
            seed: thread_rng().gen::<u64>(),
        }
    }

    pub fn set_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn run(&self, n_steps: usize) -> Result<Chain> {
        let mut rng = SmallRng::seed_from_u64(self.seed);
        run(
            &self.target,
            &self.initial_state,
            &self.proposal_widths,
            n_steps,
            &mut rng,
        )
    }

    /// Like [`run`](Self::run), drawing a progress bar on stderr.
    pub fn run_progress(&self, n_steps: usize) -> Result<Chain> {
        check_steps(n_steps)?;
        let mut chain = MetropolisChain::new(
            &self.target,
            &self.initial_state,
            &self.proposal_widths,
            SmallRng::seed_from_u64(self.seed),
        )?;
        let pb = ProgressBar::new(n_steps as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
                .map_err(|e| McmcError::invalid(e.to_string()))?
                .progress_chars("##-"),
        );
        debug!(n_steps, seed = self.seed, "starting Metropolis run");
        run_chain_with_progress(&mut chain, n_steps, &pb)
    }
}
