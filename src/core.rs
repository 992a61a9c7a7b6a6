//! The stepping interface shared by Markov chains and the loops that drive them.

use indicatif::ProgressBar;
use ndarray::Array2;

use crate::chain::Chain;
use crate::error::Result;

pub trait MarkovChain {
    /// Does one iteration of the chain, returning the state recorded for it.
    fn step(&mut self) -> Result<&[f64]>;

    /// The current state without stepping.
    fn current_state(&self) -> &[f64];

    /// Number of accepted proposals so far.
    fn n_accepted(&self) -> usize;
}

/// Runs `chain` for `n_steps` iterations and records every state.
///
/// The returned chain's acceptance count covers these `n_steps` only.
pub fn run_chain<M>(chain: &mut M, n_steps: usize) -> Result<Chain>
where
    M: MarkovChain + ?Sized,
{
    drive(chain, n_steps, |_| {})
}

/// Like [`run_chain`], ticking `pb` once per step.
pub fn run_chain_with_progress<M>(chain: &mut M, n_steps: usize, pb: &ProgressBar) -> Result<Chain>
where
    M: MarkovChain + ?Sized,
{
    pb.set_length(n_steps as u64);
    let out = drive(chain, n_steps, |_| pb.inc(1));
    match &out {
        Ok(c) => pb.finish_with_message(format!("accept {:.3}", c.acceptance_rate())),
        Err(_) => pb.abandon_with_message("failed"),
    }
    out
}

fn drive<M, F>(chain: &mut M, n_steps: usize, mut on_step: F) -> Result<Chain>
where
    M: MarkovChain + ?Sized,
    F: FnMut(usize),
{
    let dim = chain.current_state().len();
    let accepted_before = chain.n_accepted();
    let mut out = Array2::<f64>::zeros((n_steps, dim));

    for i in 0..n_steps {
        let state = chain.step()?;
        out.row_mut(i)
            .iter_mut()
            .zip(state)
            .for_each(|(dst, &x)| *dst = x);
        on_step(i);
    }

    Ok(Chain::new(out, chain.n_accepted() - accepted_before))
}
