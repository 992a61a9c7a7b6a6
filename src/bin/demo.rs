//! Runs the Metropolis sampler on one of the bundled posteriors and prints a
//! posterior summary.
//!
//! ```text
//! cargo run --release --bin demo -- --model line --steps 10000 --burn-in 2000
//! RUST_LOG=debug cargo run --bin demo -- --model linear --widths 0.1,0.1
//! ```

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::info;

use mini_metropolis::distributions::{DiagGaussian, Target};
use mini_metropolis::metropolis::MetropolisHastings;
use mini_metropolis::models::{EmissionLine, LinearModel, EMISSION_LINE_TRUTH};
use mini_metropolis::stats::summarize;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Model {
    /// 1D normal with mean 5 and standard deviation 2
    Gaussian,
    /// Straight line y = 2.5 x - 1 with noise 0.5
    Linear,
    /// Gaussian emission line on a flat continuum
    Line,
}

#[derive(Parser, Debug)]
#[command(
    name = "demo",
    version,
    about = "Random-walk Metropolis on a few classic posteriors"
)]
struct Cli {
    #[arg(short, long, value_enum, default_value = "linear")]
    model: Model,

    /// Number of sampler steps
    #[arg(short, long, default_value = "10000")]
    steps: usize,

    /// Steps discarded before summarizing
    #[arg(short, long, default_value = "1000")]
    burn_in: usize,

    /// Keep every n-th step after burn-in
    #[arg(short, long, default_value = "1")]
    thin: usize,

    #[arg(long, default_value = "42")]
    seed: u64,

    /// Proposal widths, one per parameter (comma separated)
    #[arg(short, long, value_delimiter = ',', allow_hyphen_values = true)]
    widths: Option<Vec<f64>>,

    /// Starting point, one value per parameter (comma separated)
    #[arg(short, long, value_delimiter = ',', allow_hyphen_values = true)]
    initial: Option<Vec<f64>>,

    /// Show a progress bar
    #[arg(long)]
    progress: bool,
}

/// Defaults for one model: parameter names, start point and widths.
struct Setup {
    names: &'static [&'static str],
    initial: Vec<f64>,
    widths: Vec<f64>,
    truth: Vec<f64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into()),
        )
        .init();

    let cli = Cli::parse();
    let mut data_rng = SmallRng::seed_from_u64(cli.seed);

    match cli.model {
        Model::Gaussian => {
            let target = DiagGaussian::new(vec![5.0], vec![2.0])?;
            let setup = Setup {
                names: &["x"],
                initial: vec![0.0],
                widths: vec![2.5],
                truth: vec![5.0],
            };
            sample(&cli, target, setup)
        }
        Model::Linear => {
            let target = LinearModel::synthetic(2.5, -1.0, 30, 0.5, &mut data_rng)?;
            let setup = Setup {
                names: &["m", "b"],
                initial: vec![0.0, 0.0],
                widths: vec![0.5, 0.5],
                truth: vec![2.5, -1.0],
            };
            sample(&cli, target, setup)
        }
        Model::Line => {
            let target = EmissionLine::synthetic(200, &mut data_rng)?;
            let setup = Setup {
                names: &["amplitude", "center", "width", "continuum"],
                initial: vec![0.8, 6524.0, 2.5, 0.4],
                widths: vec![0.05, 0.1, 0.05, 0.02],
                truth: EMISSION_LINE_TRUTH.to_vec(),
            };
            sample(&cli, target, setup)
        }
    }
}

fn sample<T: Target>(cli: &Cli, target: T, setup: Setup) -> Result<()> {
    let initial = cli.initial.clone().unwrap_or(setup.initial);
    let widths = cli.widths.clone().unwrap_or(setup.widths);
    if initial.len() != setup.names.len() {
        bail!(
            "{:?} has {} parameters, got {} initial values",
            cli.model,
            setup.names.len(),
            initial.len()
        );
    }
    if cli.burn_in >= cli.steps {
        bail!(
            "burn-in ({}) must be smaller than the number of steps ({})",
            cli.burn_in,
            cli.steps
        );
    }

    let mh = MetropolisHastings::new(target, initial, widths).set_seed(cli.seed);
    info!(model = ?cli.model, steps = cli.steps, seed = cli.seed, "sampling");
    let chain = if cli.progress {
        mh.run_progress(cli.steps)
    } else {
        mh.run(cli.steps)
    }
    .context("sampling failed")?;

    let kept = chain.thin(cli.burn_in, cli.thin)?;
    let summary = summarize(kept.view()).context("could not summarize chain")?;

    println!(
        "Acceptance fraction: {:.3} ({} steps, {} kept)",
        chain.acceptance_rate(),
        chain.len(),
        kept.nrows()
    );
    for ((name, s), truth) in setup.names.iter().zip(&summary).zip(&setup.truth) {
        println!(
            "Estimated {name}: {s:.3}  [16%: {:.3}, 84%: {:.3}]  true: {truth}",
            s.q16, s.q84
        );
    }
    Ok(())
}
