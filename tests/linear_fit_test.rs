//! End-to-end fits of the bundled models: the posterior mean should recover
//! the parameters the data were generated from.

use mini_metropolis::metropolis::run;
use mini_metropolis::models::{EmissionLine, LinearModel, EMISSION_LINE_TRUTH};
use mini_metropolis::stats::summarize;
use ndarray::Array1;
use rand::rngs::SmallRng;
use rand::SeedableRng;

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const SEED: u64 = 42;

    #[test]
    fn test_noiseless_line_fit() {
        const N_STEPS: usize = 20_000;
        const BURNIN: usize = 2_000;

        let x = Array1::range(0.0, 10.0, 1.0);
        let y = x.mapv(|x| 2.5 * x - 1.0);
        let model = LinearModel::new(x, y, 0.5).unwrap();

        let mut rng = SmallRng::seed_from_u64(SEED);
        let chain = run(&model, &[0.0, 0.0], &[0.5, 0.5], N_STEPS, &mut rng).unwrap();
        assert_eq!(chain.len(), N_STEPS);

        let summary = summarize(chain.discard(BURNIN)).unwrap();
        assert_abs_diff_eq!(summary[0].mean, 2.5, epsilon = 0.2);
        assert_abs_diff_eq!(summary[1].mean, -1.0, epsilon = 0.2);
    }

    #[test]
    fn test_noiseless_line_fit_as_closure() {
        let xs: Vec<f64> = (0..10).map(f64::from).collect();
        let ys: Vec<f64> = xs.iter().map(|x| 2.5 * x - 1.0).collect();
        let log_posterior = |theta: &[f64]| {
            let (m, b) = (theta[0], theta[1]);
            -0.5 * xs
                .iter()
                .zip(&ys)
                .map(|(x, y)| ((y - (m * x + b)) / 0.5).powi(2))
                .sum::<f64>()
        };

        let mut rng = SmallRng::seed_from_u64(SEED);
        let chain = run(&log_posterior, &[0.0, 0.0], &[0.5, 0.5], 20_000, &mut rng).unwrap();
        let summary = summarize(chain.discard(2_000)).unwrap();
        assert_abs_diff_eq!(summary[0].mean, 2.5, epsilon = 0.2);
        assert_abs_diff_eq!(summary[1].mean, -1.0, epsilon = 0.2);
    }

    #[test]
    fn test_noisy_line_fit() {
        let mut rng = SmallRng::seed_from_u64(SEED);
        let model = LinearModel::synthetic(2.5, -1.0, 30, 0.5, &mut rng).unwrap();
        let chain = run(&model, &[0.0, 0.0], &[0.1, 0.1], 30_000, &mut rng).unwrap();

        let summary = summarize(chain.discard(5_000)).unwrap();
        // 30 points with sigma 0.5: posterior std is ~0.03 on m and ~0.2 on b
        assert_abs_diff_eq!(summary[0].mean, 2.5, epsilon = 0.15);
        assert_abs_diff_eq!(summary[1].mean, -1.0, epsilon = 0.8);
        assert!(summary[0].q16 < summary[0].median && summary[0].median < summary[0].q84);
    }

    #[test]
    fn test_emission_line_fit() {
        let mut rng = SmallRng::seed_from_u64(SEED);
        let line = EmissionLine::synthetic(200, &mut rng).unwrap();
        let chain = run(
            &line,
            &[0.8, 6524.0, 2.5, 0.4],
            &[0.05, 0.1, 0.05, 0.02],
            20_000,
            &mut SmallRng::seed_from_u64(0),
        )
        .unwrap();
        assert!(chain.acceptance_rate() > 0.0);

        let summary = summarize(chain.discard(5_000)).unwrap();
        let [_, center, width, continuum] = EMISSION_LINE_TRUTH;
        assert_abs_diff_eq!(summary[1].mean, center, epsilon = 1.0);
        assert_abs_diff_eq!(summary[2].mean, width, epsilon = 1.0);
        assert_abs_diff_eq!(summary[3].mean, continuum, epsilon = 0.05);
        for row in chain.samples().rows() {
            assert!(row[0] >= 0.0 && row[2] > 0.0);
        }
    }
}
