use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use mini_metropolis::core::MarkovChain;
use mini_metropolis::distributions::DiagGaussian;
use mini_metropolis::metropolis::{run, MetropolisChain};
use mini_metropolis::models::EmissionLine;
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn normal_target(dim: usize) -> DiagGaussian {
    DiagGaussian::new(vec![3.0; dim], vec![1.0; dim]).unwrap()
}

fn criterion_benchmark(c: &mut Criterion) {
    for dim in [1, 10, 100] {
        let target = normal_target(dim);
        let init = vec![0.0; dim];
        let widths = vec![2.4 / (dim as f64).sqrt(); dim];
        c.bench_function(&format!("run 1000 steps normal {dim}"), |b| {
            b.iter_batched(
                || SmallRng::seed_from_u64(42),
                |mut rng| run(&target, black_box(&init), &widths, 1_000, &mut rng).unwrap(),
                BatchSize::SmallInput,
            )
        });
    }

    let target = normal_target(10);
    let mut chain =
        MetropolisChain::new(&target, &[0.0; 10], &[0.75; 10], SmallRng::seed_from_u64(42))
            .unwrap();
    c.bench_function("single step normal 10", |b| {
        b.iter(|| {
            chain.step().unwrap();
        })
    });

    let line = EmissionLine::synthetic(200, &mut SmallRng::seed_from_u64(42)).unwrap();
    c.bench_function("run 1000 steps emission line", |b| {
        b.iter_batched(
            || SmallRng::seed_from_u64(0),
            |mut rng| {
                run(
                    &line,
                    &[0.8, 6524.0, 2.5, 0.4],
                    &[0.05, 0.1, 0.05, 0.02],
                    1_000,
                    &mut rng,
                )
                .unwrap()
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
