use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use cascade_benchmarks::{all_regimes, batch_of, bench_config, bench_policy};
use cascade_search::{find_paths, solve, GreedyRollout, UniformRollout};
use cascade_validator::LevelValidator;

// ---------------------------------------------------------------------------
// Engine throughput: each solver on its own
// ---------------------------------------------------------------------------

fn bench_solvers(c: &mut Criterion) {
    let mut group = c.benchmark_group("solver");
    group.sample_size(20);

    for regime in all_regimes() {
        let greedy = GreedyRollout {
            greediness: regime.policy.rollout_greediness,
        };
        group.bench_function(BenchmarkId::new("mcts/greedy", regime.name), |b| {
            b.iter(|| black_box(solve(&regime.level, &regime.policy, &greedy, 5)));
        });
        group.bench_function(BenchmarkId::new("mcts/uniform", regime.name), |b| {
            b.iter(|| black_box(solve(&regime.level, &regime.policy, &UniformRollout, 5)));
        });
        group.bench_function(BenchmarkId::new("path_finder", regime.name), |b| {
            b.iter(|| black_box(find_paths(&regime.level, &regime.policy, 5)));
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Validator throughput: every analyzer plus combination
// ---------------------------------------------------------------------------

fn bench_validate_level(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate_level");
    group.sample_size(20);

    for regime in all_regimes() {
        let validator =
            LevelValidator::new(bench_config(regime.policy.clone())).expect("bench config");
        group.bench_function(regime.name, |b| {
            b.iter(|| black_box(validator.validate_level(&regime.level)));
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Batch throughput by worker count
// ---------------------------------------------------------------------------

fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate_level_batch");
    group.sample_size(10);

    let levels = batch_of(16);
    for workers in [1usize, 2, 4] {
        let config = cascade_validator::ValidatorConfig {
            max_concurrent_validations: workers,
            ..bench_config(bench_policy(100, 500))
        };
        let validator = LevelValidator::new(config).expect("bench config");
        group.bench_with_input(BenchmarkId::from_parameter(workers), &levels, |b, ls| {
            b.iter(|| black_box(validator.validate_level_batch(ls)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_solvers, bench_validate_level, bench_batch);
criterion_main!(benches);
