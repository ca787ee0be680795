use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use nalgebra::Vector6;

use integrated_states::interpolators::create_state_interpolator;
use integrated_states::StateHistory;

/// Circular orbit sampled every minute for a day
fn circular_orbit() -> StateHistory<f64, Vector6<f64>> {
    let radius = 7.0e6;
    let rate = 1.0e-3;
    (0..1440)
        .map(|i| {
            let t = i as f64 * 60.0;
            let (s, c) = (rate * t).sin_cos();
            (
                t,
                Vector6::new(
                    radius * c,
                    radius * s,
                    0.0,
                    -radius * rate * s,
                    radius * rate * c,
                    0.0,
                ),
            )
        })
        .collect()
}

fn bench_build(c: &mut Criterion) {
    c.bench_function("lagrange/build_1440_states", |b| {
        b.iter_batched(
            circular_orbit,
            |history| black_box(create_state_interpolator(history)),
            BatchSize::SmallInput,
        )
    });
}

fn bench_evaluate(c: &mut Criterion) {
    let interpolator = match create_state_interpolator(circular_orbit()) {
        Ok(interpolator) => interpolator,
        Err(err) => panic!("failed to build interpolator: {err}"),
    };

    c.bench_function("lagrange/evaluate_between_nodes", |b| {
        let mut t = 0.0;
        b.iter(|| {
            t = (t + 97.3) % 86_000.0;
            black_box(interpolator.interpolate(black_box(t)))
        })
    });
}

criterion_group!(benches, bench_build, bench_evaluate);
criterion_main!(benches);
