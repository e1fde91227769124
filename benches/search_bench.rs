// Bracket search benchmarks: proximity shortcut against full binary
// search, on smooth walks and on random jumps.

use criterion::{
    black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput,
};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;

use landscape::fixed::Fixed;
use landscape::search;

fn make_landscape(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = Pcg64Mcg::seed_from_u64(seed);
    let mut y = Vec::with_capacity(n);
    let mut acc = 0.0;
    for _ in 0..n {
        acc += rng.r#gen::<f64>() + 0.01;
        y.push(acc);
    }
    return y;
}

/// Positions drifting smoothly, the access pattern the proximity
/// search is built for.
fn smooth_walk(y: &[f64], steps: usize) -> Vec<f64> {
    let span = y[y.len() - 1] - y[0];
    let step = span / steps as f64;
    return (0..steps).map(|k| y[0] + step * (k as f64 + 0.5)).collect();
}

/// Uncorrelated positions, the worst case for a cached bracket.
fn random_jumps(y: &[f64], steps: usize, seed: u64) -> Vec<f64> {
    let mut rng = Pcg64Mcg::seed_from_u64(seed);
    let ymin = y[0];
    let ymax = y[y.len() - 1];
    return (0..steps)
        .map(|_| ymin + (ymax - ymin) * (0.000001 + 0.999998 * rng.r#gen::<f64>()))
        .collect();
}

fn bench_smooth_walk(c: &mut Criterion) {
    let mut group = c.benchmark_group("smooth_walk");
    let steps = 10_000;
    group.throughput(Throughput::Elements(steps as u64));

    for size in [1_000, 100_000] {
        let y = make_landscape(size, 42);
        let walk = smooth_walk(&y, steps);

        group.bench_with_input(BenchmarkId::new("proximity", size), &walk, |b, walk| {
            b.iter(|| {
                let mut cursor = Fixed::new(walk[0], y.clone()).unwrap();
                for &x in walk {
                    cursor.set_position(x).unwrap();
                }
                black_box(cursor.index())
            });
        });

        group.bench_with_input(BenchmarkId::new("full", size), &walk, |b, walk| {
            b.iter(|| {
                let mut cursor = Fixed::new(walk[0], y.clone()).unwrap();
                cursor.set_proximity(0);
                for &x in walk {
                    cursor.set_position(x).unwrap();
                }
                black_box(cursor.index())
            });
        });
    }

    group.finish();
}

fn bench_random_jumps(c: &mut Criterion) {
    let mut group = c.benchmark_group("random_jumps");
    let steps = 10_000;
    group.throughput(Throughput::Elements(steps as u64));

    for size in [1_000, 100_000] {
        let y = make_landscape(size, 42);
        let jumps = random_jumps(&y, steps, 7);

        group.bench_with_input(BenchmarkId::new("proximity", size), &jumps, |b, jumps| {
            b.iter(|| {
                let mut li = 0;
                for &x in jumps {
                    li = search::from_guess(&y, x, li, search::DEFAULT_PROXIMITY);
                }
                black_box(li)
            });
        });

        group.bench_with_input(BenchmarkId::new("full", size), &jumps, |b, jumps| {
            b.iter(|| {
                let mut li = 0;
                for &x in jumps {
                    li = search::full(&y, x);
                }
                black_box(li)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_smooth_walk, bench_random_jumps);
criterion_main!(benches);
