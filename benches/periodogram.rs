//! Benchmarks for periodograms and wavelet spectra.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use periodicity::periodogram::{
    periodogram, window, BootstrapConfig, FapMethod, PeriodogramConfig,
};
use periodicity::wavelet::{wavelet, WaveletConfig};

/// Jittered sampling times with unit median cadence.
fn generate_times(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| i as f64 + 0.3 * (i as f64 * 1.7).sin())
        .collect()
}

fn generate_signal(t: &[f64]) -> Vec<f64> {
    t.iter()
        .map(|&ti| {
            (2.0 * std::f64::consts::PI * ti / 12.0).sin()
                + 0.5 * (2.0 * std::f64::consts::PI * ti / 52.0).sin()
        })
        .collect()
}

fn bench_periodogram(c: &mut Criterion) {
    let mut group = c.benchmark_group("periodogram");

    for size in [128, 256, 512, 1024].iter() {
        let t = generate_times(*size);
        let x = generate_signal(&t);

        group.bench_with_input(BenchmarkId::new("power", size), size, |b, _| {
            let config = PeriodogramConfig::default();
            b.iter(|| periodogram(black_box(&t), black_box(&x), &config))
        });

        group.bench_with_input(BenchmarkId::new("baluev", size), size, |b, _| {
            let config = PeriodogramConfig::new()
                .with_fap_method(FapMethod::Baluev)
                .with_fap_levels(vec![0.1, 0.01, 0.001]);
            b.iter(|| periodogram(black_box(&t), black_box(&x), &config))
        });

        group.bench_with_input(BenchmarkId::new("window", size), size, |b, _| {
            b.iter(|| window(black_box(&t), 5.0))
        });
    }

    group.finish();
}

fn bench_bootstrap(c: &mut Criterion) {
    let mut group = c.benchmark_group("bootstrap");
    group.sample_size(10);

    let t = generate_times(200);
    let x = generate_signal(&t);

    for n_bootstraps in [50, 200].iter() {
        let config = PeriodogramConfig::new()
            .with_fap_method(FapMethod::Bootstrap)
            .with_bootstrap(BootstrapConfig::new(*n_bootstraps).with_seed(42));
        group.bench_with_input(
            BenchmarkId::new("resamples", n_bootstraps),
            n_bootstraps,
            |b, _| b.iter(|| periodogram(black_box(&t), black_box(&x), &config)),
        );
    }

    group.finish();
}

fn bench_wavelet(c: &mut Criterion) {
    let mut group = c.benchmark_group("wavelet");

    for size in [256, 512, 1024].iter() {
        let t = generate_times(*size);
        let x = generate_signal(&t);

        group.bench_with_input(BenchmarkId::new("n_periods_200", size), size, |b, _| {
            let config = WaveletConfig::new().with_n_periods(200);
            b.iter(|| wavelet(black_box(&t), black_box(&x), &config))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_periodogram, bench_bootstrap, bench_wavelet);
criterion_main!(benches);
