use blockgemm::{Config, KernelKind, ParamSet, multiply_accumulate, multiply_accumulate_with};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SIZES: &[usize] = &[31, 96, 191, 256, 511];

fn random_matrix(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n * n).map(|_| rng.gen_range(-1.0..1.0)).collect()
}

fn bench_default(c: &mut Criterion) {
    let mut group = c.benchmark_group("multiply_accumulate");
    for &n in SIZES {
        // 2n^3 flops per call
        group.throughput(Throughput::Elements(2 * (n as u64).pow(3)));
        let a = random_matrix(n, 1);
        let b = random_matrix(n, 2);
        let mut out = vec![0.0; n * n];

        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |bench, &n| {
            bench.iter(|| {
                let (a, b) = (black_box(&a), black_box(&b));
                multiply_accumulate(n, a, b, black_box(&mut out))
            });
        });
    }
    group.finish();
}

fn bench_param_sets(c: &mut Criterion) {
    let mut group = c.benchmark_group("param_sets");
    for &n in SIZES {
        group.throughput(Throughput::Elements(2 * (n as u64).pow(3)));
        let a = random_matrix(n, 3);
        let b = random_matrix(n, 4);
        let mut out = vec![0.0; n * n];

        for (label, params) in [("small", ParamSet::Small), ("large", ParamSet::Large)] {
            let config = Config::default().with_param_set(params);
            group.bench_with_input(BenchmarkId::new(label, n), &n, |bench, &n| {
                bench.iter(|| {
                    let (a, b) = (black_box(&a), black_box(&b));
                    multiply_accumulate_with(&config, n, a, b, black_box(&mut out))
                })
            });
        }
    }
    group.finish();
}

fn bench_kernels(c: &mut Criterion) {
    let n = 256;
    let a = random_matrix(n, 5);
    let b = random_matrix(n, 6);
    let mut out = vec![0.0; n * n];

    let mut group = c.benchmark_group("kernels");
    group.throughput(Throughput::Elements(2 * (n as u64).pow(3)));
    for kind in KernelKind::ALL.into_iter().filter(|k| k.is_available()) {
        let config = Config::default().with_kernel(kind);
        group.bench_function(kind.name(), |bench| {
            bench.iter(|| {
                let (a, b) = (black_box(&a), black_box(&b));
                multiply_accumulate_with(&config, n, a, b, black_box(&mut out))
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_default, bench_param_sets, bench_kernels);
criterion_main!(benches);
