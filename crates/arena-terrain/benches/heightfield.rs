use arena_terrain::*;
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use glam::DVec2;

fn arena_config() -> GenerationConfig {
    GenerationConfig {
        domain_size: (256.0, 256.0),
        grid_divisions: (32, 32),
        max_points_per_cell: 10,
        metric: DistanceMetric::Euclidean,
        kth_nearest: 1,
        seed: Some(42),
    }
}

fn bench_distance(c: &mut Criterion) {
    let a = black_box(DVec2::new(12.5, 3.0));
    let b = black_box(DVec2::new(-4.0, 9.25));
    for metric in DistanceMetric::ALL {
        c.bench_function(&format!("distance_{}", metric.name()), |bencher| {
            bencher.iter(|| black_box(distance(a, b, metric)))
        });
    }
}

fn bench_field_build(c: &mut Criterion) {
    let config = arena_config();
    c.bench_function("feature_field_32x32", |bencher| {
        bencher.iter(|| black_box(FeaturePointField::build(&config)))
    });
}

fn bench_sample(c: &mut Criterion) {
    let config = arena_config();
    let field = FeaturePointField::build(&config).expect("valid config");
    let sampler = NoiseSampler::new(&field, &config);
    let point = black_box(DVec2::new(100.3, 77.9));
    c.bench_function("sample_f1", |bencher| {
        bencher.iter(|| black_box(sampler.sample(point)))
    });
}

fn bench_parallel_fill(c: &mut Criterion) {
    let config = arena_config();
    let field = FeaturePointField::build(&config).expect("valid config");
    let mut group = c.benchmark_group("heightfield_256");
    for workers in [1, 2, 4, 8] {
        group.bench_function(format!("{workers}_workers"), |bencher| {
            bencher.iter(|| black_box(build_heightfield((256, 256), &field, &config, workers)))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_distance,
    bench_field_build,
    bench_sample,
    bench_parallel_fill
);
criterion_main!(benches);
