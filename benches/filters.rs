//! Benchmarks for the built-in filters

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use imagerie::prelude::*;

fn create_test_buffer(size: usize, channels: usize) -> PixelBuffer {
    let mut buffer = PixelBuffer::new(size, size, channels).unwrap();
    // Varied surface with some structure
    for y in 0..size {
        for x in 0..size {
            let v = ((y * 7 + x * 13) % 256) as f64;
            for c in 0..channels {
                buffer.set_sample(y, x, c, v).unwrap();
            }
        }
    }
    buffer
}

fn bench_filter(c: &mut Criterion, group_name: &str, filter: &dyn Filter, channels: usize) {
    let _ = env_logger::try_init();
    let mut group = c.benchmark_group(group_name);
    for size in [128, 256, 512] {
        let buffer = create_test_buffer(size, channels);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter_batched(
                || buffer.clone(),
                |mut buf| filter.apply(black_box(&mut buf)).unwrap(),
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

fn bench_smoothing(c: &mut Criterion) {
    bench_filter(c, "smoothing/mean", &MeanFilter::new(5).unwrap(), 3);
    bench_filter(c, "smoothing/gaussian", &GaussianFilter::default(), 3);
    bench_filter(c, "smoothing/bilateral", &BilateralFilter::default(), 1);
}

fn bench_rank(c: &mut Criterion) {
    bench_filter(c, "rank/median", &MedianFilter::new(5).unwrap(), 1);
    bench_filter(c, "rank/min", &MinFilter::default(), 1);
}

fn bench_edge(c: &mut Criterion) {
    bench_filter(c, "edge/sobel", &SobelFilter, 1);
    bench_filter(c, "edge/canny", &CannyFilter::default(), 1);
}

fn bench_morphology(c: &mut Criterion) {
    bench_filter(c, "morphology/erode", &Erosion::new(3).unwrap(), 1);
    let disk = StructuringElement::disk(2.0).unwrap();
    bench_filter(c, "morphology/opening_disk", &Opening::with_element(disk), 1);
}

fn bench_point(c: &mut Criterion) {
    let mut group = c.benchmark_group("point/equalize");
    for size in [128, 256, 512] {
        let image = Image::from_buffer(create_test_buffer(size, 3));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter_batched(
                || image.clone(),
                |mut img| img.equalize_histogram(),
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_smoothing,
    bench_rank,
    bench_edge,
    bench_morphology,
    bench_point,
);
criterion_main!(benches);
