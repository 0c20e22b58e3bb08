//! Benchmarks for the Patina aging chain.
//!
//! Run with: cargo bench -p patina-core

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{DynamicImage, Rgba, RgbaImage};
use patina_core::config::{EncodeConfig, LimitsConfig};
use patina_core::pipeline::{ImageOps, Partitioner, RasterOps};

fn photo() -> DynamicImage {
    DynamicImage::new_rgb8(1920, 1080)
}

fn ops() -> RasterOps {
    RasterOps::new(&EncodeConfig::default(), &LimitsConfig::default())
}

fn benchmark_contrast(c: &mut Criterion) {
    let ops = ops();
    let img = photo();

    c.bench_function("contrast_1080p", |b| {
        b.iter(|| ops.contrast(black_box(img.clone())))
    });
}

fn benchmark_smooth(c: &mut Criterion) {
    let ops = ops();
    let img = photo();

    c.bench_function("smooth_1080p", |b| {
        b.iter(|| ops.smooth(black_box(img.clone())))
    });
}

fn benchmark_texture(c: &mut Criterion) {
    let ops = ops();
    let img = photo();
    let watermark =
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(512, 512, Rgba([220, 210, 190, 96])));

    c.bench_function("texture_1080p", |b| {
        b.iter(|| ops.texture(black_box(img.clone()), &watermark))
    });
}

fn benchmark_sepia(c: &mut Criterion) {
    let ops = ops();
    let img = photo();

    c.bench_function("sepia_1080p", |b| {
        b.iter(|| ops.sepia(black_box(img.clone())))
    });
}

fn benchmark_partition(c: &mut Criterion) {
    let partitioner = Partitioner::new(8, 1024).unwrap();

    c.bench_function("partition_100k_items", |b| {
        b.iter(|| {
            (0..8)
                .map(|w| partitioner.indices(w, black_box(100_000)).count())
                .sum::<usize>()
        })
    });
}

criterion_group!(
    benches,
    benchmark_contrast,
    benchmark_smooth,
    benchmark_texture,
    benchmark_sepia,
    benchmark_partition,
);
criterion_main!(benches);
