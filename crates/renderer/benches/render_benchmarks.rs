//! Benchmarks for map rendering and PNG encoding.
//!
//! Run with: cargo bench --package renderer --bench render_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use renderer::{draw_limb, encode_png, render_map, LimbStyle};
use solar_common::{Color, Mask};
use test_utils::synthetic_map;

const SIZES: &[usize] = &[256, 512, 1024];

fn bench_render_map(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_map");
    for &size in SIZES {
        let rsun = size as f64 * 0.4;
        let map = synthetic_map(size, 1.0, rsun);
        let center = (size as f64 - 1.0) / 2.0;
        let mask = Mask::from_fn(size, size, |col, row| {
            let (dx, dy) = (col as f64 - center, row as f64 - center);
            (dx * dx + dy * dy).sqrt() <= rsun
        });
        let masked = map.with_mask(mask).unwrap();
        let display = masked.display().with_bad_color(Color::BLACK);

        group.throughput(Throughput::Elements((size * size) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| render_map(black_box(&masked), black_box(&display)).unwrap())
        });
    }
    group.finish();
}

fn bench_encode_png(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_png");
    for &size in SIZES {
        let map = synthetic_map(size, 1.0, size as f64 * 0.4);
        let mut image = render_map(&map, map.display()).unwrap();
        draw_limb(&mut image, &map, &LimbStyle::default()).unwrap();

        group.throughput(Throughput::Bytes((size * size * 4) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| encode_png(black_box(&image)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_render_map, bench_encode_png);
criterion_main!(benches);
