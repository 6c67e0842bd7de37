use criterion::{black_box, criterion_group, criterion_main, Criterion};
use urania::chart::{ChartData, RadixChart};
use urania::config::ChartSettings;
use urania::geometry::Point2;
use urania::layout::{Circle, CollisionResolver};
use urania::points::PointSet;

fn crowded(n: usize) -> PointSet {
    PointSet::from_angles((0..n).map(|i| (format!("p{}", i), (i % 5) as f64 * 1.5 + (i / 5) as f64 * 40.0)))
        .unwrap()
}

fn bench_resolve(c: &mut Criterion) {
    let resolver = CollisionResolver::new(6.0).unwrap();
    let circle = Circle::new(Point2::new(0.0, 0.0), 300.0);
    let points = crowded(40);

    c.bench_function("resolve_crowded_40", |b| {
        b.iter(|| resolver.resolve(black_box(&points), black_box(&circle)))
    });
}

fn bench_radix_frame(c: &mut Criterion) {
    let cusps = (0..12).map(|i| i as f64 * 30.0 + 7.0).collect();
    let data = ChartData::new(crowded(12)).with_cusps(cusps);
    let chart = RadixChart::new(data, ChartSettings::default()).unwrap();

    c.bench_function("radix_frame", |b| {
        b.iter(|| chart.frame(black_box(Point2::new(400.0, 400.0)), black_box(400.0)))
    });
}

criterion_group!(benches, bench_resolve, bench_radix_frame);
criterion_main!(benches);
