mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec3;
use tile_map::prelude::{boundary_segments, Geometry, IntVector2, IntVector3, Orientation, Tiling};

fn geometry_round_trip_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("geometry/round_trip");
    let tiles: Vec<IntVector3> =
        IntVector3::interval(IntVector3::new(-32, -32, 0), IntVector3::new(31, 31, 0)).collect();
    group.throughput(common::elements_throughput(tiles.len()));

    for tiling in Tiling::ALL {
        let geometry = Geometry::new(tiling, Orientation::RightDown, Vec3::new(2.0, 1.0, 1.0));
        group.bench_with_input(BenchmarkId::from_parameter(tiling), &geometry, |b, g| {
            b.iter(|| {
                for &tile in &tiles {
                    black_box(g.map_to_tile(g.tile_center_to_map(tile)));
                }
            });
        });
    }

    group.finish();
}

fn sorting_order_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("geometry/sorting_order");
    let tiles: Vec<IntVector2> =
        IntVector2::interval(IntVector2::new(-64, -64), IntVector2::new(63, 63)).collect();
    group.throughput(common::elements_throughput(tiles.len()));

    for tiling in Tiling::ALL {
        let geometry = Geometry::new(tiling, Orientation::RightUp, Vec3::ONE);
        group.bench_with_input(BenchmarkId::from_parameter(tiling), &geometry, |b, g| {
            b.iter(|| {
                let mut acc = 0i64;
                for t in &tiles {
                    acc += g.tile_sorting_order(t.x, t.y, false, true) as i64;
                }
                black_box(acc)
            });
        });
    }

    group.finish();
}

fn boundary_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("geometry/boundary_segments");
    let geometry = Geometry::new(Tiling::StaggeredOdd, Orientation::RightUp, Vec3::ONE);

    for &chunks in &[1i32, 4, 8] {
        let greatest = IntVector3::new(chunks - 1, chunks - 1, 0);
        let size = IntVector3::new(16, 16, 1);
        group.throughput(common::elements_throughput((chunks * chunks * 256) as usize));
        group.bench_with_input(BenchmarkId::from_parameter(chunks), &greatest, |b, &greatest| {
            b.iter(|| black_box(boundary_segments(&geometry, size, IntVector3::ZERO, greatest).len()));
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = geometry_round_trip_benches,
              sorting_order_benches,
              boundary_benches
}
criterion_main!(benches);
