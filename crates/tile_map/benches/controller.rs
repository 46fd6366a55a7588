mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use tile_map::prelude::{
    GenericTileSet, Geometry, InstanceRenderer, IntVector2, IntVector3, SeededChunkGenerator,
    TileInfo, TileLibrary, TileMap, TileMapConfig, TileMapController,
};

fn make_controller(chunk_size: i32) -> TileMapController<InstanceRenderer> {
    let mut library = TileLibrary::new();
    let tiles = (0..8).map(|i| TileInfo::new().with_sprite(format!("t{i}"))).collect();
    library
        .add_tile_set_at(GenericTileSet::from_tiles("terrain", tiles), 1)
        .expect("first tile set");
    let size = IntVector2::splat(chunk_size);
    let generator =
        SeededChunkGenerator::new(0xFEEDFACE, size, 2, (1..=8).collect()).expect("generator");
    let config = TileMapConfig::new(Geometry::default(), size);
    let map = TileMap::try_new(config, library, generator).expect("map");
    let mut controller = TileMapController::new(map, InstanceRenderer::new());
    controller.begin().expect("begin");
    controller
}

fn load_render_churn_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("controller/load_render_churn");

    for &chunk_size in &[8i32, 16, 32] {
        group.throughput(common::elements_throughput((chunk_size * chunk_size * 2) as usize));
        group.bench_with_input(
            BenchmarkId::from_parameter(chunk_size),
            &chunk_size,
            |b, &chunk_size| {
                let mut controller = make_controller(chunk_size);
                let mut x = 0;
                b.iter(|| {
                    let coord = IntVector3::new(x, 0, 0);
                    x += 1;
                    let rendered = controller.load_and_render_chunk(coord).expect("render");
                    let removed = controller.unload_and_unrender_chunk(coord).expect("unload");
                    black_box((rendered, removed))
                });
            },
        );
    }

    group.finish();
}

fn stream_window_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("controller/stream_window");

    for &radius in &[1i32, 3] {
        let side = 2 * radius + 1;
        group.throughput(common::elements_throughput(side as usize));
        group.bench_with_input(BenchmarkId::from_parameter(radius), &radius, |b, &radius| {
            b.iter_batched(
                || {
                    let mut controller = make_controller(16);
                    controller
                        .stream_window(IntVector2::ZERO, IntVector2::splat(radius))
                        .expect("initial window");
                    controller
                },
                |mut controller| {
                    let update = controller
                        .stream_window(IntVector2::new(1, 0), IntVector2::splat(radius))
                        .expect("step");
                    black_box(update.loaded.len())
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = load_render_churn_benches,
              stream_window_benches
}
criterion_main!(benches);
