mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tile_map::prelude::{GenericTileSet, TileGid, TileId, TileInfo, TileLibrary};

fn make_library(sets: usize, tiles_per_set: usize) -> TileLibrary<TileInfo> {
    let mut library = TileLibrary::new();
    for s in 0..sets {
        let tiles = (0..tiles_per_set)
            .map(|t| TileInfo::new().with_sprite(format!("s{s}_t{t}")))
            .collect();
        library
            .add_tile_set(GenericTileSet::from_tiles(format!("set{s}"), tiles))
            .expect("id space fits");
    }
    library
}

fn make_gids(count: usize, max: u32, seed: u64) -> Vec<u32> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let flags = rng.next_u32() & (TileGid::FLIP_HORIZONTAL | TileGid::FLIP_VERTICAL);
            (rng.next_u32() % max) | flags
        })
        .collect()
}

fn library_lookup_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("library/tile_info");
    let lookups = 4096;

    for &sets in &[1usize, 16, 256] {
        let library = make_library(sets, 64);
        let gids = make_gids(lookups, (sets * 64 + 32) as u32, 0xC0FFEE);
        group.throughput(common::elements_throughput(lookups));

        group.bench_with_input(BenchmarkId::from_parameter(sets), &gids, |b, gids| {
            b.iter(|| {
                let mut hits = 0usize;
                for &raw in gids {
                    let gid = TileGid::decode(raw);
                    if library.tile_info(gid.id).is_some() {
                        hits += 1;
                    }
                }
                black_box(hits)
            });
        });
    }

    group.finish();
}

fn library_insert_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("library/add_tile_set_at");

    for &sets in &[16usize, 256] {
        group.throughput(common::elements_throughput(sets));
        group.bench_with_input(BenchmarkId::from_parameter(sets), &sets, |b, &sets| {
            b.iter(|| {
                let mut library = TileLibrary::<TileInfo>::new();
                // Insert back to front so every insert lands before existing entries.
                for s in (0..sets).rev() {
                    let set = GenericTileSet::from_tiles("s", vec![TileInfo::new(); 8]);
                    black_box(library.add_tile_set_at(set, (s * 10) as TileId).is_ok());
                }
                library.len()
            });
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = library_lookup_benches,
              library_insert_benches
}
criterion_main!(benches);
