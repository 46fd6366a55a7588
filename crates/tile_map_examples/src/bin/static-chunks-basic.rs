use glam::Vec2;
use tile_map::prelude::*;
use tile_map_examples::init_tracing;
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_tracing();

    // An 8x4 map with two layers, cut into two 4x4 chunks.
    let map_size = IntVector2::new(8, 4);
    let ground: Vec<u32> = (0..map_size.area() as u32).map(|i| 1 + i % 4).collect();
    let decor: Vec<u32> = (0..map_size.area() as u32)
        .map(|i| if i % 5 == 0 { 5 | TileGid::FLIP_HORIZONTAL } else { 0 })
        .collect();
    let baked = bake_chunks(map_size, &[ground, decor], IntVector2::new(4, 4))?;
    info!(chunks = baked.chunks.len(), "map baked");

    // Write the chunks to disk and read them back through a directory store.
    let dir = std::env::temp_dir().join("tile_map_static_chunks");
    let store = DirChunkStore::new(&dir);
    for chunk in &baked.chunks {
        store.write(chunk)?;
    }

    let mut library = TileLibrary::new();
    library.add_tile_set_at(
        GenericTileSet::from_tiles(
            "terrain",
            ["grass", "dirt", "sand", "water"]
                .into_iter()
                .map(|s| TileInfo::new().with_sprite(s))
                .collect(),
        ),
        1,
    )?;
    library.add_tile_set(
        GenericTileSet::from_tiles("props", vec![TileInfo::new().with_sprite("rock")])
            .with_draw_offset(Vec2::new(0.0, 0.25)),
    )?;

    let config = TileMapConfig::new(Geometry::default(), IntVector2::new(4, 4))
        .with_bounds(baked.bounds.least, baked.bounds.greatest)
        .with_layers(vec![
            LayerInfo::new("ground"),
            LayerInfo::new("decor").with_alpha(0.8),
        ]);
    let map = TileMap::try_new(config, library, StaticChunkManager::new(store))?;

    let mut controller =
        TileMapController::new(map, InstanceRenderer::new()).with_sink(VecSink::new());
    controller.begin()?;

    let origin = IntVector3::ZERO;
    controller.load_and_render_chunk(origin)?;
    for (x, y, layer) in [(2, 2, 0), (0, 0, 1), (3, 1, 0)] {
        let raw = controller.get_tile(x, y, layer)?;
        let gid = TileGid::decode(raw);
        let sprite = controller
            .map()
            .library
            .tile_info(gid.id)
            .and_then(|t| t.sprite.as_deref())
            .unwrap_or("<empty>");
        info!(x, y, layer, gid = gid.id, flipped = gid.flip.horizontal, sprite, "tile");
    }

    if let Some(root) = controller.chunk_root(origin) {
        for tile in root.draw_order().iter().take(4) {
            info!(
                tile = %tile.tile,
                order = tile.sorting_order,
                x = tile.position.x,
                y = tile.position.y,
                sprite = %tile.sprite,
                "draw"
            );
        }
    }

    controller.change_tile(1, 1, 0, 4, true)?;
    info!(gid = controller.get_tile(1, 1, 0)?, "tile (1, 1) changed");

    controller.unload_and_unrender_chunk(origin)?;
    match controller.get_tile(2, 2, 0) {
        Err(e) => info!(%e, "lookup after unload"),
        Ok(gid) => info!(gid, "unexpected tile after unload"),
    }

    controller.end()?;
    info!(events = controller.sink().len(), "done");
    std::fs::remove_dir_all(&dir)?;
    Ok(())
}
