use tile_map::prelude::*;
use tile_map_examples::init_tracing;
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let chunk_size = IntVector2::new(8, 8);
    let palette: Vec<u32> = (1..=6).collect();
    let generator = SeededChunkGenerator::new(0x5EED, chunk_size, 2, palette)?
        .with_overlay_density(6);

    let mut library = TileLibrary::new();
    let tiles = (1..=6)
        .map(|i| TileInfo::new().with_sprite(format!("tile_{i}")))
        .collect();
    library.add_tile_set_at(GenericTileSet::from_tiles("generated", tiles), 1)?;

    let config = TileMapConfig::new(Geometry::default(), chunk_size)
        .with_geometry(Tiling::Isometric, Orientation::RightDown, glam::Vec3::new(1.0, 0.5, 1.0))
        .with_bounds(IntVector2::new(-8, -8), IntVector2::new(8, 8))
        .with_layers(vec![LayerInfo::new("ground"), LayerInfo::new("overlay")]);
    let map = TileMap::try_new(config, library, generator)?;

    let sink = VecSink::new().only([ChunkEventKind::ChunkLoaded, ChunkEventKind::ChunkUnloaded]);
    let mut controller = TileMapController::new(map, InstanceRenderer::new()).with_sink(sink);
    controller.begin()?;

    // Walk the window east, then back west.
    let radius = IntVector2::new(2, 1);
    let path = (0..6).chain((0..6).rev()).map(|x| IntVector2::new(x, 0));
    for center in path {
        let update = controller.stream_window(center, radius)?;
        info!(
            %center,
            loaded = update.loaded.len(),
            unloaded = update.unloaded.len(),
            resident = controller.loaded_coords().count(),
            "window moved"
        );
    }

    // An edit survives the chunk leaving and re-entering the window.
    controller.change_tile(0, 0, 1, 6, true)?;
    controller.stream_window(IntVector2::new(6, 0), radius)?;
    controller.stream_window(IntVector2::ZERO, radius)?;
    info!(gid = controller.get_tile(0, 0, 1)?, "overlay tile after round trip");

    let events = controller.sink();
    info!(
        loads = events.count(ChunkEventKind::ChunkLoaded),
        unloads = events.count(ChunkEventKind::ChunkUnloaded),
        "stream summary"
    );
    controller.end()?;
    Ok(())
}
