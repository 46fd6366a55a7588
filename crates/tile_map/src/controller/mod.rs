//! Chunk lifecycle controller.
//!
//! [`TileMapController`] tracks which chunks of a [`TileMap`] are loaded and which are
//! rendered. Every chunk coordinate is either absent, loaded, or rendered, and moves
//! through those states one step at a time:
//!
//! ```text
//! absent --load--> loaded --render--> rendered
//! absent <-unload- loaded <-unrender- rendered
//! ```
//!
//! Skipping a step (rendering an absent chunk, unloading a rendered one) is a caller
//! error. A chunk that does not exist or a renderer that declines a chunk is an
//! expected outcome and reported as `Ok(false)`.
pub mod events;

use std::collections::{HashMap, HashSet};

use tracing::{debug, info, warn};

use crate::chunk::{Chunk, ChunkBounds};
use crate::controller::events::{ChunkEvent, ChunkEventKind, EventSink};
use crate::coord::{IntVector2, IntVector3};
use crate::error::{Error, Result};
use crate::map::TileMap;
use crate::render::{ChunkRenderer, RenderContext};

/// Outcome of [`TileMapController::stream_window`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StreamUpdate {
    /// Chunks that became rendered.
    pub loaded: Vec<IntVector3>,
    /// Chunks that were torn down.
    pub unloaded: Vec<IntVector3>,
}

impl StreamUpdate {
    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty() && self.unloaded.is_empty()
    }
}

/// Loads, renders, unrenders and unloads chunks of a tile map.
pub struct TileMapController<R: ChunkRenderer, S: EventSink = ()> {
    map: TileMap,
    renderer: R,
    sink: S,
    loaded_chunks: HashMap<IntVector3, Chunk>,
    chunk_roots: HashMap<IntVector3, R::Target>,
    started: bool,
}

impl<R: ChunkRenderer> TileMapController<R> {
    pub fn new(map: TileMap, renderer: R) -> Self {
        Self {
            map,
            renderer,
            sink: (),
            loaded_chunks: HashMap::new(),
            chunk_roots: HashMap::new(),
            started: false,
        }
    }
}

impl<R: ChunkRenderer, S: EventSink> TileMapController<R, S> {
    /// Replaces the event sink.
    pub fn with_sink<S2: EventSink>(self, sink: S2) -> TileMapController<R, S2> {
        TileMapController {
            map: self.map,
            renderer: self.renderer,
            sink,
            loaded_chunks: self.loaded_chunks,
            chunk_roots: self.chunk_roots,
            started: self.started,
        }
    }

    fn emit(&mut self, kind: ChunkEventKind, event: impl FnOnce() -> ChunkEvent) {
        if self.sink.wants(kind) {
            self.sink.send(event());
        }
    }

    fn ensure_started(&self) -> Result<()> {
        if self.started {
            Ok(())
        } else {
            Err(Error::NotStarted)
        }
    }

    /// Starts the controller. Chunk operations fail until this is called.
    pub fn begin(&mut self) -> Result<()> {
        if self.started {
            return Err(Error::AlreadyStarted);
        }
        self.started = true;
        info!(
            tiling = %self.map.geometry.tiling(),
            chunk_size = %self.map.layout.chunk_size,
            layers = self.map.layer_count(),
            "tile map controller started"
        );
        self.emit(ChunkEventKind::Began, || ChunkEvent::Began);
        Ok(())
    }

    /// Unrenders and unloads every chunk, resets the chunk manager and stops.
    pub fn end(&mut self) -> Result<()> {
        self.ensure_started()?;
        let unrendered = self.rendered_coords_sorted();
        for &coord in &unrendered {
            self.unrender_chunk(coord)?;
        }
        let unloaded = self.loaded_coords_sorted();
        for &coord in &unloaded {
            self.unload_chunk(coord)?;
        }
        self.map.reset_chunks();
        self.started = false;
        info!(
            unrendered = unrendered.len(),
            unloaded = unloaded.len(),
            "tile map controller ended"
        );
        self.emit(ChunkEventKind::Ended, || ChunkEvent::Ended {
            unrendered: unrendered.len(),
            unloaded: unloaded.len(),
        });
        Ok(())
    }

    /// Loads a chunk from the chunk manager.
    ///
    /// `Ok(false)` when the chunk is already loaded or does not exist.
    pub fn load_chunk(&mut self, coord: IntVector3) -> Result<bool> {
        self.ensure_started()?;
        if self.loaded_chunks.contains_key(&coord) {
            return Ok(false);
        }
        let Some(chunk) = self.map.load_chunk(coord)? else {
            debug!(%coord, "no chunk at coordinate");
            self.emit(ChunkEventKind::ChunkMissing, || ChunkEvent::ChunkMissing { coord });
            return Ok(false);
        };
        if chunk.index != coord.truncate() || chunk.tile_size() != self.map.layout.chunk_size {
            let message = format!(
                "chunk manager returned chunk {} of size {} for {coord}, expected size {}",
                chunk.index,
                chunk.tile_size(),
                self.map.layout.chunk_size
            );
            warn!(%coord, "rejected mismatched chunk");
            self.map.unload_chunk(chunk, coord);
            return Err(Error::InvalidChunk(message));
        }
        self.loaded_chunks.insert(coord, chunk);
        debug!(%coord, "chunk loaded");
        self.emit(ChunkEventKind::ChunkLoaded, || ChunkEvent::ChunkLoaded { coord });
        Ok(true)
    }

    /// Renders a loaded chunk.
    ///
    /// `Ok(false)` when it is already rendered or the renderer declines it; a declined
    /// chunk stays loaded.
    pub fn render_chunk(&mut self, coord: IntVector3) -> Result<bool> {
        self.ensure_started()?;
        let Some(chunk) = self.loaded_chunks.get(&coord) else {
            return Err(Error::ChunkNotLoaded { coord });
        };
        if self.chunk_roots.contains_key(&coord) {
            return Ok(false);
        }
        let ctx = RenderContext::new(&self.map);
        let mut target = R::Target::default();
        if !self.renderer.render(&ctx, chunk, &mut target) {
            warn!(%coord, "renderer failed to render chunk");
            self.emit(ChunkEventKind::RenderFailed, || ChunkEvent::RenderFailed { coord });
            return Ok(false);
        }
        let cells = chunk.ids.len();
        self.chunk_roots.insert(coord, target);
        debug!(%coord, cells, "chunk rendered");
        self.emit(ChunkEventKind::ChunkRendered, || ChunkEvent::ChunkRendered {
            coord,
            cells,
        });
        Ok(true)
    }

    /// Releases a chunk's render root. `Ok(false)` when it is not rendered.
    pub fn unrender_chunk(&mut self, coord: IntVector3) -> Result<bool> {
        self.ensure_started()?;
        let Some(target) = self.chunk_roots.remove(&coord) else {
            return Ok(false);
        };
        self.renderer.unrender(coord, target);
        debug!(%coord, "chunk unrendered");
        self.emit(ChunkEventKind::ChunkUnrendered, || ChunkEvent::ChunkUnrendered {
            coord,
        });
        Ok(true)
    }

    /// Hands a chunk back to the chunk manager. `Ok(false)` when it is not loaded.
    pub fn unload_chunk(&mut self, coord: IntVector3) -> Result<bool> {
        self.ensure_started()?;
        if self.chunk_roots.contains_key(&coord) {
            return Err(Error::ChunkStillRendered { coord });
        }
        let Some(chunk) = self.loaded_chunks.remove(&coord) else {
            return Ok(false);
        };
        self.map.unload_chunk(chunk, coord);
        debug!(%coord, "chunk unloaded");
        self.emit(ChunkEventKind::ChunkUnloaded, || ChunkEvent::ChunkUnloaded { coord });
        Ok(true)
    }

    /// Loads then renders. Stops at the first step returning `false` and keeps
    /// whatever state was reached.
    pub fn load_and_render_chunk(&mut self, coord: IntVector3) -> Result<bool> {
        Ok(self.load_chunk(coord)? && self.render_chunk(coord)?)
    }

    /// Unrenders the chunk if it is rendered, then unloads it.
    ///
    /// `Ok(true)` when either step changed anything. A loaded chunk that was never
    /// rendered is still unloaded.
    pub fn unload_and_unrender_chunk(&mut self, coord: IntVector3) -> Result<bool> {
        self.ensure_started()?;
        let unrendered = self.chunk_roots.contains_key(&coord) && self.unrender_chunk(coord)?;
        let unloaded = self.unload_chunk(coord)?;
        Ok(unrendered || unloaded)
    }

    fn loaded_tile(&self, x: i32, y: i32) -> Result<(IntVector3, IntVector2)> {
        let tile = IntVector2::new(x, y);
        let coord = self.map.layout.chunk_of_tile(tile).extend(0);
        if !self.loaded_chunks.contains_key(&coord) {
            return Err(Error::ChunkNotLoaded { coord });
        }
        Ok((coord, self.map.layout.local_of_tile(tile)))
    }

    /// Raw GID of a tile in a loaded chunk.
    pub fn get_tile(&self, x: i32, y: i32, layer: usize) -> Result<u32> {
        self.ensure_started()?;
        let (coord, local) = self.loaded_tile(x, y)?;
        match self.loaded_chunks.get(&coord) {
            Some(chunk) => chunk.get(local, layer),
            None => Err(Error::ChunkNotLoaded { coord }),
        }
    }

    /// Changes a tile in a loaded chunk and refreshes it if rendered.
    ///
    /// With `change_chunk == false` only the rendered tile changes; the chunk data keeps
    /// the old GID. Returns the GID stored before the call.
    pub fn change_tile(
        &mut self,
        x: i32,
        y: i32,
        layer: usize,
        gid: u32,
        change_chunk: bool,
    ) -> Result<u32> {
        self.ensure_started()?;
        let (coord, local) = self.loaded_tile(x, y)?;
        let Some(chunk) = self.loaded_chunks.get_mut(&coord) else {
            return Err(Error::ChunkNotLoaded { coord });
        };
        let old = if change_chunk {
            chunk.set(local, layer, gid)?
        } else {
            chunk.get(local, layer)?
        };

        if let Some(target) = self.chunk_roots.get_mut(&coord) {
            let ctx = RenderContext::new(&self.map);
            if !self
                .renderer
                .rerender_tile(&ctx, chunk, local, layer, gid, target)
            {
                warn!(%coord, %local, layer, gid, "renderer failed to refresh tile");
            }
        }
        debug!(x, y, layer, old, gid, "tile changed");
        self.emit(ChunkEventKind::TileChanged, || ChunkEvent::TileChanged {
            tile: IntVector2::new(x, y),
            layer,
            old,
            new: gid,
            stored: change_chunk,
        });
        Ok(old)
    }

    /// Keeps exactly the chunks in `[center - radius, center + radius]` (clipped to the
    /// layout bounds) loaded and rendered at `z = 0`.
    ///
    /// Chunks outside the window are unrendered and unloaded first. Chunks inside it
    /// that do not exist are skipped.
    pub fn stream_window(&mut self, center: IntVector2, radius: IntVector2) -> Result<StreamUpdate> {
        self.ensure_started()?;
        if radius.x < 0 || radius.y < 0 {
            warn!(%radius, "rejected stream window with negative radius");
            return Err(Error::InvalidConfig(format!(
                "stream radius must be >= 0 on both axes (got {radius})"
            )));
        }
        let window = ChunkBounds::new(center - radius, center + radius);
        let window = match self.map.layout.bounds {
            Some(bounds) => window.intersect(&bounds),
            None => Some(window),
        };
        let desired: HashSet<IntVector3> = window
            .iter()
            .flat_map(|w| w.iter())
            .map(|index| index.extend(0))
            .collect();

        let mut update = StreamUpdate::default();
        for coord in self.loaded_coords_sorted() {
            if desired.contains(&coord) {
                continue;
            }
            self.unrender_chunk(coord)?;
            if self.unload_chunk(coord)? {
                update.unloaded.push(coord);
            }
        }

        let mut wanted: Vec<_> = desired.into_iter().collect();
        wanted.sort_unstable();
        for coord in wanted {
            if self.chunk_roots.contains_key(&coord) {
                continue;
            }
            if !self.loaded_chunks.contains_key(&coord) && !self.load_chunk(coord)? {
                continue;
            }
            if self.render_chunk(coord)? {
                update.loaded.push(coord);
            }
        }

        debug!(
            %center,
            %radius,
            loaded = update.loaded.len(),
            unloaded = update.unloaded.len(),
            "stream window updated"
        );
        Ok(update)
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_chunk_loaded(&self, coord: IntVector3) -> bool {
        self.loaded_chunks.contains_key(&coord)
    }

    pub fn is_chunk_rendered(&self, coord: IntVector3) -> bool {
        self.chunk_roots.contains_key(&coord)
    }

    pub fn chunk(&self, coord: IntVector3) -> Option<&Chunk> {
        self.loaded_chunks.get(&coord)
    }

    /// Render root produced for a rendered chunk.
    pub fn chunk_root(&self, coord: IntVector3) -> Option<&R::Target> {
        self.chunk_roots.get(&coord)
    }

    /// Loaded chunk coordinates in no particular order.
    pub fn loaded_coords(&self) -> impl Iterator<Item = IntVector3> + '_ {
        self.loaded_chunks.keys().copied()
    }

    /// Rendered chunk coordinates in no particular order.
    pub fn rendered_coords(&self) -> impl Iterator<Item = IntVector3> + '_ {
        self.chunk_roots.keys().copied()
    }

    fn loaded_coords_sorted(&self) -> Vec<IntVector3> {
        let mut coords: Vec<_> = self.loaded_coords().collect();
        coords.sort_unstable();
        coords
    }

    fn rendered_coords_sorted(&self) -> Vec<IntVector3> {
        let mut coords: Vec<_> = self.rendered_coords().collect();
        coords.sort_unstable();
        coords
    }

    pub fn map(&self) -> &TileMap {
        &self.map
    }

    /// Mutable access to the map. Loaded chunks keep the layout they were loaded with.
    pub fn map_mut(&mut self) -> &mut TileMap {
        &mut self.map
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Gives back the map, renderer and sink. Loaded chunks are dropped without being
    /// handed to the chunk manager.
    pub fn into_parts(self) -> (TileMap, R, S) {
        (self.map, self.renderer, self.sink)
    }
}

impl<R: ChunkRenderer, S: EventSink> std::fmt::Debug for TileMapController<R, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TileMapController")
            .field("map", &self.map)
            .field("loaded", &self.loaded_chunks.len())
            .field("rendered", &self.chunk_roots.len())
            .field("started", &self.started)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::chunk::{ChunkManager, MemoryChunkStore, SeededChunkGenerator, StaticChunkManager};
    use crate::controller::events::{FnSink, VecSink};
    use crate::geometry::Geometry;
    use crate::library::{GenericTileSet, TileInfo, TileLibrary};
    use crate::map::TileMapConfig;
    use crate::render::{ChunkInstances, InstanceRenderer};

    fn library() -> TileLibrary<TileInfo> {
        let mut library = TileLibrary::new();
        let tiles = (0..32).map(|i| TileInfo::new().with_sprite(format!("t{i}"))).collect();
        library
            .add_tile_set_at(GenericTileSet::from_tiles("all", tiles), 1)
            .unwrap();
        library
    }

    fn static_map() -> TileMap {
        let chunks = (0..2).map(|x| {
            let ids = (0..16).map(|i| (x * 16 + i + 1) as u32).collect();
            Chunk::from_ids(IntVector2::new(x, 0), IntVector3::new(4, 4, 1), ids).unwrap()
        });
        let store: MemoryChunkStore = chunks.collect();
        let config = TileMapConfig::new(Geometry::default(), IntVector2::new(4, 4));
        TileMap::try_new(config, library(), StaticChunkManager::new(store)).unwrap()
    }

    fn controller() -> TileMapController<InstanceRenderer, VecSink> {
        let mut c = TileMapController::new(static_map(), InstanceRenderer::new())
            .with_sink(VecSink::new());
        c.begin().unwrap();
        c
    }

    fn assert_roots_subset_of_loaded<R: ChunkRenderer, S: EventSink>(
        c: &TileMapController<R, S>,
    ) {
        for coord in c.rendered_coords() {
            assert!(c.is_chunk_loaded(coord), "{coord} rendered but not loaded");
        }
    }

    #[test]
    fn end_to_end_tile_lookup() {
        let mut c = controller();
        let origin = IntVector3::ZERO;
        assert!(c.load_and_render_chunk(origin).unwrap());

        let chunk = c.chunk(origin).unwrap().clone();
        let expected = chunk.ids[IntVector2::new(2, 2).to_index(IntVector2::new(4, 4))];
        assert_eq!(c.get_tile(2, 2, 0).unwrap(), expected);
        assert_eq!(c.chunk_root(origin).unwrap().len(), 16);

        assert!(c.unload_and_unrender_chunk(origin).unwrap());
        assert!(
            matches!(c.get_tile(2, 2, 0), Err(Error::ChunkNotLoaded { .. })),
            "tile lookup after unload fails"
        );
        assert_eq!(c.loaded_coords().count(), 0);
        assert_eq!(c.rendered_coords().count(), 0);
    }

    #[test]
    fn operations_require_begin() {
        let mut c = TileMapController::new(static_map(), InstanceRenderer::new());
        assert!(matches!(c.load_chunk(IntVector3::ZERO), Err(Error::NotStarted)));
        assert!(matches!(c.end(), Err(Error::NotStarted)));
        c.begin().unwrap();
        assert!(matches!(c.begin(), Err(Error::AlreadyStarted)));
        c.end().unwrap();
        assert!(!c.is_started());
        c.begin().unwrap();
    }

    #[test]
    fn lifecycle_order_is_enforced() {
        let mut c = controller();
        let coord = IntVector3::new(1, 0, 0);
        assert!(matches!(
            c.render_chunk(coord),
            Err(Error::ChunkNotLoaded { .. })
        ));
        assert!(c.load_chunk(coord).unwrap());
        assert!(!c.load_chunk(coord).unwrap());
        assert!(c.render_chunk(coord).unwrap());
        assert!(!c.render_chunk(coord).unwrap());
        assert!(matches!(
            c.unload_chunk(coord),
            Err(Error::ChunkStillRendered { .. })
        ));
        assert!(c.is_chunk_loaded(coord));
        assert_roots_subset_of_loaded(&c);
        assert!(c.unrender_chunk(coord).unwrap());
        assert!(!c.unrender_chunk(coord).unwrap());
        assert!(c.unload_chunk(coord).unwrap());
        assert!(!c.unload_chunk(coord).unwrap());
    }

    #[test]
    fn missing_chunks_are_not_errors() {
        let mut c = controller();
        assert!(!c.load_chunk(IntVector3::new(5, 5, 0)).unwrap());
        assert!(!c.load_and_render_chunk(IntVector3::new(0, 0, 1)).unwrap());
        assert_eq!(c.sink().count(ChunkEventKind::ChunkMissing), 2);
    }

    #[test]
    fn composites_handle_partial_state() {
        let mut c = controller();
        let coord = IntVector3::ZERO;
        c.load_chunk(coord).unwrap();
        // Already loaded, so the composite stops before rendering.
        assert!(!c.load_and_render_chunk(coord).unwrap());
        assert!(!c.is_chunk_rendered(coord));
        // Loaded but not rendered: the teardown composite still unloads.
        assert!(c.unload_and_unrender_chunk(coord).unwrap());
        assert!(!c.is_chunk_loaded(coord));
        assert!(!c.unload_and_unrender_chunk(coord).unwrap());
        assert_eq!(c.sink().count(ChunkEventKind::ChunkUnrendered), 0);
        assert_eq!(c.sink().count(ChunkEventKind::ChunkUnloaded), 1);
    }

    struct Refusing;

    impl ChunkRenderer for Refusing {
        type Target = Vec<u32>;

        fn render(&mut self, _ctx: &RenderContext<'_>, chunk: &Chunk, target: &mut Vec<u32>) -> bool {
            target.extend_from_slice(&chunk.ids);
            false
        }
    }

    #[test]
    fn failed_render_leaves_chunk_loaded() {
        let mut c = TileMapController::new(static_map(), Refusing).with_sink(VecSink::new());
        c.begin().unwrap();
        assert!(!c.load_and_render_chunk(IntVector3::ZERO).unwrap());
        assert!(c.is_chunk_loaded(IntVector3::ZERO));
        assert!(!c.is_chunk_rendered(IntVector3::ZERO));
        assert!(c.chunk_root(IntVector3::ZERO).is_none());
        assert_eq!(c.sink().count(ChunkEventKind::RenderFailed), 1);
        assert!(c.unload_chunk(IntVector3::ZERO).unwrap());
    }

    #[test]
    fn teardown_composite_releases_declined_chunk() {
        let mut c = TileMapController::new(static_map(), Refusing).with_sink(VecSink::new());
        c.begin().unwrap();
        assert!(!c.load_and_render_chunk(IntVector3::ZERO).unwrap());
        assert!(c.unload_and_unrender_chunk(IntVector3::ZERO).unwrap());
        assert_eq!(c.loaded_coords().count(), 0);
        assert_eq!(c.rendered_coords().count(), 0);
        assert_eq!(c.sink().count(ChunkEventKind::ChunkUnloaded), 1);
    }

    fn run_random_operations<R: ChunkRenderer>(renderer: R, seed: u64) {
        let coords = [IntVector3::ZERO, IntVector3::new(1, 0, 0), IntVector3::new(2, 0, 0)];
        let mut c = TileMapController::new(static_map(), renderer);
        c.begin().unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        for step in 0..400 {
            let coord = coords[(rng.next_u32() % coords.len() as u32) as usize];
            let op = rng.next_u32() % 7;
            let result = match op {
                0 => c.load_chunk(coord),
                1 => c.render_chunk(coord),
                2 => c.unrender_chunk(coord),
                3 => c.unload_chunk(coord),
                4 => c.load_and_render_chunk(coord),
                5 => c.unload_and_unrender_chunk(coord),
                _ => c.end().and_then(|()| c.begin()).map(|()| true),
            };
            match result {
                Ok(_) => {}
                Err(Error::ChunkNotLoaded { .. }) if op == 1 => {
                    assert!(!c.is_chunk_loaded(coord));
                }
                Err(Error::ChunkStillRendered { .. }) if op == 3 => {
                    assert!(c.is_chunk_rendered(coord));
                }
                Err(err) => panic!("step {step}: operation {op} on {coord} failed: {err}"),
            }
            if op == 5 {
                assert!(!c.is_chunk_loaded(coord), "step {step}: {coord} still loaded");
            }
            assert_roots_subset_of_loaded(&c);
            for coord in coords {
                assert_eq!(c.is_chunk_rendered(coord), c.chunk_root(coord).is_some());
            }
            assert!(!c.is_chunk_loaded(IntVector3::new(2, 0, 0)));
        }
        c.end().unwrap();
        assert_eq!(c.loaded_coords().count(), 0);
    }

    #[test]
    fn random_operation_sequences_keep_rendered_within_loaded() {
        for seed in [1, 7, 42, 1234] {
            run_random_operations(InstanceRenderer::new(), seed);
            run_random_operations(Refusing, seed);
        }
    }

    #[test]
    fn change_tile_updates_chunk_and_render() {
        let mut c = controller();
        c.load_and_render_chunk(IntVector3::new(1, 0, 0)).unwrap();

        let old = c.change_tile(5, 1, 0, 3, true).unwrap();
        assert_eq!(old, 16 + 5 + 1);
        assert_eq!(c.get_tile(5, 1, 0).unwrap(), 3);
        let root: &ChunkInstances = c.chunk_root(IntVector3::new(1, 0, 0)).unwrap();
        assert_eq!(root.tile(IntVector2::new(1, 1), 0).unwrap().sprite, "t2");

        assert_eq!(c.change_tile(5, 1, 0, 4, false).unwrap(), 3);
        assert_eq!(c.get_tile(5, 1, 0).unwrap(), 3);
        let root = c.chunk_root(IntVector3::new(1, 0, 0)).unwrap();
        assert_eq!(root.tile(IntVector2::new(1, 1), 0).unwrap().sprite, "t3");

        assert!(matches!(
            c.change_tile(5, 1, 2, 1, true),
            Err(Error::LayerOutOfRange { layer: 2, layers: 1 })
        ));
        assert!(matches!(
            c.change_tile(-1, 0, 0, 1, true),
            Err(Error::ChunkNotLoaded { coord }) if coord == IntVector3::new(-1, 0, 0)
        ));
        assert_eq!(c.sink().count(ChunkEventKind::TileChanged), 2);
    }

    #[test]
    fn fn_sink_receives_only_wanted_kinds() {
        let mut seen = Vec::new();
        let sink = FnSink::new(|event: ChunkEvent| seen.push(event))
            .only([ChunkEventKind::ChunkRendered]);
        let mut c = TileMapController::new(static_map(), InstanceRenderer::new()).with_sink(sink);
        c.begin().unwrap();
        c.load_and_render_chunk(IntVector3::ZERO).unwrap();
        c.end().unwrap();
        drop(c);
        assert_eq!(
            seen,
            vec![ChunkEvent::ChunkRendered {
                coord: IntVector3::ZERO,
                cells: 16
            }]
        );
    }

    #[test]
    fn end_tears_everything_down() {
        let mut c = controller();
        c.load_and_render_chunk(IntVector3::ZERO).unwrap();
        c.load_chunk(IntVector3::new(1, 0, 0)).unwrap();
        c.end().unwrap();
        assert_eq!(c.loaded_coords().count(), 0);
        assert_eq!(c.rendered_coords().count(), 0);
        let ended = c.sink().as_slice().last().cloned();
        assert_eq!(
            ended,
            Some(ChunkEvent::Ended {
                unrendered: 1,
                unloaded: 2
            })
        );
    }

    fn generated_controller() -> TileMapController<InstanceRenderer, VecSink> {
        let generator =
            SeededChunkGenerator::new(7, IntVector2::new(4, 4), 1, vec![1, 2, 3]).unwrap();
        let config = TileMapConfig::new(Geometry::default(), IntVector2::new(4, 4))
            .with_bounds(IntVector2::new(-10, -10), IntVector2::new(10, 10));
        let map = TileMap::try_new(config, library(), generator).unwrap();
        let mut c = TileMapController::new(map, InstanceRenderer::new()).with_sink(VecSink::new());
        c.begin().unwrap();
        c
    }

    #[test]
    fn stream_window_tracks_moving_center() {
        let mut c = generated_controller();
        let radius = IntVector2::ONE;
        let first = c.stream_window(IntVector2::ZERO, radius).unwrap();
        assert_eq!(first.loaded.len(), 9);
        assert!(first.unloaded.is_empty());

        let second = c.stream_window(IntVector2::new(1, 0), radius).unwrap();
        assert_eq!(second.loaded.len(), 3);
        assert_eq!(second.unloaded.len(), 3);
        assert!(second.unloaded.iter().all(|coord| coord.x == -1));
        assert!(second.loaded.iter().all(|coord| coord.x == 2));
        assert_eq!(c.rendered_coords().count(), 9);
        assert_roots_subset_of_loaded(&c);

        assert!(c.stream_window(IntVector2::new(1, 0), radius).unwrap().is_empty());
    }

    #[test]
    fn stream_window_clips_to_bounds_and_rejects_negative_radius() {
        let mut c = generated_controller();
        let update = c.stream_window(IntVector2::new(10, 10), IntVector2::ONE).unwrap();
        assert_eq!(update.loaded.len(), 4);
        let outside = c.stream_window(IntVector2::new(50, 50), IntVector2::ONE).unwrap();
        assert_eq!(outside.unloaded.len(), 4);
        assert_eq!(c.loaded_coords().count(), 0);
        assert!(matches!(
            c.stream_window(IntVector2::ZERO, IntVector2::new(-1, 0)),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn edits_survive_streaming_until_end() {
        let mut c = generated_controller();
        c.stream_window(IntVector2::ZERO, IntVector2::ZERO).unwrap();
        c.change_tile(0, 0, 0, 30, true).unwrap();
        c.stream_window(IntVector2::new(5, 5), IntVector2::ZERO).unwrap();
        c.stream_window(IntVector2::ZERO, IntVector2::ZERO).unwrap();
        assert_eq!(c.get_tile(0, 0, 0).unwrap(), 30);

        c.end().unwrap();
        c.begin().unwrap();
        c.load_chunk(IntVector3::ZERO).unwrap();
        assert_ne!(c.get_tile(0, 0, 0).unwrap(), 30);
    }

    #[test]
    fn chunk_manager_mismatch_is_rejected_and_handed_back() {
        struct Wrong {
            returned: Rc<RefCell<Vec<IntVector3>>>,
        }
        impl ChunkManager for Wrong {
            fn load_chunk(&mut self, _coord: IntVector3) -> Result<Option<Chunk>> {
                Ok(Some(Chunk::new(IntVector2::ZERO, IntVector3::new(2, 2, 1))?))
            }

            fn unload_chunk(&mut self, _chunk: Chunk, coord: IntVector3) {
                self.returned.borrow_mut().push(coord);
            }
        }
        let returned = Rc::new(RefCell::new(Vec::new()));
        let manager = Wrong {
            returned: Rc::clone(&returned),
        };
        let config = TileMapConfig::new(Geometry::default(), IntVector2::new(4, 4));
        let map = TileMap::try_new(config, library(), manager).unwrap();
        let mut c = TileMapController::new(map, InstanceRenderer::new());
        c.begin().unwrap();
        assert!(matches!(c.load_chunk(IntVector3::ZERO), Err(Error::InvalidChunk(_))));
        assert!(!c.is_chunk_loaded(IntVector3::ZERO));
        assert_eq!(*returned.borrow(), vec![IntVector3::ZERO]);
    }
}
