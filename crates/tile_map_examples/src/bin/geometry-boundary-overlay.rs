use glam::Vec3;
use tile_map::prelude::*;
use tile_map_examples::{init_tracing, render_segments_to_png, RenderConfig};

fn main() -> anyhow::Result<()> {
    init_tracing();

    let chunk_size = IntVector3::new(4, 4, 1);
    let least = IntVector3::new(-1, -1, 0);
    let greatest = IntVector3::new(1, 1, 0);

    for (tiling, name) in [
        (Tiling::Rectangular, "rectangular"),
        (Tiling::Isometric, "isometric"),
        (Tiling::StaggeredOdd, "staggered-odd"),
        (Tiling::StaggeredEven, "staggered-even"),
    ] {
        let geometry = Geometry::new(tiling, Orientation::RightUp, Vec3::new(2.0, 1.0, 1.0));
        let segments = boundary_segments(&geometry, chunk_size, least, greatest);
        let config = RenderConfig::new((800, 600)).with_chunk_color([200, 40, 40]);
        render_segments_to_png(
            &segments,
            &geometry.normal_to_map(),
            &config,
            format!("geometry-boundary-overlay-{name}.png"),
        )?;
    }
    Ok(())
}
