use glam::Vec3;
use tile_map::prelude::*;
use tile_map_examples::init_tracing;
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let size = 5;
    for tiling in Tiling::ALL {
        for (flip_x, flip_y) in [(false, false), (true, false)] {
            let geometry = Geometry::new(tiling, Orientation::RightUp, Vec3::ONE);
            info!(%tiling, flip_x, flip_y, "sorting order, top row printed first");
            for y in (0..size).rev() {
                let row: Vec<String> = (0..size)
                    .map(|x| format!("{:>4}", geometry.tile_sorting_order(x, y, flip_x, flip_y)))
                    .collect();
                println!("y={y:>2} {}", row.join(""));
            }
        }

        let geometry = Geometry::new(tiling, Orientation::RightUp, Vec3::new(2.0, 1.0, 1.0));
        let tile = IntVector3::new(3, 2, 0);
        let center = geometry.tile_center_to_map(tile);
        info!(
            %tiling,
            %tile,
            x = center.x,
            y = center.y,
            back = %geometry.map_to_tile(center),
            "tile centre in map space"
        );
    }
    Ok(())
}
