use std::path::Path;

use glam::{Mat4, Vec2};
use image::{Rgb, RgbImage};
use tile_map::prelude::{BoundaryKind, BoundarySegment};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Installs a compact `fmt` subscriber honouring `RUST_LOG` (default `info`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

#[derive(Clone, Copy, Debug)]
pub struct SegmentStyle {
    pub color: [u8; 3],
    /// Line thickness in pixels.
    pub width: u32,
}

#[derive(Clone, Debug)]
pub struct RenderConfig {
    pub image_size: (u32, u32),
    pub background: [u8; 3],
    /// Border around the drawing in pixels.
    pub margin: u32,
    pub tile: SegmentStyle,
    pub chunk: SegmentStyle,
}

impl RenderConfig {
    pub fn new(image_size: (u32, u32)) -> Self {
        Self {
            image_size,
            background: [250, 250, 250],
            margin: 16,
            tile: SegmentStyle {
                color: [170, 170, 170],
                width: 1,
            },
            chunk: SegmentStyle {
                color: [30, 30, 30],
                width: 2,
            },
        }
    }

    pub fn with_background(mut self, background: [u8; 3]) -> Self {
        self.background = background;
        self
    }

    pub fn with_chunk_color(mut self, color: [u8; 3]) -> Self {
        self.chunk.color = color;
        self
    }

    fn style(&self, kind: BoundaryKind) -> SegmentStyle {
        match kind {
            BoundaryKind::Tile => self.tile,
            BoundaryKind::Chunk => self.chunk,
        }
    }
}

/// Draws boundary segments, transformed by `to_map`, scaled to fit the image.
///
/// Map-space Y points up; the image is flipped so it does too.
pub fn render_segments_to_png(
    segments: &[BoundarySegment],
    to_map: &Mat4,
    config: &RenderConfig,
    out_path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    let (w, h) = config.image_size;
    anyhow::ensure!(w > 2 * config.margin && h > 2 * config.margin, "image too small");
    let mut img = RgbImage::from_pixel(w, h, Rgb(config.background));

    let mapped: Vec<_> = segments.iter().map(|s| s.transformed(to_map)).collect();
    let (min, max) = mapped.iter().fold(
        (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)),
        |(lo, hi), s| {
            let (a, b) = (s.start.truncate(), s.end.truncate());
            (lo.min(a).min(b), hi.max(a).max(b))
        },
    );
    if mapped.is_empty() {
        img.save(out_path.as_ref())?;
        return Ok(());
    }

    let extent = (max - min).max(Vec2::splat(f32::EPSILON));
    let avail = Vec2::new(
        (w - 2 * config.margin) as f32,
        (h - 2 * config.margin) as f32,
    );
    let scale = (avail.x / extent.x).min(avail.y / extent.y);
    let margin = config.margin as f32;
    let to_px = |p: Vec2| {
        let q = (p - min) * scale;
        Vec2::new(margin + q.x, h as f32 - 1.0 - margin - q.y)
    };

    // Tile edges first so chunk edges stay on top.
    for kind in [BoundaryKind::Tile, BoundaryKind::Chunk] {
        let style = config.style(kind);
        for s in mapped.iter().filter(|s| s.kind == kind) {
            draw_line(
                &mut img,
                to_px(s.start.truncate()),
                to_px(s.end.truncate()),
                style,
            );
        }
    }

    img.save(out_path.as_ref())?;
    info!(
        path = %out_path.as_ref().display(),
        segments = mapped.len(),
        "overlay written"
    );
    Ok(())
}

fn draw_line(img: &mut RgbImage, a: Vec2, b: Vec2, style: SegmentStyle) {
    let steps = (b - a).abs().max_element().ceil().max(1.0) as u32;
    let half = style.width as i32 / 2;
    for i in 0..=steps {
        let p = a.lerp(b, i as f32 / steps as f32);
        for dy in -half..=half {
            for dx in -half..=half {
                put(img, p.x.round() as i32 + dx, p.y.round() as i32 + dy, style.color);
            }
        }
    }
}

fn put(img: &mut RgbImage, x: i32, y: i32, color: [u8; 3]) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, Rgb(color));
    }
}
