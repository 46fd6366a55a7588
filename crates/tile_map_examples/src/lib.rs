#![forbid(unsafe_code)]

mod rendering;

pub use rendering::{init_tracing, render_segments_to_png, RenderConfig, SegmentStyle};
