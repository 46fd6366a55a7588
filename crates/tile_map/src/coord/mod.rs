//! Integer coordinates for tiles and chunks.
//!
//! [`IntVector2`] and [`IntVector3`] are plain value types used both as map keys and
//! as spatial positions. [`Interval2`] and [`Interval3`] enumerate boxes of integer
//! points in the same order [`IntVector3::to_index`] lays out flat arrays.
pub mod vector2;
pub mod vector3;

pub use vector2::{Interval2, IntVector2};
pub use vector3::{Interval3, IntVector3};
