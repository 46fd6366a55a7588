//! Frame timelines for animated tiles.
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Looping sequence of local tile indices, each shown for a duration in milliseconds.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TileAnimation {
    /// Frame start time (ms) to local tile index.
    frames: BTreeMap<u32, usize>,
    length: u32,
}

impl TileAnimation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a frame starting at the current end of the timeline.
    ///
    /// A zero-duration frame is replaced by the next one added.
    pub fn add_frame(&mut self, local_id: usize, duration_ms: u32) {
        self.frames.insert(self.length, local_id);
        self.length = self.length.saturating_add(duration_ms);
    }

    /// Total loop length in milliseconds.
    pub fn length(&self) -> u32 {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Local tile index shown `ms` milliseconds into the loop.
    pub fn frame_at(&self, ms: u64) -> Option<usize> {
        if self.length == 0 {
            return None;
        }
        let t = (ms % self.length as u64) as u32;
        self.frames.range(..=t).next_back().map(|(_, &id)| id)
    }

    /// `(start_ms, local_id)` pairs in playback order.
    pub fn frames(&self) -> impl Iterator<Item = (u32, usize)> + '_ {
        self.frames.iter().map(|(&start, &id)| (start, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_at_picks_latest_started_frame() {
        let mut anim = TileAnimation::new();
        anim.add_frame(4, 100);
        anim.add_frame(5, 50);
        anim.add_frame(6, 250);
        assert_eq!(anim.length(), 400);
        assert_eq!(anim.frame_at(0), Some(4));
        assert_eq!(anim.frame_at(99), Some(4));
        assert_eq!(anim.frame_at(100), Some(5));
        assert_eq!(anim.frame_at(149), Some(5));
        assert_eq!(anim.frame_at(150), Some(6));
        assert_eq!(anim.frame_at(399), Some(6));
        assert_eq!(anim.frame_at(400), Some(4));
        assert_eq!(anim.frame_at(1_000_150), Some(6));
    }

    #[test]
    fn empty_animation_has_no_frame() {
        let mut anim = TileAnimation::new();
        assert_eq!(anim.frame_at(10), None);
        anim.add_frame(1, 0);
        assert!(anim.is_empty());
        assert_eq!(anim.frame_at(10), None);
        anim.add_frame(2, 10);
        assert_eq!(anim.frames().collect::<Vec<_>>(), vec![(0, 2)]);
    }
}
