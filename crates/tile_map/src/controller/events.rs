//! Events emitted by [`crate::controller::TileMapController`] and sinks to collect them.
use crate::coord::{IntVector2, IntVector3};

/// Describes a controller transition.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkEvent {
    /// The controller started.
    Began,

    /// The controller stopped after tearing down every chunk.
    Ended {
        /// Chunks unrendered during shutdown.
        unrendered: usize,
        /// Chunks handed back to the chunk manager during shutdown.
        unloaded: usize,
    },

    /// A chunk was obtained from the chunk manager.
    ChunkLoaded { coord: IntVector3 },

    /// The chunk manager has no chunk at `coord`.
    ChunkMissing { coord: IntVector3 },

    ChunkRendered {
        coord: IntVector3,
        /// Cells in the chunk, across all layers.
        cells: usize,
    },

    /// The renderer declined a chunk; it stays loaded.
    RenderFailed { coord: IntVector3 },

    ChunkUnrendered { coord: IntVector3 },

    ChunkUnloaded { coord: IntVector3 },

    /// A tile was changed through the controller.
    TileChanged {
        tile: IntVector2,
        layer: usize,
        old: u32,
        new: u32,
        /// Whether the loaded chunk data was updated, not just the rendered tile.
        stored: bool,
    },
}

/// Discriminant of a [`ChunkEvent`], used to filter what a sink receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChunkEventKind {
    Began,
    Ended,
    ChunkLoaded,
    ChunkMissing,
    ChunkRendered,
    RenderFailed,
    ChunkUnrendered,
    ChunkUnloaded,
    TileChanged,
}

impl ChunkEvent {
    pub fn kind(&self) -> ChunkEventKind {
        match self {
            ChunkEvent::Began => ChunkEventKind::Began,
            ChunkEvent::Ended { .. } => ChunkEventKind::Ended,
            ChunkEvent::ChunkLoaded { .. } => ChunkEventKind::ChunkLoaded,
            ChunkEvent::ChunkMissing { .. } => ChunkEventKind::ChunkMissing,
            ChunkEvent::ChunkRendered { .. } => ChunkEventKind::ChunkRendered,
            ChunkEvent::RenderFailed { .. } => ChunkEventKind::RenderFailed,
            ChunkEvent::ChunkUnrendered { .. } => ChunkEventKind::ChunkUnrendered,
            ChunkEvent::ChunkUnloaded { .. } => ChunkEventKind::ChunkUnloaded,
            ChunkEvent::TileChanged { .. } => ChunkEventKind::TileChanged,
        }
    }

    /// Chunk the event refers to, if any.
    pub fn coord(&self) -> Option<IntVector3> {
        match *self {
            ChunkEvent::ChunkLoaded { coord }
            | ChunkEvent::ChunkMissing { coord }
            | ChunkEvent::ChunkRendered { coord, .. }
            | ChunkEvent::RenderFailed { coord }
            | ChunkEvent::ChunkUnrendered { coord }
            | ChunkEvent::ChunkUnloaded { coord } => Some(coord),
            _ => None,
        }
    }
}

impl ChunkEventKind {
    pub const ALL: [ChunkEventKind; 9] = [
        ChunkEventKind::Began,
        ChunkEventKind::Ended,
        ChunkEventKind::ChunkLoaded,
        ChunkEventKind::ChunkMissing,
        ChunkEventKind::ChunkRendered,
        ChunkEventKind::RenderFailed,
        ChunkEventKind::ChunkUnrendered,
        ChunkEventKind::ChunkUnloaded,
        ChunkEventKind::TileChanged,
    ];

    const fn bit(self) -> u16 {
        1u16 << (self as u16)
    }
}

/// Set of event kinds a sink accepts. Defaults to every kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventKinds(u16);

impl EventKinds {
    pub const ALL: Self = Self((1u16 << ChunkEventKind::ALL.len()) - 1);
    pub const NONE: Self = Self(0);

    pub const fn contains(self, kind: ChunkEventKind) -> bool {
        self.0 & kind.bit() != 0
    }

    pub const fn with(self, kind: ChunkEventKind) -> Self {
        Self(self.0 | kind.bit())
    }

    pub fn iter(self) -> impl Iterator<Item = ChunkEventKind> {
        ChunkEventKind::ALL.into_iter().filter(move |k| self.contains(*k))
    }
}

impl Default for EventKinds {
    fn default() -> Self {
        Self::ALL
    }
}

impl FromIterator<ChunkEventKind> for EventKinds {
    fn from_iter<I: IntoIterator<Item = ChunkEventKind>>(iter: I) -> Self {
        iter.into_iter().fold(Self::NONE, Self::with)
    }
}

/// Receives [`ChunkEvent`]s from a controller.
///
/// The controller asks [`EventSink::wants`] before building an event and skips kinds
/// the sink does not want.
pub trait EventSink {
    fn send(&mut self, event: ChunkEvent);

    #[inline]
    fn wants(&self, _kind: ChunkEventKind) -> bool {
        true
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: ChunkEvent) {}

    #[inline]
    fn wants(&self, _kind: ChunkEventKind) -> bool {
        false
    }
}

/// Forwards events of the accepted kinds to a closure.
pub struct FnSink<F>
where
    F: FnMut(ChunkEvent),
{
    f: F,
    kinds: EventKinds,
}

impl<F> FnSink<F>
where
    F: FnMut(ChunkEvent),
{
    pub fn new(f: F) -> Self {
        Self {
            f,
            kinds: EventKinds::ALL,
        }
    }

    pub fn only(mut self, kinds: impl IntoIterator<Item = ChunkEventKind>) -> Self {
        self.kinds = kinds.into_iter().collect();
        self
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(ChunkEvent),
{
    #[inline]
    fn send(&mut self, event: ChunkEvent) {
        if self.kinds.contains(event.kind()) {
            (self.f)(event);
        }
    }

    #[inline]
    fn wants(&self, kind: ChunkEventKind) -> bool {
        self.kinds.contains(kind)
    }
}

/// Collects events of the accepted kinds in order.
#[derive(Debug, Default)]
pub struct VecSink {
    events: Vec<ChunkEvent>,
    kinds: EventKinds,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps only events of the listed kinds.
    pub fn only(mut self, kinds: impl IntoIterator<Item = ChunkEventKind>) -> Self {
        self.kinds = kinds.into_iter().collect();
        self
    }

    pub fn kinds(&self) -> EventKinds {
        self.kinds
    }

    pub fn as_slice(&self) -> &[ChunkEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of collected events of `kind`.
    pub fn count(&self, kind: ChunkEventKind) -> usize {
        self.events.iter().filter(|e| e.kind() == kind).count()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: ChunkEvent) {
        if self.kinds.contains(event.kind()) {
            self.events.push(event);
        }
    }

    #[inline]
    fn wants(&self, kind: ChunkEventKind) -> bool {
        self.kinds.contains(kind)
    }
}
