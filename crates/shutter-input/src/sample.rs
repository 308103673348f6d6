//! Raw pointer-change samples.

use shutter_geometry::Point;

pub type PointerId = u64;

/// What a sample reports about its pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    /// The platform revoked the stream (palm rejection, focus loss). Gesture
    /// cores abandon the current gesture without emitting terminal events.
    Cancel,
}

/// One timestamped pointer-change sample, one per frame per active pointer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSample {
    pub id: PointerId,
    pub position: Point,
    pub timestamp_ms: u64,
    pub phase: PointerPhase,
}

impl PointerSample {
    pub const fn new(id: PointerId, position: Point, timestamp_ms: u64, phase: PointerPhase) -> Self {
        Self {
            id,
            position,
            timestamp_ms,
            phase,
        }
    }
}
