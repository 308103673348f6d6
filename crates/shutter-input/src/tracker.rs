//! Multi-pointer bookkeeping on top of the raw sample stream.
//!
//! The tracker keeps current and previous positions per active pointer so
//! gesture cores can ask for deltas, the pinch centroid/span, and the
//! surviving pointer after a 2-to-1 transition without re-deriving any of it
//! from raw samples.

use crate::{PointerId, PointerPhase, PointerSample};
use shutter_geometry::{centroid, span, Point};
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug)]
struct ActivePointer {
    id: PointerId,
    position: Point,
    previous_position: Point,
}

/// Tracks the set of currently-down pointers.
///
/// Malformed sequences are tolerated rather than treated as faults: an Up or
/// Move for an unknown id is logged and ignored, a duplicate Down re-anchors
/// the existing pointer in place.
#[derive(Clone, Debug, Default)]
pub struct PointerTracker {
    pointers: SmallVec<[ActivePointer; 2]>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one sample into the active set. Returns `true` when the sample
    /// was consistent with the tracked state.
    pub fn apply(&mut self, sample: &PointerSample) -> bool {
        match sample.phase {
            PointerPhase::Down => {
                if let Some(existing) = self.find_mut(sample.id) {
                    log::warn!(
                        "pointer {} sent Down while already down; re-anchoring",
                        sample.id
                    );
                    existing.position = sample.position;
                    existing.previous_position = sample.position;
                    return false;
                }
                self.pointers.push(ActivePointer {
                    id: sample.id,
                    position: sample.position,
                    previous_position: sample.position,
                });
                true
            }
            PointerPhase::Move => match self.find_mut(sample.id) {
                Some(pointer) => {
                    pointer.previous_position = pointer.position;
                    pointer.position = sample.position;
                    true
                }
                None => {
                    log::warn!("Move for unknown pointer {}; ignoring", sample.id);
                    false
                }
            },
            PointerPhase::Up => {
                let before = self.pointers.len();
                self.pointers.retain(|p| p.id != sample.id);
                if self.pointers.len() == before {
                    log::warn!("Up for unknown pointer {}; ignoring", sample.id);
                    return false;
                }
                true
            }
            PointerPhase::Cancel => {
                self.pointers.clear();
                true
            }
        }
    }

    pub fn pointer_count(&self) -> usize {
        self.pointers.len()
    }

    pub fn position_of(&self, id: PointerId) -> Option<Point> {
        self.find(id).map(|p| p.position)
    }

    /// Frame delta of one pointer (zero right after its Down).
    pub fn delta_of(&self, id: PointerId) -> Option<Point> {
        self.find(id).map(|p| p.position - p.previous_position)
    }

    /// Centroid of all active pointers.
    pub fn centroid(&self) -> Point {
        let positions: SmallVec<[Point; 2]> = self.pointers.iter().map(|p| p.position).collect();
        centroid(&positions)
    }

    /// Pinch span across all active pointers (0 for fewer than two).
    pub fn span(&self) -> f32 {
        let positions: SmallVec<[Point; 2]> = self.pointers.iter().map(|p| p.position).collect();
        span(&positions)
    }

    /// The single remaining pointer, if exactly one is down. Used to
    /// re-anchor panning after a pinch loses a finger.
    pub fn surviving(&self) -> Option<(PointerId, Point)> {
        match self.pointers.as_slice() {
            [only] => Some((only.id, only.position)),
            _ => None,
        }
    }

    pub fn clear(&mut self) {
        self.pointers.clear();
    }

    fn find(&self, id: PointerId) -> Option<&ActivePointer> {
        self.pointers.iter().find(|p| p.id == id)
    }

    fn find_mut(&mut self, id: PointerId) -> Option<&mut ActivePointer> {
        self.pointers.iter_mut().find(|p| p.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down(id: PointerId, x: f32, y: f32, t: u64) -> PointerSample {
        PointerSample::new(id, Point::new(x, y), t, PointerPhase::Down)
    }

    fn mv(id: PointerId, x: f32, y: f32, t: u64) -> PointerSample {
        PointerSample::new(id, Point::new(x, y), t, PointerPhase::Move)
    }

    fn up(id: PointerId, x: f32, y: f32, t: u64) -> PointerSample {
        PointerSample::new(id, Point::new(x, y), t, PointerPhase::Up)
    }

    #[test]
    fn tracks_down_move_up() {
        let mut tracker = PointerTracker::new();
        assert!(tracker.apply(&down(1, 10.0, 10.0, 0)));
        assert_eq!(tracker.pointer_count(), 1);
        assert_eq!(tracker.delta_of(1), Some(Point::ZERO));

        assert!(tracker.apply(&mv(1, 15.0, 12.0, 16)));
        assert_eq!(tracker.delta_of(1), Some(Point::new(5.0, 2.0)));
        assert_eq!(tracker.position_of(1), Some(Point::new(15.0, 12.0)));

        assert!(tracker.apply(&up(1, 15.0, 12.0, 32)));
        assert_eq!(tracker.pointer_count(), 0);
    }

    #[test]
    fn centroid_and_span_for_pinch() {
        let mut tracker = PointerTracker::new();
        tracker.apply(&down(1, 400.0, 500.0, 0));
        tracker.apply(&down(2, 600.0, 500.0, 0));
        assert_eq!(tracker.centroid(), Point::new(500.0, 500.0));
        assert_eq!(tracker.span(), 200.0);
    }

    #[test]
    fn surviving_pointer_after_pinch() {
        let mut tracker = PointerTracker::new();
        tracker.apply(&down(1, 100.0, 100.0, 0));
        tracker.apply(&down(2, 300.0, 100.0, 0));
        assert_eq!(tracker.surviving(), None);

        tracker.apply(&up(1, 100.0, 100.0, 16));
        assert_eq!(tracker.surviving(), Some((2, Point::new(300.0, 100.0))));
    }

    #[test]
    fn tolerates_unmatched_up_and_move() {
        let mut tracker = PointerTracker::new();
        assert!(!tracker.apply(&up(7, 0.0, 0.0, 0)));
        assert!(!tracker.apply(&mv(7, 0.0, 0.0, 0)));
        assert_eq!(tracker.pointer_count(), 0);
    }

    #[test]
    fn duplicate_down_reanchors() {
        let mut tracker = PointerTracker::new();
        tracker.apply(&down(1, 10.0, 10.0, 0));
        tracker.apply(&mv(1, 30.0, 10.0, 16));
        tracker.apply(&down(1, 50.0, 50.0, 32));
        assert_eq!(tracker.pointer_count(), 1);
        assert_eq!(tracker.position_of(1), Some(Point::new(50.0, 50.0)));
        assert_eq!(tracker.delta_of(1), Some(Point::ZERO));
    }

    #[test]
    fn cancel_clears_everything() {
        let mut tracker = PointerTracker::new();
        tracker.apply(&down(1, 0.0, 0.0, 0));
        tracker.apply(&down(2, 10.0, 0.0, 0));
        tracker.apply(&PointerSample::new(1, Point::ZERO, 16, PointerPhase::Cancel));
        assert_eq!(tracker.pointer_count(), 0);
    }
}
