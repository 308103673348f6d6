//! Synthetic pointer streams for gesture tests.
//!
//! Gesture cores are pure functions of timestamped samples, so entire
//! device interactions can be scripted as data. [`StreamBuilder`] builds the
//! raw sample sequence; the canned helpers cover the common gestures so
//! tests read as intent ("pinch around the center by 2x") rather than as
//! coordinate noise.

use shutter_geometry::Point;
use shutter_input::{PointerId, PointerPhase, PointerSample};

/// Default spacing between consecutive synthetic frames.
pub const FRAME_MS: u64 = 16;

/// Fluent builder for a scripted pointer stream.
///
/// Time advances by [`FRAME_MS`] per emitted sample unless moved explicitly
/// with [`at`](Self::at) or [`advance`](Self::advance).
#[derive(Clone, Debug, Default)]
pub struct StreamBuilder {
    samples: Vec<PointerSample>,
    now_ms: u64,
    positions: Vec<(PointerId, Point)>,
}

impl StreamBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Jumps the clock to an absolute timestamp.
    pub fn at(mut self, timestamp_ms: u64) -> Self {
        self.now_ms = timestamp_ms;
        self
    }

    /// Advances the clock without emitting a sample.
    pub fn advance(mut self, delta_ms: u64) -> Self {
        self.now_ms += delta_ms;
        self
    }

    pub fn down(mut self, id: PointerId, position: Point) -> Self {
        self.positions.retain(|(p, _)| *p != id);
        self.positions.push((id, position));
        self.push(id, position, PointerPhase::Down)
    }

    pub fn move_to(mut self, id: PointerId, position: Point) -> Self {
        if let Some(entry) = self.positions.iter_mut().find(|(p, _)| *p == id) {
            entry.1 = position;
        }
        self.push(id, position, PointerPhase::Move)
    }

    pub fn move_by(self, id: PointerId, delta: Point) -> Self {
        let position = self
            .position_of(id)
            .expect("move_by requires a pointer that is down")
            + delta;
        self.move_to(id, position)
    }

    pub fn up(mut self, id: PointerId) -> Self {
        let position = self
            .position_of(id)
            .expect("up requires a pointer that is down");
        self.positions.retain(|(p, _)| *p != id);
        self.push(id, position, PointerPhase::Up)
    }

    pub fn cancel(mut self, id: PointerId) -> Self {
        let position = self.position_of(id).unwrap_or(Point::ZERO);
        self.positions.clear();
        self.push(id, position, PointerPhase::Cancel)
    }

    pub fn build(self) -> Vec<PointerSample> {
        self.samples
    }

    fn position_of(&self, id: PointerId) -> Option<Point> {
        self.positions.iter().find(|(p, _)| *p == id).map(|(_, pos)| *pos)
    }

    fn push(mut self, id: PointerId, position: Point, phase: PointerPhase) -> Self {
        self.samples
            .push(PointerSample::new(id, position, self.now_ms, phase));
        self.now_ms += FRAME_MS;
        self
    }
}

/// A quick tap at `position`.
pub fn tap(position: Point) -> Vec<PointerSample> {
    StreamBuilder::new().down(1, position).up(1).build()
}

/// Two taps at `position` separated by `gap_ms`.
pub fn double_tap(position: Point, gap_ms: u64) -> Vec<PointerSample> {
    StreamBuilder::new()
        .down(1, position)
        .up(1)
        .advance(gap_ms)
        .down(1, position)
        .up(1)
        .build()
}

/// A single-pointer drag from `from` to `to` in `steps` equal moves.
pub fn drag(from: Point, to: Point, steps: usize) -> Vec<PointerSample> {
    let steps = steps.max(1);
    let mut builder = StreamBuilder::new().down(1, from);
    for i in 1..=steps {
        let t = i as f32 / steps as f32;
        builder = builder.move_to(1, from + (to - from) * t);
    }
    builder.up(1).build()
}

/// Symmetric two-pointer pinch around `center`: both spans are horizontal,
/// starting at `start_span` and ending at `start_span * factor`.
pub fn pinch(center: Point, start_span: f32, factor: f32, steps: usize) -> Vec<PointerSample> {
    let steps = steps.max(1);
    let half = start_span / 2.0;
    let left = center - Point::new(half, 0.0);
    let right = center + Point::new(half, 0.0);
    let mut builder = StreamBuilder::new().down(1, left).down(2, right);
    for i in 1..=steps {
        let t = i as f32 / steps as f32;
        let h = half * (1.0 + (factor - 1.0) * t);
        builder = builder
            .move_to(1, center - Point::new(h, 0.0))
            .move_to(2, center + Point::new(h, 0.0));
    }
    builder.up(1).up(2).build()
}
