//! Viewer gesture classifier.
//!
//! Consumes the pointer stream for one visible page and classifies it into
//! mutually exclusive, irrevocable intents: pinch-zoom, pan (with
//! edge-penetration paging), vertical dismiss, horizontal paging (left to
//! the host's pager), single tap and double-tap zoom. All transitions happen
//! synchronously inside [`GestureClassifier::process`]; timing is judged
//! against sample timestamps only.

use crate::config::{ConfigError, GestureConfig};
use crate::events::{GestureEvent, Processed};
use shutter_geometry::{
    clamp_pan, pan_extent, scale_around_point, zoom_factor, Point, Size, ViewTransform,
};
use shutter_input::{PointerPhase, PointerSample, PointerTracker, VelocityTracker2d};
use smallvec::SmallVec;

/// Classification of the in-flight gesture. Once a single-pointer gesture
/// commits to an axis it never re-classifies until all pointers lift.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GesturePhase {
    Idle,
    /// One pointer down at rest scale; not yet known whether this is a tap,
    /// a horizontal page swipe, or a vertical dismiss.
    WaitingForIntent,
    Zooming,
    Panning,
    CommittedVertical,
    CommittedHorizontal,
}

#[derive(Clone, Copy, Debug)]
struct PendingTap {
    position: Point,
    deadline_ms: u64,
}

/// One classifier per visible page. See the crate docs for the event
/// contract; the host calls [`reset`](Self::reset) when the page stops being
/// current, so an entering page always starts at the identity transform.
pub struct GestureClassifier {
    config: GestureConfig,
    container: Size,
    tracker: PointerTracker,
    velocity: VelocityTracker2d,
    phase: GesturePhase,
    transform: ViewTransform,
    dismiss_progress: f32,
    /// Cumulative Euclidean path since the first Down.
    path_length: f32,
    press_position: Point,
    /// Previous pinch span / centroid, to derive incremental factors.
    pinch_span: f32,
    pinch_centroid: Point,
    /// Signed clipped-pan accumulator on X; + when pushing past the right
    /// bound of the pan range, - past the left.
    edge_overshoot: f32,
    /// Timestamp of the last edge-penetration page advance. Survives
    /// `reset()` so the rate limit holds across page changes.
    last_edge_advance_ms: Option<u64>,
    pending_tap: Option<PendingTap>,
    /// Second tap of a double-tap landed; resolves on its Up.
    double_tap_armed: bool,
    /// The current gesture involved a pinch at some point; its release can
    /// never read as a tap.
    was_pinch: bool,
}

impl GestureClassifier {
    pub fn new(config: GestureConfig, container: Size) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            container,
            tracker: PointerTracker::new(),
            velocity: VelocityTracker2d::new(),
            phase: GesturePhase::Idle,
            transform: ViewTransform::IDENTITY,
            dismiss_progress: 0.0,
            path_length: 0.0,
            press_position: Point::ZERO,
            pinch_span: 0.0,
            pinch_centroid: Point::ZERO,
            edge_overshoot: 0.0,
            last_edge_advance_ms: None,
            pending_tap: None,
            double_tap_armed: false,
            was_pinch: false,
        })
    }

    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    pub fn dismiss_progress(&self) -> f32 {
        self.dismiss_progress
    }

    /// Returns gesture state to defaults. The edge-penetration cooldown is
    /// deliberately retained: it rate-limits page advances across the very
    /// page changes that trigger a reset.
    pub fn reset(&mut self) {
        self.tracker.clear();
        self.velocity.reset();
        self.phase = GesturePhase::Idle;
        self.transform = ViewTransform::IDENTITY;
        self.dismiss_progress = 0.0;
        self.path_length = 0.0;
        self.pinch_span = 0.0;
        self.edge_overshoot = 0.0;
        self.pending_tap = None;
        self.double_tap_armed = false;
        self.was_pinch = false;
    }

    /// Updates the container geometry, re-clamping the current offset.
    pub fn set_container_size(&mut self, container: Size) -> SmallVec<[GestureEvent; 2]> {
        self.container = container;
        let mut events = SmallVec::new();
        let clamped = clamp_pan(self.transform.offset, self.transform.scale, container);
        if clamped != self.transform.offset {
            self.transform.offset = clamped;
            events.push(GestureEvent::TransformChanged {
                transform: self.transform,
            });
        }
        events
    }

    /// Resolves a pending single tap whose double-tap window has elapsed,
    /// without feeding new input. For hosts that want the tap delivered on
    /// the next frame tick instead of the next pointer sample.
    pub fn poll(&mut self, now_ms: u64) -> Processed {
        let mut out = Processed::unconsumed();
        self.expire_pending_tap(now_ms, &mut out.events);
        out
    }

    /// Feeds one pointer sample through the state machine.
    pub fn process(&mut self, sample: &PointerSample) -> Processed {
        let mut out = Processed::unconsumed();
        self.expire_pending_tap(sample.timestamp_ms, &mut out.events);

        match sample.phase {
            PointerPhase::Cancel => {
                self.abandon();
                out.consumed = true;
            }
            PointerPhase::Down => self.on_down(sample, &mut out),
            PointerPhase::Move => self.on_move(sample, &mut out),
            PointerPhase::Up => self.on_up(sample, &mut out),
        }
        out
    }

    fn on_down(&mut self, sample: &PointerSample, out: &mut Processed) {
        self.tracker.apply(sample);
        match self.tracker.pointer_count() {
            1 => {
                self.press_position = sample.position;
                self.path_length = 0.0;
                self.velocity.reset();
                self.velocity.add_sample(sample.timestamp_ms, sample.position);
                self.double_tap_armed = false;
                self.was_pinch = false;

                if let Some(pending) = self.pending_tap {
                    let near = sample.position.distance_to(pending.position)
                        <= self.config.noise_floor_px;
                    if near && sample.timestamp_ms <= pending.deadline_ms {
                        // Second tap of a double-tap; acts on its Up.
                        self.double_tap_armed = true;
                        self.pending_tap = None;
                    }
                }

                self.phase = if self.transform.scale > 1.0 {
                    GesturePhase::Panning
                } else {
                    GesturePhase::WaitingForIntent
                };
                log::trace!("down -> {:?}", self.phase);
                // The Down itself stays visible to the host (tap ripples,
                // pager arming), matching the usual pointer-input contract.
            }
            _ => {
                // A second (or later) pointer means zoom, unless the gesture
                // already committed to an axis; commitments are irrevocable.
                match self.phase {
                    GesturePhase::CommittedVertical | GesturePhase::CommittedHorizontal => {}
                    _ => {
                        self.phase = GesturePhase::Zooming;
                        self.pending_tap = None;
                        self.double_tap_armed = false;
                        self.was_pinch = true;
                        self.pinch_span = self.tracker.span();
                        self.pinch_centroid = self.tracker.centroid();
                        out.consumed = true;
                        log::trace!(
                            "down -> Zooming ({} pointers)",
                            self.tracker.pointer_count()
                        );
                    }
                }
            }
        }
    }

    fn on_move(&mut self, sample: &PointerSample, out: &mut Processed) {
        if !self.tracker.apply(sample) {
            return;
        }
        match self.phase {
            GesturePhase::Idle => {}
            GesturePhase::WaitingForIntent => {
                let delta = self.tracker.delta_of(sample.id).unwrap_or(Point::ZERO);
                self.path_length += delta.length();
                self.velocity.add_sample(sample.timestamp_ms, sample.position);
                if self.path_length > self.config.noise_floor_px {
                    self.commit_axis(sample, out);
                }
            }
            GesturePhase::Zooming => {
                self.on_pinch_move(out);
                out.consumed = true;
            }
            GesturePhase::Panning => {
                let delta = self.tracker.delta_of(sample.id).unwrap_or(Point::ZERO);
                self.path_length += delta.length();
                self.velocity.add_sample(sample.timestamp_ms, sample.position);
                self.apply_pan(delta, sample.timestamp_ms, &mut out.events);
                out.consumed = true;
            }
            GesturePhase::CommittedVertical => {
                let delta = self.tracker.delta_of(sample.id).unwrap_or(Point::ZERO);
                self.velocity.add_sample(sample.timestamp_ms, sample.position);
                self.advance_dismiss(delta.y, &mut out.events);
                out.consumed = true;
            }
            GesturePhase::CommittedHorizontal => {
                // The host's pager owns this stream; keep feeding the
                // velocity tracker so nothing jumps if it asks later.
                self.velocity.add_sample(sample.timestamp_ms, sample.position);
            }
        }
    }

    fn on_up(&mut self, sample: &PointerSample, out: &mut Processed) {
        if !self.tracker.apply(sample) {
            // Up with no matching Down; tolerated, and an in-flight gesture
            // stays untouched.
            return;
        }
        match self.tracker.pointer_count() {
            0 => self.on_all_up(sample, out),
            1 => {
                // Pinch lost a finger: panning continues on the survivor with
                // no jump (the tracker's per-pointer anchors handle it).
                if self.phase == GesturePhase::Zooming {
                    self.phase = GesturePhase::Panning;
                    self.path_length = 0.0;
                    if let Some((_, position)) = self.tracker.surviving() {
                        self.press_position = position;
                        self.velocity.reset();
                        self.velocity.add_sample(sample.timestamp_ms, position);
                    }
                    log::trace!("pinch lost a finger -> Panning");
                }
                out.consumed = true;
            }
            _ => {
                // Still pinching with the remaining pointers.
                self.pinch_span = self.tracker.span();
                self.pinch_centroid = self.tracker.centroid();
                out.consumed = true;
            }
        }
    }

    fn on_all_up(&mut self, sample: &PointerSample, out: &mut Processed) {
        let phase = self.phase;
        self.phase = GesturePhase::Idle;
        self.edge_overshoot = 0.0;

        match phase {
            GesturePhase::WaitingForIntent => {
                self.resolve_tap(sample, out);
            }
            GesturePhase::Panning => {
                if self.path_length <= self.config.noise_floor_px && !self.was_pinch {
                    self.resolve_tap(sample, out);
                } else {
                    out.consumed = true;
                }
            }
            GesturePhase::CommittedVertical => {
                // The release sample closes the velocity window: a finger
                // held still before lifting reads as stopped, not as the
                // drag's peak speed.
                self.velocity.add_sample(sample.timestamp_ms, sample.position);
                let release_velocity = self.velocity.velocity().y;
                let flick = release_velocity.abs() >= self.config.dismiss_flick_velocity
                    && release_velocity.signum() == self.dismiss_progress.signum();
                if flick {
                    out.events.push(GestureEvent::Dismiss);
                    self.reset_after_dismiss();
                } else {
                    out.events.push(GestureEvent::DismissCancelled);
                    self.dismiss_progress = 0.0;
                }
                out.consumed = true;
            }
            GesturePhase::CommittedHorizontal => {
                // Left to the pager; nothing to emit.
            }
            GesturePhase::Zooming | GesturePhase::Idle => {
                out.consumed = true;
            }
        }
        self.path_length = 0.0;
    }

    /// Single-pointer path crossed the noise floor: commit to one axis,
    /// irrevocably for this gesture.
    fn commit_axis(&mut self, sample: &PointerSample, out: &mut Processed) {
        let net = sample.position - self.press_position;
        if net.x.abs() >= net.y.abs() * self.config.axis_dominance {
            // Horizontal page swipe. Not ours: the host's paging container
            // keeps consuming this stream.
            self.phase = GesturePhase::CommittedHorizontal;
            self.pending_tap = None;
            log::debug!("committed horizontal (net {:?})", net);
        } else {
            self.phase = GesturePhase::CommittedVertical;
            self.pending_tap = None;
            self.dismiss_progress = 0.0;
            log::debug!("committed vertical (net {:?})", net);
            self.advance_dismiss(net.y, &mut out.events);
            out.consumed = true;
        }
    }

    fn on_pinch_move(&mut self, out: &mut Processed) {
        let span = self.tracker.span();
        let centroid = self.tracker.centroid();
        let factor = zoom_factor(self.pinch_span, span);
        let pan_delta = centroid - self.pinch_centroid;
        self.pinch_span = span;
        self.pinch_centroid = centroid;

        let pivot = centroid - self.container.center();
        let mut next = scale_around_point(
            self.transform,
            pivot,
            factor,
            self.config.min_scale,
            self.config.max_scale,
        );
        next.offset += pan_delta;
        next.offset = clamp_pan(next.offset, next.scale, self.container);
        if next != self.transform {
            self.transform = next;
            out.events.push(GestureEvent::TransformChanged { transform: next });
        }
    }

    /// Pan by `delta`, clamping to the pan bounds, with the edge-penetration
    /// exception on the X axis: while the pan is pinned at a horizontal
    /// bound, clipped travel accumulates and converts to a page advance once
    /// it exceeds the edge threshold and the cooldown has elapsed. The
    /// offset stays pinned exactly at the bound so the outgoing frame is
    /// visually continuous into the next page.
    fn apply_pan(&mut self, delta: Point, timestamp_ms: u64, events: &mut SmallVec<[GestureEvent; 2]>) {
        let raw = self.transform.offset + delta;
        let extent = pan_extent(self.transform.scale, self.container);
        let clamped = clamp_pan(raw, self.transform.scale, self.container);

        if self.transform.scale > 1.0 {
            if raw.x > extent.x {
                self.edge_overshoot = self.edge_overshoot.max(0.0) + (raw.x - extent.x);
            } else if raw.x < -extent.x {
                self.edge_overshoot = self.edge_overshoot.min(0.0) + (raw.x + extent.x);
            } else {
                self.edge_overshoot = 0.0;
            }

            if self.edge_overshoot.abs() > self.config.edge_threshold_px
                && self.cooldown_elapsed(timestamp_ms)
            {
                // Pushing past the right pan bound means the user is looking
                // at the left edge of the content, i.e. wants the previous
                // page.
                let direction = if self.edge_overshoot > 0.0 { -1 } else { 1 };
                self.last_edge_advance_ms = Some(timestamp_ms);
                self.edge_overshoot = 0.0;
                events.push(GestureEvent::PageAdvance { direction });
                log::debug!("edge penetration -> PageAdvance({direction})");
            }
        }

        if clamped != self.transform.offset {
            self.transform.offset = clamped;
            events.push(GestureEvent::TransformChanged {
                transform: self.transform,
            });
        }
    }

    fn cooldown_elapsed(&self, timestamp_ms: u64) -> bool {
        match self.last_edge_advance_ms {
            None => true,
            Some(last) => timestamp_ms.saturating_sub(last) > self.config.edge_cooldown_ms,
        }
    }

    fn advance_dismiss(&mut self, delta_y: f32, events: &mut SmallVec<[GestureEvent; 2]>) {
        self.dismiss_progress += delta_y;
        let progress = self.dismiss_progress;
        if progress.abs() > self.config.dismiss_threshold_px {
            events.push(GestureEvent::Dismiss);
            self.reset_after_dismiss();
            return;
        }
        let alpha =
            (1.0 - progress.abs() / self.config.dismiss_threshold_px * 0.3).clamp(0.7, 1.0);
        events.push(GestureEvent::DismissProgress {
            progress,
            // Rubber-band: the content follows the finger at half speed.
            offset_y: progress * 0.5,
            alpha,
        });
    }

    fn resolve_tap(&mut self, sample: &PointerSample, out: &mut Processed) {
        out.consumed = true;
        if self.transform.scale > self.config.zoom_reset_threshold {
            // Any tap while zoomed exits zoom; it never dismisses.
            self.transform = ViewTransform::IDENTITY;
            out.events.push(GestureEvent::TransformChanged {
                transform: self.transform,
            });
            self.pending_tap = None;
            self.double_tap_armed = false;
        } else if self.double_tap_armed {
            self.double_tap_armed = false;
            self.zoom_to_tap(sample.position, out);
        } else {
            // Might be the first half of a double-tap; hold it until the
            // window closes.
            self.pending_tap = Some(PendingTap {
                position: sample.position,
                deadline_ms: sample.timestamp_ms + self.config.double_tap_window_ms,
            });
        }
    }

    /// Double-tap zoom-in: the tapped point stays visually fixed.
    fn zoom_to_tap(&mut self, tap: Point, out: &mut Processed) {
        let scale = self.config.double_tap_scale;
        let tap_centered = tap - self.container.center();
        let offset = clamp_pan(-tap_centered * (scale - 1.0), scale, self.container);
        self.transform = ViewTransform::new(scale, offset);
        out.events.push(GestureEvent::TransformChanged {
            transform: self.transform,
        });
    }

    fn expire_pending_tap(&mut self, now_ms: u64, events: &mut SmallVec<[GestureEvent; 2]>) {
        if let Some(pending) = self.pending_tap {
            if now_ms > pending.deadline_ms {
                self.pending_tap = None;
                events.push(GestureEvent::Tap {
                    position: pending.position,
                });
            }
        }
    }

    fn reset_after_dismiss(&mut self) {
        self.tracker.clear();
        self.velocity.reset();
        self.phase = GesturePhase::Idle;
        self.transform = ViewTransform::IDENTITY;
        self.dismiss_progress = 0.0;
        self.path_length = 0.0;
        self.pending_tap = None;
        self.double_tap_armed = false;
        self.edge_overshoot = 0.0;
        self.was_pinch = false;
    }

    /// Cancel from the platform: drop the gesture, keep the transform.
    fn abandon(&mut self) {
        self.tracker.clear();
        self.velocity.reset();
        self.phase = GesturePhase::Idle;
        self.dismiss_progress = 0.0;
        self.path_length = 0.0;
        self.pending_tap = None;
        self.double_tap_armed = false;
        self.edge_overshoot = 0.0;
        self.was_pinch = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> GestureClassifier {
        GestureClassifier::new(GestureConfig::default(), Size::new(1000.0, 1000.0))
            .expect("valid default config")
    }

    fn feed(classifier: &mut GestureClassifier, id: u64, position: Point, t: u64, phase: PointerPhase) {
        classifier.process(&PointerSample::new(id, position, t, phase));
    }

    #[test]
    fn axis_commitment_weighs_horizontal_at_the_dominance_ratio() {
        let mut c = classifier();
        feed(&mut c, 1, Point::new(500.0, 500.0), 0, PointerPhase::Down);
        feed(&mut c, 1, Point::new(517.0, 520.0), 16, PointerPhase::Move);
        assert_eq!(c.phase(), GesturePhase::CommittedHorizontal);

        let mut c = classifier();
        feed(&mut c, 1, Point::new(500.0, 500.0), 0, PointerPhase::Down);
        feed(&mut c, 1, Point::new(515.0, 520.0), 16, PointerPhase::Move);
        assert_eq!(c.phase(), GesturePhase::CommittedVertical);
    }

    #[test]
    fn edge_cooldown_boundary_is_exclusive() {
        let mut c = classifier();
        c.last_edge_advance_ms = Some(1_000);
        assert!(!c.cooldown_elapsed(1_500));
        assert!(c.cooldown_elapsed(1_501));
        c.last_edge_advance_ms = None;
        assert!(c.cooldown_elapsed(0));
    }

    #[test]
    fn reset_keeps_the_edge_cooldown() {
        let mut c = classifier();
        c.last_edge_advance_ms = Some(42);
        c.reset();
        assert_eq!(c.last_edge_advance_ms, Some(42));
    }
}
