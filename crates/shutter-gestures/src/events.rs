//! Semantic events emitted by the gesture cores.
//!
//! Events are returned synchronously from `process()`; the host maps them
//! onto its own callbacks (re-render, navigation, selection handling). The
//! cores never call back into the host.

use indexmap::IndexSet;
use shutter_geometry::{Point, ViewTransform};
use smallvec::SmallVec;

/// Events from the viewer classifier.
#[derive(Clone, Debug, PartialEq)]
pub enum GestureEvent {
    /// Zoom/pan state changed; the host re-renders with this transform.
    TransformChanged { transform: ViewTransform },
    /// Advance to the adjacent page. `-1` is the previous page, `1` the next.
    PageAdvance { direction: i8 },
    /// A committed vertical dismiss gesture moved. `offset_y` is the
    /// rubber-banded translation to render, `alpha` the fade to apply.
    DismissProgress { progress: f32, offset_y: f32, alpha: f32 },
    /// A vertical gesture was released without reaching the dismiss
    /// threshold; the host animates the content back into place.
    DismissCancelled,
    /// The dismiss threshold (distance or flick velocity) was crossed.
    Dismiss,
    /// A plain tap at rest scale. What a tap means (toggle chrome, dismiss)
    /// is host policy.
    Tap { position: Point },
}

/// Per-sample output of the viewer classifier.
///
/// `consumed` mirrors the consumption handshake with the host's paging
/// container: a stream committed to horizontal paging is reported
/// unconsumed so the pager keeps reading the same samples.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Processed {
    pub events: SmallVec<[GestureEvent; 2]>,
    pub consumed: bool,
}

impl Processed {
    pub(crate) fn unconsumed() -> Self {
        Self::default()
    }
}

/// Events from the grid range-select controller.
#[derive(Clone, Debug, PartialEq)]
pub enum SelectionEvent {
    /// The selection set changed. Emitted only when the set differs from the
    /// previously emitted one.
    SelectionChanged { selected: IndexSet<usize> },
    /// A press was released below the drag threshold. The anchor item is
    /// already part of the selection; handling this is idempotent.
    LongPress { index: usize },
    /// The drag entered (`-1`/`1`) or left (`0`) an auto-scroll band. The
    /// host owns the periodic scroll tick.
    ScrollIntent { direction: i8 },
    /// Feedback tick for the platform vibrator, when enabled.
    Haptic,
}
