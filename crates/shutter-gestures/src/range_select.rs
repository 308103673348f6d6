//! Grid long-press range selection with auto-scroll intent.
//!
//! One controller per grid surface. The controller owns the selection set
//! and stays pure and synchronous: it never runs a timer, the host drives a
//! periodic scroll tick for as long as the last emitted scroll intent is
//! non-zero.

use crate::config::{ConfigError, GridConfig};
use crate::events::SelectionEvent;
use indexmap::IndexSet;
use shutter_geometry::Point;
use shutter_input::{PointerPhase, PointerSample};
use smallvec::SmallVec;

/// Host-side grid geometry. A trait seam so the controller works identically
/// for regular and staggered/waterfall layouts; range membership is defined
/// by list index order, never by geometric adjacency.
pub trait GridGeometry {
    /// Item under the given viewport position, if any. A miss is "no hit",
    /// never a fault.
    fn item_at(&self, position: Point) -> Option<usize>;
    fn item_count(&self) -> usize;
    fn viewport_height(&self) -> f32;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SelectPhase {
    Idle,
    /// Pressed on an item, path still below the drag threshold.
    LongPressPending { anchor: usize },
    /// Path exceeded the threshold; the selection follows the drag. Anchor
    /// and current are always set together while dragging.
    DragSelecting { anchor: usize, current: usize },
}

/// Long-press / drag-select state machine for the photo grid.
pub struct RangeSelectController {
    config: GridConfig,
    phase: SelectPhase,
    selection: IndexSet<usize>,
    /// Selection as it was when the current gesture started.
    initial_selection: IndexSet<usize>,
    last_emitted: IndexSet<usize>,
    last_position: Point,
    path_length: f32,
    scroll_direction: i8,
}

impl RangeSelectController {
    pub fn new(config: GridConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            phase: SelectPhase::Idle,
            selection: IndexSet::new(),
            initial_selection: IndexSet::new(),
            last_emitted: IndexSet::new(),
            last_position: Point::ZERO,
            path_length: 0.0,
            scroll_direction: 0,
        })
    }

    /// Current selection set.
    pub fn selection(&self) -> &IndexSet<usize> {
        &self.selection
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, SelectPhase::DragSelecting { .. })
    }

    /// Clears the gesture and the selection. Called on navigation change or
    /// when the host leaves selection mode.
    pub fn reset(&mut self) {
        self.phase = SelectPhase::Idle;
        self.selection.clear();
        self.initial_selection.clear();
        self.last_emitted.clear();
        self.path_length = 0.0;
        self.scroll_direction = 0;
    }

    /// Feeds one pointer sample. `geometry` supplies the item lookup and
    /// viewport metrics for this frame.
    pub fn process(
        &mut self,
        sample: &PointerSample,
        geometry: &dyn GridGeometry,
    ) -> SmallVec<[SelectionEvent; 3]> {
        let mut events = SmallVec::new();
        match sample.phase {
            PointerPhase::Down => self.on_down(sample, geometry, &mut events),
            PointerPhase::Move => self.on_move(sample, geometry, &mut events),
            PointerPhase::Up => self.on_up(&mut events),
            PointerPhase::Cancel => {
                // Keep whatever selection the host already saw; just stop.
                if self.scroll_direction != 0 {
                    self.scroll_direction = 0;
                    events.push(SelectionEvent::ScrollIntent { direction: 0 });
                }
                self.phase = SelectPhase::Idle;
                self.path_length = 0.0;
            }
        }
        events
    }

    fn on_down(
        &mut self,
        sample: &PointerSample,
        geometry: &dyn GridGeometry,
        events: &mut SmallVec<[SelectionEvent; 3]>,
    ) {
        if self.phase != SelectPhase::Idle {
            log::warn!("Down during an active selection gesture; restarting");
        }
        self.last_position = sample.position;
        self.path_length = 0.0;
        self.scroll_direction = 0;

        let anchor = match geometry.item_at(sample.position) {
            Some(index) if index < geometry.item_count() => index,
            _ => {
                // Pressed between items: nothing to select, the host list
                // scrolls as usual.
                self.phase = SelectPhase::Idle;
                return;
            }
        };

        // The anchor joins the selection at press time; the LongPress event
        // on release is idempotent over this.
        self.initial_selection = self.selection.clone();
        if self.selection.insert(anchor) {
            self.emit_selection(events);
            if self.config.haptic_feedback {
                events.push(SelectionEvent::Haptic);
            }
        }
        self.phase = SelectPhase::LongPressPending { anchor };
    }

    fn on_move(
        &mut self,
        sample: &PointerSample,
        geometry: &dyn GridGeometry,
        events: &mut SmallVec<[SelectionEvent; 3]>,
    ) {
        if self.phase == SelectPhase::Idle {
            return;
        }
        // Cumulative path, not net displacement: a jittering finger that
        // travels far has dragged, however small its net motion.
        self.path_length += (sample.position - self.last_position).length();
        self.last_position = sample.position;

        if let SelectPhase::LongPressPending { anchor } = self.phase {
            if self.path_length < self.config.drag_threshold_px {
                return;
            }
            self.phase = SelectPhase::DragSelecting {
                anchor,
                current: anchor,
            };
            log::debug!("drag selection started at item {anchor}");
        }

        let (anchor, current) = match self.phase {
            SelectPhase::DragSelecting { anchor, current } => (anchor, current),
            // Only reachable for Idle/pending, both returned above.
            _ => return,
        };

        if let Some(hit) = geometry.item_at(sample.position) {
            if hit != current && hit < geometry.item_count() {
                self.phase = SelectPhase::DragSelecting {
                    anchor,
                    current: hit,
                };
                self.recompute_range(anchor, hit, geometry.item_count(), events);
            }
        }

        let direction = self.auto_scroll_direction(sample.position, geometry.viewport_height());
        if direction != self.scroll_direction {
            self.scroll_direction = direction;
            events.push(SelectionEvent::ScrollIntent { direction });
        }
    }

    fn on_up(&mut self, events: &mut SmallVec<[SelectionEvent; 3]>) {
        match self.phase {
            SelectPhase::Idle => {}
            SelectPhase::LongPressPending { anchor } => {
                events.push(SelectionEvent::LongPress { index: anchor });
            }
            SelectPhase::DragSelecting { .. } => {
                if self.scroll_direction != 0 {
                    self.scroll_direction = 0;
                    events.push(SelectionEvent::ScrollIntent { direction: 0 });
                }
            }
        }
        self.phase = SelectPhase::Idle;
        self.path_length = 0.0;
    }

    /// Selection = initial ∪ [min(anchor, current), max(anchor, current)],
    /// clamped to the live item count. Depends only on the endpoints, never
    /// on the path between them.
    fn recompute_range(
        &mut self,
        anchor: usize,
        current: usize,
        item_count: usize,
        events: &mut SmallVec<[SelectionEvent; 3]>,
    ) {
        if item_count == 0 {
            return;
        }
        let limit = item_count - 1;
        let low = anchor.min(current).min(limit);
        let high = anchor.max(current).min(limit);

        let mut next = self.initial_selection.clone();
        next.extend(low..=high);

        if next != self.selection {
            self.selection = next;
            self.emit_selection(events);
            if self.config.haptic_feedback {
                events.push(SelectionEvent::Haptic);
            }
        }
    }

    fn auto_scroll_direction(&self, position: Point, viewport_height: f32) -> i8 {
        if position.y < self.config.auto_scroll_margin_px {
            -1
        } else if position.y > viewport_height - self.config.auto_scroll_margin_px {
            1
        } else {
            0
        }
    }

    fn emit_selection(&mut self, events: &mut SmallVec<[SelectionEvent; 3]>) {
        if self.selection != self.last_emitted {
            self.last_emitted = self.selection.clone();
            events.push(SelectionEvent::SelectionChanged {
                selected: self.selection.clone(),
            });
        }
    }
}
