//! Touch-gesture interpretation for the Shutter photo app.
//!
//! Two surfaces share this crate: the full-screen viewer
//! ([`GestureClassifier`]: pinch-zoom, pan, swipe paging, swipe dismiss,
//! taps, edge-penetration paging) and the photo grid
//! ([`RangeSelectController`]: long-press range selection with auto-scroll
//! intent). Both consume a uniform stream of [`shutter_input::PointerSample`]
//! values fed by the host once per frame and emit semantic events
//! synchronously; neither owns a timer, a thread, or any platform handle.

mod classifier;
mod config;
mod events;
mod range_select;

pub use classifier::{GestureClassifier, GesturePhase};
pub use config::{ConfigError, GestureConfig, GridConfig};
pub use events::{GestureEvent, Processed, SelectionEvent};
pub use range_select::{GridGeometry, RangeSelectController};

pub use shutter_geometry::{Point, Size, ViewTransform};
pub use shutter_input::{PointerId, PointerPhase, PointerSample};
