//! Platform-independent pointer input for the Shutter gesture cores.
//!
//! The host adapts whatever device API it has (Android MotionEvent, winit,
//! a test script) into [`PointerSample`] values and feeds them to a gesture
//! core once per frame. Nothing in this crate touches a clock or a device.

mod sample;
mod tracker;
mod velocity;

pub use sample::{PointerId, PointerPhase, PointerSample};
pub use tracker::PointerTracker;
pub use velocity::{VelocityTracker1d, VelocityTracker2d};
