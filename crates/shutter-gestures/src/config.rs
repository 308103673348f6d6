//! Gesture thresholds and their validation.
//!
//! All values are in logical pixels (or milliseconds where named so) and are
//! fixed for the lifetime of a classifier/controller instance. For very
//! high-density touch screens the host may scale the pixel thresholds by the
//! device's density factor before construction.

use std::error::Error;
use std::fmt;

/// Thresholds for the full-screen viewer classifier.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureConfig {
    /// Accumulated path length before a single-pointer gesture commits to an
    /// axis. Large enough to swallow finger jitter on real panels.
    pub noise_floor_px: f32,
    /// Overshoot past a pan bound required to read the push as a request to
    /// change pages rather than pan noise.
    pub edge_threshold_px: f32,
    /// Minimum spacing between two edge-penetration page advances, judged by
    /// sample timestamps.
    pub edge_cooldown_ms: u64,
    /// Accumulated vertical travel that commits a dismiss.
    pub dismiss_threshold_px: f32,
    /// Release speed (px/s) that commits a dismiss below the travel
    /// threshold.
    pub dismiss_flick_velocity: f32,
    /// Target scale of a double-tap zoom-in.
    pub double_tap_scale: f32,
    /// Window between two taps read as a double-tap. Matches Android's
    /// ViewConfiguration default.
    pub double_tap_window_ms: u64,
    pub min_scale: f32,
    pub max_scale: f32,
    /// Axis dominance ratio for intent commitment: horizontal wins when
    /// `|dx| >= |dy| * axis_dominance`.
    pub axis_dominance: f32,
    /// Above this scale a tap means "leave zoom", below it taps reach the
    /// host.
    pub zoom_reset_threshold: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            noise_floor_px: 20.0,
            edge_threshold_px: 100.0,
            edge_cooldown_ms: 500,
            dismiss_threshold_px: 450.0,
            dismiss_flick_velocity: 2400.0,
            double_tap_scale: 2.5,
            double_tap_window_ms: 300,
            min_scale: 1.0,
            max_scale: 10.0,
            axis_dominance: 0.8,
            zoom_reset_threshold: 1.1,
        }
    }
}

impl GestureConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("noise_floor_px", self.noise_floor_px),
            ("edge_threshold_px", self.edge_threshold_px),
            ("dismiss_threshold_px", self.dismiss_threshold_px),
            ("dismiss_flick_velocity", self.dismiss_flick_velocity),
            ("axis_dominance", self.axis_dominance),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NonPositive { name, value });
            }
        }
        if !(self.min_scale.is_finite() && self.max_scale.is_finite())
            || self.min_scale <= 0.0
            || self.max_scale < self.min_scale
        {
            return Err(ConfigError::ScaleRange {
                min: self.min_scale,
                max: self.max_scale,
            });
        }
        if self.double_tap_scale < self.min_scale || self.double_tap_scale > self.max_scale {
            return Err(ConfigError::DoubleTapScaleOutOfRange {
                scale: self.double_tap_scale,
                min: self.min_scale,
                max: self.max_scale,
            });
        }
        Ok(())
    }
}

/// Thresholds for the grid range-select controller.
///
/// The source carried several near-identical drag-select grids differing
/// only in these knobs; they are configuration here, not separate
/// implementations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridConfig {
    /// Cumulative path length separating a long-press from a drag-select.
    pub drag_threshold_px: f32,
    /// Height of the top/bottom bands that request auto-scroll while
    /// dragging.
    pub auto_scroll_margin_px: f32,
    /// Emit haptic ticks on selection milestones.
    pub haptic_feedback: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            drag_threshold_px: 8.0,
            auto_scroll_margin_px: 80.0,
            haptic_feedback: true,
        }
    }
}

impl GridConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("drag_threshold_px", self.drag_threshold_px),
            ("auto_scroll_margin_px", self.auto_scroll_margin_px),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NonPositive { name, value });
            }
        }
        Ok(())
    }
}

/// Rejected configuration. The only fallible surface in the crate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ConfigError {
    NonPositive { name: &'static str, value: f32 },
    ScaleRange { min: f32, max: f32 },
    DoubleTapScaleOutOfRange { scale: f32, min: f32, max: f32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonPositive { name, value } => {
                write!(f, "{name} must be a positive finite number, got {value}")
            }
            ConfigError::ScaleRange { min, max } => {
                write!(f, "invalid scale range: min={min}, max={max}")
            }
            ConfigError::DoubleTapScaleOutOfRange { scale, min, max } => {
                write!(
                    f,
                    "double_tap_scale {scale} outside scale range [{min}, {max}]"
                )
            }
        }
    }
}

impl Error for ConfigError {}
