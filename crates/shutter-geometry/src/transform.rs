//! Pure transform math for the zoomable viewer.
//!
//! These functions are deterministic given identical inputs; the gesture
//! classifier builds its zoom/pan behaviour entirely on top of them so the
//! geometry can be tested without any gesture state.

use crate::{Point, Size};

/// Zoom/pan state of one viewer page.
///
/// `offset` is the translation applied after scaling, in container pixels,
/// with `(0, 0)` meaning the content is centered.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    pub scale: f32,
    pub offset: Point,
}

impl ViewTransform {
    pub const IDENTITY: ViewTransform = ViewTransform {
        scale: 1.0,
        offset: Point::ZERO,
    };

    pub const fn new(scale: f32, offset: Point) -> Self {
        Self { scale, offset }
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Applies a zoom factor around `pivot`, keeping the pivot visually fixed.
///
/// `pivot` is expressed relative to the container center, the same space as
/// `offset` (a pinch centered on the container therefore has pivot
/// `(0, 0)` and leaves a centered offset untouched). The scale is clamped to
/// `[min_scale, max_scale]` and the offset is scaled by the *effective*
/// factor, so clamping never makes the content drift.
pub fn scale_around_point(
    transform: ViewTransform,
    pivot: Point,
    factor: f32,
    min_scale: f32,
    max_scale: f32,
) -> ViewTransform {
    let new_scale = (transform.scale * factor).clamp(min_scale, max_scale);
    if new_scale == transform.scale {
        return transform;
    }
    let ratio = new_scale / transform.scale;
    let offset = (transform.offset - pivot) * ratio + pivot;
    ViewTransform::new(new_scale, offset)
}

/// Maximum pan offset per axis for the given scale: `(scale-1)*dim/2`,
/// floored at zero so scales below 1 never produce a negative extent.
pub fn pan_extent(scale: f32, container: Size) -> Point {
    let factor = (scale - 1.0).max(0.0) / 2.0;
    Point::new(container.width * factor, container.height * factor)
}

/// Clamps `offset` so the scaled content never reveals space past its edges.
pub fn clamp_pan(offset: Point, scale: f32, container: Size) -> Point {
    let extent = pan_extent(scale, container);
    Point::new(
        offset.x.clamp(-extent.x, extent.x),
        offset.y.clamp(-extent.y, extent.y),
    )
}

/// Arithmetic mean of the given positions. `Point::ZERO` when empty.
pub fn centroid(points: &[Point]) -> Point {
    if points.is_empty() {
        return Point::ZERO;
    }
    let mut sum = Point::ZERO;
    for p in points {
        sum += *p;
    }
    sum * (1.0 / points.len() as f32)
}

/// Pinch span: twice the mean distance from the centroid. Zero for fewer
/// than two pointers, where a span is meaningless.
pub fn span(points: &[Point]) -> f32 {
    if points.len() < 2 {
        return 0.0;
    }
    let center = centroid(points);
    let mean: f32 =
        points.iter().map(|p| p.distance_to(center)).sum::<f32>() / points.len() as f32;
    mean * 2.0
}

/// Incremental zoom factor between two pinch spans. Returns 1.0 when either
/// span is degenerate so a collapsing pinch never divides by zero.
pub fn zoom_factor(previous_span: f32, current_span: f32) -> f32 {
    if previous_span <= f32::EPSILON || current_span <= f32::EPSILON {
        1.0
    } else {
        current_span / previous_span
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTAINER: Size = Size {
        width: 1000.0,
        height: 1000.0,
    };

    #[test]
    fn scale_around_center_keeps_offset() {
        // Pinch with the centroid at the container center (pivot 0,0 in
        // center-relative space) from identity: content grows in place.
        let t = scale_around_point(ViewTransform::IDENTITY, Point::ZERO, 2.0, 1.0, 10.0);
        assert_eq!(t.scale, 2.0);
        assert_eq!(t.offset, Point::ZERO);
    }

    #[test]
    fn scale_around_off_center_pivot_keeps_pivot_fixed() {
        // A content point rendered at screen position p (center-relative)
        // sits at c = (p - offset) / scale. After zooming around p that same
        // content point must render at p again.
        let pivot = Point::new(200.0, -150.0);
        let before = ViewTransform::new(1.5, Point::new(40.0, 10.0));
        let c = Point::new(
            (pivot.x - before.offset.x) / before.scale,
            (pivot.y - before.offset.y) / before.scale,
        );
        let after = scale_around_point(before, pivot, 2.0, 1.0, 10.0);
        let rendered = c * after.scale + after.offset;
        assert!((rendered.x - pivot.x).abs() < 1e-3);
        assert!((rendered.y - pivot.y).abs() < 1e-3);
    }

    #[test]
    fn scale_is_clamped() {
        let t = scale_around_point(
            ViewTransform::new(8.0, Point::ZERO),
            Point::ZERO,
            4.0,
            1.0,
            10.0,
        );
        assert_eq!(t.scale, 10.0);

        let t = scale_around_point(t, Point::ZERO, 0.01, 1.0, 10.0);
        assert_eq!(t.scale, 1.0);
    }

    #[test]
    fn clamped_scale_keeps_pivot_math_consistent() {
        // When the factor is fully absorbed by the clamp, the transform is
        // returned untouched.
        let at_max = ViewTransform::new(10.0, Point::new(120.0, -40.0));
        let t = scale_around_point(at_max, Point::new(10.0, 10.0), 3.0, 1.0, 10.0);
        assert_eq!(t, at_max);
    }

    #[test]
    fn pan_extent_matches_formula() {
        assert_eq!(pan_extent(1.0, CONTAINER), Point::ZERO);
        assert_eq!(pan_extent(3.0, CONTAINER), Point::new(1000.0, 1000.0));
        // Below min zoom the extent floors at zero rather than inverting.
        assert_eq!(pan_extent(0.5, CONTAINER), Point::ZERO);
    }

    #[test]
    fn clamp_pan_pins_to_bounds() {
        let clamped = clamp_pan(Point::new(2000.0, -2000.0), 2.0, CONTAINER);
        assert_eq!(clamped, Point::new(500.0, -500.0));

        let inside = clamp_pan(Point::new(100.0, -250.0), 2.0, CONTAINER);
        assert_eq!(inside, Point::new(100.0, -250.0));
    }

    #[test]
    fn centroid_of_two_pointers() {
        let c = centroid(&[Point::new(100.0, 200.0), Point::new(300.0, 400.0)]);
        assert_eq!(c, Point::new(200.0, 300.0));
        assert_eq!(centroid(&[]), Point::ZERO);
    }

    #[test]
    fn span_and_zoom_factor() {
        let narrow = [Point::new(400.0, 500.0), Point::new(600.0, 500.0)];
        let wide = [Point::new(300.0, 500.0), Point::new(700.0, 500.0)];
        let s0 = span(&narrow);
        let s1 = span(&wide);
        assert_eq!(s0, 200.0);
        assert_eq!(s1, 400.0);
        assert_eq!(zoom_factor(s0, s1), 2.0);
        assert_eq!(zoom_factor(0.0, s1), 1.0);
        assert_eq!(span(&[Point::ZERO]), 0.0);
    }
}
