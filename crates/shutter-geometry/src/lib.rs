//! Geometric primitives and transform math shared by the viewer and grid
//! gesture cores. Everything here is pure data and deterministic functions.

mod geometry;
mod transform;

pub use geometry::{Point, Size};
pub use transform::{
    centroid, clamp_pan, pan_extent, scale_around_point, span, zoom_factor, ViewTransform,
};
