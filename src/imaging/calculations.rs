//! Pure calculation functions for thumbnail and medium geometry.
//!
//! All functions here are pure and testable without any I/O or images.

use super::params::Rect;

/// Largest rectangle of the target aspect ratio centered in the source.
///
/// This is the source region a cropped thumbnail is resampled from: the
/// surplus on the longer axis is split evenly between both sides.
///
/// # Arguments
/// * `source` - Original image dimensions (width, height)
/// * `aspect` - Target aspect ratio as (width, height)
///
/// # Examples
/// ```
/// # use lighttable::imaging::{Rect, center_crop_rect};
/// // Landscape 4000x3000 cropped square → middle 3000x3000
/// assert_eq!(center_crop_rect((4000, 3000), (1, 1)), Rect::new(500, 0, 3000, 3000));
///
/// // Portrait 600x800 cropped 3:2 → full width, 400 rows from the middle
/// assert_eq!(center_crop_rect((600, 800), (3, 2)), Rect::new(0, 200, 600, 400));
/// ```
pub fn center_crop_rect(source: (u32, u32), aspect: (u32, u32)) -> Rect {
    let (src_w, src_h) = source;
    let (aspect_w, aspect_h) = aspect;

    let src_ratio = src_w as f64 / src_h as f64;
    let tgt_ratio = aspect_w as f64 / aspect_h as f64;

    if src_ratio > tgt_ratio {
        // Source is wider: keep full height, trim the sides
        let w = ((src_h as f64 * tgt_ratio).round() as u32).clamp(1, src_w);
        Rect::new((src_w - w) / 2, 0, w, src_h)
    } else {
        // Source is taller (or equal): keep full width, trim top and bottom
        let h = ((src_w as f64 / tgt_ratio).round() as u32).clamp(1, src_h);
        Rect::new(0, (src_h - h) / 2, src_w, h)
    }
}

/// Dimensions that fit the source inside a bounding box, preserving aspect.
///
/// Never upscales: a source already inside the box keeps its size. A zero
/// bound means "unbounded" on that axis, matching how the gallery config
/// expresses "no height limit".
///
/// # Returns
/// * `(width, height)` - Fitted dimensions, each at least 1
pub fn fit_within(source: (u32, u32), bounds: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (max_w, max_h) = bounds;

    let scale_w = if max_w == 0 {
        f64::INFINITY
    } else {
        max_w as f64 / src_w as f64
    };
    let scale_h = if max_h == 0 {
        f64::INFINITY
    } else {
        max_h as f64 / src_h as f64
    };
    let scale = scale_w.min(scale_h);

    if scale >= 1.0 {
        return (src_w, src_h);
    }

    let w = ((src_w as f64 * scale).round() as u32).max(1);
    let h = ((src_h as f64 * scale).round() as u32).max(1);
    (w, h)
}

/// Whether a medium rendition is worth generating at all.
///
/// Only sources that exceed the bounding box on some axis get one; smaller
/// images are served as-is.
pub fn needs_medium(source: (u32, u32), bounds: (u32, u32)) -> bool {
    fit_within(source, bounds) != source
}
