//! Parameter types for resample operations.
//!
//! These structs describe *what* region to copy and at which fidelity, not
//! *how* the pixels get there. [`operations`](super::operations) builds them
//! from file-level intents (thumbnail, medium) and
//! [`resample`](super::resample) executes them.
//!
//! ## Types
//!
//! - [`Quality`]: Speed/fidelity dial for the resampler (any finite value > 0, default 4).
//! - [`Rect`]: Pixel rectangle inside a raster buffer.
//! - [`ResampleRequest`]: Source rectangle, destination rectangle and quality for one copy.
//! - [`ThumbnailParams`]: File-level thumbnail: source, output, crop size, quality.
//! - [`MediumParams`]: File-level medium rendition: source, output, bounding box, quality.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Speed/fidelity dial for [`resample`](super::resample::resample).
///
/// - `(0, 1)`: fast, visibly mosaic; closer to 0 increases the effect
/// - `1`: looks very similar to a plain nearest-neighbour resize
/// - `2`: slightly sharp, some prefer it over 3
/// - `3`: smooth, very close to the full-quality pass
/// - `4`: almost identical to the full-quality pass for most images
/// - `>= 5`: always the full-quality pass, no speedup
///
/// Fractional values are legal. The value is *not* clamped: validity is
/// checked by the resampler so that a bad dial is reported, not hidden.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quality(pub f64);

impl Quality {
    /// At or above this value the two-stage path never pays off.
    pub const FULL: Quality = Quality(5.0);

    pub fn new(value: f64) -> Self {
        Self(value)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Finite and strictly positive.
    pub fn is_valid(self) -> bool {
        self.0.is_finite() && self.0 > 0.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(4.0)
    }
}

/// Axis-aligned pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle at the origin covering `width × height`.
    pub fn sized(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// True when the rectangle lies entirely inside a `width × height` buffer.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        u64::from(self.x) + u64::from(self.width) <= u64::from(width)
            && u64::from(self.y) + u64::from(self.height) <= u64::from(height)
    }
}

/// One region-to-region copy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResampleRequest {
    pub src: Rect,
    pub dst: Rect,
    pub quality: Quality,
}

impl ResampleRequest {
    /// Copy the whole of a `src_w × src_h` source into a `dst_w × dst_h`
    /// destination, both anchored at the origin.
    pub fn whole(src: (u32, u32), dst: (u32, u32), quality: Quality) -> Self {
        Self {
            src: Rect::sized(src.0, src.1),
            dst: Rect::sized(dst.0, dst.1),
            quality,
        }
    }
}

/// Parameters for a thumbnail operation (center crop + resample).
#[derive(Debug, Clone, PartialEq)]
pub struct ThumbnailParams {
    pub source: PathBuf,
    pub output: PathBuf,
    /// Final thumbnail dimensions; the crop takes their aspect ratio.
    pub width: u32,
    pub height: u32,
    pub quality: Quality,
    /// JPEG encoder quality (1-100), ignored by lossless formats.
    pub encode_quality: u8,
}

/// Parameters for a medium rendition (fit within a box, never upscale).
#[derive(Debug, Clone, PartialEq)]
pub struct MediumParams {
    pub source: PathBuf,
    pub output: PathBuf,
    /// Bounding box; `0` leaves that axis unbounded.
    pub max_width: u32,
    pub max_height: u32,
    pub quality: Quality,
    pub encode_quality: u8,
}
