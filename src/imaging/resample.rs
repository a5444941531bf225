//! Adaptive resampler: quality-tiered region copy.
//!
//! A full area-averaging pass touches every source pixel, which dominates
//! the cost of shrinking a camera original to thumbnail size. When the
//! caller accepts some loss, the copy runs in two stages instead:
//!
//! ```text
//! source rect ──nearest──▶ intermediate (dst·q + 1) ──area-average──▶ dst rect
//! ```
//!
//! The nearest-neighbour stage reads one pixel per intermediate pixel, so
//! only the small intermediate pays for the averaging. Lower `quality`
//! means a smaller intermediate, more speed and more mosaic.
//!
//! | Regime | Condition | Passes |
//! |---|---|---|
//! | Full | `quality >= 5` | area-average src → dst |
//! | Two-stage | `quality < 5` and `dst·q` smaller than src on some axis | nearest src → tmp, area-average tmp → dst |
//! | Fallback | `quality < 5`, source not large enough | same as Full |
//!
//! Both passes are `image::imageops` calls on cropped views:
//! `resize(.., FilterType::Nearest)` for the pre-shrink and `thumbnail`
//! (block area averaging) for the final pass. The result lands in the
//! destination rectangle through `imageops::replace`.

use super::params::{Quality, Rect, ResampleRequest};
use image::imageops::{self, FilterType};
use image::{ImageBuffer, Pixel};
use log::debug;
use thiserror::Error;

/// Raster buffer with 8-bit channels, owning its storage.
pub type Raster<P> = ImageBuffer<P, Vec<u8>>;

/// Structural precondition violations. Reported before any pixel is written.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResampleError {
    #[error("source buffer is empty")]
    EmptySource,
    #[error("destination buffer is empty")]
    EmptyDestination,
    #[error("quality must be finite and greater than zero, got {0}")]
    InvalidQuality(f64),
    #[error("{which} rectangle is empty")]
    EmptyRegion { which: &'static str },
    #[error("{which} rectangle {rect:?} exceeds buffer {width}x{height}")]
    RegionOutOfBounds {
        which: &'static str,
        rect: Rect,
        width: u32,
        height: u32,
    },
}

/// Which code path a request takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regime {
    /// Single area-averaging pass.
    Full,
    /// Nearest pre-shrink into an intermediate of the given size, then area-average.
    TwoStage { width: u32, height: u32 },
}

/// A buffer is usable when it has pixels and its storage matches its size.
pub fn is_valid_buffer<P>(buffer: &Raster<P>) -> bool
where
    P: Pixel<Subpixel = u8>,
{
    let (w, h) = buffer.dimensions();
    w > 0
        && h > 0
        && (w as usize)
            .checked_mul(h as usize)
            .and_then(|n| n.checked_mul(usize::from(P::CHANNEL_COUNT)))
            .is_some_and(|len| len == buffer.as_raw().len())
}

/// Decide the regime for a request. Pure, no validation.
pub fn select_regime(src: Rect, dst: Rect, quality: Quality) -> Regime {
    let q = quality.value();
    if quality >= Quality::FULL {
        return Regime::Full;
    }
    let scaled_w = f64::from(dst.width) * q;
    let scaled_h = f64::from(dst.height) * q;
    if scaled_w < f64::from(src.width) || scaled_h < f64::from(src.height) {
        Regime::TwoStage {
            width: (scaled_w as u32).saturating_add(1),
            height: (scaled_h as u32).saturating_add(1),
        }
    } else {
        Regime::Full
    }
}

/// Copy `request.src` of `src` into `request.dst` of `dst`, resampling at
/// the requested quality.
///
/// Only the destination rectangle of `dst` is written; `src` is never
/// mutated. On error nothing is written.
pub fn resample<P>(
    dst: &mut Raster<P>,
    src: &Raster<P>,
    request: &ResampleRequest,
) -> Result<(), ResampleError>
where
    P: Pixel<Subpixel = u8> + 'static,
{
    validate(dst, src, request)?;

    let patch = match select_regime(request.src, request.dst, request.quality) {
        Regime::Full => {
            debug!(
                "resample {}x{} -> {}x{}: single pass (q={})",
                request.src.width,
                request.src.height,
                request.dst.width,
                request.dst.height,
                request.quality.value()
            );
            area_average(src, request.src, request.dst.width, request.dst.height)
        }
        Regime::TwoStage { width, height } => {
            debug!(
                "resample {}x{} -> {}x{}: two-stage via {}x{} (q={})",
                request.src.width,
                request.src.height,
                request.dst.width,
                request.dst.height,
                width,
                height,
                request.quality.value()
            );
            let temp = Intermediate::new(nearest(src, request.src, width, height));
            // The extra row/column absorbs rounding; the averaging pass reads
            // the scaled region only.
            let scaled = Rect::sized((width - 1).max(1), (height - 1).max(1));
            area_average(temp.buffer(), scaled, request.dst.width, request.dst.height)
        }
    };
    imageops::replace(dst, &patch, i64::from(request.dst.x), i64::from(request.dst.y));
    Ok(())
}

/// Nearest-neighbour shrink of `from` to `width`×`height`, no blending.
fn nearest<P>(src: &Raster<P>, from: Rect, width: u32, height: u32) -> Raster<P>
where
    P: Pixel<Subpixel = u8> + 'static,
{
    let view = imageops::crop_imm(src, from.x, from.y, from.width, from.height);
    imageops::resize(&*view, width, height, FilterType::Nearest)
}

/// Area-averaged resize of `from` to `width`×`height`. Reads nothing
/// outside `from`.
fn area_average<P>(src: &Raster<P>, from: Rect, width: u32, height: u32) -> Raster<P>
where
    P: Pixel<Subpixel = u8> + 'static,
{
    let view = imageops::crop_imm(src, from.x, from.y, from.width, from.height);
    imageops::thumbnail(&*view, width, height)
}

/// Positional form of [`resample`]: `true` on success.
#[allow(clippy::too_many_arguments)]
pub fn resample_copy<P>(
    dst: &mut Raster<P>,
    src: &Raster<P>,
    dst_x: u32,
    dst_y: u32,
    src_x: u32,
    src_y: u32,
    dst_w: u32,
    dst_h: u32,
    src_w: u32,
    src_h: u32,
    quality: f64,
) -> bool
where
    P: Pixel<Subpixel = u8> + 'static,
{
    let request = ResampleRequest {
        src: Rect::new(src_x, src_y, src_w, src_h),
        dst: Rect::new(dst_x, dst_y, dst_w, dst_h),
        quality: Quality::new(quality),
    };
    resample(dst, src, &request).is_ok()
}

fn validate<P>(dst: &Raster<P>, src: &Raster<P>, request: &ResampleRequest) -> Result<(), ResampleError>
where
    P: Pixel<Subpixel = u8>,
{
    if !is_valid_buffer(src) {
        return Err(ResampleError::EmptySource);
    }
    if !is_valid_buffer(dst) {
        return Err(ResampleError::EmptyDestination);
    }
    if !request.quality.is_valid() {
        return Err(ResampleError::InvalidQuality(request.quality.value()));
    }
    check_region("source", request.src, src)?;
    check_region("destination", request.dst, dst)
}

fn check_region<P>(which: &'static str, rect: Rect, buffer: &Raster<P>) -> Result<(), ResampleError>
where
    P: Pixel<Subpixel = u8>,
{
    if rect.is_empty() {
        return Err(ResampleError::EmptyRegion { which });
    }
    let (width, height) = buffer.dimensions();
    if !rect.fits_within(width, height) {
        return Err(ResampleError::RegionOutOfBounds {
            which,
            rect,
            width,
            height,
        });
    }
    Ok(())
}

/// Scratch buffer for the two-stage path, freed when it leaves scope.
struct Intermediate<P: Pixel<Subpixel = u8>> {
    buffer: Raster<P>,
}

impl<P: Pixel<Subpixel = u8>> Intermediate<P> {
    fn new(buffer: Raster<P>) -> Self {
        #[cfg(test)]
        tracking::opened();
        Self { buffer }
    }

    fn buffer(&self) -> &Raster<P> {
        &self.buffer
    }
}

impl<P: Pixel<Subpixel = u8>> Drop for Intermediate<P> {
    fn drop(&mut self) {
        #[cfg(test)]
        tracking::closed();
    }
}
