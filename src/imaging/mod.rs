//! Image processing: adaptive resampling and thumbnail renditions.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::image_dimensions` |
//! | **Resample** | [`resample`] over `imageops::resize` (nearest pre-shrink) + `imageops::thumbnail` (area averaging) |
//! | **Thumbnail** | [`center_crop_rect`] + [`resample`] |
//! | **Medium** | [`fit_within`] + [`resample`] |
//!
//! The module is split into:
//! - **Resample**: Quality-regime selection, validation and the two-stage scheduling
//! - **Calculations**: Pure functions for crop/fit geometry (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod resample;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{center_crop_rect, fit_within, needs_medium};
pub use operations::{
    GeneratedImage, MediumConfig, ThumbnailConfig, ThumbnailOutput, create_medium,
    create_thumbnail, get_dimensions,
};
pub use params::{MediumParams, Quality, Rect, ResampleRequest, ThumbnailParams};
pub use resample::{Raster, Regime, ResampleError, is_valid_buffer, resample, resample_copy, select_regime};
pub use rust_backend::{RustBackend, resample_region, supported_input_extensions};
