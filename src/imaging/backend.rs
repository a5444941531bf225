//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three file-level operations every
//! backend must support: identify, thumbnail and medium.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), which decodes with the
//! `image` crate and shrinks with the adaptive
//! [`resample`](super::resample::resample).

use super::params::{MediumParams, ThumbnailParams};
use super::resample::ResampleError;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Resample failed: {0}")]
    Resample(#[from] ResampleError),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl From<(u32, u32)> for Dimensions {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

/// Trait for image processing backends.
///
/// Keeps [`operations`](super::operations) and the batch
/// [`process`](crate::process) stage independent of decoding, so tests can
/// substitute a recording mock.
pub trait ImageBackend: Sync {
    /// Get image dimensions.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Center-crop to the thumbnail aspect and resample to its exact size.
    fn thumbnail(&self, params: &ThumbnailParams) -> Result<Dimensions, BackendError>;

    /// Shrink to fit the bounding box. Returns the written dimensions.
    fn medium(&self, params: &MediumParams) -> Result<Dimensions, BackendError>;
}
