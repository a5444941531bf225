//! High-level image operations.
//!
//! These functions combine calculations with backend execution.
//! They take configuration, compute parameters, and call the backend.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::{center_crop_rect, needs_medium};
use super::params::{MediumParams, Quality, ThumbnailParams};
use crate::extension::extract_extension;
use std::path::Path;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Get image dimensions using the backend.
pub fn get_dimensions(backend: &impl ImageBackend, path: &Path) -> Result<(u32, u32)> {
    let dims = backend.identify(path)?;
    Ok((dims.width, dims.height))
}

/// Output extension for a generated rendition of `source`.
///
/// Formats that carry transparency keep their own encoder; everything else
/// (JPEG, TIFF, unknown) becomes JPEG.
pub fn output_extension(source: &Path) -> &'static str {
    let ext = extract_extension(&source.to_string_lossy(), false).to_ascii_lowercase();
    match ext.as_str() {
        ".png" => ".png",
        ".gif" => ".gif",
        ".webp" => ".webp",
        _ => ".jpg",
    }
}

/// A file written by an operation, relative to the output root.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GeneratedImage {
    pub path: String,
    pub width: u32,
    pub height: u32,
}

/// Configuration for thumbnail generation.
#[derive(Debug, Clone)]
pub struct ThumbnailConfig {
    pub width: u32,
    pub height: u32,
    pub quality: Quality,
    pub encode_quality: u8,
    /// Also write a double-resolution `@2x` variant when the source crop is large enough.
    pub retina: bool,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            width: 200,
            height: 200,
            quality: Quality::default(),
            encode_quality: 90,
            retina: true,
        }
    }
}

/// Thumbnail plus optional retina variant.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ThumbnailOutput {
    pub thumb: GeneratedImage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retina: Option<GeneratedImage>,
}

/// Plan a thumbnail operation without executing it.
///
/// Useful for testing parameter generation.
pub fn plan_thumbnail(
    source: &Path,
    output_path: &Path,
    scale: u32,
    config: &ThumbnailConfig,
) -> ThumbnailParams {
    ThumbnailParams {
        source: source.to_path_buf(),
        output: output_path.to_path_buf(),
        width: config.width.saturating_mul(scale),
        height: config.height.saturating_mul(scale),
        quality: config.quality,
        encode_quality: config.encode_quality,
    }
}

/// Create a thumbnail image (and its `@2x` variant when enabled).
///
/// The retina variant is skipped when the center crop of the source is
/// smaller than twice the thumbnail size, since it would only upscale.
pub fn create_thumbnail(
    backend: &impl ImageBackend,
    source: &Path,
    output_dir: &Path,
    filename_stem: &str,
    original_dims: (u32, u32),
    config: &ThumbnailConfig,
) -> Result<ThumbnailOutput> {
    let ext = output_extension(source);
    let thumb_name = format!("{}-thumb{}", filename_stem, ext);
    let params = plan_thumbnail(source, &output_dir.join(&thumb_name), 1, config);
    let dims = backend.thumbnail(&params)?;
    let thumb = generated(output_dir, &thumb_name, dims);

    let crop = center_crop_rect(original_dims, (config.width.max(1), config.height.max(1)));
    let fits_double = |have: u32, want: u32| u64::from(have) >= u64::from(want) * 2;
    let retina = if config.retina
        && fits_double(crop.width, config.width)
        && fits_double(crop.height, config.height)
    {
        let retina_name = format!("{}-thumb@2x{}", filename_stem, ext);
        let params = plan_thumbnail(source, &output_dir.join(&retina_name), 2, config);
        let dims = backend.thumbnail(&params)?;
        Some(generated(output_dir, &retina_name, dims))
    } else {
        None
    };

    Ok(ThumbnailOutput { thumb, retina })
}

/// Configuration for medium rendition generation.
#[derive(Debug, Clone)]
pub struct MediumConfig {
    pub max_width: u32,
    pub max_height: u32,
    pub quality: Quality,
    pub encode_quality: u8,
}

impl Default for MediumConfig {
    fn default() -> Self {
        Self {
            max_width: 1920,
            max_height: 1080,
            quality: Quality::FULL,
            encode_quality: 90,
        }
    }
}

/// Create a medium rendition when the source exceeds the bounding box.
///
/// Returns `None` without touching the backend for sources that already fit.
pub fn create_medium(
    backend: &impl ImageBackend,
    source: &Path,
    output_dir: &Path,
    filename_stem: &str,
    original_dims: (u32, u32),
    config: &MediumConfig,
) -> Result<Option<GeneratedImage>> {
    if !needs_medium(original_dims, (config.max_width, config.max_height)) {
        return Ok(None);
    }

    let name = format!("{}-medium{}", filename_stem, output_extension(source));
    let dims = backend.medium(&MediumParams {
        source: source.to_path_buf(),
        output: output_dir.join(&name),
        max_width: config.max_width,
        max_height: config.max_height,
        quality: config.quality,
        encode_quality: config.encode_quality,
    })?;

    Ok(Some(generated(output_dir, &name, dims)))
}

fn generated(output_dir: &Path, name: &str, dims: Dimensions) -> GeneratedImage {
    let relative_dir = output_dir
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let path = if relative_dir.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", relative_dir, name)
    };

    GeneratedImage {
        path,
        width: dims.width,
        height: dims.height,
    }
}
