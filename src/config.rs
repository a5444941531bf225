//! Configuration module.
//!
//! Handles loading and validating `lighttable.toml`. The file is optional:
//! without it every command runs on stock defaults.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [thumbnails]
//! width = 200               # Thumbnail width in pixels (at most 8192)
//! height = 200              # Thumbnail height in pixels (at most 8192)
//! quality = 4.0             # Resample quality (< 5 allows the fast two-stage path)
//! retina = true             # Also write a @2x variant when the source is large enough
//! jpeg_quality = 90         # JPEG encode quality (1-100)
//!
//! [medium]
//! max_width = 1920          # Bounding box for the medium rendition
//! max_height = 1080
//! quality = 5.0             # Full-quality area averaging
//! jpeg_quality = 90
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{MediumConfig, Quality, ThumbnailConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Largest accepted thumbnail edge. The `@2x` variant doubles it.
pub const MAX_THUMBNAIL_EDGE: u32 = 8192;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `lighttable.toml`.
///
/// All fields have defaults; a file need only specify what it overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LighttableConfig {
    /// Thumbnail size and quality.
    pub thumbnails: ThumbnailsConfig,
    /// Medium rendition bounding box and quality.
    pub medium: MediumSection,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl LighttableConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.thumbnails;
        if t.width == 0 || t.height == 0 {
            return Err(ConfigError::Validation(
                "thumbnails.width and thumbnails.height must be non-zero".into(),
            ));
        }
        if t.width > MAX_THUMBNAIL_EDGE || t.height > MAX_THUMBNAIL_EDGE {
            return Err(ConfigError::Validation(format!(
                "thumbnails.width and thumbnails.height must be at most {MAX_THUMBNAIL_EDGE}"
            )));
        }
        if !t.quality.is_valid() {
            return Err(ConfigError::Validation(
                "thumbnails.quality must be a positive number".into(),
            ));
        }
        if !(1..=100).contains(&t.jpeg_quality) {
            return Err(ConfigError::Validation(
                "thumbnails.jpeg_quality must be 1-100".into(),
            ));
        }

        let m = &self.medium;
        if m.max_width == 0 && m.max_height == 0 {
            return Err(ConfigError::Validation(
                "medium.max_width and medium.max_height cannot both be zero".into(),
            ));
        }
        if !m.quality.is_valid() {
            return Err(ConfigError::Validation(
                "medium.quality must be a positive number".into(),
            ));
        }
        if !(1..=100).contains(&m.jpeg_quality) {
            return Err(ConfigError::Validation(
                "medium.jpeg_quality must be 1-100".into(),
            ));
        }

        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Thumbnail operation settings derived from this config.
    pub fn thumbnail_config(&self) -> ThumbnailConfig {
        ThumbnailConfig {
            width: self.thumbnails.width,
            height: self.thumbnails.height,
            quality: self.thumbnails.quality,
            encode_quality: self.thumbnails.jpeg_quality,
            retina: self.thumbnails.retina,
        }
    }

    /// Medium operation settings derived from this config.
    pub fn medium_config(&self) -> MediumConfig {
        MediumConfig {
            max_width: self.medium.max_width,
            max_height: self.medium.max_height,
            quality: self.medium.quality,
            encode_quality: self.medium.jpeg_quality,
        }
    }
}

/// Thumbnail generation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThumbnailsConfig {
    pub width: u32,
    pub height: u32,
    /// Resample quality. Below 5 the resampler may take its two-stage path.
    pub quality: Quality,
    /// Write a double-resolution `@2x` variant when possible.
    pub retina: bool,
    pub jpeg_quality: u8,
}

impl Default for ThumbnailsConfig {
    fn default() -> Self {
        let ops = ThumbnailConfig::default();
        Self {
            width: ops.width,
            height: ops.height,
            quality: ops.quality,
            retina: ops.retina,
            jpeg_quality: ops.encode_quality,
        }
    }
}

/// Medium rendition settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MediumSection {
    /// Maximum width; `0` leaves width unbounded.
    pub max_width: u32,
    /// Maximum height; `0` leaves height unbounded.
    pub max_height: u32,
    pub quality: Quality,
    pub jpeg_quality: u8,
}

impl Default for MediumSection {
    fn default() -> Self {
        let ops = MediumConfig::default();
        Self {
            max_width: ops.max_width,
            max_height: ops.max_height,
            quality: ops.quality,
            jpeg_quality: ops.encode_quality,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel image processing workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

/// Parse and validate config text.
pub fn parse_config(content: &str) -> Result<LighttableConfig, ConfigError> {
    let config: LighttableConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`.
///
/// A missing file yields the stock defaults. A file that exists but fails
/// to parse or validate is an error.
pub fn load_config(path: &Path) -> Result<LighttableConfig, ConfigError> {
    if !path.exists() {
        log::debug!("no config at {}, using defaults", path.display());
        return Ok(LighttableConfig::default());
    }
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Returns a fully-commented stock `lighttable.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# lighttable configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Thumbnails
# ---------------------------------------------------------------------------
[thumbnails]
# Output size in pixels, at most 8192 per edge. The source is center-cropped
# to this aspect ratio.
width = 200
height = 200

# Resample quality. 5 and above always averages every source pixel.
# Below 5, large reductions first pick nearest pixels into an intermediate
# roughly `quality` times the output size, then average that down.
quality = 4.0

# Also write a double-resolution "@2x" thumbnail when the source crop is at
# least twice the thumbnail size.
retina = true

# JPEG encoding quality (1 = worst, 100 = best).
jpeg_quality = 90

# ---------------------------------------------------------------------------
# Medium rendition
# ---------------------------------------------------------------------------
[medium]
# Bounding box. Images larger than this get a downscaled copy that keeps
# the aspect ratio. 0 leaves that side unbounded.
max_width = 1920
max_height = 1080

quality = 5.0

jpeg_quality = 90

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel image-processing workers.
# Omit to use all CPU cores. Values above the core count are clamped.
# max_processes = 4
"##
}
