//! Batch thumbnail and medium generation.
//!
//! Walks a source directory, picks every file whose extension has a decoder
//! compiled in, and renders a thumbnail (plus `@2x` variant) and, for large
//! sources, a medium rendition. Results are collected into a
//! [`BatchManifest`] written next to the outputs as `manifest.json`.
//!
//! ## Output Structure
//!
//! ```text
//! out/
//! ├── manifest.json
//! ├── thumbs/
//! │   ├── 2019/
//! │   │   ├── beach_jpg-thumb.jpg   # source tree mirrored, extension kept in the stem
//! │   │   └── beach_jpg-thumb@2x.jpg
//! │   └── logo_png-thumb.png        # alpha formats keep their encoder
//! └── medium/
//!     └── 2019/
//!         └── beach_jpg-medium.jpg  # only for sources larger than the box
//! ```
//!
//! Every discovered file has a letters-only extension, so `beach.jpg`,
//! `beach.tif` and `beach_jpg.jpg` all get distinct stems.
//!
//! ## Parallel Processing
//!
//! Images are processed in parallel using [rayon](https://docs.rs/rayon);
//! the pool size comes from `processing.max_processes`. Each worker owns its
//! decode and resample buffers. Manifest order follows the sorted walk, not
//! completion order.
//!
//! A file that fails to decode or encode is recorded under
//! [`BatchManifest::failures`] and the batch continues.

use crate::extension::has_supported_extension;
use crate::imaging::{
    BackendError, GeneratedImage, ImageBackend, MediumConfig, RustBackend, ThumbnailConfig,
    ThumbnailOutput, create_medium, create_thumbnail, get_dimensions, needs_medium,
    supported_input_extensions,
};
use log::{debug, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;
use walkdir::WalkDir;

/// Name of the manifest written into the output directory.
pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Image processing failed: {0}")]
    Imaging(#[from] BackendError),
    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Source directory not found: {0}")]
    SourceNotFound(PathBuf),
}

/// Settings for one batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchConfig {
    pub thumbnail: ThumbnailConfig,
    pub medium: MediumConfig,
}

impl BatchConfig {
    pub fn from_config(config: &crate::config::LighttableConfig) -> Self {
        Self {
            thumbnail: config.thumbnail_config(),
            medium: config.medium_config(),
        }
    }
}

/// Progress notifications sent while a batch runs.
#[derive(Debug, Clone)]
pub enum ProcessEvent {
    Started { total: usize },
    ImageProcessed { index: usize, entry: ManifestEntry },
    ImageFailed { index: usize, failure: FailedImage },
}

/// Everything generated for one source image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Source path relative to the batch root, `/`-separated.
    pub source: String,
    pub width: u32,
    pub height: u32,
    pub thumbnail: ThumbnailOutput,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<GeneratedImage>,
}

/// A source image that could not be processed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedImage {
    pub source: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchManifest {
    pub images: Vec<ManifestEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<FailedImage>,
}

/// Sorted list of supported images under `source_dir`, recursively.
pub fn discover_images(source_dir: &Path) -> Result<Vec<PathBuf>, ProcessError> {
    if !source_dir.is_dir() {
        return Err(ProcessError::SourceNotFound(source_dir.to_path_buf()));
    }

    let supported = supported_input_extensions();
    let mut images = Vec::new();
    for entry in WalkDir::new(source_dir).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file()
            && has_supported_extension(&entry.path().to_string_lossy(), supported)
        {
            images.push(entry.into_path());
        }
    }
    Ok(images)
}

/// Process `source_dir` into `output_dir` with the image-crate backend.
pub fn process(
    source_dir: &Path,
    output_dir: &Path,
    config: &BatchConfig,
    events: Option<Sender<ProcessEvent>>,
) -> Result<BatchManifest, ProcessError> {
    process_with_backend(&RustBackend::new(), source_dir, output_dir, config, events)
}

/// Process images using a specific backend (allows testing with mock).
pub fn process_with_backend(
    backend: &impl ImageBackend,
    source_dir: &Path,
    output_dir: &Path,
    config: &BatchConfig,
    events: Option<Sender<ProcessEvent>>,
) -> Result<BatchManifest, ProcessError> {
    let images = discover_images(source_dir)?;
    let thumbs_dir = output_dir.join("thumbs");
    let medium_dir = output_dir.join("medium");
    std::fs::create_dir_all(&thumbs_dir)?;
    std::fs::create_dir_all(&medium_dir)?;

    debug!("processing {} images from {}", images.len(), source_dir.display());
    notify(&events, ProcessEvent::Started { total: images.len() });

    let results: Vec<Result<ManifestEntry, FailedImage>> = images
        .par_iter()
        .enumerate()
        .map(|(index, path)| {
            let source = relative_source(source_dir, path);
            let result = process_image(backend, path, &source, &thumbs_dir, &medium_dir, config)
                .map_err(|e| FailedImage {
                    source: source.clone(),
                    error: e.to_string(),
                });
            let event = match &result {
                Ok(entry) => ProcessEvent::ImageProcessed {
                    index,
                    entry: entry.clone(),
                },
                Err(failure) => {
                    warn!("skipping {}: {}", failure.source, failure.error);
                    ProcessEvent::ImageFailed {
                        index,
                        failure: failure.clone(),
                    }
                }
            };
            notify(&events, event);
            result
        })
        .collect();

    let mut manifest = BatchManifest::default();
    for result in results {
        match result {
            Ok(entry) => manifest.images.push(entry),
            Err(failure) => manifest.failures.push(failure),
        }
    }
    Ok(manifest)
}

/// Write `manifest.json` into `output_dir`; returns the written path.
pub fn write_manifest(manifest: &BatchManifest, output_dir: &Path) -> Result<PathBuf, ProcessError> {
    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join(MANIFEST_FILE);
    let json = serde_json::to_string_pretty(manifest)?;
    std::fs::write(&path, json)?;
    Ok(path)
}

fn process_image(
    backend: &impl ImageBackend,
    path: &Path,
    source: &str,
    thumbs_dir: &Path,
    medium_dir: &Path,
    config: &BatchConfig,
) -> Result<ManifestEntry, BackendError> {
    let dims = get_dimensions(backend, path)?;
    let stem = output_stem(source);
    if let Some((dir, _)) = stem.rsplit_once('/') {
        std::fs::create_dir_all(thumbs_dir.join(dir))?;
        if needs_medium(dims, (config.medium.max_width, config.medium.max_height)) {
            std::fs::create_dir_all(medium_dir.join(dir))?;
        }
    }
    let thumbnail = create_thumbnail(backend, path, thumbs_dir, &stem, dims, &config.thumbnail)?;
    let medium = create_medium(backend, path, medium_dir, &stem, dims, &config.medium)?;

    Ok(ManifestEntry {
        source: source.to_string(),
        width: dims.0,
        height: dims.1,
        thumbnail,
        medium,
    })
}

/// `/`-separated path of `path` below `root`.
fn relative_source(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Output stem for a `/`-separated relative source: directories kept, the
/// extension dot in the file name becomes `_`.
fn output_stem(source: &str) -> String {
    let (dir, file) = match source.rsplit_once('/') {
        Some((dir, file)) => (Some(dir), file),
        None => (None, source),
    };
    let file = match file.rsplit_once('.') {
        Some((stem, ext)) => format!("{stem}_{ext}"),
        None => file.to_string(),
    };
    match dir {
        Some(dir) => format!("{dir}/{file}"),
        None => file,
    }
}

fn notify(events: &Option<Sender<ProcessEvent>>, event: ProcessEvent) {
    if let Some(tx) = events {
        // A dropped receiver only means nobody is listening.
        let _ = tx.send(event);
    }
}
