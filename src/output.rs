//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Every processed image is shown by its positional index and source path,
//! with the generated files indented beneath it:
//!
//! ```text
//! 001 trip/beach.jpg (4000x3000)
//!     thumbnail: thumbs/trip/beach_jpg-thumb.jpg (200x200)
//!     thumbnail@2x: thumbs/trip/beach_jpg-thumb@2x.jpg (400x400)
//!     medium: medium/trip/beach_jpg-medium.jpg (1440x1080)
//! 002 broken.jpg
//!     failed: Failed to decode broken.jpg: ...
//!
//! Processed 1 image, 1 failed → out/manifest.json
//! ```
//!
//! # Architecture
//!
//! Each output has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::imaging::{Dimensions, GeneratedImage};
use crate::process::{BatchManifest, ManifestEntry, ProcessEvent};
use std::path::Path;

/// Format a 1-based positional index as a zero-padded 3-digit string.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn generated_line(label: &str, image: &GeneratedImage) -> String {
    format!(
        "    {}: {} ({}x{})",
        label, image.path, image.width, image.height
    )
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

/// Lines for one manifest entry. `index` is 0-based.
pub fn format_entry(index: usize, entry: &ManifestEntry) -> Vec<String> {
    let mut lines = vec![format!(
        "{} {} ({}x{})",
        format_index(index + 1),
        entry.source,
        entry.width,
        entry.height
    )];
    lines.push(generated_line("thumbnail", &entry.thumbnail.thumb));
    if let Some(retina) = &entry.thumbnail.retina {
        lines.push(generated_line("thumbnail@2x", retina));
    }
    if let Some(medium) = &entry.medium {
        lines.push(generated_line("medium", medium));
    }
    lines
}

/// Format a progress event from a running batch.
pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::Started { total } => vec![format!("Processing {}", plural(*total, "image"))],
        ProcessEvent::ImageProcessed { index, entry } => format_entry(*index, entry),
        ProcessEvent::ImageFailed { index, failure } => vec![
            format!("{} {}", format_index(index + 1), failure.source),
            format!("    failed: {}", failure.error),
        ],
    }
}

/// Closing summary for a finished batch.
pub fn format_batch_summary(manifest: &BatchManifest, manifest_path: &Path) -> Vec<String> {
    let processed = plural(manifest.images.len(), "image");
    let summary = if manifest.failures.is_empty() {
        format!("Processed {} \u{2192} {}", processed, manifest_path.display())
    } else {
        format!(
            "Processed {}, {} failed \u{2192} {}",
            processed,
            manifest.failures.len(),
            manifest_path.display()
        )
    };
    vec![String::new(), summary]
}

pub fn print_batch_summary(manifest: &BatchManifest, manifest_path: &Path) {
    for line in format_batch_summary(manifest, manifest_path) {
        println!("{}", line);
    }
}

/// One-line report for a single written rendition.
pub fn format_written(path: &Path, dims: Dimensions) -> String {
    format!("{} ({}x{})", path.display(), dims.width, dims.height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::ThumbnailOutput;
    use crate::process::FailedImage;

    fn image(path: &str, width: u32, height: u32) -> GeneratedImage {
        GeneratedImage {
            path: path.to_string(),
            width,
            height,
        }
    }

    fn entry() -> ManifestEntry {
        ManifestEntry {
            source: "trip/beach.jpg".into(),
            width: 4000,
            height: 3000,
            thumbnail: ThumbnailOutput {
                thumb: image("thumbs/trip/beach_jpg-thumb.jpg", 200, 200),
                retina: Some(image("thumbs/trip/beach_jpg-thumb@2x.jpg", 400, 400)),
            },
            medium: Some(image("medium/trip/beach_jpg-medium.jpg", 1440, 1080)),
        }
    }

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1000), "1000");
    }

    #[test]
    fn entry_lists_all_outputs() {
        let lines = format_entry(0, &entry());
        assert_eq!(
            lines,
            vec![
                "001 trip/beach.jpg (4000x3000)",
                "    thumbnail: thumbs/trip/beach_jpg-thumb.jpg (200x200)",
                "    thumbnail@2x: thumbs/trip/beach_jpg-thumb@2x.jpg (400x400)",
                "    medium: medium/trip/beach_jpg-medium.jpg (1440x1080)",
            ]
        );
    }

    #[test]
    fn entry_without_optional_outputs() {
        let mut e = entry();
        e.thumbnail.retina = None;
        e.medium = None;
        assert_eq!(format_entry(4, &e).len(), 2);
        assert!(format_entry(4, &e)[0].starts_with("005 "));
    }

    #[test]
    fn failed_event() {
        let lines = format_process_event(&ProcessEvent::ImageFailed {
            index: 1,
            failure: FailedImage {
                source: "broken.jpg".into(),
                error: "decode error".into(),
            },
        });
        assert_eq!(lines, vec!["002 broken.jpg", "    failed: decode error"]);
    }

    #[test]
    fn started_event_pluralizes() {
        assert_eq!(
            format_process_event(&ProcessEvent::Started { total: 1 }),
            vec!["Processing 1 image"]
        );
        assert_eq!(
            format_process_event(&ProcessEvent::Started { total: 3 }),
            vec!["Processing 3 images"]
        );
    }

    #[test]
    fn summary_mentions_failures_only_when_present() {
        let mut manifest = BatchManifest {
            images: vec![entry()],
            failures: vec![],
        };
        let path = Path::new("out/manifest.json");
        assert_eq!(
            format_batch_summary(&manifest, path)[1],
            "Processed 1 image \u{2192} out/manifest.json"
        );

        manifest.failures.push(FailedImage {
            source: "x.jpg".into(),
            error: "e".into(),
        });
        assert_eq!(
            format_batch_summary(&manifest, path)[1],
            "Processed 1 image, 1 failed \u{2192} out/manifest.json"
        );
    }

    #[test]
    fn written_line() {
        assert_eq!(
            format_written(Path::new("t.jpg"), Dimensions::from((200, 150))),
            "t.jpg (200x150)"
        );
    }
}
