//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, GIF, TIFF, WebP) | `image` crate (pure Rust decoders) |
//! | Crop + shrink | adaptive [`resample`](super::resample::resample) |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` with configured quality |
//! | Encode → other | `image::DynamicImage::save_with_format` |
//!
//! Images with an alpha channel are resampled as RGBA, everything else as
//! RGB, so transparency survives into PNG/WebP/GIF outputs.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::{center_crop_rect, fit_within};
use super::params::{MediumParams, Quality, Rect, ResampleRequest, ThumbnailParams};
use super::resample::{Raster, ResampleError, resample};
use image::{DynamicImage, ImageFormat, ImageReader, Pixel, RgbImage, RgbaImage};
use std::borrow::Cow;
use std::path::Path;
use std::sync::LazyLock;

/// Extensions whose decoders are compiled in.
const PHOTO_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("gif", ImageFormat::Gif),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
    ("webp", ImageFormat::WebP),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    PHOTO_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Returns the set of image file extensions that have working decoders compiled in.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

/// Pure Rust backend using the `image` crate for I/O.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image from disk.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .with_guessed_format()
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })
}

/// Resample a region of a decoded image into a new `width × height` image.
///
/// The source buffer is borrowed when it already has the working pixel
/// layout, converted otherwise.
pub fn resample_region(
    img: &DynamicImage,
    region: Rect,
    width: u32,
    height: u32,
    quality: Quality,
) -> Result<DynamicImage, ResampleError> {
    let request = ResampleRequest {
        src: region,
        dst: Rect::sized(width, height),
        quality,
    };

    if img.color().has_alpha() {
        let src: Cow<'_, RgbaImage> = match img {
            DynamicImage::ImageRgba8(buf) => Cow::Borrowed(buf),
            other => Cow::Owned(other.to_rgba8()),
        };
        resample_into::<image::Rgba<u8>>(&src, &request).map(DynamicImage::ImageRgba8)
    } else {
        let src: Cow<'_, RgbImage> = match img {
            DynamicImage::ImageRgb8(buf) => Cow::Borrowed(buf),
            other => Cow::Owned(other.to_rgb8()),
        };
        resample_into::<image::Rgb<u8>>(&src, &request).map(DynamicImage::ImageRgb8)
    }
}

fn resample_into<P>(src: &Raster<P>, request: &ResampleRequest) -> Result<Raster<P>, ResampleError>
where
    P: Pixel<Subpixel = u8> + 'static,
{
    let mut dst = Raster::<P>::new(request.dst.width, request.dst.height);
    resample(&mut dst, src, request)?;
    Ok(dst)
}

/// Save a DynamicImage to the given path, inferring format from extension.
fn save_image(img: &DynamicImage, path: &Path, encode_quality: u8) -> Result<(), BackendError> {
    let format = ImageFormat::from_path(path).map_err(|_| {
        BackendError::ProcessingFailed(format!("Unsupported output format: {}", path.display()))
    })?;

    match format {
        ImageFormat::Jpeg => save_jpeg(img, path, encode_quality),
        other if other.writing_enabled() => img.save_with_format(path, other).map_err(|e| {
            BackendError::ProcessingFailed(format!("Encode {} failed: {}", path.display(), e))
        }),
        other => Err(BackendError::ProcessingFailed(format!(
            "No encoder compiled in for {:?}",
            other
        ))),
    }
}

/// JPEG has no alpha: flatten to RGB before encoding.
fn save_jpeg(img: &DynamicImage, path: &Path, quality: u8) -> Result<(), BackendError> {
    let file = std::fs::File::create(path).map_err(BackendError::Io)?;
    let writer = std::io::BufWriter::new(file);
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(writer, quality.clamp(1, 100));
    DynamicImage::ImageRgb8(img.to_rgb8())
        .write_with_encoder(encoder)
        .map_err(|e| BackendError::ProcessingFailed(format!("JPEG encode failed: {}", e)))
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = image::image_dimensions(path).map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to read dimensions: {}", e))
        })?;
        Ok(Dimensions { width, height })
    }

    fn thumbnail(&self, params: &ThumbnailParams) -> Result<Dimensions, BackendError> {
        let img = load_image(&params.source)?;
        let region = center_crop_rect(
            (img.width(), img.height()),
            (params.width.max(1), params.height.max(1)),
        );
        let thumb = resample_region(&img, region, params.width, params.height, params.quality)?;
        save_image(&thumb, &params.output, params.encode_quality)?;
        Ok(Dimensions {
            width: thumb.width(),
            height: thumb.height(),
        })
    }

    fn medium(&self, params: &MediumParams) -> Result<Dimensions, BackendError> {
        let img = load_image(&params.source)?;
        let source = (img.width(), img.height());
        let (width, height) = fit_within(source, (params.max_width, params.max_height));
        let medium = resample_region(
            &img,
            Rect::sized(source.0, source.1),
            width,
            height,
            params.quality,
        )?;
        save_image(&medium, &params.output, params.encode_quality)?;
        Ok(Dimensions { width, height })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageEncoder, Rgb, Rgba};

    #[test]
    fn supported_extensions_match_decodable_formats() {
        let exts = super::supported_input_extensions();
        for expected in &["jpg", "jpeg", "png", "gif", "tif", "tiff", "webp"] {
            assert!(
                exts.contains(expected),
                "expected {expected} in supported extensions"
            );
        }
    }

    /// Create a small valid JPEG file with the given dimensions.
    fn create_test_jpeg(path: &Path, width: u32, height: u32) {
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        });
        let file = std::fs::File::create(path).unwrap();
        let writer = std::io::BufWriter::new(file);
        image::codecs::jpeg::JpegEncoder::new(writer)
            .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
            .unwrap();
    }

    #[test]
    fn identify_synthetic_jpeg() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("test.jpg");
        create_test_jpeg(&path, 200, 150);

        let backend = RustBackend::new();
        let dims = backend.identify(&path).unwrap();
        assert_eq!(dims.width, 200);
        assert_eq!(dims.height, 150);
    }

    #[test]
    fn identify_nonexistent_file_errors() {
        let backend = RustBackend::new();
        let result = backend.identify(Path::new("/nonexistent/image.jpg"));
        assert!(result.is_err());
    }

    #[test]
    fn thumbnail_synthetic_exact_dimensions() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.jpg");
        create_test_jpeg(&source, 800, 600);

        let output = tmp.path().join("thumb.jpg");
        let backend = RustBackend::new();
        let dims = backend
            .thumbnail(&ThumbnailParams {
                source,
                output: output.clone(),
                width: 200,
                height: 200,
                quality: Quality::new(3.0),
                encode_quality: 90,
            })
            .unwrap();

        assert_eq!(dims, Dimensions::from((200, 200)));
        assert_eq!(image::image_dimensions(&output).unwrap(), (200, 200));
    }

    #[test]
    fn thumbnail_png_keeps_alpha() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.png");
        RgbaImage::from_pixel(300, 200, Rgba([10, 20, 30, 100]))
            .save(&source)
            .unwrap();

        let output = tmp.path().join("thumb.png");
        RustBackend::new()
            .thumbnail(&ThumbnailParams {
                source,
                output: output.clone(),
                width: 50,
                height: 50,
                quality: Quality::new(2.0),
                encode_quality: 90,
            })
            .unwrap();

        let thumb = image::open(&output).unwrap();
        assert!(thumb.color().has_alpha());
        assert_eq!(thumb.to_rgba8().get_pixel(25, 25), &Rgba([10, 20, 30, 100]));
    }

    #[test]
    fn medium_fits_within_box() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.jpg");
        create_test_jpeg(&source, 400, 300);

        let output = tmp.path().join("medium.jpg");
        let dims = RustBackend::new()
            .medium(&MediumParams {
                source,
                output: output.clone(),
                max_width: 200,
                max_height: 200,
                quality: Quality::new(4.0),
                encode_quality: 85,
            })
            .unwrap();

        assert_eq!(dims, Dimensions::from((200, 150)));
        assert_eq!(image::image_dimensions(&output).unwrap(), (200, 150));
    }

    #[test]
    fn unsupported_output_format_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.jpg");
        create_test_jpeg(&source, 100, 100);

        let result = RustBackend::new().thumbnail(&ThumbnailParams {
            source,
            output: tmp.path().join("thumb.unknown"),
            width: 50,
            height: 50,
            quality: Quality::default(),
            encode_quality: 90,
        });
        assert!(result.is_err());
    }

    #[test]
    fn zero_sized_thumbnail_is_a_resample_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.jpg");
        create_test_jpeg(&source, 100, 100);

        let result = RustBackend::new().thumbnail(&ThumbnailParams {
            source,
            output: tmp.path().join("thumb.jpg"),
            width: 0,
            height: 50,
            quality: Quality::default(),
            encode_quality: 90,
        });
        assert!(matches!(result, Err(BackendError::Resample(_))));
    }

    #[test]
    fn resample_region_borrows_matching_layout() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(64, 64, Rgb([5, 6, 7])));
        let out = resample_region(&img, Rect::new(0, 0, 32, 32), 8, 8, Quality::new(1.0)).unwrap();
        assert_eq!((out.width(), out.height()), (8, 8));
        assert!(matches!(out, DynamicImage::ImageRgb8(_)));
    }
}
