//! Pure Rust image processing backend.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Sniff format | `image::ImageReader::with_guessed_format` |
//! | Identify | `ImageReader::into_dimensions` (header only, no full decode) |
//! | Verify | `ImageReader::decode` (full decode, result discarded) |
//! | Decode (JPEG, PNG, TIFF, WebP, GIF, BMP) | `image` crate (pure Rust decoders) |
//! | Normalize to RGB | `DynamicImage::to_rgb8` |
//! | Resize | `image::imageops::resize` with `Lanczos3` filter |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder::new_with_quality` |

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::params::CompressParams;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use std::io::Cursor;

/// Pure Rust backend using the `image` crate.
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

fn reader(source: &[u8]) -> Result<ImageReader<Cursor<&[u8]>>, BackendError> {
    ImageReader::new(Cursor::new(source))
        .with_guessed_format()
        .map_err(BackendError::Io)
}

/// Decode an in-memory image, sniffing the format from its content.
fn load_image(source: &[u8]) -> Result<DynamicImage, BackendError> {
    reader(source)?
        .decode()
        .map_err(|e| BackendError::Decode(e.to_string()))
}

/// Encode an RGB image as JPEG at the given quality.
fn encode_jpeg(img: &image::RgbImage, quality: u8) -> Result<Vec<u8>, BackendError> {
    let mut buf = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buf, quality);
    img.write_with_encoder(encoder)
        .map_err(|e| BackendError::ProcessingFailed(format!("JPEG encode failed: {e}")))?;
    Ok(buf.into_inner())
}

impl ImageBackend for RustBackend {
    fn identify(&self, source: &[u8]) -> Result<Dimensions, BackendError> {
        let (width, height) = reader(source)?
            .into_dimensions()
            .map_err(|e| BackendError::Decode(e.to_string()))?;
        Ok(Dimensions { width, height })
    }

    fn verify(&self, source: &[u8]) -> Result<Dimensions, BackendError> {
        let img = load_image(source)?;
        Ok(Dimensions {
            width: img.width(),
            height: img.height(),
        })
    }

    fn compress(&self, params: &CompressParams<'_>) -> Result<Vec<u8>, BackendError> {
        let rgb = load_image(params.source)?.to_rgb8();

        let resized = if rgb.dimensions() == (params.width, params.height) {
            rgb
        } else {
            image::imageops::resize(&rgb, params.width, params.height, FilterType::Lanczos3)
        };

        encode_jpeg(&resized, params.quality.as_u8())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::params::Quality;
    use crate::test_helpers::{jpeg_bytes, png_rgba_bytes};

    #[test]
    fn identify_synthetic_jpeg() {
        let backend = RustBackend::new();
        let dims = backend.identify(&jpeg_bytes(200, 150)).unwrap();
        assert_eq!(dims.width, 200);
        assert_eq!(dims.height, 150);
    }

    #[test]
    fn identify_png_by_content() {
        let backend = RustBackend::new();
        let dims = backend.identify(&png_rgba_bytes(30, 20)).unwrap();
        assert_eq!((dims.width, dims.height), (30, 20));
    }

    #[test]
    fn identify_garbage_is_decode_error() {
        let backend = RustBackend::new();
        let err = backend.identify(b"definitely not an image").unwrap_err();
        assert!(matches!(err, BackendError::Decode(_)));
    }

    #[test]
    fn verify_decodes_whole_image() {
        let backend = RustBackend::new();
        let dims = backend.verify(&png_rgba_bytes(30, 20)).unwrap();
        assert_eq!((dims.width, dims.height), (30, 20));
    }

    #[test]
    fn verify_rejects_truncated_png_that_identify_accepts() {
        let backend = RustBackend::new();
        let noisy = image::RgbImage::from_fn(256, 256, |x, y| {
            let v = (x.wrapping_mul(31) ^ y.wrapping_mul(17) ^ (x * y)) as u8;
            image::Rgb([v, v.wrapping_mul(3), v ^ 0x5a])
        });
        let mut png = Cursor::new(Vec::new());
        noisy.write_to(&mut png, image::ImageFormat::Png).unwrap();
        let png = png.into_inner();
        let truncated = &png[..png.len() / 2];

        assert!(backend.identify(truncated).is_ok());
        assert!(matches!(
            backend.verify(truncated),
            Err(BackendError::Decode(_))
        ));
    }

    #[test]
    fn compress_resizes_and_encodes_jpeg() {
        let backend = RustBackend::new();
        let source = jpeg_bytes(400, 300);

        let out = backend
            .compress(&CompressParams {
                source: &source,
                width: 200,
                height: 150,
                quality: Quality::new(75),
            })
            .unwrap();

        assert_eq!(&out[0..2], &[0xFF, 0xD8]);
        let decoded = image::load_from_memory(&out).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (200, 150));
    }

    #[test]
    fn compress_drops_alpha_channel() {
        let backend = RustBackend::new();
        let source = png_rgba_bytes(40, 40);

        let out = backend
            .compress(&CompressParams {
                source: &source,
                width: 40,
                height: 40,
                quality: Quality::default(),
            })
            .unwrap();

        let decoded = image::load_from_memory(&out).unwrap();
        assert_eq!(decoded.color(), image::ColorType::Rgb8);
    }

    #[test]
    fn compress_garbage_is_decode_error() {
        let backend = RustBackend::new();
        let result = backend.compress(&CompressParams {
            source: b"GIF89a but not really",
            width: 10,
            height: 10,
            quality: Quality::default(),
        });
        assert!(matches!(result, Err(BackendError::Decode(_))));
    }
}
