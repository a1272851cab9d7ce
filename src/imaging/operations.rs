//! High-level image operations.
//!
//! These functions combine calculations with backend execution.
//! They take a policy, compute the output dimensions, and call the backend.

use super::backend::{BackendError, ImageBackend};
use super::calculations::fit_within;
use super::params::{CompressParams, CompressionPolicy};
use crate::naming::jpeg_filename;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Content type of every compressed image.
pub const JPEG_CONTENT_TYPE: &str = "image/jpeg";

/// Get image dimensions using the backend.
pub fn get_dimensions(backend: &impl ImageBackend, source: &[u8]) -> Result<(u32, u32)> {
    let dims = backend.identify(source)?;
    Ok((dims.width, dims.height))
}

/// Fully decode an upload that is stored without re-encoding.
pub fn verify_image(backend: &impl ImageBackend, source: &[u8]) -> Result<(u32, u32)> {
    let dims = backend.verify(source)?;
    Ok((dims.width, dims.height))
}

/// A re-encoded image ready to be written to media storage.
#[derive(Debug, Clone)]
pub struct CompressedImage {
    /// Original stem with a `.jpg` extension.
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Plan a compression without executing it.
///
/// Returns the output dimensions for a source of the given size.
pub fn plan_compression(original_dims: (u32, u32), policy: &CompressionPolicy) -> (u32, u32) {
    fit_within(original_dims, (policy.max_width, policy.max_height))
}

/// Compress an uploaded image according to `policy`.
///
/// The output is an RGB JPEG that fits the policy's bounding box. Sources
/// already inside the box keep their dimensions but are still re-encoded.
pub fn compress_image(
    backend: &impl ImageBackend,
    filename: &str,
    source: &[u8],
    policy: &CompressionPolicy,
) -> Result<CompressedImage> {
    let original = get_dimensions(backend, source)?;
    let (width, height) = plan_compression(original, policy);

    let bytes = backend.compress(&CompressParams {
        source,
        width,
        height,
        quality: policy.quality,
    })?;

    Ok(CompressedImage {
        filename: jpeg_filename(filename),
        content_type: JPEG_CONTENT_TYPE,
        bytes,
        width,
        height,
    })
}
