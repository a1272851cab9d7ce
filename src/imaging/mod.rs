//! Image processing in pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `ImageReader::into_dimensions` |
//! | **Normalize** | `DynamicImage::to_rgb8` |
//! | **Resize** | Lanczos3, bounding box, never upscales |
//! | **Encode** | `JpegEncoder` at the field's quality |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::fit_within;
pub use operations::{
    CompressedImage, JPEG_CONTENT_TYPE, compress_image, get_dimensions, plan_compression,
    verify_image,
};
pub use params::{CompressParams, CompressionPolicy, FieldPolicy, Quality};
pub use rust_backend::RustBackend;
