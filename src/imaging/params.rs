//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the high-level [`operations`](super::operations) module
//! (which decides the output dimensions) and the [`backend`](super::backend)
//! (which does the pixel work).
//!
//! ## Types
//!
//! - [`Quality`]: JPEG encoding quality (1–100, default 70). Clamped on construction.
//! - [`FieldPolicy`]: Per-field compression settings as declared on an entity;
//!   any value left unset falls back to the configured defaults.
//! - [`CompressionPolicy`]: A fully resolved bounding box plus quality.
//! - [`CompressParams`]: Everything one compression needs: source bytes,
//!   target dimensions, quality.

/// Quality setting for lossy JPEG encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }

    /// Quality as the encoder expects it.
    pub fn as_u8(self) -> u8 {
        self.0.clamp(1, 100) as u8
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(70)
    }
}

/// Bounding box and quality applied to one image field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionPolicy {
    pub max_width: u32,
    pub max_height: u32,
    pub quality: Quality,
}

impl Default for CompressionPolicy {
    fn default() -> Self {
        Self {
            max_width: 1280,
            max_height: 1280,
            quality: Quality::default(),
        }
    }
}

/// Compression settings declared next to an image field.
///
/// `None` means "use the configured default" for that value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldPolicy {
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    pub quality: Option<u32>,
}

impl FieldPolicy {
    /// A policy that pins every value.
    pub const fn new(max_width: u32, max_height: u32, quality: u32) -> Self {
        Self {
            max_width: Some(max_width),
            max_height: Some(max_height),
            quality: Some(quality),
        }
    }

    /// A policy that takes every value from the defaults.
    pub const fn defaults() -> Self {
        Self {
            max_width: None,
            max_height: None,
            quality: None,
        }
    }

    pub fn resolve(&self, defaults: &CompressionPolicy) -> CompressionPolicy {
        CompressionPolicy {
            max_width: self.max_width.unwrap_or(defaults.max_width),
            max_height: self.max_height.unwrap_or(defaults.max_height),
            quality: self.quality.map(Quality::new).unwrap_or(defaults.quality),
        }
    }
}

/// Parameters for a single decode → RGB → resize → JPEG pass.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressParams<'a> {
    pub source: &'a [u8],
    pub width: u32,
    pub height: u32,
    pub quality: Quality,
}
