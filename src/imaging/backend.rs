//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the operations the save hook needs:
//! identify (read dimensions from the header), verify (decode the whole
//! payload) and compress (decode, normalize to RGB, resize, encode JPEG).
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate's pure-Rust codecs.

use super::params::CompressParams;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Cannot decode image: {0}")]
    Decode(String),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image processing backends.
///
/// Backends work on in-memory payloads: uploads arrive as bytes and the
/// compressed result goes straight to media storage.
pub trait ImageBackend: Sync {
    /// Get image dimensions. Fails with [`BackendError::Decode`] when the
    /// bytes are not a recognizable image.
    fn identify(&self, source: &[u8]) -> Result<Dimensions, BackendError>;

    /// Decode the full payload. Catches truncated or corrupt pixel data
    /// that a header read would accept.
    fn verify(&self, source: &[u8]) -> Result<Dimensions, BackendError>;

    /// Re-encode `params.source` as an RGB JPEG of exactly
    /// `params.width` x `params.height`.
    fn compress(&self, params: &CompressParams<'_>) -> Result<Vec<u8>, BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::imaging::Quality;
    use std::sync::Mutex;

    /// Mock backend that records operations without executing them.
    #[derive(Default)]
    pub struct MockBackend {
        pub identify_results: Mutex<Vec<Dimensions>>,
        pub operations: Mutex<Vec<RecordedOp>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Identify(usize),
        Verify(usize),
        Compress {
            source_len: usize,
            width: u32,
            height: u32,
            quality: u32,
        },
    }

    /// Bytes returned by [`MockBackend::compress`].
    pub const MOCK_JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xD9];

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_dimensions(dims: Vec<Dimensions>) -> Self {
            Self {
                identify_results: Mutex::new(dims),
                operations: Mutex::new(Vec::new()),
            }
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }
    }

    impl ImageBackend for MockBackend {
        fn identify(&self, source: &[u8]) -> Result<Dimensions, BackendError> {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::Identify(source.len()));

            self.identify_results
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| BackendError::Decode("No mock dimensions".to_string()))
        }

        fn verify(&self, source: &[u8]) -> Result<Dimensions, BackendError> {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::Verify(source.len()));

            self.identify_results
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| BackendError::Decode("No mock dimensions".to_string()))
        }

        fn compress(&self, params: &CompressParams<'_>) -> Result<Vec<u8>, BackendError> {
            self.operations.lock().unwrap().push(RecordedOp::Compress {
                source_len: params.source.len(),
                width: params.width,
                height: params.height,
                quality: params.quality.value(),
            });
            Ok(MOCK_JPEG.to_vec())
        }
    }

    #[test]
    fn mock_records_identify() {
        let backend = MockBackend::with_dimensions(vec![Dimensions {
            width: 800,
            height: 600,
        }]);

        let result = backend.identify(b"fake").unwrap();
        assert_eq!(result.width, 800);
        assert_eq!(result.height, 600);

        let ops = backend.get_operations();
        assert_eq!(ops, vec![RecordedOp::Identify(4)]);
    }

    #[test]
    fn mock_identify_without_dimensions_is_decode_error() {
        let backend = MockBackend::new();
        let err = backend.identify(b"fake").unwrap_err();
        assert!(matches!(err, BackendError::Decode(_)));
    }

    #[test]
    fn mock_records_compress() {
        let backend = MockBackend::new();

        let out = backend
            .compress(&CompressParams {
                source: b"source-bytes",
                width: 640,
                height: 480,
                quality: Quality::new(75),
            })
            .unwrap();

        assert_eq!(out, MOCK_JPEG);
        assert!(matches!(
            &backend.get_operations()[0],
            RecordedOp::Compress {
                width: 640,
                height: 480,
                quality: 75,
                ..
            }
        ));
    }
}
