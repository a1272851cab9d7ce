//! The image save hook.
//!
//! Every entity with image columns declares them as a static
//! [`ImageField`] list, each field carrying its own name and optional
//! compression policy. When a form replaces an image, the upload runs through
//! [`ImagePipeline`] *before* the row is written:
//!
//! ```text
//! Upload ──► policy? ──yes──► compress (RGB, fit box, JPEG) ──┐
//!              │                                              ├─► media storage ──► column value
//!              └──no───► verify it decodes ───────────────────┘
//! ```
//!
//! Every field of a form is staged in memory first; files are written only
//! once all of them decode. Only the compressed bytes are ever written, and
//! the row is written once with the final storage names. When that row write
//! fails, [`StoredImages::settle`] removes the files again.

use crate::imaging::{
    BackendError, CompressionPolicy, FieldPolicy, ImageBackend, compress_image, verify_image,
};
use crate::storage::{APP_LABEL, MediaStorage, StorageError, upload_path};
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("{model} has no image field `{field}`")]
    UnknownField { model: &'static str, field: String },
    #[error("{model}.{field} is required")]
    Required {
        model: &'static str,
        field: &'static str,
    },
    #[error("cannot decode upload for {model}.{field}: {message}")]
    Decode {
        model: &'static str,
        field: &'static str,
        message: String,
    },
    #[error("image processing failed: {0}")]
    Image(BackendError),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// An image column declared on an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageField {
    pub name: &'static str,
    /// `None` stores the upload as-is.
    pub compression: Option<FieldPolicy>,
    pub required: bool,
}

impl ImageField {
    /// An image stored without re-encoding.
    pub const fn plain(name: &'static str) -> Self {
        Self {
            name,
            compression: None,
            required: false,
        }
    }

    /// An image compressed on save.
    pub const fn compressed(name: &'static str, policy: FieldPolicy) -> Self {
        Self {
            name,
            compression: Some(policy),
            required: false,
        }
    }

    pub const fn required(self) -> Self {
        Self {
            required: true,
            ..self
        }
    }
}

/// Implemented by entities that own image columns.
pub trait ImageFields {
    /// Model name used as the second upload path component.
    const MODEL: &'static str;
    const IMAGE_FIELDS: &'static [ImageField];

    fn image_field(name: &str) -> Result<&'static ImageField, UploadError> {
        Self::IMAGE_FIELDS
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| UploadError::UnknownField {
                model: Self::MODEL,
                field: name.to_string(),
            })
    }
}

/// A file submitted through a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }

    /// Read an upload from disk, keeping only the file name.
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { filename, bytes })
    }
}

/// What a form wants done with one image column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ImageChange {
    #[default]
    Keep,
    Replace(Upload),
    Clear,
}

impl ImageChange {
    pub fn is_replace(&self) -> bool {
        matches!(self, ImageChange::Replace(_))
    }
}

impl From<Option<Upload>> for ImageChange {
    fn from(upload: Option<Upload>) -> Self {
        upload.map(ImageChange::Replace).unwrap_or_default()
    }
}

fn classify(model: &'static str, field: &'static str, err: BackendError) -> UploadError {
    match err {
        BackendError::Decode(message) => UploadError::Decode {
            model,
            field,
            message,
        },
        other => UploadError::Image(other),
    }
}

/// A change to one column, checked and encoded but not yet written.
#[derive(Debug)]
enum Staged {
    Keep,
    Clear,
    Write { name: String, bytes: Vec<u8> },
}

/// Turns uploads into stored, compressed files.
///
/// Work happens in two steps. [`stage`](Self::stage) decodes and encodes one
/// field in memory; [`write`](Self::write) stores every staged file once all
/// fields of the form have passed. A form with one bad upload therefore
/// writes nothing at all.
pub struct ImagePipeline<'a, B: ImageBackend> {
    backend: &'a B,
    storage: &'a MediaStorage,
    defaults: CompressionPolicy,
    staged: Vec<(&'static str, Staged)>,
}

impl<'a, B: ImageBackend> ImagePipeline<'a, B> {
    pub fn new(backend: &'a B, storage: &'a MediaStorage, defaults: CompressionPolicy) -> Self {
        Self {
            backend,
            storage,
            defaults,
            staged: Vec::new(),
        }
    }

    /// Check a change to `E.field` and encode its upload in memory.
    pub fn stage<E: ImageFields>(
        &mut self,
        field: &str,
        change: ImageChange,
    ) -> Result<(), UploadError> {
        let declared = E::image_field(field)?;
        let staged = match change {
            ImageChange::Keep => Staged::Keep,
            ImageChange::Clear if declared.required => {
                return Err(UploadError::Required {
                    model: E::MODEL,
                    field: declared.name,
                });
            }
            ImageChange::Clear => Staged::Clear,
            ImageChange::Replace(upload) => {
                let (filename, bytes) = self.encode::<E>(declared, upload)?;
                Staged::Write {
                    name: upload_path(APP_LABEL, E::MODEL, declared.name, &filename),
                    bytes,
                }
            }
        };
        self.staged.push((declared.name, staged));
        Ok(())
    }

    /// Compress (when the field has a policy) or fully decode one upload.
    ///
    /// Returns the filename and bytes to store.
    fn encode<E: ImageFields>(
        &self,
        field: &'static ImageField,
        upload: Upload,
    ) -> Result<(String, Vec<u8>), UploadError> {
        match field.compression {
            Some(policy) => {
                let policy = policy.resolve(&self.defaults);
                let compressed =
                    compress_image(self.backend, &upload.filename, &upload.bytes, &policy)
                        .map_err(|e| classify(E::MODEL, field.name, e))?;
                tracing::info!(
                    model = E::MODEL,
                    field = field.name,
                    original = %upload.filename,
                    width = compressed.width,
                    height = compressed.height,
                    quality = policy.quality.value(),
                    bytes_in = upload.bytes.len(),
                    bytes_out = compressed.bytes.len(),
                    "compressed upload"
                );
                Ok((compressed.filename, compressed.bytes))
            }
            None => {
                verify_image(self.backend, &upload.bytes)
                    .map_err(|e| classify(E::MODEL, field.name, e))?;
                Ok((upload.filename, upload.bytes))
            }
        }
    }

    /// Write every staged upload to media storage.
    ///
    /// If one write fails, files already written by this call are removed.
    pub fn write(self) -> Result<StoredImages<'a>, UploadError> {
        let mut stored = StoredImages {
            storage: self.storage,
            values: Vec::with_capacity(self.staged.len()),
            written: Vec::new(),
        };
        for (field, staged) in self.staged {
            let value = match staged {
                Staged::Keep => None,
                Staged::Clear => Some(None),
                Staged::Write { name, bytes } => match self.storage.save(&name, &bytes) {
                    Ok(name) => {
                        stored.written.push(name.clone());
                        Some(Some(name))
                    }
                    Err(err) => {
                        stored.discard();
                        return Err(err.into());
                    }
                },
            };
            stored.values.push((field, value));
        }
        Ok(stored)
    }
}

/// Column values produced by [`ImagePipeline::write`].
#[derive(Debug)]
pub struct StoredImages<'a> {
    storage: &'a MediaStorage,
    values: Vec<(&'static str, Option<Option<String>>)>,
    written: Vec<String>,
}

impl StoredImages<'_> {
    /// New value for `field`. `None` means the column stays as it is.
    pub fn value(&self, field: &str) -> Option<Option<String>> {
        self.values
            .iter()
            .rev()
            .find(|(name, _)| *name == field)
            .and_then(|(_, value)| value.clone())
    }

    /// Storage names written in this batch.
    pub fn written(&self) -> &[String] {
        &self.written
    }

    /// Remove every file written in this batch.
    pub fn discard(self) {
        for name in &self.written {
            if let Err(err) = self.storage.delete(name) {
                tracing::warn!(name = %name, error = %err, "could not remove media file");
            }
        }
        if !self.written.is_empty() {
            tracing::info!(files = self.written.len(), "discarded unsaved uploads");
        }
    }

    /// Pass `result` through, discarding the written files when it is an
    /// error.
    pub fn settle<T, E>(self, result: Result<T, E>) -> Result<T, E> {
        if result.is_err() {
            self.discard();
        }
        result
    }
}
