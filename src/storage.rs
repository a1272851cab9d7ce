//! Filesystem media storage.
//!
//! Uploaded images live under a media root using the path convention
//! `{app}/{entity}/{field}/{filename}`, e.g. `main/excursion/cover/sunrise.jpg`.
//! The stored name (relative to the root) is what entity rows reference; the
//! public URL is that name joined onto the configured base URL.
//!
//! Names are never overwritten: when a file already exists, a `_N` suffix is
//! inserted before the extension until a free name is found.

use crate::naming::{alternate_name, valid_filename};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// App label used as the first path component of every stored file.
pub const APP_LABEL: &str = "main";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("file not found: {name}")]
    NotFound { name: String },
    #[error("invalid storage name: {0}")]
    InvalidName(String),
}

/// Build the storage name for an upload.
///
/// The field name is bound where the image field is declared, so the path
/// never depends on guessing which field triggered the upload.
pub fn upload_path(app: &str, model: &str, field: &str, filename: &str) -> String {
    format!("{app}/{model}/{field}/{}", valid_filename(filename))
}

/// Reject names that could escape the media root.
fn validate_name(name: &str) -> Result<(), StorageError> {
    if name.is_empty()
        || name.starts_with('/')
        || name.contains('\\')
        || name.contains("//")
        || name.split('/').any(|part| part == ".." || part == ".")
    {
        return Err(StorageError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Media files on local disk, served under `base_url`.
#[derive(Debug, Clone)]
pub struct MediaStorage {
    root: PathBuf,
    base_url: String,
}

impl MediaStorage {
    pub fn new(root: impl Into<PathBuf>, base_url: &str) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn full_path(&self, name: &str) -> Result<PathBuf, StorageError> {
        validate_name(name)?;
        Ok(self.root.join(name))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.full_path(name).is_ok_and(|p| p.is_file())
    }

    /// The `n`th candidate for `name`: `name` itself, then `_1`, `_2`, ...
    fn candidate(name: &str, n: u32) -> String {
        if n == 0 {
            return name.to_string();
        }
        match name.rsplit_once('/') {
            Some((dir, file)) => format!("{dir}/{}", alternate_name(file, n)),
            None => alternate_name(name, n),
        }
    }

    /// First name derived from `name` that is not taken yet.
    ///
    /// Only a hint: [`save`](Self::save) claims its name atomically.
    pub fn available_name(&self, name: &str) -> Result<String, StorageError> {
        validate_name(name)?;
        let mut n = 0;
        loop {
            let candidate = Self::candidate(name, n);
            if !self.exists(&candidate) {
                return Ok(candidate);
            }
            n += 1;
        }
    }

    /// Write `bytes` under `name` (or the next free variant of it).
    ///
    /// Each candidate is created with `create_new`, so two concurrent saves
    /// of the same name never share a file. Returns the name actually used.
    pub fn save(&self, name: &str, bytes: &[u8]) -> Result<String, StorageError> {
        validate_name(name)?;
        let mut n = 0;
        loop {
            let candidate = Self::candidate(name, n);
            let path = self.full_path(&candidate)?;
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => file,
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    n += 1;
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            if let Err(e) = file.write_all(bytes) {
                drop(file);
                let _ = fs::remove_file(&path);
                return Err(e.into());
            }
            tracing::debug!(name = %candidate, bytes = bytes.len(), "stored media file");
            return Ok(candidate);
        }
    }

    pub fn open(&self, name: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.full_path(name)?;
        fs::read(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StorageError::NotFound {
                name: name.to_string(),
            },
            _ => StorageError::Io(e),
        })
    }

    /// Remove a stored file. Missing files are not an error.
    pub fn delete(&self, name: &str) -> Result<(), StorageError> {
        let path = self.full_path(name)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!(name, "deleted media file");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    /// Public URL of a stored file.
    pub fn url(&self, name: &str) -> String {
        format!("{}/{}", self.base_url, name.trim_start_matches('/'))
    }
}
