//! The content store: every create, read, update and delete goes through here.
//!
//! [`ContentStore`] owns the database connection, the media storage and the
//! image backend. Write operations follow one order:
//!
//! 1. validate the form,
//! 2. stage every image change through the save hook ([`ImagePipeline`]),
//!    then write the files once all of them have decoded,
//! 3. write the row once with the final storage names.
//!
//! A form or decode error in steps 1-2 leaves both the database and the
//! media root untouched. If the row write in step 3 fails, the files from
//! step 2 are removed again.
//!
//! Operations are split by entity:
//!
//! | Module | Entity |
//! |---|---|
//! | `settings` | site settings singleton |
//! | `excursions` | excursions and their gallery images |
//! | `reviews` | reviews |
//! | `faqs` | FAQ entries |
//! | `social` | social links |

mod excursions;
mod faqs;
mod reviews;
mod settings;
mod social;

use crate::config::AppConfig;
use crate::db;
use crate::forms::ValidationError;
use crate::imaging::{CompressionPolicy, ImageBackend, RustBackend};
use crate::storage::{MediaStorage, StorageError};
use crate::uploads::{ImagePipeline, UploadError};
use sea_orm::{ActiveValue, DatabaseConnection, DbErr, Set};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("upload rejected: {0}")]
    Upload(#[from] UploadError),
    #[error("{entity} {key} not found")]
    NotFound { entity: &'static str, key: String },
    #[error("an excursion with slug `{0}` already exists")]
    DuplicateSlug(String),
    #[error("database error: {0}")]
    Db(#[from] DbErr),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ContentError {
    pub(crate) fn not_found(entity: &'static str, key: impl ToString) -> Self {
        ContentError::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    /// Form errors, unknown image fields and missing required images.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ContentError::Validation(_)
                | ContentError::Upload(UploadError::UnknownField { .. })
                | ContentError::Upload(UploadError::Required { .. })
        )
    }

    /// The uploaded bytes were not a decodable image.
    pub fn is_decode(&self) -> bool {
        matches!(self, ContentError::Upload(UploadError::Decode { .. }))
    }
}

pub type Result<T> = std::result::Result<T, ContentError>;

/// Database, media storage and image backend behind one handle.
pub struct ContentStore<B: ImageBackend = RustBackend> {
    db: DatabaseConnection,
    storage: MediaStorage,
    backend: B,
    defaults: CompressionPolicy,
}

impl ContentStore<RustBackend> {
    /// Connect, create missing tables and point storage at the media root.
    pub async fn open(config: &AppConfig) -> Result<Self> {
        let db = db::connect(&config.database).await?;
        db::create_schema(&db).await?;
        let storage = MediaStorage::new(config.media.root.clone(), &config.media.base_url);
        tracing::info!(media_root = %config.media.root, "content store ready");
        Ok(Self::new(
            db,
            storage,
            RustBackend::new(),
            config.images.policy(),
        ))
    }
}

impl<B: ImageBackend> ContentStore<B> {
    pub fn new(
        db: DatabaseConnection,
        storage: MediaStorage,
        backend: B,
        defaults: CompressionPolicy,
    ) -> Self {
        Self {
            db,
            storage,
            backend,
            defaults,
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn storage(&self) -> &MediaStorage {
        &self.storage
    }

    /// Public URL of a stored image.
    pub fn url(&self, name: &str) -> String {
        self.storage.url(name)
    }

    pub(crate) fn pipeline(&self) -> ImagePipeline<'_, B> {
        ImagePipeline::new(&self.backend, &self.storage, self.defaults)
    }
}

/// Overwrite a column only when the form supplied a value.
pub(crate) fn set_if_some<T>(column: &mut ActiveValue<T>, value: Option<T>)
where
    T: Into<sea_orm::Value>,
{
    if let Some(value) = value {
        *column = Set(value);
    }
}
