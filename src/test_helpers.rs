//! Shared test utilities.
//!
//! Provides in-memory image fixtures and a throwaway [`ContentStore`] backed
//! by a SQLite file and a media root inside a temp directory.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let (tmp, store) = mock_store(vec![Dimensions { width: 4000, height: 3000 }]).await;
//! let created = store.create_excursion(ExcursionForm::new("Boat trip")).await.unwrap();
//! assert!(tmp.path().join("db.sqlite3").exists());
//! ```

use std::io::Cursor;
use tempfile::TempDir;

use crate::config::DatabaseConfig;
use crate::content::ContentStore;
use crate::db;
use crate::imaging::backend::tests::MockBackend;
use crate::imaging::{CompressionPolicy, Dimensions};
use crate::storage::MediaStorage;

// =========================================================================
// Image fixtures
// =========================================================================

/// Encode a gradient RGB image as JPEG.
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Jpeg).unwrap();
    out.into_inner()
}

/// Encode a half-transparent RGBA image as PNG.
pub fn png_rgba_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_fn(width, height, |x, _| {
        image::Rgba([200, 50, 50, if x % 2 == 0 { 255 } else { 64 }])
    });
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

// =========================================================================
// Store setup
// =========================================================================

/// Connect to a fresh SQLite file under `tmp` and create the tables.
pub async fn temp_database(tmp: &TempDir) -> sea_orm::DatabaseConnection {
    let config = DatabaseConfig {
        url: format!(
            "sqlite://{}?mode=rwc",
            tmp.path().join("db.sqlite3").display()
        ),
        max_connections: 1,
    };
    let conn = db::connect(&config).await.unwrap();
    db::create_schema(&conn).await.unwrap();
    conn
}

/// A store whose image backend is a [`MockBackend`] primed with `dims`.
///
/// The mock pops dimensions from the end of the list, one per identify call.
/// Media is written to `{tmp}/media`.
pub async fn mock_store(dims: Vec<Dimensions>) -> (TempDir, ContentStore<MockBackend>) {
    let tmp = TempDir::new().unwrap();
    let conn = temp_database(&tmp).await;
    let storage = MediaStorage::new(tmp.path().join("media"), "/media/");
    let store = ContentStore::new(
        conn,
        storage,
        MockBackend::with_dimensions(dims),
        CompressionPolicy::default(),
    );
    (tmp, store)
}
