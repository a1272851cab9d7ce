//! # Excursion CMS
//!
//! Content backend for a tourism excursion website. Editors maintain the
//! site-wide settings, excursions with photo galleries, customer reviews, FAQ
//! entries and social links; page templates read them back through a few
//! plain accessors.
//!
//! # Architecture: Validate, Compress, Write Once
//!
//! Every edit flows through the same three steps:
//!
//! ```text
//! 1. Validate   form        →  field errors        (forms)
//! 2. Compress   uploads     →  media/…/x.jpg       (uploads + imaging + storage)
//! 3. Persist    form+names  →  one row write       (content + models + db)
//! ```
//!
//! Images are re-encoded *before* anything durable happens. A row only ever
//! references a compressed file, and an upload that does not decode leaves no
//! file and no row behind.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`models`] | SeaORM entities, one table per content type, with image field declarations |
//! | [`forms`] | Typed edit forms and field validation |
//! | [`uploads`] | The save hook: per-field compression policy, keep/replace/clear semantics |
//! | [`imaging`] | Pure-Rust decode, fit-to-box resize and JPEG encode |
//! | [`storage`] | Media files on disk under `{app}/{entity}/{field}/{filename}` |
//! | [`naming`] | Slugs and upload filename sanitising |
//! | [`content`] | [`ContentStore`](content::ContentStore): CRUD and the settings singleton |
//! | [`presentation`] | Read helpers handed to page templates |
//! | [`admin`] | Admin options, image previews and changelists |
//! | [`db`] | Connection pool and table creation |
//! | [`config`] | `excursion-cms.toml` loading, merging over stock defaults, validation |
//! | [`logging`] | `tracing` subscriber setup for the binary |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## One Settings Row, Enforced by the Database
//!
//! Site settings live in a table whose only row has primary key `1`. First
//! access inserts that row with `ON CONFLICT DO NOTHING` and reads it back, so
//! concurrent first requests converge on the same record instead of racing.
//!
//! ## Policies Live Next to the Field
//!
//! Each image column is declared once, with its name and its compression box
//! and quality (see [`uploads::ImageField`]). The upload path is built from
//! that declared name; nothing inspects the entity at save time to guess which
//! field an upload belongs to.
//!
//! ## Pure-Rust Imaging
//!
//! The [`imaging`] module uses the `image` crate (format sniffing, Lanczos3
//! resampling, JPEG encoding). No system libraries are needed, and the backend
//! sits behind a trait so the save hook is tested with a recording mock.

pub mod admin;
pub mod config;
pub mod content;
pub mod db;
pub mod forms;
pub mod imaging;
pub mod logging;
pub mod models;
pub mod naming;
pub mod output;
pub mod presentation;
pub mod storage;
pub mod uploads;

#[cfg(test)]
pub(crate) mod test_helpers;
