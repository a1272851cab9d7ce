//! The administrative editing surface.
//!
//! - [`options`]: per-entity form layout, list columns, search, filters,
//!   ordering and inlines,
//! - [`preview`]: read-only thumbnail fields,
//! - [`changelist`]: filtered record tables built from those options.
//!
//! Edits themselves go through [`ContentStore`](crate::content::ContentStore);
//! list-editable columns map to its `set_*_listing` operations.

pub mod changelist;
pub mod options;
pub mod preview;

pub use changelist::{ChangeList, ChangeListQuery, DateFilter, changelist, render_changelist};
pub use options::{ModelAdmin, REGISTRY, find, has_add_permission};
pub use preview::image_preview;
