//! Read-only image preview fields.
//!
//! | Preview field | Entity | Image column |
//! |---|---|---|
//! | `logo_preview` | site settings | `logo` |
//! | `tursab_preview` | site settings | `tursab_image` |
//! | `cover_thumb` | excursion | `cover` |
//! | `cover_head_thumb` | excursion | `cover_head` |
//! | `thumb` | gallery image | `image` |
//! | `photo_thumb` | review | `photo` |

use crate::storage::MediaStorage;
use maud::{Markup, html};

/// Shown when there is no image.
pub const EMPTY_PREVIEW: &str = "—";

/// Image column behind a preview field name.
pub fn preview_source(field: &str) -> Option<&'static str> {
    match field {
        "logo_preview" => Some("logo"),
        "tursab_preview" => Some("tursab_image"),
        "cover_thumb" => Some("cover"),
        "cover_head_thumb" => Some("cover_head"),
        "thumb" => Some("image"),
        "photo_thumb" => Some("photo"),
        _ => None,
    }
}

/// A 60px-high thumbnail of a stored image, or an em-dash.
pub fn image_preview(storage: &MediaStorage, name: Option<&str>) -> Markup {
    match name.filter(|n| !n.is_empty()) {
        Some(name) => html! {
            img src=(storage.url(name)) style="max-height:60px;";
        },
        None => html! { (EMPTY_PREVIEW) },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_renders_img_tag() {
        let storage = MediaStorage::new("/tmp/unused", "/media/");
        let html = image_preview(&storage, Some("main/excursion/cover/a.jpg")).into_string();
        assert_eq!(
            html,
            r#"<img src="/media/main/excursion/cover/a.jpg" style="max-height:60px;">"#
        );
    }

    #[test]
    fn missing_image_renders_dash() {
        let storage = MediaStorage::new("/tmp/unused", "/media/");
        assert_eq!(image_preview(&storage, None).into_string(), "—");
        assert_eq!(image_preview(&storage, Some("")).into_string(), "—");
    }

    #[test]
    fn url_is_escaped() {
        let storage = MediaStorage::new("/tmp/unused", "/media/");
        let html = image_preview(&storage, Some("a\"b.jpg")).into_string();
        assert!(html.contains("a&quot;b.jpg"));
    }

    #[test]
    fn preview_fields_map_to_columns() {
        assert_eq!(preview_source("cover_thumb"), Some("cover"));
        assert_eq!(preview_source("title"), None);
    }
}
