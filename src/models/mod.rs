//! SeaORM entity definitions, one table per content type.
//!
//! | Entity | Table | Default ordering |
//! |---|---|---|
//! | [`site_settings`] | `site_settings` | single row, id 1 |
//! | [`excursion`] | `excursion` | newest first |
//! | [`excursion_image`] | `excursion_image` | `sort_order`, `id` |
//! | [`review`] | `review` | newest first |
//! | [`faq`] | `faq` | `sort_order`, `id` |
//! | [`social_link`] | `social_link` | `sort_order`, `id` |
//!
//! Image columns hold storage names (see [`crate::storage`]), never bytes.
//! Entities with image columns declare them through
//! [`ImageFields`](crate::uploads::ImageFields).

pub mod excursion;
pub mod excursion_image;
pub mod faq;
pub mod review;
pub mod site_settings;
pub mod social_link;

pub use excursion::Entity as Excursion;
pub use excursion_image::Entity as ExcursionImage;
pub use faq::Entity as Faq;
pub use review::Entity as Review;
pub use site_settings::Entity as SiteSettings;
pub use social_link::Entity as SocialLink;
