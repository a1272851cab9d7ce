//! Excursion listings.

use crate::imaging::FieldPolicy;
use crate::uploads::{ImageField, ImageFields};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "excursion")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,

    /// URL slug, unique across all excursions.
    #[sea_orm(unique)]
    pub slug: String,

    #[sea_orm(column_type = "Text")]
    pub short_description: String,

    /// Markdown body, without images (those go in the gallery).
    #[sea_orm(column_type = "Text")]
    pub content_md: String,

    pub is_published: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,

    pub cover: Option<String>,
    pub cover_head: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::excursion_image::Entity")]
    Images,
}

impl Related<super::excursion_image::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Images.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Public detail page path.
    pub fn absolute_url(&self) -> String {
        format!("/excursions/{}/", self.slug)
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

impl ImageFields for Entity {
    const MODEL: &'static str = "excursion";
    const IMAGE_FIELDS: &'static [ImageField] = &[
        ImageField::compressed("cover", FieldPolicy::new(1280, 1280, 75)),
        ImageField::compressed("cover_head", FieldPolicy::new(1280, 1280, 75)),
    ];
}
