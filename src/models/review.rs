use crate::uploads::{ImageField, ImageFields};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A customer review.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "review")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub photo: Option<String>,
    pub full_name: String,
    #[sea_orm(column_type = "Text")]
    pub text: String,
    pub is_published: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name)
    }
}

impl ImageFields for Entity {
    const MODEL: &'static str = "review";
    const IMAGE_FIELDS: &'static [ImageField] = &[ImageField::plain("photo")];
}
