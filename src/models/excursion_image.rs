//! Gallery images, edited inline with their excursion.

use crate::imaging::FieldPolicy;
use crate::uploads::{ImageField, ImageFields};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "excursion_image")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(indexed)]
    pub excursion_id: i32,

    pub caption: String,
    pub sort_order: i32,
    pub image: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::excursion::Entity",
        from = "Column::ExcursionId",
        to = "super::excursion::Column::Id",
        on_delete = "Cascade"
    )]
    Excursion,
}

impl Related<super::excursion::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Excursion.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Display name, e.g. `"Boat Trip — #12"`.
    pub fn label(&self, excursion: &super::excursion::Model) -> String {
        format!("{} — #{}", excursion.title, self.id)
    }
}

impl ImageFields for Entity {
    const MODEL: &'static str = "excursionimage";
    const IMAGE_FIELDS: &'static [ImageField] =
        &[ImageField::compressed("image", FieldPolicy::new(1280, 1280, 75)).required()];
}
