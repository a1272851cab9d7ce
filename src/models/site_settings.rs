//! Site-wide settings: branding, contacts and the home-page banner.
//!
//! There is exactly one row, always with id [`SETTINGS_ID`]. The fixed
//! primary key is what enforces the single-row invariant.

use crate::imaging::FieldPolicy;
use crate::uploads::{ImageField, ImageFields};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of the settings row.
pub const SETTINGS_ID: i32 = 1;

#[derive(Clone, Debug, PartialEq, Eq, Default, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "site_settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,

    // Branding
    pub logo: Option<String>,
    pub slogan: String,
    pub copyright_text: String,
    pub tursab_image: Option<String>,

    // Contacts
    pub address: String,
    /// Google Maps link or embed code.
    #[sea_orm(column_type = "Text")]
    pub address_gmap: String,
    pub email: String,
    pub phone: String,
    /// Phone number as shown on the site.
    pub phone_repr: String,
    pub whatsapp: String,
    pub whatsapp_repr: String,

    // Banner
    pub banner_link: String,
    pub banner_image: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Site settings")
    }
}

impl ImageFields for Entity {
    const MODEL: &'static str = "sitesettings";
    const IMAGE_FIELDS: &'static [ImageField] = &[
        ImageField::plain("logo"),
        ImageField::plain("tursab_image"),
        ImageField::compressed("banner_image", FieldPolicy::new(1080, 520, 75)),
    ];
}
