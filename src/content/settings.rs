//! The site settings singleton.
//!
//! The row always has id [`SETTINGS_ID`]. First use inserts it with an
//! `ON CONFLICT DO NOTHING` and then reads it back, so two callers racing on
//! an empty table both get the same row.

use super::{ContentError, ContentStore, Result, set_if_some};
use crate::forms::{SiteSettingsForm, ValidationError};
use crate::imaging::ImageBackend;
use crate::models::site_settings::{self, SETTINGS_ID};
use crate::models::SiteSettings;
use crate::uploads::StoredImages;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel, PaginatorTrait, Set, SqlErr};

const ALREADY_EXISTS: &str = "site settings already exist; edit the existing record instead";

fn blank_row() -> site_settings::ActiveModel {
    site_settings::ActiveModel {
        id: Set(SETTINGS_ID),
        logo: Set(None),
        slogan: Set(String::new()),
        copyright_text: Set(String::new()),
        tursab_image: Set(None),
        address: Set(String::new()),
        address_gmap: Set(String::new()),
        email: Set(String::new()),
        phone: Set(String::new()),
        phone_repr: Set(String::new()),
        whatsapp: Set(String::new()),
        whatsapp_repr: Set(String::new()),
        banner_link: Set(String::new()),
        banner_image: Set(None),
    }
}

impl<B: ImageBackend> ContentStore<B> {
    /// Whether the settings row has been created.
    pub async fn settings_exist(&self) -> Result<bool> {
        Ok(SiteSettings::find().count(&self.db).await? > 0)
    }

    /// The settings row, created with empty values on first use.
    pub async fn load_settings(&self) -> Result<site_settings::Model> {
        let inserted = SiteSettings::insert(blank_row())
            .on_conflict(
                OnConflict::column(site_settings::Column::Id)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;
        if inserted > 0 {
            tracing::info!(id = SETTINGS_ID, "created site settings");
        }

        SiteSettings::find_by_id(SETTINGS_ID)
            .one(&self.db)
            .await?
            .ok_or_else(|| ContentError::not_found("site settings", SETTINGS_ID))
    }

    /// Explicitly create the settings row from a form.
    ///
    /// Fails with a validation error when the row already exists; the
    /// stored row is left as it was.
    pub async fn create_settings(&self, form: SiteSettingsForm) -> Result<site_settings::Model> {
        if self.settings_exist().await? {
            return Err(ValidationError::non_field(ALREADY_EXISTS).into());
        }
        form.validate()?;

        let mut row = blank_row();
        let images = self.fill_settings(&mut row, form)?;
        match images.settle(SiteSettings::insert(row).exec(&self.db).await) {
            Ok(_) => {}
            Err(err) => {
                return Err(match err.sql_err() {
                    Some(SqlErr::UniqueConstraintViolation(_)) => {
                        ValidationError::non_field(ALREADY_EXISTS).into()
                    }
                    _ => err.into(),
                });
            }
        }
        tracing::info!(id = SETTINGS_ID, "created site settings");
        self.load_settings().await
    }

    /// Apply a partial form; unset fields keep their stored value.
    pub async fn update_settings(&self, form: SiteSettingsForm) -> Result<site_settings::Model> {
        form.validate()?;
        let current = self.load_settings().await?;
        let mut row = current.clone().into_active_model();
        let images = self.fill_settings(&mut row, form)?;
        if !row.is_changed() {
            return Ok(current);
        }
        let updated = images.settle(row.update(&self.db).await)?;
        tracing::info!(id = updated.id, "updated site settings");
        Ok(updated)
    }

    /// Copy form values onto `row`. Uploads are written only once all three
    /// image fields have been checked.
    fn fill_settings(
        &self,
        row: &mut site_settings::ActiveModel,
        form: SiteSettingsForm,
    ) -> Result<StoredImages<'_>> {
        let mut pipeline = self.pipeline();
        pipeline.stage::<SiteSettings>("logo", form.logo)?;
        pipeline.stage::<SiteSettings>("tursab_image", form.tursab_image)?;
        pipeline.stage::<SiteSettings>("banner_image", form.banner_image)?;
        let images = pipeline.write()?;

        set_if_some(&mut row.logo, images.value("logo"));
        set_if_some(&mut row.tursab_image, images.value("tursab_image"));
        set_if_some(&mut row.banner_image, images.value("banner_image"));
        set_if_some(&mut row.slogan, form.slogan);
        set_if_some(&mut row.copyright_text, form.copyright_text);
        set_if_some(&mut row.address, form.address);
        set_if_some(&mut row.address_gmap, form.address_gmap);
        set_if_some(&mut row.email, form.email);
        set_if_some(&mut row.phone, form.phone);
        set_if_some(&mut row.phone_repr, form.phone_repr);
        set_if_some(&mut row.whatsapp, form.whatsapp);
        set_if_some(&mut row.whatsapp_repr, form.whatsapp_repr);
        set_if_some(&mut row.banner_link, form.banner_link);
        Ok(images)
    }
}

#[cfg(test)]
mod tests {
    use crate::forms::SiteSettingsForm;
    use crate::imaging::Dimensions;
    use crate::imaging::backend::tests::RecordedOp;
    use crate::test_helpers::mock_store;
    use crate::uploads::{ImageChange, Upload};

    #[tokio::test]
    async fn load_twice_returns_the_same_row() {
        let (_tmp, store) = mock_store(vec![]).await;
        assert!(!store.settings_exist().await.unwrap());

        let first = store.load_settings().await.unwrap();
        let second = store.load_settings().await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(first, second);
        assert!(store.settings_exist().await.unwrap());
    }

    #[tokio::test]
    async fn explicit_create_then_second_create_is_rejected() {
        let (_tmp, store) = mock_store(vec![]).await;
        let created = store
            .create_settings(SiteSettingsForm {
                slogan: Some("Sea, sun, ruins".into()),
                email: Some("info@tours.example.com".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(created.id, 1);

        let err = store
            .create_settings(SiteSettingsForm {
                slogan: Some("Other".into()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(err.is_validation());

        let stored = store.load_settings().await.unwrap();
        assert_eq!(stored, created);
        assert_eq!(stored.slogan, "Sea, sun, ruins");
    }

    #[tokio::test]
    async fn create_after_implicit_load_is_rejected() {
        let (_tmp, store) = mock_store(vec![]).await;
        store.load_settings().await.unwrap();
        let err = store
            .create_settings(SiteSettingsForm::default())
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn partial_update_keeps_unset_fields() {
        let (_tmp, store) = mock_store(vec![]).await;
        store
            .update_settings(SiteSettingsForm {
                phone: Some("+90 555 000 00 00".into()),
                address: Some("Fethiye".into()),
                ..Default::default()
            })
            .await
            .unwrap();

        let updated = store
            .update_settings(SiteSettingsForm {
                address: Some("Kaş".into()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(updated.phone, "+90 555 000 00 00");
        assert_eq!(updated.address, "Kaş");
    }

    #[tokio::test]
    async fn invalid_form_changes_nothing() {
        let (_tmp, store) = mock_store(vec![]).await;
        let before = store.load_settings().await.unwrap();
        let err = store
            .update_settings(SiteSettingsForm {
                email: Some("not-an-email".into()),
                slogan: Some("new".into()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(store.load_settings().await.unwrap(), before);
    }

    #[tokio::test]
    async fn banner_upload_is_compressed_into_its_box() {
        let (_tmp, store) = mock_store(vec![Dimensions {
            width: 2160,
            height: 1040,
        }])
        .await;

        let updated = store
            .update_settings(SiteSettingsForm {
                banner_image: ImageChange::Replace(Upload::new("Banner.png", b"raw".to_vec())),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(
            updated.banner_image.as_deref(),
            Some("main/sitesettings/banner_image/Banner.jpg")
        );
        assert!(store.backend.get_operations().contains(&RecordedOp::Compress {
            source_len: 3,
            width: 1080,
            height: 520,
            quality: 75,
        }));
    }

    #[tokio::test]
    async fn undecodable_logo_leaves_row_untouched() {
        let (_tmp, store) = mock_store(vec![]).await;
        let before = store.load_settings().await.unwrap();
        let err = store
            .update_settings(SiteSettingsForm {
                logo: ImageChange::Replace(Upload::new("logo.svg", b"<svg/>".to_vec())),
                slogan: Some("changed".into()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(err.is_decode());
        assert_eq!(store.load_settings().await.unwrap(), before);
    }

    #[tokio::test]
    async fn bad_banner_leaves_no_logo_file() {
        let (tmp, store) = mock_store(vec![Dimensions {
            width: 100,
            height: 40,
        }])
        .await;
        let before = store.load_settings().await.unwrap();

        let err = store
            .update_settings(SiteSettingsForm {
                logo: ImageChange::Replace(Upload::new("logo.png", b"png".to_vec())),
                banner_image: ImageChange::Replace(Upload::new("banner.jpg", b"junk".to_vec())),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert!(err.is_decode());
        assert_eq!(store.load_settings().await.unwrap(), before);
        assert!(!tmp.path().join("media/main").exists());
    }

    #[tokio::test]
    async fn clearing_an_image_sets_null() {
        let (_tmp, store) = mock_store(vec![Dimensions {
            width: 100,
            height: 40,
        }])
        .await;
        store
            .update_settings(SiteSettingsForm {
                logo: ImageChange::Replace(Upload::new("logo.png", b"png".to_vec())),
                ..Default::default()
            })
            .await
            .unwrap();

        let cleared = store
            .update_settings(SiteSettingsForm {
                logo: ImageChange::Clear,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(cleared.logo, None);
    }
}
