//! Excursions and their gallery images.

use super::{ContentError, ContentStore, Result, set_if_some};
use crate::forms::{ExcursionForm, GalleryImageForm, sort_order_value};
use crate::imaging::ImageBackend;
use crate::models::{Excursion, ExcursionImage, excursion, excursion_image};
use crate::uploads::{ImageFields, UploadError};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, IntoActiveModel, NotSet, QueryFilter,
    QueryOrder, Set, SqlErr, TransactionTrait,
};

fn slug_conflict(err: DbErr, slug: &str) -> ContentError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => ContentError::DuplicateSlug(slug.to_string()),
        _ => ContentError::Db(err),
    }
}

impl<B: ImageBackend> ContentStore<B> {
    /// All excursions, newest first.
    pub async fn list_excursions(&self) -> Result<Vec<excursion::Model>> {
        Ok(Excursion::find()
            .order_by_desc(excursion::Column::CreatedAt)
            .order_by_desc(excursion::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn get_excursion(&self, id: i32) -> Result<excursion::Model> {
        Excursion::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| ContentError::not_found("excursion", id))
    }

    pub async fn excursion_by_slug(&self, slug: &str) -> Result<excursion::Model> {
        Excursion::find()
            .filter(excursion::Column::Slug.eq(slug))
            .one(&self.db)
            .await?
            .ok_or_else(|| ContentError::not_found("excursion", slug))
    }

    /// Fail early when another excursion already owns `slug`.
    async fn ensure_slug_free(&self, slug: &str, except: Option<i32>) -> Result<()> {
        let mut query = Excursion::find().filter(excursion::Column::Slug.eq(slug));
        if let Some(id) = except {
            query = query.filter(excursion::Column::Id.ne(id));
        }
        match query.one(&self.db).await? {
            Some(_) => Err(ContentError::DuplicateSlug(slug.to_string())),
            None => Ok(()),
        }
    }

    pub async fn create_excursion(&self, form: ExcursionForm) -> Result<excursion::Model> {
        form.validate()?;
        let slug = form.resolved_slug();
        self.ensure_slug_free(&slug, None).await?;

        let mut pipeline = self.pipeline();
        pipeline.stage::<Excursion>("cover", form.cover)?;
        pipeline.stage::<Excursion>("cover_head", form.cover_head)?;
        let images = pipeline.write()?;

        let now = Utc::now();
        let row = excursion::ActiveModel {
            id: NotSet,
            title: Set(form.title),
            slug: Set(slug.clone()),
            short_description: Set(form.short_description),
            content_md: Set(form.content_md),
            is_published: Set(form.is_published),
            created_at: Set(now),
            updated_at: Set(now),
            cover: Set(images.value("cover").flatten()),
            cover_head: Set(images.value("cover_head").flatten()),
        };
        let model = images
            .settle(row.insert(&self.db).await)
            .map_err(|e| slug_conflict(e, &slug))?;
        tracing::info!(id = model.id, slug = %model.slug, "created excursion");
        Ok(model)
    }

    pub async fn update_excursion(&self, id: i32, form: ExcursionForm) -> Result<excursion::Model> {
        let current = self.get_excursion(id).await?;
        form.validate()?;
        let slug = form.resolved_slug();
        self.ensure_slug_free(&slug, Some(id)).await?;

        let mut pipeline = self.pipeline();
        pipeline.stage::<Excursion>("cover", form.cover)?;
        pipeline.stage::<Excursion>("cover_head", form.cover_head)?;
        let images = pipeline.write()?;

        let mut row = current.into_active_model();
        row.title = Set(form.title);
        row.slug = Set(slug.clone());
        row.short_description = Set(form.short_description);
        row.content_md = Set(form.content_md);
        row.is_published = Set(form.is_published);
        row.updated_at = Set(Utc::now());
        set_if_some(&mut row.cover, images.value("cover"));
        set_if_some(&mut row.cover_head, images.value("cover_head"));

        let model = images
            .settle(row.update(&self.db).await)
            .map_err(|e| slug_conflict(e, &slug))?;
        tracing::info!(id = model.id, slug = %model.slug, "updated excursion");
        Ok(model)
    }

    /// Delete an excursion together with its gallery images.
    pub async fn delete_excursion(&self, id: i32) -> Result<()> {
        let txn = self.db.begin().await?;
        if Excursion::find_by_id(id).one(&txn).await?.is_none() {
            return Err(ContentError::not_found("excursion", id));
        }
        let images = ExcursionImage::delete_many()
            .filter(excursion_image::Column::ExcursionId.eq(id))
            .exec(&txn)
            .await?;
        Excursion::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;
        tracing::info!(id, images = images.rows_affected, "deleted excursion");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Gallery
    // -------------------------------------------------------------------------

    /// Gallery of one excursion, by `sort_order` then id.
    pub async fn gallery(&self, excursion_id: i32) -> Result<Vec<excursion_image::Model>> {
        Ok(ExcursionImage::find()
            .filter(excursion_image::Column::ExcursionId.eq(excursion_id))
            .order_by_asc(excursion_image::Column::SortOrder)
            .order_by_asc(excursion_image::Column::Id)
            .all(&self.db)
            .await?)
    }

    /// One gallery image, which must belong to `excursion_id`.
    pub async fn gallery_image(
        &self,
        excursion_id: i32,
        image_id: i32,
    ) -> Result<excursion_image::Model> {
        ExcursionImage::find_by_id(image_id)
            .filter(excursion_image::Column::ExcursionId.eq(excursion_id))
            .one(&self.db)
            .await?
            .ok_or_else(|| ContentError::not_found("gallery image", image_id))
    }

    pub async fn add_gallery_image(
        &self,
        excursion_id: i32,
        form: GalleryImageForm,
    ) -> Result<excursion_image::Model> {
        self.get_excursion(excursion_id).await?;
        form.validate()?;
        if !form.image.is_replace() {
            return Err(UploadError::Required {
                model: <ExcursionImage as ImageFields>::MODEL,
                field: "image",
            }
            .into());
        }

        let mut pipeline = self.pipeline();
        pipeline.stage::<ExcursionImage>("image", form.image)?;
        let images = pipeline.write()?;
        let row = excursion_image::ActiveModel {
            id: NotSet,
            excursion_id: Set(excursion_id),
            caption: Set(form.caption),
            sort_order: Set(sort_order_value(form.sort_order)),
            image: Set(images.value("image").flatten().unwrap_or_default()),
        };
        let model = images.settle(row.insert(&self.db).await)?;
        tracing::info!(excursion_id, id = model.id, image = %model.image, "added gallery image");
        Ok(model)
    }

    pub async fn update_gallery_image(
        &self,
        excursion_id: i32,
        image_id: i32,
        form: GalleryImageForm,
    ) -> Result<excursion_image::Model> {
        let current = self.gallery_image(excursion_id, image_id).await?;
        form.validate()?;
        let mut pipeline = self.pipeline();
        pipeline.stage::<ExcursionImage>("image", form.image)?;
        let images = pipeline.write()?;

        let mut row = current.into_active_model();
        row.caption = Set(form.caption);
        row.sort_order = Set(sort_order_value(form.sort_order));
        set_if_some(&mut row.image, images.value("image").flatten());
        let model = images.settle(row.update(&self.db).await)?;
        tracing::info!(excursion_id, id = model.id, "updated gallery image");
        Ok(model)
    }

    pub async fn delete_gallery_image(&self, excursion_id: i32, image_id: i32) -> Result<()> {
        self.gallery_image(excursion_id, image_id).await?;
        ExcursionImage::delete_by_id(image_id).exec(&self.db).await?;
        tracing::info!(excursion_id, id = image_id, "deleted gallery image");
        Ok(())
    }
}
