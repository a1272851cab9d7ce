use super::{ContentError, ContentStore, Result, set_if_some};
use crate::forms::ReviewForm;
use crate::imaging::ImageBackend;
use crate::models::{Review, review};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel, NotSet, QueryOrder, Set};

impl<B: ImageBackend> ContentStore<B> {
    /// All reviews, newest first.
    pub async fn list_reviews(&self) -> Result<Vec<review::Model>> {
        Ok(Review::find()
            .order_by_desc(review::Column::CreatedAt)
            .order_by_desc(review::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn get_review(&self, id: i32) -> Result<review::Model> {
        Review::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| ContentError::not_found("review", id))
    }

    pub async fn create_review(&self, form: ReviewForm) -> Result<review::Model> {
        form.validate()?;
        let mut pipeline = self.pipeline();
        pipeline.stage::<Review>("photo", form.photo)?;
        let images = pipeline.write()?;
        let row = review::ActiveModel {
            id: NotSet,
            photo: Set(images.value("photo").flatten()),
            full_name: Set(form.full_name),
            text: Set(form.text),
            is_published: Set(form.is_published),
            created_at: Set(Utc::now()),
        };
        let model = images.settle(row.insert(&self.db).await)?;
        tracing::info!(id = model.id, "created review");
        Ok(model)
    }

    pub async fn update_review(&self, id: i32, form: ReviewForm) -> Result<review::Model> {
        let current = self.get_review(id).await?;
        form.validate()?;
        let mut pipeline = self.pipeline();
        pipeline.stage::<Review>("photo", form.photo)?;
        let images = pipeline.write()?;

        let mut row = current.into_active_model();
        row.full_name = Set(form.full_name);
        row.text = Set(form.text);
        row.is_published = Set(form.is_published);
        set_if_some(&mut row.photo, images.value("photo"));
        Ok(images.settle(row.update(&self.db).await)?)
    }

    pub async fn delete_review(&self, id: i32) -> Result<()> {
        let result = Review::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(ContentError::not_found("review", id));
        }
        tracing::info!(id, "deleted review");
        Ok(())
    }
}
