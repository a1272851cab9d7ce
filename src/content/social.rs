use super::{ContentError, ContentStore, Result};
use crate::forms::{SocialLinkForm, sort_order_value};
use crate::imaging::ImageBackend;
use crate::models::{SocialLink, social_link};
use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel, NotSet, QueryOrder, Set};

impl<B: ImageBackend> ContentStore<B> {
    /// All social links by `sort_order`, then id, active or not.
    pub async fn list_social_links(&self) -> Result<Vec<social_link::Model>> {
        Ok(SocialLink::find()
            .order_by_asc(social_link::Column::SortOrder)
            .order_by_asc(social_link::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn get_social_link(&self, id: i32) -> Result<social_link::Model> {
        SocialLink::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| ContentError::not_found("social link", id))
    }

    pub async fn create_social_link(&self, form: SocialLinkForm) -> Result<social_link::Model> {
        form.validate()?;
        let row = social_link::ActiveModel {
            id: NotSet,
            url: Set(form.url),
            fa_icon: Set(form.fa_icon),
            title: Set(form.title),
            sort_order: Set(sort_order_value(form.sort_order)),
            is_active: Set(form.is_active),
        };
        let model = row.insert(&self.db).await?;
        tracing::info!(id = model.id, url = %model.url, "created social link");
        Ok(model)
    }

    pub async fn update_social_link(
        &self,
        id: i32,
        form: SocialLinkForm,
    ) -> Result<social_link::Model> {
        let current = self.get_social_link(id).await?;
        form.validate()?;
        let mut row = current.into_active_model();
        row.url = Set(form.url);
        row.fa_icon = Set(form.fa_icon);
        row.title = Set(form.title);
        row.sort_order = Set(sort_order_value(form.sort_order));
        row.is_active = Set(form.is_active);
        Ok(row.update(&self.db).await?)
    }

    /// Inline edit of the list-editable columns.
    pub async fn set_social_listing(
        &self,
        id: i32,
        is_active: bool,
        sort_order: u32,
    ) -> Result<social_link::Model> {
        let current = self.get_social_link(id).await?;
        let form = SocialLinkForm {
            is_active,
            sort_order,
            ..SocialLinkForm::from_model(&current)
        };
        self.update_social_link(id, form).await
    }

    pub async fn delete_social_link(&self, id: i32) -> Result<()> {
        let result = SocialLink::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(ContentError::not_found("social link", id));
        }
        tracing::info!(id, "deleted social link");
        Ok(())
    }
}
