use super::{ContentError, ContentStore, Result};
use crate::forms::{FaqForm, sort_order_value};
use crate::imaging::ImageBackend;
use crate::models::{Faq, faq};
use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel, NotSet, QueryOrder, Set};

impl<B: ImageBackend> ContentStore<B> {
    /// All FAQ entries by `sort_order`, then id.
    pub async fn list_faqs(&self) -> Result<Vec<faq::Model>> {
        Ok(Faq::find()
            .order_by_asc(faq::Column::SortOrder)
            .order_by_asc(faq::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn get_faq(&self, id: i32) -> Result<faq::Model> {
        Faq::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| ContentError::not_found("faq", id))
    }

    pub async fn create_faq(&self, form: FaqForm) -> Result<faq::Model> {
        form.validate()?;
        let row = faq::ActiveModel {
            id: NotSet,
            question: Set(form.question),
            answer: Set(form.answer),
            sort_order: Set(sort_order_value(form.sort_order)),
            is_published: Set(form.is_published),
        };
        let model = row.insert(&self.db).await?;
        tracing::info!(id = model.id, "created faq");
        Ok(model)
    }

    pub async fn update_faq(&self, id: i32, form: FaqForm) -> Result<faq::Model> {
        let current = self.get_faq(id).await?;
        form.validate()?;
        let mut row = current.into_active_model();
        row.question = Set(form.question);
        row.answer = Set(form.answer);
        row.sort_order = Set(sort_order_value(form.sort_order));
        row.is_published = Set(form.is_published);
        Ok(row.update(&self.db).await?)
    }

    /// Inline edit of the list-editable columns.
    pub async fn set_faq_listing(
        &self,
        id: i32,
        is_published: bool,
        sort_order: u32,
    ) -> Result<faq::Model> {
        let current = self.get_faq(id).await?;
        let form = FaqForm {
            is_published,
            sort_order,
            ..FaqForm::from_model(&current)
        };
        self.update_faq(id, form).await
    }

    pub async fn delete_faq(&self, id: i32) -> Result<()> {
        let result = Faq::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(ContentError::not_found("faq", id));
        }
        tracing::info!(id, "deleted faq");
        Ok(())
    }
}
