//! Admin changelists: searchable, filterable record tables.
//!
//! A changelist query is built from the entity's [`ModelAdmin`]:
//!
//! - search splits the term on whitespace; every word must match
//!   (case-insensitive substring) at least one of `search_fields`,
//! - the flag filter applies to the admin's boolean [`ListFilter::Flag`]
//!   column, the date filter to its [`ListFilter::Date`] column,
//! - rows are sorted by `ordering`, falling back to newest id first.
//!
//! Row cells follow `list_display`, with computed columns (`__str__`, image
//! previews) resolved per entity.

use super::options::{self, ModelAdmin};
use super::preview::{image_preview, preview_source};
use crate::content::{ContentError, ContentStore, Result};
use crate::forms::ValidationError;
use crate::imaging::ImageBackend;
use crate::models::{
    Excursion, Faq, Review, SiteSettings, SocialLink, excursion, faq, review, site_settings,
    social_link,
};
use crate::storage::MediaStorage;
use chrono::{DateTime, Datelike, Duration, NaiveTime, TimeZone, Utc};
use maud::{Markup, html};
use sea_orm::sea_query::Order;
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Select};
use serde::Serialize;
use std::str::FromStr;

/// Created-at date filter choices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateFilter {
    #[default]
    Any,
    Today,
    PastWeek,
    ThisMonth,
    ThisYear,
}

impl DateFilter {
    /// Inclusive lower bound for the filter, relative to `now`.
    pub fn since(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let today = now.date_naive();
        let start_of =
            |date: chrono::NaiveDate| Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN));
        match self {
            DateFilter::Any => None,
            DateFilter::Today => Some(start_of(today)),
            DateFilter::PastWeek => Some(start_of(today - Duration::days(7))),
            DateFilter::ThisMonth => today.with_day(1).map(start_of),
            DateFilter::ThisYear => today.with_ordinal(1).map(start_of),
        }
    }
}

impl FromStr for DateFilter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "any" => Ok(DateFilter::Any),
            "today" => Ok(DateFilter::Today),
            "week" | "past-7-days" => Ok(DateFilter::PastWeek),
            "month" => Ok(DateFilter::ThisMonth),
            "year" => Ok(DateFilter::ThisYear),
            other => Err(format!(
                "unknown date filter `{other}` (expected any, today, week, month or year)"
            )),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ChangeListQuery {
    pub search: Option<String>,
    pub flag: Option<bool>,
    pub created: DateFilter,
}

/// One rendered column value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Flag(bool),
    Number(i64),
    DateTime(DateTime<Utc>),
    /// Storage name of an image, if any.
    Image(Option<String>),
}

#[derive(Debug, Clone, Serialize)]
pub struct Row {
    pub id: i32,
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChangeList {
    pub model: &'static str,
    pub title: &'static str,
    pub columns: Vec<&'static str>,
    pub rows: Vec<Row>,
}

/// Column values for changelist rows.
pub trait ListColumns {
    fn row_id(&self) -> i32;

    /// Value of one `list_display` entry. `None` for unknown names.
    fn cell(&self, field: &str) -> Option<Cell>;
}

fn image_cell(name: &Option<String>) -> Cell {
    Cell::Image(name.clone().filter(|n| !n.is_empty()))
}

impl ListColumns for site_settings::Model {
    fn row_id(&self) -> i32 {
        self.id
    }

    fn cell(&self, field: &str) -> Option<Cell> {
        Some(match field {
            "__str__" => Cell::Text(self.to_string()),
            "email" => Cell::Text(self.email.clone()),
            "phone" => Cell::Text(self.phone.clone()),
            "whatsapp" => Cell::Text(self.whatsapp.clone()),
            _ => match preview_source(field)? {
                "logo" => image_cell(&self.logo),
                "tursab_image" => image_cell(&self.tursab_image),
                _ => return None,
            },
        })
    }
}

impl ListColumns for excursion::Model {
    fn row_id(&self) -> i32 {
        self.id
    }

    fn cell(&self, field: &str) -> Option<Cell> {
        Some(match field {
            "__str__" | "title" => Cell::Text(self.title.clone()),
            "slug" => Cell::Text(self.slug.clone()),
            "is_published" => Cell::Flag(self.is_published),
            "created_at" => Cell::DateTime(self.created_at),
            "updated_at" => Cell::DateTime(self.updated_at),
            "cover_thumb" => image_cell(&self.cover),
            "cover_head_thumb" => image_cell(&self.cover_head),
            _ => return None,
        })
    }
}

impl ListColumns for review::Model {
    fn row_id(&self) -> i32 {
        self.id
    }

    fn cell(&self, field: &str) -> Option<Cell> {
        Some(match field {
            "__str__" | "full_name" => Cell::Text(self.full_name.clone()),
            "text" => Cell::Text(self.text.clone()),
            "is_published" => Cell::Flag(self.is_published),
            "created_at" => Cell::DateTime(self.created_at),
            "photo_thumb" => image_cell(&self.photo),
            _ => return None,
        })
    }
}

impl ListColumns for faq::Model {
    fn row_id(&self) -> i32 {
        self.id
    }

    fn cell(&self, field: &str) -> Option<Cell> {
        Some(match field {
            "__str__" | "question" => Cell::Text(self.question.clone()),
            "answer" => Cell::Text(self.answer.clone()),
            "is_published" => Cell::Flag(self.is_published),
            "sort_order" => Cell::Number(self.sort_order.into()),
            _ => return None,
        })
    }
}

impl ListColumns for social_link::Model {
    fn row_id(&self) -> i32 {
        self.id
    }

    fn cell(&self, field: &str) -> Option<Cell> {
        Some(match field {
            "__str__" => Cell::Text(self.to_string()),
            "title" => Cell::Text(self.title.clone()),
            "url" => Cell::Text(self.url.clone()),
            "fa_icon" => Cell::Text(self.fa_icon.clone()),
            "is_active" => Cell::Flag(self.is_active),
            "sort_order" => Cell::Number(self.sort_order.into()),
            _ => return None,
        })
    }
}

fn column<E>(name: &str) -> Result<E::Column>
where
    E: EntityTrait,
    E::Column: FromStr,
{
    E::Column::from_str(name).map_err(|_| {
        ContentError::from(ValidationError::field(
            "column",
            format!("unknown column `{name}`"),
        ))
    })
}

/// Every whitespace-separated word must match one of `fields`.
fn search_condition<E>(fields: &[&str], search: &str) -> Result<Condition>
where
    E: EntityTrait,
    E::Column: FromStr,
{
    let mut all = Condition::all();
    for word in search.split_whitespace() {
        let mut any = Condition::any();
        for field in fields {
            any = any.add(column::<E>(field)?.contains(word));
        }
        all = all.add(any);
    }
    Ok(all)
}

fn build_select<E>(
    admin: &ModelAdmin,
    query: &ChangeListQuery,
    now: DateTime<Utc>,
) -> Result<Select<E>>
where
    E: EntityTrait,
    E::Column: FromStr,
{
    let mut select = E::find();

    if let Some(search) = query.search.as_deref().filter(|s| !s.trim().is_empty()) {
        if admin.search_fields.is_empty() {
            return Err(ValidationError::field("search", "this list is not searchable").into());
        }
        select = select.filter(search_condition::<E>(admin.search_fields, search)?);
    }

    if let Some(flag) = query.flag {
        let field = admin
            .flag_filter()
            .ok_or_else(|| ValidationError::field("flag", "this list has no flag filter"))?;
        select = select.filter(column::<E>(field)?.eq(flag));
    }

    if let Some(since) = query.created.since(now) {
        let field = admin
            .date_filter()
            .ok_or_else(|| ValidationError::field("created", "this list has no date filter"))?;
        select = select.filter(column::<E>(field)?.gte(since));
    }

    for entry in admin.ordering {
        let (name, order) = match entry.strip_prefix('-') {
            Some(name) => (name, Order::Desc),
            None => (*entry, Order::Asc),
        };
        select = select.order_by(column::<E>(name)?, order);
    }
    if !admin.ordering.iter().any(|e| e.trim_start_matches('-') == "id") {
        select = select.order_by(column::<E>("id")?, Order::Desc);
    }
    Ok(select)
}

async fn build<E, B>(
    store: &ContentStore<B>,
    admin: &'static ModelAdmin,
    query: &ChangeListQuery,
) -> Result<ChangeList>
where
    E: EntityTrait,
    E::Column: FromStr,
    E::Model: ListColumns + Sync,
    B: ImageBackend,
{
    let models = build_select::<E>(admin, query, Utc::now())?
        .all(store.db())
        .await?;
    let rows = models
        .iter()
        .map(|m| Row {
            id: m.row_id(),
            cells: admin
                .list_display
                .iter()
                .map(|field| m.cell(field).unwrap_or(Cell::Text(String::new())))
                .collect(),
        })
        .collect::<Vec<_>>();
    tracing::debug!(model = admin.model, rows = rows.len(), "built changelist");
    Ok(ChangeList {
        model: admin.model,
        title: admin.verbose_name_plural,
        columns: admin.list_display.to_vec(),
        rows,
    })
}

/// Build the changelist for a registered model.
pub async fn changelist<B: ImageBackend>(
    store: &ContentStore<B>,
    model: &str,
    query: &ChangeListQuery,
) -> Result<ChangeList> {
    let admin = options::find(model).ok_or_else(|| ContentError::not_found("admin", model))?;
    match admin.model {
        "sitesettings" => build::<SiteSettings, B>(store, admin, query).await,
        "excursion" => build::<Excursion, B>(store, admin, query).await,
        "review" => build::<Review, B>(store, admin, query).await,
        "faq" => build::<Faq, B>(store, admin, query).await,
        "sociallink" => build::<SocialLink, B>(store, admin, query).await,
        other => Err(ContentError::not_found("admin", other)),
    }
}

/// Column header text: `__str__` becomes the model name, `snake_case`
/// becomes "Snake case".
pub fn column_label(list: &ChangeList, column: &str) -> String {
    if column == "__str__" {
        return list.title.to_string();
    }
    let words = column.replace('_', " ");
    let mut chars = words.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn render_cell(storage: &MediaStorage, cell: &Cell) -> Markup {
    match cell {
        Cell::Text(text) => html! { (text) },
        Cell::Flag(true) => html! { span.flag-yes { "yes" } },
        Cell::Flag(false) => html! { span.flag-no { "no" } },
        Cell::Number(n) => html! { (n) },
        Cell::DateTime(at) => html! {
            time datetime=(at.to_rfc3339()) { (at.format("%Y-%m-%d %H:%M")) }
        },
        Cell::Image(name) => image_preview(storage, name.as_deref()),
    }
}

/// Render a changelist as an HTML table.
pub fn render_changelist(storage: &MediaStorage, list: &ChangeList) -> Markup {
    html! {
        table.changelist data-model=(list.model) {
            caption { (list.title) }
            thead {
                tr {
                    @for column in &list.columns {
                        th { (column_label(list, column)) }
                    }
                }
            }
            tbody {
                @for row in &list.rows {
                    tr data-id=(row.id) {
                        @for cell in &row.cells {
                            td { (render_cell(storage, cell)) }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::{ExcursionForm, FaqForm, ReviewForm};
    use crate::imaging::Dimensions;
    use crate::test_helpers::mock_store;
    use crate::uploads::{ImageChange, Upload};

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn date_filter_bounds() {
        let now = at(2024, 5, 15, 13);
        assert_eq!(DateFilter::Any.since(now), None);
        assert_eq!(DateFilter::Today.since(now), Some(at(2024, 5, 15, 0)));
        assert_eq!(DateFilter::PastWeek.since(now), Some(at(2024, 5, 8, 0)));
        assert_eq!(DateFilter::ThisMonth.since(now), Some(at(2024, 5, 1, 0)));
        assert_eq!(DateFilter::ThisYear.since(now), Some(at(2024, 1, 1, 0)));
    }

    #[test]
    fn date_filter_parses() {
        assert_eq!("week".parse::<DateFilter>(), Ok(DateFilter::PastWeek));
        assert!("decade".parse::<DateFilter>().is_err());
    }

    #[tokio::test]
    async fn search_is_case_insensitive_across_fields() {
        let (_tmp, store) = mock_store(vec![]).await;
        store
            .create_excursion(ExcursionForm {
                short_description: "Turquoise bays by boat".into(),
                ..ExcursionForm::new("Kekova")
            })
            .await
            .unwrap();
        store
            .create_excursion(ExcursionForm::new("Pamukkale"))
            .await
            .unwrap();

        let query = ChangeListQuery {
            search: Some("TURQUOISE boat".into()),
            ..Default::default()
        };
        let list = changelist(&store, "excursion", &query).await.unwrap();
        assert_eq!(list.rows.len(), 1);
        assert_eq!(list.rows[0].cells[0], Cell::Text("Kekova".into()));
    }

    #[tokio::test]
    async fn flag_filter_and_columns() {
        let (_tmp, store) = mock_store(vec![]).await;
        store
            .create_review(ReviewForm::new("Ayşe", "Great"))
            .await
            .unwrap();
        store
            .create_review(ReviewForm {
                is_published: false,
                ..ReviewForm::new("Mark", "Hot")
            })
            .await
            .unwrap();

        let list = changelist(
            &store,
            "review",
            &ChangeListQuery {
                flag: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(
            list.columns,
            vec!["full_name", "is_published", "created_at", "photo_thumb"]
        );
        assert_eq!(list.rows.len(), 1);
        assert_eq!(list.rows[0].cells[0], Cell::Text("Mark".into()));
        assert_eq!(list.rows[0].cells[1], Cell::Flag(false));
        assert_eq!(list.rows[0].cells[3], Cell::Image(None));
    }

    #[tokio::test]
    async fn date_filter_today_keeps_new_rows() {
        let (_tmp, store) = mock_store(vec![]).await;
        store
            .create_review(ReviewForm::new("Ayşe", "Great"))
            .await
            .unwrap();
        let list = changelist(
            &store,
            "review",
            &ChangeListQuery {
                created: DateFilter::Today,
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(list.rows.len(), 1);
    }

    #[tokio::test]
    async fn filter_without_column_is_rejected() {
        let (_tmp, store) = mock_store(vec![]).await;
        let err = changelist(
            &store,
            "faq",
            &ChangeListQuery {
                flag: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn faq_list_ordered_by_sort_order() {
        let (_tmp, store) = mock_store(vec![]).await;
        store
            .create_faq(FaqForm {
                sort_order: 2,
                ..FaqForm::new("Second?", "Yes")
            })
            .await
            .unwrap();
        store
            .create_faq(FaqForm {
                sort_order: 1,
                ..FaqForm::new("First?", "Yes")
            })
            .await
            .unwrap();

        let list = changelist(&store, "faq", &ChangeListQuery::default())
            .await
            .unwrap();
        let questions: Vec<&Cell> = list.rows.iter().map(|r| &r.cells[0]).collect();
        assert_eq!(
            questions,
            vec![&Cell::Text("First?".into()), &Cell::Text("Second?".into())]
        );
        assert_eq!(list.rows[0].cells[2], Cell::Number(1));
    }

    #[tokio::test]
    async fn settings_row_uses_display_name() {
        let (_tmp, store) = mock_store(vec![]).await;
        store.load_settings().await.unwrap();
        let list = changelist(&store, "sitesettings", &ChangeListQuery::default())
            .await
            .unwrap();
        assert_eq!(list.rows[0].cells[0], Cell::Text("Site settings".into()));
        assert_eq!(column_label(&list, "__str__"), "Site settings");
        assert_eq!(column_label(&list, "phone_repr"), "Phone repr");
    }

    #[tokio::test]
    async fn rendered_table_has_thumbnail() {
        let (_tmp, store) = mock_store(vec![Dimensions {
            width: 10,
            height: 10,
        }])
        .await;
        store
            .create_excursion(ExcursionForm {
                cover: ImageChange::Replace(Upload::new("c.png", b"raw".to_vec())),
                ..ExcursionForm::new("Kekova <Tour>")
            })
            .await
            .unwrap();

        let list = changelist(&store, "excursion", &ChangeListQuery::default())
            .await
            .unwrap();
        let html = render_changelist(store.storage(), &list).into_string();
        let thumb = r#"<img src="/media/main/excursion/cover/c.jpg" style="max-height:60px;">"#;
        assert!(html.contains(thumb));
        assert!(html.contains("Kekova &lt;Tour&gt;"));
        assert!(html.contains("<th>Cover thumb</th>"));
    }

    #[tokio::test]
    async fn unknown_model_is_not_found() {
        let (_tmp, store) = mock_store(vec![]).await;
        assert!(matches!(
            changelist(&store, "users", &ChangeListQuery::default()).await,
            Err(ContentError::NotFound { .. })
        ));
    }
}
