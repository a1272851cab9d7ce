//! Read-only data for page templates.
//!
//! These helpers hand templates whole collections in their default order.
//! Nothing is filtered: unpublished excursions, reviews and FAQ entries and
//! inactive social links are all returned, and templates decide what to show.

use crate::content::{ContentStore, Result};
use crate::imaging::ImageBackend;
use crate::models::{excursion, excursion_image, faq, review, site_settings, social_link};
use pulldown_cmark::{Options, Parser, html};

/// The settings singleton, created on first access.
pub async fn site_settings<B: ImageBackend>(
    store: &ContentStore<B>,
) -> Result<site_settings::Model> {
    store.load_settings().await
}

/// Every excursion, newest first.
pub async fn excursion_list<B: ImageBackend>(
    store: &ContentStore<B>,
) -> Result<Vec<excursion::Model>> {
    store.list_excursions().await
}

/// Every review, newest first.
pub async fn review_list<B: ImageBackend>(store: &ContentStore<B>) -> Result<Vec<review::Model>> {
    store.list_reviews().await
}

/// Every FAQ entry by `sort_order`, then id.
pub async fn faq_list<B: ImageBackend>(store: &ContentStore<B>) -> Result<Vec<faq::Model>> {
    store.list_faqs().await
}

/// Every social link by `sort_order`, then id.
pub async fn social_link_list<B: ImageBackend>(
    store: &ContentStore<B>,
) -> Result<Vec<social_link::Model>> {
    store.list_social_links().await
}

/// Gallery images of one excursion in display order.
pub async fn excursion_gallery<B: ImageBackend>(
    store: &ContentStore<B>,
    excursion: &excursion::Model,
) -> Result<Vec<excursion_image::Model>> {
    store.gallery(excursion.id).await
}

/// Excursion detail lookup by URL slug.
pub async fn excursion_by_slug<B: ImageBackend>(
    store: &ContentStore<B>,
    slug: &str,
) -> Result<excursion::Model> {
    store.excursion_by_slug(slug).await
}

/// Render an excursion body from markdown to HTML.
pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    let parser = Parser::new_ext(markdown, options);
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

/// Template indexing filter.
///
/// Always returns an empty string: the lookup result is discarded. Templates
/// that rely on this helper render nothing at the call site.
pub fn index<T>(items: &[T], i: &str) -> String {
    let _ = i.trim().parse::<usize>().ok().and_then(|i| items.get(i));
    String::new()
}
