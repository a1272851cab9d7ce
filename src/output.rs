//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Every record is shown by what it *is* (title, name, question) with its id
//! and storage details as indented context lines:
//!
//! ```text
//! 001 Dalyan Boat Trip  #4
//!     Slug: dalyan-boat-trip
//!     Cover: /media/main/excursion/cover/dalyan.jpg
//! 002 Kekova [draft]  #3
//! ```
//!
//! Lists use a 3-digit positional index in display order, so the printed
//! order matches what page templates receive.
//!
//! # Architecture
//!
//! Each view has a `format_*` function (returns `Vec<String>`) for
//! testability, and [`print_lines`] writes any of them to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::admin::changelist::{Cell, ChangeList, column_label};
use crate::admin::options::ModelAdmin;
use crate::admin::preview::EMPTY_PREVIEW;
use crate::models::{excursion, excursion_image, faq, review, site_settings, social_link};
use crate::storage::MediaStorage;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Entity header: index, title, optional marker and id.
///
/// ```text
/// 001 Kekova  #3
/// 002 Draft tour [draft]  #7
/// ```
fn entity_header(index: usize, title: &str, visible: bool, id: i32) -> String {
    let marker = if visible { "" } else { " [draft]" };
    format!("{} {}{}  #{}", format_index(index), title, marker, id)
}

/// Indented `Label: value` line, skipped for empty values.
fn context_line(lines: &mut Vec<String>, label: &str, value: &str) {
    if !value.is_empty() {
        lines.push(format!("{}{}: {}", indent(1), label, value));
    }
}

fn image_line(lines: &mut Vec<String>, storage: &MediaStorage, label: &str, name: Option<&str>) {
    if let Some(name) = name.filter(|n| !n.is_empty()) {
        context_line(lines, label, &storage.url(name));
    }
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    let single_line = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if single_line.chars().count() <= max {
        single_line
    } else {
        let cut: String = single_line.chars().take(max).collect();
        format!("{cut}...")
    }
}

// ============================================================================
// Content views
// ============================================================================

pub fn format_settings(settings: &site_settings::Model, storage: &MediaStorage) -> Vec<String> {
    let mut lines = vec![settings.to_string()];
    image_line(&mut lines, storage, "Logo", settings.logo.as_deref());
    context_line(&mut lines, "Slogan", &settings.slogan);
    context_line(&mut lines, "Copyright", &settings.copyright_text);
    image_line(
        &mut lines,
        storage,
        "TURSAB image",
        settings.tursab_image.as_deref(),
    );
    context_line(&mut lines, "Address", &settings.address);
    context_line(&mut lines, "Map", &truncate_desc(&settings.address_gmap, 60));
    context_line(&mut lines, "Email", &settings.email);
    context_line(&mut lines, "Phone", &settings.phone);
    context_line(&mut lines, "Phone (shown)", &settings.phone_repr);
    context_line(&mut lines, "WhatsApp", &settings.whatsapp);
    context_line(&mut lines, "WhatsApp (shown)", &settings.whatsapp_repr);
    context_line(&mut lines, "Banner link", &settings.banner_link);
    image_line(
        &mut lines,
        storage,
        "Banner",
        settings.banner_image.as_deref(),
    );
    lines
}

pub fn format_excursion_list(excursions: &[excursion::Model]) -> Vec<String> {
    if excursions.is_empty() {
        return vec!["No excursions".to_string()];
    }
    let mut lines = Vec::new();
    for (i, exc) in excursions.iter().enumerate() {
        lines.push(entity_header(i + 1, &exc.title, exc.is_published, exc.id));
        context_line(&mut lines, "Slug", &exc.slug);
        context_line(
            &mut lines,
            "Description",
            &truncate_desc(&exc.short_description, 40),
        );
    }
    lines
}

pub fn format_excursion_detail(
    exc: &excursion::Model,
    gallery: &[excursion_image::Model],
    storage: &MediaStorage,
) -> Vec<String> {
    let mut lines = vec![entity_header(1, &exc.title, exc.is_published, exc.id)];
    context_line(&mut lines, "Slug", &exc.slug);
    context_line(&mut lines, "URL", &exc.absolute_url());
    context_line(
        &mut lines,
        "Created",
        &exc.created_at.format("%Y-%m-%d %H:%M").to_string(),
    );
    context_line(
        &mut lines,
        "Updated",
        &exc.updated_at.format("%Y-%m-%d %H:%M").to_string(),
    );
    context_line(&mut lines, "Description", &exc.short_description);
    image_line(&mut lines, storage, "Cover", exc.cover.as_deref());
    image_line(&mut lines, storage, "Header cover", exc.cover_head.as_deref());
    if !gallery.is_empty() {
        lines.push(format!("{}Gallery", indent(1)));
        for (i, img) in gallery.iter().enumerate() {
            let caption = if img.caption.is_empty() {
                format!("({})", img.image)
            } else {
                img.caption.clone()
            };
            lines.push(format!(
                "{}{} {}  #{}",
                indent(2),
                format_index(i + 1),
                caption,
                img.id
            ));
            lines.push(format!("{}{}", indent(3), storage.url(&img.image)));
        }
    }
    lines
}

pub fn format_review_list(reviews: &[review::Model]) -> Vec<String> {
    if reviews.is_empty() {
        return vec!["No reviews".to_string()];
    }
    let mut lines = Vec::new();
    for (i, r) in reviews.iter().enumerate() {
        lines.push(entity_header(i + 1, &r.full_name, r.is_published, r.id));
        context_line(&mut lines, "Text", &truncate_desc(&r.text, 60));
        if let Some(photo) = &r.photo {
            context_line(&mut lines, "Photo", photo);
        }
    }
    lines
}

pub fn format_faq_list(faqs: &[faq::Model]) -> Vec<String> {
    if faqs.is_empty() {
        return vec!["No FAQ entries".to_string()];
    }
    let mut lines = Vec::new();
    for (i, f) in faqs.iter().enumerate() {
        lines.push(entity_header(i + 1, &f.question, f.is_published, f.id));
        context_line(&mut lines, "Answer", &truncate_desc(&f.answer, 60));
        context_line(&mut lines, "Sort order", &f.sort_order.to_string());
    }
    lines
}

pub fn format_social_list(links: &[social_link::Model]) -> Vec<String> {
    if links.is_empty() {
        return vec!["No social links".to_string()];
    }
    let mut lines = Vec::new();
    for (i, link) in links.iter().enumerate() {
        lines.push(entity_header(i + 1, &link.to_string(), link.is_active, link.id));
        context_line(&mut lines, "URL", &link.url);
        context_line(&mut lines, "Icon", &link.fa_icon);
        context_line(&mut lines, "Sort order", &link.sort_order.to_string());
    }
    lines
}

// ============================================================================
// Admin views
// ============================================================================

fn join(items: &[&str]) -> String {
    items.join(", ")
}

/// Describe a model admin: form layout first, then list behaviour.
pub fn format_model_admin(admin: &ModelAdmin) -> Vec<String> {
    let mut lines = vec![format!("{} ({})", admin.verbose_name, admin.model)];
    lines.push(format!("{}Form", indent(1)));
    for fieldset in admin.fieldsets {
        lines.push(format!(
            "{}{}: {}",
            indent(2),
            fieldset.name.unwrap_or("(main)"),
            join(fieldset.fields)
        ));
    }
    let labelled: [(&str, &[&str]); 5] = [
        ("Read-only", admin.readonly_fields),
        ("List display", admin.list_display),
        ("List editable", admin.list_editable),
        ("Search", admin.search_fields),
        ("Ordering", admin.ordering),
    ];
    for (label, values) in labelled {
        if !values.is_empty() {
            lines.push(format!("{}{}: {}", indent(1), label, join(values)));
        }
    }
    if !admin.list_filter.is_empty() {
        let filters: Vec<&str> = admin.list_filter.iter().map(|f| f.field()).collect();
        lines.push(format!("{}Filters: {}", indent(1), join(&filters)));
    }
    for (target, sources) in admin.prepopulated_fields {
        lines.push(format!(
            "{}Prepopulated: {} from {}",
            indent(1),
            target,
            join(sources)
        ));
    }
    for inline in admin.inlines {
        lines.push(format!(
            "{}Inline {}: {} ({} extra)",
            indent(1),
            inline.model,
            join(inline.fields),
            inline.extra
        ));
    }
    lines
}

fn cell_text(cell: &Cell) -> String {
    match cell {
        Cell::Text(text) => truncate_desc(text, 40),
        Cell::Flag(true) => "yes".to_string(),
        Cell::Flag(false) => "no".to_string(),
        Cell::Number(n) => n.to_string(),
        Cell::DateTime(at) => at.format("%Y-%m-%d %H:%M").to_string(),
        Cell::Image(Some(name)) => name.clone(),
        Cell::Image(None) => EMPTY_PREVIEW.to_string(),
    }
}

/// Changelist as aligned plain-text columns.
pub fn format_changelist(list: &ChangeList) -> Vec<String> {
    let mut header = vec!["id".to_string()];
    header.extend(list.columns.iter().map(|c| column_label(list, c)));

    let body: Vec<Vec<String>> = list
        .rows
        .iter()
        .map(|row| {
            let mut cells = vec![row.id.to_string()];
            cells.extend(row.cells.iter().map(cell_text));
            cells
        })
        .collect();

    let widths: Vec<usize> = (0..header.len())
        .map(|col| {
            std::iter::once(&header)
                .chain(body.iter())
                .map(|r| r[col].chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let render = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<width$}", c, width = *w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![list.title.to_string(), render(&header)];
    lines.extend(body.iter().map(|r| render(r)));
    lines.push(format!("{} row(s)", list.rows.len()));
    lines
}

/// Print formatted lines to stdout.
pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
