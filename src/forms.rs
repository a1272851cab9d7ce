//! Typed edit forms and their field validation.
//!
//! Each entity has a form struct carrying what an editor submits: text
//! fields plus an [`ImageChange`] per image column. `validate` checks the
//! same constraints the columns imply (required values, maximum lengths,
//! e-mail and URL shape, slug charset). Image payloads are checked later,
//! when the save hook decodes them.

use crate::models::{excursion, excursion_image, faq, review, social_link};
use crate::naming::{SLUG_MAX_LEN, is_valid_slug, slugify};
use crate::uploads::ImageChange;
use std::fmt;
use thiserror::Error;

/// One failed constraint. `field` is `None` for whole-record errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Option<&'static str>,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.field {
            Some(field) => write!(f, "{field}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

fn format_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", format_errors(.errors))]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn field(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            errors: vec![FieldError {
                field: Some(field),
                message: message.into(),
            }],
        }
    }

    pub fn non_field(message: impl Into<String>) -> Self {
        Self {
            errors: vec![FieldError {
                field: None,
                message: message.into(),
            }],
        }
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == Some(field))
    }
}

fn is_valid_email(value: &str) -> bool {
    let Some((local, domain)) = value.rsplit_once('@') else {
        return false;
    };
    !local.is_empty()
        && !local.contains(char::is_whitespace)
        && domain.contains('.')
        && domain.split('.').all(is_domain_label)
}

fn is_domain_label(label: &str) -> bool {
    !label.is_empty() && label.chars().all(|c| c.is_alphanumeric() || c == '-')
}

fn is_valid_url(value: &str) -> bool {
    let lower = value.to_ascii_lowercase();
    let Some(rest) = lower
        .strip_prefix("https://")
        .or_else(|| lower.strip_prefix("http://"))
    else {
        return false;
    };
    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    !host.is_empty() && !value.contains(char::is_whitespace)
}

/// Collects field errors for one form.
#[derive(Default)]
struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    fn error(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: Some(field),
            message: message.into(),
        });
    }

    fn required(&mut self, field: &'static str, value: &str) {
        if value.trim().is_empty() {
            self.error(field, "this field is required");
        }
    }

    fn max_len(&mut self, field: &'static str, value: &str, max: usize) {
        let len = value.chars().count();
        if len > max {
            self.error(field, format!("at most {max} characters (got {len})"));
        }
    }

    fn email(&mut self, field: &'static str, value: &str) {
        if !value.is_empty() && !is_valid_email(value) {
            self.error(field, "enter a valid e-mail address");
        }
    }

    fn url(&mut self, field: &'static str, value: &str) {
        if !value.is_empty() && !is_valid_url(value) {
            self.error(field, "enter a valid http(s) URL");
        }
        self.max_len(field, value, 200);
    }

    fn sort_order(&mut self, value: u32) {
        if i32::try_from(value).is_err() {
            self.error("sort_order", format!("at most {}", i32::MAX));
        }
    }

    fn finish(self) -> Result<(), ValidationError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                errors: self.errors,
            })
        }
    }
}

/// Column value for a validated sort order.
pub(crate) fn sort_order_value(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

// =============================================================================
// Site settings
// =============================================================================

/// Partial settings update: `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct SiteSettingsForm {
    pub logo: ImageChange,
    pub slogan: Option<String>,
    pub copyright_text: Option<String>,
    pub tursab_image: ImageChange,
    pub address: Option<String>,
    pub address_gmap: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub phone_repr: Option<String>,
    pub whatsapp: Option<String>,
    pub whatsapp_repr: Option<String>,
    pub banner_link: Option<String>,
    pub banner_image: ImageChange,
}

impl SiteSettingsForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut v = Validator::default();
        let limits: [(&'static str, &Option<String>, usize); 7] = [
            ("slogan", &self.slogan, 255),
            ("copyright_text", &self.copyright_text, 255),
            ("address", &self.address, 255),
            ("phone", &self.phone, 50),
            ("phone_repr", &self.phone_repr, 50),
            ("whatsapp", &self.whatsapp, 50),
            ("whatsapp_repr", &self.whatsapp_repr, 50),
        ];
        for (field, value, max) in limits {
            if let Some(value) = value {
                v.max_len(field, value, max);
            }
        }
        if let Some(email) = &self.email {
            v.email("email", email);
            v.max_len("email", email, 254);
        }
        if let Some(link) = &self.banner_link {
            v.url("banner_link", link);
        }
        v.finish()
    }
}

// =============================================================================
// Excursions and gallery images
// =============================================================================

#[derive(Debug, Clone)]
pub struct ExcursionForm {
    pub title: String,
    /// Derived from the title when `None`.
    pub slug: Option<String>,
    pub short_description: String,
    pub content_md: String,
    pub is_published: bool,
    pub cover: ImageChange,
    pub cover_head: ImageChange,
}

impl ExcursionForm {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            slug: None,
            short_description: String::new(),
            content_md: String::new(),
            is_published: true,
            cover: ImageChange::Keep,
            cover_head: ImageChange::Keep,
        }
    }

    /// Pre-filled from a stored excursion, images unchanged.
    pub fn from_model(model: &excursion::Model) -> Self {
        Self {
            title: model.title.clone(),
            slug: Some(model.slug.clone()),
            short_description: model.short_description.clone(),
            content_md: model.content_md.clone(),
            is_published: model.is_published,
            cover: ImageChange::Keep,
            cover_head: ImageChange::Keep,
        }
    }

    /// The explicit slug, or one generated from the title.
    pub fn resolved_slug(&self) -> String {
        match &self.slug {
            Some(slug) => slug.trim().to_string(),
            None => slugify(&self.title, SLUG_MAX_LEN),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut v = Validator::default();
        v.required("title", &self.title);
        v.max_len("title", &self.title, 200);

        let slug = self.resolved_slug();
        if slug.is_empty() {
            v.error("slug", "cannot be derived from the title; enter one");
        } else if !is_valid_slug(&slug) {
            v.error("slug", "only letters, digits, hyphens and underscores");
        }
        v.max_len("slug", &slug, SLUG_MAX_LEN);
        v.finish()
    }
}

#[derive(Debug, Clone, Default)]
pub struct GalleryImageForm {
    pub caption: String,
    pub sort_order: u32,
    pub image: ImageChange,
}

impl GalleryImageForm {
    pub fn from_model(model: &excursion_image::Model) -> Self {
        Self {
            caption: model.caption.clone(),
            sort_order: u32::try_from(model.sort_order).unwrap_or_default(),
            image: ImageChange::Keep,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut v = Validator::default();
        v.max_len("caption", &self.caption, 200);
        v.sort_order(self.sort_order);
        v.finish()
    }
}

// =============================================================================
// Reviews, FAQ, social links
// =============================================================================

#[derive(Debug, Clone)]
pub struct ReviewForm {
    pub full_name: String,
    pub text: String,
    pub is_published: bool,
    pub photo: ImageChange,
}

impl ReviewForm {
    pub fn new(full_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            text: text.into(),
            is_published: true,
            photo: ImageChange::Keep,
        }
    }

    pub fn from_model(model: &review::Model) -> Self {
        Self {
            full_name: model.full_name.clone(),
            text: model.text.clone(),
            is_published: model.is_published,
            photo: ImageChange::Keep,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut v = Validator::default();
        v.required("full_name", &self.full_name);
        v.max_len("full_name", &self.full_name, 150);
        v.required("text", &self.text);
        v.finish()
    }
}

#[derive(Debug, Clone)]
pub struct FaqForm {
    pub question: String,
    pub answer: String,
    pub sort_order: u32,
    pub is_published: bool,
}

impl FaqForm {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            sort_order: 0,
            is_published: true,
        }
    }

    pub fn from_model(model: &faq::Model) -> Self {
        Self {
            question: model.question.clone(),
            answer: model.answer.clone(),
            sort_order: u32::try_from(model.sort_order).unwrap_or_default(),
            is_published: model.is_published,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut v = Validator::default();
        v.required("question", &self.question);
        v.max_len("question", &self.question, 255);
        v.required("answer", &self.answer);
        v.sort_order(self.sort_order);
        v.finish()
    }
}

#[derive(Debug, Clone)]
pub struct SocialLinkForm {
    pub url: String,
    pub fa_icon: String,
    pub title: String,
    pub sort_order: u32,
    pub is_active: bool,
}

impl SocialLinkForm {
    pub fn new(url: impl Into<String>, fa_icon: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            fa_icon: fa_icon.into(),
            title: String::new(),
            sort_order: 0,
            is_active: true,
        }
    }

    pub fn from_model(model: &social_link::Model) -> Self {
        Self {
            url: model.url.clone(),
            fa_icon: model.fa_icon.clone(),
            title: model.title.clone(),
            sort_order: u32::try_from(model.sort_order).unwrap_or_default(),
            is_active: model.is_active,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut v = Validator::default();
        v.required("url", &self.url);
        v.url("url", &self.url);
        v.required("fa_icon", &self.fa_icon);
        v.max_len("fa_icon", &self.fa_icon, 64);
        v.max_len("title", &self.title, 50);
        v.sort_order(self.sort_order);
        v.finish()
    }
}
