//! Declarative per-entity admin configuration.
//!
//! Each entity gets one [`ModelAdmin`] constant describing how its edit form
//! is grouped, which columns its changelist shows, how that list can be
//! searched, filtered and ordered, and which related rows are edited inline.
//! Field names are the column names of the entity, plus a few computed
//! read-only names (`__str__` and the image preview fields, see
//! [`super::preview`]).

use crate::content::{ContentStore, Result};
use crate::imaging::ImageBackend;

/// A titled group of form fields. `name: None` is the untitled first group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fieldset {
    pub name: Option<&'static str>,
    pub fields: &'static [&'static str],
}

/// A changelist sidebar filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFilter {
    /// Yes/no filter on a boolean column.
    Flag(&'static str),
    /// "Any date / today / past 7 days / this month / this year".
    Date(&'static str),
}

impl ListFilter {
    pub fn field(&self) -> &'static str {
        match self {
            ListFilter::Flag(field) | ListFilter::Date(field) => field,
        }
    }
}

/// Child rows edited on the parent's form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InlineAdmin {
    pub model: &'static str,
    pub fields: &'static [&'static str],
    pub readonly_fields: &'static [&'static str],
    /// Blank rows offered for new children.
    pub extra: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelAdmin {
    pub model: &'static str,
    pub verbose_name: &'static str,
    pub verbose_name_plural: &'static str,
    pub fieldsets: &'static [Fieldset],
    pub readonly_fields: &'static [&'static str],
    pub list_display: &'static [&'static str],
    pub list_filter: &'static [ListFilter],
    pub list_editable: &'static [&'static str],
    pub search_fields: &'static [&'static str],
    /// Column names, `-` prefix for descending.
    pub ordering: &'static [&'static str],
    /// `(target, sources)`: target is pre-filled from the sources.
    pub prepopulated_fields: &'static [(&'static str, &'static [&'static str])],
    pub inlines: &'static [InlineAdmin],
}

impl ModelAdmin {
    pub fn flag_filter(&self) -> Option<&'static str> {
        self.list_filter.iter().find_map(|f| match f {
            ListFilter::Flag(field) => Some(*field),
            ListFilter::Date(_) => None,
        })
    }

    pub fn date_filter(&self) -> Option<&'static str> {
        self.list_filter.iter().find_map(|f| match f {
            ListFilter::Date(field) => Some(*field),
            ListFilter::Flag(_) => None,
        })
    }

    /// Every field that appears on the edit form, in form order.
    pub fn form_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fieldsets.iter().flat_map(|fs| fs.fields.iter().copied())
    }
}

pub const SITE_SETTINGS: ModelAdmin = ModelAdmin {
    model: "sitesettings",
    verbose_name: "Site settings",
    verbose_name_plural: "Site settings",
    fieldsets: &[
        Fieldset {
            name: Some("Branding"),
            fields: &[
                "logo",
                "logo_preview",
                "slogan",
                "copyright_text",
                "tursab_image",
                "tursab_preview",
            ],
        },
        Fieldset {
            name: Some("Contacts"),
            fields: &[
                "address",
                "address_gmap",
                "email",
                "phone",
                "phone_repr",
                "whatsapp",
                "whatsapp_repr",
            ],
        },
        Fieldset {
            name: Some("Banner"),
            fields: &["banner_link", "banner_image"],
        },
    ],
    readonly_fields: &["logo_preview", "tursab_preview"],
    list_display: &["__str__", "email", "phone", "whatsapp"],
    list_filter: &[],
    list_editable: &[],
    search_fields: &[],
    ordering: &[],
    prepopulated_fields: &[],
    inlines: &[],
};

pub const EXCURSION: ModelAdmin = ModelAdmin {
    model: "excursion",
    verbose_name: "Excursion",
    verbose_name_plural: "Excursions",
    fieldsets: &[
        Fieldset {
            name: None,
            fields: &["title", "slug", "is_published"],
        },
        Fieldset {
            name: Some("Content"),
            fields: &["short_description", "content_md"],
        },
        Fieldset {
            name: Some("Images"),
            fields: &["cover", "cover_thumb", "cover_head", "cover_head_thumb"],
        },
    ],
    readonly_fields: &["cover_thumb", "cover_head_thumb"],
    list_display: &[
        "title",
        "is_published",
        "created_at",
        "updated_at",
        "cover_thumb",
    ],
    list_filter: &[
        ListFilter::Flag("is_published"),
        ListFilter::Date("created_at"),
    ],
    list_editable: &[],
    search_fields: &["title", "short_description", "content_md"],
    ordering: &["-created_at"],
    prepopulated_fields: &[("slug", &["title"])],
    inlines: &[InlineAdmin {
        model: "excursionimage",
        fields: &["image", "caption", "sort_order", "thumb"],
        readonly_fields: &["thumb"],
        extra: 1,
    }],
};

pub const REVIEW: ModelAdmin = ModelAdmin {
    model: "review",
    verbose_name: "Review",
    verbose_name_plural: "Reviews",
    fieldsets: &[Fieldset {
        name: None,
        fields: &["full_name", "text", "is_published", "photo", "photo_thumb"],
    }],
    readonly_fields: &["photo_thumb"],
    list_display: &["full_name", "is_published", "created_at", "photo_thumb"],
    list_filter: &[
        ListFilter::Flag("is_published"),
        ListFilter::Date("created_at"),
    ],
    list_editable: &[],
    search_fields: &["full_name", "text"],
    ordering: &["-created_at"],
    prepopulated_fields: &[],
    inlines: &[],
};

pub const FAQ: ModelAdmin = ModelAdmin {
    model: "faq",
    verbose_name: "FAQ",
    verbose_name_plural: "FAQ",
    fieldsets: &[Fieldset {
        name: None,
        fields: &["question", "answer", "sort_order", "is_published"],
    }],
    readonly_fields: &[],
    list_display: &["question", "is_published", "sort_order"],
    list_filter: &[],
    list_editable: &["is_published", "sort_order"],
    search_fields: &["question", "answer"],
    ordering: &["sort_order", "id"],
    prepopulated_fields: &[],
    inlines: &[],
};

pub const SOCIAL_LINK: ModelAdmin = ModelAdmin {
    model: "sociallink",
    verbose_name: "Social link",
    verbose_name_plural: "Social links",
    fieldsets: &[Fieldset {
        name: None,
        fields: &["url", "fa_icon", "title", "sort_order", "is_active"],
    }],
    readonly_fields: &[],
    list_display: &["title", "url", "fa_icon", "is_active", "sort_order"],
    list_filter: &[],
    list_editable: &["is_active", "sort_order"],
    search_fields: &["title", "url", "fa_icon"],
    ordering: &["sort_order", "id"],
    prepopulated_fields: &[],
    inlines: &[],
};

/// Every registered admin, in menu order.
pub const REGISTRY: &[ModelAdmin] = &[SITE_SETTINGS, EXCURSION, REVIEW, FAQ, SOCIAL_LINK];

/// Look up an admin by model name (case-insensitive).
pub fn find(model: &str) -> Option<&'static ModelAdmin> {
    REGISTRY
        .iter()
        .find(|admin| admin.model.eq_ignore_ascii_case(model))
}

/// Whether a new record may be added. Site settings allow one record only.
pub async fn has_add_permission<B: ImageBackend>(
    admin: &ModelAdmin,
    store: &ContentStore<B>,
) -> Result<bool> {
    if admin.model == SITE_SETTINGS.model {
        return Ok(!store.settings_exist().await?);
    }
    Ok(true)
}
