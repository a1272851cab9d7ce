use clap::{Args, Parser, Subcommand};
use excursion_cms::admin::{self, ChangeListQuery, DateFilter};
use excursion_cms::config::{self, AppConfig};
use excursion_cms::content::ContentStore;
use excursion_cms::forms::{
    ExcursionForm, FaqForm, GalleryImageForm, ReviewForm, SiteSettingsForm, SocialLinkForm,
};
use excursion_cms::uploads::{ImageChange, Upload};
use excursion_cms::{logging, output, presentation};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "excursion-cms")]
#[command(about = "Content backend for a tourism excursion site")]
#[command(long_about = "\
Content backend for a tourism excursion site

Manages site settings, excursions with photo galleries, reviews, FAQ entries
and social links in a relational database, with uploaded images compressed
to JPEG before they are stored.

Uploaded files land under the media root as:

  media/
  └── main/
      ├── sitesettings/
      │   ├── logo/                  # Stored as uploaded
      │   ├── tursab_image/          # Stored as uploaded
      │   └── banner_image/          # JPEG, fits 1080x520, quality 75
      ├── excursion/
      │   ├── cover/                 # JPEG, fits 1280x1280, quality 75
      │   └── cover_head/            # JPEG, fits 1280x1280, quality 75
      ├── excursionimage/image/      # JPEG, fits 1280x1280, quality 75
      └── review/photo/              # Stored as uploaded

Run 'excursion-cms gen-config' to generate a documented excursion-cms.toml.")]
#[command(version)]
struct Cli {
    /// Config file (missing file = stock defaults)
    #[arg(long, default_value = config::DEFAULT_CONFIG_FILE, global = true)]
    config: PathBuf,

    /// Print records as JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the database tables and the site settings record
    Init,
    /// Print a stock excursion-cms.toml with all options documented
    GenConfig,
    /// Show or edit the site settings
    #[command(subcommand)]
    Settings(SettingsCommand),
    /// Manage excursions and their galleries
    #[command(subcommand)]
    Excursion(ExcursionCommand),
    /// Manage reviews
    #[command(subcommand)]
    Review(ReviewCommand),
    /// Manage FAQ entries
    #[command(subcommand)]
    Faq(FaqCommand),
    /// Manage social links
    #[command(subcommand)]
    Social(SocialCommand),
    /// Inspect admin configuration and changelists
    #[command(subcommand)]
    Admin(AdminCommand),
}

// ============================================================================
// Subcommands
// ============================================================================

#[derive(Subcommand)]
enum SettingsCommand {
    Show,
    Set(SettingsArgs),
}

#[derive(Args)]
struct SettingsArgs {
    #[arg(long)]
    slogan: Option<String>,
    #[arg(long)]
    copyright_text: Option<String>,
    #[arg(long)]
    address: Option<String>,
    /// Google Maps link or embed code
    #[arg(long)]
    address_gmap: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    phone_repr: Option<String>,
    #[arg(long)]
    whatsapp: Option<String>,
    #[arg(long)]
    whatsapp_repr: Option<String>,
    #[arg(long)]
    banner_link: Option<String>,
    #[arg(long, conflicts_with = "clear_logo")]
    logo: Option<PathBuf>,
    #[arg(long)]
    clear_logo: bool,
    #[arg(long, conflicts_with = "clear_tursab_image")]
    tursab_image: Option<PathBuf>,
    #[arg(long)]
    clear_tursab_image: bool,
    #[arg(long, conflicts_with = "clear_banner_image")]
    banner_image: Option<PathBuf>,
    #[arg(long)]
    clear_banner_image: bool,
}

#[derive(Subcommand)]
enum ExcursionCommand {
    List,
    /// Show one excursion by id or slug, with its gallery
    Show {
        key: String,
        /// Print the body rendered as HTML
        #[arg(long)]
        html: bool,
    },
    Add(ExcursionArgs),
    Edit {
        id: i32,
        #[command(flatten)]
        args: ExcursionArgs,
    },
    Delete {
        id: i32,
    },
    /// Add a gallery image
    AddImage {
        id: i32,
        image: PathBuf,
        #[arg(long, default_value = "")]
        caption: String,
        #[arg(long, default_value_t = 0)]
        sort_order: u32,
    },
    /// Edit a gallery image's caption, order or file
    EditImage {
        id: i32,
        image_id: i32,
        #[arg(long)]
        caption: Option<String>,
        #[arg(long)]
        sort_order: Option<u32>,
        /// Replacement image file
        #[arg(long)]
        image: Option<PathBuf>,
    },
    RemoveImage {
        id: i32,
        image_id: i32,
    },
}

#[derive(Args)]
struct ExcursionArgs {
    #[arg(long)]
    title: Option<String>,
    /// Derived from the title when omitted on add
    #[arg(long)]
    slug: Option<String>,
    #[arg(long)]
    short_description: Option<String>,
    /// Markdown file with the excursion body
    #[arg(long)]
    content: Option<PathBuf>,
    #[arg(long)]
    published: Option<bool>,
    #[arg(long, conflicts_with = "clear_cover")]
    cover: Option<PathBuf>,
    #[arg(long)]
    clear_cover: bool,
    #[arg(long, conflicts_with = "clear_cover_head")]
    cover_head: Option<PathBuf>,
    #[arg(long)]
    clear_cover_head: bool,
}

#[derive(Subcommand)]
enum ReviewCommand {
    List,
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        text: String,
        #[arg(long)]
        photo: Option<PathBuf>,
        #[arg(long)]
        draft: bool,
    },
    Delete {
        id: i32,
    },
}

#[derive(Subcommand)]
enum FaqCommand {
    List,
    Add {
        #[arg(long)]
        question: String,
        #[arg(long)]
        answer: String,
        #[arg(long, default_value_t = 0)]
        sort_order: u32,
        #[arg(long)]
        draft: bool,
    },
    Edit {
        id: i32,
        #[arg(long)]
        question: Option<String>,
        #[arg(long)]
        answer: Option<String>,
        #[arg(long)]
        sort_order: Option<u32>,
        #[arg(long)]
        published: Option<bool>,
    },
    Delete {
        id: i32,
    },
}

#[derive(Subcommand)]
enum SocialCommand {
    List,
    Add {
        #[arg(long)]
        url: String,
        /// Font Awesome classes, e.g. "fa-brands fa-instagram"
        #[arg(long)]
        icon: String,
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value_t = 0)]
        sort_order: u32,
        #[arg(long)]
        inactive: bool,
    },
    Edit {
        id: i32,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        icon: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        sort_order: Option<u32>,
        #[arg(long)]
        active: Option<bool>,
    },
    Delete {
        id: i32,
    },
}

#[derive(Subcommand)]
enum AdminCommand {
    /// List registered models
    Models,
    /// Show the admin configuration of one model
    Describe { model: String },
    /// Print a model's changelist
    Changelist {
        model: String,
        #[arg(long)]
        search: Option<String>,
        /// Published/active flag filter
        #[arg(long)]
        flag: Option<bool>,
        /// any, today, week, month or year
        #[arg(long, default_value = "any")]
        created: DateFilter,
        /// Render as an HTML table
        #[arg(long)]
        html: bool,
    },
}

// ============================================================================
// Helpers
// ============================================================================

fn image_change(path: Option<PathBuf>, clear: bool) -> std::io::Result<ImageChange> {
    match path {
        Some(path) => Ok(ImageChange::Replace(Upload::from_path(&path)?)),
        None if clear => Ok(ImageChange::Clear),
        None => Ok(ImageChange::Keep),
    }
}

fn read_markdown(path: &Path) -> std::io::Result<String> {
    std::fs::read_to_string(path)
}

/// Print records as JSON or as formatted lines.
fn emit<T: Serialize>(
    json: bool,
    value: &T,
    lines: impl FnOnce() -> Vec<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        output::print_lines(&lines());
    }
    Ok(())
}

fn apply_excursion_args(
    form: &mut ExcursionForm,
    args: ExcursionArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(title) = args.title {
        form.title = title;
    }
    if args.slug.is_some() {
        form.slug = args.slug;
    }
    if let Some(desc) = args.short_description {
        form.short_description = desc;
    }
    if let Some(path) = args.content {
        form.content_md = read_markdown(&path)?;
    }
    if let Some(published) = args.published {
        form.is_published = published;
    }
    form.cover = image_change(args.cover, args.clear_cover)?;
    form.cover_head = image_change(args.cover_head, args.clear_cover_head)?;
    Ok(())
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let app_config: AppConfig = config::load_config(&cli.config)?;
    logging::init_subscriber(&app_config.logging.level)
        .map_err(|e| -> Box<dyn std::error::Error> { e })?;
    tracing::debug!(config = %cli.config.display(), "configuration loaded");

    let store = ContentStore::open(&app_config).await?;
    let json = cli.json;

    match cli.command {
        // Printed before the config is loaded.
        Command::GenConfig => {}
        Command::Init => {
            let settings = presentation::site_settings(&store).await?;
            println!(
                "Database ready: {} (settings #{})",
                app_config.database.url, settings.id
            );
            println!("Media root: {}", store.storage().root().display());
        }
        Command::Settings(cmd) => run_settings(&store, cmd, json).await?,
        Command::Excursion(cmd) => run_excursion(&store, cmd, json).await?,
        Command::Review(cmd) => run_review(&store, cmd, json).await?,
        Command::Faq(cmd) => run_faq(&store, cmd, json).await?,
        Command::Social(cmd) => run_social(&store, cmd, json).await?,
        Command::Admin(cmd) => run_admin(&store, cmd, json).await?,
    }
    Ok(())
}

async fn run_settings(
    store: &ContentStore,
    cmd: SettingsCommand,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let settings = match cmd {
        SettingsCommand::Show => presentation::site_settings(store).await?,
        SettingsCommand::Set(args) => {
            let form = SiteSettingsForm {
                logo: image_change(args.logo, args.clear_logo)?,
                slogan: args.slogan,
                copyright_text: args.copyright_text,
                tursab_image: image_change(args.tursab_image, args.clear_tursab_image)?,
                address: args.address,
                address_gmap: args.address_gmap,
                email: args.email,
                phone: args.phone,
                phone_repr: args.phone_repr,
                whatsapp: args.whatsapp,
                whatsapp_repr: args.whatsapp_repr,
                banner_link: args.banner_link,
                banner_image: image_change(args.banner_image, args.clear_banner_image)?,
            };
            store.update_settings(form).await?
        }
    };
    emit(json, &settings, || {
        output::format_settings(&settings, store.storage())
    })
}

async fn run_excursion(
    store: &ContentStore,
    cmd: ExcursionCommand,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        ExcursionCommand::List => {
            let excursions = presentation::excursion_list(store).await?;
            emit(json, &excursions, || {
                output::format_excursion_list(&excursions)
            })?;
        }
        ExcursionCommand::Show { key, html } => {
            let exc = match key.parse::<i32>() {
                Ok(id) => store.get_excursion(id).await?,
                Err(_) => presentation::excursion_by_slug(store, &key).await?,
            };
            let gallery = presentation::excursion_gallery(store, &exc).await?;
            emit(json, &(&exc, &gallery), || {
                output::format_excursion_detail(&exc, &gallery, store.storage())
            })?;
            if html {
                println!("{}", presentation::render_markdown(&exc.content_md));
            }
        }
        ExcursionCommand::Add(args) => {
            let title = args.title.clone().unwrap_or_default();
            let mut form = ExcursionForm::new(title);
            apply_excursion_args(&mut form, args)?;
            let exc = store.create_excursion(form).await?;
            emit(json, &exc, || {
                output::format_excursion_detail(&exc, &[], store.storage())
            })?;
        }
        ExcursionCommand::Edit { id, args } => {
            let current = store.get_excursion(id).await?;
            let mut form = ExcursionForm::from_model(&current);
            apply_excursion_args(&mut form, args)?;
            let exc = store.update_excursion(id, form).await?;
            let gallery = store.gallery(exc.id).await?;
            emit(json, &exc, || {
                output::format_excursion_detail(&exc, &gallery, store.storage())
            })?;
        }
        ExcursionCommand::Delete { id } => {
            store.delete_excursion(id).await?;
            println!("Deleted excursion #{id}");
        }
        ExcursionCommand::AddImage {
            id,
            image,
            caption,
            sort_order,
        } => {
            let form = GalleryImageForm {
                caption,
                sort_order,
                image: ImageChange::Replace(Upload::from_path(&image)?),
            };
            let img = store.add_gallery_image(id, form).await?;
            emit(json, &img, || {
                vec![format!("Added image #{} → {}", img.id, store.url(&img.image))]
            })?;
        }
        ExcursionCommand::EditImage {
            id,
            image_id,
            caption,
            sort_order,
            image,
        } => {
            let current = store.gallery_image(id, image_id).await?;
            let mut form = GalleryImageForm::from_model(&current);
            if let Some(caption) = caption {
                form.caption = caption;
            }
            if let Some(sort_order) = sort_order {
                form.sort_order = sort_order;
            }
            form.image = image_change(image, false)?;
            let img = store.update_gallery_image(id, image_id, form).await?;
            emit(json, &img, || {
                vec![format!("Updated image #{} → {}", img.id, store.url(&img.image))]
            })?;
        }
        ExcursionCommand::RemoveImage { id, image_id } => {
            store.delete_gallery_image(id, image_id).await?;
            println!("Removed image #{image_id} from excursion #{id}");
        }
    }
    Ok(())
}

async fn run_review(
    store: &ContentStore,
    cmd: ReviewCommand,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        ReviewCommand::List => {
            let reviews = presentation::review_list(store).await?;
            emit(json, &reviews, || output::format_review_list(&reviews))?;
        }
        ReviewCommand::Add {
            name,
            text,
            photo,
            draft,
        } => {
            let form = ReviewForm {
                is_published: !draft,
                photo: image_change(photo, false)?,
                ..ReviewForm::new(name, text)
            };
            let review = store.create_review(form).await?;
            emit(json, &review, || {
                output::format_review_list(std::slice::from_ref(&review))
            })?;
        }
        ReviewCommand::Delete { id } => {
            store.delete_review(id).await?;
            println!("Deleted review #{id}");
        }
    }
    Ok(())
}

async fn run_faq(
    store: &ContentStore,
    cmd: FaqCommand,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let faq = match cmd {
        FaqCommand::List => {
            let faqs = presentation::faq_list(store).await?;
            return emit(json, &faqs, || output::format_faq_list(&faqs));
        }
        FaqCommand::Add {
            question,
            answer,
            sort_order,
            draft,
        } => {
            let form = FaqForm {
                sort_order,
                is_published: !draft,
                ..FaqForm::new(question, answer)
            };
            store.create_faq(form).await?
        }
        FaqCommand::Edit {
            id,
            question,
            answer,
            sort_order,
            published,
        } => {
            let current = store.get_faq(id).await?;
            let mut form = FaqForm::from_model(&current);
            if let Some(question) = question {
                form.question = question;
            }
            if let Some(answer) = answer {
                form.answer = answer;
            }
            if let Some(sort_order) = sort_order {
                form.sort_order = sort_order;
            }
            if let Some(published) = published {
                form.is_published = published;
            }
            store.update_faq(id, form).await?
        }
        FaqCommand::Delete { id } => {
            store.delete_faq(id).await?;
            println!("Deleted FAQ entry #{id}");
            return Ok(());
        }
    };
    emit(json, &faq, || {
        output::format_faq_list(std::slice::from_ref(&faq))
    })
}

async fn run_social(
    store: &ContentStore,
    cmd: SocialCommand,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let link = match cmd {
        SocialCommand::List => {
            let links = presentation::social_link_list(store).await?;
            return emit(json, &links, || output::format_social_list(&links));
        }
        SocialCommand::Add {
            url,
            icon,
            title,
            sort_order,
            inactive,
        } => {
            let form = SocialLinkForm {
                title,
                sort_order,
                is_active: !inactive,
                ..SocialLinkForm::new(url, icon)
            };
            store.create_social_link(form).await?
        }
        SocialCommand::Edit {
            id,
            url,
            icon,
            title,
            sort_order,
            active,
        } => {
            let current = store.get_social_link(id).await?;
            let mut form = SocialLinkForm::from_model(&current);
            if let Some(url) = url {
                form.url = url;
            }
            if let Some(icon) = icon {
                form.fa_icon = icon;
            }
            if let Some(title) = title {
                form.title = title;
            }
            if let Some(sort_order) = sort_order {
                form.sort_order = sort_order;
            }
            if let Some(active) = active {
                form.is_active = active;
            }
            store.update_social_link(id, form).await?
        }
        SocialCommand::Delete { id } => {
            store.delete_social_link(id).await?;
            println!("Deleted social link #{id}");
            return Ok(());
        }
    };
    emit(json, &link, || {
        output::format_social_list(std::slice::from_ref(&link))
    })
}

async fn run_admin(
    store: &ContentStore,
    cmd: AdminCommand,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        AdminCommand::Models => {
            for model in admin::REGISTRY {
                let add = if admin::has_add_permission(model, store).await? {
                    ""
                } else {
                    " (add disabled)"
                };
                println!("{:<14} {}{}", model.model, model.verbose_name_plural, add);
            }
        }
        AdminCommand::Describe { model } => {
            let model_admin =
                admin::find(&model).ok_or_else(|| format!("no admin registered for `{model}`"))?;
            output::print_lines(&output::format_model_admin(model_admin));
        }
        AdminCommand::Changelist {
            model,
            search,
            flag,
            created,
            html,
        } => {
            let query = ChangeListQuery {
                search,
                flag,
                created,
            };
            let list = admin::changelist(store, &model, &query).await?;
            if html {
                println!(
                    "{}",
                    admin::render_changelist(store.storage(), &list).into_string()
                );
            } else {
                emit(json, &list, || output::format_changelist(&list))?;
            }
        }
    }
    Ok(())
}
