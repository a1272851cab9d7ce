//! End-to-end scenarios against a real SQLite file, a real media root and
//! the pure-Rust image backend.
//!
//! Run with: cargo test --test content_scenarios

use excursion_cms::admin::{self, ChangeListQuery};
use excursion_cms::config::{AppConfig, resolve_config, stock_defaults_value};
use excursion_cms::content::{ContentError, ContentStore};
use excursion_cms::forms::{
    ExcursionForm, FaqForm, GalleryImageForm, SiteSettingsForm, SocialLinkForm,
};
use excursion_cms::presentation;
use excursion_cms::uploads::{ImageChange, Upload};
use image::{GenericImageView, ImageFormat};
use std::io::Cursor;
use std::path::Path;
use tempfile::TempDir;

fn config_for(tmp: &Path) -> AppConfig {
    let overlay: toml::Value = toml::from_str(&format!(
        r#"
        [database]
        url = "sqlite://{}?mode=rwc"
        max_connections = 1

        [media]
        root = "{}"
        "#,
        tmp.join("cms.sqlite3").display(),
        tmp.join("media").display()
    ))
    .unwrap();
    resolve_config(stock_defaults_value(), Some(overlay)).unwrap()
}

async fn open_store() -> (TempDir, ContentStore) {
    let tmp = TempDir::new().unwrap();
    let store = ContentStore::open(&config_for(tmp.path())).await.unwrap();
    (tmp, store)
}

fn encode(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 251) as u8, (y % 241) as u8, 90])
    });
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, format).unwrap();
    out.into_inner()
}

fn upload(name: &str, width: u32, height: u32, format: ImageFormat) -> ImageChange {
    ImageChange::Replace(Upload::new(name, encode(width, height, format)))
}

fn stored_image(store: &ContentStore, name: &str) -> (image::DynamicImage, Vec<u8>) {
    let bytes = store.storage().open(name).unwrap();
    let img = image::load_from_memory(&bytes).unwrap();
    (img, bytes)
}

fn files_under(dir: &Path) -> usize {
    if !dir.exists() {
        return 0;
    }
    std::fs::read_dir(dir)
        .unwrap()
        .map(|e| {
            let path = e.unwrap().path();
            if path.is_dir() { files_under(&path) } else { 1 }
        })
        .sum()
}

#[tokio::test]
async fn large_cover_is_shrunk_to_jpeg() {
    let (_tmp, store) = open_store().await;
    let form = ExcursionForm {
        cover: upload("Cappadocia.png", 4000, 3000, ImageFormat::Png),
        ..ExcursionForm::new("Cappadocia Balloons")
    };

    let exc = store.create_excursion(form).await.unwrap();
    let name = exc.cover.unwrap();
    assert!(name.starts_with("main/excursion/cover/"));
    assert!(name.ends_with(".jpg"));

    let (img, bytes) = stored_image(&store, &name);
    assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    assert_eq!(img.dimensions(), (1280, 960));
}

#[tokio::test]
async fn small_upload_keeps_its_size() {
    let (_tmp, store) = open_store().await;
    let exc = store
        .create_excursion(ExcursionForm::new("Kayaköy"))
        .await
        .unwrap();
    let img = store
        .add_gallery_image(
            exc.id,
            GalleryImageForm {
                caption: "Ghost village".into(),
                sort_order: 0,
                image: upload("village.png", 640, 400, ImageFormat::Png),
            },
        )
        .await
        .unwrap();

    assert_eq!(img.image, "main/excursionimage/image/village.jpg");
    let (decoded, _) = stored_image(&store, &img.image);
    assert_eq!(decoded.dimensions(), (640, 400));
}

#[tokio::test]
async fn banner_fits_its_own_box() {
    let (_tmp, store) = open_store().await;
    let settings = store
        .update_settings(SiteSettingsForm {
            banner_image: upload("banner.jpg", 2000, 2000, ImageFormat::Jpeg),
            ..Default::default()
        })
        .await
        .unwrap();

    let (img, _) = stored_image(&store, settings.banner_image.as_deref().unwrap());
    assert_eq!(img.dimensions(), (520, 520));
}

#[tokio::test]
async fn same_filename_twice_gets_a_suffix() {
    let (_tmp, store) = open_store().await;
    let cover = || upload("cover.png", 100, 100, ImageFormat::Png);
    let a = store
        .create_excursion(ExcursionForm {
            cover: cover(),
            ..ExcursionForm::new("A")
        })
        .await
        .unwrap();
    let b = store
        .create_excursion(ExcursionForm {
            cover: cover(),
            ..ExcursionForm::new("B")
        })
        .await
        .unwrap();

    assert_eq!(a.cover.as_deref(), Some("main/excursion/cover/cover.jpg"));
    assert_eq!(b.cover.as_deref(), Some("main/excursion/cover/cover_1.jpg"));
}

#[tokio::test]
async fn settings_singleton_scenario() {
    let (_tmp, store) = open_store().await;
    let first = store.load_settings().await.unwrap();
    let again = presentation::site_settings(&store).await.unwrap();
    assert_eq!(first.id, again.id);

    let updated = store
        .update_settings(SiteSettingsForm {
            slogan: Some("Lycian coast".into()),
            ..Default::default()
        })
        .await
        .unwrap();

    let err = store
        .create_settings(SiteSettingsForm {
            slogan: Some("Replacement".into()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ContentError::Validation(_)));
    assert_eq!(store.load_settings().await.unwrap(), updated);

    let settings_admin = admin::find("sitesettings").unwrap();
    assert!(!admin::has_add_permission(settings_admin, &store).await.unwrap());
}

#[tokio::test]
async fn non_image_upload_leaves_nothing_behind() {
    let (tmp, store) = open_store().await;
    let form = ExcursionForm {
        cover: ImageChange::Replace(Upload::new("brochure.pdf", b"%PDF-1.4 not an image".to_vec())),
        ..ExcursionForm::new("Brochure")
    };

    let err = store.create_excursion(form).await.unwrap_err();
    assert!(err.is_decode());
    assert!(presentation::excursion_list(&store).await.unwrap().is_empty());
    assert_eq!(files_under(&tmp.path().join("media")), 0);
}

#[tokio::test]
async fn one_bad_upload_keeps_the_good_one_off_disk() {
    let (tmp, store) = open_store().await;
    let form = ExcursionForm {
        cover: upload("good.png", 300, 200, ImageFormat::Png),
        cover_head: ImageChange::Replace(Upload::new("head.png", b"not an image".to_vec())),
        ..ExcursionForm::new("Xanthos")
    };
    let err = store.create_excursion(form).await.unwrap_err();
    assert!(err.is_decode());

    let err = store
        .update_settings(SiteSettingsForm {
            logo: upload("logo.png", 120, 60, ImageFormat::Png),
            banner_image: ImageChange::Replace(Upload::new("banner.jpg", b"junk".to_vec())),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(err.is_decode());

    assert!(presentation::excursion_list(&store).await.unwrap().is_empty());
    assert_eq!(store.load_settings().await.unwrap().logo, None);
    assert_eq!(files_under(&tmp.path().join("media")), 0);
}

#[tokio::test]
async fn deleting_an_excursion_removes_its_gallery() {
    let (_tmp, store) = open_store().await;
    let exc = store
        .create_excursion(ExcursionForm::new("Butterfly Valley"))
        .await
        .unwrap();
    for i in 0..3 {
        store
            .add_gallery_image(
                exc.id,
                GalleryImageForm {
                    caption: format!("View {i}"),
                    sort_order: i,
                    image: upload(&format!("v{i}.png"), 32, 32, ImageFormat::Png),
                },
            )
            .await
            .unwrap();
    }
    assert_eq!(presentation::excursion_gallery(&store, &exc).await.unwrap().len(), 3);

    store.delete_excursion(exc.id).await.unwrap();

    assert!(store.gallery(exc.id).await.unwrap().is_empty());
    assert!(matches!(
        store.get_excursion(exc.id).await,
        Err(ContentError::NotFound { .. })
    ));
}

#[tokio::test]
async fn faq_and_social_links_follow_sort_order() {
    let (_tmp, store) = open_store().await;
    for (question, order) in [("Pickup?", 2), ("Lunch?", 0), ("Kids?", 2)] {
        store
            .create_faq(FaqForm {
                sort_order: order,
                ..FaqForm::new(question, "Yes.")
            })
            .await
            .unwrap();
    }
    for (url, order) in [("https://t.me/x", 1), ("https://instagram.com/x", 0)] {
        store
            .create_social_link(SocialLinkForm {
                sort_order: order,
                ..SocialLinkForm::new(url, "fa-brands fa-x")
            })
            .await
            .unwrap();
    }

    let questions: Vec<String> = presentation::faq_list(&store)
        .await
        .unwrap()
        .into_iter()
        .map(|f| f.question)
        .collect();
    assert_eq!(questions, vec!["Lunch?", "Pickup?", "Kids?"]);

    let urls: Vec<String> = presentation::social_link_list(&store)
        .await
        .unwrap()
        .into_iter()
        .map(|l| l.url)
        .collect();
    assert_eq!(urls, vec!["https://instagram.com/x", "https://t.me/x"]);

    let list = admin::changelist(&store, "faq", &ChangeListQuery::default())
        .await
        .unwrap();
    assert_eq!(list.rows.len(), 3);
}

#[tokio::test]
async fn reopening_keeps_content() {
    let tmp = TempDir::new().unwrap();
    let config = config_for(tmp.path());
    {
        let store = ContentStore::open(&config).await.unwrap();
        store
            .create_excursion(ExcursionForm::new("Ephesus"))
            .await
            .unwrap();
    }
    let store = ContentStore::open(&config).await.unwrap();
    let exc = presentation::excursion_by_slug(&store, "ephesus").await.unwrap();
    assert_eq!(exc.title, "Ephesus");
}
