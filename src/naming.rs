//! Centralized name handling: URL slugs and stored filenames.
//!
//! ## Slugs
//!
//! Excursion slugs are derived from the title when an editor does not supply
//! one. Titles are usually Russian or Turkish, so letters are transliterated
//! to ASCII before everything outside `[a-z0-9_-]` is dropped:
//! - `"Каппадокия на рассвете"` → `"kappadokiya-na-rassvete"`
//! - `"Ölüdeniz & Kelebekler"` → `"oludeniz-kelebekler"`
//!
//! ## Filenames
//!
//! Uploaded filenames are reduced to a safe basename before they reach media
//! storage, and compressed images always carry a `.jpg` extension:
//! - `"../My Photo (1).PNG"` → `"My_Photo_1.PNG"` → `"My_Photo_1.jpg"`

use std::path::Path;

/// Maximum slug length, matching the excursion slug column.
pub const SLUG_MAX_LEN: usize = 50;

fn transliterate(c: char) -> Option<&'static str> {
    let mapped = match c {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' => "e",
        'ё' => "yo",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' => "j",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "h",
        'ц' => "c",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "sh",
        'ъ' | 'ь' => "",
        'ы' => "y",
        'э' => "e",
        'ю' => "yu",
        'я' => "ya",
        // Turkish
        'ç' => "c",
        'ğ' => "g",
        'ı' => "i",
        'ö' => "o",
        'ş' => "s",
        'ü' => "u",
        // Latin-1
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => "a",
        'è' | 'é' | 'ê' | 'ë' => "e",
        'ì' | 'í' | 'î' | 'ï' => "i",
        'ò' | 'ó' | 'ô' | 'õ' => "o",
        'ù' | 'ú' | 'û' => "u",
        'ñ' => "n",
        'ß' => "ss",
        _ => return None,
    };
    Some(mapped)
}

/// Build a URL slug from a title.
///
/// Handles these patterns:
/// - `"Boat Trip"` → `"boat-trip"`
/// - `"  Pamukkale -- Hierapolis  "` → `"pamukkale-hierapolis"`
/// - `"Рафтинг"` → `"rafting"`
/// - `"İstanbul"` → `"istanbul"`
///
/// The result is at most `max_len` characters with no trailing hyphen. It is
/// empty when the title has no transliterable letters or digits.
pub fn slugify(title: &str, max_len: usize) -> String {
    let mut ascii = String::with_capacity(title.len());
    for c in title.chars() {
        if c == 'İ' {
            ascii.push('i');
            continue;
        }
        for lower in c.to_lowercase() {
            if let Some(mapped) = transliterate(lower) {
                ascii.push_str(mapped);
            } else if lower.is_ascii_alphanumeric() || lower == '_' || lower == '-' {
                ascii.push(lower);
            } else if lower.is_whitespace() {
                ascii.push(' ');
            }
        }
    }

    let mut slug = String::with_capacity(ascii.len());
    let mut pending_dash = false;
    for c in ascii.trim().chars() {
        if c == '-' || c == ' ' {
            pending_dash = true;
            continue;
        }
        if pending_dash && !slug.is_empty() {
            slug.push('-');
        }
        pending_dash = false;
        slug.push(c);
    }

    slug.truncate(max_len);
    slug.trim_end_matches('-').to_string()
}

/// Whether `slug` only uses `[A-Za-z0-9_-]` and is non-empty.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Reduce an uploaded filename to a safe basename.
///
/// Directory components are dropped, spaces become underscores, and anything
/// other than letters, digits, `-`, `_` and `.` is removed.
pub fn valid_filename(name: &str) -> String {
    let base = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    let cleaned: String = base
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('_'),
            c if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' => Some(c),
            _ => None,
        })
        .collect();

    match cleaned.as_str() {
        "" | "." | ".." => "file".to_string(),
        _ => cleaned,
    }
}

/// Replace the extension of `name` with `.jpg`.
///
/// - `"photo.png"` → `"photo.jpg"`
/// - `"archive.tar.gz"` → `"archive.tar.jpg"`
/// - `"noext"` → `"noext.jpg"`
pub fn jpeg_filename(name: &str) -> String {
    let base = valid_filename(name);
    let stem = Path::new(&base)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("image");
    format!("{stem}.jpg")
}

/// Insert a numeric suffix before the extension: `photo.jpg`, 2 → `photo_2.jpg`.
pub fn alternate_name(name: &str, n: u32) -> String {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem}_{n}.{ext}"),
        _ => format!("{name}_{n}"),
    }
}
