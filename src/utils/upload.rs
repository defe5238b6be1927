//! Cover image storage.

use std::{path::Path, sync::LazyLock};

use chrono::{DateTime, Utc};
use regex::Regex;
use url::Url;

use crate::error::AppError;

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_-]+").expect("static pattern"));

const ALLOWED_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "webp"];

/// Reduces a title to `[A-Za-z0-9_-]`, collapsing runs of anything else to `_`.
pub fn slug(title: &str) -> String {
    let replaced = UNSAFE_CHARS.replace_all(title.trim(), "_");
    let trimmed = replaced.trim_matches('_');
    if trimmed.is_empty() {
        "book".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Lower-cased extension of an uploaded file name, if it is an accepted image type.
pub fn image_extension(file_name: &str) -> Option<String> {
    let ext = Path::new(file_name).extension()?.to_str()?.to_ascii_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// `<slug>_<unix millis>.<ext>`
pub fn cover_file_name(title: &str, ext: &str, now: DateTime<Utc>) -> String {
    format!("{}_{}.{}", slug(title), now.timestamp_millis(), ext)
}

/// Writes an uploaded cover into `dir` and returns the stored file name.
pub async fn save_cover(
    dir: &Path,
    title: &str,
    original_name: &str,
    bytes: &[u8],
) -> Result<String, AppError> {
    let ext = image_extension(original_name).ok_or_else(|| {
        AppError::BadRequest("Cover image must be a png, jpg, gif or webp file".to_string())
    })?;

    let file_name = cover_file_name(title, &ext, Utc::now());

    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| AppError::InternalServerError(format!("upload dir: {e}")))?;
    tokio::fs::write(dir.join(&file_name), bytes)
        .await
        .map_err(|e| AppError::InternalServerError(format!("writing cover: {e}")))?;

    tracing::info!(file = %file_name, size = bytes.len(), "Stored cover image");
    Ok(file_name)
}

/// Public URL of a stored cover.
pub fn cover_url(base: &Url, file_name: &str) -> Option<String> {
    base.join("static/uploads/")
        .and_then(|dir| dir.join(file_name))
        .map(String::from)
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn slug_keeps_only_safe_characters() {
        assert_eq!(slug("The Hobbit"), "The_Hobbit");
        assert_eq!(slug("  ../../etc/passwd "), "etc_passwd");
        assert_eq!(slug("???"), "book");
    }

    #[test]
    fn only_image_extensions_are_accepted() {
        assert_eq!(image_extension("cover.PNG"), Some("png".to_string()));
        assert_eq!(image_extension("cover.jpeg"), Some("jpeg".to_string()));
        assert_eq!(image_extension("cover.exe"), None);
        assert_eq!(image_extension("cover"), None);
    }

    #[test]
    fn file_name_is_suffixed_with_timestamp() {
        let now = Utc.timestamp_millis_opt(1_744_236_608_047).unwrap();
        assert_eq!(
            cover_file_name("The Hobbit", "png", now),
            "The_Hobbit_1744236608047.png"
        );
    }

    #[test]
    fn cover_url_is_under_static_uploads() {
        let base = Url::parse("http://school.example/").unwrap();
        assert_eq!(
            cover_url(&base, "a_1.png").as_deref(),
            Some("http://school.example/static/uploads/a_1.png")
        );
    }
}
