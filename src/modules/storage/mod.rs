//! Storage module for uploaded files
//!
//! Files are stored under generated names (`<uuid>[.<ext>]`) and referred
//! to by their web path `/uploads/<name>`. Two backends implement
//! [`FileStorage`]: the local filesystem and a MinIO/S3-compatible bucket.

mod local_storage;
#[cfg(test)]
pub mod memory_storage;
mod minio_client;

pub use local_storage::LocalStorage;
pub use minio_client::MinIOClient;

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::AppError;
use crate::shared::constants::UPLOADS_WEB_PREFIX;

#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Store `data` under a fresh name and return its web path.
    async fn save(
        &self,
        data: Vec<u8>,
        original_filename: Option<&str>,
        content_type: &str,
    ) -> Result<String, AppError>;

    /// Read a stored file, `None` when it does not exist.
    async fn load(&self, file_name: &str) -> Result<Option<Vec<u8>>, AppError>;

    /// Remove a stored file given its web path or bare name.
    /// Deleting a missing file is not an error.
    async fn delete(&self, web_path: &str) -> Result<(), AppError>;
}

/// Generate a stored name, keeping the original extension when it is a
/// plain alphanumeric suffix.
pub fn generate_file_name(original_filename: Option<&str>) -> String {
    let id = Uuid::new_v4();
    match original_filename.and_then(extension_of) {
        Some(ext) => format!("{}.{}", id, ext),
        None => id.to_string(),
    }
}

fn extension_of(filename: &str) -> Option<&str> {
    let (_, ext) = filename.rsplit_once('.')?;
    let usable = !ext.is_empty() && ext.len() <= 10 && ext.chars().all(|c| c.is_ascii_alphanumeric());
    usable.then_some(ext)
}

pub fn web_path(file_name: &str) -> String {
    format!("{}{}", UPLOADS_WEB_PREFIX, file_name)
}

/// Reduce a web path or file path to its last segment.
///
/// Returns `None` for names that cannot refer to a stored file, such as
/// empty strings, `.` or `..`.
pub fn normalize_file_name(path: &str) -> Option<&str> {
    let name = path
        .trim()
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    match name {
        "" | "." | ".." => None,
        name => Some(name),
    }
}

/// Content type served for a stored file, guessed from its extension.
///
/// Only raster image types are named. Anything else, SVG included, is
/// served as `application/octet-stream`.
pub fn content_type_for(file_name: &str) -> &'static str {
    let ext = extension_of(file_name)
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "ico" => "image/x-icon",
        "avif" => "image/avif",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_file_name_keeps_extension() {
        let name = generate_file_name(Some("portrait.final.png"));
        let (stem, ext) = name.rsplit_once('.').unwrap();
        assert_eq!(ext, "png");
        assert!(Uuid::parse_str(stem).is_ok());
    }

    #[test]
    fn test_generate_file_name_without_extension() {
        let name = generate_file_name(Some("portrait"));
        assert!(Uuid::parse_str(&name).is_ok());

        let name = generate_file_name(Some("evil.png/../x"));
        assert!(Uuid::parse_str(&name).is_ok());

        let name = generate_file_name(None);
        assert!(Uuid::parse_str(&name).is_ok());
    }

    #[test]
    fn test_normalize_file_name() {
        assert_eq!(normalize_file_name("/uploads/abc.png"), Some("abc.png"));
        assert_eq!(normalize_file_name("abc.png"), Some("abc.png"));
        assert_eq!(normalize_file_name("../../etc/passwd"), Some("passwd"));
        assert_eq!(normalize_file_name("..\\secret.txt"), Some("secret.txt"));
        assert_eq!(normalize_file_name("/uploads/"), None);
        assert_eq!(normalize_file_name(".."), None);
        assert_eq!(normalize_file_name(""), None);
    }

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("a.PNG"), "image/png");
        assert_eq!(content_type_for("a.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("a"), "application/octet-stream");
        assert_eq!(content_type_for("a.svg"), "application/octet-stream");
        assert_eq!(content_type_for("a.html"), "application/octet-stream");
    }

    #[test]
    fn test_web_path() {
        assert_eq!(web_path("abc.png"), "/uploads/abc.png");
    }
}
