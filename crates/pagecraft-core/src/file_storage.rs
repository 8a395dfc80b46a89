//! File storage abstraction for uploaded media.
//!
//! Handlers talk to a [`FileStorage`] trait object so the local-disk backend
//! can be replaced without touching business logic.
//!
//! # Example
//!
//! ```ignore
//! use pagecraft_core::file_storage::{FileStorage, LocalFileStorage};
//!
//! let storage = LocalFileStorage::new(
//!     PathBuf::from("storage/uploads"),
//!     "/static/uploads".to_string(),
//! );
//!
//! let key = generate_key("logo.png");
//! storage.validate(content.len(), "image/png")?;
//! storage.save(&key, &content).await?;
//! let url = storage.get_url(&key)?;
//! ```

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use thiserror::Error;
use tokio::fs;
use uuid::Uuid;

pub type StorageFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StorageError>> + Send + 'a>>;

pub const DEFAULT_MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

pub const DEFAULT_ALLOWED_MIME_TYPES: &[&str] = &[
    "image/png",
    "image/jpeg",
    "image/gif",
    "image/webp",
    "image/svg+xml",
    "application/pdf",
    "video/mp4",
];

/// Storage backend for uploaded files.
pub trait FileStorage: Send + Sync {
    /// Checks size and content type before anything is written.
    fn validate(&self, size: usize, mime_type: &str) -> Result<(), StorageError>;

    /// Persists `content` under `key` and returns the key.
    fn save<'a>(&'a self, key: &'a str, content: &'a [u8]) -> StorageFuture<'a, String>;

    /// Removes the file under `key`. Missing files are not an error.
    fn delete<'a>(&'a self, key: &'a str) -> StorageFuture<'a, ()>;

    /// Public URL a client can fetch the file from.
    fn get_url(&self, key: &str) -> Result<String, StorageError>;

    /// Inverse of [`FileStorage::get_url`], `None` if the URL is not ours.
    fn key_from_url(&self, url: &str) -> Option<String>;
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("File exceeds maximum size of {max_bytes} bytes")]
    InvalidFileSize { max_bytes: usize },

    #[error("MIME type '{received}' not allowed. Allowed types: {}", .allowed.join(", "))]
    InvalidMimeType {
        received: String,
        allowed: Vec<String>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found")]
    NotFound,

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

const MAX_EXTENSION_LEN: usize = 16;

/// Builds a collision-free storage key that keeps the original extension.
/// Extensions longer than 16 characters are dropped.
pub fn generate_key(original_filename: &str) -> String {
    let extension = std::path::Path::new(original_filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| {
            !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LEN
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .map(|ext| ext.to_ascii_lowercase());

    match extension {
        Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
        None => Uuid::new_v4().to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct LocalFileStorage {
    base_dir: PathBuf,
    base_url: String,
    max_file_size: usize,
    allowed_mime_types: Vec<String>,
}

impl LocalFileStorage {
    pub fn new(base_dir: PathBuf, base_url: String) -> Self {
        Self::with_limits(
            base_dir,
            base_url,
            DEFAULT_MAX_FILE_SIZE,
            DEFAULT_ALLOWED_MIME_TYPES
                .iter()
                .map(|m| m.to_string())
                .collect(),
        )
    }

    pub fn with_limits(
        base_dir: PathBuf,
        base_url: String,
        max_file_size: usize,
        allowed_mime_types: Vec<String>,
    ) -> Self {
        Self {
            base_dir,
            base_url,
            max_file_size,
            allowed_mime_types,
        }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Rejects keys that could escape `base_dir`.
    fn validate_key(key: &str) -> Result<(), StorageError> {
        if key.is_empty() || key.contains("..") || key.starts_with('/') {
            return Err(StorageError::InvalidKey(
                "Key must not be empty, contain '..', or start with '/'".to_string(),
            ));
        }

        if !key
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '/' || c == '.')
        {
            return Err(StorageError::InvalidKey(
                "Key contains invalid characters".to_string(),
            ));
        }

        Ok(())
    }
}

impl FileStorage for LocalFileStorage {
    fn validate(&self, size: usize, mime_type: &str) -> Result<(), StorageError> {
        if size > self.max_file_size {
            return Err(StorageError::InvalidFileSize {
                max_bytes: self.max_file_size,
            });
        }

        if !self.allowed_mime_types.iter().any(|m| m == mime_type) {
            return Err(StorageError::InvalidMimeType {
                received: mime_type.to_string(),
                allowed: self.allowed_mime_types.clone(),
            });
        }

        Ok(())
    }

    fn save<'a>(&'a self, key: &'a str, content: &'a [u8]) -> StorageFuture<'a, String> {
        Box::pin(async move {
            Self::validate_key(key)?;

            if content.len() > self.max_file_size {
                return Err(StorageError::InvalidFileSize {
                    max_bytes: self.max_file_size,
                });
            }

            let file_path = self.base_dir.join(key);
            if let Some(parent) = file_path.parent() {
                fs::create_dir_all(parent).await?;
            }
            fs::write(&file_path, content).await?;

            Ok(key.to_string())
        })
    }

    fn delete<'a>(&'a self, key: &'a str) -> StorageFuture<'a, ()> {
        Box::pin(async move {
            Self::validate_key(key)?;

            match fs::remove_file(self.base_dir.join(key)).await {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            }
        })
    }

    fn get_url(&self, key: &str) -> Result<String, StorageError> {
        Self::validate_key(key)?;
        Ok(format!("{}/{}", self.base_url.trim_end_matches('/'), key))
    }

    fn key_from_url(&self, url: &str) -> Option<String> {
        let prefix = format!("{}/", self.base_url.trim_end_matches('/'));
        let key = url.strip_prefix(&prefix)?;
        Self::validate_key(key).ok()?;
        Some(key.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage(dir: PathBuf) -> LocalFileStorage {
        LocalFileStorage::with_limits(
            dir,
            "/static/uploads".to_string(),
            16,
            vec!["image/png".to_string()],
        )
    }

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("pagecraft-storage-{}", Uuid::new_v4()))
    }

    #[test]
    fn validate_key_accepts_valid_keys() {
        assert!(LocalFileStorage::validate_key("logo.png").is_ok());
        assert!(LocalFileStorage::validate_key("2024/abc-123.jpg").is_ok());
        assert!(LocalFileStorage::validate_key("profile_pic.webp").is_ok());
    }

    #[test]
    fn validate_key_rejects_path_traversal() {
        assert!(LocalFileStorage::validate_key("../../../etc/passwd").is_err());
        assert!(LocalFileStorage::validate_key("..\\windows\\system32").is_err());
        assert!(LocalFileStorage::validate_key("/etc/passwd").is_err());
        assert!(LocalFileStorage::validate_key("").is_err());
    }

    #[test]
    fn validate_checks_size_and_type() {
        let storage = storage(temp_dir());
        assert!(storage.validate(16, "image/png").is_ok());
        assert!(matches!(
            storage.validate(17, "image/png"),
            Err(StorageError::InvalidFileSize { max_bytes: 16 })
        ));
        assert!(matches!(
            storage.validate(1, "text/html"),
            Err(StorageError::InvalidMimeType { .. })
        ));
    }

    #[test]
    fn url_and_key_round_trip() {
        let storage = LocalFileStorage::new(temp_dir(), "/static/uploads/".to_string());
        let url = storage.get_url("logo.png").unwrap();
        assert_eq!(url, "/static/uploads/logo.png");
        assert_eq!(storage.key_from_url(&url).as_deref(), Some("logo.png"));
        assert_eq!(storage.key_from_url("/elsewhere/logo.png"), None);
        assert_eq!(storage.key_from_url("/static/uploads/../secret"), None);
    }

    #[test]
    fn generated_keys_keep_extension_and_are_unique() {
        let a = generate_key("Holiday Photo.PNG");
        let b = generate_key("Holiday Photo.PNG");
        assert!(a.ends_with(".png"));
        assert_ne!(a, b);
        assert!(LocalFileStorage::validate_key(&a).is_ok());
        assert!(!generate_key("no-extension").contains('.'));
        assert!(!generate_key("evil.p/hp").contains('/'));
    }

    #[test]
    fn overlong_extension_is_dropped() {
        let name = format!("a.{}", "x".repeat(240));
        let key = generate_key(&name);
        assert!(!key.contains('.'));
        assert_eq!(key.len(), 36);
        assert!(generate_key("archive.abcdefghijklmnop").ends_with(".abcdefghijklmnop"));
    }

    #[tokio::test]
    async fn save_then_delete() {
        let dir = temp_dir();
        let storage = storage(dir.clone());

        storage.save("file.png", b"png-bytes").await.unwrap();
        assert!(dir.join("file.png").exists());

        storage.delete("file.png").await.unwrap();
        assert!(!dir.join("file.png").exists());

        // deleting twice is fine
        storage.delete("file.png").await.unwrap();
        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn save_rejects_oversized_content() {
        let storage = storage(temp_dir());
        let result = storage.save("big.png", &[0u8; 32]).await;
        assert!(matches!(result, Err(StorageError::InvalidFileSize { .. })));
    }
}
