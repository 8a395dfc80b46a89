use std::path::PathBuf;

use crate::env::{list_or, parse_or, string_or};

const DEFAULT_ALLOWED_TYPES: &str =
    "image/png,image/jpeg,image/gif,image/webp,image/svg+xml,application/pdf,video/mp4";

#[derive(Clone, Debug)]
pub struct MediaConfig {
    /// Directory uploads are written to, also served statically.
    pub upload_dir: PathBuf,
    /// URL prefix the upload directory is mounted at.
    pub public_url: String,
    pub max_bytes: usize,
    pub allowed_types: Vec<String>,
}

impl MediaConfig {
    pub fn from_env() -> Self {
        Self {
            upload_dir: PathBuf::from(string_or("MEDIA_UPLOAD_DIR", "storage/uploads")),
            public_url: string_or("MEDIA_PUBLIC_URL", "/static/uploads"),
            max_bytes: parse_or("MEDIA_MAX_BYTES", 10 * 1024 * 1024),
            allowed_types: list_or("MEDIA_ALLOWED_TYPES", DEFAULT_ALLOWED_TYPES),
        }
    }
}
