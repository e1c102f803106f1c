mod backend;
mod bucket;
mod uploader;

use std::path::Path;

pub use bucket::{Bucket, ObjectEntry, ObjectStoreBucket};
pub use uploader::upload_file_to_bucket;

use crate::config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("object store error: {0}")]
    ObjectStore(#[from] object_store::Error),

    #[error("invalid object key: {0}")]
    InvalidKey(#[from] object_store::path::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Build the object key `{folder}/{file name}` for a local file
pub fn object_key(folder: &str, file_path: &Path) -> Option<String> {
    let name = file_path.file_name()?.to_str()?;
    let folder = folder.trim_end_matches('/');
    if folder.is_empty() {
        Some(name.to_string())
    } else {
        Some(format!("{folder}/{name}"))
    }
}

/// Human-readable size in mebibytes, one decimal place
pub fn format_megabytes(bytes: u64) -> String {
    format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
}
