use anyhow::Result;
use clap::Args;
use std::path::{Path, PathBuf};

use crate::config::StorageConfig;
use crate::error::CliError;
use crate::storage::{object_key, upload_file_to_bucket, ObjectStoreBucket};

pub const DEFAULT_FOLDER: &str = "youtube.data";

#[derive(Args, Debug)]
pub struct UploadArgs {
    /// Path to the local file
    pub file_path: PathBuf,

    /// Folder (key prefix) in the bucket
    #[arg(long, default_value = DEFAULT_FOLDER)]
    pub folder: String,
}

/// Validates the local file before any storage client is built
fn validate_input(path: &Path) -> Result<String, CliError> {
    if !path.is_file() {
        return Err(CliError::FileNotFound(path.display().to_string()));
    }
    Ok(path.display().to_string())
}

pub async fn run(
    global: &crate::GlobalOpts,
    storage: &StorageConfig,
    args: UploadArgs,
) -> Result<()> {
    let display = validate_input(&args.file_path)?;
    let key = object_key(&args.folder, &args.file_path)
        .ok_or_else(|| CliError::InvalidInput(format!("No file name in path: {display}")))?;

    println!("🚀 Uploading: {display}");

    let bucket = ObjectStoreBucket::connect(storage, !global.no_progress)?;
    upload_file_to_bucket(&bucket, &args.file_path, &key)
        .await
        .ok_or(CliError::UploadFailed)?;

    Ok(())
}
