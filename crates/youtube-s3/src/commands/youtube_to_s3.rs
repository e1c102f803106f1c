use anyhow::{Context, Result};
use clap::Args;
use tempfile::TempDir;

use super::FetcherOpts;
use crate::config::StorageConfig;
use crate::error::CliError;
use crate::storage::{object_key, upload_file_to_bucket, Bucket, ObjectStoreBucket};
use crate::video::{download_video, VideoSource};

pub const DEFAULT_FOLDER: &str = "youtube";

#[derive(Args, Debug)]
pub struct YoutubeToS3Args {
    /// Video URL
    pub url: String,

    /// Folder (key prefix) in the bucket
    #[arg(long, default_value = DEFAULT_FOLDER)]
    pub folder: String,

    #[command(flatten)]
    pub fetcher: FetcherOpts,
}

pub async fn run(
    global: &crate::GlobalOpts,
    storage: &StorageConfig,
    args: YoutubeToS3Args,
) -> Result<()> {
    println!("🚀 Processing: {}", args.url);

    // Building the client does no I/O; a missing setting fails before the download
    let bucket = ObjectStoreBucket::connect(storage, !global.no_progress)?;
    let source = args.fetcher.source(global);

    let url = transfer(&source, &bucket, &args.url, &args.folder).await?;
    tracing::info!(%url, "Transfer complete");

    println!("✅ Done!");
    Ok(())
}

/// Download into a scoped temporary directory, then upload the file
async fn transfer(
    source: &dyn VideoSource,
    bucket: &dyn Bucket,
    url: &str,
    folder: &str,
) -> Result<String> {
    let temp_dir = TempDir::new().context("Failed to create temporary directory")?;

    let video = download_video(source, url, temp_dir.path())
        .await
        .ok_or(CliError::DownloadFailed)?;

    let key = object_key(folder, &video.path).ok_or_else(|| {
        CliError::InvalidInput(format!("No file name in path: {}", video.path.display()))
    })?;

    let public_url = upload_file_to_bucket(bucket, &video.path, &key)
        .await
        .ok_or(CliError::UploadFailed)?;

    Ok(public_url)
}
