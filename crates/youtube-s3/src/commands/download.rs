use anyhow::{Context, Result};
use clap::Args;
use tempfile::TempDir;

use super::FetcherOpts;
use crate::error::CliError;
use crate::video::download_video;

#[derive(Args, Debug)]
pub struct DownloadArgs {
    /// Video URL
    pub url: String,

    #[command(flatten)]
    pub fetcher: FetcherOpts,
}

/// Download into a temporary directory that is removed when the command ends
pub async fn run(global: &crate::GlobalOpts, args: DownloadArgs) -> Result<()> {
    let source = args.fetcher.source(global);
    let temp_dir = TempDir::new().context("Failed to create temporary directory")?;

    println!("🚀 Downloading from: {}", args.url);

    let video = download_video(&source, &args.url, temp_dir.path())
        .await
        .ok_or(CliError::DownloadFailed)?;

    tracing::info!(title = %video.title, "Download complete");
    println!("✅ Saved to: {}", video.path.display());
    Ok(())
}
