mod ytdlp;

use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

pub use ytdlp::YtDlp;

const FALLBACK_TITLE: &str = "video";

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("invalid video metadata: {0}")]
    Metadata(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Metadata resolved before downloading
#[derive(Debug, Default, Deserialize)]
pub struct VideoInfo {
    #[serde(default)]
    pub title: Option<String>,
}

/// A file fetched into the destination directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedVideo {
    pub path: PathBuf,
    pub title: String,
}

/// Something that can resolve and fetch a single video
#[async_trait]
pub trait VideoSource: Send + Sync {
    async fn probe(&self, url: &str) -> Result<VideoInfo, DownloadError>;

    /// Download the video into `output_dir`, named after its title
    async fn fetch(&self, url: &str, output_dir: &Path) -> Result<(), DownloadError>;
}

/// Download `url` into `output_dir` and return the file that appeared there.
///
/// Errors are printed and reported as `None`. `output_dir` must be empty
/// beforehand: the first regular file found afterwards is taken to be the
/// download.
pub async fn download_video(
    source: &dyn VideoSource,
    url: &str,
    output_dir: &Path,
) -> Option<DownloadedVideo> {
    match try_download(source, url, output_dir).await {
        Ok(video) => video,
        Err(e) => {
            tracing::warn!(url, error = %e, "Download failed");
            println!("❌ Download error: {e}");
            None
        }
    }
}

async fn try_download(
    source: &dyn VideoSource,
    url: &str,
    output_dir: &Path,
) -> Result<Option<DownloadedVideo>, DownloadError> {
    let info = source.probe(url).await?;
    let title = info.title.unwrap_or_else(|| FALLBACK_TITLE.to_string());

    println!("📹 Found: {title}");
    println!("🔽 Downloading...");

    source.fetch(url, output_dir).await?;

    let Some(path) = find_downloaded_file(output_dir)? else {
        tracing::warn!(
            dir = %output_dir.display(),
            "Download reported success but no file was written"
        );
        return Ok(None);
    };

    let name = path.file_name().unwrap_or_default().to_string_lossy();
    println!("✅ Downloaded: {name}");
    Ok(Some(DownloadedVideo { path, title }))
}

/// First regular file in `dir`.
///
/// More than one file (separate streams, subtitle sidecars) is unsupported;
/// the extras are only logged.
pub fn find_downloaded_file(dir: &Path) -> std::io::Result<Option<PathBuf>> {
    let mut found: Option<PathBuf> = None;

    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        match &found {
            None => found = Some(path),
            Some(first) => tracing::warn!(
                chosen = %first.display(),
                ignored = %path.display(),
                "Multiple files after download"
            ),
        }
    }

    Ok(found)
}
