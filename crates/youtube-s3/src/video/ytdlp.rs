use async_trait::async_trait;
use indicatif::ProgressBar;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;
use tokio::process::Command;

use super::{DownloadError, VideoInfo, VideoSource};

/// Best single-file stream no taller than 720p
const FORMAT_SELECTOR: &str = "best[height<=720]";
const OUTPUT_TEMPLATE: &str = "%(title)s.%(ext)s";

/// `VideoSource` driving the yt-dlp executable
#[derive(Debug, Clone)]
pub struct YtDlp {
    program: PathBuf,
    show_progress: bool,
}

impl YtDlp {
    pub fn new(program: impl Into<PathBuf>, show_progress: bool) -> Self {
        Self {
            program: program.into(),
            show_progress,
        }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("--no-playlist").arg("--no-warnings");
        cmd
    }

    async fn run(&self, mut cmd: Command) -> Result<Output, DownloadError> {
        let program = self.program.display().to_string();
        tracing::debug!(?cmd, "Running yt-dlp");

        let output = cmd
            .output()
            .await
            .map_err(|source| DownloadError::Spawn {
                program: program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(DownloadError::Failed {
                program,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output)
    }

    fn download_args(&self, url: &str, output_dir: &Path) -> Command {
        let mut cmd = self.command();
        cmd.arg("--format")
            .arg(FORMAT_SELECTOR)
            .arg("--output")
            .arg(output_dir.join(OUTPUT_TEMPLATE))
            .arg("--quiet")
            .arg(url);
        cmd
    }
}

#[async_trait]
impl VideoSource for YtDlp {
    async fn probe(&self, url: &str) -> Result<VideoInfo, DownloadError> {
        let mut cmd = self.command();
        cmd.arg("--dump-single-json").arg("--skip-download").arg(url);

        let output = self.run(cmd).await?;
        Ok(serde_json::from_slice(&output.stdout)?)
    }

    async fn fetch(&self, url: &str, output_dir: &Path) -> Result<(), DownloadError> {
        let spinner = self.show_progress.then(|| {
            let pb = ProgressBar::new_spinner();
            pb.set_message(url.to_string());
            pb.enable_steady_tick(Duration::from_millis(120));
            pb
        });

        let result = self.run(self.download_args(url, output_dir)).await;

        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }
        result.map(|_| ())
    }
}
