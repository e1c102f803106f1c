use clap::Args;

use crate::video::YtDlp;

pub mod check_config;
pub mod download;
pub mod list_bucket;
pub mod output;
pub mod upload;
pub mod youtube_to_s3;

/// Options for the external video fetcher
#[derive(Args, Debug, Clone)]
pub struct FetcherOpts {
    /// yt-dlp executable to run
    #[arg(long = "yt-dlp", env = "YT_DLP_PATH", default_value = "yt-dlp")]
    pub yt_dlp: String,
}

impl FetcherOpts {
    pub fn source(&self, global: &crate::GlobalOpts) -> YtDlp {
        YtDlp::new(&self.yt_dlp, !global.no_progress)
    }
}
