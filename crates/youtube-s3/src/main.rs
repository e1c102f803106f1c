use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod error;
mod storage;
mod video;

use config::StorageConfig;

#[derive(Parser, Debug)]
#[command(name = "youtube-s3")]
#[command(about = "Download videos and publish them to an S3 bucket")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    global: GlobalOpts,

    #[command(flatten)]
    storage: StorageConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone, Default)]
struct GlobalOpts {
    /// JSON output format (machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable progress bar output (useful for scripts/CI)
    #[arg(long, global = true)]
    no_progress: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Download a video into a temporary directory
    Download(commands::download::DownloadArgs),
    /// Upload a local file to the bucket
    Upload(commands::upload::UploadArgs),
    /// Download a video and upload it to the bucket
    #[command(name = "youtube-to-s3", alias = "youtube-s3")]
    YoutubeToS3(commands::youtube_to_s3::YoutubeToS3Args),
    /// List objects in the bucket
    ListBucket(commands::list_bucket::ListBucketArgs),
    /// Check that the required storage settings are present
    CheckConfig,
}

fn main() -> ExitCode {
    // Real environment variables take precedence over .env entries
    dotenvy::dotenv().ok();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    init_tracing(cli.global.verbose);

    if let Err(e) = run(cli) {
        println!("❌ {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn run(cli: Cli) -> Result<()> {
    tracing::debug!(command = ?cli.command, "Starting youtube-s3");

    match cli.command {
        Commands::Download(args) => commands::download::run(&cli.global, args).await,
        Commands::Upload(args) => commands::upload::run(&cli.global, &cli.storage, args).await,
        Commands::YoutubeToS3(args) => {
            commands::youtube_to_s3::run(&cli.global, &cli.storage, args).await
        }
        Commands::ListBucket(args) => {
            commands::list_bucket::run(&cli.global, &cli.storage, args).await
        }
        Commands::CheckConfig => commands::check_config::run(&cli.global, &cli.storage),
    }
}
