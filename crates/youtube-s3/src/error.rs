use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Download failed")]
    DownloadFailed,

    #[error("Upload failed")]
    UploadFailed,

    #[error(
        "Missing variables: {}. Create a .env file with the required variables",
        .0.join(", ")
    )]
    IncompleteConfig(Vec<&'static str>),
}
