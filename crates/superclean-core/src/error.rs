use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Error walking directory tree: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Root '{}' does not exist or is not a directory", .0.display())]
    InvalidRoot(PathBuf),

    #[error("{0}")]
    PreconditionFailed(String),

    #[error("Listing candidate files failed: {0}")]
    CandidateListing(String),

    #[error("Failed to delete '{}': {source}", path.display())]
    DeletionFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory '{}' is not empty, refusing to delete it", path.display())]
    DirectoryNotEmpty { path: PathBuf },
}
