use std::path::PathBuf;

use thiserror::Error;

/// Problems with the source or destination layout. All of them are detected
/// before anything is written.
#[derive(Debug, Error)]
pub enum PathError {
    #[error("{} does not exist", .0.display())]
    SourceMissing(PathBuf),
    #[error("{} is not a mina project path: {missing} is missing", .root.display())]
    NotAProject {
        root: PathBuf,
        missing: &'static str,
    },
    #[error("{} is not empty, the i18n mina project path must be empty or not exist", .0.display())]
    DestinationNotEmpty(PathBuf),
    #[error("{} lies inside the source project {}", .destination.display(), .project.display())]
    DestinationInsideSource {
        project: PathBuf,
        destination: PathBuf,
    },
    #[error("{} already exists in the output", .0.display())]
    Collision(PathBuf),
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Args(#[from] clap::Error),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error(transparent)]
    Path(#[from] PathError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Mt(#[from] mina_i18n_mt::MtError),
}
