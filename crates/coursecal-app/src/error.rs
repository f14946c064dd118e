use std::path::PathBuf;

use thiserror::Error;

/// Application-level errors (CLI layer)
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    ServiceError(#[from] coursecal_service::error::ServiceError),

    #[error(transparent)]
    CoreError(#[from] coursecal_core::error::CoreError),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type AppResult<T> = std::result::Result<T, AppError>;
