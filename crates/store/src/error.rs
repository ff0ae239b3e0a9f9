use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed engine output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("engine exited with {code:?}: {stderr}")]
    Engine { code: Option<i32>, stderr: String },

    #[error("no results at {0}")]
    UnknownResults(PathBuf),
}
