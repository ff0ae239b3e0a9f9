use thiserror::Error;

pub type Result<T> = std::result::Result<T, ResultsError>;

#[derive(Error, Debug)]
pub enum ResultsError {
    #[error("store error: {0}")]
    Store(#[from] querylens_store::StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed interpreted results: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed history config: {0}")]
    Config(#[from] toml::de::Error),

    /// Interpretation needs query metadata it does not have. Raw results
    /// stay viewable when this happens.
    #[error("can't interpret results without query metadata: missing {0}")]
    MissingMetadata(&'static str),
}
