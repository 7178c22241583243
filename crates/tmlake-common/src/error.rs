use thiserror::Error;

#[derive(Debug, Error)]
pub enum TmlakeError {
    #[error("scrape of {target} failed: {message}")]
    Scrape { target: String, message: String },
    #[error("invalid oid: {0}")]
    InvalidOid(String),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TmlakeError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Scrape { .. } => "scrape",
            Self::InvalidOid(_) => "invalid_oid",
            Self::Config(_) => "config",
            Self::Json(_) => "json",
            Self::Io(_) => "io",
        }
    }
}

pub type Result<T> = std::result::Result<T, TmlakeError>;
