use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Selector error: {0}")]
    Selector(String),
    #[error("Unknown mail kind: {0}")]
    InvalidKind(String),
    #[error("Unexpected status {status} for {url}")]
    Status { status: StatusCode, url: String },
    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, BotError>;
