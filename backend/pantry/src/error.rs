use thiserror::Error;

#[derive(Error, Debug)]
pub enum PantryError {
    #[error("Database error: {0}")]
    Database(#[from] redis::RedisError),

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Malformed record: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid object key: {0}")]
    InvalidKey(String),

    #[error("Invalid store url: {0}")]
    InvalidUrl(String),

    #[error("Object not found: {0}")]
    NotFound(String),
}
