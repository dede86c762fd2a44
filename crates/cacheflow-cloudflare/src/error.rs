//! Cloudflare API error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Cloudflare API error {code}: {message}")]
    Api { code: i32, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl ApiError {
    /// Whether this error means the requested object does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
