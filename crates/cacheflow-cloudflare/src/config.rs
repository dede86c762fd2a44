//! Client configuration

use crate::error::{ApiError, Result};

/// Configuration for the Cloudflare API client.
///
/// Zone ids are not part of the configuration: the rulesets API is called
/// for many zones through a single authenticated client, so the zone
/// travels as an argument on every operation.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_token: String,
}

impl ApiConfig {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
        }
    }

    /// Create ApiConfig from environment variables
    pub fn from_env() -> Result<Self> {
        let api_token = std::env::var("CLOUDFLARE_API_TOKEN")
            .map_err(|_| ApiError::MissingEnvVar("CLOUDFLARE_API_TOKEN".to_string()))?;

        Ok(Self { api_token })
    }
}
