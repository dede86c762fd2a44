//! Cloudflare Rulesets API client
//!
//! Direct Cloudflare v4 API implementation using Bearer token
//! authentication.

use crate::config::ApiConfig;
use crate::error::{ApiError, Result};
use crate::rulesets::{NewRuleset, Rule, Ruleset, Rulesets};
use async_trait::async_trait;
use serde::Deserialize;

const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Cloudflare Rulesets API client
pub struct CloudflareApi {
    client: reqwest::Client,
    api_token: String,
    base_url: String,
}

impl CloudflareApi {
    /// Create a new client from configuration
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_token: config.api_token,
            base_url: CLOUDFLARE_API_BASE.to_string(),
        }
    }

    /// Point the client at a different API endpoint (sandbox, proxy).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn ruleset_url(&self, zone_id: &str, ruleset_id: &str) -> String {
        format!("{}/zones/{}/rulesets/{}", self.base_url, zone_id, ruleset_id)
    }

    /// Unwrap the v4 response envelope, mapping `success: false` to an
    /// `ApiError`.
    async fn parse<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
        what: &str,
    ) -> Result<T> {
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(what.to_string()));
        }

        let api_response: ApiResponse<T> = response.json().await?;

        if !api_response.success {
            let (code, message) = api_response
                .errors
                .first()
                .map(|e| (e.code, e.message.clone()))
                .unwrap_or((0, "Unknown error".to_string()));
            return Err(ApiError::Api { code, message });
        }

        api_response
            .result
            .ok_or_else(|| ApiError::NotFound(what.to_string()))
    }
}

#[async_trait]
impl Rulesets for CloudflareApi {
    async fn list_rulesets(&self, zone_id: &str) -> Result<Vec<Ruleset>> {
        let url = format!("{}/zones/{}/rulesets", self.base_url, zone_id);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_token)
            .send()
            .await?;

        self.parse(response, "ruleset list").await
    }

    async fn create_ruleset(&self, zone_id: &str, ruleset: NewRuleset) -> Result<Ruleset> {
        let url = format!("{}/zones/{}/rulesets", self.base_url, zone_id);

        tracing::info!("Creating {} ruleset in zone {}", ruleset.phase, zone_id);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_token)
            .json(&ruleset)
            .send()
            .await?;

        self.parse(response, "created ruleset").await
    }

    async fn get_ruleset(&self, zone_id: &str, ruleset_id: &str) -> Result<Ruleset> {
        let response = self
            .client
            .get(self.ruleset_url(zone_id, ruleset_id))
            .bearer_auth(&self.api_token)
            .send()
            .await?;

        self.parse(response, ruleset_id).await
    }

    async fn update_ruleset(
        &self,
        zone_id: &str,
        ruleset_id: &str,
        rules: Vec<Rule>,
    ) -> Result<Ruleset> {
        tracing::info!(
            "Rewriting ruleset {} in zone {} with {} rules",
            ruleset_id,
            zone_id,
            rules.len()
        );
        let response = self
            .client
            .put(self.ruleset_url(zone_id, ruleset_id))
            .bearer_auth(&self.api_token)
            .json(&UpdateRulesetRequest { rules })
            .send()
            .await?;

        self.parse(response, ruleset_id).await
    }

    async fn delete_ruleset(&self, zone_id: &str, ruleset_id: &str) -> Result<()> {
        tracing::info!("Deleting ruleset {} in zone {}", ruleset_id, zone_id);
        let response = self
            .client
            .delete(self.ruleset_url(zone_id, ruleset_id))
            .bearer_auth(&self.api_token)
            .send()
            .await?;

        // Delete returns an empty body on success rather than an envelope
        // with a result.
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(ruleset_id.to_string()));
        }
        if response.status().is_success() {
            return Ok(());
        }

        let api_response: ApiResponse<serde_json::Value> = response.json().await?;
        let (code, message) = api_response
            .errors
            .first()
            .map(|e| (e.code, e.message.clone()))
            .unwrap_or((0, "Unknown error".to_string()));
        Err(ApiError::Api { code, message })
    }
}

// ============ API Types ============

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    success: bool,
    // No serde(default) here: it would force a `T: Default` bound on the
    // derive, and a missing `Option` field is None anyway.
    result: Option<T>,
    #[serde(default)]
    errors: Vec<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: i32,
    message: String,
}

#[derive(Debug, serde::Serialize)]
struct UpdateRulesetRequest {
    rules: Vec<Rule>,
}
