//! Cloudflare Rulesets API client for cacheflow
//!
//! This crate speaks the part of the Cloudflare v4 API that cacheflow
//! needs: zone-scoped rulesets in the `http_request_cache_settings`
//! phase. Rules in a ruleset are not independently addressable — every
//! mutation reads and rewrites the full rule list — so the interface here
//! is deliberately collection-shaped; `cacheflow-rules` builds per-rule
//! semantics on top of it.
//!
//! # Requirements
//!
//! - `CLOUDFLARE_API_TOKEN` env var (for the live client)
//!
//! # Example
//!
//! ```ignore
//! use cacheflow_cloudflare::{ApiConfig, CloudflareApi, Rulesets};
//!
//! let api = CloudflareApi::new(ApiConfig::from_env()?);
//! let rulesets = api.list_rulesets("023e105f4ecef8ad9ca31a8372d0c353").await?;
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod rulesets;
pub mod testing;

pub use client::CloudflareApi;
pub use config::ApiConfig;
pub use error::{ApiError, Result};
pub use rulesets::{
    BrowserTtl, CacheKey, CacheReserve, CacheSettings, CustomKey, CustomKeyCookie,
    CustomKeyHeader, CustomKeyHost, CustomKeyQueryString, CustomKeyUser, EdgeTtl, NewRuleset,
    Rule, Ruleset, Rulesets, ServeStale, StatusCodeRange, StatusCodeTtl,
    ACTION_SET_CACHE_SETTINGS, PHASE_CACHE_SETTINGS, RULESET_KIND_ZONE,
};
