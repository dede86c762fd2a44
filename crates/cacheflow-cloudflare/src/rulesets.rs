//! Wire-format types for the Cloudflare Rulesets API
//!
//! A ruleset is the unit the API reads and writes: rules are not
//! independently addressable and every mutation replaces the full rule
//! list. Optional fields stay `Option` end to end so "unset" is never
//! confused with "set to false/zero" on the wire.

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ruleset kind for zone-scoped rulesets.
pub const RULESET_KIND_ZONE: &str = "zone";

/// Request-pipeline phase that cache rules run in.
pub const PHASE_CACHE_SETTINGS: &str = "http_request_cache_settings";

/// The only rule action this client deals in.
pub const ACTION_SET_CACHE_SETTINGS: &str = "set_cache_settings";

/// Abstraction over the five ruleset wire operations.
///
/// The HTTP client implements this for the live API; tests substitute the
/// in-memory implementation from [`crate::testing`].
#[async_trait]
pub trait Rulesets: Send + Sync {
    /// List all rulesets in a zone. The API omits rule bodies here; use
    /// [`Rulesets::get_ruleset`] to load them.
    async fn list_rulesets(&self, zone_id: &str) -> Result<Vec<Ruleset>>;

    /// Create a ruleset in a zone.
    async fn create_ruleset(&self, zone_id: &str, ruleset: NewRuleset) -> Result<Ruleset>;

    /// Fetch a single ruleset with its full rule list.
    async fn get_ruleset(&self, zone_id: &str, ruleset_id: &str) -> Result<Ruleset>;

    /// Replace a ruleset's entire rule list. There is no partial-patch
    /// variant; the returned ruleset carries the rewritten sequence.
    async fn update_ruleset(
        &self,
        zone_id: &str,
        ruleset_id: &str,
        rules: Vec<Rule>,
    ) -> Result<Ruleset>;

    /// Delete a ruleset and everything in it.
    async fn delete_ruleset(&self, zone_id: &str, ruleset_id: &str) -> Result<()>;
}

/// A ruleset as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ruleset {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub kind: String,
    pub phase: String,
    #[serde(default, skip_serializing)]
    pub version: Option<String>,
    #[serde(default, skip_serializing)]
    pub last_updated: Option<DateTime<Utc>>,
    /// Omitted by the API when empty and by the list endpoint always.
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl Ruleset {
    /// Whether this is the zone's cache-settings ruleset.
    pub fn is_cache_settings(&self) -> bool {
        self.kind == RULESET_KIND_ZONE && self.phase == PHASE_CACHE_SETTINGS
    }
}

/// Body for ruleset creation.
#[derive(Debug, Clone, Serialize)]
pub struct NewRuleset {
    pub name: String,
    pub description: String,
    pub kind: String,
    pub phase: String,
    pub rules: Vec<Rule>,
}

/// One rule inside a ruleset.
///
/// `id`, `version` and `last_updated` are assigned by the API; a rule that
/// has not been written yet carries none of them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub action: String,
    pub expression: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing)]
    pub version: Option<String>,
    #[serde(default, skip_serializing)]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_parameters: Option<CacheSettings>,
}

/// `action_parameters` for the `set_cache_settings` action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_ttl: Option<EdgeTtl>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser_ttl: Option<BrowserTtl>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serve_stale: Option<ServeStale>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_key: Option<CacheKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_reserve: Option<CacheReserve>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_cache_control: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub respect_strong_etags: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_error_page_passthru: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_cacheable_ports: Option<Vec<u16>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_timeout: Option<u32>,
}

/// Edge cache TTL. `default` is unsigned here: the no-cache sentinel `-1`
/// is only valid inside per-status-code overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeTtl {
    pub mode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code_ttl: Option<Vec<StatusCodeTtl>>,
}

/// TTL override for one status code or a contiguous range.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusCodeTtl {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code_range: Option<StatusCodeRange>,
    /// Seconds; `-1` means "do not cache".
    pub value: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusCodeRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<u16>,
}

/// Browser cache TTL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrowserTtl {
    pub mode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServeStale {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_stale_while_updating: Option<bool>,
}

/// Cache key customization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheKey {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_by_device_type: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_query_strings_order: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_key: Option<CustomKey>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomKey {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_string: Option<CustomKeyQueryString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<CustomKeyHeader>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookie: Option<CustomKeyCookie>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<CustomKeyUser>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<CustomKeyHost>,
}

/// Which query-string parameters participate in the key. `include` and
/// `exclude` are mutually exclusive server-side; both pass through as given.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomKeyQueryString {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomKeyHeader {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_presence: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_origin: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomKeyCookie {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_presence: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomKeyUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_type: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomKeyHost {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved: Option<bool>,
}

/// Cache Reserve eligibility.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheReserve {
    pub eligible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_file_size: Option<u64>,
}
