//! Normalized cache-rule parameter model
//!
//! The shape callers describe a cache rule in, independent of the wire
//! format. Every optional field is an explicit `Option` so "unset" stays
//! distinguishable from "set to false/zero" through every conversion
//! layer; nothing here collapses to a default silently.
//!
//! TTLs are signed in this model. The API wants unsigned values for
//! top-level defaults, but per-status-code overrides accept `-1` as a
//! "do not cache" sentinel, and that distinction is preserved here and in
//! the codec.

use serde::{Deserialize, Serialize};

/// Desired state of one cache rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheRuleParameters {
    /// Boolean matching predicate, e.g.
    /// `(http.request.uri.path contains "/images/")`.
    pub expression: String,

    pub description: Option<String>,

    /// Tri-state: absent means "let the API decide".
    pub enabled: Option<bool>,

    /// Cache-settings bundle; absent means the rule carries no
    /// `action_parameters` at all.
    pub settings: Option<CacheSettingsParameters>,
}

/// The `set_cache_settings` action-parameter bundle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheSettingsParameters {
    /// Whether to cache at all.
    pub cache: Option<bool>,

    pub edge_ttl: Option<EdgeTtlParameters>,

    pub browser_ttl: Option<BrowserTtlParameters>,

    pub serve_stale: Option<ServeStaleParameters>,

    pub cache_key: Option<CacheKeyParameters>,

    pub cache_reserve: Option<CacheReserveParameters>,

    /// Honor origin Cache-Control headers.
    pub origin_cache_control: Option<bool>,

    pub respect_strong_etags: Option<bool>,

    /// Serve origin error pages instead of Cloudflare's.
    pub origin_error_page_passthru: Option<bool>,

    /// Ports beyond 80/443 whose responses are cacheable.
    pub additional_cacheable_ports: Option<Vec<u16>>,

    /// Origin read timeout in seconds.
    pub read_timeout: Option<i64>,
}

/// Edge cache TTL settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeTtlParameters {
    /// `respect_origin`, `bypass_by_default` or `override_origin`.
    pub mode: String,

    /// Seconds. Top-level defaults must be non-negative; the `-1`
    /// sentinel is only valid in [`StatusCodeTtlParameters::value`].
    pub default: Option<i64>,

    pub status_code_ttl: Option<Vec<StatusCodeTtlParameters>>,
}

/// TTL override for one status code or range.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusCodeTtlParameters {
    pub status_code: Option<u16>,

    pub status_code_range: Option<StatusCodeRangeParameters>,

    /// Seconds; `-1` means "do not cache".
    pub value: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusCodeRangeParameters {
    pub from: Option<u16>,
    pub to: Option<u16>,
}

/// Browser cache TTL settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrowserTtlParameters {
    pub mode: String,
    pub default: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServeStaleParameters {
    pub disable_stale_while_updating: Option<bool>,
}

/// Cache key customization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheKeyParameters {
    pub cache_by_device_type: Option<bool>,
    pub ignore_query_strings_order: Option<bool>,
    pub custom_key: Option<CustomKeyParameters>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomKeyParameters {
    pub query_string: Option<QueryStringParameters>,
    pub header: Option<HeaderParameters>,
    pub cookie: Option<CookieParameters>,
    pub user: Option<UserParameters>,
    pub host: Option<HostParameters>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryStringParameters {
    pub include: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeaderParameters {
    pub include: Option<Vec<String>>,
    pub check_presence: Option<Vec<String>>,
    pub exclude_origin: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CookieParameters {
    pub include: Option<Vec<String>>,
    pub check_presence: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserParameters {
    pub device_type: Option<bool>,
    pub geo: Option<bool>,
    pub lang: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HostParameters {
    pub resolved: Option<bool>,
}

/// Cache Reserve settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheReserveParameters {
    pub eligible: bool,
    /// Bytes.
    pub minimum_file_size: Option<i64>,
}
