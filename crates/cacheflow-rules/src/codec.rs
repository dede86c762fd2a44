//! Conversion between normalized parameters and the wire format
//!
//! Pure, total, no errors: unsupported combinations pass through as-is and
//! the API rejects them server-side. Absent options map to absent wire
//! fields in both directions, so a round trip reproduces every settable
//! field exactly, including the absent-vs-false distinction on booleans
//! and the `-1` no-cache sentinel in per-status-code TTL overrides.

use crate::params::{
    BrowserTtlParameters, CacheKeyParameters, CacheReserveParameters, CacheRuleParameters,
    CacheSettingsParameters, CookieParameters, CustomKeyParameters, EdgeTtlParameters,
    HeaderParameters, HostParameters, QueryStringParameters, ServeStaleParameters,
    StatusCodeRangeParameters, StatusCodeTtlParameters, UserParameters,
};
use cacheflow_cloudflare::{
    BrowserTtl, CacheKey, CacheReserve, CacheSettings, CustomKey, CustomKeyCookie,
    CustomKeyHeader, CustomKeyHost, CustomKeyQueryString, CustomKeyUser, EdgeTtl, Rule, Ruleset,
    ServeStale, StatusCodeRange, StatusCodeTtl, ACTION_SET_CACHE_SETTINGS,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Read-back state surfaced to the reconciliation layer after an
/// operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    /// Wire-assigned rule id; the resource's external identity.
    pub rule_id: Option<String>,
    /// The shared ruleset the rule lives in.
    pub ruleset_id: String,
    pub rule_version: Option<String>,
    pub rule_last_updated: Option<DateTime<Utc>>,
    pub ruleset_last_modified: Option<DateTime<Utc>>,
}

/// Build the observation for one rule inside its ruleset.
pub fn observe(rule: &Rule, ruleset: &Ruleset) -> Observation {
    Observation {
        rule_id: rule.id.clone(),
        ruleset_id: ruleset.id.clone(),
        rule_version: rule.version.clone(),
        rule_last_updated: rule.last_updated,
        ruleset_last_modified: ruleset.last_updated,
    }
}

/// Encode desired parameters as a wire rule with no identity yet.
pub fn to_wire(params: &CacheRuleParameters) -> Rule {
    Rule {
        id: None,
        action: ACTION_SET_CACHE_SETTINGS.to_string(),
        expression: params.expression.clone(),
        description: params.description.clone(),
        enabled: params.enabled,
        version: None,
        last_updated: None,
        action_parameters: params.settings.as_ref().map(settings_to_wire),
    }
}

/// Decode a wire rule back into normalized parameters.
pub fn from_wire(rule: &Rule) -> CacheRuleParameters {
    CacheRuleParameters {
        expression: rule.expression.clone(),
        description: rule.description.clone(),
        enabled: rule.enabled,
        settings: rule.action_parameters.as_ref().map(settings_from_wire),
    }
}

/// Top-level TTL defaults are unsigned on the wire; the codec stays total
/// by clamping instead of failing, and the API rejects anything the clamp
/// let through that it should not have.
fn unsigned_ttl(value: i64) -> u32 {
    value.clamp(0, i64::from(u32::MAX)) as u32
}

fn unsigned_size(value: i64) -> u64 {
    value.max(0) as u64
}

fn signed_size(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn settings_to_wire(settings: &CacheSettingsParameters) -> CacheSettings {
    CacheSettings {
        cache: settings.cache,
        edge_ttl: settings.edge_ttl.as_ref().map(edge_ttl_to_wire),
        browser_ttl: settings.browser_ttl.as_ref().map(|ttl| BrowserTtl {
            mode: ttl.mode.clone(),
            default: ttl.default.map(unsigned_ttl),
        }),
        serve_stale: settings.serve_stale.as_ref().map(|stale| ServeStale {
            disable_stale_while_updating: stale.disable_stale_while_updating,
        }),
        cache_key: settings.cache_key.as_ref().map(cache_key_to_wire),
        cache_reserve: settings.cache_reserve.as_ref().map(|reserve| CacheReserve {
            eligible: reserve.eligible,
            minimum_file_size: reserve.minimum_file_size.map(unsigned_size),
        }),
        origin_cache_control: settings.origin_cache_control,
        respect_strong_etags: settings.respect_strong_etags,
        origin_error_page_passthru: settings.origin_error_page_passthru,
        additional_cacheable_ports: settings.additional_cacheable_ports.clone(),
        read_timeout: settings.read_timeout.map(unsigned_ttl),
    }
}

fn settings_from_wire(settings: &CacheSettings) -> CacheSettingsParameters {
    CacheSettingsParameters {
        cache: settings.cache,
        edge_ttl: settings.edge_ttl.as_ref().map(edge_ttl_from_wire),
        browser_ttl: settings.browser_ttl.as_ref().map(|ttl| BrowserTtlParameters {
            mode: ttl.mode.clone(),
            default: ttl.default.map(i64::from),
        }),
        serve_stale: settings
            .serve_stale
            .as_ref()
            .map(|stale| ServeStaleParameters {
                disable_stale_while_updating: stale.disable_stale_while_updating,
            }),
        cache_key: settings.cache_key.as_ref().map(cache_key_from_wire),
        cache_reserve: settings
            .cache_reserve
            .as_ref()
            .map(|reserve| CacheReserveParameters {
                eligible: reserve.eligible,
                minimum_file_size: reserve.minimum_file_size.map(signed_size),
            }),
        origin_cache_control: settings.origin_cache_control,
        respect_strong_etags: settings.respect_strong_etags,
        origin_error_page_passthru: settings.origin_error_page_passthru,
        additional_cacheable_ports: settings.additional_cacheable_ports.clone(),
        read_timeout: settings.read_timeout.map(i64::from),
    }
}

fn edge_ttl_to_wire(ttl: &EdgeTtlParameters) -> EdgeTtl {
    EdgeTtl {
        mode: ttl.mode.clone(),
        default: ttl.default.map(unsigned_ttl),
        status_code_ttl: ttl.status_code_ttl.as_ref().map(|overrides| {
            overrides
                .iter()
                .map(|o| StatusCodeTtl {
                    status_code: o.status_code,
                    status_code_range: o.status_code_range.as_ref().map(|r| StatusCodeRange {
                        from: r.from,
                        to: r.to,
                    }),
                    // Signed on the wire too: -1 is a valid override.
                    value: o.value,
                })
                .collect()
        }),
    }
}

fn edge_ttl_from_wire(ttl: &EdgeTtl) -> EdgeTtlParameters {
    EdgeTtlParameters {
        mode: ttl.mode.clone(),
        default: ttl.default.map(i64::from),
        status_code_ttl: ttl.status_code_ttl.as_ref().map(|overrides| {
            overrides
                .iter()
                .map(|o| StatusCodeTtlParameters {
                    status_code: o.status_code,
                    status_code_range: o.status_code_range.as_ref().map(|r| {
                        StatusCodeRangeParameters {
                            from: r.from,
                            to: r.to,
                        }
                    }),
                    value: o.value,
                })
                .collect()
        }),
    }
}

fn cache_key_to_wire(key: &CacheKeyParameters) -> CacheKey {
    CacheKey {
        cache_by_device_type: key.cache_by_device_type,
        ignore_query_strings_order: key.ignore_query_strings_order,
        custom_key: key.custom_key.as_ref().map(|custom| CustomKey {
            query_string: custom
                .query_string
                .as_ref()
                .map(|qs| CustomKeyQueryString {
                    include: qs.include.clone(),
                    exclude: qs.exclude.clone(),
                }),
            header: custom.header.as_ref().map(|header| CustomKeyHeader {
                include: header.include.clone(),
                check_presence: header.check_presence.clone(),
                exclude_origin: header.exclude_origin,
            }),
            cookie: custom.cookie.as_ref().map(|cookie| CustomKeyCookie {
                include: cookie.include.clone(),
                check_presence: cookie.check_presence.clone(),
            }),
            user: custom.user.as_ref().map(|user| CustomKeyUser {
                device_type: user.device_type,
                geo: user.geo,
                lang: user.lang,
            }),
            host: custom.host.as_ref().map(|host| CustomKeyHost {
                resolved: host.resolved,
            }),
        }),
    }
}

fn cache_key_from_wire(key: &CacheKey) -> CacheKeyParameters {
    CacheKeyParameters {
        cache_by_device_type: key.cache_by_device_type,
        ignore_query_strings_order: key.ignore_query_strings_order,
        custom_key: key.custom_key.as_ref().map(|custom| CustomKeyParameters {
            query_string: custom
                .query_string
                .as_ref()
                .map(|qs| QueryStringParameters {
                    include: qs.include.clone(),
                    exclude: qs.exclude.clone(),
                }),
            header: custom.header.as_ref().map(|header| HeaderParameters {
                include: header.include.clone(),
                check_presence: header.check_presence.clone(),
                exclude_origin: header.exclude_origin,
            }),
            cookie: custom.cookie.as_ref().map(|cookie| CookieParameters {
                include: cookie.include.clone(),
                check_presence: cookie.check_presence.clone(),
            }),
            user: custom.user.as_ref().map(|user| UserParameters {
                device_type: user.device_type,
                geo: user.geo,
                lang: user.lang,
            }),
            host: custom.host.as_ref().map(|host| HostParameters {
                resolved: host.resolved,
            }),
        }),
    }
}
