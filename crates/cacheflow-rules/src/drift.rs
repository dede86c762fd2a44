//! Drift detection between desired parameters and an observed wire rule
//!
//! Deliberately shallow: only expression, description and enabled are
//! compared. Nested action parameters (TTLs, cache key, reserve, ...) are
//! NOT inspected, so a rule whose edge TTL drifted server-side still
//! reads as up to date as long as the three compared fields match. This
//! precision gap is part of the contract callers make idempotence
//! decisions against; widening it changes reconcile behavior and must
//! not happen casually.

use crate::params::CacheRuleParameters;
use cacheflow_cloudflare::Rule;

/// Whether the observed rule already reflects the desired parameters.
pub fn is_up_to_date(desired: &CacheRuleParameters, observed: &Rule) -> bool {
    if desired.expression != observed.expression {
        return false;
    }

    // An unset description and an empty one are the same thing.
    let desired_description = desired.description.as_deref().unwrap_or("");
    let observed_description = observed.description.as_deref().unwrap_or("");
    if desired_description != observed_description {
        return false;
    }

    // Enabled only counts when both sides say something.
    if let (Some(desired), Some(observed)) = (desired.enabled, observed.enabled) {
        if desired != observed {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{CacheSettingsParameters, EdgeTtlParameters};
    use cacheflow_cloudflare::{CacheSettings, EdgeTtl, ACTION_SET_CACHE_SETTINGS};

    fn observed(expression: &str, description: Option<&str>, enabled: Option<bool>) -> Rule {
        Rule {
            id: Some("abc123".to_string()),
            action: ACTION_SET_CACHE_SETTINGS.to_string(),
            expression: expression.to_string(),
            description: description.map(String::from),
            enabled,
            version: Some("2".to_string()),
            last_updated: None,
            action_parameters: None,
        }
    }

    fn desired(expression: &str) -> CacheRuleParameters {
        CacheRuleParameters {
            expression: expression.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn expression_mismatch_always_means_drift() {
        let want = desired("http.host eq \"a.example.com\"");
        let have = observed("http.host eq \"b.example.com\"", None, None);
        assert!(!is_up_to_date(&want, &have));
    }

    #[test]
    fn unset_and_empty_description_are_equal() {
        let mut want = desired("true");
        want.description = None;
        let have = observed("true", Some(""), None);
        assert!(is_up_to_date(&want, &have));

        want.description = Some("caching".to_string());
        assert!(!is_up_to_date(&want, &have));
    }

    #[test]
    fn unset_enabled_means_dont_care() {
        let want = desired("true");
        assert!(is_up_to_date(&want, &observed("true", None, Some(false))));
        assert!(is_up_to_date(&want, &observed("true", None, Some(true))));

        let mut want = desired("true");
        want.enabled = Some(true);
        assert!(!is_up_to_date(&want, &observed("true", None, Some(false))));
        // Observed side unset: still don't care.
        assert!(is_up_to_date(&want, &observed("true", None, None)));
    }

    #[test]
    fn nested_parameter_drift_is_not_detected() {
        let mut want = desired("true");
        want.settings = Some(CacheSettingsParameters {
            edge_ttl: Some(EdgeTtlParameters {
                mode: "override_origin".to_string(),
                default: Some(60),
                status_code_ttl: None,
            }),
            ..Default::default()
        });

        let mut have = observed("true", None, None);
        have.action_parameters = Some(CacheSettings {
            edge_ttl: Some(EdgeTtl {
                mode: "override_origin".to_string(),
                default: Some(7200),
                status_code_ttl: None,
            }),
            ..Default::default()
        });

        // TTLs differ but expression/description/enabled match, so this
        // reads as up to date. That is the documented behavior.
        assert!(is_up_to_date(&want, &have));
    }
}
