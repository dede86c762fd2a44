//! Locating the zone's cache-settings ruleset
//!
//! Each zone holds at most one ruleset for the cache-settings phase; the
//! locator finds it or creates an empty one. "At most one" is what the
//! API shows at call time — nothing here can stop two concurrent callers
//! from both observing "none" and both creating (see the crate docs).

use cacheflow_cloudflare::error::Result;
use cacheflow_cloudflare::{NewRuleset, Ruleset, Rulesets, PHASE_CACHE_SETTINGS, RULESET_KIND_ZONE};

/// Name given to the ruleset when this crate creates it. Cloudflare's own
/// dashboard-created phase rulesets are named "default" too.
pub const MANAGED_RULESET_NAME: &str = "default";

/// Description given to the ruleset when this crate creates it.
pub const MANAGED_RULESET_DESCRIPTION: &str = "Cache rules managed by cacheflow";

/// Find the zone's cache-settings ruleset with its full rule list, or
/// `None` if the zone has none.
///
/// The list endpoint omits rule bodies, so a hit costs a second read.
pub async fn find<A: Rulesets + ?Sized>(api: &A, zone_id: &str) -> Result<Option<Ruleset>> {
    let rulesets = api.list_rulesets(zone_id).await?;

    let found = rulesets.into_iter().find(|r| r.is_cache_settings());
    match found {
        Some(ruleset) => {
            tracing::debug!(
                "Found cache-settings ruleset {} in zone {}",
                ruleset.id,
                zone_id
            );
            let full = api.get_ruleset(zone_id, &ruleset.id).await?;
            Ok(Some(full))
        }
        None => {
            tracing::debug!("Zone {} has no cache-settings ruleset", zone_id);
            Ok(None)
        }
    }
}

/// Find the zone's cache-settings ruleset, creating an empty one when the
/// zone has none.
pub async fn find_or_create<A: Rulesets + ?Sized>(api: &A, zone_id: &str) -> Result<Ruleset> {
    if let Some(ruleset) = find(api, zone_id).await? {
        return Ok(ruleset);
    }

    tracing::info!("Creating cache-settings ruleset in zone {}", zone_id);
    api.create_ruleset(
        zone_id,
        NewRuleset {
            name: MANAGED_RULESET_NAME.to_string(),
            description: MANAGED_RULESET_DESCRIPTION.to_string(),
            kind: RULESET_KIND_ZONE.to_string(),
            phase: PHASE_CACHE_SETTINGS.to_string(),
            rules: Vec::new(),
        },
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use cacheflow_cloudflare::testing::InMemoryRulesets;

    #[tokio::test]
    async fn creates_an_empty_ruleset_when_the_zone_has_none() {
        let api = InMemoryRulesets::new();

        let ruleset = find_or_create(&api, "z1").await.unwrap();
        assert_eq!(ruleset.kind, RULESET_KIND_ZONE);
        assert_eq!(ruleset.phase, PHASE_CACHE_SETTINGS);
        assert_eq!(ruleset.name, MANAGED_RULESET_NAME);
        assert!(ruleset.rules.is_empty());
        assert_eq!(api.ruleset_count().await, 1);
    }

    #[tokio::test]
    async fn returns_the_existing_ruleset_instead_of_creating_another() {
        let api = InMemoryRulesets::new();
        let first = find_or_create(&api, "z1").await.unwrap();

        let second = find_or_create(&api, "z1").await.unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(api.ruleset_count().await, 1);
    }

    #[tokio::test]
    async fn ignores_rulesets_from_other_phases() {
        let api = InMemoryRulesets::new();
        api.create_ruleset(
            "z1",
            NewRuleset {
                name: "default".to_string(),
                description: String::new(),
                kind: RULESET_KIND_ZONE.to_string(),
                phase: "http_request_firewall_custom".to_string(),
                rules: Vec::new(),
            },
        )
        .await
        .unwrap();

        assert!(find(&api, "z1").await.unwrap().is_none());

        let created = find_or_create(&api, "z1").await.unwrap();
        assert_eq!(created.phase, PHASE_CACHE_SETTINGS);
        assert_eq!(api.ruleset_count().await, 2);
    }

    #[tokio::test]
    async fn zones_do_not_share_rulesets() {
        let api = InMemoryRulesets::new();
        let z1 = find_or_create(&api, "z1").await.unwrap();
        let z2 = find_or_create(&api, "z2").await.unwrap();
        assert_ne!(z1.id, z2.id);
    }
}
