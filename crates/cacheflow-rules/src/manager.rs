//! Cache rule manager
//!
//! Per-rule create/get/update/delete semantics over the zone's shared
//! cache-settings ruleset. Each operation is observe-then-act against the
//! API; nothing is cached between calls and nothing retries — a failed
//! call comes back wrapped and the scheduler above tries again on its own
//! interval.

use crate::codec::{self, Observation};
use crate::error::{CacheRuleError, Result};
use crate::locator;
use crate::params::CacheRuleParameters;
use crate::slots;
use cacheflow_cloudflare::{Rule, Rulesets};

/// A rule read back from the API together with its observation.
#[derive(Debug, Clone)]
pub struct ObservedRule {
    pub rule: Rule,
    pub observation: Observation,
}

/// Manages cache rules inside a zone's shared cache-settings ruleset.
///
/// Rules have no endpoints of their own, so every mutation rewrites the
/// full rule list. The wire-assigned rule id returned from
/// [`CacheRules::create`] is the resource's external identity for all
/// later calls.
pub struct CacheRules<A: Rulesets> {
    api: A,
}

impl<A: Rulesets> CacheRules<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    /// The underlying API client.
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Create a cache rule, lazily creating the zone's cache-settings
    /// ruleset when this is its first rule.
    pub async fn create(
        &self,
        zone_id: &str,
        params: &CacheRuleParameters,
    ) -> Result<Observation> {
        ensure_zone(zone_id)?;

        let ruleset = locator::find_or_create(&self.api, zone_id)
            .await
            .map_err(CacheRuleError::wrap("create"))?;

        let rule = codec::to_wire(params);
        let (created, ruleset) = slots::insert(&self.api, zone_id, &ruleset, rule).await?;

        Ok(codec::observe(&created, &ruleset))
    }

    /// Read a rule back by its wire-assigned id.
    ///
    /// NotFound when the zone has no cache-settings ruleset or the
    /// ruleset no longer contains the rule — either way the resource
    /// should be treated as not created.
    pub async fn get(&self, zone_id: &str, rule_id: &str) -> Result<ObservedRule> {
        ensure_zone(zone_id)?;

        let ruleset = locator::find(&self.api, zone_id)
            .await
            .map_err(CacheRuleError::wrap("get"))?
            .ok_or_else(|| CacheRuleError::NotFound(rule_id.to_string()))?;

        let rule = ruleset
            .rules
            .iter()
            .find(|r| r.id.as_deref() == Some(rule_id))
            .cloned()
            .ok_or_else(|| CacheRuleError::NotFound(rule_id.to_string()))?;

        let observation = codec::observe(&rule, &ruleset);
        Ok(ObservedRule { rule, observation })
    }

    /// Rewrite the rule's slot in place, leaving its id and position and
    /// every sibling untouched.
    pub async fn update(
        &self,
        zone_id: &str,
        rule_id: &str,
        params: &CacheRuleParameters,
    ) -> Result<Observation> {
        ensure_zone(zone_id)?;

        let ruleset = locator::find(&self.api, zone_id)
            .await
            .map_err(CacheRuleError::wrap("update"))?
            .ok_or_else(|| CacheRuleError::NotFound(rule_id.to_string()))?;

        let rule = codec::to_wire(params);
        let (replaced, ruleset) = slots::replace(&self.api, zone_id, &ruleset, rule_id, rule).await?;

        Ok(codec::observe(&replaced, &ruleset))
    }

    /// Remove the rule; the ruleset goes with it when this was its last
    /// member.
    pub async fn delete(&self, zone_id: &str, rule_id: &str) -> Result<()> {
        ensure_zone(zone_id)?;

        let ruleset = locator::find(&self.api, zone_id)
            .await
            .map_err(CacheRuleError::wrap("delete"))?
            .ok_or_else(|| CacheRuleError::NotFound(rule_id.to_string()))?;

        slots::remove(&self.api, zone_id, &ruleset, rule_id).await
    }
}

fn ensure_zone(zone_id: &str) -> Result<()> {
    if zone_id.is_empty() {
        return Err(CacheRuleError::Validation("zone is required".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cacheflow_cloudflare::testing::InMemoryRulesets;

    fn params(expression: &str) -> CacheRuleParameters {
        CacheRuleParameters {
            expression: expression.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn empty_zone_is_rejected_before_any_api_call() {
        let manager = CacheRules::new(InMemoryRulesets::new());

        let err = manager.create("", &params("true")).await.unwrap_err();
        assert!(matches!(err, CacheRuleError::Validation(_)));
        assert_eq!(manager.api.ruleset_count().await, 0);
    }

    #[tokio::test]
    async fn get_on_an_empty_zone_is_not_found() {
        let manager = CacheRules::new(InMemoryRulesets::new());

        let err = manager.get("z1", "nope").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn create_then_get_round_trips_the_identity() {
        let manager = CacheRules::new(InMemoryRulesets::new());

        let created = manager.create("z1", &params("true")).await.unwrap();
        let rule_id = created.rule_id.clone().unwrap();

        let observed = manager.get("z1", &rule_id).await.unwrap();
        assert_eq!(observed.rule.id.as_deref(), Some(rule_id.as_str()));
        assert_eq!(observed.observation.ruleset_id, created.ruleset_id);
        assert!(observed.observation.rule_version.is_some());
    }

    #[tokio::test]
    async fn update_observation_reflects_the_rewritten_ruleset() {
        let manager = CacheRules::new(InMemoryRulesets::new());

        let created = manager.create("z1", &params("a")).await.unwrap();
        let rule_id = created.rule_id.clone().unwrap();

        let updated = manager.update("z1", &rule_id, &params("a2")).await.unwrap();

        // The observation carries the post-write state, not the snapshot
        // the update started from.
        let fresh = manager
            .api()
            .get_ruleset("z1", &updated.ruleset_id)
            .await
            .unwrap();
        assert_eq!(updated.ruleset_last_modified, fresh.last_updated);
        assert_ne!(updated.ruleset_last_modified, created.ruleset_last_modified);
        assert_eq!(updated.rule_id.as_deref(), Some(rule_id.as_str()));
    }

    #[tokio::test]
    async fn update_of_a_deleted_rule_surfaces_as_not_found() {
        let manager = CacheRules::new(InMemoryRulesets::new());

        let a = manager.create("z1", &params("a")).await.unwrap();
        let b = manager.create("z1", &params("b")).await.unwrap();

        let a_id = a.rule_id.unwrap();
        manager.delete("z1", &a_id).await.unwrap();

        let err = manager
            .update("z1", &a_id, &params("a2"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        // The sibling is untouched.
        let b_id = b.rule_id.unwrap();
        assert!(manager.get("z1", &b_id).await.is_ok());
    }
}
