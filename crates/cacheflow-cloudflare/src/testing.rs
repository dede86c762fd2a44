//! In-memory [`Rulesets`] implementation for tests
//!
//! Behaves like the live API where the manager can tell the difference:
//! assigns opaque ids, stamps versions and timestamps, omits rule bodies
//! from the list endpoint, and 404s on unknown ruleset ids. It does NOT
//! add any concurrency control the live API lacks, so lost-update
//! interleavings can be reproduced against it.

use crate::error::{ApiError, Result};
use crate::rulesets::{NewRuleset, Rule, Ruleset, Rulesets};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;

/// In-memory ruleset store keyed by (zone, ruleset id).
#[derive(Default)]
pub struct InMemoryRulesets {
    state: Mutex<HashMap<(String, String), Ruleset>>,
    next_id: AtomicU64,
}

impl InMemoryRulesets {
    pub fn new() -> Self {
        Self::default()
    }

    fn fresh_id(&self, prefix: &str) -> String {
        let n = self.next_id.fetch_add(1, Ordering::Relaxed);
        format!("{}-{:08x}", prefix, n)
    }

    /// Stamp ids on new rules and bump versions, the way the API does on
    /// every write.
    fn stamp(&self, rules: &mut [Rule]) {
        let now = Utc::now();
        for rule in rules {
            if rule.id.is_none() {
                rule.id = Some(self.fresh_id("rule"));
            }
            let version: u64 = rule
                .version
                .as_deref()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0);
            rule.version = Some((version + 1).to_string());
            rule.last_updated = Some(now);
        }
    }

    /// Number of rulesets currently stored, across all zones.
    pub async fn ruleset_count(&self) -> usize {
        self.state.lock().await.len()
    }
}

#[async_trait]
impl Rulesets for InMemoryRulesets {
    async fn list_rulesets(&self, zone_id: &str) -> Result<Vec<Ruleset>> {
        let state = self.state.lock().await;
        Ok(state
            .iter()
            .filter(|((zone, _), _)| zone == zone_id)
            .map(|(_, ruleset)| {
                // The list endpoint never carries rule bodies.
                let mut listed = ruleset.clone();
                listed.rules = Vec::new();
                listed
            })
            .collect())
    }

    async fn create_ruleset(&self, zone_id: &str, ruleset: NewRuleset) -> Result<Ruleset> {
        let mut state = self.state.lock().await;
        let id = self.fresh_id("ruleset");
        let mut rules = ruleset.rules;
        self.stamp(&mut rules);

        let created = Ruleset {
            id: id.clone(),
            name: ruleset.name,
            description: Some(ruleset.description),
            kind: ruleset.kind,
            phase: ruleset.phase,
            version: Some("1".to_string()),
            last_updated: Some(Utc::now()),
            rules,
        };
        state.insert((zone_id.to_string(), id), created.clone());
        Ok(created)
    }

    async fn get_ruleset(&self, zone_id: &str, ruleset_id: &str) -> Result<Ruleset> {
        let state = self.state.lock().await;
        state
            .get(&(zone_id.to_string(), ruleset_id.to_string()))
            .cloned()
            .ok_or_else(|| ApiError::NotFound(ruleset_id.to_string()))
    }

    async fn update_ruleset(
        &self,
        zone_id: &str,
        ruleset_id: &str,
        mut rules: Vec<Rule>,
    ) -> Result<Ruleset> {
        let mut state = self.state.lock().await;
        let key = (zone_id.to_string(), ruleset_id.to_string());
        let ruleset = state
            .get_mut(&key)
            .ok_or_else(|| ApiError::NotFound(ruleset_id.to_string()))?;

        self.stamp(&mut rules);
        let version: u64 = ruleset
            .version
            .as_deref()
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);
        ruleset.version = Some((version + 1).to_string());
        ruleset.last_updated = Some(Utc::now());
        ruleset.rules = rules;
        Ok(ruleset.clone())
    }

    async fn delete_ruleset(&self, zone_id: &str, ruleset_id: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        state
            .remove(&(zone_id.to_string(), ruleset_id.to_string()))
            .map(|_| ())
            .ok_or_else(|| ApiError::NotFound(ruleset_id.to_string()))
    }
}
