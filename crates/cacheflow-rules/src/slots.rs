//! Slot operations on the shared rule sequence
//!
//! The API has no per-rule endpoints: every mutation here is
//! read-modify-write of the full rule list. There is no version check and
//! no lock around that cycle, so two callers mutating rules in the same
//! zone from the same snapshot will silently drop each other's change —
//! the scheduler above serializes per resource, not per zone, and this
//! module reproduces that exposure rather than papering over it (the
//! lost-update test below pins the interleaving down).

use crate::error::{CacheRuleError, Result};
use cacheflow_cloudflare::{ApiError, Rule, Ruleset, Rulesets};

/// Append an encoded rule to the ruleset and rewrite it, returning the
/// created rule and the rewritten ruleset.
///
/// The update response is the whole sequence, not the created item, so
/// the new rule is identified positionally: the write must grow the
/// sequence by exactly one and the new rule is its last element. A
/// response of any other length is reported as a failed write instead of
/// guessing which element is ours.
pub async fn insert<A: Rulesets + ?Sized>(
    api: &A,
    zone_id: &str,
    ruleset: &Ruleset,
    rule: Rule,
) -> Result<(Rule, Ruleset)> {
    let mut rules = ruleset.rules.clone();
    rules.push(rule);
    let expected = rules.len();

    tracing::info!(
        "Appending cache rule to ruleset {} in zone {} ({} -> {} rules)",
        ruleset.id,
        zone_id,
        expected - 1,
        expected
    );
    let updated = api
        .update_ruleset(zone_id, &ruleset.id, rules)
        .await
        .map_err(CacheRuleError::wrap("create"))?;

    if updated.rules.len() != expected {
        return Err(CacheRuleError::Operation {
            op: "create",
            source: ApiError::Api {
                code: 0,
                message: format!(
                    "expected {} rules after append, API returned {}",
                    expected,
                    updated.rules.len()
                ),
            },
        });
    }

    let created = match updated.rules.last() {
        Some(rule) => rule.clone(),
        None => {
            return Err(CacheRuleError::Operation {
                op: "create",
                source: ApiError::Api {
                    code: 0,
                    message: "update response contained no rules".to_string(),
                },
            })
        }
    };

    Ok((created, updated))
}

/// Overwrite the slot holding `rule_id` with a new rule carrying the same
/// id, leaving every other slot untouched and in order. Returns the
/// replaced rule and the rewritten ruleset as the API handed them back.
///
/// A missing slot is NotFound: the rule this caller thought it owned has
/// drifted away (or lost a race) and should be treated as absent.
pub async fn replace<A: Rulesets + ?Sized>(
    api: &A,
    zone_id: &str,
    ruleset: &Ruleset,
    rule_id: &str,
    mut rule: Rule,
) -> Result<(Rule, Ruleset)> {
    let index = ruleset
        .rules
        .iter()
        .position(|r| r.id.as_deref() == Some(rule_id))
        .ok_or_else(|| CacheRuleError::NotFound(rule_id.to_string()))?;

    rule.id = Some(rule_id.to_string());
    let mut rules = ruleset.rules.clone();
    rules[index] = rule;

    tracing::info!(
        "Replacing cache rule {} in ruleset {} (zone {})",
        rule_id,
        ruleset.id,
        zone_id
    );
    let updated = api
        .update_ruleset(zone_id, &ruleset.id, rules)
        .await
        .map_err(CacheRuleError::wrap("update"))?;

    let replaced = updated
        .rules
        .iter()
        .find(|r| r.id.as_deref() == Some(rule_id))
        .cloned()
        .ok_or_else(|| CacheRuleError::NotFound(rule_id.to_string()))?;

    Ok((replaced, updated))
}

/// Remove the slot holding `rule_id`. When that leaves the sequence
/// empty, the whole ruleset is deleted instead of writing an empty list:
/// the ruleset has no life of its own outside rule membership.
pub async fn remove<A: Rulesets + ?Sized>(
    api: &A,
    zone_id: &str,
    ruleset: &Ruleset,
    rule_id: &str,
) -> Result<()> {
    if !ruleset
        .rules
        .iter()
        .any(|r| r.id.as_deref() == Some(rule_id))
    {
        return Err(CacheRuleError::NotFound(rule_id.to_string()));
    }

    let remaining: Vec<Rule> = ruleset
        .rules
        .iter()
        .filter(|r| r.id.as_deref() != Some(rule_id))
        .cloned()
        .collect();

    if remaining.is_empty() {
        tracing::info!(
            "Removing last cache rule {}; deleting ruleset {} in zone {}",
            rule_id,
            ruleset.id,
            zone_id
        );
        api.delete_ruleset(zone_id, &ruleset.id)
            .await
            .map_err(CacheRuleError::wrap("delete"))?;
    } else {
        tracing::info!(
            "Removing cache rule {} from ruleset {} in zone {} ({} rules remain)",
            rule_id,
            ruleset.id,
            zone_id,
            remaining.len()
        );
        api.update_ruleset(zone_id, &ruleset.id, remaining)
            .await
            .map_err(CacheRuleError::wrap("delete"))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cacheflow_cloudflare::testing::InMemoryRulesets;
    use cacheflow_cloudflare::{
        NewRuleset, ACTION_SET_CACHE_SETTINGS, PHASE_CACHE_SETTINGS, RULESET_KIND_ZONE,
    };

    fn rule(expression: &str) -> Rule {
        Rule {
            id: None,
            action: ACTION_SET_CACHE_SETTINGS.to_string(),
            expression: expression.to_string(),
            description: None,
            enabled: None,
            version: None,
            last_updated: None,
            action_parameters: None,
        }
    }

    async fn seed(api: &InMemoryRulesets, zone: &str, expressions: &[&str]) -> Ruleset {
        api.create_ruleset(
            zone,
            NewRuleset {
                name: "default".to_string(),
                description: String::new(),
                kind: RULESET_KIND_ZONE.to_string(),
                phase: PHASE_CACHE_SETTINGS.to_string(),
                rules: expressions.iter().map(|e| rule(e)).collect(),
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn insert_returns_the_appended_rule_with_identity() {
        let api = InMemoryRulesets::new();
        let ruleset = seed(&api, "z1", &["a"]).await;

        let (created, updated) = insert(&api, "z1", &ruleset, rule("b")).await.unwrap();
        assert_eq!(created.expression, "b");
        assert!(created.id.is_some());
        assert_eq!(updated.rules.len(), 2);
        assert_eq!(updated.rules[1].id, created.id);
    }

    #[tokio::test]
    async fn replace_keeps_index_identity_and_siblings() {
        let api = InMemoryRulesets::new();
        let ruleset = seed(&api, "z1", &["a", "b", "c"]).await;
        let ids: Vec<String> = ruleset.rules.iter().map(|r| r.id.clone().unwrap()).collect();

        let (replaced, rewritten) = replace(&api, "z1", &ruleset, &ids[1], rule("b2"))
            .await
            .unwrap();
        assert_eq!(replaced.id.as_deref(), Some(ids[1].as_str()));
        assert_eq!(replaced.expression, "b2");
        assert_eq!(rewritten.rules.len(), 3);

        let after = api.get_ruleset("z1", &ruleset.id).await.unwrap();
        let after_ids: Vec<&str> = after.rules.iter().filter_map(|r| r.id.as_deref()).collect();
        assert_eq!(after_ids, ids.iter().map(String::as_str).collect::<Vec<_>>());
        let expressions: Vec<&str> = after.rules.iter().map(|r| r.expression.as_str()).collect();
        assert_eq!(expressions, ["a", "b2", "c"]);
    }

    #[tokio::test]
    async fn replace_of_a_vanished_rule_is_not_found() {
        let api = InMemoryRulesets::new();
        let ruleset = seed(&api, "z1", &["a"]).await;

        let err = replace(&api, "z1", &ruleset, "gone", rule("a2"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn remove_preserves_the_order_of_the_rest() {
        let api = InMemoryRulesets::new();
        let ruleset = seed(&api, "z1", &["a", "b", "c"]).await;
        let middle = ruleset.rules[1].id.clone().unwrap();

        remove(&api, "z1", &ruleset, &middle).await.unwrap();

        let after = api.get_ruleset("z1", &ruleset.id).await.unwrap();
        let expressions: Vec<&str> = after.rules.iter().map(|r| r.expression.as_str()).collect();
        assert_eq!(expressions, ["a", "c"]);
    }

    #[tokio::test]
    async fn removing_the_last_rule_deletes_the_ruleset() {
        let api = InMemoryRulesets::new();
        let ruleset = seed(&api, "z1", &["a"]).await;
        let only = ruleset.rules[0].id.clone().unwrap();

        remove(&api, "z1", &ruleset, &only).await.unwrap();

        let err = api.get_ruleset("z1", &ruleset.id).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(api.ruleset_count().await, 0);
    }

    #[tokio::test]
    async fn remove_of_a_vanished_rule_is_not_found() {
        let api = InMemoryRulesets::new();
        let ruleset = seed(&api, "z1", &["a"]).await;

        let err = remove(&api, "z1", &ruleset, "gone").await.unwrap_err();
        assert!(err.is_not_found());
    }

    /// Two inserts working from the same ruleset snapshot: the second
    /// whole-list write discards the first one's rule. Known exposure of
    /// the unguarded read-modify-write cycle; this test exists so the
    /// behavior is visible, not because it is desirable.
    #[tokio::test]
    async fn interleaved_inserts_lose_the_first_write() {
        let api = InMemoryRulesets::new();
        let ruleset = seed(&api, "z1", &["x"]).await;

        let snapshot_a = ruleset.clone();
        let snapshot_b = ruleset.clone();

        let (rule_y, _) = insert(&api, "z1", &snapshot_a, rule("y")).await.unwrap();
        let (_rule_z, after) = insert(&api, "z1", &snapshot_b, rule("z")).await.unwrap();

        let expressions: Vec<&str> = after.rules.iter().map(|r| r.expression.as_str()).collect();
        assert_eq!(expressions, ["x", "z"]);
        assert!(!after.rules.iter().any(|r| r.id == rule_y.id));
    }
}
