//! Cache rule error types

use cacheflow_cloudflare::ApiError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheRuleError {
    /// The rule (or the ruleset it should live in) does not exist. For a
    /// managed resource this means "recreate it", never "crash": a rule
    /// that drifted away externally or lost a race surfaces here too.
    #[error("Cache rule not found: {0}")]
    NotFound(String),

    /// A precondition failed before any API call was attempted.
    #[error("Invalid cache rule: {0}")]
    Validation(String),

    /// The underlying API call failed for a reason other than not-found.
    /// Never retried here; the outer scheduler retries on its own
    /// interval.
    #[error("failed to {op} cache rule: {source}")]
    Operation { op: &'static str, source: ApiError },
}

impl CacheRuleError {
    /// Whether the caller should treat the managed resource as absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CacheRuleError::NotFound(_))
    }

    /// Wrap an [`ApiError`] with the operation it happened during,
    /// letting not-found pass through as [`CacheRuleError::NotFound`].
    pub(crate) fn wrap(op: &'static str) -> impl FnOnce(ApiError) -> CacheRuleError {
        move |source| match source {
            ApiError::NotFound(what) => CacheRuleError::NotFound(what),
            source => CacheRuleError::Operation { op, source },
        }
    }
}

pub type Result<T> = std::result::Result<T, CacheRuleError>;
