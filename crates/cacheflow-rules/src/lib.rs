//! Per-rule cache rule management over shared Cloudflare rulesets
//!
//! Cloudflare exposes cache rules as members of a single zone-scoped
//! ruleset in the `http_request_cache_settings` phase, read and rewritten
//! in its entirety on every mutation. This crate turns that
//! whole-document-replace API into per-rule create/get/update/delete
//! semantics while preserving sibling rules, their order and their
//! identity.
//!
//! # Pieces
//!
//! - [`params`] — the normalized parameter model; every optional field is
//!   an explicit `Option`.
//! - [`codec`] — pure conversion between parameters and the wire format,
//!   plus observation extraction.
//! - [`locator`] — find-or-create of the zone's unique cache-settings
//!   ruleset.
//! - [`slots`] — insert/replace/remove of one slot in the shared rule
//!   sequence, written back wholesale.
//! - [`drift`] — the shallow up-to-date check callers base idempotence
//!   decisions on.
//! - [`manager::CacheRules`] — the facade tying these together.
//!
//! # Concurrency
//!
//! Mutations are read-modify-write cycles with no compare-and-swap: the
//! rule list is read, one slot changed, and the full list written back.
//! Callers mutating two different rules of the same zone concurrently
//! can lose one of the writes. The scheduler this crate is built for
//! serializes per rule, not per zone, so that exposure is real; it is
//! documented (and pinned by a test in [`slots`]) rather than hidden
//! behind locking the underlying API does not have.
//!
//! # Example
//!
//! ```ignore
//! use cacheflow_cloudflare::{ApiConfig, CloudflareApi};
//! use cacheflow_rules::{CacheRuleParameters, CacheRules};
//!
//! let manager = CacheRules::new(CloudflareApi::new(ApiConfig::from_env()?));
//!
//! let params = CacheRuleParameters {
//!     expression: r#"(http.request.uri.path contains "/images/")"#.into(),
//!     ..Default::default()
//! };
//! let observation = manager.create("023e105f4ecef8ad9ca31a8372d0c353", &params).await?;
//! ```

pub mod codec;
pub mod drift;
pub mod error;
pub mod locator;
pub mod manager;
pub mod params;
pub mod slots;

pub use codec::{from_wire, observe, to_wire, Observation};
pub use drift::is_up_to_date;
pub use error::{CacheRuleError, Result};
pub use manager::{CacheRules, ObservedRule};
pub use params::{
    BrowserTtlParameters, CacheKeyParameters, CacheReserveParameters, CacheRuleParameters,
    CacheSettingsParameters, CookieParameters, CustomKeyParameters, EdgeTtlParameters,
    HeaderParameters, HostParameters, QueryStringParameters, ServeStaleParameters,
    StatusCodeRangeParameters, StatusCodeTtlParameters, UserParameters,
};
