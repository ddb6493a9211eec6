//! Error types for the auto-engagement core.

use std::time::Duration;

use uuid::Uuid;

use crate::pipeline::rules::{RuleCondition, RuleKind};

/// Top-level error type for the crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Geolocation error: {0}")]
    Geo(#[from] GeoError),

    #[error("Rule error: {0}")]
    Rule(#[from] RuleError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),
}

/// Storage collaborator errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

/// Geolocation lookup errors.
///
/// These always propagate to the affected candidate pipeline; a failed
/// lookup must never be silently treated as "rule did not pass".
#[derive(Debug, thiserror::Error)]
pub enum GeoError {
    #[error("Geolocation request failed: {reason}")]
    Network { reason: String },

    #[error("Geolocation request timed out after {after:?}")]
    Timeout { after: Duration },

    #[error("Malformed geolocation response: {reason}")]
    MalformedResponse { reason: String },
}

/// Targeting-rule validation and evaluation errors.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("Condition {condition:?} requires a value")]
    MissingValue { condition: RuleCondition },

    #[error("Condition {condition:?} cannot be applied to {kind:?}")]
    InvalidCombination {
        kind: RuleKind,
        condition: RuleCondition,
    },

    #[error("Condition {condition:?} expects a {expected} value")]
    ValueType {
        condition: RuleCondition,
        expected: &'static str,
    },

    #[error("Condition {condition:?} on {kind:?} needs a resolved field value")]
    UnresolvedField {
        kind: RuleKind,
        condition: RuleCondition,
    },
}

/// Per-candidate pipeline errors.
///
/// Caught at the candidate boundary by the orchestrator: a failing candidate
/// is logged and skipped, sibling candidates are unaffected.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Owning user lookup failed: {0}")]
    User(StoreError),

    #[error("Context enrichment failed: {0}")]
    Geo(#[from] GeoError),

    #[error("Rule check failed: {0}")]
    Rule(#[from] RuleError),

    #[error("Conversation creation failed: {0}")]
    Create(StoreError),

    #[error("Conversation {conversation_id} created but message creation failed: {source}")]
    PartialCreate {
        conversation_id: Uuid,
        source: StoreError,
    },
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;
