//! Domain errors - typed failures raised at the point of detection
//!
//! The maintenance engine never retries or silently corrects; every violation
//! surfaces as one of these variants and aborts the operation.

use thiserror::Error;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Invalid Identity Errors
    // =========================================================================
    #[error("Reactant is not registered")]
    ReactantInvalid,

    #[error("Reacter is not registered")]
    ReacterInvalid,

    #[error("Unknown reactable type: {0}")]
    ReactableInvalid(String),

    #[error("Unknown reacterable type: {0}")]
    ReacterableInvalid(String),

    // =========================================================================
    // Duplicate State Errors
    // =========================================================================
    #[error("Reaction already exists")]
    ReactionAlreadyExists,

    #[error("Reaction type already exists: {0}")]
    ReactionTypeAlreadyExists(String),

    #[error("Reaction counter already exists for this reactant and type")]
    ReactionCounterDuplicate,

    #[error("Reaction total already exists for this reactant")]
    ReactionTotalDuplicate,

    // =========================================================================
    // Missing State Errors
    // =========================================================================
    #[error("Reaction does not exist")]
    ReactionNotExists,

    #[error("Reaction counter is missing for a reactant with live reactions")]
    ReactionCounterMissing,

    #[error("Reaction total is missing for a reactant with live reactions")]
    ReactionTotalMissing,

    // =========================================================================
    // Value Range Errors
    // =========================================================================
    #[error("Rate out of range: {rate} (accepted range 0.01..=99.99)")]
    RateOutOfRange { rate: f64 },

    #[error("New rate equals the current rate")]
    RateInvalid,

    #[error("Mutation attempted on an absent reaction counter")]
    ReactionCounterInvalid,

    #[error("Reaction counter count would drop below zero")]
    ReactionCounterBadValue,

    #[error("Reaction total count would drop below zero")]
    ReactionTotalBadValue,

    #[error("Invalid reaction type name: {0}")]
    ReactionTypeNameInvalid(String),

    // =========================================================================
    // Lookup Errors
    // =========================================================================
    #[error("Unknown reaction type: {0}")]
    ReactionTypeInvalid(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl DomainError {
    /// Get an error code string for log/console output
    pub fn code(&self) -> &'static str {
        match self {
            // Invalid identity
            Self::ReactantInvalid => "REACTANT_INVALID",
            Self::ReacterInvalid => "REACTER_INVALID",
            Self::ReactableInvalid(_) => "REACTABLE_INVALID",
            Self::ReacterableInvalid(_) => "REACTERABLE_INVALID",

            // Duplicate state
            Self::ReactionAlreadyExists => "REACTION_ALREADY_EXISTS",
            Self::ReactionTypeAlreadyExists(_) => "REACTION_TYPE_ALREADY_EXISTS",
            Self::ReactionCounterDuplicate => "REACTION_COUNTER_DUPLICATE",
            Self::ReactionTotalDuplicate => "REACTION_TOTAL_DUPLICATE",

            // Missing state
            Self::ReactionNotExists => "REACTION_NOT_EXISTS",
            Self::ReactionCounterMissing => "REACTION_COUNTER_MISSING",
            Self::ReactionTotalMissing => "REACTION_TOTAL_MISSING",

            // Value range
            Self::RateOutOfRange { .. } => "RATE_OUT_OF_RANGE",
            Self::RateInvalid => "RATE_INVALID",
            Self::ReactionCounterInvalid => "REACTION_COUNTER_INVALID",
            Self::ReactionCounterBadValue => "REACTION_COUNTER_BAD_VALUE",
            Self::ReactionTotalBadValue => "REACTION_TOTAL_BAD_VALUE",
            Self::ReactionTypeNameInvalid(_) => "REACTION_TYPE_NAME_INVALID",

            // Lookup
            Self::ReactionTypeInvalid(_) => "REACTION_TYPE_INVALID",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
        }
    }

    /// Check if this is an invalid-identity error
    pub fn is_invalid_identity(&self) -> bool {
        matches!(
            self,
            Self::ReactantInvalid
                | Self::ReacterInvalid
                | Self::ReactableInvalid(_)
                | Self::ReacterableInvalid(_)
        )
    }

    /// Check if this is a duplicate-state error
    pub fn is_duplicate(&self) -> bool {
        matches!(
            self,
            Self::ReactionAlreadyExists
                | Self::ReactionTypeAlreadyExists(_)
                | Self::ReactionCounterDuplicate
                | Self::ReactionTotalDuplicate
        )
    }

    /// Check if this is a missing-state error
    pub fn is_missing(&self) -> bool {
        matches!(
            self,
            Self::ReactionNotExists | Self::ReactionCounterMissing | Self::ReactionTotalMissing
        )
    }

    /// Check if this is a value-range error
    pub fn is_value_range(&self) -> bool {
        matches!(
            self,
            Self::RateOutOfRange { .. }
                | Self::RateInvalid
                | Self::ReactionCounterInvalid
                | Self::ReactionCounterBadValue
                | Self::ReactionTotalBadValue
                | Self::ReactionTypeNameInvalid(_)
        )
    }
}
