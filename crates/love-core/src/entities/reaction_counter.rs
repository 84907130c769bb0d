//! ReactionCounter entity - cached count and weight per (reactant, type)
//!
//! The null variant is returned when no counter row exists for a queried type:
//! it reads as zero and fails on any mutation. Counts never drop below zero;
//! a decrement that would is a hard invariant violation, not a clamp.

use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Per (reactant, reaction type) aggregate, real or absent
#[derive(Debug, Clone)]
pub enum ReactionCounter {
    Present {
        id: Snowflake,
        reactant_id: Snowflake,
        reaction_type_id: Snowflake,
        count: i64,
        weight: f64,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    },
    Null,
}

impl ReactionCounter {
    /// Create a fresh zeroed counter
    pub fn present(id: Snowflake, reactant_id: Snowflake, reaction_type_id: Snowflake) -> Self {
        let now = Utc::now();
        Self::Present {
            id,
            reactant_id,
            reaction_type_id,
            count: 0,
            weight: 0.0,
            created_at: now,
            updated_at: now,
        }
    }

    /// The null-object counter
    pub fn null() -> Self {
        Self::Null
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Number of live reactions covered by this counter; zero when absent
    pub fn count(&self) -> i64 {
        match self {
            Self::Present { count, .. } => *count,
            Self::Null => 0,
        }
    }

    /// Sum of `mass * rate` over the covered reactions; zero when absent
    pub fn weight(&self) -> f64 {
        match self {
            Self::Present { weight, .. } => *weight,
            Self::Null => 0.0,
        }
    }

    /// Reaction type covered by this counter, if it exists
    pub fn reaction_type_id(&self) -> Option<Snowflake> {
        match self {
            Self::Present {
                reaction_type_id, ..
            } => Some(*reaction_type_id),
            Self::Null => None,
        }
    }

    /// Record one reaction of weight `weight_delta`
    pub fn increment(&mut self, weight_delta: f64) -> Result<(), DomainError> {
        match self {
            Self::Present {
                count,
                weight,
                updated_at,
                ..
            } => {
                *count += 1;
                *weight += weight_delta;
                *updated_at = Utc::now();
                Ok(())
            }
            Self::Null => Err(DomainError::ReactionCounterInvalid),
        }
    }

    /// Remove one reaction of weight `weight_delta`
    pub fn decrement(&mut self, weight_delta: f64) -> Result<(), DomainError> {
        match self {
            Self::Present {
                count,
                weight,
                updated_at,
                ..
            } => {
                if *count < 1 {
                    return Err(DomainError::ReactionCounterBadValue);
                }
                *count -= 1;
                *weight -= weight_delta;
                *updated_at = Utc::now();
                Ok(())
            }
            Self::Null => Err(DomainError::ReactionCounterInvalid),
        }
    }
}

impl PartialEq for ReactionCounter {
    /// Identity comparison; two null counters are equal, a null counter never
    /// equals a present one
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Present { id: a, .. }, Self::Present { id: b, .. }) => a == b,
            (Self::Null, Self::Null) => true,
            _ => false,
        }
    }
}
