//! ReactionTotal entity - per-reactant roll-up across all reaction types
//!
//! Mirrors the counter's null-object contract; mutating the absent total
//! fails with a missing error.

use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Per-reactant aggregate over all counters, real or absent
#[derive(Debug, Clone)]
pub enum ReactionTotal {
    Present {
        id: Snowflake,
        reactant_id: Snowflake,
        count: i64,
        weight: f64,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    },
    Null,
}

impl ReactionTotal {
    /// Create a fresh zeroed total
    pub fn present(id: Snowflake, reactant_id: Snowflake) -> Self {
        let now = Utc::now();
        Self::Present {
            id,
            reactant_id,
            count: 0,
            weight: 0.0,
            created_at: now,
            updated_at: now,
        }
    }

    /// The null-object total
    pub fn null() -> Self {
        Self::Null
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Total number of live reactions to the reactant; zero when absent
    pub fn count(&self) -> i64 {
        match self {
            Self::Present { count, .. } => *count,
            Self::Null => 0,
        }
    }

    /// Total weight of live reactions to the reactant; zero when absent
    pub fn weight(&self) -> f64 {
        match self {
            Self::Present { weight, .. } => *weight,
            Self::Null => 0.0,
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
            Self::Null => Err(DomainError::ReactionTotalMissing),
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
                    return Err(DomainError::ReactionTotalBadValue);
                }
                *count -= 1;
                *weight -= weight_delta;
                *updated_at = Utc::now();
                Ok(())
            }
            Self::Null => Err(DomainError::ReactionTotalMissing),
        }
    }
}

impl PartialEq for ReactionTotal {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Present { id: a, .. }, Self::Present { id: b, .. }) => a == b,
            (Self::Null, Self::Null) => true,
            _ => false,
        }
    }
}
