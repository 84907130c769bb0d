//! Reactant entity - identity record for "the thing being reacted to"
//!
//! The null variant stands in for an application entity that has not been
//! registered yet: reads behave like "no reactions", mutations fail with
//! `ReactantInvalid`.

use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Reactant identity, real or absent
#[derive(Debug, Clone)]
pub enum Reactant {
    /// Persisted identity row
    Registered {
        id: Snowflake,
        /// Morph-type string of the owning application entity
        kind: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    },
    /// Stand-in for an unregistered application entity
    Null { kind: String },
}

impl Reactant {
    /// Create a registered Reactant
    pub fn registered(id: Snowflake, kind: impl Into<String>) -> Self {
        let now = Utc::now();
        Self::Registered {
            id,
            kind: kind.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a null Reactant for an unregistered entity of `kind`
    pub fn null(kind: impl Into<String>) -> Self {
        Self::Null { kind: kind.into() }
    }

    /// Stable identity, undefined for the null variant
    pub fn id(&self) -> Result<Snowflake, DomainError> {
        match self {
            Self::Registered { id, .. } => Ok(*id),
            Self::Null { .. } => Err(DomainError::ReactantInvalid),
        }
    }

    /// Morph-type string of the owning application entity
    pub fn kind(&self) -> &str {
        match self {
            Self::Registered { kind, .. } | Self::Null { kind } => kind,
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null { .. })
    }

    #[inline]
    pub fn is_not_null(&self) -> bool {
        !self.is_null()
    }

    /// Identity comparison: two null reactants are equal to each other,
    /// a null reactant never equals a registered one
    pub fn is_equal_to(&self, other: &Reactant) -> bool {
        match (self, other) {
            (Self::Registered { id: a, .. }, Self::Registered { id: b, .. }) => a == b,
            (Self::Null { .. }, Self::Null { .. }) => true,
            _ => false,
        }
    }
}

impl PartialEq for Reactant {
    fn eq(&self, other: &Self) -> bool {
        self.is_equal_to(other)
    }
}
