//! Reacter entity - identity record for "the actor performing a reaction"
//!
//! Symmetric to [`crate::entities::Reactant`] but for the acting side.

use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Reacter identity, real or absent
#[derive(Debug, Clone)]
pub enum Reacter {
    /// Persisted identity row
    Registered {
        id: Snowflake,
        /// Morph-type string of the owning actor entity
        kind: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    },
    /// Stand-in for an unregistered actor entity
    Null { kind: String },
}

impl Reacter {
    /// Create a registered Reacter
    pub fn registered(id: Snowflake, kind: impl Into<String>) -> Self {
        let now = Utc::now();
        Self::Registered {
            id,
            kind: kind.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a null Reacter for an unregistered entity of `kind`
    pub fn null(kind: impl Into<String>) -> Self {
        Self::Null { kind: kind.into() }
    }

    /// Stable identity, undefined for the null variant
    pub fn id(&self) -> Result<Snowflake, DomainError> {
        match self {
            Self::Registered { id, .. } => Ok(*id),
            Self::Null { .. } => Err(DomainError::ReacterInvalid),
        }
    }

    /// Morph-type string of the owning actor entity
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

    /// Identity comparison: two null reacters are equal to each other,
    /// a null reacter never equals a registered one
    pub fn is_equal_to(&self, other: &Reacter) -> bool {
        match (self, other) {
            (Self::Registered { id: a, .. }, Self::Registered { id: b, .. }) => a == b,
            (Self::Null { .. }, Self::Null { .. }) => true,
            _ => false,
        }
    }
}

impl PartialEq for Reacter {
    fn eq(&self, other: &Self) -> bool {
        self.is_equal_to(other)
    }
}
