//! ReactionCounter database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the reaction_counters table
#[derive(Debug, Clone, FromRow)]
pub struct ReactionCounterModel {
    pub id: i64,
    pub reactant_id: i64,
    pub reaction_type_id: i64,
    pub count: i64,
    pub weight: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One row of a popularity ranking (from a LEFT JOIN query)
#[derive(Debug, Clone, FromRow)]
pub struct RankedReactantModel {
    pub reactant_id: i64,
    pub count: i64,
    pub weight: f64,
}
