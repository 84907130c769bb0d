//! ReactionTotal database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the reaction_totals table
#[derive(Debug, Clone, FromRow)]
pub struct ReactionTotalModel {
    pub id: i64,
    pub reactant_id: i64,
    pub count: i64,
    pub weight: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
