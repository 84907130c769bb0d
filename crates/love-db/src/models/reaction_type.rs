//! ReactionType database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the reaction_types table
#[derive(Debug, Clone, FromRow)]
pub struct ReactionTypeModel {
    pub id: i64,
    pub name: String,
    pub mass: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
