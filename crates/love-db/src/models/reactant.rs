//! Reactant database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the reactants table
#[derive(Debug, Clone, FromRow)]
pub struct ReactantModel {
    pub id: i64,
    /// Morph-type string of the owning application entity
    #[sqlx(rename = "type")]
    pub kind: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
