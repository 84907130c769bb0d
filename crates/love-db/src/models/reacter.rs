//! Reacter database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the reacters table
#[derive(Debug, Clone, FromRow)]
pub struct ReacterModel {
    pub id: i64,
    /// Morph-type string of the owning actor entity
    #[sqlx(rename = "type")]
    pub kind: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
