//! Reacter entity <-> model mapper

use love_core::entities::Reacter;
use love_core::Snowflake;

use crate::models::ReacterModel;

impl From<ReacterModel> for Reacter {
    fn from(model: ReacterModel) -> Self {
        Reacter::Registered {
            id: Snowflake::new(model.id),
            kind: model.kind,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
