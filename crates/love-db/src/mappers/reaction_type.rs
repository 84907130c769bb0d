//! ReactionType entity <-> model mapper

use love_core::entities::ReactionType;
use love_core::Snowflake;

use crate::models::ReactionTypeModel;

impl From<ReactionTypeModel> for ReactionType {
    fn from(model: ReactionTypeModel) -> Self {
        ReactionType {
            id: Snowflake::new(model.id),
            name: model.name,
            mass: model.mass,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
