//! ReactionTotal entity <-> model mapper

use love_core::entities::ReactionTotal;
use love_core::Snowflake;

use crate::models::ReactionTotalModel;

impl From<ReactionTotalModel> for ReactionTotal {
    fn from(model: ReactionTotalModel) -> Self {
        ReactionTotal::Present {
            id: Snowflake::new(model.id),
            reactant_id: Snowflake::new(model.reactant_id),
            count: model.count,
            weight: model.weight,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
