//! ReactionCounter entity <-> model mapper

use love_core::entities::ReactionCounter;
use love_core::traits::RankedReactant;
use love_core::Snowflake;

use crate::models::{RankedReactantModel, ReactionCounterModel};

impl From<ReactionCounterModel> for ReactionCounter {
    fn from(model: ReactionCounterModel) -> Self {
        ReactionCounter::Present {
            id: Snowflake::new(model.id),
            reactant_id: Snowflake::new(model.reactant_id),
            reaction_type_id: Snowflake::new(model.reaction_type_id),
            count: model.count,
            weight: model.weight,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<RankedReactantModel> for RankedReactant {
    fn from(model: RankedReactantModel) -> Self {
        RankedReactant {
            reactant_id: Snowflake::new(model.reactant_id),
            count: model.count,
            weight: model.weight,
        }
    }
}
