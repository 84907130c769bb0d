//! Reaction entity <-> model mapper
//!
//! Fallible on purpose: the stored rate is re-validated on the way out, so a
//! row corrupted by direct log edits surfaces as an error instead of a panic.

use love_core::entities::Reaction;
use love_core::{DomainError, Rate, Snowflake};

use crate::models::ReactionModel;

impl TryFrom<ReactionModel> for Reaction {
    type Error = DomainError;

    fn try_from(model: ReactionModel) -> Result<Self, Self::Error> {
        Ok(Reaction {
            id: Snowflake::new(model.id),
            reactant_id: Snowflake::new(model.reactant_id),
            reacter_id: Snowflake::new(model.reacter_id),
            reaction_type_id: Snowflake::new(model.reaction_type_id),
            rate: Rate::new(model.rate)?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
