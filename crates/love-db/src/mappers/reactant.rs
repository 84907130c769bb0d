//! Reactant entity <-> model mapper

use love_core::entities::Reactant;
use love_core::Snowflake;

use crate::models::ReactantModel;

impl From<ReactantModel> for Reactant {
    fn from(model: ReactantModel) -> Self {
        Reactant::Registered {
            id: Snowflake::new(model.id),
            kind: model.kind,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
