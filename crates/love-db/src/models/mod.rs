//! Database models - SQLx-compatible structs for PostgreSQL tables

mod reactant;
mod reacter;
mod reaction;
mod reaction_counter;
mod reaction_total;
mod reaction_type;

pub use reactant::ReactantModel;
pub use reacter::ReacterModel;
pub use reaction::ReactionModel;
pub use reaction_counter::{RankedReactantModel, ReactionCounterModel};
pub use reaction_total::ReactionTotalModel;
pub use reaction_type::ReactionTypeModel;
