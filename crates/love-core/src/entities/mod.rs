//! Domain entities

mod reactant;
mod reacter;
mod reaction;
mod reaction_counter;
mod reaction_total;
mod reaction_type;

pub use reactant::Reactant;
pub use reacter::Reacter;
pub use reaction::Reaction;
pub use reaction_counter::ReactionCounter;
pub use reaction_total::ReactionTotal;
pub use reaction_type::ReactionType;
