//! Entity ↔ Model mappers

mod reactant;
mod reacter;
mod reaction;
mod reaction_counter;
mod reaction_total;
mod reaction_type;
