//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in love-core.
//! Each repository handles database operations for a specific domain entity;
//! the reaction repository additionally owns the transactions that keep the
//! event log and the derived aggregates consistent.

mod error;
mod reactant;
mod reacter;
mod reaction;
mod reaction_counter;
mod reaction_total;
mod reaction_type;
mod registration;

pub use reactant::PgReactantRepository;
pub use reacter::PgReacterRepository;
pub use reaction::PgReactionRepository;
pub use reaction_counter::PgReactionCounterRepository;
pub use reaction_total::PgReactionTotalRepository;
pub use reaction_type::PgReactionTypeRepository;
pub use registration::PgRegistrationRepository;
