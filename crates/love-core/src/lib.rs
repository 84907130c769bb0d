//! # love-core
//!
//! Domain layer containing entities, value objects, repository traits, and the
//! reactable/reacterable type registry.
//! This crate has zero dependencies on infrastructure (database, CLI, etc.).

pub mod entities;
pub mod error;
pub mod registry;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    Reactant, Reacter, Reaction, ReactionCounter, ReactionTotal, ReactionType,
};
pub use error::DomainError;
pub use registry::{MorphMap, MorphTypeDef};
pub use traits::{
    ReactantRepository, ReacterRepository, ReactionCounterRepository, ReactionRepository,
    ReactionTotalRepository, ReactionTypeRepository, RegistrationRepository, RepoResult,
};
pub use value_objects::{Rate, Snowflake, SnowflakeGenerator, SnowflakeParseError};
