//! Repository traits (ports)

mod repositories;

pub use repositories::{
    RankedReactant, ReactantRepository, ReacterRepository, ReactionCounterRepository,
    ReactionRepository, ReactionTotalRepository, ReactionTypeRepository, RegistrationRepository,
    RepoResult,
};
