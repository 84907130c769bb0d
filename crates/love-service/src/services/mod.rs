//! Business logic services
//!
//! This module contains all service layer implementations that handle
//! business logic, validation, and orchestration of domain operations.

pub mod context;
pub mod error;
pub mod query;
pub mod reaction;
pub mod reaction_type;
pub mod recount;
pub mod registry;

// Re-export all services for convenience
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use query::QueryService;
pub use reaction::ReactionService;
pub use reaction_type::ReactionTypeService;
pub use recount::RecountService;
pub use registry::{load_morph_map, RegistryService};
