//! # love-service
//!
//! Application layer containing business logic, services, and DTOs.
//!
//! Services orchestrate the repository ports from `love-core`: the reacter
//! mutation API, aggregate rebuild, morph-map registration, reaction type
//! management, and the read-only query facade.

pub mod dto;
pub mod services;

pub use services::{
    load_morph_map, QueryService, ReactionService, ReactionTypeService, RecountService,
    RegistryService, ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult,
};
