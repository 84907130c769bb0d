//! # love-db
//!
//! Database layer implementing repository traits with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! This crate provides PostgreSQL implementations for all repository traits
//! defined in `love-core`. It handles:
//!
//! - Connection pool management and schema migrations
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ Model mappers
//! - Repository implementations, including the transactional write paths
//!   that keep the reaction log and its aggregates consistent
//!
//! ## Usage
//!
//! ```rust,ignore
//! use love_db::pool::{create_pool, DatabaseConfig};
//! use love_db::repositories::PgReactionRepository;
//! use love_core::{ReactionRepository, SnowflakeGenerator};
//! use std::sync::Arc;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env();
//!     let pool = create_pool(&config).await?;
//!     let ids = Arc::new(SnowflakeGenerator::new(0));
//!     let reaction_repo = PgReactionRepository::new(pool, ids);
//!
//!     // Use the repository...
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, create_pool_from_env, run_migrations, DatabaseConfig, PgPool};
pub use repositories::{
    PgReactantRepository, PgReacterRepository, PgReactionCounterRepository,
    PgReactionRepository, PgReactionTotalRepository, PgReactionTypeRepository,
    PgRegistrationRepository,
};
