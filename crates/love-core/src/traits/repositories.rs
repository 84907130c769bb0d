//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation. The write paths that touch both the reaction
//! log and the aggregates are single trait methods on purpose: the log
//! mutation and the counter/total updates must share one transaction, so the
//! transaction boundary lives behind the port, not in the caller.

use async_trait::async_trait;

use crate::entities::{Reactant, Reacter, Reaction, ReactionCounter, ReactionTotal, ReactionType};
use crate::error::DomainError;
use crate::registry::MorphTypeDef;
use crate::value_objects::{Rate, Snowflake};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// ReactionType Repository
// ============================================================================

#[async_trait]
pub trait ReactionTypeRepository: Send + Sync {
    /// Find reaction type by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<ReactionType>>;

    /// Find reaction type by exact, case-sensitive name
    async fn find_by_name(&self, name: &str) -> RepoResult<Option<ReactionType>>;

    /// Check if a name is already taken
    async fn name_exists(&self, name: &str) -> RepoResult<bool>;

    /// All registered reaction types
    async fn all(&self) -> RepoResult<Vec<ReactionType>>;

    /// Create a new reaction type; duplicate names fail
    async fn create(&self, reaction_type: &ReactionType) -> RepoResult<()>;
}

// ============================================================================
// Identity Repositories
// ============================================================================

#[async_trait]
pub trait ReactantRepository: Send + Sync {
    /// Find reactant by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Reactant>>;

    /// IDs of all reactants of one morph kind
    async fn ids_by_kind(&self, kind: &str) -> RepoResult<Vec<Snowflake>>;

    /// IDs of all reactants
    async fn all_ids(&self) -> RepoResult<Vec<Snowflake>>;

    /// Create an identity row; fails `ReactantInvalid` for the null variant
    async fn create(&self, reactant: &Reactant) -> RepoResult<()>;
}

#[async_trait]
pub trait ReacterRepository: Send + Sync {
    /// Find reacter by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Reacter>>;

    /// Create an identity row; fails `ReacterInvalid` for the null variant
    async fn create(&self, reacter: &Reacter) -> RepoResult<()>;
}

// ============================================================================
// Reaction Repository
// ============================================================================

#[async_trait]
pub trait ReactionRepository: Send + Sync {
    /// Find the reaction for a (reacter, reactant, type) triple
    async fn find(
        &self,
        reacter_id: Snowflake,
        reactant_id: Snowflake,
        reaction_type_id: Snowflake,
    ) -> RepoResult<Option<Reaction>>;

    /// All live reactions to a reactant, optionally of one type
    async fn find_by_reactant(
        &self,
        reactant_id: Snowflake,
        reaction_type_id: Option<Snowflake>,
    ) -> RepoResult<Vec<Reaction>>;

    /// Insert the reaction and apply the counter/total increments.
    /// The insert and both aggregate updates commit in one transaction.
    async fn record(&self, reaction: &Reaction, weight: f64) -> RepoResult<()>;

    /// Delete the reaction and apply the counter/total decrements. The
    /// decremented weight is `mass` times the rate stored at delete time, so
    /// a rate change racing the delete cannot leave stale weight behind.
    /// Decrements on missing aggregates or below zero abort the transaction.
    async fn remove(&self, reaction: &Reaction, mass: i32) -> RepoResult<()>;

    /// Update a reaction's rate in place and shift the aggregate weights by
    /// `mass` times the difference between `new_rate` and the rate the update
    /// replaced; counts are unchanged
    async fn change_rate(&self, reaction: &Reaction, new_rate: Rate, mass: i32) -> RepoResult<()>;

    /// Existence check, optionally narrowed to a type and/or an exact rate
    async fn exists(
        &self,
        reacter_id: Snowflake,
        reactant_id: Snowflake,
        reaction_type_id: Option<Snowflake>,
        rate: Option<Rate>,
    ) -> RepoResult<bool>;

    /// Reactant IDs the reacter has reacted to, optionally of one type
    async fn reacted_reactant_ids(
        &self,
        reacter_id: Snowflake,
        reaction_type_id: Option<Snowflake>,
    ) -> RepoResult<Vec<Snowflake>>;

    /// Reactant IDs of `kind` the reacter has NOT reacted to
    async fn unreacted_reactant_ids(
        &self,
        reacter_id: Snowflake,
        kind: &str,
        reaction_type_id: Option<Snowflake>,
    ) -> RepoResult<Vec<Snowflake>>;
}

// ============================================================================
// Aggregate Repositories
// ============================================================================

/// One row of a popularity ranking, zero-filled for missing aggregates
#[derive(Debug, Clone, PartialEq)]
pub struct RankedReactant {
    pub reactant_id: Snowflake,
    pub count: i64,
    pub weight: f64,
}

#[async_trait]
pub trait ReactionCounterRepository: Send + Sync {
    /// Counter for a (reactant, type) pair; the null object when absent
    async fn find(
        &self,
        reactant_id: Snowflake,
        reaction_type_id: Snowflake,
    ) -> RepoResult<ReactionCounter>;

    /// All counters belonging to a reactant
    async fn find_by_reactant(&self, reactant_id: Snowflake) -> RepoResult<Vec<ReactionCounter>>;

    /// Create a counter row; a second row for the same (reactant, type) fails
    /// `ReactionCounterDuplicate`
    async fn create(&self, counter: &ReactionCounter) -> RepoResult<()>;

    /// Apply one reaction of weight `weight` to the counter, creating it
    /// first when absent (atomic upsert)
    async fn increment(
        &self,
        reactant_id: Snowflake,
        reaction_type_id: Snowflake,
        weight: f64,
    ) -> RepoResult<()>;

    /// Zero count and weight in place without deleting rows, optionally only
    /// for one type; returns the number of counters touched
    async fn reset(
        &self,
        reactant_id: Snowflake,
        reaction_type_id: Option<Snowflake>,
    ) -> RepoResult<u64>;

    /// Reactants of `kind` ranked by this type's counter, missing counters
    /// coalesced to zero
    async fn rank_by_type(
        &self,
        kind: &str,
        reaction_type_id: Snowflake,
        limit: i64,
    ) -> RepoResult<Vec<RankedReactant>>;
}

#[async_trait]
pub trait ReactionTotalRepository: Send + Sync {
    /// Total for a reactant; the null object when absent
    async fn find_by_reactant(&self, reactant_id: Snowflake) -> RepoResult<ReactionTotal>;

    /// Create a total row; a second row for the same reactant fails
    /// `ReactionTotalDuplicate`
    async fn create(&self, total: &ReactionTotal) -> RepoResult<()>;

    /// Recompute the total as the sum over ALL of the reactant's counters,
    /// creating the row first when absent; returns the stored total
    async fn recompute(&self, reactant_id: Snowflake) -> RepoResult<ReactionTotal>;

    /// Reactants of `kind` ranked by total, missing totals coalesced to zero
    async fn rank(&self, kind: &str, limit: i64) -> RepoResult<Vec<RankedReactant>>;
}

// ============================================================================
// Registration Repository
// ============================================================================

#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    /// Whether `def.fk_column` already exists on `def.table`
    async fn fk_column_exists(&self, def: &MorphTypeDef) -> RepoResult<bool>;

    /// Add the nullable identity FK column to `def.table`, referencing
    /// `identity_table`; fails when the column already exists
    async fn add_fk_column(&self, def: &MorphTypeDef, identity_table: &str) -> RepoResult<()>;

    /// IDs of rows in `def.table` whose identity FK is still NULL, optionally
    /// restricted to the listed IDs
    async fn unregistered_ids(
        &self,
        def: &MorphTypeDef,
        ids: Option<&[i64]>,
    ) -> RepoResult<Vec<i64>>;

    /// Create the reactant identity row and backfill the entity's FK column,
    /// one transaction
    async fn attach_reactant(
        &self,
        def: &MorphTypeDef,
        entity_id: i64,
        reactant: &Reactant,
    ) -> RepoResult<()>;

    /// Create the reacter identity row and backfill the entity's FK column,
    /// one transaction
    async fn attach_reacter(
        &self,
        def: &MorphTypeDef,
        entity_id: i64,
        reacter: &Reacter,
    ) -> RepoResult<()>;
}
