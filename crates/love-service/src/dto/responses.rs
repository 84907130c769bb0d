//! Response DTOs for console and structured output
//!
//! Snowflake IDs are serialized as strings so downstream JSON consumers do
//! not lose precision on 64-bit values.

use serde::Serialize;

use love_core::entities::ReactionType;
use love_core::traits::RankedReactant;

/// One reaction type, as printed by `add-type` and `seed-types`
#[derive(Debug, Clone, Serialize)]
pub struct ReactionTypeResponse {
    pub id: String,
    pub name: String,
    pub mass: i32,
}

impl From<&ReactionType> for ReactionTypeResponse {
    fn from(reaction_type: &ReactionType) -> Self {
        Self {
            id: reaction_type.id.to_string(),
            name: reaction_type.name.clone(),
            mass: reaction_type.mass,
        }
    }
}

/// Outcome of seeding the default reaction types
#[derive(Debug, Clone, Serialize)]
pub struct SeedReport {
    pub created: Vec<ReactionTypeResponse>,
    pub skipped: Vec<String>,
}

/// One row of a popularity ranking
#[derive(Debug, Clone, Serialize)]
pub struct RankedReactantResponse {
    pub reactant_id: String,
    pub count: i64,
    pub weight: f64,
}

impl From<RankedReactant> for RankedReactantResponse {
    fn from(row: RankedReactant) -> Self {
        Self {
            reactant_id: row.reactant_id.to_string(),
            count: row.count,
            weight: row.weight,
        }
    }
}

/// Outcome of a recount run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RecountReport {
    /// Reactants whose aggregates were reset and replayed
    pub rebuilt: u64,
    /// Reactants skipped because they had no counters and no reactions
    pub skipped: u64,
    /// Reactions replayed across all rebuilt reactants
    pub reactions_replayed: u64,
}

/// Outcome of a batch registration run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RegistrationReport {
    /// Morph kind the run was scoped to
    pub kind: String,
    /// Entities that received a new identity row
    pub registered: u64,
    /// Entities that already had one (or were not found)
    pub skipped: u64,
}
