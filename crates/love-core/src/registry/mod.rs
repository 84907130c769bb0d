//! Reactable/reacterable type registry (morph map)
//!
//! Application entities plug into the engine by capability, not inheritance:
//! each participating entity type is described by a [`MorphTypeDef`] naming
//! its morph-type string, the table it lives in, and the foreign-key column
//! that points back at its identity row. Console commands resolve operator
//! input (a kind or one of its aliases) through this map.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Description of one application entity type participating in reactions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MorphTypeDef {
    /// Stable morph-type string stored in the identity rows
    pub kind: String,
    /// Alternative names accepted when resolving operator input
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Table holding the application entity
    pub table: String,
    /// Primary-key column of that table
    pub id_column: String,
    /// Nullable foreign-key column pointing at the identity row
    pub fk_column: String,
}

impl MorphTypeDef {
    /// Create a definition with no aliases
    pub fn new(
        kind: impl Into<String>,
        table: impl Into<String>,
        id_column: impl Into<String>,
        fk_column: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            aliases: Vec::new(),
            table: table.into(),
            id_column: id_column.into(),
            fk_column: fk_column.into(),
        }
    }

    /// Add an accepted alias
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }
}

/// Runtime name -> type-definition registry for both capability sides
#[derive(Debug, Default, Clone)]
pub struct MorphMap {
    reactables: HashMap<String, MorphTypeDef>,
    reacterables: HashMap<String, MorphTypeDef>,
}

impl MorphMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity type that can be reacted to
    pub fn register_reactable(&mut self, def: MorphTypeDef) {
        for alias in &def.aliases {
            self.reactables.insert(alias.clone(), def.clone());
        }
        self.reactables.insert(def.kind.clone(), def);
    }

    /// Register an actor entity type that can react
    pub fn register_reacterable(&mut self, def: MorphTypeDef) {
        for alias in &def.aliases {
            self.reacterables.insert(alias.clone(), def.clone());
        }
        self.reacterables.insert(def.kind.clone(), def);
    }

    /// Resolve a reactable kind or alias
    pub fn resolve_reactable(&self, name: &str) -> Result<&MorphTypeDef, DomainError> {
        self.reactables
            .get(name)
            .ok_or_else(|| DomainError::ReactableInvalid(name.to_string()))
    }

    /// Resolve a reacterable kind or alias
    pub fn resolve_reacterable(&self, name: &str) -> Result<&MorphTypeDef, DomainError> {
        self.reacterables
            .get(name)
            .ok_or_else(|| DomainError::ReacterableInvalid(name.to_string()))
    }

    /// All registered reactable kinds (without aliases)
    pub fn reactable_kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self
            .reactables
            .values()
            .map(|def| def.kind.as_str())
            .collect();
        kinds.sort_unstable();
        kinds.dedup();
        kinds
    }
}
