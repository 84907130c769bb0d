//! Registry service - register application entities with the engine
//!
//! Entities opt in by kind: the morph map names the table, primary key, and
//! nullable FK column pointing at the identity row. Registration creates an
//! identity row per unregistered instance and backfills its FK, idempotent
//! per instance.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, instrument};

use love_core::entities::{Reactant, Reacter};
use love_core::registry::{MorphMap, MorphTypeDef};

use crate::dto::RegistrationReport;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// On-disk shape of a morph-map file
#[derive(Debug, Deserialize)]
struct MorphMapFile {
    #[serde(default)]
    reactables: Vec<MorphTypeDef>,
    #[serde(default)]
    reacterables: Vec<MorphTypeDef>,
}

/// Load a morph map from a JSON file
pub fn load_morph_map(path: impl AsRef<Path>) -> ServiceResult<MorphMap> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|e| {
        ServiceError::validation(format!("cannot read morph map {}: {e}", path.display()))
    })?;
    let file: MorphMapFile = serde_json::from_str(&raw).map_err(|e| {
        ServiceError::validation(format!("malformed morph map {}: {e}", path.display()))
    })?;

    let mut map = MorphMap::new();
    for def in file.reactables {
        map.register_reactable(def);
    }
    for def in file.reacterables {
        map.register_reacterable(def);
    }
    Ok(map)
}

/// Registry service
pub struct RegistryService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> RegistryService<'a> {
    /// Create a new RegistryService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Add the reactant FK column to the entity table of `kind`
    ///
    /// Refuses with a conflict when the column already exists; unknown kinds
    /// fail `ReactableInvalid`.
    #[instrument(skip(self))]
    pub async fn setup_reactable(&self, kind: &str) -> ServiceResult<MorphTypeDef> {
        let def = self.ctx.morph_map().resolve_reactable(kind)?.clone();
        if self.ctx.registration_repo().fk_column_exists(&def).await? {
            return Err(ServiceError::conflict(format!(
                "column {} already exists on table {}",
                def.fk_column, def.table
            )));
        }

        self.ctx
            .registration_repo()
            .add_fk_column(&def, "reactants")
            .await?;

        info!(table = %def.table, column = %def.fk_column, "Reactable set up");
        Ok(def)
    }

    /// Add the reacter FK column to the actor entity table of `kind`
    ///
    /// Symmetric to [`Self::setup_reactable`]; unknown kinds fail
    /// `ReacterableInvalid`.
    #[instrument(skip(self))]
    pub async fn setup_reacterable(&self, kind: &str) -> ServiceResult<MorphTypeDef> {
        let def = self.ctx.morph_map().resolve_reacterable(kind)?.clone();
        if self.ctx.registration_repo().fk_column_exists(&def).await? {
            return Err(ServiceError::conflict(format!(
                "column {} already exists on table {}",
                def.fk_column, def.table
            )));
        }

        self.ctx
            .registration_repo()
            .add_fk_column(&def, "reacters")
            .await?;

        info!(table = %def.table, column = %def.fk_column, "Reacterable set up");
        Ok(def)
    }

    /// Register reactant identities for entities of `kind`
    ///
    /// Only instances whose FK column is still NULL are touched; passing
    /// `ids` restricts the run to those instances. Unknown kinds fail
    /// `ReactableInvalid`.
    #[instrument(skip(self))]
    pub async fn register_reactants(
        &self,
        kind: &str,
        ids: Option<&[i64]>,
    ) -> ServiceResult<RegistrationReport> {
        let def = self.ctx.morph_map().resolve_reactable(kind)?.clone();
        let pending = self
            .ctx
            .registration_repo()
            .unregistered_ids(&def, ids)
            .await?;

        let requested = ids.map_or(pending.len(), <[i64]>::len);
        let mut report = RegistrationReport {
            kind: def.kind.clone(),
            registered: 0,
            skipped: (requested - pending.len()) as u64,
        };

        for entity_id in pending {
            let reactant = Reactant::registered(self.ctx.generate_id(), def.kind.clone());
            self.ctx
                .registration_repo()
                .attach_reactant(&def, entity_id, &reactant)
                .await?;
            report.registered += 1;
        }

        info!(
            kind = %report.kind,
            registered = report.registered,
            skipped = report.skipped,
            "Reactant registration finished"
        );
        Ok(report)
    }

    /// Register reacter identities for actor entities of `kind`
    ///
    /// Symmetric to [`Self::register_reactants`]; unknown kinds fail
    /// `ReacterableInvalid`.
    #[instrument(skip(self))]
    pub async fn register_reacters(
        &self,
        kind: &str,
        ids: Option<&[i64]>,
    ) -> ServiceResult<RegistrationReport> {
        let def = self.ctx.morph_map().resolve_reacterable(kind)?.clone();
        let pending = self
            .ctx
            .registration_repo()
            .unregistered_ids(&def, ids)
            .await?;

        let requested = ids.map_or(pending.len(), <[i64]>::len);
        let mut report = RegistrationReport {
            kind: def.kind.clone(),
            registered: 0,
            skipped: (requested - pending.len()) as u64,
        };

        for entity_id in pending {
            let reacter = Reacter::registered(self.ctx.generate_id(), def.kind.clone());
            self.ctx
                .registration_repo()
                .attach_reacter(&def, entity_id, &reacter)
                .await?;
            report.registered += 1;
        }

        info!(
            kind = %report.kind,
            registered = report.registered,
            skipped = report.skipped,
            "Reacter registration finished"
        );
        Ok(report)
    }
}
