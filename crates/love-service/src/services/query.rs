//! Query service - the read-only facade
//!
//! Pure reads composed from the repository ports, with no new state. Reads
//! go to the aggregate tables (O(1) per lookup), never by summing the
//! reaction log; missing aggregates read as zero through the null objects.

use tracing::instrument;

use love_core::entities::{Reactant, Reacter};
use love_core::traits::RankedReactant;
use love_core::{DomainError, Rate, Snowflake};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Query service
pub struct QueryService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> QueryService<'a> {
    /// Create a new QueryService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Whether `reacter` has reacted to `reactant`, optionally narrowed to a
    /// type name and/or an exact rate
    ///
    /// Null objects on either side answer false instead of failing.
    #[instrument(skip(self, reacter, reactant))]
    pub async fn is_reacted_by(
        &self,
        reacter: &Reacter,
        reactant: &Reactant,
        type_name: Option<&str>,
        rate: Option<Rate>,
    ) -> ServiceResult<bool> {
        let (Ok(reacter_id), Ok(reactant_id)) = (reacter.id(), reactant.id()) else {
            return Ok(false);
        };

        let reaction_type_id = match type_name {
            Some(name) => Some(self.resolve_type_id(name).await?),
            None => None,
        };

        Ok(self
            .ctx
            .reaction_repo()
            .exists(reacter_id, reactant_id, reaction_type_id, rate)
            .await?)
    }

    /// Negation of [`Self::is_reacted_by`]
    pub async fn is_not_reacted_by(
        &self,
        reacter: &Reacter,
        reactant: &Reactant,
        type_name: Option<&str>,
        rate: Option<Rate>,
    ) -> ServiceResult<bool> {
        Ok(!self
            .is_reacted_by(reacter, reactant, type_name, rate)
            .await?)
    }

    /// Count of reactions of the named type; 0 when the counter is absent
    #[instrument(skip(self, reactant))]
    pub async fn reactions_count_for_type(
        &self,
        reactant: &Reactant,
        type_name: &str,
    ) -> ServiceResult<i64> {
        let reaction_type_id = self.resolve_type_id(type_name).await?;
        let Ok(reactant_id) = reactant.id() else {
            return Ok(0);
        };

        let counter = self
            .ctx
            .counter_repo()
            .find(reactant_id, reaction_type_id)
            .await?;
        Ok(counter.count())
    }

    /// Summed weight of reactions of the named type; 0 when absent
    #[instrument(skip(self, reactant))]
    pub async fn reactions_weight_for_type(
        &self,
        reactant: &Reactant,
        type_name: &str,
    ) -> ServiceResult<f64> {
        let reaction_type_id = self.resolve_type_id(type_name).await?;
        let Ok(reactant_id) = reactant.id() else {
            return Ok(0.0);
        };

        let counter = self
            .ctx
            .counter_repo()
            .find(reactant_id, reaction_type_id)
            .await?;
        Ok(counter.weight())
    }

    /// Count across all types; 0 when the total is absent
    #[instrument(skip(self, reactant))]
    pub async fn reactions_total_count(&self, reactant: &Reactant) -> ServiceResult<i64> {
        let Ok(reactant_id) = reactant.id() else {
            return Ok(0);
        };

        let total = self.ctx.total_repo().find_by_reactant(reactant_id).await?;
        Ok(total.count())
    }

    /// Weight across all types; 0 when the total is absent
    #[instrument(skip(self, reactant))]
    pub async fn reactions_total_weight(&self, reactant: &Reactant) -> ServiceResult<f64> {
        let Ok(reactant_id) = reactant.id() else {
            return Ok(0.0);
        };

        let total = self.ctx.total_repo().find_by_reactant(reactant_id).await?;
        Ok(total.weight())
    }

    /// Reactant IDs the reacter has reacted to, optionally of one type name
    #[instrument(skip(self, reacter))]
    pub async fn reacted_to_ids(
        &self,
        reacter: &Reacter,
        type_name: Option<&str>,
    ) -> ServiceResult<Vec<Snowflake>> {
        let Ok(reacter_id) = reacter.id() else {
            return Ok(Vec::new());
        };

        let reaction_type_id = match type_name {
            Some(name) => Some(self.resolve_type_id(name).await?),
            None => None,
        };

        Ok(self
            .ctx
            .reaction_repo()
            .reacted_reactant_ids(reacter_id, reaction_type_id)
            .await?)
    }

    /// Reactant IDs of `kind` the reacter has NOT reacted to
    #[instrument(skip(self, reacter))]
    pub async fn not_reacted_to_ids(
        &self,
        reacter: &Reacter,
        kind: &str,
        type_name: Option<&str>,
    ) -> ServiceResult<Vec<Snowflake>> {
        let def = self.ctx.morph_map().resolve_reactable(kind)?.clone();
        let Ok(reacter_id) = reacter.id() else {
            // A null reacter has reacted to nothing, so every reactant counts
            return Ok(self.ctx.reactant_repo().ids_by_kind(&def.kind).await?);
        };

        let reaction_type_id = match type_name {
            Some(name) => Some(self.resolve_type_id(name).await?),
            None => None,
        };

        Ok(self
            .ctx
            .reaction_repo()
            .unreacted_reactant_ids(reacter_id, &def.kind, reaction_type_id)
            .await?)
    }

    /// Reactants of `kind` ranked by the named type's counter
    #[instrument(skip(self))]
    pub async fn rank_by_type(
        &self,
        kind: &str,
        type_name: &str,
        limit: i64,
    ) -> ServiceResult<Vec<RankedReactant>> {
        let def = self.ctx.morph_map().resolve_reactable(kind)?.clone();
        let reaction_type_id = self.resolve_type_id(type_name).await?;

        Ok(self
            .ctx
            .counter_repo()
            .rank_by_type(&def.kind, reaction_type_id, limit)
            .await?)
    }

    /// Reactants of `kind` ranked by total weight
    #[instrument(skip(self))]
    pub async fn rank(&self, kind: &str, limit: i64) -> ServiceResult<Vec<RankedReactant>> {
        let def = self.ctx.morph_map().resolve_reactable(kind)?.clone();
        Ok(self.ctx.total_repo().rank(&def.kind, limit).await?)
    }

    async fn resolve_type_id(&self, name: &str) -> ServiceResult<Snowflake> {
        let reaction_type = self
            .ctx
            .reaction_type_repo()
            .find_by_name(name)
            .await?
            .ok_or_else(|| DomainError::ReactionTypeInvalid(name.to_string()))?;
        Ok(reaction_type.id)
    }
}
