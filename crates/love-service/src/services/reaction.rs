//! Reaction service - the reacter's mutation API
//!
//! `react_to` and `unreact_to` drive the aggregate maintenance engine: the
//! repository executes the reaction write and the counter/total updates in
//! one transaction, so this layer only decides WHICH write to issue.

use chrono::Utc;
use tracing::{info, instrument};

use love_core::entities::{Reactant, Reacter, Reaction, ReactionType};
use love_core::{DomainError, Rate};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Reaction service
pub struct ReactionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReactionService<'a> {
    /// Create a new ReactionService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// React to a reactant with the given type
    ///
    /// With no existing reaction, creates one at the given rate (or the
    /// default). With an existing reaction and no rate, fails
    /// `ReactionAlreadyExists`. With an existing reaction and a rate, changes
    /// the rate in place; an unchanged rate fails `RateInvalid`.
    #[instrument(skip(self, reacter, reactant, reaction_type), fields(type_name = %reaction_type.name))]
    pub async fn react_to(
        &self,
        reacter: &Reacter,
        reactant: &Reactant,
        reaction_type: &ReactionType,
        rate: Option<Rate>,
    ) -> ServiceResult<Reaction> {
        let reacter_id = reacter.id()?;
        let reactant_id = reactant.id()?;

        let existing = self
            .ctx
            .reaction_repo()
            .find(reacter_id, reactant_id, reaction_type.id)
            .await?;

        match (existing, rate) {
            (None, rate) => {
                let now = Utc::now();
                let reaction = Reaction {
                    id: self.ctx.generate_id(),
                    reactant_id,
                    reacter_id,
                    reaction_type_id: reaction_type.id,
                    rate: rate.unwrap_or_default(),
                    created_at: now,
                    updated_at: now,
                };

                let weight = reaction.weight(reaction_type);
                self.ctx.reaction_repo().record(&reaction, weight).await?;

                info!(reaction_id = %reaction.id, weight, "Reaction recorded");
                Ok(reaction)
            }
            (Some(_), None) => Err(DomainError::ReactionAlreadyExists.into()),
            (Some(existing), Some(new_rate)) => {
                if new_rate == existing.rate {
                    return Err(DomainError::RateInvalid.into());
                }

                // The repository derives the weight shift from the rate it
                // replaces, atomically with the update
                self.ctx
                    .reaction_repo()
                    .change_rate(&existing, new_rate, reaction_type.mass)
                    .await?;

                info!(reaction_id = %existing.id, rate = new_rate.value(), "Reaction rate changed");
                Ok(Reaction {
                    rate: new_rate,
                    updated_at: Utc::now(),
                    ..existing
                })
            }
        }
    }

    /// Remove the reaction of the given type, reversing its aggregates
    #[instrument(skip(self, reacter, reactant, reaction_type), fields(type_name = %reaction_type.name))]
    pub async fn unreact_to(
        &self,
        reacter: &Reacter,
        reactant: &Reactant,
        reaction_type: &ReactionType,
    ) -> ServiceResult<()> {
        let reacter_id = reacter.id()?;
        let reactant_id = reactant.id()?;

        let reaction = self
            .ctx
            .reaction_repo()
            .find(reacter_id, reactant_id, reaction_type.id)
            .await?
            .ok_or(DomainError::ReactionNotExists)?;

        self.ctx
            .reaction_repo()
            .remove(&reaction, reaction_type.mass)
            .await?;

        info!(reaction_id = %reaction.id, "Reaction removed");
        Ok(())
    }
}
