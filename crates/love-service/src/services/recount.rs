//! Recount service - rebuild aggregates from the reaction log
//!
//! The reaction log is authoritative; counters and totals are derived. This
//! service repairs drift (after bulk log edits or migrations) by resetting
//! each reactant's counters in place, replaying its live reactions through
//! the same upsert-increment path the live write uses, and recomputing the
//! total from all counters. Readers may observe a transient zero while a
//! reactant is mid-rebuild; re-running the same scope is always safe because
//! the algorithm resets before it replays.

use std::collections::HashMap;

use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info, instrument};

use love_core::entities::ReactionType;
use love_core::{DomainError, Snowflake};

use crate::dto::RecountReport;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Recount service
pub struct RecountService<'a> {
    ctx: &'a ServiceContext,
}

/// Outcome of rebuilding one reactant
struct ReactantOutcome {
    rebuilt: bool,
    reactions_replayed: u64,
}

impl<'a> RecountService<'a> {
    /// Create a new RecountService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Rebuild aggregates, optionally scoped to one morph kind and/or one
    /// reaction type name
    ///
    /// An unknown kind fails `ReactableInvalid`; an unknown type name fails
    /// `ReactionTypeInvalid`. Reactants with no counters and no reactions
    /// are skipped. Per-reactant units run concurrently up to the configured
    /// limit.
    #[instrument(skip(self))]
    pub async fn recount(
        &self,
        kind: Option<&str>,
        type_name: Option<&str>,
    ) -> ServiceResult<RecountReport> {
        let scope_type = match type_name {
            Some(name) => Some(
                self.ctx
                    .reaction_type_repo()
                    .find_by_name(name)
                    .await?
                    .ok_or_else(|| DomainError::ReactionTypeInvalid(name.to_string()))?,
            ),
            None => None,
        };

        let reactant_ids = match kind {
            Some(name) => {
                let def = self.ctx.morph_map().resolve_reactable(name)?;
                self.ctx.reactant_repo().ids_by_kind(&def.kind).await?
            }
            None => self.ctx.reactant_repo().all_ids().await?,
        };

        // Masses for the replay are looked up once, not per reaction
        let types: HashMap<Snowflake, ReactionType> = self
            .ctx
            .reaction_type_repo()
            .all()
            .await?
            .into_iter()
            .map(|t| (t.id, t))
            .collect();

        let scope_type_id = scope_type.as_ref().map(|t| t.id);
        let concurrency = self.ctx.recount_config().concurrency.max(1);

        let outcomes: Vec<ReactantOutcome> = stream::iter(reactant_ids)
            .map(|reactant_id| self.rebuild_reactant(reactant_id, scope_type_id, &types))
            .buffer_unordered(concurrency)
            .try_collect()
            .await?;

        let mut report = RecountReport::default();
        for outcome in outcomes {
            if outcome.rebuilt {
                report.rebuilt += 1;
                report.reactions_replayed += outcome.reactions_replayed;
            } else {
                report.skipped += 1;
            }
        }

        info!(
            rebuilt = report.rebuilt,
            skipped = report.skipped,
            reactions_replayed = report.reactions_replayed,
            "Recount finished"
        );
        Ok(report)
    }

    /// Reset, replay, and re-total one reactant
    async fn rebuild_reactant(
        &self,
        reactant_id: Snowflake,
        scope_type_id: Option<Snowflake>,
        types: &HashMap<Snowflake, ReactionType>,
    ) -> ServiceResult<ReactantOutcome> {
        let reactions = self
            .ctx
            .reaction_repo()
            .find_by_reactant(reactant_id, scope_type_id)
            .await?;

        // Counters are reset in place, never deleted; a reactant with no
        // counters and no reactions has nothing to rebuild
        let counters_touched = self
            .ctx
            .counter_repo()
            .reset(reactant_id, scope_type_id)
            .await?;

        if counters_touched == 0 && reactions.is_empty() {
            debug!(reactant_id = %reactant_id, "Nothing to rebuild, skipping");
            return Ok(ReactantOutcome {
                rebuilt: false,
                reactions_replayed: 0,
            });
        }

        let mut replayed = 0u64;
        for reaction in &reactions {
            // A dangling type reference means the log and the type table
            // disagree, which no name lookup can explain to the operator
            let reaction_type = types.get(&reaction.reaction_type_id).ok_or_else(|| {
                ServiceError::internal(format!(
                    "reaction {} references unknown reaction type {}",
                    reaction.id, reaction.reaction_type_id
                ))
            })?;

            self.ctx
                .counter_repo()
                .increment(reactant_id, reaction_type.id, reaction.weight(reaction_type))
                .await?;
            replayed += 1;
        }

        // The total sums ALL counters, including types outside a scoped run
        self.ctx.total_repo().recompute(reactant_id).await?;

        debug!(reactant_id = %reactant_id, replayed, "Reactant rebuilt");
        Ok(ReactantOutcome {
            rebuilt: true,
            reactions_replayed: replayed,
        })
    }
}
