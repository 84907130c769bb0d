//! PostgreSQL implementation of ReactionTotalRepository

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use love_core::entities::ReactionTotal;
use love_core::traits::{RankedReactant, ReactionTotalRepository, RepoResult};
use love_core::value_objects::SnowflakeGenerator;
use love_core::{DomainError, Snowflake};

use crate::models::{RankedReactantModel, ReactionTotalModel};

use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of ReactionTotalRepository
#[derive(Clone)]
pub struct PgReactionTotalRepository {
    pool: PgPool,
    ids: Arc<SnowflakeGenerator>,
}

impl PgReactionTotalRepository {
    /// Create a new PgReactionTotalRepository
    pub fn new(pool: PgPool, ids: Arc<SnowflakeGenerator>) -> Self {
        Self { pool, ids }
    }
}

#[async_trait]
impl ReactionTotalRepository for PgReactionTotalRepository {
    #[instrument(skip(self))]
    async fn find_by_reactant(&self, reactant_id: Snowflake) -> RepoResult<ReactionTotal> {
        let result = sqlx::query_as::<_, ReactionTotalModel>(
            r#"
            SELECT id, reactant_id, count, weight, created_at, updated_at
            FROM reaction_totals
            WHERE reactant_id = $1
            "#,
        )
        .bind(reactant_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map_or(ReactionTotal::Null, ReactionTotal::from))
    }

    #[instrument(skip(self, total))]
    async fn create(&self, total: &ReactionTotal) -> RepoResult<()> {
        let ReactionTotal::Present {
            id,
            reactant_id,
            count,
            weight,
            created_at,
            updated_at,
        } = total
        else {
            return Err(DomainError::ReactionTotalMissing);
        };

        sqlx::query(
            r#"
            INSERT INTO reaction_totals (id, reactant_id, count, weight, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(id.into_inner())
        .bind(reactant_id.into_inner())
        .bind(count)
        .bind(weight)
        .bind(created_at)
        .bind(updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::ReactionTotalDuplicate))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn recompute(&self, reactant_id: Snowflake) -> RepoResult<ReactionTotal> {
        // The sum runs over ALL of the reactant's counters, so a partial
        // rebuild of one type still leaves the total covering every type.
        let model = sqlx::query_as::<_, ReactionTotalModel>(
            r#"
            INSERT INTO reaction_totals (id, reactant_id, count, weight, created_at, updated_at)
            SELECT $2, $1, COALESCE(SUM(count), 0), COALESCE(SUM(weight), 0), NOW(), NOW()
            FROM reaction_counters
            WHERE reactant_id = $1
            ON CONFLICT (reactant_id) DO UPDATE
            SET count = EXCLUDED.count,
                weight = EXCLUDED.weight,
                updated_at = NOW()
            RETURNING id, reactant_id, count, weight, created_at, updated_at
            "#,
        )
        .bind(reactant_id.into_inner())
        .bind(self.ids.generate().into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(ReactionTotal::from(model))
    }

    #[instrument(skip(self))]
    async fn rank(&self, kind: &str, limit: i64) -> RepoResult<Vec<RankedReactant>> {
        let results = sqlx::query_as::<_, RankedReactantModel>(
            r#"
            SELECT rt.id AS reactant_id,
                   COALESCE(tot.count, 0) AS count,
                   COALESCE(tot.weight, 0) AS weight
            FROM reactants rt
            LEFT JOIN reaction_totals tot ON tot.reactant_id = rt.id
            WHERE rt.type = $1
            ORDER BY weight DESC, rt.id ASC
            LIMIT $2
            "#,
        )
        .bind(kind)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(RankedReactant::from).collect())
    }
}
