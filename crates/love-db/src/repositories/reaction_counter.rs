//! PostgreSQL implementation of ReactionCounterRepository

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use love_core::entities::ReactionCounter;
use love_core::traits::{RankedReactant, ReactionCounterRepository, RepoResult};
use love_core::value_objects::SnowflakeGenerator;
use love_core::{DomainError, Snowflake};

use crate::models::{RankedReactantModel, ReactionCounterModel};

use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of ReactionCounterRepository
#[derive(Clone)]
pub struct PgReactionCounterRepository {
    pool: PgPool,
    ids: Arc<SnowflakeGenerator>,
}

impl PgReactionCounterRepository {
    /// Create a new PgReactionCounterRepository
    pub fn new(pool: PgPool, ids: Arc<SnowflakeGenerator>) -> Self {
        Self { pool, ids }
    }
}

#[async_trait]
impl ReactionCounterRepository for PgReactionCounterRepository {
    #[instrument(skip(self))]
    async fn find(
        &self,
        reactant_id: Snowflake,
        reaction_type_id: Snowflake,
    ) -> RepoResult<ReactionCounter> {
        let result = sqlx::query_as::<_, ReactionCounterModel>(
            r#"
            SELECT id, reactant_id, reaction_type_id, count, weight, created_at, updated_at
            FROM reaction_counters
            WHERE reactant_id = $1 AND reaction_type_id = $2
            "#,
        )
        .bind(reactant_id.into_inner())
        .bind(reaction_type_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map_or(ReactionCounter::Null, ReactionCounter::from))
    }

    #[instrument(skip(self))]
    async fn find_by_reactant(&self, reactant_id: Snowflake) -> RepoResult<Vec<ReactionCounter>> {
        let results = sqlx::query_as::<_, ReactionCounterModel>(
            r#"
            SELECT id, reactant_id, reaction_type_id, count, weight, created_at, updated_at
            FROM reaction_counters
            WHERE reactant_id = $1
            ORDER BY reaction_type_id ASC
            "#,
        )
        .bind(reactant_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(ReactionCounter::from).collect())
    }

    #[instrument(skip(self, counter))]
    async fn create(&self, counter: &ReactionCounter) -> RepoResult<()> {
        let ReactionCounter::Present {
            id,
            reactant_id,
            reaction_type_id,
            count,
            weight,
            created_at,
            updated_at,
        } = counter
        else {
            return Err(DomainError::ReactionCounterInvalid);
        };

        sqlx::query(
            r#"
            INSERT INTO reaction_counters
                (id, reactant_id, reaction_type_id, count, weight, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(id.into_inner())
        .bind(reactant_id.into_inner())
        .bind(reaction_type_id.into_inner())
        .bind(count)
        .bind(weight)
        .bind(created_at)
        .bind(updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::ReactionCounterDuplicate))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn increment(
        &self,
        reactant_id: Snowflake,
        reaction_type_id: Snowflake,
        weight: f64,
    ) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO reaction_counters
                (id, reactant_id, reaction_type_id, count, weight, created_at, updated_at)
            VALUES ($1, $2, $3, 1, $4, NOW(), NOW())
            ON CONFLICT (reactant_id, reaction_type_id) DO UPDATE
            SET count = reaction_counters.count + 1,
                weight = reaction_counters.weight + EXCLUDED.weight,
                updated_at = NOW()
            "#,
        )
        .bind(self.ids.generate().into_inner())
        .bind(reactant_id.into_inner())
        .bind(reaction_type_id.into_inner())
        .bind(weight)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn reset(
        &self,
        reactant_id: Snowflake,
        reaction_type_id: Option<Snowflake>,
    ) -> RepoResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE reaction_counters
            SET count = 0, weight = 0, updated_at = NOW()
            WHERE reactant_id = $1
              AND ($2::BIGINT IS NULL OR reaction_type_id = $2)
            "#,
        )
        .bind(reactant_id.into_inner())
        .bind(reaction_type_id.map(Snowflake::into_inner))
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn rank_by_type(
        &self,
        kind: &str,
        reaction_type_id: Snowflake,
        limit: i64,
    ) -> RepoResult<Vec<RankedReactant>> {
        let results = sqlx::query_as::<_, RankedReactantModel>(
            r#"
            SELECT rt.id AS reactant_id,
                   COALESCE(rc.count, 0) AS count,
                   COALESCE(rc.weight, 0) AS weight
            FROM reactants rt
            LEFT JOIN reaction_counters rc
                ON rc.reactant_id = rt.id AND rc.reaction_type_id = $2
            WHERE rt.type = $1
            ORDER BY weight DESC, rt.id ASC
            LIMIT $3
            "#,
        )
        .bind(kind)
        .bind(reaction_type_id.into_inner())
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(RankedReactant::from).collect())
    }
}
