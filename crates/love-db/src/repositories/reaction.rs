//! PostgreSQL implementation of ReactionRepository
//!
//! The write paths here are the heart of the aggregate-maintenance contract:
//! `record`, `remove`, and `change_rate` mutate the reaction log and both
//! aggregate tables inside one transaction, so a failed aggregate update
//! rolls the log mutation back with it.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;

use love_core::entities::Reaction;
use love_core::traits::{ReactionRepository, RepoResult};
use love_core::value_objects::SnowflakeGenerator;
use love_core::{DomainError, Rate, Snowflake};

use crate::models::ReactionModel;

use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of ReactionRepository
#[derive(Clone)]
pub struct PgReactionRepository {
    pool: PgPool,
    ids: Arc<SnowflakeGenerator>,
}

impl PgReactionRepository {
    /// Create a new PgReactionRepository
    pub fn new(pool: PgPool, ids: Arc<SnowflakeGenerator>) -> Self {
        Self { pool, ids }
    }

    /// Upsert-increment the counter row inside the caller's transaction
    async fn increment_counter(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        reactant_id: i64,
        reaction_type_id: i64,
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
        .bind(reactant_id)
        .bind(reaction_type_id)
        .bind(weight)
        .execute(&mut **tx)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    /// Upsert-increment the total row inside the caller's transaction
    async fn increment_total(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        reactant_id: i64,
        weight: f64,
    ) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO reaction_totals (id, reactant_id, count, weight, created_at, updated_at)
            VALUES ($1, $2, 1, $3, NOW(), NOW())
            ON CONFLICT (reactant_id) DO UPDATE
            SET count = reaction_totals.count + 1,
                weight = reaction_totals.weight + EXCLUDED.weight,
                updated_at = NOW()
            "#,
        )
        .bind(self.ids.generate().into_inner())
        .bind(reactant_id)
        .bind(weight)
        .execute(&mut **tx)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    /// Strict decrement of the counter row; refuses to go below zero and
    /// refuses a missing row
    async fn decrement_counter(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        reactant_id: i64,
        reaction_type_id: i64,
        weight: f64,
    ) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE reaction_counters
            SET count = count - 1, weight = weight - $3, updated_at = NOW()
            WHERE reactant_id = $1 AND reaction_type_id = $2 AND count >= 1
            "#,
        )
        .bind(reactant_id)
        .bind(reaction_type_id)
        .bind(weight)
        .execute(&mut **tx)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            // Distinguish an absent row from one already at zero
            let exists: bool = sqlx::query_scalar(
                r#"
                SELECT EXISTS(
                    SELECT 1 FROM reaction_counters
                    WHERE reactant_id = $1 AND reaction_type_id = $2
                )
                "#,
            )
            .bind(reactant_id)
            .bind(reaction_type_id)
            .fetch_one(&mut **tx)
            .await
            .map_err(map_db_error)?;

            if exists {
                return Err(DomainError::ReactionCounterBadValue);
            }
            return Err(DomainError::ReactionCounterMissing);
        }

        Ok(())
    }

    /// Strict decrement of the total row; refuses to go below zero and
    /// refuses a missing row
    async fn decrement_total(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        reactant_id: i64,
        weight: f64,
    ) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE reaction_totals
            SET count = count - 1, weight = weight - $2, updated_at = NOW()
            WHERE reactant_id = $1 AND count >= 1
            "#,
        )
        .bind(reactant_id)
        .bind(weight)
        .execute(&mut **tx)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            let exists: bool = sqlx::query_scalar(
                r#"
                SELECT EXISTS(SELECT 1 FROM reaction_totals WHERE reactant_id = $1)
                "#,
            )
            .bind(reactant_id)
            .fetch_one(&mut **tx)
            .await
            .map_err(map_db_error)?;

            if exists {
                return Err(DomainError::ReactionTotalBadValue);
            }
            return Err(DomainError::ReactionTotalMissing);
        }

        Ok(())
    }
}

#[async_trait]
impl ReactionRepository for PgReactionRepository {
    #[instrument(skip(self))]
    async fn find(
        &self,
        reacter_id: Snowflake,
        reactant_id: Snowflake,
        reaction_type_id: Snowflake,
    ) -> RepoResult<Option<Reaction>> {
        let result = sqlx::query_as::<_, ReactionModel>(
            r#"
            SELECT id, reactant_id, reacter_id, reaction_type_id, rate, created_at, updated_at
            FROM reactions
            WHERE reacter_id = $1 AND reactant_id = $2 AND reaction_type_id = $3
            "#,
        )
        .bind(reacter_id.into_inner())
        .bind(reactant_id.into_inner())
        .bind(reaction_type_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Reaction::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_reactant(
        &self,
        reactant_id: Snowflake,
        reaction_type_id: Option<Snowflake>,
    ) -> RepoResult<Vec<Reaction>> {
        let results = sqlx::query_as::<_, ReactionModel>(
            r#"
            SELECT id, reactant_id, reacter_id, reaction_type_id, rate, created_at, updated_at
            FROM reactions
            WHERE reactant_id = $1
              AND ($2::BIGINT IS NULL OR reaction_type_id = $2)
            ORDER BY id ASC
            "#,
        )
        .bind(reactant_id.into_inner())
        .bind(reaction_type_id.map(Snowflake::into_inner))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(Reaction::try_from).collect()
    }

    #[instrument(skip(self, reaction), fields(reaction_id = %reaction.id))]
    async fn record(&self, reaction: &Reaction, weight: f64) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r#"
            INSERT INTO reactions
                (id, reactant_id, reacter_id, reaction_type_id, rate, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(reaction.id.into_inner())
        .bind(reaction.reactant_id.into_inner())
        .bind(reaction.reacter_id.into_inner())
        .bind(reaction.reaction_type_id.into_inner())
        .bind(reaction.rate.value())
        .bind(reaction.created_at)
        .bind(reaction.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::ReactionAlreadyExists))?;

        self.increment_counter(
            &mut tx,
            reaction.reactant_id.into_inner(),
            reaction.reaction_type_id.into_inner(),
            weight,
        )
        .await?;

        self.increment_total(&mut tx, reaction.reactant_id.into_inner(), weight)
            .await?;

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self, reaction), fields(reaction_id = %reaction.id))]
    async fn remove(&self, reaction: &Reaction, mass: i32) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // The decremented weight comes from the row being deleted, not from
        // the caller's read, so a rate change landing between the caller's
        // find and this delete cannot skew the aggregates
        let stored_rate: Option<f64> = sqlx::query_scalar(
            r#"
            DELETE FROM reactions WHERE id = $1 RETURNING rate
            "#,
        )
        .bind(reaction.id.into_inner())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let Some(rate) = stored_rate else {
            return Err(DomainError::ReactionNotExists);
        };
        let weight = f64::from(mass) * rate;

        self.decrement_counter(
            &mut tx,
            reaction.reactant_id.into_inner(),
            reaction.reaction_type_id.into_inner(),
            weight,
        )
        .await?;

        self.decrement_total(&mut tx, reaction.reactant_id.into_inner(), weight)
            .await?;

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self, reaction), fields(reaction_id = %reaction.id))]
    async fn change_rate(&self, reaction: &Reaction, new_rate: Rate, mass: i32) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // Lock the row and capture the rate this update replaces; the weight
        // shift must be computed against that rate, not against whatever the
        // caller last read
        let replaced_rate: Option<f64> = sqlx::query_scalar(
            r#"
            WITH previous AS (
                SELECT id, rate FROM reactions WHERE id = $1 FOR UPDATE
            )
            UPDATE reactions
            SET rate = $2, updated_at = NOW()
            FROM previous
            WHERE reactions.id = previous.id
            RETURNING previous.rate
            "#,
        )
        .bind(reaction.id.into_inner())
        .bind(new_rate.value())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let Some(replaced) = replaced_rate else {
            return Err(DomainError::ReactionNotExists);
        };
        let weight_delta = f64::from(mass) * (new_rate.value() - replaced);

        let touched = sqlx::query(
            r#"
            UPDATE reaction_counters
            SET weight = weight + $3, updated_at = NOW()
            WHERE reactant_id = $1 AND reaction_type_id = $2
            "#,
        )
        .bind(reaction.reactant_id.into_inner())
        .bind(reaction.reaction_type_id.into_inner())
        .bind(weight_delta)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if touched.rows_affected() == 0 {
            return Err(DomainError::ReactionCounterMissing);
        }

        let touched = sqlx::query(
            r#"
            UPDATE reaction_totals
            SET weight = weight + $2, updated_at = NOW()
            WHERE reactant_id = $1
            "#,
        )
        .bind(reaction.reactant_id.into_inner())
        .bind(weight_delta)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if touched.rows_affected() == 0 {
            return Err(DomainError::ReactionTotalMissing);
        }

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn exists(
        &self,
        reacter_id: Snowflake,
        reactant_id: Snowflake,
        reaction_type_id: Option<Snowflake>,
        rate: Option<Rate>,
    ) -> RepoResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM reactions
                WHERE reacter_id = $1
                  AND reactant_id = $2
                  AND ($3::BIGINT IS NULL OR reaction_type_id = $3)
                  AND ($4::DOUBLE PRECISION IS NULL OR rate = $4)
            )
            "#,
        )
        .bind(reacter_id.into_inner())
        .bind(reactant_id.into_inner())
        .bind(reaction_type_id.map(Snowflake::into_inner))
        .bind(rate.map(Rate::value))
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(exists)
    }

    #[instrument(skip(self))]
    async fn reacted_reactant_ids(
        &self,
        reacter_id: Snowflake,
        reaction_type_id: Option<Snowflake>,
    ) -> RepoResult<Vec<Snowflake>> {
        let ids: Vec<i64> = sqlx::query_scalar(
            r#"
            SELECT DISTINCT reactant_id
            FROM reactions
            WHERE reacter_id = $1
              AND ($2::BIGINT IS NULL OR reaction_type_id = $2)
            ORDER BY reactant_id ASC
            "#,
        )
        .bind(reacter_id.into_inner())
        .bind(reaction_type_id.map(Snowflake::into_inner))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(ids.into_iter().map(Snowflake::new).collect())
    }

    #[instrument(skip(self))]
    async fn unreacted_reactant_ids(
        &self,
        reacter_id: Snowflake,
        kind: &str,
        reaction_type_id: Option<Snowflake>,
    ) -> RepoResult<Vec<Snowflake>> {
        let ids: Vec<i64> = sqlx::query_scalar(
            r#"
            SELECT rt.id
            FROM reactants rt
            WHERE rt.type = $2
              AND NOT EXISTS (
                  SELECT 1 FROM reactions r
                  WHERE r.reactant_id = rt.id
                    AND r.reacter_id = $1
                    AND ($3::BIGINT IS NULL OR r.reaction_type_id = $3)
              )
            ORDER BY rt.id ASC
            "#,
        )
        .bind(reacter_id.into_inner())
        .bind(kind)
        .bind(reaction_type_id.map(Snowflake::into_inner))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(ids.into_iter().map(Snowflake::new).collect())
    }
}
