//! PostgreSQL implementation of ReactionTypeRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use love_core::entities::ReactionType;
use love_core::traits::{ReactionTypeRepository, RepoResult};
use love_core::{DomainError, Snowflake};

use crate::models::ReactionTypeModel;

use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of ReactionTypeRepository
#[derive(Clone)]
pub struct PgReactionTypeRepository {
    pool: PgPool,
}

impl PgReactionTypeRepository {
    /// Create a new PgReactionTypeRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReactionTypeRepository for PgReactionTypeRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<ReactionType>> {
        let result = sqlx::query_as::<_, ReactionTypeModel>(
            r#"
            SELECT id, name, mass, created_at, updated_at
            FROM reaction_types
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(ReactionType::from))
    }

    #[instrument(skip(self))]
    async fn find_by_name(&self, name: &str) -> RepoResult<Option<ReactionType>> {
        let result = sqlx::query_as::<_, ReactionTypeModel>(
            r#"
            SELECT id, name, mass, created_at, updated_at
            FROM reaction_types
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(ReactionType::from))
    }

    #[instrument(skip(self))]
    async fn name_exists(&self, name: &str) -> RepoResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(SELECT 1 FROM reaction_types WHERE name = $1)
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(exists)
    }

    #[instrument(skip(self))]
    async fn all(&self) -> RepoResult<Vec<ReactionType>> {
        let results = sqlx::query_as::<_, ReactionTypeModel>(
            r#"
            SELECT id, name, mass, created_at, updated_at
            FROM reaction_types
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(ReactionType::from).collect())
    }

    #[instrument(skip(self))]
    async fn create(&self, reaction_type: &ReactionType) -> RepoResult<()> {
        let name = reaction_type.name.clone();

        sqlx::query(
            r#"
            INSERT INTO reaction_types (id, name, mass, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(reaction_type.id.into_inner())
        .bind(&reaction_type.name)
        .bind(reaction_type.mass)
        .bind(reaction_type.created_at)
        .bind(reaction_type.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::ReactionTypeAlreadyExists(name)))?;

        Ok(())
    }
}
