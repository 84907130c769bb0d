//! PostgreSQL implementation of ReacterRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use love_core::entities::Reacter;
use love_core::traits::{ReacterRepository, RepoResult};
use love_core::Snowflake;

use crate::models::ReacterModel;

use super::error::map_db_error;

/// PostgreSQL implementation of ReacterRepository
#[derive(Clone)]
pub struct PgReacterRepository {
    pool: PgPool,
}

impl PgReacterRepository {
    /// Create a new PgReacterRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReacterRepository for PgReacterRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Reacter>> {
        let result = sqlx::query_as::<_, ReacterModel>(
            r#"
            SELECT id, type, created_at, updated_at
            FROM reacters
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Reacter::from))
    }

    #[instrument(skip(self))]
    async fn create(&self, reacter: &Reacter) -> RepoResult<()> {
        let id = reacter.id()?;

        sqlx::query(
            r#"
            INSERT INTO reacters (id, type, created_at, updated_at)
            VALUES ($1, $2, NOW(), NOW())
            "#,
        )
        .bind(id.into_inner())
        .bind(reacter.kind())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }
}
