//! PostgreSQL implementation of ReactantRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use love_core::entities::Reactant;
use love_core::traits::{ReactantRepository, RepoResult};
use love_core::Snowflake;

use crate::models::ReactantModel;

use super::error::map_db_error;

/// PostgreSQL implementation of ReactantRepository
#[derive(Clone)]
pub struct PgReactantRepository {
    pool: PgPool,
}

impl PgReactantRepository {
    /// Create a new PgReactantRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReactantRepository for PgReactantRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Reactant>> {
        let result = sqlx::query_as::<_, ReactantModel>(
            r#"
            SELECT id, type, created_at, updated_at
            FROM reactants
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Reactant::from))
    }

    #[instrument(skip(self))]
    async fn ids_by_kind(&self, kind: &str) -> RepoResult<Vec<Snowflake>> {
        let ids: Vec<i64> = sqlx::query_scalar(
            r#"
            SELECT id FROM reactants
            WHERE type = $1
            ORDER BY id ASC
            "#,
        )
        .bind(kind)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(ids.into_iter().map(Snowflake::new).collect())
    }

    #[instrument(skip(self))]
    async fn all_ids(&self) -> RepoResult<Vec<Snowflake>> {
        let ids: Vec<i64> = sqlx::query_scalar(
            r#"
            SELECT id FROM reactants ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(ids.into_iter().map(Snowflake::new).collect())
    }

    #[instrument(skip(self))]
    async fn create(&self, reactant: &Reactant) -> RepoResult<()> {
        let id = reactant.id()?;

        sqlx::query(
            r#"
            INSERT INTO reactants (id, type, created_at, updated_at)
            VALUES ($1, $2, NOW(), NOW())
            "#,
        )
        .bind(id.into_inner())
        .bind(reactant.kind())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgReactantRepository>();
    }
}
