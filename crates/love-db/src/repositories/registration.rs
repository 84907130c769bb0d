//! PostgreSQL implementation of RegistrationRepository
//!
//! Table and column names come from the morph-map, not from user input, but
//! they still pass an identifier check before being interpolated because
//! bind parameters cannot stand in for identifiers.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use love_core::entities::{Reactant, Reacter};
use love_core::registry::MorphTypeDef;
use love_core::traits::{RegistrationRepository, RepoResult};
use love_core::DomainError;

use super::error::map_db_error;

/// PostgreSQL implementation of RegistrationRepository
#[derive(Clone)]
pub struct PgRegistrationRepository {
    pool: PgPool,
}

impl PgRegistrationRepository {
    /// Create a new PgRegistrationRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Reject anything that is not a plain lowercase SQL identifier
fn check_identifier(name: &str) -> Result<(), DomainError> {
    let valid = !name.is_empty()
        && name.chars().next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');

    if valid {
        Ok(())
    } else {
        Err(DomainError::DatabaseError(format!(
            "invalid identifier in morph-type definition: {name}"
        )))
    }
}

fn check_def(def: &MorphTypeDef) -> Result<(), DomainError> {
    check_identifier(&def.table)?;
    check_identifier(&def.id_column)?;
    check_identifier(&def.fk_column)?;
    Ok(())
}

#[async_trait]
impl RegistrationRepository for PgRegistrationRepository {
    #[instrument(skip(self, def), fields(table = %def.table))]
    async fn fk_column_exists(&self, def: &MorphTypeDef) -> RepoResult<bool> {
        check_def(def)?;

        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM information_schema.columns
                WHERE table_schema = current_schema()
                  AND table_name = $1
                  AND column_name = $2
            )
            "#,
        )
        .bind(&def.table)
        .bind(&def.fk_column)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(exists)
    }

    #[instrument(skip(self, def), fields(table = %def.table))]
    async fn add_fk_column(&self, def: &MorphTypeDef, identity_table: &str) -> RepoResult<()> {
        check_def(def)?;
        check_identifier(identity_table)?;

        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let alter = format!(
            r#"ALTER TABLE "{table}" ADD COLUMN "{fk}" BIGINT REFERENCES "{identity}" (id)"#,
            table = def.table,
            fk = def.fk_column,
            identity = identity_table,
        );
        sqlx::query(&alter)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        let index = format!(
            r#"CREATE INDEX "{table}_{fk}_idx" ON "{table}" ("{fk}")"#,
            table = def.table,
            fk = def.fk_column,
        );
        sqlx::query(&index)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self, def), fields(table = %def.table))]
    async fn unregistered_ids(
        &self,
        def: &MorphTypeDef,
        ids: Option<&[i64]>,
    ) -> RepoResult<Vec<i64>> {
        check_def(def)?;

        let sql = format!(
            r#"
            SELECT "{id}" FROM "{table}"
            WHERE "{fk}" IS NULL
              AND ($1::BIGINT[] IS NULL OR "{id}" = ANY($1))
            ORDER BY "{id}" ASC
            "#,
            id = def.id_column,
            table = def.table,
            fk = def.fk_column,
        );

        let ids: Vec<i64> = sqlx::query_scalar(&sql)
            .bind(ids.map(<[i64]>::to_vec))
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(ids)
    }

    #[instrument(skip(self, def, reactant), fields(table = %def.table, entity_id))]
    async fn attach_reactant(
        &self,
        def: &MorphTypeDef,
        entity_id: i64,
        reactant: &Reactant,
    ) -> RepoResult<()> {
        check_def(def)?;
        let id = reactant.id()?;

        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r#"
            INSERT INTO reactants (id, type, created_at, updated_at)
            VALUES ($1, $2, NOW(), NOW())
            "#,
        )
        .bind(id.into_inner())
        .bind(reactant.kind())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let sql = format!(
            r#"
            UPDATE "{table}" SET "{fk}" = $1
            WHERE "{id}" = $2 AND "{fk}" IS NULL
            "#,
            table = def.table,
            fk = def.fk_column,
            id = def.id_column,
        );

        let result = sqlx::query(&sql)
            .bind(id.into_inner())
            .bind(entity_id)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        // Entity missing or already registered: drop the identity row with
        // the transaction and report success (registration is idempotent)
        if result.rows_affected() == 0 {
            tx.rollback().await.map_err(map_db_error)?;
            return Ok(());
        }

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self, def, reacter), fields(table = %def.table, entity_id))]
    async fn attach_reacter(
        &self,
        def: &MorphTypeDef,
        entity_id: i64,
        reacter: &Reacter,
    ) -> RepoResult<()> {
        check_def(def)?;
        let id = reacter.id()?;

        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r#"
            INSERT INTO reacters (id, type, created_at, updated_at)
            VALUES ($1, $2, NOW(), NOW())
            "#,
        )
        .bind(id.into_inner())
        .bind(reacter.kind())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let sql = format!(
            r#"
            UPDATE "{table}" SET "{fk}" = $1
            WHERE "{id}" = $2 AND "{fk}" IS NULL
            "#,
            table = def.table,
            fk = def.fk_column,
            id = def.id_column,
        );

        let result = sqlx::query(&sql)
            .bind(id.into_inner())
            .bind(entity_id)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            tx.rollback().await.map_err(map_db_error)?;
            return Ok(());
        }

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }
}
