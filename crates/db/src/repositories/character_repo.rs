//! Repository for the `characters` table.

use holocron_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::character::{Character, CharacterSummary, CharacterValues};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, height, mass, created_at, updated_at, deleted_at";

/// Provides CRUD operations for characters.
pub struct CharacterRepo;

impl CharacterRepo {
    /// Insert a new character, returning the created row.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        input: &CharacterValues,
    ) -> Result<Character, sqlx::Error> {
        let query = format!(
            "INSERT INTO characters (name, height, mass)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Character>(&query)
            .bind(&input.name)
            .bind(&input.height)
            .bind(&input.mass)
            .fetch_one(executor)
            .await
    }

    /// Find a character by its internal ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Character>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM characters WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Character>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a character by exact (case-sensitive) name. Excludes soft-deleted rows.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Character>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM characters WHERE name = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Character>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Bulk-fetch summaries for the given IDs. Order is unspecified.
    pub async fn find_summaries_by_ids(
        pool: &PgPool,
        ids: &[DbId],
    ) -> Result<Vec<CharacterSummary>, sqlx::Error> {
        sqlx::query_as::<_, CharacterSummary>(
            "SELECT id, name, height, mass FROM characters
             WHERE id = ANY($1) AND deleted_at IS NULL",
        )
        .bind(ids)
        .fetch_all(pool)
        .await
    }

    /// List all characters, ordered by name ascending. Excludes soft-deleted rows.
    pub async fn list(pool: &PgPool) -> Result<Vec<Character>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM characters
             WHERE deleted_at IS NULL
             ORDER BY name ASC"
        );
        sqlx::query_as::<_, Character>(&query).fetch_all(pool).await
    }

    /// Overwrite the scalar columns of a character.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        input: &CharacterValues,
    ) -> Result<Option<Character>, sqlx::Error> {
        let query = format!(
            "UPDATE characters SET
                name = $2,
                height = $3,
                mass = $4,
                updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Character>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.height)
            .bind(&input.mass)
            .fetch_optional(executor)
            .await
    }

    /// Permanently delete a character by ID. Edges cascade.
    /// Returns `true` if a row was removed.
    pub async fn hard_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM characters WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
