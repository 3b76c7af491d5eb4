//! Repository for the `movies` table.

use holocron_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::movie::{Movie, MovieSummary, MovieValues};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, episode_id, director, created_at, updated_at, deleted_at";

/// Provides CRUD operations for movies.
pub struct MovieRepo;

impl MovieRepo {
    /// Insert a new movie, returning the created row.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        input: &MovieValues,
    ) -> Result<Movie, sqlx::Error> {
        let query = format!(
            "INSERT INTO movies (title, episode_id, director)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Movie>(&query)
            .bind(&input.title)
            .bind(input.episode_id)
            .bind(&input.director)
            .fetch_one(executor)
            .await
    }

    /// Find a movie by its internal ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Movie>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM movies WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Movie>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a movie by exact title. Excludes soft-deleted rows.
    pub async fn find_by_title(pool: &PgPool, title: &str) -> Result<Option<Movie>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM movies WHERE title = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Movie>(&query)
            .bind(title)
            .fetch_optional(pool)
            .await
    }

    /// Find the movie holding a given episode number. Excludes soft-deleted rows.
    pub async fn find_by_episode(
        pool: &PgPool,
        episode_id: i32,
    ) -> Result<Option<Movie>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM movies WHERE episode_id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Movie>(&query)
            .bind(episode_id)
            .fetch_optional(pool)
            .await
    }

    /// Bulk-fetch summaries for the given IDs. Order is unspecified.
    pub async fn find_summaries_by_ids(
        pool: &PgPool,
        ids: &[DbId],
    ) -> Result<Vec<MovieSummary>, sqlx::Error> {
        sqlx::query_as::<_, MovieSummary>(
            "SELECT id, title, episode_id, director FROM movies
             WHERE id = ANY($1) AND deleted_at IS NULL",
        )
        .bind(ids)
        .fetch_all(pool)
        .await
    }

    /// List all movies by episode ascending; movies without an episode
    /// come last, ties broken by id.
    pub async fn list(pool: &PgPool) -> Result<Vec<Movie>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM movies
             WHERE deleted_at IS NULL
             ORDER BY episode_id ASC NULLS LAST, id ASC"
        );
        sqlx::query_as::<_, Movie>(&query).fetch_all(pool).await
    }

    /// Overwrite the scalar columns of a movie.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        input: &MovieValues,
    ) -> Result<Option<Movie>, sqlx::Error> {
        let query = format!(
            "UPDATE movies SET
                title = $2,
                episode_id = $3,
                director = $4,
                updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Movie>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(input.episode_id)
            .bind(&input.director)
            .fetch_optional(executor)
            .await
    }

    /// Permanently delete a movie by ID. Edges cascade.
    /// Returns `true` if a row was removed.
    pub async fn hard_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
