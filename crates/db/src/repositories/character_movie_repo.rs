//! Repository for the `character_movies` join table.

use holocron_core::relationship::Edge;
use holocron_core::types::DbId;
use sqlx::{FromRow, PgExecutor, PgPool};

use crate::models::character::CharacterSummary;
use crate::models::movie::MovieSummary;

/// A movie summary tagged with the character it was loaded for.
#[derive(Debug, Clone, FromRow)]
pub struct LinkedMovie {
    pub character_id: DbId,
    #[sqlx(flatten)]
    pub movie: MovieSummary,
}

/// A character summary tagged with the movie it was loaded for.
#[derive(Debug, Clone, FromRow)]
pub struct LinkedCharacter {
    pub movie_id: DbId,
    #[sqlx(flatten)]
    pub character: CharacterSummary,
}

/// Reads and writes Character↔Movie edges.
pub struct CharacterMovieRepo;

impl CharacterMovieRepo {
    /// Movies linked to one character, by episode (unnumbered last).
    pub async fn movies_for_character(
        pool: &PgPool,
        character_id: DbId,
    ) -> Result<Vec<MovieSummary>, sqlx::Error> {
        sqlx::query_as::<_, MovieSummary>(
            "SELECT m.id, m.title, m.episode_id, m.director
             FROM character_movies cm
             JOIN movies m ON m.id = cm.movie_id
             WHERE cm.character_id = $1 AND m.deleted_at IS NULL
             ORDER BY m.episode_id ASC NULLS LAST, m.id ASC",
        )
        .bind(character_id)
        .fetch_all(pool)
        .await
    }

    /// Movies linked to any of the given characters, for list views.
    pub async fn movies_for_characters(
        pool: &PgPool,
        character_ids: &[DbId],
    ) -> Result<Vec<LinkedMovie>, sqlx::Error> {
        sqlx::query_as::<_, LinkedMovie>(
            "SELECT cm.character_id, m.id, m.title, m.episode_id, m.director
             FROM character_movies cm
             JOIN movies m ON m.id = cm.movie_id
             WHERE cm.character_id = ANY($1) AND m.deleted_at IS NULL
             ORDER BY m.episode_id ASC NULLS LAST, m.id ASC",
        )
        .bind(character_ids)
        .fetch_all(pool)
        .await
    }

    /// Characters linked to one movie, by name.
    pub async fn characters_for_movie(
        pool: &PgPool,
        movie_id: DbId,
    ) -> Result<Vec<CharacterSummary>, sqlx::Error> {
        sqlx::query_as::<_, CharacterSummary>(
            "SELECT c.id, c.name, c.height, c.mass
             FROM character_movies cm
             JOIN characters c ON c.id = cm.character_id
             WHERE cm.movie_id = $1 AND c.deleted_at IS NULL
             ORDER BY c.name ASC",
        )
        .bind(movie_id)
        .fetch_all(pool)
        .await
    }

    /// Characters linked to any of the given movies, for list views.
    pub async fn characters_for_movies(
        pool: &PgPool,
        movie_ids: &[DbId],
    ) -> Result<Vec<LinkedCharacter>, sqlx::Error> {
        sqlx::query_as::<_, LinkedCharacter>(
            "SELECT cm.movie_id, c.id, c.name, c.height, c.mass
             FROM character_movies cm
             JOIN characters c ON c.id = cm.character_id
             WHERE cm.movie_id = ANY($1) AND c.deleted_at IS NULL
             ORDER BY c.name ASC",
        )
        .bind(movie_ids)
        .fetch_all(pool)
        .await
    }

    /// Insert a batch of edges in one statement. Edges that already exist,
    /// e.g. from a concurrent link, are skipped.
    pub async fn insert_many<'e>(
        executor: impl PgExecutor<'e>,
        edges: &[Edge],
    ) -> Result<u64, sqlx::Error> {
        if edges.is_empty() {
            return Ok(0);
        }
        let (character_ids, movie_ids): (Vec<DbId>, Vec<DbId>) = edges
            .iter()
            .map(|edge| (edge.character_id, edge.movie_id))
            .unzip();
        let result = sqlx::query(
            "INSERT INTO character_movies (character_id, movie_id)
             SELECT * FROM UNNEST($1::bigint[], $2::bigint[])
             ON CONFLICT ON CONSTRAINT pk_character_movies DO NOTHING",
        )
        .bind(&character_ids)
        .bind(&movie_ids)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// Insert a single edge. A duplicate raises `pk_character_movies`.
    pub async fn insert<'e>(executor: impl PgExecutor<'e>, edge: Edge) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO character_movies (character_id, movie_id) VALUES ($1, $2)")
            .bind(edge.character_id)
            .bind(edge.movie_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    /// Delete a single edge. Returns `true` if it existed.
    pub async fn delete<'e>(executor: impl PgExecutor<'e>, edge: Edge) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM character_movies WHERE character_id = $1 AND movie_id = $2")
                .bind(edge.character_id)
                .bind(edge.movie_id)
                .execute(executor)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Drop every edge of a character.
    pub async fn clear_for_character<'e>(
        executor: impl PgExecutor<'e>,
        character_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM character_movies WHERE character_id = $1")
            .bind(character_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    /// Drop every edge of a movie.
    pub async fn clear_for_movie<'e>(
        executor: impl PgExecutor<'e>,
        movie_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM character_movies WHERE movie_id = $1")
            .bind(movie_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
