//! [`CatalogStore`] over PostgreSQL.

use std::collections::HashMap;

use async_trait::async_trait;
use holocron_core::relationship::Edge;
use holocron_core::types::DbId;

use crate::models::character::{CharacterDetail, CharacterSummary, CharacterValues};
use crate::models::movie::{MovieDetail, MovieSummary, MovieValues};
use crate::repositories::{CharacterMovieRepo, CharacterRepo, MovieRepo};
use crate::store::{CatalogStore, StoreError, StoreResult};
use crate::DbPool;

/// PostgreSQL error codes the store classifies.
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Classify a sqlx error by SQLSTATE and constraint name.
///
/// - `23505` maps to [`StoreError::UniqueViolation`].
/// - `23503` maps to [`StoreError::ForeignKeyViolation`].
/// - Everything else maps to [`StoreError::Backend`].
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().unwrap_or("unknown").to_string();
            match db_err.code().as_deref() {
                Some(UNIQUE_VIOLATION) => return StoreError::UniqueViolation { constraint },
                Some(FOREIGN_KEY_VIOLATION) => {
                    return StoreError::ForeignKeyViolation { constraint }
                }
                _ => {}
            }
        }
        tracing::error!(error = %err, "Database error");
        StoreError::Backend(err.to_string())
    }
}

/// Catalog store backed by a connection pool.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

fn character_edges(character_id: DbId, movie_ids: &[DbId]) -> Vec<Edge> {
    movie_ids
        .iter()
        .map(|movie_id| Edge::new(character_id, *movie_id))
        .collect()
}

fn movie_edges(movie_id: DbId, character_ids: &[DbId]) -> Vec<Edge> {
    character_ids
        .iter()
        .map(|character_id| Edge::new(*character_id, movie_id))
        .collect()
}

#[async_trait]
impl CatalogStore for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        crate::health_check(&self.pool).await?;
        Ok(())
    }

    // --- Characters ---

    async fn list_characters(&self) -> StoreResult<Vec<CharacterDetail>> {
        let characters = CharacterRepo::list(&self.pool).await?;
        let ids: Vec<DbId> = characters.iter().map(|c| c.id).collect();

        let mut movies_by_character: HashMap<DbId, Vec<MovieSummary>> = HashMap::new();
        for linked in CharacterMovieRepo::movies_for_characters(&self.pool, &ids).await? {
            movies_by_character
                .entry(linked.character_id)
                .or_default()
                .push(linked.movie);
        }

        Ok(characters
            .into_iter()
            .map(|character| CharacterDetail {
                movies: movies_by_character.remove(&character.id).unwrap_or_default(),
                character,
            })
            .collect())
    }

    async fn find_character(&self, id: DbId) -> StoreResult<Option<CharacterDetail>> {
        let Some(character) = CharacterRepo::find_by_id(&self.pool, id).await? else {
            return Ok(None);
        };
        let movies = CharacterMovieRepo::movies_for_character(&self.pool, id).await?;
        Ok(Some(CharacterDetail { character, movies }))
    }

    async fn find_character_by_name(&self, name: &str) -> StoreResult<Option<CharacterSummary>> {
        let character = CharacterRepo::find_by_name(&self.pool, name).await?;
        Ok(character.map(|c| c.summary()))
    }

    async fn find_characters_by_ids(&self, ids: &[DbId]) -> StoreResult<Vec<CharacterSummary>> {
        Ok(CharacterRepo::find_summaries_by_ids(&self.pool, ids).await?)
    }

    async fn insert_character(
        &self,
        values: &CharacterValues,
        movie_ids: &[DbId],
    ) -> StoreResult<DbId> {
        let mut tx = self.pool.begin().await?;
        let character = CharacterRepo::create(&mut *tx, values).await?;
        CharacterMovieRepo::insert_many(&mut *tx, &character_edges(character.id, movie_ids))
            .await?;
        tx.commit().await?;
        Ok(character.id)
    }

    async fn save_character(
        &self,
        id: DbId,
        values: &CharacterValues,
        movie_ids: Option<&[DbId]>,
    ) -> StoreResult<bool> {
        let mut tx = self.pool.begin().await?;
        if CharacterRepo::update(&mut *tx, id, values).await?.is_none() {
            return Ok(false);
        }
        if let Some(movie_ids) = movie_ids {
            CharacterMovieRepo::clear_for_character(&mut *tx, id).await?;
            CharacterMovieRepo::insert_many(&mut *tx, &character_edges(id, movie_ids)).await?;
        }
        tx.commit().await?;
        Ok(true)
    }

    async fn delete_character(&self, id: DbId) -> StoreResult<bool> {
        Ok(CharacterRepo::hard_delete(&self.pool, id).await?)
    }

    // --- Movies ---

    async fn list_movies(&self) -> StoreResult<Vec<MovieDetail>> {
        let movies = MovieRepo::list(&self.pool).await?;
        let ids: Vec<DbId> = movies.iter().map(|m| m.id).collect();

        let mut cast_by_movie: HashMap<DbId, Vec<CharacterSummary>> = HashMap::new();
        for linked in CharacterMovieRepo::characters_for_movies(&self.pool, &ids).await? {
            cast_by_movie
                .entry(linked.movie_id)
                .or_default()
                .push(linked.character);
        }

        Ok(movies
            .into_iter()
            .map(|movie| MovieDetail {
                characters: cast_by_movie.remove(&movie.id).unwrap_or_default(),
                movie,
            })
            .collect())
    }

    async fn find_movie(&self, id: DbId) -> StoreResult<Option<MovieDetail>> {
        let Some(movie) = MovieRepo::find_by_id(&self.pool, id).await? else {
            return Ok(None);
        };
        let characters = CharacterMovieRepo::characters_for_movie(&self.pool, id).await?;
        Ok(Some(MovieDetail { movie, characters }))
    }

    async fn find_movie_by_title(&self, title: &str) -> StoreResult<Option<MovieSummary>> {
        let movie = MovieRepo::find_by_title(&self.pool, title).await?;
        Ok(movie.map(|m| m.summary()))
    }

    async fn find_movie_by_episode(&self, episode_id: i32) -> StoreResult<Option<MovieSummary>> {
        let movie = MovieRepo::find_by_episode(&self.pool, episode_id).await?;
        Ok(movie.map(|m| m.summary()))
    }

    async fn find_movies_by_ids(&self, ids: &[DbId]) -> StoreResult<Vec<MovieSummary>> {
        Ok(MovieRepo::find_summaries_by_ids(&self.pool, ids).await?)
    }

    async fn insert_movie(
        &self,
        values: &MovieValues,
        character_ids: &[DbId],
    ) -> StoreResult<DbId> {
        let mut tx = self.pool.begin().await?;
        let movie = MovieRepo::create(&mut *tx, values).await?;
        CharacterMovieRepo::insert_many(&mut *tx, &movie_edges(movie.id, character_ids)).await?;
        tx.commit().await?;
        Ok(movie.id)
    }

    async fn save_movie(
        &self,
        id: DbId,
        values: &MovieValues,
        character_ids: Option<&[DbId]>,
    ) -> StoreResult<bool> {
        let mut tx = self.pool.begin().await?;
        if MovieRepo::update(&mut *tx, id, values).await?.is_none() {
            return Ok(false);
        }
        if let Some(character_ids) = character_ids {
            CharacterMovieRepo::clear_for_movie(&mut *tx, id).await?;
            CharacterMovieRepo::insert_many(&mut *tx, &movie_edges(id, character_ids)).await?;
        }
        tx.commit().await?;
        Ok(true)
    }

    async fn delete_movie(&self, id: DbId) -> StoreResult<bool> {
        Ok(MovieRepo::hard_delete(&self.pool, id).await?)
    }

    // --- Edges ---

    async fn link(&self, edge: Edge) -> StoreResult<()> {
        CharacterMovieRepo::insert(&self.pool, edge).await?;
        Ok(())
    }

    async fn unlink(&self, edge: Edge) -> StoreResult<bool> {
        Ok(CharacterMovieRepo::delete(&self.pool, edge).await?)
    }
}
