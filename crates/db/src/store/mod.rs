//! The storage seam between the directories and persisted state.
//!
//! [`CatalogStore`] is deliberately narrow: single-entity reads, bulk id
//! lookups for relationship validation, one atomic persist per aggregate
//! and single-edge link/unlink. Two implementations exist:
//! [`PgStore`] over PostgreSQL and [`MemoryStore`] held in process.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use holocron_core::error::CoreError;
use holocron_core::relationship::Edge;
use holocron_core::types::DbId;

use crate::models::character::{CharacterDetail, CharacterSummary, CharacterValues};
use crate::models::movie::{MovieDetail, MovieSummary, MovieValues};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/* --------------------------------------------------------------------------
Constraint names
-------------------------------------------------------------------------- */

pub const UQ_CHARACTERS_NAME: &str = "uq_characters_name";
pub const UQ_MOVIES_TITLE: &str = "uq_movies_title";
pub const UQ_MOVIES_EPISODE_ID: &str = "uq_movies_episode_id";
pub const PK_CHARACTER_MOVIES: &str = "pk_character_movies";
pub const FK_CHARACTER_MOVIES_CHARACTER: &str = "fk_character_movies_character";
pub const FK_CHARACTER_MOVIES_MOVIE: &str = "fk_character_movies_movie";

/* --------------------------------------------------------------------------
Errors
-------------------------------------------------------------------------- */

/// Storage failures, classified so callers can remap constraint hits.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    #[error("foreign key constraint violated: {constraint}")]
    ForeignKeyViolation { constraint: String },

    #[error("storage backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// `true` when this is a unique violation on `constraint`.
    pub fn is_unique(&self, constraint: &str) -> bool {
        matches!(self, StoreError::UniqueViolation { constraint: c } if c == constraint)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Fallback mapping for errors a directory did not remap itself.
impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation { constraint } => CoreError::Conflict(format!(
                "Duplicate value violates unique constraint: {constraint}"
            )),
            StoreError::ForeignKeyViolation { .. } => {
                CoreError::BadRequest("Referenced record does not exist".to_string())
            }
            StoreError::Backend(msg) => CoreError::Internal(msg),
        }
    }
}

/* --------------------------------------------------------------------------
Store trait
-------------------------------------------------------------------------- */

/// Persistence operations for characters, movies and their edges.
///
/// Every read skips soft-deleted rows. Every write is one atomic persist.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Reachability check used by the health endpoint.
    async fn ping(&self) -> StoreResult<()>;

    // --- Characters ---

    /// All characters ordered by name ascending, each with its movies.
    async fn list_characters(&self) -> StoreResult<Vec<CharacterDetail>>;

    async fn find_character(&self, id: DbId) -> StoreResult<Option<CharacterDetail>>;

    async fn find_character_by_name(&self, name: &str) -> StoreResult<Option<CharacterSummary>>;

    /// Summaries for every id that exists; order is unspecified.
    async fn find_characters_by_ids(&self, ids: &[DbId]) -> StoreResult<Vec<CharacterSummary>>;

    /// Insert a character and its edges together, returning the new id.
    async fn insert_character(
        &self,
        values: &CharacterValues,
        movie_ids: &[DbId],
    ) -> StoreResult<DbId>;

    /// Overwrite a character's scalar columns; when `movie_ids` is
    /// `Some`, replace its edge set wholesale. `Ok(false)` if absent.
    async fn save_character(
        &self,
        id: DbId,
        values: &CharacterValues,
        movie_ids: Option<&[DbId]>,
    ) -> StoreResult<bool>;

    /// Hard delete; edges cascade. `Ok(false)` if absent.
    async fn delete_character(&self, id: DbId) -> StoreResult<bool>;

    // --- Movies ---

    /// All movies by episode ascending (unnumbered last), each with its cast.
    async fn list_movies(&self) -> StoreResult<Vec<MovieDetail>>;

    async fn find_movie(&self, id: DbId) -> StoreResult<Option<MovieDetail>>;

    async fn find_movie_by_title(&self, title: &str) -> StoreResult<Option<MovieSummary>>;

    async fn find_movie_by_episode(&self, episode_id: i32) -> StoreResult<Option<MovieSummary>>;

    /// Summaries for every id that exists; order is unspecified.
    async fn find_movies_by_ids(&self, ids: &[DbId]) -> StoreResult<Vec<MovieSummary>>;

    async fn insert_movie(&self, values: &MovieValues, character_ids: &[DbId])
        -> StoreResult<DbId>;

    async fn save_movie(
        &self,
        id: DbId,
        values: &MovieValues,
        character_ids: Option<&[DbId]>,
    ) -> StoreResult<bool>;

    async fn delete_movie(&self, id: DbId) -> StoreResult<bool>;

    // --- Edges ---

    /// Insert one edge. A duplicate raises [`PK_CHARACTER_MOVIES`].
    async fn link(&self, edge: Edge) -> StoreResult<()>;

    /// Delete one edge. `Ok(false)` if it did not exist.
    async fn unlink(&self, edge: Edge) -> StoreResult<bool>;
}
