//! The Movie directory.

use std::sync::Arc;

use async_trait::async_trait;
use holocron_core::error::CoreError;
use holocron_core::relationship::Edge;
use holocron_core::types::DbId;
use holocron_db::models::character::CharacterSummary;
use holocron_db::models::movie::{CreateMovie, MovieDetail, MovieValues, UpdateMovie};
use holocron_db::store::{
    CatalogStore, StoreError, StoreResult, UQ_MOVIES_EPISODE_ID, UQ_MOVIES_TITLE,
};

use super::{Relation, Side};

/// Movies own the relationship from the movie end.
pub struct MovieSide;

#[async_trait]
impl Side for MovieSide {
    const OWNER: &'static str = "Movie";
    const RELATED: &'static str = "Character";

    type Detail = MovieDetail;
    type Related = CharacterSummary;

    async fn load(store: &dyn CatalogStore, id: DbId) -> StoreResult<Option<MovieDetail>> {
        store.find_movie(id).await
    }

    async fn load_related(
        store: &dyn CatalogStore,
        ids: &[DbId],
    ) -> StoreResult<Vec<CharacterSummary>> {
        store.find_characters_by_ids(ids).await
    }

    async fn delete(store: &dyn CatalogStore, id: DbId) -> StoreResult<bool> {
        store.delete_movie(id).await
    }

    fn label(detail: &MovieDetail) -> &str {
        &detail.movie.title
    }

    fn related(detail: &MovieDetail) -> &[CharacterSummary] {
        &detail.characters
    }

    fn related_id(related: &CharacterSummary) -> DbId {
        related.id
    }

    fn related_label(related: &CharacterSummary) -> &str {
        &related.name
    }

    fn edge(owner_id: DbId, related_id: DbId) -> Edge {
        Edge::new(related_id, owner_id)
    }
}

fn title_taken(title: &str) -> CoreError {
    CoreError::Conflict(format!("Movie with title \"{title}\" already exists"))
}

fn episode_taken(episode_id: i32) -> CoreError {
    CoreError::Conflict(format!("Movie with episode ID {episode_id} already exists"))
}

/// Map a write failure, turning a lost race on either unique constraint into
/// the conflict the matching pre-check reports.
fn remap_write_error(err: StoreError, values: &MovieValues) -> CoreError {
    if err.is_unique(UQ_MOVIES_TITLE) {
        tracing::warn!(title = %values.title, "Movie title taken by a concurrent write");
        return title_taken(&values.title);
    }
    if err.is_unique(UQ_MOVIES_EPISODE_ID) {
        if let Some(episode_id) = values.episode_id {
            tracing::warn!(episode_id, "Movie episode taken by a concurrent write");
            return episode_taken(episode_id);
        }
    }
    err.into()
}

/// Movie lifecycle plus the movie end of the relationship.
#[derive(Clone)]
pub struct MovieDirectory {
    store: Arc<dyn CatalogStore>,
    relation: Relation<MovieSide>,
}

impl MovieDirectory {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self {
            relation: Relation::new(Arc::clone(&store)),
            store,
        }
    }

    async fn ensure_title_free(&self, title: &str) -> Result<(), CoreError> {
        if self.store.find_movie_by_title(title).await?.is_some() {
            return Err(title_taken(title));
        }
        Ok(())
    }

    async fn ensure_episode_free(&self, episode_id: i32) -> Result<(), CoreError> {
        if self.store.find_movie_by_episode(episode_id).await?.is_some() {
            return Err(episode_taken(episode_id));
        }
        Ok(())
    }

    pub async fn create(&self, input: CreateMovie) -> Result<MovieDetail, CoreError> {
        let input = input.into_validated()?;
        self.ensure_title_free(&input.title).await?;
        if let Some(episode_id) = input.episode_id {
            self.ensure_episode_free(episode_id).await?;
        }

        let characters = self
            .relation
            .validate_exist(input.character_ids.as_deref().unwrap_or_default())
            .await?;
        let character_ids: Vec<DbId> = characters.iter().map(|c| c.id).collect();

        let values = input.values();
        let id = self
            .store
            .insert_movie(&values, &character_ids)
            .await
            .map_err(|err| remap_write_error(err, &values))?;

        tracing::info!(movie_id = id, title = %values.title, characters = character_ids.len(), "Movie created");
        self.relation.find_one(id).await
    }

    /// Every movie by episode (unnumbered last), each with its cast.
    pub async fn find_all(&self) -> Result<Vec<MovieDetail>, CoreError> {
        Ok(self.store.list_movies().await?)
    }

    pub async fn find_one(&self, id: DbId) -> Result<MovieDetail, CoreError> {
        self.relation.find_one(id).await
    }

    /// Apply the supplied fields. Title and episode are re-checked for
    /// uniqueness only when they change. `characterIds`, when present,
    /// replaces the cast wholesale; an empty array clears it.
    pub async fn update(&self, id: DbId, input: UpdateMovie) -> Result<MovieDetail, CoreError> {
        let input = input.into_validated()?;
        let current = self.relation.find_one(id).await?;

        if let Some(title) = input.title.as_deref() {
            if title != current.movie.title {
                self.ensure_title_free(title).await?;
            }
        }
        if let Some(episode_id) = input.episode_id {
            if Some(episode_id) != current.movie.episode_id {
                self.ensure_episode_free(episode_id).await?;
            }
        }

        let character_ids = match input.character_ids.as_deref() {
            Some(ids) => Some(
                self.relation
                    .validate_exist(ids)
                    .await?
                    .iter()
                    .map(|c| c.id)
                    .collect::<Vec<_>>(),
            ),
            None => None,
        };

        let values = input.merge_into(current.movie.values());
        let saved = self
            .store
            .save_movie(id, &values, character_ids.as_deref())
            .await
            .map_err(|err| remap_write_error(err, &values))?;
        if !saved {
            return Err(CoreError::not_found("Movie", id));
        }

        tracing::info!(movie_id = id, "Movie updated");
        self.relation.find_one(id).await
    }

    /// Delete a movie that has no characters.
    pub async fn remove(&self, id: DbId) -> Result<(), CoreError> {
        self.relation.remove(id).await
    }

    pub async fn get_characters(&self, id: DbId) -> Result<Vec<CharacterSummary>, CoreError> {
        self.relation.related(id).await
    }

    pub async fn add_character(
        &self,
        movie_id: DbId,
        character_id: DbId,
    ) -> Result<MovieDetail, CoreError> {
        self.relation.add(movie_id, character_id).await
    }

    pub async fn remove_character(&self, movie_id: DbId, character_id: DbId) -> Result<(), CoreError> {
        self.relation.remove_edge(movie_id, character_id).await
    }
}
