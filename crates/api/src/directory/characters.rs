//! The Character directory.

use std::sync::Arc;

use async_trait::async_trait;
use holocron_core::error::CoreError;
use holocron_core::relationship::Edge;
use holocron_core::types::DbId;
use holocron_db::models::character::{CharacterDetail, CreateCharacter, UpdateCharacter};
use holocron_db::models::movie::MovieSummary;
use holocron_db::store::{CatalogStore, StoreError, StoreResult, UQ_CHARACTERS_NAME};

use super::{Relation, Side};

/// Characters own the relationship from the character end.
pub struct CharacterSide;

#[async_trait]
impl Side for CharacterSide {
    const OWNER: &'static str = "Character";
    const RELATED: &'static str = "Movie";

    type Detail = CharacterDetail;
    type Related = MovieSummary;

    async fn load(store: &dyn CatalogStore, id: DbId) -> StoreResult<Option<CharacterDetail>> {
        store.find_character(id).await
    }

    async fn load_related(store: &dyn CatalogStore, ids: &[DbId]) -> StoreResult<Vec<MovieSummary>> {
        store.find_movies_by_ids(ids).await
    }

    async fn delete(store: &dyn CatalogStore, id: DbId) -> StoreResult<bool> {
        store.delete_character(id).await
    }

    fn label(detail: &CharacterDetail) -> &str {
        &detail.character.name
    }

    fn related(detail: &CharacterDetail) -> &[MovieSummary] {
        &detail.movies
    }

    fn related_id(related: &MovieSummary) -> DbId {
        related.id
    }

    fn related_label(related: &MovieSummary) -> &str {
        &related.title
    }

    fn edge(owner_id: DbId, related_id: DbId) -> Edge {
        Edge::new(owner_id, related_id)
    }
}

fn name_taken(name: &str) -> CoreError {
    CoreError::Conflict(format!("Character with name \"{name}\" already exists"))
}

/// Map a write failure, turning a lost race on the name constraint into the
/// same conflict the pre-check reports.
fn remap_write_error(err: StoreError, name: &str) -> CoreError {
    if err.is_unique(UQ_CHARACTERS_NAME) {
        tracing::warn!(name, "Character name taken by a concurrent write");
        return name_taken(name);
    }
    err.into()
}

/// Character lifecycle plus the character end of the relationship.
#[derive(Clone)]
pub struct CharacterDirectory {
    store: Arc<dyn CatalogStore>,
    relation: Relation<CharacterSide>,
}

impl CharacterDirectory {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self {
            relation: Relation::new(Arc::clone(&store)),
            store,
        }
    }

    async fn ensure_name_free(&self, name: &str) -> Result<(), CoreError> {
        if self.store.find_character_by_name(name).await?.is_some() {
            return Err(name_taken(name));
        }
        Ok(())
    }

    pub async fn create(&self, input: CreateCharacter) -> Result<CharacterDetail, CoreError> {
        let input = input.into_validated()?;
        self.ensure_name_free(&input.name).await?;

        let movies = self
            .relation
            .validate_exist(input.movie_ids.as_deref().unwrap_or_default())
            .await?;
        let movie_ids: Vec<DbId> = movies.iter().map(|m| m.id).collect();

        let id = self
            .store
            .insert_character(&input.values(), &movie_ids)
            .await
            .map_err(|err| remap_write_error(err, &input.name))?;

        tracing::info!(character_id = id, name = %input.name, movies = movie_ids.len(), "Character created");
        self.relation.find_one(id).await
    }

    /// Every character by name, each with its movies.
    pub async fn find_all(&self) -> Result<Vec<CharacterDetail>, CoreError> {
        Ok(self.store.list_characters().await?)
    }

    pub async fn find_one(&self, id: DbId) -> Result<CharacterDetail, CoreError> {
        self.relation.find_one(id).await
    }

    /// Apply the supplied fields. `movieIds`, when present, replaces the
    /// movie set wholesale; an empty array clears it.
    pub async fn update(
        &self,
        id: DbId,
        input: UpdateCharacter,
    ) -> Result<CharacterDetail, CoreError> {
        let input = input.into_validated()?;
        let current = self.relation.find_one(id).await?;

        if let Some(name) = input.name.as_deref() {
            if name != current.character.name {
                self.ensure_name_free(name).await?;
            }
        }

        let movie_ids = match input.movie_ids.as_deref() {
            Some(ids) => Some(
                self.relation
                    .validate_exist(ids)
                    .await?
                    .iter()
                    .map(|m| m.id)
                    .collect::<Vec<_>>(),
            ),
            None => None,
        };

        let values = input.merge_into(current.character.values());
        let saved = self
            .store
            .save_character(id, &values, movie_ids.as_deref())
            .await
            .map_err(|err| remap_write_error(err, &values.name))?;
        if !saved {
            return Err(CoreError::not_found("Character", id));
        }

        tracing::info!(character_id = id, "Character updated");
        self.relation.find_one(id).await
    }

    /// Delete a character that has no movies.
    pub async fn remove(&self, id: DbId) -> Result<(), CoreError> {
        self.relation.remove(id).await
    }

    pub async fn get_movies(&self, id: DbId) -> Result<Vec<MovieSummary>, CoreError> {
        self.relation.related(id).await
    }

    pub async fn add_movie(
        &self,
        character_id: DbId,
        movie_id: DbId,
    ) -> Result<CharacterDetail, CoreError> {
        self.relation.add(character_id, movie_id).await
    }

    pub async fn remove_movie(&self, character_id: DbId, movie_id: DbId) -> Result<(), CoreError> {
        self.relation.remove_edge(character_id, movie_id).await
    }
}
