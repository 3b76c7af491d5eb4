//! [`CatalogStore`] held in process.
//!
//! Enforces the same unique and foreign-key constraints as the PostgreSQL
//! schema, under the same constraint names, so directory behaviour is
//! identical over either store. Used by the API test-suite and for running
//! the service without a database.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use chrono::Utc;
use holocron_core::relationship::{dedup_ids, Edge};
use holocron_core::types::DbId;
use tokio::sync::RwLock;

use crate::models::character::{Character, CharacterDetail, CharacterSummary, CharacterValues};
use crate::models::movie::{Movie, MovieDetail, MovieSummary, MovieValues};
use crate::store::{
    CatalogStore, StoreError, StoreResult, FK_CHARACTER_MOVIES_CHARACTER,
    FK_CHARACTER_MOVIES_MOVIE, PK_CHARACTER_MOVIES, UQ_CHARACTERS_NAME, UQ_MOVIES_EPISODE_ID,
    UQ_MOVIES_TITLE,
};

#[derive(Debug, Default)]
struct State {
    last_character_id: DbId,
    last_movie_id: DbId,
    characters: BTreeMap<DbId, Character>,
    movies: BTreeMap<DbId, Movie>,
    edges: BTreeSet<Edge>,
}

fn unique(constraint: &str) -> StoreError {
    StoreError::UniqueViolation {
        constraint: constraint.to_string(),
    }
}

fn foreign_key(constraint: &str) -> StoreError {
    StoreError::ForeignKeyViolation {
        constraint: constraint.to_string(),
    }
}

impl State {
    fn active_character(&self, id: DbId) -> Option<&Character> {
        self.characters.get(&id).filter(|c| c.deleted_at.is_none())
    }

    fn active_movie(&self, id: DbId) -> Option<&Movie> {
        self.movies.get(&id).filter(|m| m.deleted_at.is_none())
    }

    fn check_character_unique(&self, values: &CharacterValues, own_id: Option<DbId>) -> StoreResult<()> {
        let taken = self
            .characters
            .values()
            .any(|c| Some(c.id) != own_id && c.name == values.name);
        if taken {
            return Err(unique(UQ_CHARACTERS_NAME));
        }
        Ok(())
    }

    fn check_movie_unique(&self, values: &MovieValues, own_id: Option<DbId>) -> StoreResult<()> {
        let others = || self.movies.values().filter(move |m| Some(m.id) != own_id);
        if others().any(|m| m.title == values.title) {
            return Err(unique(UQ_MOVIES_TITLE));
        }
        if values.episode_id.is_some() && others().any(|m| m.episode_id == values.episode_id) {
            return Err(unique(UQ_MOVIES_EPISODE_ID));
        }
        Ok(())
    }

    fn check_edge_targets(&self, edges: &[Edge]) -> StoreResult<()> {
        for edge in edges {
            if !self.characters.contains_key(&edge.character_id) {
                return Err(foreign_key(FK_CHARACTER_MOVIES_CHARACTER));
            }
            if !self.movies.contains_key(&edge.movie_id) {
                return Err(foreign_key(FK_CHARACTER_MOVIES_MOVIE));
            }
        }
        Ok(())
    }

    /// Movies of one character, by episode (unnumbered last), then id.
    fn movies_of(&self, character_id: DbId) -> Vec<MovieSummary> {
        let mut movies: Vec<&Movie> = self
            .edges
            .iter()
            .filter(|edge| edge.character_id == character_id)
            .filter_map(|edge| self.active_movie(edge.movie_id))
            .collect();
        movies.sort_by_key(|m| (m.episode_id.is_none(), m.episode_id, m.id));
        movies.into_iter().map(Movie::summary).collect()
    }

    /// Cast of one movie, by name.
    fn characters_of(&self, movie_id: DbId) -> Vec<CharacterSummary> {
        let mut characters: Vec<&Character> = self
            .edges
            .iter()
            .filter(|edge| edge.movie_id == movie_id)
            .filter_map(|edge| self.active_character(edge.character_id))
            .collect();
        characters.sort_by(|a, b| a.name.cmp(&b.name));
        characters.into_iter().map(Character::summary).collect()
    }

    fn character_detail(&self, character: &Character) -> CharacterDetail {
        CharacterDetail {
            character: character.clone(),
            movies: self.movies_of(character.id),
        }
    }

    fn movie_detail(&self, movie: &Movie) -> MovieDetail {
        MovieDetail {
            movie: movie.clone(),
            characters: self.characters_of(movie.id),
        }
    }
}

/// In-process catalog store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of edges currently held, for assertions in tests.
    pub async fn edge_count(&self) -> usize {
        self.state.read().await.edges.len()
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    // --- Characters ---

    async fn list_characters(&self) -> StoreResult<Vec<CharacterDetail>> {
        let state = self.state.read().await;
        let mut characters: Vec<&Character> = state
            .characters
            .values()
            .filter(|c| c.deleted_at.is_none())
            .collect();
        characters.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(characters
            .into_iter()
            .map(|c| state.character_detail(c))
            .collect())
    }

    async fn find_character(&self, id: DbId) -> StoreResult<Option<CharacterDetail>> {
        let state = self.state.read().await;
        Ok(state.active_character(id).map(|c| state.character_detail(c)))
    }

    async fn find_character_by_name(&self, name: &str) -> StoreResult<Option<CharacterSummary>> {
        let state = self.state.read().await;
        Ok(state
            .characters
            .values()
            .find(|c| c.deleted_at.is_none() && c.name == name)
            .map(Character::summary))
    }

    async fn find_characters_by_ids(&self, ids: &[DbId]) -> StoreResult<Vec<CharacterSummary>> {
        let state = self.state.read().await;
        Ok(dedup_ids(ids)
            .into_iter()
            .filter_map(|id| state.active_character(id))
            .map(Character::summary)
            .collect())
    }

    async fn insert_character(
        &self,
        values: &CharacterValues,
        movie_ids: &[DbId],
    ) -> StoreResult<DbId> {
        let mut state = self.state.write().await;
        state.check_character_unique(values, None)?;

        let id = state.last_character_id + 1;
        let edges: Vec<Edge> = movie_ids.iter().map(|m| Edge::new(id, *m)).collect();
        for edge in &edges {
            if !state.movies.contains_key(&edge.movie_id) {
                return Err(foreign_key(FK_CHARACTER_MOVIES_MOVIE));
            }
        }
        if dedup_ids(movie_ids).len() != movie_ids.len() {
            return Err(unique(PK_CHARACTER_MOVIES));
        }

        let now = Utc::now();
        state.last_character_id = id;
        state.characters.insert(
            id,
            Character {
                id,
                name: values.name.clone(),
                height: values.height.clone(),
                mass: values.mass.clone(),
                created_at: now,
                updated_at: now,
                deleted_at: None,
            },
        );
        state.edges.extend(edges);
        Ok(id)
    }

    async fn save_character(
        &self,
        id: DbId,
        values: &CharacterValues,
        movie_ids: Option<&[DbId]>,
    ) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        if state.active_character(id).is_none() {
            return Ok(false);
        }
        state.check_character_unique(values, Some(id))?;

        let replacement = match movie_ids {
            Some(ids) => {
                if dedup_ids(ids).len() != ids.len() {
                    return Err(unique(PK_CHARACTER_MOVIES));
                }
                let edges: Vec<Edge> = ids.iter().map(|m| Edge::new(id, *m)).collect();
                state.check_edge_targets(&edges)?;
                Some(edges)
            }
            None => None,
        };

        if let Some(character) = state.characters.get_mut(&id) {
            character.name = values.name.clone();
            character.height = values.height.clone();
            character.mass = values.mass.clone();
            character.updated_at = Utc::now();
        }
        if let Some(edges) = replacement {
            state.edges.retain(|edge| edge.character_id != id);
            state.edges.extend(edges);
        }
        Ok(true)
    }

    async fn delete_character(&self, id: DbId) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        if state.characters.remove(&id).is_none() {
            return Ok(false);
        }
        state.edges.retain(|edge| edge.character_id != id);
        Ok(true)
    }

    // --- Movies ---

    async fn list_movies(&self) -> StoreResult<Vec<MovieDetail>> {
        let state = self.state.read().await;
        let mut movies: Vec<&Movie> = state
            .movies
            .values()
            .filter(|m| m.deleted_at.is_none())
            .collect();
        movies.sort_by_key(|m| (m.episode_id.is_none(), m.episode_id, m.id));
        Ok(movies.into_iter().map(|m| state.movie_detail(m)).collect())
    }

    async fn find_movie(&self, id: DbId) -> StoreResult<Option<MovieDetail>> {
        let state = self.state.read().await;
        Ok(state.active_movie(id).map(|m| state.movie_detail(m)))
    }

    async fn find_movie_by_title(&self, title: &str) -> StoreResult<Option<MovieSummary>> {
        let state = self.state.read().await;
        Ok(state
            .movies
            .values()
            .find(|m| m.deleted_at.is_none() && m.title == title)
            .map(Movie::summary))
    }

    async fn find_movie_by_episode(&self, episode_id: i32) -> StoreResult<Option<MovieSummary>> {
        let state = self.state.read().await;
        Ok(state
            .movies
            .values()
            .find(|m| m.deleted_at.is_none() && m.episode_id == Some(episode_id))
            .map(Movie::summary))
    }

    async fn find_movies_by_ids(&self, ids: &[DbId]) -> StoreResult<Vec<MovieSummary>> {
        let state = self.state.read().await;
        Ok(dedup_ids(ids)
            .into_iter()
            .filter_map(|id| state.active_movie(id))
            .map(Movie::summary)
            .collect())
    }

    async fn insert_movie(
        &self,
        values: &MovieValues,
        character_ids: &[DbId],
    ) -> StoreResult<DbId> {
        let mut state = self.state.write().await;
        state.check_movie_unique(values, None)?;

        let id = state.last_movie_id + 1;
        let edges: Vec<Edge> = character_ids.iter().map(|c| Edge::new(*c, id)).collect();
        for edge in &edges {
            if !state.characters.contains_key(&edge.character_id) {
                return Err(foreign_key(FK_CHARACTER_MOVIES_CHARACTER));
            }
        }
        if dedup_ids(character_ids).len() != character_ids.len() {
            return Err(unique(PK_CHARACTER_MOVIES));
        }

        let now = Utc::now();
        state.last_movie_id = id;
        state.movies.insert(
            id,
            Movie {
                id,
                title: values.title.clone(),
                episode_id: values.episode_id,
                director: values.director.clone(),
                created_at: now,
                updated_at: now,
                deleted_at: None,
            },
        );
        state.edges.extend(edges);
        Ok(id)
    }

    async fn save_movie(
        &self,
        id: DbId,
        values: &MovieValues,
        character_ids: Option<&[DbId]>,
    ) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        if state.active_movie(id).is_none() {
            return Ok(false);
        }
        state.check_movie_unique(values, Some(id))?;

        let replacement = match character_ids {
            Some(ids) => {
                if dedup_ids(ids).len() != ids.len() {
                    return Err(unique(PK_CHARACTER_MOVIES));
                }
                let edges: Vec<Edge> = ids.iter().map(|c| Edge::new(*c, id)).collect();
                state.check_edge_targets(&edges)?;
                Some(edges)
            }
            None => None,
        };

        if let Some(movie) = state.movies.get_mut(&id) {
            movie.title = values.title.clone();
            movie.episode_id = values.episode_id;
            movie.director = values.director.clone();
            movie.updated_at = Utc::now();
        }
        if let Some(edges) = replacement {
            state.edges.retain(|edge| edge.movie_id != id);
            state.edges.extend(edges);
        }
        Ok(true)
    }

    async fn delete_movie(&self, id: DbId) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        if state.movies.remove(&id).is_none() {
            return Ok(false);
        }
        state.edges.retain(|edge| edge.movie_id != id);
        Ok(true)
    }

    // --- Edges ---

    async fn link(&self, edge: Edge) -> StoreResult<()> {
        let mut state = self.state.write().await;
        state.check_edge_targets(&[edge])?;
        if !state.edges.insert(edge) {
            return Err(unique(PK_CHARACTER_MOVIES));
        }
        Ok(())
    }

    async fn unlink(&self, edge: Edge) -> StoreResult<bool> {
        Ok(self.state.write().await.edges.remove(&edge))
    }
}
