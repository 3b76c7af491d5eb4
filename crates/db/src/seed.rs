//! Star Wars sample data.
//!
//! Inserts the six saga films and six principal characters with their
//! appearances. Skips entirely when any character already exists, so it is
//! safe to run on every startup. Films already in the catalog, matched by
//! title or episode, are reused rather than inserted again.

use std::collections::HashMap;

use holocron_core::types::DbId;

use crate::models::character::CharacterValues;
use crate::models::movie::MovieValues;
use crate::store::{CatalogStore, StoreResult};

/// What a seed run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// Data was already present; nothing was written.
    Skipped,
    /// Counts of rows inserted by this run.
    Seeded { movies: usize, characters: usize },
}

struct SeedMovie {
    title: &'static str,
    episode_id: i32,
    director: &'static str,
}

struct SeedCharacter {
    name: &'static str,
    height: &'static str,
    mass: &'static str,
    episodes: &'static [i32],
}

const MOVIES: &[SeedMovie] = &[
    SeedMovie {
        title: "A New Hope",
        episode_id: 4,
        director: "George Lucas",
    },
    SeedMovie {
        title: "The Empire Strikes Back",
        episode_id: 5,
        director: "Irvin Kershner",
    },
    SeedMovie {
        title: "Return of the Jedi",
        episode_id: 6,
        director: "Richard Marquand",
    },
    SeedMovie {
        title: "The Phantom Menace",
        episode_id: 1,
        director: "George Lucas",
    },
    SeedMovie {
        title: "Attack of the Clones",
        episode_id: 2,
        director: "George Lucas",
    },
    SeedMovie {
        title: "Revenge of the Sith",
        episode_id: 3,
        director: "George Lucas",
    },
];

const CHARACTERS: &[SeedCharacter] = &[
    SeedCharacter {
        name: "Luke Skywalker",
        height: "172",
        mass: "77",
        episodes: &[4, 5, 6],
    },
    SeedCharacter {
        name: "Darth Vader",
        height: "202",
        mass: "136",
        episodes: &[4, 5, 6, 3],
    },
    SeedCharacter {
        name: "Leia Organa",
        height: "150",
        mass: "49",
        episodes: &[4, 5, 6],
    },
    SeedCharacter {
        name: "Obi-Wan Kenobi",
        height: "182",
        mass: "77",
        episodes: &[4, 1, 2, 3],
    },
    SeedCharacter {
        name: "Anakin Skywalker",
        height: "188",
        mass: "84",
        episodes: &[1, 2, 3],
    },
    SeedCharacter {
        name: "Yoda",
        height: "66",
        mass: "17",
        episodes: &[5, 6, 1, 2, 3],
    },
];

/// Load the sample catalog unless characters already exist.
pub async fn seed_star_wars(store: &dyn CatalogStore) -> StoreResult<SeedOutcome> {
    if !store.list_characters().await?.is_empty() {
        tracing::info!("Catalog already populated, skipping seed");
        return Ok(SeedOutcome::Skipped);
    }

    let mut movie_ids: HashMap<i32, DbId> = HashMap::new();
    let mut inserted_movies = 0;
    for movie in MOVIES {
        let id = match existing_movie(store, movie).await? {
            Some(id) => {
                tracing::debug!(movie_id = id, title = movie.title, "Reusing existing film");
                id
            }
            None => {
                inserted_movies += 1;
                store
                    .insert_movie(
                        &MovieValues {
                            title: movie.title.to_string(),
                            episode_id: Some(movie.episode_id),
                            director: Some(movie.director.to_string()),
                        },
                        &[],
                    )
                    .await?
            }
        };
        movie_ids.insert(movie.episode_id, id);
    }

    for character in CHARACTERS {
        let linked: Vec<DbId> = character
            .episodes
            .iter()
            .filter_map(|episode| movie_ids.get(episode).copied())
            .collect();
        store
            .insert_character(
                &CharacterValues {
                    name: character.name.to_string(),
                    height: Some(character.height.to_string()),
                    mass: Some(character.mass.to_string()),
                },
                &linked,
            )
            .await?;
    }

    tracing::info!(
        movies = inserted_movies,
        characters = CHARACTERS.len(),
        "Seeded Star Wars catalog"
    );
    Ok(SeedOutcome::Seeded {
        movies: inserted_movies,
        characters: CHARACTERS.len(),
    })
}

/// Id of a catalog film that already holds this title or episode.
async fn existing_movie(
    store: &dyn CatalogStore,
    movie: &SeedMovie,
) -> StoreResult<Option<DbId>> {
    if let Some(found) = store.find_movie_by_title(movie.title).await? {
        return Ok(Some(found.id));
    }
    Ok(store
        .find_movie_by_episode(movie.episode_id)
        .await?
        .map(|found| found.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn seeds_films_and_characters_with_links() {
        let store = MemoryStore::new();
        let outcome = seed_star_wars(&store).await.unwrap();
        assert_eq!(
            outcome,
            SeedOutcome::Seeded {
                movies: 6,
                characters: 6
            }
        );

        let yoda = store.find_character_by_name("Yoda").await.unwrap().unwrap();
        let detail = store.find_character(yoda.id).await.unwrap().unwrap();
        let episodes: Vec<Option<i32>> = detail.movies.iter().map(|m| m.episode_id).collect();
        assert_eq!(episodes, [Some(1), Some(2), Some(3), Some(5), Some(6)]);
        assert_eq!(store.edge_count().await, 22);
    }

    #[tokio::test]
    async fn second_run_is_skipped() {
        let store = MemoryStore::new();
        seed_star_wars(&store).await.unwrap();
        assert_eq!(seed_star_wars(&store).await.unwrap(), SeedOutcome::Skipped);
        assert_eq!(store.list_movies().await.unwrap().len(), 6);
    }

    async fn insert_film(store: &MemoryStore, title: &str, episode_id: i32) -> DbId {
        store
            .insert_movie(
                &MovieValues {
                    title: title.into(),
                    episode_id: Some(episode_id),
                    director: None,
                },
                &[],
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn existing_film_is_reused_and_linked() {
        let store = MemoryStore::new();
        let jedi = insert_film(&store, "Return of the Jedi", 6).await;

        assert_eq!(
            seed_star_wars(&store).await.unwrap(),
            SeedOutcome::Seeded {
                movies: 5,
                characters: 6
            }
        );
        assert_eq!(store.list_movies().await.unwrap().len(), 6);
        assert_eq!(store.edge_count().await, 22);

        let cast: Vec<String> = store
            .find_movie(jedi)
            .await
            .unwrap()
            .unwrap()
            .characters
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(cast, ["Darth Vader", "Leia Organa", "Luke Skywalker", "Yoda"]);

        assert_eq!(seed_star_wars(&store).await.unwrap(), SeedOutcome::Skipped);
    }

    #[tokio::test]
    async fn film_matching_only_by_episode_is_reused() {
        let store = MemoryStore::new();
        let original = insert_film(&store, "Star Wars", 4).await;

        seed_star_wars(&store).await.unwrap();

        let titles: Vec<String> = store
            .list_movies()
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.movie.title)
            .collect();
        assert_eq!(titles.len(), 6);
        assert!(titles.contains(&"Star Wars".to_string()));
        assert!(!titles.contains(&"A New Hope".to_string()));

        let luke = store
            .find_character_by_name("Luke Skywalker")
            .await
            .unwrap()
            .unwrap();
        let detail = store.find_character(luke.id).await.unwrap().unwrap();
        assert!(detail.movies.iter().any(|m| m.id == original));
    }
}
