//! Integration tests for the PostgreSQL catalog store.
//!
//! Exercises the repositories and [`PgStore`] against a real database:
//! - Insert with edges in one transaction
//! - Named unique constraints surface as classified store errors
//! - Edge insert/delete and cascade on delete
//! - Ordering of list queries

use assert_matches::assert_matches;
use holocron_core::relationship::Edge;
use holocron_db::models::character::CharacterValues;
use holocron_db::models::movie::MovieValues;
use holocron_db::repositories::{CharacterMovieRepo, CharacterRepo, MovieRepo};
use holocron_db::seed::{seed_star_wars, SeedOutcome};
use holocron_db::store::{
    CatalogStore, PgStore, StoreError, PK_CHARACTER_MOVIES, UQ_CHARACTERS_NAME,
    UQ_MOVIES_EPISODE_ID, UQ_MOVIES_TITLE,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_character(name: &str) -> CharacterValues {
    CharacterValues {
        name: name.to_string(),
        height: Some("172".to_string()),
        mass: None,
    }
}

fn new_movie(title: &str, episode_id: Option<i32>) -> MovieValues {
    MovieValues {
        title: title.to_string(),
        episode_id,
        director: Some("George Lucas".to_string()),
    }
}

// ---------------------------------------------------------------------------
// Test: Repositories
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_character_repo_create_and_find(pool: PgPool) {
    let created = CharacterRepo::create(&pool, &new_character("Luke Skywalker"))
        .await
        .unwrap();
    assert_eq!(created.name, "Luke Skywalker");
    assert!(created.deleted_at.is_none());

    let found = CharacterRepo::find_by_name(&pool, "Luke Skywalker")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, created.id);

    // Name lookup is case-sensitive.
    assert!(CharacterRepo::find_by_name(&pool, "luke skywalker")
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_soft_deleted_rows_are_invisible(pool: PgPool) {
    let created = CharacterRepo::create(&pool, &new_character("Jar Jar Binks"))
        .await
        .unwrap();
    sqlx::query("UPDATE characters SET deleted_at = NOW() WHERE id = $1")
        .bind(created.id)
        .execute(&pool)
        .await
        .unwrap();

    assert!(CharacterRepo::find_by_id(&pool, created.id)
        .await
        .unwrap()
        .is_none());
    assert!(CharacterRepo::list(&pool).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_movie_list_orders_unnumbered_last(pool: PgPool) {
    MovieRepo::create(&pool, &new_movie("Rogue One", None))
        .await
        .unwrap();
    MovieRepo::create(&pool, &new_movie("A New Hope", Some(4)))
        .await
        .unwrap();
    MovieRepo::create(&pool, &new_movie("The Phantom Menace", Some(1)))
        .await
        .unwrap();

    let titles: Vec<String> = MovieRepo::list(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.title)
        .collect();
    assert_eq!(titles, ["The Phantom Menace", "A New Hope", "Rogue One"]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_edge_insert_and_delete(pool: PgPool) {
    let character = CharacterRepo::create(&pool, &new_character("Han Solo"))
        .await
        .unwrap();
    let movie = MovieRepo::create(&pool, &new_movie("A New Hope", Some(4)))
        .await
        .unwrap();
    let edge = Edge::new(character.id, movie.id);

    CharacterMovieRepo::insert(&pool, edge).await.unwrap();
    let movies = CharacterMovieRepo::movies_for_character(&pool, character.id)
        .await
        .unwrap();
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0].title, "A New Hope");

    assert!(CharacterMovieRepo::delete(&pool, edge).await.unwrap());
    assert!(!CharacterMovieRepo::delete(&pool, edge).await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_insert_many_skips_existing_edges(pool: PgPool) {
    let character = CharacterRepo::create(&pool, &new_character("Biggs Darklighter"))
        .await
        .unwrap();
    let hope = MovieRepo::create(&pool, &new_movie("A New Hope", Some(4)))
        .await
        .unwrap();
    let empire = MovieRepo::create(&pool, &new_movie("The Empire Strikes Back", Some(5)))
        .await
        .unwrap();

    CharacterMovieRepo::insert(&pool, Edge::new(character.id, hope.id))
        .await
        .unwrap();
    let inserted = CharacterMovieRepo::insert_many(
        &pool,
        &[
            Edge::new(character.id, hope.id),
            Edge::new(character.id, empire.id),
        ],
    )
    .await
    .unwrap();
    assert_eq!(inserted, 1);

    let movies = CharacterMovieRepo::movies_for_character(&pool, character.id)
        .await
        .unwrap();
    assert_eq!(movies.len(), 2);
}

// ---------------------------------------------------------------------------
// Test: Store error classification
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_unique_violations_are_named(pool: PgPool) {
    let store = PgStore::new(pool);

    store
        .insert_character(&new_character("Yoda"), &[])
        .await
        .unwrap();
    let err = store
        .insert_character(&new_character("Yoda"), &[])
        .await
        .unwrap_err();
    assert!(err.is_unique(UQ_CHARACTERS_NAME));

    store
        .insert_movie(&new_movie("A New Hope", Some(4)), &[])
        .await
        .unwrap();
    let err = store
        .insert_movie(&new_movie("A New Hope", Some(7)), &[])
        .await
        .unwrap_err();
    assert!(err.is_unique(UQ_MOVIES_TITLE));

    let err = store
        .insert_movie(&new_movie("Star Wars", Some(4)), &[])
        .await
        .unwrap_err();
    assert!(err.is_unique(UQ_MOVIES_EPISODE_ID));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_link_is_primary_key_violation(pool: PgPool) {
    let store = PgStore::new(pool);
    let movie = store
        .insert_movie(&new_movie("A New Hope", Some(4)), &[])
        .await
        .unwrap();
    let character = store
        .insert_character(&new_character("Chewbacca"), &[movie])
        .await
        .unwrap();

    let err = store.link(Edge::new(character, movie)).await.unwrap_err();
    assert!(err.is_unique(PK_CHARACTER_MOVIES));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_insert_with_missing_movie_rolls_back(pool: PgPool) {
    let store = PgStore::new(pool);
    let err = store
        .insert_character(&new_character("Lando Calrissian"), &[999])
        .await
        .unwrap_err();
    assert_matches!(err, StoreError::ForeignKeyViolation { .. });
    assert!(store
        .find_character_by_name("Lando Calrissian")
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// Test: Store persistence
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_save_replaces_edges_only_when_given(pool: PgPool) {
    let store = PgStore::new(pool);
    let first = store
        .insert_movie(&new_movie("A New Hope", Some(4)), &[])
        .await
        .unwrap();
    let second = store
        .insert_movie(&new_movie("The Empire Strikes Back", Some(5)), &[])
        .await
        .unwrap();
    let id = store
        .insert_character(&new_character("Wedge Antilles"), &[first])
        .await
        .unwrap();

    assert!(store
        .save_character(id, &new_character("Wedge"), None)
        .await
        .unwrap());
    let detail = store.find_character(id).await.unwrap().unwrap();
    assert_eq!(detail.character.name, "Wedge");
    assert_eq!(detail.movies.len(), 1);

    assert!(store
        .save_character(id, &new_character("Wedge"), Some(&[second]))
        .await
        .unwrap());
    let detail = store.find_character(id).await.unwrap().unwrap();
    assert_eq!(detail.movies.len(), 1);
    assert_eq!(detail.movies[0].id, second);

    assert!(!store
        .save_character(id + 1000, &new_character("Nobody"), None)
        .await
        .unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_cascades_edges(pool: PgPool) {
    let store = PgStore::new(pool.clone());
    let movie = store
        .insert_movie(&new_movie("Return of the Jedi", Some(6)), &[])
        .await
        .unwrap();
    let character = store
        .insert_character(&new_character("Wicket"), &[movie])
        .await
        .unwrap();

    assert!(store.delete_movie(movie).await.unwrap());
    let remaining: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM character_movies WHERE character_id = $1")
            .bind(character)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(remaining, 0);
    assert!(!store.delete_movie(movie).await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_seed_is_idempotent(pool: PgPool) {
    let store = PgStore::new(pool);
    assert_matches!(
        seed_star_wars(&store).await.unwrap(),
        SeedOutcome::Seeded { movies: 6, characters: 6 }
    );
    assert_eq!(seed_star_wars(&store).await.unwrap(), SeedOutcome::Skipped);

    let characters = store.list_characters().await.unwrap();
    let names: Vec<&str> = characters
        .iter()
        .map(|c| c.character.name.as_str())
        .collect();
    assert_eq!(
        names,
        [
            "Anakin Skywalker",
            "Darth Vader",
            "Leia Organa",
            "Luke Skywalker",
            "Obi-Wan Kenobi",
            "Yoda"
        ]
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_seed_reuses_existing_films(pool: PgPool) {
    let store = PgStore::new(pool);
    let jedi = store
        .insert_movie(&new_movie("Return of the Jedi", Some(6)), &[])
        .await
        .unwrap();

    assert_eq!(
        seed_star_wars(&store).await.unwrap(),
        SeedOutcome::Seeded {
            movies: 5,
            characters: 6
        }
    );
    assert_eq!(store.list_movies().await.unwrap().len(), 6);

    let detail = store.find_movie(jedi).await.unwrap().unwrap();
    assert_eq!(detail.characters.len(), 4);
}
