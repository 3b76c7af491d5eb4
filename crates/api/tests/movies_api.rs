//! HTTP-level tests for the `/movies` resource.

mod common;

use axum::http::StatusCode;
use common::{create_character, create_movie, delete, expect_json, get, post_json, put_json};
use serde_json::json;

#[tokio::test]
async fn create_returns_201_with_cast() {
    let app = common::build_test_app();
    let leia = create_character(&app, "Leia Organa", &[]).await;
    let luke = create_character(&app, "Luke Skywalker", &[]).await;

    let response = post_json(
        &app,
        "/api/v1/movies",
        json!({
            "title": "A New Hope",
            "episode_id": 4,
            "director": "George Lucas",
            "characterIds": [luke, leia]
        }),
    )
    .await;
    let json = expect_json(response, StatusCode::CREATED).await;

    assert_eq!(json["title"], "A New Hope");
    assert_eq!(json["episode_id"], 4);
    assert_eq!(json["director"], "George Lucas");
    let cast: Vec<&str> = json["characters"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(cast, ["Leia Organa", "Luke Skywalker"]);
    assert_eq!(
        json["characters"][0],
        json!({ "id": leia, "name": "Leia Organa", "height": null, "mass": null })
    );
}

#[tokio::test]
async fn duplicate_title_and_episode_return_409() {
    let app = common::build_test_app();
    create_movie(&app, "A New Hope", Some(4)).await;

    let response = post_json(&app, "/api/v1/movies", json!({ "title": "A New Hope" })).await;
    let json = expect_json(response, StatusCode::CONFLICT).await;
    assert_eq!(json["message"], "Movie with title \"A New Hope\" already exists");

    let response = post_json(
        &app,
        "/api/v1/movies",
        json!({ "title": "Star Wars", "episode_id": 4 }),
    )
    .await;
    let json = expect_json(response, StatusCode::CONFLICT).await;
    assert_eq!(json["message"], "Movie with episode ID 4 already exists");
}

#[tokio::test]
async fn list_orders_by_episode_with_unnumbered_last() {
    let app = common::build_test_app();
    create_movie(&app, "Rogue One", None).await;
    create_movie(&app, "Revenge of the Sith", Some(3)).await;
    create_movie(&app, "The Phantom Menace", Some(1)).await;

    let json = expect_json(get(&app, "/api/v1/movies").await, StatusCode::OK).await;
    let titles: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["The Phantom Menace", "Revenge of the Sith", "Rogue One"]);
}

#[tokio::test]
async fn update_episode_to_taken_value_returns_409() {
    let app = common::build_test_app();
    create_movie(&app, "A New Hope", Some(4)).await;
    let id = create_movie(&app, "The Empire Strikes Back", Some(5)).await;

    let response = put_json(
        &app,
        &format!("/api/v1/movies/{id}"),
        json!({ "episode_id": 4 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Re-submitting the movie's own values is not a conflict.
    let response = put_json(
        &app,
        &format!("/api/v1/movies/{id}"),
        json!({ "title": "The Empire Strikes Back", "episode_id": 5, "director": "Irvin Kershner" }),
    )
    .await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["director"], "Irvin Kershner");
}

#[tokio::test]
async fn update_replaces_cast_when_ids_given() {
    let app = common::build_test_app();
    let han = create_character(&app, "Han Solo", &[]).await;
    let chewie = create_character(&app, "Chewbacca", &[]).await;
    let id = create_movie(&app, "Solo", None).await;

    let response = put_json(
        &app,
        &format!("/api/v1/movies/{id}"),
        json!({ "characterIds": [han, chewie] }),
    )
    .await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["characters"].as_array().unwrap().len(), 2);

    let response = put_json(
        &app,
        &format!("/api/v1/movies/{id}"),
        json!({ "characterIds": [han] }),
    )
    .await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["characters"], json!([{ "id": han, "name": "Han Solo", "height": null, "mass": null }]));
}

#[tokio::test]
async fn get_and_delete_validate_ids() {
    let app = common::build_test_app();

    let json = expect_json(get(&app, "/api/v1/movies/-2").await, StatusCode::BAD_REQUEST).await;
    assert_eq!(json["message"], "Invalid movie ID provided");

    let json = expect_json(delete(&app, "/api/v1/movies/9").await, StatusCode::NOT_FOUND).await;
    assert_eq!(json["message"], "Movie with ID 9 not found");
}

#[tokio::test]
async fn delete_linked_movie_returns_403() {
    let app = common::build_test_app();
    let id = create_movie(&app, "Return of the Jedi", Some(6)).await;
    create_character(&app, "Wicket", &[id]).await;

    let json = expect_json(
        delete(&app, &format!("/api/v1/movies/{id}")).await,
        StatusCode::FORBIDDEN,
    )
    .await;
    assert_eq!(
        json["message"],
        "Cannot delete movie \"Return of the Jedi\" because it is associated with 1 character(s). \
         Remove the associations first."
    );
}
