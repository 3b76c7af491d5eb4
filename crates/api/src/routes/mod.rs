pub mod characters;
pub mod health;
pub mod movies;

use axum::Router;

use crate::state::AppState;

/// Build the resource route tree, nested under the configured prefix.
///
/// Route hierarchy:
///
/// ```text
/// /characters                                  list, create
/// /characters/{id}                             get, update, delete
/// /characters/{id}/movies                      list movies
/// /characters/{id}/movies/{movie_id}           add, remove movie
///
/// /movies                                      list, create
/// /movies/{id}                                 get, update, delete
/// /movies/{id}/characters                      list characters
/// /movies/{id}/characters/{character_id}       add, remove character
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/characters", characters::router())
        .nest("/movies", movies::router())
}
