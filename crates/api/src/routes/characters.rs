//! Route definitions for the `/characters` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::characters;
use crate::state::AppState;

/// Routes mounted at `/characters`.
///
/// ```text
/// GET    /                          -> list
/// POST   /                          -> create
/// GET    /{id}                      -> get_by_id
/// PUT    /{id}                      -> update
/// DELETE /{id}                      -> delete
/// GET    /{id}/movies               -> list_movies
/// POST   /{id}/movies/{movie_id}    -> add_movie
/// DELETE /{id}/movies/{movie_id}    -> remove_movie
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(characters::list).post(characters::create))
        .route(
            "/{id}",
            get(characters::get_by_id)
                .put(characters::update)
                .delete(characters::delete),
        )
        .route("/{id}/movies", get(characters::list_movies))
        .route(
            "/{id}/movies/{movie_id}",
            post(characters::add_movie).delete(characters::remove_movie),
        )
}
