//! Route definitions for the `/movies` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::movies;
use crate::state::AppState;

/// Routes mounted at `/movies`.
///
/// ```text
/// GET    /                                  -> list
/// POST   /                                  -> create
/// GET    /{id}                              -> get_by_id
/// PUT    /{id}                              -> update
/// DELETE /{id}                              -> delete
/// GET    /{id}/characters                   -> list_characters
/// POST   /{id}/characters/{character_id}    -> add_character
/// DELETE /{id}/characters/{character_id}    -> remove_character
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(movies::list).post(movies::create))
        .route(
            "/{id}",
            get(movies::get_by_id)
                .put(movies::update)
                .delete(movies::delete),
        )
        .route("/{id}/characters", get(movies::list_characters))
        .route(
            "/{id}/characters/{character_id}",
            post(movies::add_character).delete(movies::remove_character),
        )
}
