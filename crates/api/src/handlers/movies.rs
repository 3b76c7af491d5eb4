//! Handlers for the `/movies` resource.
//!
//! Character associations are a sub-resource:
//! `/movies/{id}/characters[/{character_id}]`

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use holocron_db::models::character::CharacterSummary;
use holocron_db::models::movie::{CreateMovie, MovieDetail, UpdateMovie};

use crate::error::AppResult;
use crate::extract::{AppJson, EdgeIds, EntityId};
use crate::state::AppState;

/// POST /api/v1/movies
pub async fn create(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateMovie>,
) -> AppResult<(StatusCode, Json<MovieDetail>)> {
    let movie = state.movies().create(input).await?;
    Ok((StatusCode::CREATED, Json(movie)))
}

/// GET /api/v1/movies
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<MovieDetail>>> {
    let movies = state.movies().find_all().await?;
    Ok(Json(movies))
}

/// GET /api/v1/movies/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> AppResult<Json<MovieDetail>> {
    let movie = state.movies().find_one(id).await?;
    Ok(Json(movie))
}

/// PUT /api/v1/movies/{id}
pub async fn update(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    AppJson(input): AppJson<UpdateMovie>,
) -> AppResult<Json<MovieDetail>> {
    let movie = state.movies().update(id, input).await?;
    Ok(Json(movie))
}

/// DELETE /api/v1/movies/{id}
pub async fn delete(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> AppResult<StatusCode> {
    state.movies().remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Characters sub-resource
// ---------------------------------------------------------------------------

/// GET /api/v1/movies/{id}/characters
pub async fn list_characters(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> AppResult<Json<Vec<CharacterSummary>>> {
    let characters = state.movies().get_characters(id).await?;
    Ok(Json(characters))
}

/// POST /api/v1/movies/{id}/characters/{character_id}
pub async fn add_character(
    State(state): State<AppState>,
    ids: EdgeIds,
) -> AppResult<(StatusCode, Json<MovieDetail>)> {
    let movie = state.movies().add_character(ids.owner, ids.related).await?;
    Ok((StatusCode::CREATED, Json(movie)))
}

/// DELETE /api/v1/movies/{id}/characters/{character_id}
pub async fn remove_character(
    State(state): State<AppState>,
    ids: EdgeIds,
) -> AppResult<StatusCode> {
    state
        .movies()
        .remove_character(ids.owner, ids.related)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
