//! Handlers for the `/characters` resource.
//!
//! Movie associations are a sub-resource:
//! `/characters/{id}/movies[/{movie_id}]`

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use holocron_db::models::character::{CharacterDetail, CreateCharacter, UpdateCharacter};
use holocron_db::models::movie::MovieSummary;

use crate::error::AppResult;
use crate::extract::{AppJson, EdgeIds, EntityId};
use crate::state::AppState;

/// POST /api/v1/characters
pub async fn create(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateCharacter>,
) -> AppResult<(StatusCode, Json<CharacterDetail>)> {
    let character = state.characters().create(input).await?;
    Ok((StatusCode::CREATED, Json(character)))
}

/// GET /api/v1/characters
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<CharacterDetail>>> {
    let characters = state.characters().find_all().await?;
    Ok(Json(characters))
}

/// GET /api/v1/characters/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> AppResult<Json<CharacterDetail>> {
    let character = state.characters().find_one(id).await?;
    Ok(Json(character))
}

/// PUT /api/v1/characters/{id}
///
/// Partial update: absent or `null` fields keep their stored value.
pub async fn update(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    AppJson(input): AppJson<UpdateCharacter>,
) -> AppResult<Json<CharacterDetail>> {
    let character = state.characters().update(id, input).await?;
    Ok(Json(character))
}

/// DELETE /api/v1/characters/{id}
pub async fn delete(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> AppResult<StatusCode> {
    state.characters().remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Movies sub-resource
// ---------------------------------------------------------------------------

/// GET /api/v1/characters/{id}/movies
pub async fn list_movies(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> AppResult<Json<Vec<MovieSummary>>> {
    let movies = state.characters().get_movies(id).await?;
    Ok(Json(movies))
}

/// POST /api/v1/characters/{id}/movies/{movie_id}
///
/// Returns the character with its refreshed movie list.
pub async fn add_movie(
    State(state): State<AppState>,
    ids: EdgeIds,
) -> AppResult<(StatusCode, Json<CharacterDetail>)> {
    let character = state.characters().add_movie(ids.owner, ids.related).await?;
    Ok((StatusCode::CREATED, Json(character)))
}

/// DELETE /api/v1/characters/{id}/movies/{movie_id}
pub async fn remove_movie(State(state): State<AppState>, ids: EdgeIds) -> AppResult<StatusCode> {
    state
        .characters()
        .remove_movie(ids.owner, ids.related)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
