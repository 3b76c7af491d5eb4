//! Movie entity model and DTOs.

use holocron_core::error::CoreError;
use holocron_core::movie::{validate_fields, MovieFields};
use holocron_core::types::{DbId, Timestamp};
use holocron_core::validation::{trimmed, WriteMode};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::character::CharacterSummary;

/// A movie row from the `movies` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Movie {
    pub id: DbId,
    pub title: String,
    pub episode_id: Option<i32>,
    pub director: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: Timestamp,
    #[serde(rename = "updatedAt")]
    pub updated_at: Timestamp,
    /// Soft-delete marker. Never serialized.
    #[serde(skip)]
    pub deleted_at: Option<Timestamp>,
}

impl Movie {
    pub fn summary(&self) -> MovieSummary {
        MovieSummary {
            id: self.id,
            title: self.title.clone(),
            episode_id: self.episode_id,
            director: self.director.clone(),
        }
    }

    pub fn values(&self) -> MovieValues {
        MovieValues {
            title: self.title.clone(),
            episode_id: self.episode_id,
            director: self.director.clone(),
        }
    }
}

/// A movie nested under a character.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct MovieSummary {
    pub id: DbId,
    pub title: String,
    pub episode_id: Option<i32>,
    pub director: Option<String>,
}

/// A movie together with its cast.
#[derive(Debug, Clone, Serialize)]
pub struct MovieDetail {
    #[serde(flatten)]
    pub movie: Movie,
    pub characters: Vec<CharacterSummary>,
}

/// Scalar columns written by an insert or an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieValues {
    pub title: String,
    pub episode_id: Option<i32>,
    pub director: Option<String>,
}

/// DTO for creating a new movie.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateMovie {
    pub title: String,
    pub episode_id: Option<i32>,
    pub director: Option<String>,
    /// When present, 1-50 unique positive character ids.
    #[serde(rename = "characterIds")]
    pub character_ids: Option<Vec<DbId>>,
}

impl CreateMovie {
    /// Trim string fields and check every field rule.
    pub fn into_validated(self) -> Result<Self, CoreError> {
        let input = Self {
            title: self.title.trim().to_string(),
            episode_id: self.episode_id,
            director: trimmed(self.director),
            character_ids: self.character_ids,
        };
        validate_fields(
            MovieFields {
                title: Some(&input.title),
                episode_id: input.episode_id,
                director: input.director.as_deref(),
                character_ids: input.character_ids.as_deref(),
            },
            WriteMode::Create,
        )?;
        Ok(input)
    }

    pub fn values(&self) -> MovieValues {
        MovieValues {
            title: self.title.clone(),
            episode_id: self.episode_id,
            director: self.director.clone(),
        }
    }
}

/// DTO for updating an existing movie. All fields are optional.
///
/// `character_ids: Some(vec![])` clears the cast; `None` leaves it untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateMovie {
    pub title: Option<String>,
    pub episode_id: Option<i32>,
    pub director: Option<String>,
    #[serde(rename = "characterIds")]
    pub character_ids: Option<Vec<DbId>>,
}

impl UpdateMovie {
    /// Trim string fields and check every supplied field.
    pub fn into_validated(self) -> Result<Self, CoreError> {
        let input = Self {
            title: trimmed(self.title),
            episode_id: self.episode_id,
            director: trimmed(self.director),
            character_ids: self.character_ids,
        };
        validate_fields(
            MovieFields {
                title: input.title.as_deref(),
                episode_id: input.episode_id,
                director: input.director.as_deref(),
                character_ids: input.character_ids.as_deref(),
            },
            WriteMode::Update,
        )?;
        Ok(input)
    }

    /// Apply the supplied fields onto the stored ones.
    pub fn merge_into(&self, current: MovieValues) -> MovieValues {
        MovieValues {
            title: self.title.clone().unwrap_or(current.title),
            episode_id: self.episode_id.or(current.episode_id),
            director: self.director.clone().or(current.director),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_accepts_snake_case_episode_and_camel_case_ids() {
        let input: CreateMovie = serde_json::from_value(serde_json::json!({
            "title": "A New Hope",
            "episode_id": 4,
            "characterIds": [1, 2]
        }))
        .unwrap();
        let input = input.into_validated().unwrap();
        assert_eq!(input.episode_id, Some(4));
        assert_eq!(input.character_ids, Some(vec![1, 2]));
    }

    #[test]
    fn update_keeps_episode_when_omitted() {
        let current = MovieValues {
            title: "Return of the Jedi".into(),
            episode_id: Some(6),
            director: Some("Richard Marquand".into()),
        };
        let patch = UpdateMovie {
            title: Some("Return Of The Jedi".into()),
            ..Default::default()
        };
        let merged = patch.merge_into(current);
        assert_eq!(merged.title, "Return Of The Jedi");
        assert_eq!(merged.episode_id, Some(6));
    }

    #[test]
    fn summary_serializes_whitelisted_fields_only() {
        let summary = MovieSummary {
            id: 3,
            title: "Revenge of the Sith".into(),
            episode_id: Some(3),
            director: Some("George Lucas".into()),
        };
        let json = serde_json::to_value(&summary).unwrap();
        let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys.len(), 4);
        assert!(json.get("createdAt").is_none());
    }
}
