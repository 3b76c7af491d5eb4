//! Character entity model and DTOs.

use holocron_core::character::{validate_fields, CharacterFields};
use holocron_core::error::CoreError;
use holocron_core::types::{DbId, Timestamp};
use holocron_core::validation::{trimmed, WriteMode};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::movie::MovieSummary;

/// A character row from the `characters` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Character {
    pub id: DbId,
    pub name: String,
    pub height: Option<String>,
    pub mass: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: Timestamp,
    #[serde(rename = "updatedAt")]
    pub updated_at: Timestamp,
    /// Soft-delete marker. Never serialized.
    #[serde(skip)]
    pub deleted_at: Option<Timestamp>,
}

impl Character {
    pub fn summary(&self) -> CharacterSummary {
        CharacterSummary {
            id: self.id,
            name: self.name.clone(),
            height: self.height.clone(),
            mass: self.mass.clone(),
        }
    }

    /// The scalar columns as currently stored.
    pub fn values(&self) -> CharacterValues {
        CharacterValues {
            name: self.name.clone(),
            height: self.height.clone(),
            mass: self.mass.clone(),
        }
    }
}

/// A character nested under a movie.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct CharacterSummary {
    pub id: DbId,
    pub name: String,
    pub height: Option<String>,
    pub mass: Option<String>,
}

/// A character together with the movies it appears in.
#[derive(Debug, Clone, Serialize)]
pub struct CharacterDetail {
    #[serde(flatten)]
    pub character: Character,
    pub movies: Vec<MovieSummary>,
}

/// Scalar columns written by an insert or an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterValues {
    pub name: String,
    pub height: Option<String>,
    pub mass: Option<String>,
}

/// DTO for creating a new character.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateCharacter {
    pub name: String,
    pub height: Option<String>,
    pub mass: Option<String>,
    /// When present, 1-20 unique positive movie ids.
    #[serde(rename = "movieIds")]
    pub movie_ids: Option<Vec<DbId>>,
}

impl CreateCharacter {
    /// Trim string fields and check every field rule.
    pub fn into_validated(self) -> Result<Self, CoreError> {
        let input = Self {
            name: self.name.trim().to_string(),
            height: trimmed(self.height),
            mass: trimmed(self.mass),
            movie_ids: self.movie_ids,
        };
        validate_fields(
            CharacterFields {
                name: Some(&input.name),
                height: input.height.as_deref(),
                mass: input.mass.as_deref(),
                movie_ids: input.movie_ids.as_deref(),
            },
            WriteMode::Create,
        )?;
        Ok(input)
    }

    pub fn values(&self) -> CharacterValues {
        CharacterValues {
            name: self.name.clone(),
            height: self.height.clone(),
            mass: self.mass.clone(),
        }
    }
}

/// DTO for updating an existing character. All fields are optional.
///
/// `movie_ids: Some(vec![])` clears every association; `None` leaves the
/// associations untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateCharacter {
    pub name: Option<String>,
    pub height: Option<String>,
    pub mass: Option<String>,
    #[serde(rename = "movieIds")]
    pub movie_ids: Option<Vec<DbId>>,
}

impl UpdateCharacter {
    /// Trim string fields and check every supplied field.
    pub fn into_validated(self) -> Result<Self, CoreError> {
        let input = Self {
            name: trimmed(self.name),
            height: trimmed(self.height),
            mass: trimmed(self.mass),
            movie_ids: self.movie_ids,
        };
        validate_fields(
            CharacterFields {
                name: input.name.as_deref(),
                height: input.height.as_deref(),
                mass: input.mass.as_deref(),
                movie_ids: input.movie_ids.as_deref(),
            },
            WriteMode::Update,
        )?;
        Ok(input)
    }

    /// Apply the supplied fields onto the stored ones.
    pub fn merge_into(&self, current: CharacterValues) -> CharacterValues {
        CharacterValues {
            name: self.name.clone().unwrap_or(current.name),
            height: self.height.clone().or(current.height),
            mass: self.mass.clone().or(current.mass),
        }
    }
}
