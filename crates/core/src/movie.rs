//! Field rules for Movie records.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;
use crate::types::DbId;
use crate::validation::{check_id_list, check_length, FieldErrors, WriteMode};

/* --------------------------------------------------------------------------
Constants
-------------------------------------------------------------------------- */

pub const TITLE_MIN_LEN: usize = 2;
pub const TITLE_MAX_LEN: usize = 200;
pub const DIRECTOR_MAX_LEN: usize = 100;

pub const EPISODE_ID_MIN: i32 = 1;
pub const EPISODE_ID_MAX: i32 = 100;

/// Upper bound on `characterIds` in one request body.
pub const MAX_CHARACTER_IDS: usize = 50;

static TITLE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9\s\-'.:()]+$").expect("valid title pattern"));

static DIRECTOR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\s\-'.]+$").expect("valid director pattern"));

/* --------------------------------------------------------------------------
Validation
-------------------------------------------------------------------------- */

/// Movie fields as they arrive in a request body, already trimmed.
#[derive(Debug, Default, Clone, Copy)]
pub struct MovieFields<'a> {
    pub title: Option<&'a str>,
    pub episode_id: Option<i32>,
    pub director: Option<&'a str>,
    pub character_ids: Option<&'a [DbId]>,
}

/// Validate every supplied field, reporting all violations at once.
pub fn validate_fields(fields: MovieFields<'_>, mode: WriteMode) -> Result<(), CoreError> {
    let mut errors = FieldErrors::new();

    if let Some(title) = fields.title {
        if title.is_empty() {
            errors.push("Title is required");
        } else {
            check_length(&mut errors, "Title", title, TITLE_MIN_LEN, TITLE_MAX_LEN);
            if !TITLE_PATTERN.is_match(title) {
                errors.push(
                    "Title can only contain letters, numbers, spaces, and common punctuation",
                );
            }
        }
    }

    if let Some(episode_id) = fields.episode_id {
        if episode_id < EPISODE_ID_MIN {
            errors.push(format!("Episode ID must be at least {EPISODE_ID_MIN}"));
        }
        if episode_id > EPISODE_ID_MAX {
            errors.push(format!("Episode ID must not exceed {EPISODE_ID_MAX}"));
        }
    }

    if let Some(director) = fields.director {
        if director.chars().count() > DIRECTOR_MAX_LEN {
            errors.push(format!(
                "Director name must not exceed {DIRECTOR_MAX_LEN} characters"
            ));
        }
        if !DIRECTOR_PATTERN.is_match(director) {
            errors.push(
                "Director name can only contain letters, spaces, hyphens, apostrophes, and periods",
            );
        }
    }

    if let Some(ids) = fields.character_ids {
        check_id_list(&mut errors, "Character IDs", ids, MAX_CHARACTER_IDS, mode);
    }

    errors.into_result()
}
