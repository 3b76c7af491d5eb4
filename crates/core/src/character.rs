//! Field rules for Character records.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;
use crate::types::DbId;
use crate::validation::{check_id_list, check_length, FieldErrors, WriteMode};

/* --------------------------------------------------------------------------
Constants
-------------------------------------------------------------------------- */

pub const NAME_MIN_LEN: usize = 2;
pub const NAME_MAX_LEN: usize = 100;

/// Applies to both `height` and `mass`.
pub const MEASUREMENT_MAX_LEN: usize = 20;

/// Upper bound on `movieIds` in one request body.
pub const MAX_MOVIE_IDS: usize = 20;

/// The literal accepted in place of a number for `height` / `mass`.
pub const UNKNOWN_MEASUREMENT: &str = "unknown";

static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9\s\-'.]+$").expect("valid name pattern"));

/* --------------------------------------------------------------------------
Validation
-------------------------------------------------------------------------- */

/// Character fields as they arrive in a request body, already trimmed.
#[derive(Debug, Default, Clone, Copy)]
pub struct CharacterFields<'a> {
    pub name: Option<&'a str>,
    pub height: Option<&'a str>,
    pub mass: Option<&'a str>,
    pub movie_ids: Option<&'a [DbId]>,
}

/// Validate every supplied field, reporting all violations at once.
pub fn validate_fields(fields: CharacterFields<'_>, mode: WriteMode) -> Result<(), CoreError> {
    let mut errors = FieldErrors::new();

    if let Some(name) = fields.name {
        check_name(&mut errors, name);
    }
    if let Some(height) = fields.height {
        check_measurement(&mut errors, "Height", height);
    }
    if let Some(mass) = fields.mass {
        check_measurement(&mut errors, "Mass", mass);
    }
    if let Some(ids) = fields.movie_ids {
        check_id_list(&mut errors, "Movie IDs", ids, MAX_MOVIE_IDS, mode);
    }

    errors.into_result()
}

fn check_name(errors: &mut FieldErrors, name: &str) {
    if name.is_empty() {
        errors.push("Name is required");
        return;
    }
    check_length(errors, "Name", name, NAME_MIN_LEN, NAME_MAX_LEN);
    if !NAME_PATTERN.is_match(name) {
        errors.push(
            "Name can only contain letters, numbers, spaces, hyphens, apostrophes, and periods",
        );
    }
}

/// `true` for `"unknown"` or a non-negative integer literal.
pub fn is_valid_measurement(value: &str) -> bool {
    value == UNKNOWN_MEASUREMENT || (!value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()))
}

fn check_measurement(errors: &mut FieldErrors, label: &str, value: &str) {
    if value.chars().count() > MEASUREMENT_MAX_LEN {
        errors.push(format!(
            "{label} must not exceed {MEASUREMENT_MAX_LEN} characters"
        ));
    }
    if !is_valid_measurement(value) {
        errors.push(format!("{label} must be \"unknown\" or a number"));
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn named(name: &str) -> CharacterFields<'_> {
        CharacterFields {
            name: Some(name),
            ..Default::default()
        }
    }

    #[test]
    fn accepts_typical_names() {
        for name in ["Luke Skywalker", "Obi-Wan Kenobi", "R2-D2", "Jar Jar B.", "O'Brien"] {
            assert!(validate_fields(named(name), WriteMode::Create).is_ok(), "{name}");
        }
    }

    #[test]
    fn rejects_short_and_symbolic_names() {
        assert_matches!(
            validate_fields(named("L"), WriteMode::Create),
            Err(CoreError::BadRequest(msg)) if msg.contains("at least 2 characters")
        );
        assert_matches!(
            validate_fields(named("Luke@Tatooine"), WriteMode::Create),
            Err(CoreError::BadRequest(msg)) if msg.contains("can only contain")
        );
    }

    #[test]
    fn empty_name_is_required_error_only() {
        let err = validate_fields(named(""), WriteMode::Create).unwrap_err();
        assert_eq!(err.message(), "Validation failed: Name is required");
    }

    #[test]
    fn measurement_accepts_unknown_or_digits() {
        assert!(is_valid_measurement("172"));
        assert!(is_valid_measurement("0"));
        assert!(is_valid_measurement("unknown"));
        assert!(!is_valid_measurement("-5"));
        assert!(!is_valid_measurement("1.72"));
        assert!(!is_valid_measurement("Unknown"));
        assert!(!is_valid_measurement(""));
    }

    #[test]
    fn reports_all_field_violations_together() {
        let fields = CharacterFields {
            name: Some("X"),
            height: Some("tall"),
            mass: Some("123456789012345678901"),
            movie_ids: Some(&[1, 1]),
        };
        let err = validate_fields(fields, WriteMode::Create).unwrap_err();
        let msg = err.message();
        assert!(msg.contains("Name must be at least 2 characters long"));
        assert!(msg.contains("Height must be \"unknown\" or a number"));
        assert!(msg.contains("Mass must not exceed 20 characters"));
        assert!(msg.contains("Movie IDs must be unique"));
    }
}
