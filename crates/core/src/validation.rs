//! Shared building blocks for request field validation.
//!
//! Field checks never short-circuit: every violation found in one request
//! is pushed into a [`FieldErrors`] collector and reported together.

use std::collections::HashSet;

use crate::error::CoreError;
use crate::types::DbId;

/// Whether a request body creates a record or patches an existing one.
///
/// Related-id lists may be empty only on update, where an empty list
/// clears every association.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Create,
    Update,
}

/// Collects field-level violations for a single request.
#[derive(Debug, Default)]
pub struct FieldErrors {
    errors: Vec<String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn messages(&self) -> &[String] {
        &self.errors
    }

    /// `Ok(())` when nothing was collected, otherwise a single
    /// [`CoreError::BadRequest`] listing every violation.
    pub fn into_result(self) -> Result<(), CoreError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(CoreError::BadRequest(format!(
                "Validation failed: {}",
                self.errors.join("; ")
            )))
        }
    }
}

/// Trim an optional string in place of the incoming value.
pub fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string())
}

/// Check a character count against inclusive bounds.
pub fn check_length(
    errors: &mut FieldErrors,
    label: &str,
    value: &str,
    min: usize,
    max: usize,
) {
    let len = value.chars().count();
    if len < min {
        errors.push(format!("{label} must be at least {min} characters long"));
    }
    if len > max {
        errors.push(format!("{label} must not exceed {max} characters"));
    }
}

fn lowercase_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Check a list of related ids supplied in a request body.
///
/// Rules: unique, every id positive, at most `max` entries and, on create,
/// at least one entry.
pub fn check_id_list(
    errors: &mut FieldErrors,
    label: &str,
    ids: &[DbId],
    max: usize,
    mode: WriteMode,
) {
    if mode == WriteMode::Create && ids.is_empty() {
        errors.push(format!(
            "{label} array must contain at least 1 element when provided"
        ));
    }
    if ids.len() > max {
        errors.push(format!("{label} array must not exceed {max} elements"));
    }

    let mut seen = HashSet::with_capacity(ids.len());
    if !ids.iter().all(|id| seen.insert(*id)) {
        errors.push(format!("{label} must be unique"));
    }

    if ids.iter().any(|id| *id < 1) {
        let singular = lowercase_first(label.trim_end_matches('s'));
        errors.push(format!("Each {singular} must be a positive number"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_collector_is_ok() {
        assert!(FieldErrors::new().into_result().is_ok());
    }

    #[test]
    fn collector_reports_every_violation() {
        let mut errors = FieldErrors::new();
        errors.push("first");
        errors.push("second");
        let err = errors.into_result().unwrap_err();
        assert_eq!(
            err,
            CoreError::BadRequest("Validation failed: first; second".into())
        );
    }

    #[test]
    fn length_counts_chars_not_bytes() {
        let mut errors = FieldErrors::new();
        check_length(&mut errors, "Name", "Éo", 2, 100);
        assert!(errors.is_empty());
    }

    #[test]
    fn id_list_collects_all_problems() {
        let mut errors = FieldErrors::new();
        check_id_list(&mut errors, "Movie IDs", &[3, 3, 0], 20, WriteMode::Create);
        assert_eq!(
            errors.messages(),
            &[
                "Movie IDs must be unique".to_string(),
                "Each movie ID must be a positive number".to_string(),
            ]
        );
    }

    #[test]
    fn empty_id_list_only_allowed_on_update() {
        let mut errors = FieldErrors::new();
        check_id_list(&mut errors, "Movie IDs", &[], 20, WriteMode::Update);
        assert!(errors.is_empty());

        check_id_list(&mut errors, "Movie IDs", &[], 20, WriteMode::Create);
        assert_eq!(errors.messages().len(), 1);
    }

    #[test]
    fn id_list_respects_max() {
        let ids: Vec<DbId> = (1..=21).collect();
        let mut errors = FieldErrors::new();
        check_id_list(&mut errors, "Movie IDs", &ids, 20, WriteMode::Update);
        assert_eq!(
            errors.messages(),
            &["Movie IDs array must not exceed 20 elements".to_string()]
        );
    }
}
