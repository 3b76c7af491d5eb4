use crate::types::DbId;

/// Domain error taxonomy shared by both directories.
///
/// Each variant maps to exactly one HTTP status at the API boundary; the
/// message is user-facing and is passed through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// Malformed input: invalid id, unresolvable related ids, duplicate
    /// edge, failed field validation.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Entity or edge absent.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Uniqueness violation.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Delete blocked by existing edges.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Unclassified storage failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// `"<Entity> with ID <id> not found"`.
    pub fn not_found(entity: &str, id: DbId) -> Self {
        CoreError::NotFound(format!("{entity} with ID {id} not found"))
    }

    /// `"Invalid <entity> ID provided"`, where `entity` is lower-cased.
    pub fn invalid_id(entity: &str) -> Self {
        CoreError::BadRequest(format!(
            "Invalid {} ID provided",
            entity.to_lowercase()
        ))
    }

    /// The message carried by any variant.
    pub fn message(&self) -> &str {
        match self {
            CoreError::BadRequest(msg)
            | CoreError::NotFound(msg)
            | CoreError::Conflict(msg)
            | CoreError::Forbidden(msg)
            | CoreError::Internal(msg) => msg,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_entity_and_id() {
        let err = CoreError::not_found("Movie", 12);
        assert_eq!(err.message(), "Movie with ID 12 not found");
    }

    #[test]
    fn invalid_id_lowercases_entity() {
        let err = CoreError::invalid_id("Character");
        assert_eq!(err, CoreError::BadRequest("Invalid character ID provided".into()));
    }
}
