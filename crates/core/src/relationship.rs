//! Character↔Movie edges and the batch id checks used to resolve them.
//!
//! Resolution is batch, not first-failure: every offending id is collected
//! and named in a single error.

use std::collections::HashSet;

use crate::error::CoreError;
use crate::types::DbId;

/// One association between a character and a movie.
///
/// The pair is the identity of the edge; edges carry no other data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    pub character_id: DbId,
    pub movie_id: DbId,
}

impl Edge {
    pub fn new(character_id: DbId, movie_id: DbId) -> Self {
        Self {
            character_id,
            movie_id,
        }
    }
}

/// Remove repeated ids, keeping first occurrences in order.
pub fn dedup_ids(ids: &[DbId]) -> Vec<DbId> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

/// Every non-positive id in `ids`, in input order.
pub fn invalid_ids(ids: &[DbId]) -> Vec<DbId> {
    ids.iter().copied().filter(|id| *id < 1).collect()
}

/// `requested − found`, in the order the ids were requested.
pub fn missing_ids(requested: &[DbId], found: impl IntoIterator<Item = DbId>) -> Vec<DbId> {
    let found: HashSet<DbId> = found.into_iter().collect();
    requested
        .iter()
        .copied()
        .filter(|id| !found.contains(id))
        .collect()
}

/// Render ids as `"2, 5, 9"`.
pub fn join_ids(ids: &[DbId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Fail with every non-positive id, e.g. `Invalid movie IDs provided: 0, -3`.
///
/// `entity` is the singular display name of the related kind (`"Movie"`).
pub fn ensure_positive(entity: &str, ids: &[DbId]) -> Result<(), CoreError> {
    let invalid = invalid_ids(ids);
    if invalid.is_empty() {
        Ok(())
    } else {
        Err(CoreError::BadRequest(format!(
            "Invalid {} IDs provided: {}",
            entity.to_lowercase(),
            join_ids(&invalid)
        )))
    }
}

/// Fail with every requested id that was not found, e.g.
/// `Movies not found with IDs: 5`.
pub fn ensure_all_found(
    entity: &str,
    requested: &[DbId],
    found: impl IntoIterator<Item = DbId>,
) -> Result<(), CoreError> {
    let missing = missing_ids(requested, found);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(CoreError::BadRequest(format!(
            "{entity}s not found with IDs: {}",
            join_ids(&missing)
        )))
    }
}
