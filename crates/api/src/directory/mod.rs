//! Directories own one entity kind each and manage the Character↔Movie
//! relationship from their side.
//!
//! The relationship algorithm (lookup, batch resolution of related ids,
//! edge add/remove, delete guard) is written once in [`Relation`] and
//! parameterized by a [`Side`]. [`CharacterDirectory`] and
//! [`MovieDirectory`] add the create/update logic that differs per entity.
//!
//! [`CharacterDirectory`]: characters::CharacterDirectory
//! [`MovieDirectory`]: movies::MovieDirectory

pub mod characters;
pub mod movies;

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use holocron_core::error::CoreError;
use holocron_core::relationship::{dedup_ids, ensure_all_found, ensure_positive, Edge};
use holocron_core::types::DbId;
use holocron_db::store::{CatalogStore, StoreResult, PK_CHARACTER_MOVIES};

/// One end of the relationship: the owning entity and the entity it links to.
#[async_trait]
pub trait Side: Send + Sync + 'static {
    /// Display name of the owning entity, e.g. `"Character"`.
    const OWNER: &'static str;
    /// Display name of the related entity, e.g. `"Movie"`.
    const RELATED: &'static str;

    /// The owning entity together with its related set.
    type Detail: Send + Sync;
    /// Summary of a related entity.
    type Related: Clone + Send + Sync;

    async fn load(store: &dyn CatalogStore, id: DbId) -> StoreResult<Option<Self::Detail>>;

    async fn load_related(
        store: &dyn CatalogStore,
        ids: &[DbId],
    ) -> StoreResult<Vec<Self::Related>>;

    async fn delete(store: &dyn CatalogStore, id: DbId) -> StoreResult<bool>;

    /// Name or title shown in messages.
    fn label(detail: &Self::Detail) -> &str;

    fn related(detail: &Self::Detail) -> &[Self::Related];

    fn related_id(related: &Self::Related) -> DbId;

    fn related_label(related: &Self::Related) -> &str;

    /// Orient an `(owner, related)` pair as a Character↔Movie edge.
    fn edge(owner_id: DbId, related_id: DbId) -> Edge;
}

/// The relationship operations shared by both directories.
pub struct Relation<S> {
    store: Arc<dyn CatalogStore>,
    side: PhantomData<fn() -> S>,
}

impl<S> Clone for Relation<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            side: PhantomData,
        }
    }
}

impl<S: Side> Relation<S> {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self {
            store,
            side: PhantomData,
        }
    }

    fn owner_lower() -> String {
        S::OWNER.to_lowercase()
    }

    fn related_lower() -> String {
        S::RELATED.to_lowercase()
    }

    fn ensure_ids(owner_id: DbId, related_id: DbId) -> Result<(), CoreError> {
        if owner_id < 1 {
            return Err(CoreError::invalid_id(S::OWNER));
        }
        if related_id < 1 {
            return Err(CoreError::invalid_id(S::RELATED));
        }
        Ok(())
    }

    fn already_associated(owner: &S::Detail, related: &S::Related) -> CoreError {
        CoreError::BadRequest(format!(
            "{} \"{}\" is already associated with {} \"{}\"",
            S::OWNER,
            S::label(owner),
            Self::related_lower(),
            S::related_label(related)
        ))
    }

    fn not_associated(owner: &S::Detail, related_id: DbId) -> CoreError {
        CoreError::NotFound(format!(
            "{} \"{}\" is not associated with {} ID {related_id}",
            S::OWNER,
            S::label(owner),
            Self::related_lower()
        ))
    }

    /// Load the owner with its related set.
    ///
    /// Non-positive ids are a `BadRequest`; absent ones a `NotFound`.
    pub async fn find_one(&self, id: DbId) -> Result<S::Detail, CoreError> {
        if id < 1 {
            return Err(CoreError::invalid_id(S::OWNER));
        }
        S::load(self.store.as_ref(), id)
            .await?
            .ok_or_else(|| CoreError::not_found(S::OWNER, id))
    }

    /// Resolve related ids in one batch.
    ///
    /// Empty input resolves to nothing. Otherwise every non-positive id is
    /// named in one error, then every id that does not exist is named in
    /// another. Repeated ids are resolved once. Result order is unspecified.
    pub async fn validate_exist(&self, ids: &[DbId]) -> Result<Vec<S::Related>, CoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        ensure_positive(S::RELATED, ids)?;

        let requested = dedup_ids(ids);
        let found = S::load_related(self.store.as_ref(), &requested).await?;
        ensure_all_found(S::RELATED, &requested, found.iter().map(S::related_id))?;
        Ok(found)
    }

    /// The owner's related set; empty, never absent.
    pub async fn related(&self, id: DbId) -> Result<Vec<S::Related>, CoreError> {
        let detail = self.find_one(id).await?;
        Ok(S::related(&detail).to_vec())
    }

    /// Link one related entity to the owner and return the refreshed owner.
    ///
    /// An existing edge is rejected, never silently accepted.
    pub async fn add(&self, owner_id: DbId, related_id: DbId) -> Result<S::Detail, CoreError> {
        Self::ensure_ids(owner_id, related_id)?;

        let owner = self.find_one(owner_id).await?;
        let related = self
            .validate_exist(&[related_id])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| CoreError::not_found(S::RELATED, related_id))?;

        if S::related(&owner)
            .iter()
            .any(|r| S::related_id(r) == related_id)
        {
            return Err(Self::already_associated(&owner, &related));
        }

        if let Err(err) = self.store.link(S::edge(owner_id, related_id)).await {
            if err.is_unique(PK_CHARACTER_MOVIES) {
                tracing::warn!(
                    owner = S::OWNER,
                    owner_id,
                    related_id,
                    "Concurrent duplicate edge insert"
                );
                return Err(Self::already_associated(&owner, &related));
            }
            return Err(err.into());
        }

        tracing::info!(
            owner = S::OWNER,
            owner_id,
            related_id,
            "Association added"
        );
        self.find_one(owner_id).await
    }

    /// Unlink one related entity from the owner.
    pub async fn remove_edge(&self, owner_id: DbId, related_id: DbId) -> Result<(), CoreError> {
        Self::ensure_ids(owner_id, related_id)?;

        let owner = self.find_one(owner_id).await?;
        if !S::related(&owner)
            .iter()
            .any(|r| S::related_id(r) == related_id)
        {
            return Err(Self::not_associated(&owner, related_id));
        }

        if !self.store.unlink(S::edge(owner_id, related_id)).await? {
            return Err(Self::not_associated(&owner, related_id));
        }

        tracing::info!(
            owner = S::OWNER,
            owner_id,
            related_id,
            "Association removed"
        );
        Ok(())
    }

    /// Delete the owner, refusing while it has any edge.
    pub async fn remove(&self, id: DbId) -> Result<(), CoreError> {
        let owner = self.find_one(id).await?;

        let count = S::related(&owner).len();
        if count > 0 {
            return Err(CoreError::Forbidden(format!(
                "Cannot delete {} \"{}\" because it is associated with {count} {}(s). \
                 Remove the associations first.",
                Self::owner_lower(),
                S::label(&owner),
                Self::related_lower()
            )));
        }

        if !S::delete(self.store.as_ref(), id).await? {
            return Err(CoreError::not_found(S::OWNER, id));
        }

        tracing::info!(entity = S::OWNER, id, "Deleted");
        Ok(())
    }
}
