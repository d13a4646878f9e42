//! Write paths: keeping the search index in step with the primary store
//!
//! Every write commits to the primary store first. Only then is the search
//! index touched, and a search failure at that point never undoes the
//! primary write: it is reported as `PartialWriteFailure` carrying the
//! committed entity so an operator can `reindex` it later.

use chrono::Utc;
use tracing::{debug, info, warn};

use geoplaces_core::{
    derive_keys, FieldValue, Place, PlaceError, PlaceField, PlaceId, PlaceRecord, PlaceResult,
    PlaceUpdate, RecordUpdate, SearchDocument, WriteOp,
};

use super::PlaceRepository;

/// Current Unix time in seconds
fn now_secs() -> u64 {
    u64::try_from(Utc::now().timestamp()).unwrap_or_default()
}

impl PlaceRepository {
    /// Create a place
    ///
    /// Derives the secondary keys, inserts the place if its id is free, then
    /// indexes it for search. A missing `updated_at` is stamped with the
    /// current time.
    ///
    /// # Errors
    ///
    /// - `Validation` for malformed input
    /// - `AlreadyExists` when the id is taken
    /// - `StoreUnavailable` when the primary store fails
    /// - `PartialWriteFailure` when the place was created but not indexed
    pub async fn create(&self, mut place: Place) -> PlaceResult<Place> {
        self.limits.validate_new(&place)?;
        if place.updated_at.is_none() {
            place.updated_at = Some(now_secs());
        }

        let keys = derive_keys(&place, &self.config.main_places);
        debug!(id = %place.id, keys = keys.count(), "Creating place");

        let created = self.store.create(PlaceRecord::new(place, keys)).await?;

        let document = SearchDocument::from_place(&created);
        if let Err(e) = self.search_call(self.search.index(&document)).await {
            warn!(id = %created.id, error = %e, "Search indexing failed after create");
            return Err(PlaceError::partial_write(
                WriteOp::Create,
                created,
                e.to_string(),
            ));
        }

        info!(id = %created.id, "Place created");
        Ok(created)
    }

    /// Apply a partial update
    ///
    /// Keys are re-derived from the merged post-update entity, so clearing
    /// an attribute also drops the keys that depended on it. That write is
    /// conditional on the entity read for the derivation; if the place
    /// changed in between, the update is re-read and retried up to
    /// `update_retries` times. Changes that touch no key field keep the
    /// stored keys and write unconditionally.
    ///
    /// The search document is then replaced: the old one is deleted
    /// (failures ignored) and a fresh one is built from the stored entity.
    /// `updated_at` is set to the current time, never moving backwards.
    ///
    /// # Errors
    ///
    /// - `Validation` for malformed input
    /// - `NotFound` when the place does not exist
    /// - `Conflict` when the place kept changing through every retry
    /// - `StoreUnavailable` when the primary store fails
    /// - `PartialWriteFailure` when the place was updated but not re-indexed
    pub async fn update(&self, update: PlaceUpdate) -> PlaceResult<Place> {
        self.limits.validate_update(&update)?;
        let id = update.id;

        let mut attempt = 0;
        let updated = loop {
            match self.commit_update(&update).await {
                Err(PlaceError::Conflict { .. }) if attempt < self.config.update_retries => {
                    attempt += 1;
                    debug!(id = %id, attempt, "Place changed during update, retrying");
                    tokio::task::yield_now().await;
                }
                result => break result?,
            }
        };

        if let Err(e) = self.search_call(self.search.delete(id)).await {
            debug!(id = %id, error = %e, "Ignoring search delete failure during update");
        }

        let document = SearchDocument::from_place(&updated);
        if let Err(e) = self.search_call(self.search.index(&document)).await {
            warn!(id = %id, error = %e, "Search indexing failed after update");
            return Err(PlaceError::partial_write(
                WriteOp::Update,
                updated,
                e.to_string(),
            ));
        }

        info!(id = %id, "Place updated");
        Ok(updated)
    }

    /// One read-derive-write round of `update` against the primary store
    async fn commit_update(&self, update: &PlaceUpdate) -> PlaceResult<Place> {
        let id = update.id;
        let current = self
            .store
            .get(id, None)
            .await?
            .ok_or(PlaceError::NotFound { id })?;

        let stamp = now_secs().max(current.updated_at.unwrap_or_default());
        let update = stamped(update.clone(), stamp);

        let record = if update.touches_keys() {
            let keys = derive_keys(&current.merged(&update), &self.config.main_places);
            debug!(id = %id, keys = keys.count(), "Updating place and its keys");
            RecordUpdate {
                id,
                set: update.set,
                remove: update.remove,
                keys: Some(keys),
                expected: Some(current),
            }
        } else {
            debug!(id = %id, "Updating place, keys unchanged");
            RecordUpdate {
                id,
                set: update.set,
                remove: update.remove,
                keys: None,
                expected: None,
            }
        };

        self.store.update(record).await
    }

    /// Delete a place, returning whether the primary store removed one
    ///
    /// Deleting an unknown id is not an error. The search document is
    /// removed in either case.
    ///
    /// # Errors
    ///
    /// - `Validation` for a non-positive id
    /// - `StoreUnavailable` when the primary store fails, or when the search
    ///   store fails and nothing was removed from the primary store
    /// - `PartialWriteFailure` carrying the removed place when the primary
    ///   delete succeeded but the search delete failed
    pub async fn delete(&self, id: impl Into<PlaceId>) -> PlaceResult<bool> {
        let id = id.into();
        validate_id(id)?;

        let removed = self.store.delete(id).await?;

        if let Err(e) = self.search_call(self.search.delete(id)).await {
            warn!(id = %id, error = %e, "Search delete failed");
            return match removed {
                Some(place) => Err(PlaceError::partial_write(
                    WriteOp::Delete,
                    place,
                    e.to_string(),
                )),
                None => Err(e),
            };
        }

        info!(id = %id, removed = removed.is_some(), "Place deleted");
        Ok(removed.is_some())
    }

    /// Rebuild the search document of one place from the primary store
    ///
    /// Returns whether the place exists. A stale document for an absent
    /// place is removed.
    ///
    /// # Errors
    ///
    /// `StoreUnavailable` from either store. Nothing is written to the
    /// primary store, so no failure here is partial.
    pub async fn reindex(&self, id: impl Into<PlaceId>) -> PlaceResult<bool> {
        let id = id.into();
        validate_id(id)?;

        let current = self.store.get(id, None).await?;
        self.search_call(self.search.delete(id)).await?;

        match current {
            Some(place) => {
                let document = SearchDocument::from_place(&place);
                self.search_call(self.search.index(&document)).await?;
                info!(id = %id, "Place re-indexed");
                Ok(true)
            }
            None => {
                debug!(id = %id, "Re-index of absent place cleared search document");
                Ok(false)
            }
        }
    }
}

pub(super) fn validate_id(id: PlaceId) -> PlaceResult<()> {
    if id.is_valid() {
        Ok(())
    } else {
        Err(PlaceError::validation("id", "must be a positive number"))
    }
}

/// Replace any caller-supplied `updated_at` with the repository stamp
fn stamped(mut update: PlaceUpdate, stamp: u64) -> PlaceUpdate {
    update
        .set
        .retain(|value| value.field() != PlaceField::UpdatedAt);
    update.remove.retain(|field| *field != PlaceField::UpdatedAt);
    update.set.push(FieldValue::UpdatedAt(stamp));
    update
}
