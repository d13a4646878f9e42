//! Store abstractions
//!
//! The repository is written against these traits so adapters can be
//! swapped without touching synchronization or query logic:
//!
//! - `PlaceStore`: the key-value system of record with secondary indexes
//! - `SearchIndex`: the derived full-text index
//! - `OldPlaceIdStore`: the legacy id mapping table
//!
//! All methods are async and every implementation must be `Send + Sync`
//! so a single adapter instance can be shared behind an `Arc`.

use async_trait::async_trait;

use crate::error::PlaceResult;
use crate::query::{IndexPage, IndexQuery};
use crate::record::{PlaceRecord, RecordUpdate};
use crate::search_types::{SearchDocument, SearchQuery};
use crate::types::{FieldSet, OldPlaceId, Place, PlaceId};

/// Primary key-value store of places
///
/// Failures of the underlying transport must surface as
/// `PlaceError::StoreUnavailable` with `StoreKind::Primary`.
#[async_trait]
pub trait PlaceStore: Send + Sync {
    /// Fetch one place, optionally projected to a field set
    async fn get(&self, id: PlaceId, fields: Option<&FieldSet>) -> PlaceResult<Option<Place>>;

    /// Fetch many places in one round-trip
    ///
    /// Missing ids are skipped. Result order is unspecified.
    async fn batch_get(&self, ids: &[PlaceId], fields: Option<&FieldSet>)
        -> PlaceResult<Vec<Place>>;

    /// Insert a record if no entity with its id exists
    ///
    /// # Errors
    ///
    /// `PlaceError::AlreadyExists` when the id is taken.
    async fn create(&self, record: PlaceRecord) -> PlaceResult<Place>;

    /// Apply a partial update if the entity exists, returning the full new state
    ///
    /// When `update.expected` is set the write only applies if the stored
    /// entity still equals it.
    ///
    /// # Errors
    ///
    /// - `PlaceError::NotFound` when the id is absent
    /// - `PlaceError::Conflict` when the stored entity differs from
    ///   `update.expected`
    async fn update(&self, update: RecordUpdate) -> PlaceResult<Place>;

    /// Remove an entity, returning it if it existed
    async fn delete(&self, id: PlaceId) -> PlaceResult<Option<Place>>;

    /// Read one page of a secondary index
    ///
    /// The store may return fewer entries than requested; `last_cursor` is
    /// set whenever more entries may follow.
    async fn query_index(&self, query: &IndexQuery) -> PlaceResult<IndexPage>;

    /// Largest page `query_index` will return, if the store caps pages
    ///
    /// Scans never request more than this per page, so a capped page is
    /// not mistaken for the end of a partition.
    fn max_page_size(&self) -> Option<usize> {
        None
    }
}

/// Derived full-text search index
///
/// Failures must surface as `PlaceError::StoreUnavailable` with
/// `StoreKind::Search`.
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Insert or replace a document
    async fn index(&self, document: &SearchDocument) -> PlaceResult<()>;

    /// Remove a document, returning whether it existed
    async fn delete(&self, id: PlaceId) -> PlaceResult<bool>;

    /// Matching ids, best first, de-duplicated, at most `query.limit`
    async fn search(&self, query: &SearchQuery) -> PlaceResult<Vec<PlaceId>>;
}

/// Legacy id mapping table
#[async_trait]
pub trait OldPlaceIdStore: Send + Sync {
    /// Look up a legacy id
    async fn get(&self, id: PlaceId) -> PlaceResult<Option<OldPlaceId>>;
}
