//! In-memory legacy id table
//!
//! Lock-free reads via DashMap; the table is loaded once and read often.

use async_trait::async_trait;
use dashmap::DashMap;

use geoplaces_core::{OldPlaceId, OldPlaceIdStore, PlaceId, PlaceResult};

/// Legacy id → geonames id mapping held in memory
#[derive(Debug, Default)]
pub struct MemoryOldIdStore {
    rows: DashMap<u64, OldPlaceId>,
}

impl MemoryOldIdStore {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            rows: DashMap::new(),
        }
    }

    /// Insert or replace a mapping row
    pub fn put(&self, row: OldPlaceId) {
        self.rows.insert(row.id, row);
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl FromIterator<OldPlaceId> for MemoryOldIdStore {
    fn from_iter<I: IntoIterator<Item = OldPlaceId>>(iter: I) -> Self {
        let store = MemoryOldIdStore::new();
        for row in iter {
            store.put(row);
        }
        store
    }
}

#[async_trait]
impl OldPlaceIdStore for MemoryOldIdStore {
    async fn get(&self, id: PlaceId) -> PlaceResult<Option<OldPlaceId>> {
        Ok(self.rows.get(&id.as_u64()).map(|row| *row))
    }
}
