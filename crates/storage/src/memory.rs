//! MemoryPlaceStore: in-process primary store
//!
//! Implements `PlaceStore` using:
//! - `FxHashMap<PlaceId, PlaceRecord>` for point lookups
//! - one `SecondaryIndex` per `IndexName`
//! - a single `parking_lot::RwLock` so a record and its index entries
//!   always change together
//!
//! Like a hosted key-value store it enforces a maximum page size: an index
//! query asking for more than `max_page_size` entries gets a short page plus
//! a continuation cursor.

use async_trait::async_trait;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use geoplaces_core::{
    project, FieldSet, IndexName, IndexPage, IndexQuery, Place, PlaceError, PlaceRecord,
    PlaceResult, PlaceStore, PlaceId, RecordUpdate,
};

use crate::index::SecondaryIndex;

/// Configuration for the in-memory primary store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryStoreConfig {
    /// Maximum entries returned by one index query (default: 100)
    pub max_page_size: usize,
}

impl Default for MemoryStoreConfig {
    fn default() -> Self {
        MemoryStoreConfig { max_page_size: 100 }
    }
}

#[derive(Debug, Default)]
struct Tables {
    records: FxHashMap<PlaceId, PlaceRecord>,
    indexes: FxHashMap<IndexName, SecondaryIndex>,
}

impl Tables {
    fn index_record(&mut self, record: &PlaceRecord) {
        for name in IndexName::ALL {
            if let Some((partition, range)) = record.index_key(name) {
                self.indexes
                    .entry(name)
                    .or_default()
                    .insert(partition, range, record.id());
            }
        }
    }

    fn unindex_record(&mut self, record: &PlaceRecord) {
        for name in IndexName::ALL {
            if let Some((partition, range)) = record.index_key(name) {
                if let Some(index) = self.indexes.get_mut(&name) {
                    index.remove(&partition, &range, record.id());
                }
            }
        }
    }
}

/// In-memory primary store with sparse secondary indexes
#[derive(Debug, Default)]
pub struct MemoryPlaceStore {
    config: MemoryStoreConfig,
    tables: RwLock<Tables>,
}

impl MemoryPlaceStore {
    /// Create an empty store with the default page cap
    pub fn new() -> Self {
        Self::with_config(MemoryStoreConfig::default())
    }

    /// Create an empty store with explicit configuration
    pub fn with_config(config: MemoryStoreConfig) -> Self {
        Self {
            config,
            tables: RwLock::new(Tables::default()),
        }
    }

    /// Number of stored places
    pub fn len(&self) -> usize {
        self.tables.read().records.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.tables.read().records.is_empty()
    }

    /// Stored record including derived keys
    pub fn record(&self, id: PlaceId) -> Option<PlaceRecord> {
        self.tables.read().records.get(&id).cloned()
    }

    /// Number of entries in one index partition
    pub fn partition_len(&self, index: IndexName, partition_key: &str) -> usize {
        self.tables
            .read()
            .indexes
            .get(&index)
            .map_or(0, |i| i.partition_len(partition_key))
    }
}

#[async_trait]
impl PlaceStore for MemoryPlaceStore {
    async fn get(&self, id: PlaceId, fields: Option<&FieldSet>) -> PlaceResult<Option<Place>> {
        let tables = self.tables.read();
        Ok(tables
            .records
            .get(&id)
            .map(|record| project(record.place.clone(), fields)))
    }

    async fn batch_get(
        &self,
        ids: &[PlaceId],
        fields: Option<&FieldSet>,
    ) -> PlaceResult<Vec<Place>> {
        let tables = self.tables.read();
        Ok(ids
            .iter()
            .filter_map(|id| tables.records.get(id))
            .map(|record| project(record.place.clone(), fields))
            .collect())
    }

    async fn create(&self, record: PlaceRecord) -> PlaceResult<Place> {
        let mut tables = self.tables.write();
        let id = record.id();
        if tables.records.contains_key(&id) {
            return Err(PlaceError::AlreadyExists { id });
        }
        tables.index_record(&record);
        let place = record.place.clone();
        tables.records.insert(id, record);
        Ok(place)
    }

    async fn update(&self, update: RecordUpdate) -> PlaceResult<Place> {
        if update.keys.is_none() && update.touches_keys() {
            return Err(PlaceError::validation(
                "keys",
                "required when a key field changes",
            ));
        }
        let RecordUpdate {
            id,
            set,
            remove,
            keys,
            expected,
        } = update;

        let mut tables = self.tables.write();
        let Some(current) = tables.records.get(&id) else {
            return Err(PlaceError::NotFound { id });
        };
        if expected.is_some_and(|expected| current.place != expected) {
            debug!(id = %id, "Refusing update of a modified place");
            return Err(PlaceError::Conflict { id });
        }
        let Some(mut record) = tables.records.remove(&id) else {
            return Err(PlaceError::NotFound { id });
        };

        // Index entries only move when the keys do
        if keys.is_some() {
            tables.unindex_record(&record);
        }
        for field in &remove {
            record.place.clear(*field);
        }
        for value in set {
            value.apply(&mut record.place);
        }
        if let Some(keys) = keys {
            record.keys = keys;
            tables.index_record(&record);
        }

        let place = record.place.clone();
        tables.records.insert(id, record);
        Ok(place)
    }

    async fn delete(&self, id: PlaceId) -> PlaceResult<Option<Place>> {
        let mut tables = self.tables.write();
        let removed = tables.records.remove(&id);
        if let Some(ref record) = removed {
            tables.unindex_record(record);
        }
        Ok(removed.map(PlaceRecord::into_place))
    }

    async fn query_index(&self, query: &IndexQuery) -> PlaceResult<IndexPage> {
        let limit = if query.limit > self.config.max_page_size {
            debug!(
                index = %query.index,
                requested = query.limit,
                cap = self.config.max_page_size,
                "Clamping index page to store maximum"
            );
            self.config.max_page_size
        } else {
            query.limit
        };

        let tables = self.tables.read();
        Ok(tables
            .indexes
            .get(&query.index)
            .map(|index| index.scan(query, limit))
            .unwrap_or_default())
    }

    fn max_page_size(&self) -> Option<usize> {
        Some(self.config.max_page_size)
    }
}
