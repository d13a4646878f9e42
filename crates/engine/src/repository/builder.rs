//! Repository builder
//!
//! Any adapter not supplied explicitly defaults to its in-memory
//! implementation, so tests only wire what they want to observe.
//!
//! ```ignore
//! use geoplaces_engine::PlaceRepository;
//!
//! // In-memory everything, default configuration
//! let repo = PlaceRepository::in_memory();
//!
//! // Custom adapters and configuration
//! let repo = PlaceRepository::builder()
//!     .store(store)
//!     .search(search)
//!     .config(RepositoryConfig::from_file(path)?)
//!     .build()?;
//! ```

use std::sync::Arc;

use geoplaces_core::{OldPlaceIdStore, PlaceLimits, PlaceStore, SearchIndex};
use geoplaces_search::MemorySearchIndex;
use geoplaces_storage::{MemoryOldIdStore, MemoryPlaceStore};

use super::PlaceRepository;
use crate::config::{ConfigError, RepositoryConfig};
use crate::segmented::SegmentedExecutor;

/// Builder for `PlaceRepository`
#[derive(Default)]
pub struct RepositoryBuilder {
    store: Option<Arc<dyn PlaceStore>>,
    search: Option<Arc<dyn SearchIndex>>,
    old_ids: Option<Arc<dyn OldPlaceIdStore>>,
    config: RepositoryConfig,
    limits: PlaceLimits,
}

impl RepositoryBuilder {
    /// Create new builder with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Use this primary store
    pub fn store(mut self, store: Arc<dyn PlaceStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Use this search index
    pub fn search(mut self, search: Arc<dyn SearchIndex>) -> Self {
        self.search = Some(search);
        self
    }

    /// Use this legacy id table
    pub fn old_ids(mut self, old_ids: Arc<dyn OldPlaceIdStore>) -> Self {
        self.old_ids = Some(old_ids);
        self
    }

    /// Use this configuration
    pub fn config(mut self, config: RepositoryConfig) -> Self {
        self.config = config;
        self
    }

    /// Use these validation limits
    pub fn limits(mut self, limits: PlaceLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Build the repository
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if the configuration fails validation.
    pub fn build(self) -> Result<PlaceRepository, ConfigError> {
        self.config.validate()?;
        Ok(self.build_unchecked())
    }

    pub(super) fn build_unchecked(self) -> PlaceRepository {
        let store = self.store.unwrap_or_else(|| {
            Arc::new(MemoryPlaceStore::with_config(self.config.memory_store.clone()))
        });
        let search = self
            .search
            .unwrap_or_else(|| Arc::new(MemorySearchIndex::new()));
        let old_ids = self
            .old_ids
            .unwrap_or_else(|| Arc::new(MemoryOldIdStore::new()));

        PlaceRepository {
            store,
            search,
            old_ids,
            executor: SegmentedExecutor::new(self.config.segment_size),
            config: self.config,
            limits: self.limits,
        }
    }
}
