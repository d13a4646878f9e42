//! Geoplaces - a repository of geographic places
//!
//! Places live in a key-value system of record with three secondary
//! indexes (places in an admin1 area, admin1 areas of a country, main
//! places of a country) and are mirrored into a full-text search index.
//!
//! # Quick Start
//!
//! ```ignore
//! use geoplaces::{PlaceRepository, Place, SearchQuery};
//!
//! let repo = PlaceRepository::in_memory();
//! repo.create(place).await?;
//!
//! let cities = repo.get_places_in_admin1("ro", "VS", 10, None).await?;
//! let hits = repo.search(&SearchQuery::new("iasi", 5).country("ro"), None).await?;
//! ```
//!
//! # Architecture
//!
//! - `geoplaces-core`: domain types, key derivation, validation, adapter traits
//! - `geoplaces-storage`: in-memory primary store
//! - `geoplaces-search`: in-memory search index
//! - `geoplaces-engine`: the repository, segmented scans, configuration

pub use geoplaces_core::*;
pub use geoplaces_engine::{
    segment_limits, sort_by_ids, ConfigError, PlaceRepository, RepositoryBuilder,
    RepositoryConfig, SegmentedExecutor, CONFIG_FILE_NAME,
};
pub use geoplaces_search::MemorySearchIndex;
pub use geoplaces_storage::{MemoryOldIdStore, MemoryPlaceStore, MemoryStoreConfig};

/// Test doubles for the store adapters
pub mod testing {
    pub use geoplaces_search::testing::{FailingSearchIndex, SearchOp};
    pub use geoplaces_storage::testing::{FailingStore, RecordingStore};
}
