//! The place repository
//!
//! `PlaceRepository` composes three adapters behind `Arc<dyn Trait>`:
//!
//! - `PlaceStore`: system of record, written first on every write
//! - `SearchIndex`: derived full-text index, written after the primary
//!   store and never rolled back into it
//! - `OldPlaceIdStore`: legacy id table, read only
//!
//! Write paths live in `sync`, read paths in `read`.
//!
//! # Failure semantics
//!
//! | Step fails | Result |
//! |------------|--------|
//! | validation | `Validation`, no store touched |
//! | primary store | the primary error, search untouched |
//! | search after a committed primary write | `PartialWriteFailure` carrying the entity |
//! | search delete of the old document during update | ignored |

mod builder;
mod read;
mod sync;

pub use builder::RepositoryBuilder;

use std::future::Future;
use std::sync::Arc;

use geoplaces_core::{OldPlaceIdStore, PlaceError, PlaceLimits, PlaceResult, PlaceStore, SearchIndex};

use crate::config::RepositoryConfig;
use crate::segmented::SegmentedExecutor;

/// Repository of places over a primary store and a search index
///
/// Cheap to clone; clones share the adapters.
#[derive(Clone)]
pub struct PlaceRepository {
    store: Arc<dyn PlaceStore>,
    search: Arc<dyn SearchIndex>,
    old_ids: Arc<dyn OldPlaceIdStore>,
    config: RepositoryConfig,
    limits: PlaceLimits,
    executor: SegmentedExecutor,
}

impl std::fmt::Debug for PlaceRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaceRepository")
            .field("config", &self.config)
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}

impl PlaceRepository {
    /// Start building a repository
    pub fn builder() -> RepositoryBuilder {
        RepositoryBuilder::new()
    }

    /// Repository over fresh in-memory adapters with default configuration
    pub fn in_memory() -> Self {
        RepositoryBuilder::new().build_unchecked()
    }

    /// Active configuration
    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    /// The primary store adapter
    pub fn store(&self) -> &Arc<dyn PlaceStore> {
        &self.store
    }

    /// The search adapter
    pub fn search_index(&self) -> &Arc<dyn SearchIndex> {
        &self.search
    }

    /// Run a search-store call under the configured deadline
    ///
    /// An expired deadline drops the call and reports the search store as
    /// unavailable.
    async fn search_call<T, F>(&self, call: F) -> PlaceResult<T>
    where
        F: Future<Output = PlaceResult<T>>,
    {
        match self.config.search_timeout() {
            Some(deadline) => match tokio::time::timeout(deadline, call).await {
                Ok(result) => result,
                Err(_) => Err(PlaceError::search_unavailable(format!(
                    "call timed out after {}ms",
                    deadline.as_millis()
                ))),
            },
            None => call.await,
        }
    }
}
