//! Test doubles for the primary store
//!
//! - **RecordingStore**: delegates to an inner store and records every index
//!   page request and batch fetch, so tests can assert on access patterns
//! - **FailingStore**: delegates until told to fail, then reports
//!   `StoreUnavailable` for reads, writes, or both
//!
//! # Example
//!
//! ```ignore
//! use geoplaces_storage::{MemoryPlaceStore, testing::RecordingStore};
//!
//! let store = RecordingStore::new(MemoryPlaceStore::new());
//! // ... run a segmented scan through the repository ...
//! assert_eq!(store.page_limits(), vec![100, 100, 50]);
//! ```

mod failing;
mod recording;

pub use failing::FailingStore;
pub use recording::RecordingStore;
