//! Storage layer for places
//!
//! This crate implements the in-process primary store adapter with:
//! - MemoryPlaceStore: FxHashMap records behind a `parking_lot::RwLock`
//! - SecondaryIndex: ordered (partition, range, id) sets, one per index
//! - An enforced page cap, like a hosted key-value store
//! - MemoryOldIdStore: DashMap-backed legacy id table
//! - Test doubles under [`testing`]

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod index;
pub mod memory;
pub mod old_ids;
pub mod testing;

pub use index::SecondaryIndex;
pub use memory::{MemoryPlaceStore, MemoryStoreConfig};
pub use old_ids::MemoryOldIdStore;
