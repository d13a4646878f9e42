//! Place repository engine
//!
//! This crate orchestrates the lower layers:
//! - PlaceRepository: write paths that keep the search index in step with
//!   the primary store, and the read paths over both
//! - SegmentedExecutor: index scans larger than one store page
//! - RepositoryConfig: `places.toml` configuration
//!
//! The engine is the only component that knows about:
//! - Key derivation at write time
//! - Write ordering across the two stores and its failure policy
//! - Restoring caller order after batch fetches

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod ordering;
pub mod repository;
pub mod segmented;

pub use config::{ConfigError, RepositoryConfig, CONFIG_FILE_NAME};
pub use ordering::sort_by_ids;
pub use repository::{PlaceRepository, RepositoryBuilder};
pub use segmented::{segment_limits, SegmentedExecutor};
