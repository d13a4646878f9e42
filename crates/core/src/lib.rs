//! Core types and traits for the place repository
//!
//! This crate defines the foundational types used throughout the system:
//! - Place, PlaceId, FeatureClass: The canonical entity
//! - PlaceUpdate, FieldValue, FieldSet: Partial updates and projections
//! - Keys: Secondary key derivation and the main-place policy
//! - PlaceRecord: A place paired with its derived keys (storage side)
//! - Query types: Secondary index scans and cursors
//! - Search types: SearchDocument, SearchQuery
//! - Limits: Input validation
//! - Error: PlaceError taxonomy
//! - Traits: PlaceStore, SearchIndex, OldPlaceIdStore

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod keys;
pub mod limits;
pub mod query;
pub mod record;
pub mod search_types;
pub mod traits;
pub mod types;

pub use error::{PlaceError, PlaceResult, StoreKind, WriteOp};
pub use keys::{derive_keys, DerivedKeys, MainPlacePolicy, ADM1_CODE};
pub use limits::PlaceLimits;
pub use query::{
    IndexCursor, IndexEntry, IndexName, IndexPage, IndexQuery, RangeKey, RangeMatch, SortOrder,
};
pub use record::{PlaceRecord, RecordUpdate};
pub use search_types::{MatchType, SearchDocument, SearchField, SearchQuery};
pub use traits::{OldPlaceIdStore, PlaceStore, SearchIndex};
pub use types::{
    project, FeatureClass, FieldSet, FieldValue, OldPlaceId, Place, PlaceField, PlaceId,
    PlaceUpdate,
};
