//! Error types for the place repository
//!
//! This module defines the error taxonomy shared by the repository and its
//! store adapters. We use `thiserror` for automatic `Display` and `Error`
//! trait implementations.
//!
//! ## Propagation
//!
//! - `Validation`: rejected before any I/O
//! - `AlreadyExists` / `NotFound`: conditional writes on the primary store
//! - `Conflict`: the entity changed between read and conditional update
//! - `StoreUnavailable`: transport or infrastructure failure of either store
//! - `PartialWriteFailure`: the primary store committed, search propagation
//!   failed. Carries the committed entity so callers never lose it.

use crate::types::{Place, PlaceId};
use std::fmt;
use thiserror::Error;

/// Result type alias for repository operations
pub type PlaceResult<T> = std::result::Result<T, PlaceError>;

/// Which backing store produced a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKind {
    /// The key-value system of record
    Primary,
    /// The full-text search index
    Search,
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreKind::Primary => f.write_str("primary"),
            StoreKind::Search => f.write_str("search"),
        }
    }
}

/// Write operation that ended in a degraded success
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WriteOp {
    /// Place creation
    Create,
    /// Partial update
    Update,
    /// Deletion
    Delete,
}

impl fmt::Display for WriteOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteOp::Create => f.write_str("create"),
            WriteOp::Update => f.write_str("update"),
            WriteOp::Delete => f.write_str("delete"),
        }
    }
}

/// Error types for the place repository
#[derive(Debug, Error)]
pub enum PlaceError {
    /// Malformed or missing input; never reaches a store
    #[error("Validation error on '{field}': {reason}")]
    Validation {
        /// Offending field or parameter
        field: String,
        /// Human-readable reason
        reason: String,
    },

    /// Conditional create found an existing entity
    #[error("Place {id} already exists")]
    AlreadyExists {
        /// Conflicting id
        id: PlaceId,
    },

    /// Conditional update or required lookup found nothing
    #[error("Place {id} not found")]
    NotFound {
        /// Missing id
        id: PlaceId,
    },

    /// Conditional update found the entity changed since it was read
    #[error("Place {id} was modified concurrently")]
    Conflict {
        /// Contended id
        id: PlaceId,
    },

    /// Store transport or infrastructure failure
    #[error("{store} store unavailable: {message}")]
    StoreUnavailable {
        /// Failing store
        store: StoreKind,
        /// Adapter-provided detail
        message: String,
    },

    /// Primary write committed, search propagation failed
    #[error("{operation} of place {} committed but search propagation failed: {message}", place.id)]
    PartialWriteFailure {
        /// Operation that degraded
        operation: WriteOp,
        /// Entity as committed in the primary store
        place: Box<Place>,
        /// Search-side failure detail
        message: String,
    },
}

impl PlaceError {
    /// Validation failure on a field or parameter
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        PlaceError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Primary store failure
    pub fn primary_unavailable(message: impl Into<String>) -> Self {
        PlaceError::StoreUnavailable {
            store: StoreKind::Primary,
            message: message.into(),
        }
    }

    /// Search store failure
    pub fn search_unavailable(message: impl Into<String>) -> Self {
        PlaceError::StoreUnavailable {
            store: StoreKind::Search,
            message: message.into(),
        }
    }

    /// Degraded success for a committed entity
    pub fn partial_write(operation: WriteOp, place: Place, message: impl Into<String>) -> Self {
        PlaceError::PartialWriteFailure {
            operation,
            place: Box::new(place),
            message: message.into(),
        }
    }

    /// Stable code for logs and wire responses
    pub fn error_code(&self) -> &'static str {
        match self {
            PlaceError::Validation { .. } => "ValidationError",
            PlaceError::AlreadyExists { .. } => "AlreadyExists",
            PlaceError::NotFound { .. } => "NotFound",
            PlaceError::Conflict { .. } => "Conflict",
            PlaceError::StoreUnavailable { .. } => "StoreUnavailable",
            PlaceError::PartialWriteFailure { .. } => "PartialWriteFailure",
        }
    }

    /// Whether the authoritative write succeeded despite this error
    pub fn is_degraded(&self) -> bool {
        matches!(self, PlaceError::PartialWriteFailure { .. })
    }

    /// The committed entity of a degraded success
    pub fn committed_place(&self) -> Option<&Place> {
        match self {
            PlaceError::PartialWriteFailure { place, .. } => Some(place),
            _ => None,
        }
    }

    /// Consume a degraded success, yielding the committed entity
    pub fn into_committed_place(self) -> Option<Place> {
        match self {
            PlaceError::PartialWriteFailure { place, .. } => Some(*place),
            _ => None,
        }
    }
}
