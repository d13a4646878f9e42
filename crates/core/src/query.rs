//! Secondary index query types
//!
//! The persisted layout of the three global secondary indexes:
//!
//! | Index | Partition attribute | Range attribute | Range type |
//! |-------|---------------------|-----------------|------------|
//! | `in-admin1-index` | `keyInAdmin1` | `population` | number |
//! | `admin1-index` | `keyAdmin1` | `admin1Code` | string |
//! | `main-places-index` | `keyMain` | `population` | number |
//!
//! A scan returns [`IndexEntry`] rows (keys only). Paging follows the
//! key-value store convention: the caller passes the last seen entry back as
//! an exclusive start cursor.

use crate::types::PlaceId;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// One of the three secondary indexes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IndexName {
    /// Places within an admin1 area, by population
    InAdmin1,
    /// Admin1 areas of a country, by admin1 code
    Admin1,
    /// Main places of a country, by population
    MainPlaces,
}

impl IndexName {
    /// All indexes
    pub const ALL: [IndexName; 3] = [IndexName::InAdmin1, IndexName::Admin1, IndexName::MainPlaces];

    /// Persisted index name
    pub const fn as_str(&self) -> &'static str {
        match self {
            IndexName::InAdmin1 => "in-admin1-index",
            IndexName::Admin1 => "admin1-index",
            IndexName::MainPlaces => "main-places-index",
        }
    }

    /// Persisted partition attribute name
    pub const fn partition_attribute(&self) -> &'static str {
        match self {
            IndexName::InAdmin1 => "keyInAdmin1",
            IndexName::Admin1 => "keyAdmin1",
            IndexName::MainPlaces => "keyMain",
        }
    }

    /// Persisted range attribute name
    pub const fn range_attribute(&self) -> &'static str {
        match self {
            IndexName::InAdmin1 | IndexName::MainPlaces => "population",
            IndexName::Admin1 => "admin1Code",
        }
    }
}

impl fmt::Display for IndexName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Range key value of an index entry
///
/// An index only ever holds one variant, so cross-variant comparison
/// orders numbers first and is never exercised by a real scan.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RangeKey {
    /// Raw numeric population
    Number(u64),
    /// Raw admin1 code
    Text(String),
}

impl Ord for RangeKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (RangeKey::Number(a), RangeKey::Number(b)) => a.cmp(b),
            (RangeKey::Text(a), RangeKey::Text(b)) => a.cmp(b),
            (RangeKey::Number(_), RangeKey::Text(_)) => Ordering::Less,
            (RangeKey::Text(_), RangeKey::Number(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for RangeKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Condition on the range key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RangeMatch {
    /// Exact match
    Eq(RangeKey),
}

impl RangeMatch {
    /// Whether a range key satisfies the condition
    pub fn matches(&self, key: &RangeKey) -> bool {
        match self {
            RangeMatch::Eq(expected) => expected == key,
        }
    }
}

/// Scan direction over the range key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    /// Smallest range key first
    Ascending,
    /// Largest range key first
    #[default]
    Descending,
}

/// Index-ordering key of an entry; used as an exclusive start cursor
///
/// Carries the primary id so entries sharing a range key page correctly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexCursor {
    /// Partition key
    pub partition_key: String,
    /// Range key
    pub range_key: RangeKey,
    /// Primary id
    pub id: PlaceId,
}

/// One row of a secondary index
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Place id
    pub id: PlaceId,
    /// Partition key
    pub partition_key: String,
    /// Range key
    pub range_key: RangeKey,
}

impl IndexEntry {
    /// Cursor positioned at this entry
    pub fn cursor(&self) -> IndexCursor {
        IndexCursor {
            partition_key: self.partition_key.clone(),
            range_key: self.range_key.clone(),
            id: self.id,
        }
    }
}

/// A single page request against a secondary index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexQuery {
    /// Target index
    pub index: IndexName,
    /// Partition to scan
    pub partition_key: String,
    /// Optional range key condition
    pub range: Option<RangeMatch>,
    /// Maximum entries to return; stores may return fewer (page cap)
    pub limit: usize,
    /// Scan direction
    pub order: SortOrder,
    /// Exclusive start position
    pub cursor: Option<IndexCursor>,
}

impl IndexQuery {
    /// Descending scan of a partition
    pub fn new(index: IndexName, partition_key: impl Into<String>, limit: usize) -> Self {
        IndexQuery {
            index,
            partition_key: partition_key.into(),
            range: None,
            limit,
            order: SortOrder::Descending,
            cursor: None,
        }
    }

    /// Restrict to a range key condition
    pub fn with_range(mut self, range: RangeMatch) -> Self {
        self.range = Some(range);
        self
    }

    /// Set scan direction
    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    /// Start after the given cursor
    pub fn with_cursor(mut self, cursor: Option<IndexCursor>) -> Self {
        self.cursor = cursor;
        self
    }
}

/// One page of index entries
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IndexPage {
    /// Entries in scan order
    pub items: Vec<IndexEntry>,
    /// Set when the scan stopped at the limit or page cap and more may follow
    pub last_cursor: Option<IndexCursor>,
}

impl IndexPage {
    /// Ids in page order
    pub fn ids(&self) -> Vec<PlaceId> {
        self.items.iter().map(|e| e.id).collect()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the page is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
