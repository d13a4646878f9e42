//! Secondary indices for range-partitioned scans
//!
//! Each secondary index is an ordered set of `(partition, range, id)`
//! triples. Ordering on the full triple gives:
//! - one contiguous run per partition
//! - range-key order within a partition, ties broken by id
//! - an exact, unique resume position for every entry (the cursor)

use geoplaces_core::{IndexCursor, IndexEntry, IndexPage, IndexQuery, PlaceId, RangeKey, SortOrder};
use std::collections::BTreeSet;
use std::ops::Bound;

type Slot = (String, RangeKey, PlaceId);

/// Secondary index: (partition key, range key, id)
///
/// Sparse: only records carrying both a partition and a range key are
/// inserted by the owning store.
#[derive(Debug, Default)]
pub struct SecondaryIndex {
    entries: BTreeSet<Slot>,
}

impl SecondaryIndex {
    /// Create a new empty index
    pub fn new() -> Self {
        Self {
            entries: BTreeSet::new(),
        }
    }

    /// Add an entry
    pub fn insert(&mut self, partition_key: String, range_key: RangeKey, id: PlaceId) {
        self.entries.insert((partition_key, range_key, id));
    }

    /// Remove an entry, returning whether it was present
    pub fn remove(&mut self, partition_key: &str, range_key: &RangeKey, id: PlaceId) -> bool {
        self.entries
            .remove(&(partition_key.to_string(), range_key.clone(), id))
    }

    /// Number of entries in one partition
    pub fn partition_len(&self, partition_key: &str) -> usize {
        self.partition(partition_key).count()
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Read at most `limit` entries of the query's partition
    ///
    /// Starts strictly after `query.cursor` when one is given. The page's
    /// `last_cursor` is set when the page is full, mirroring key-value stores
    /// that return a continuation key whenever the limit stops the scan.
    /// A cursor from another partition yields an empty page.
    pub fn scan(&self, query: &IndexQuery, limit: usize) -> IndexPage {
        if limit == 0 {
            return IndexPage::default();
        }
        if let Some(cursor) = &query.cursor {
            if cursor.partition_key != query.partition_key {
                return IndexPage::default();
            }
        }

        let lower = partition_start(&query.partition_key);
        let upper = partition_end(&query.partition_key);
        let cursor = query.cursor.as_ref().map(slot_of);

        let matches = |slot: &&Slot| {
            query
                .range
                .as_ref()
                .map_or(true, |range| range.matches(&slot.1))
        };

        let items: Vec<IndexEntry> = match query.order {
            SortOrder::Ascending => {
                let start = match cursor {
                    Some(c) => Bound::Excluded(c),
                    None => Bound::Included(lower),
                };
                self.entries
                    .range((start, Bound::Excluded(upper)))
                    .filter(matches)
                    .take(limit)
                    .map(entry_of)
                    .collect()
            }
            SortOrder::Descending => {
                let end = match cursor {
                    Some(c) => Bound::Excluded(c),
                    None => Bound::Excluded(upper),
                };
                self.entries
                    .range((Bound::Included(lower), end))
                    .rev()
                    .filter(matches)
                    .take(limit)
                    .map(entry_of)
                    .collect()
            }
        };

        let last_cursor = if items.len() == limit {
            items.last().map(IndexEntry::cursor)
        } else {
            None
        };
        IndexPage { items, last_cursor }
    }

    fn partition<'a>(&'a self, partition_key: &str) -> impl Iterator<Item = &'a Slot> + 'a {
        self.entries.range((
            Bound::Included(partition_start(partition_key)),
            Bound::Excluded(partition_end(partition_key)),
        ))
    }
}

/// Smallest slot of a partition: numbers sort before text, ids start at 0
fn partition_start(partition_key: &str) -> Slot {
    (partition_key.to_string(), RangeKey::Number(0), PlaceId::new(0))
}

/// First slot past a partition: the next string in lexicographic order
fn partition_end(partition_key: &str) -> Slot {
    (
        format!("{}\u{0}", partition_key),
        RangeKey::Number(0),
        PlaceId::new(0),
    )
}

fn slot_of(cursor: &IndexCursor) -> Slot {
    (
        cursor.partition_key.clone(),
        cursor.range_key.clone(),
        cursor.id,
    )
}

fn entry_of(slot: &Slot) -> IndexEntry {
    IndexEntry {
        partition_key: slot.0.clone(),
        range_key: slot.1.clone(),
        id: slot.2,
    }
}
