//! Segmented range queries
//!
//! A primary store caps how many entries one index query may return. To
//! read more than that from a range-sorted partition, the requested limit
//! is split into consecutive page requests:
//!
//! ```text
//! limit = 250, segment = 100   →   pages of 100, 100, 50
//! ```
//!
//! No page asks for more than the store's own cap, so a segment size above
//! the cap just means smaller pages. Each page resumes strictly after the
//! last entry of the previous one (partition key, range key and id), so
//! ordering holds across the whole concatenation. A page shorter than
//! requested means the partition is exhausted and no further page is
//! issued.
//!
//! Pages are sequential by construction: each cursor depends on the
//! previous page. Scans of different partitions are independent.

use geoplaces_core::{IndexCursor, IndexQuery, PlaceId, PlaceResult, PlaceStore};
use tracing::debug;

/// Page sizes no larger than `segment_size` that add up to `limit`
///
/// Every page but the last is full. A zero limit yields no pages; a zero
/// segment size is treated as one. Sizes are produced lazily, so any limit
/// up to `usize::MAX` is fine.
pub fn segment_limits(limit: usize, segment_size: usize) -> impl Iterator<Item = usize> {
    let segment_size = segment_size.max(1);
    let mut remaining = limit;
    std::iter::from_fn(move || {
        if remaining == 0 {
            return None;
        }
        let page = remaining.min(segment_size);
        remaining -= page;
        Some(page)
    })
}

/// Drives a `PlaceStore` across successive index pages
#[derive(Debug, Clone, Copy)]
pub struct SegmentedExecutor {
    segment_size: usize,
}

impl SegmentedExecutor {
    /// Executor requesting at most `segment_size` entries per page
    pub fn new(segment_size: usize) -> Self {
        Self {
            segment_size: segment_size.max(1),
        }
    }

    /// Configured segment size
    pub fn segment_size(&self) -> usize {
        self.segment_size
    }

    /// Page size used against `store`: the segment size, capped by the store
    pub fn page_size(&self, store: &dyn PlaceStore) -> usize {
        match store.max_page_size() {
            Some(cap) if cap < self.segment_size => cap.max(1),
            _ => self.segment_size,
        }
    }

    /// Collect up to `query.limit` ids from the query's partition
    ///
    /// `query.cursor`, when set, is the exclusive start of the first page.
    /// Ids are returned in index order and never deduplicated.
    ///
    /// # Errors
    ///
    /// The first failing page aborts the scan; ids from earlier pages are
    /// discarded.
    pub async fn execute(
        &self,
        store: &dyn PlaceStore,
        query: &IndexQuery,
    ) -> PlaceResult<Vec<PlaceId>> {
        let page_size = self.page_size(store);
        if page_size < self.segment_size {
            debug!(
                segment_size = self.segment_size,
                page_size, "Segment size exceeds store page cap"
            );
        }

        let mut ids = Vec::with_capacity(query.limit.min(page_size));
        let mut cursor: Option<IndexCursor> = query.cursor.clone();

        for (page_no, page_limit) in segment_limits(query.limit, page_size).enumerate() {
            let page_query = IndexQuery {
                limit: page_limit,
                cursor: cursor.take(),
                ..query.clone()
            };
            let page = store.query_index(&page_query).await?;
            let returned = page.len().min(page_limit);

            debug!(
                index = %query.index,
                partition = %query.partition_key,
                page = page_no,
                requested = page_limit,
                returned,
                "Index page read"
            );

            ids.extend(page.items.iter().take(page_limit).map(|entry| entry.id));

            if returned < page_limit {
                break;
            }
            cursor = page.items.get(returned - 1).map(|entry| entry.cursor());
        }

        Ok(ids)
    }
}
