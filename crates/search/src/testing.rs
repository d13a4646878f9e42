//! Test double for the search adapter
//!
//! `FailingSearchIndex` delegates to an inner index, records every call in
//! order, and reports `StoreUnavailable` for the operations it is told to
//! fail.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use geoplaces_core::{PlaceError, PlaceId, PlaceResult, SearchDocument, SearchIndex, SearchQuery};

/// A call observed by [`FailingSearchIndex`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOp {
    /// `index` of a document
    Index(PlaceId),
    /// `delete` by id
    Delete(PlaceId),
    /// `search` with the query text
    Search(String),
}

/// Search index wrapper with per-operation fault injection
#[derive(Debug, Default)]
pub struct FailingSearchIndex<S> {
    inner: S,
    fail_index: AtomicBool,
    fail_delete: AtomicBool,
    fail_search: AtomicBool,
    ops: Mutex<Vec<SearchOp>>,
}

impl<S: SearchIndex> FailingSearchIndex<S> {
    /// Wrap an index; nothing fails until configured
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            fail_index: AtomicBool::new(false),
            fail_delete: AtomicBool::new(false),
            fail_search: AtomicBool::new(false),
            ops: Mutex::new(Vec::new()),
        }
    }

    /// The wrapped index
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Toggle failure of `index`
    pub fn fail_index(&self, fail: bool) {
        self.fail_index.store(fail, Ordering::SeqCst);
    }

    /// Toggle failure of `delete`
    pub fn fail_delete(&self, fail: bool) {
        self.fail_delete.store(fail, Ordering::SeqCst);
    }

    /// Toggle failure of `search`
    pub fn fail_search(&self, fail: bool) {
        self.fail_search.store(fail, Ordering::SeqCst);
    }

    /// Toggle failure of every operation
    pub fn fail_all(&self, fail: bool) {
        self.fail_index(fail);
        self.fail_delete(fail);
        self.fail_search(fail);
    }

    /// Calls observed so far, including failed ones
    pub fn operations(&self) -> Vec<SearchOp> {
        self.ops.lock().clone()
    }

    /// Forget observed calls
    pub fn clear_operations(&self) {
        self.ops.lock().clear();
    }

    fn record(&self, op: SearchOp, flag: &AtomicBool) -> PlaceResult<()> {
        let name = match &op {
            SearchOp::Index(_) => "index",
            SearchOp::Delete(_) => "delete",
            SearchOp::Search(_) => "search",
        };
        self.ops.lock().push(op);
        if flag.load(Ordering::SeqCst) {
            Err(PlaceError::search_unavailable(format!(
                "injected {} failure",
                name
            )))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl<S: SearchIndex> SearchIndex for FailingSearchIndex<S> {
    async fn index(&self, document: &SearchDocument) -> PlaceResult<()> {
        self.record(SearchOp::Index(document.id), &self.fail_index)?;
        self.inner.index(document).await
    }

    async fn delete(&self, id: PlaceId) -> PlaceResult<bool> {
        self.record(SearchOp::Delete(id), &self.fail_delete)?;
        self.inner.delete(id).await
    }

    async fn search(&self, query: &SearchQuery) -> PlaceResult<Vec<PlaceId>> {
        self.record(SearchOp::Search(query.query.clone()), &self.fail_search)?;
        self.inner.search(query).await
    }
}
