//! Fault-injecting store wrapper

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use geoplaces_core::{
    FieldSet, IndexPage, IndexQuery, Place, PlaceError, PlaceId, PlaceRecord, PlaceResult,
    PlaceStore, RecordUpdate,
};

/// Store wrapper that fails on demand with `StoreUnavailable`
#[derive(Debug, Default)]
pub struct FailingStore<S> {
    inner: S,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl<S: PlaceStore> FailingStore<S> {
    /// Wrap a store; nothing fails until configured
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// The wrapped store
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Toggle failure of `get`, `batch_get` and `query_index`
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Toggle failure of `create`, `update` and `delete`
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check(&self, flag: &AtomicBool, op: &str) -> PlaceResult<()> {
        if flag.load(Ordering::SeqCst) {
            Err(PlaceError::primary_unavailable(format!(
                "injected {} failure",
                op
            )))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl<S: PlaceStore> PlaceStore for FailingStore<S> {
    async fn get(&self, id: PlaceId, fields: Option<&FieldSet>) -> PlaceResult<Option<Place>> {
        self.check(&self.fail_reads, "get")?;
        self.inner.get(id, fields).await
    }

    async fn batch_get(
        &self,
        ids: &[PlaceId],
        fields: Option<&FieldSet>,
    ) -> PlaceResult<Vec<Place>> {
        self.check(&self.fail_reads, "batch_get")?;
        self.inner.batch_get(ids, fields).await
    }

    async fn create(&self, record: PlaceRecord) -> PlaceResult<Place> {
        self.check(&self.fail_writes, "create")?;
        self.inner.create(record).await
    }

    async fn update(&self, update: RecordUpdate) -> PlaceResult<Place> {
        self.check(&self.fail_writes, "update")?;
        self.inner.update(update).await
    }

    async fn delete(&self, id: PlaceId) -> PlaceResult<Option<Place>> {
        self.check(&self.fail_writes, "delete")?;
        self.inner.delete(id).await
    }

    async fn query_index(&self, query: &IndexQuery) -> PlaceResult<IndexPage> {
        self.check(&self.fail_reads, "query_index")?;
        self.inner.query_index(query).await
    }

    fn max_page_size(&self) -> Option<usize> {
        self.inner.max_page_size()
    }
}
