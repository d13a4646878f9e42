//! Access-recording store wrapper

use async_trait::async_trait;
use parking_lot::Mutex;

use geoplaces_core::{
    FieldSet, IndexPage, IndexQuery, Place, PlaceId, PlaceRecord, PlaceResult, PlaceStore,
    RecordUpdate,
};

/// Store wrapper recording index page requests and batch fetch sizes
#[derive(Debug, Default)]
pub struct RecordingStore<S> {
    inner: S,
    index_requests: Mutex<Vec<IndexQuery>>,
    batch_sizes: Mutex<Vec<usize>>,
}

impl<S: PlaceStore> RecordingStore<S> {
    /// Wrap a store
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            index_requests: Mutex::new(Vec::new()),
            batch_sizes: Mutex::new(Vec::new()),
        }
    }

    /// The wrapped store
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Every index query issued, in order
    pub fn index_requests(&self) -> Vec<IndexQuery> {
        self.index_requests.lock().clone()
    }

    /// Requested limit of every index page, in order
    pub fn page_limits(&self) -> Vec<usize> {
        self.index_requests.lock().iter().map(|q| q.limit).collect()
    }

    /// Number of ids in every batch fetch, in order
    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batch_sizes.lock().clone()
    }

    /// Forget recorded requests
    pub fn reset(&self) {
        self.index_requests.lock().clear();
        self.batch_sizes.lock().clear();
    }
}

#[async_trait]
impl<S: PlaceStore> PlaceStore for RecordingStore<S> {
    async fn get(&self, id: PlaceId, fields: Option<&FieldSet>) -> PlaceResult<Option<Place>> {
        self.inner.get(id, fields).await
    }

    async fn batch_get(
        &self,
        ids: &[PlaceId],
        fields: Option<&FieldSet>,
    ) -> PlaceResult<Vec<Place>> {
        self.batch_sizes.lock().push(ids.len());
        self.inner.batch_get(ids, fields).await
    }

    async fn create(&self, record: PlaceRecord) -> PlaceResult<Place> {
        self.inner.create(record).await
    }

    async fn update(&self, update: RecordUpdate) -> PlaceResult<Place> {
        self.inner.update(update).await
    }

    async fn delete(&self, id: PlaceId) -> PlaceResult<Option<Place>> {
        self.inner.delete(id).await
    }

    async fn query_index(&self, query: &IndexQuery) -> PlaceResult<IndexPage> {
        self.index_requests.lock().push(query.clone());
        self.inner.query_index(query).await
    }

    fn max_page_size(&self) -> Option<usize> {
        self.inner.max_page_size()
    }
}
