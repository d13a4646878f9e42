//! Degraded writes and store outages
//!
//! The primary store is the system of record: a search failure after a
//! committed primary write surfaces as `PartialWriteFailure` carrying the
//! committed entity, and never undoes the primary write.

use std::sync::Arc;
use std::time::Duration;

use crate::common::*;

fn assert_partial(err: &PlaceError, expected: WriteOp, id: u64) {
    match err {
        PlaceError::PartialWriteFailure {
            operation, place, ..
        } => {
            assert_eq!(*operation, expected);
            assert_eq!(place.id, PlaceId::new(id));
        }
        other => panic!("expected PartialWriteFailure, got {:?}", other),
    }
}

fn assert_unavailable(err: &PlaceError, expected: StoreKind) {
    assert!(
        matches!(err, PlaceError::StoreUnavailable { store, .. } if *store == expected),
        "expected {} store unavailable, got {:?}",
        expected,
        err
    );
}

// ============================================================================
// Search failures after a committed primary write
// ============================================================================

#[tokio::test]
async fn create_with_failing_search_is_partial() {
    let flaky = Flaky::new();
    flaky.search.fail_index(true);

    let err = flaky
        .repo
        .create(populated(1, "Vaslui", "VS", 55_000))
        .await
        .unwrap_err();

    assert_partial(&err, WriteOp::Create, 1);
    assert!(err.is_degraded());
    assert!(flaky.repo.exists(1u64).await.unwrap());
    assert!(flaky.search.inner().document(PlaceId::new(1)).is_none());
}

#[tokio::test]
async fn reindex_repairs_partial_create() {
    let flaky = Flaky::new();
    flaky.search.fail_index(true);
    let committed = flaky
        .repo
        .create(populated(1, "Vaslui", "VS", 55_000))
        .await
        .unwrap_err()
        .into_committed_place()
        .unwrap();
    assert_eq!(committed.name.as_deref(), Some("Vaslui"));

    flaky.search.fail_index(false);
    assert!(flaky.repo.reindex(1u64).await.unwrap());

    let hits = flaky
        .repo
        .search(&SearchQuery::new("vaslui", 5), None)
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, PlaceId::new(1));
}

#[tokio::test]
async fn update_with_failing_search_is_partial() {
    let flaky = Flaky::new();
    flaky
        .repo
        .create(populated(1, "Vaslui", "VS", 55_000))
        .await
        .unwrap();
    flaky.search.fail_index(true);

    let err = flaky
        .repo
        .update(PlaceUpdate::new(1u64).set(FieldValue::Population(60_000)))
        .await
        .unwrap_err();

    assert_partial(&err, WriteOp::Update, 1);
    assert_eq!(err.committed_place().unwrap().population, Some(60_000));

    let stored = flaky.repo.get_by_id(1u64, None).await.unwrap().unwrap();
    assert_eq!(stored.population, Some(60_000));
}

#[tokio::test]
async fn update_ignores_failed_removal_of_old_document() {
    let flaky = Flaky::new();
    flaky
        .repo
        .create(populated(1, "Vaslui", "VS", 55_000))
        .await
        .unwrap();
    flaky.search.clear_operations();
    flaky.search.fail_delete(true);

    let updated = flaky
        .repo
        .update(PlaceUpdate::new(1u64).set(FieldValue::Population(60_000)))
        .await
        .unwrap();

    assert_eq!(updated.population, Some(60_000));
    assert_eq!(
        flaky.search.operations(),
        vec![
            SearchOp::Delete(PlaceId::new(1)),
            SearchOp::Index(PlaceId::new(1))
        ]
    );
}

#[tokio::test]
async fn delete_with_failing_search_is_partial() {
    let flaky = Flaky::new();
    flaky
        .repo
        .create(populated(1, "Vaslui", "VS", 55_000))
        .await
        .unwrap();
    flaky.search.fail_delete(true);

    let err = flaky.repo.delete(1u64).await.unwrap_err();

    assert_partial(&err, WriteOp::Delete, 1);
    assert!(!flaky.repo.exists(1u64).await.unwrap());
}

#[tokio::test]
async fn delete_of_missing_place_with_failing_search_is_unavailable() {
    let flaky = Flaky::new();
    flaky.search.fail_delete(true);

    let err = flaky.repo.delete(1u64).await.unwrap_err();
    assert_unavailable(&err, StoreKind::Search);
}

#[tokio::test]
async fn search_outage_on_read() {
    let flaky = Flaky::new();
    flaky.search.fail_search(true);

    let err = flaky
        .repo
        .search(&SearchQuery::new("vaslui", 5), None)
        .await
        .unwrap_err();
    assert_unavailable(&err, StoreKind::Search);
}

// ============================================================================
// Primary store failures
// ============================================================================

#[tokio::test]
async fn primary_failure_leaves_search_untouched() {
    init_tracing();
    let store = Arc::new(FailingStore::new(MemoryPlaceStore::new()));
    let search = Arc::new(FailingSearchIndex::new(MemorySearchIndex::new()));
    let repo = PlaceRepository::builder()
        .store(store.clone())
        .search(search.clone())
        .build()
        .unwrap();
    store.fail_writes(true);

    let err = repo
        .create(populated(1, "Vaslui", "VS", 55_000))
        .await
        .unwrap_err();
    assert_unavailable(&err, StoreKind::Primary);

    let err = repo.delete(1u64).await.unwrap_err();
    assert_unavailable(&err, StoreKind::Primary);

    assert!(search.operations().is_empty());
}

#[tokio::test]
async fn primary_read_failure_surfaces() {
    init_tracing();
    let store = Arc::new(FailingStore::new(MemoryPlaceStore::new()));
    let repo = PlaceRepository::builder()
        .store(store.clone())
        .build()
        .unwrap();
    store.fail_reads(true);

    let err = repo
        .get_places_in_admin1("ro", "VS", 10, None)
        .await
        .unwrap_err();
    assert_unavailable(&err, StoreKind::Primary);
}

// ============================================================================
// Deadlines
// ============================================================================

#[tokio::test]
async fn slow_search_on_create_is_partial() {
    let repo = slow_search_repo(Duration::from_millis(500), 20);

    let err = repo
        .create(populated(1, "Vaslui", "VS", 55_000))
        .await
        .unwrap_err();

    assert_partial(&err, WriteOp::Create, 1);
    assert!(err.to_string().contains("timed out"));
    assert!(repo.exists(1u64).await.unwrap());
}

#[tokio::test]
async fn slow_search_on_read_is_unavailable() {
    let repo = slow_search_repo(Duration::from_millis(500), 20);

    let err = repo
        .search(&SearchQuery::new("vaslui", 5), None)
        .await
        .unwrap_err();
    assert_unavailable(&err, StoreKind::Search);
}

#[tokio::test]
async fn search_within_deadline_succeeds() {
    let repo = slow_search_repo(Duration::from_millis(1), 2_000);

    repo.create(populated(1, "Vaslui", "VS", 55_000))
        .await
        .unwrap();
    let hits = repo
        .search(&SearchQuery::new("vaslui", 5), None)
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
}
