//! Create, update, delete and reindex against healthy stores

use crate::common::*;

fn search_for(query: &str) -> SearchQuery {
    SearchQuery::new(query, 10).country("ro")
}

async fn search_ids(repo: &PlaceRepository, query: &str) -> Vec<PlaceId> {
    repo.search(&search_for(query), None)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect()
}

// ============================================================================
// Create
// ============================================================================

#[tokio::test]
async fn create_stamps_missing_updated_at() {
    init_tracing();
    let repo = PlaceRepository::in_memory();

    let created = repo.create(populated(1, "Vaslui", "VS", 55_000)).await.unwrap();
    assert!(created.updated_at.unwrap() > 0);
}

#[tokio::test]
async fn create_keeps_caller_updated_at() {
    init_tracing();
    let repo = PlaceRepository::in_memory();
    let mut place = populated(1, "Vaslui", "VS", 55_000);
    place.updated_at = Some(1_600_000_000);

    let created = repo.create(place).await.unwrap();
    assert_eq!(created.updated_at, Some(1_600_000_000));
}

#[tokio::test]
async fn create_indexes_for_search() {
    init_tracing();
    let repo = PlaceRepository::in_memory();
    repo.create(populated(1, "Bârlad", "VS", 55_000)).await.unwrap();

    assert_eq!(search_ids(&repo, "barlad").await, vec![PlaceId::new(1)]);
}

#[tokio::test]
async fn create_rejects_taken_id() {
    init_tracing();
    let repo = PlaceRepository::in_memory();
    repo.create(populated(1, "Vaslui", "VS", 55_000)).await.unwrap();

    let err = repo
        .create(populated(1, "Huși", "VS", 26_000))
        .await
        .unwrap_err();
    assert!(matches!(err, PlaceError::AlreadyExists { id } if id == PlaceId::new(1)));

    let stored = repo.get_by_id(1u64, None).await.unwrap().unwrap();
    assert_eq!(stored.name.as_deref(), Some("Vaslui"));
}

#[tokio::test]
async fn create_rejects_missing_required_field() {
    init_tracing();
    let repo = PlaceRepository::in_memory();
    let mut place = populated(1, "Vaslui", "VS", 55_000);
    place.latitude = None;

    let err = repo.create(place).await.unwrap_err();
    assert!(matches!(err, PlaceError::Validation { ref field, .. } if field == "latitude"));
    assert!(!repo.exists(1u64).await.unwrap());
}

// ============================================================================
// Update
// ============================================================================

#[tokio::test]
async fn clearing_admin1_drops_place_from_admin1_scan() {
    init_tracing();
    let repo = PlaceRepository::in_memory();
    repo.create(populated(1, "Vaslui", "VS", 55_000)).await.unwrap();
    repo.create(populated(2, "Bârlad", "VS", 54_000)).await.unwrap();

    repo.update(PlaceUpdate::new(1u64).remove(PlaceField::Admin1Code))
        .await
        .unwrap();

    let ids: Vec<PlaceId> = repo
        .get_places_in_admin1("ro", "VS", 10, None)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(ids, vec![PlaceId::new(2)]);
}

#[tokio::test]
async fn moving_admin1_moves_place_between_scans() {
    init_tracing();
    let repo = PlaceRepository::in_memory();
    repo.create(populated(1, "Vaslui", "VS", 55_000)).await.unwrap();

    repo.update(PlaceUpdate::new(1u64).set(FieldValue::Admin1Code("IS".to_string())))
        .await
        .unwrap();

    assert!(repo
        .get_places_in_admin1("ro", "VS", 10, None)
        .await
        .unwrap()
        .is_empty());
    assert_eq!(
        repo.get_places_in_admin1("ro", "IS", 10, None)
            .await
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
async fn update_returns_merged_place() {
    init_tracing();
    let repo = PlaceRepository::in_memory();
    repo.create(populated(1, "Vaslui", "VS", 55_000)).await.unwrap();

    let updated = repo
        .update(
            PlaceUpdate::new(1u64)
                .set(FieldValue::Population(60_000))
                .remove(PlaceField::Timezone),
        )
        .await
        .unwrap();

    assert_eq!(updated.population, Some(60_000));
    assert_eq!(updated.timezone, None);
    assert_eq!(updated.name.as_deref(), Some("Vaslui"));
    assert_eq!(repo.get_by_id(1u64, None).await.unwrap(), Some(updated));
}

#[tokio::test]
async fn update_replaces_search_document() {
    init_tracing();
    let repo = PlaceRepository::in_memory();
    repo.create(populated(1, "Vaslui", "VS", 55_000)).await.unwrap();

    repo.update(
        PlaceUpdate::new(1u64)
            .set(FieldValue::Name("Negrești".to_string()))
            .set(FieldValue::AsciiName("Negresti".to_string())),
    )
    .await
    .unwrap();

    assert!(search_ids(&repo, "vaslui").await.is_empty());
    assert_eq!(search_ids(&repo, "negresti").await, vec![PlaceId::new(1)]);
}

#[tokio::test]
async fn update_timestamp_never_moves_backwards() {
    init_tracing();
    let repo = PlaceRepository::in_memory();
    let mut place = populated(1, "Vaslui", "VS", 55_000);
    place.updated_at = Some(4_000_000_000);
    repo.create(place).await.unwrap();

    let updated = repo
        .update(
            PlaceUpdate::new(1u64)
                .set(FieldValue::Population(1))
                .set(FieldValue::UpdatedAt(7)),
        )
        .await
        .unwrap();
    assert_eq!(updated.updated_at, Some(4_000_000_000));
}

#[tokio::test]
async fn update_of_missing_place_is_not_found() {
    init_tracing();
    let repo = PlaceRepository::in_memory();

    let err = repo
        .update(PlaceUpdate::new(9u64).set(FieldValue::Population(1)))
        .await
        .unwrap_err();
    assert!(matches!(err, PlaceError::NotFound { id } if id == PlaceId::new(9)));
}

#[tokio::test]
async fn update_rejects_empty_and_required_removal() {
    init_tracing();
    let repo = PlaceRepository::in_memory();
    repo.create(populated(1, "Vaslui", "VS", 55_000)).await.unwrap();

    let err = repo.update(PlaceUpdate::new(1u64)).await.unwrap_err();
    assert_eq!(err.error_code(), "ValidationError");

    let err = repo
        .update(PlaceUpdate::new(1u64).remove(PlaceField::Name))
        .await
        .unwrap_err();
    assert!(matches!(err, PlaceError::Validation { ref field, .. } if field == "name"));
}

#[tokio::test]
async fn update_rederives_keys_after_concurrent_change() {
    let (repo, store) = interleaved_repo(RepositoryConfig::default());
    repo.create(populated(1, "Vaslui", "VS", 55_000)).await.unwrap();
    store
        .interleave(PlaceUpdate::new(1u64).remove(PlaceField::Admin1Code))
        .await;

    let updated = repo
        .update(PlaceUpdate::new(1u64).set(FieldValue::Population(60_000)))
        .await
        .unwrap();
    assert_eq!(updated.admin1_code, None);
    assert_eq!(updated.population, Some(60_000));

    let stored = store.inner().record(PlaceId::new(1)).unwrap();
    assert_eq!(stored.keys, derive_keys(&stored.place, &MainPlacePolicy::default()));
    assert!(stored.keys.key_in_admin1.is_none());
    assert_eq!(store.inner().partition_len(IndexName::InAdmin1, "RO.VS"), 0);
    assert!(repo
        .get_places_in_admin1("ro", "VS", 10, None)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn update_fails_when_place_keeps_changing() {
    let config = RepositoryConfig {
        update_retries: 1,
        ..RepositoryConfig::default()
    };
    let (repo, store) = interleaved_repo(config);
    repo.create(populated(1, "Vaslui", "VS", 55_000)).await.unwrap();
    for population in [56_000, 57_000] {
        store
            .interleave(PlaceUpdate::new(1u64).set(FieldValue::Population(population)))
            .await;
    }

    let err = repo
        .update(PlaceUpdate::new(1u64).set(FieldValue::Admin1Code("IS".to_string())))
        .await
        .unwrap_err();
    assert!(matches!(err, PlaceError::Conflict { id } if id == PlaceId::new(1)));
    assert_eq!(err.error_code(), "Conflict");

    let stored = store.inner().record(PlaceId::new(1)).unwrap();
    assert_eq!(stored.place.admin1_code.as_deref(), Some("VS"));
    assert_eq!(stored.place.population, Some(57_000));
    assert_eq!(stored.keys, derive_keys(&stored.place, &MainPlacePolicy::default()));
}

#[tokio::test]
async fn update_without_key_fields_keeps_concurrent_key_change() {
    let (repo, store) = interleaved_repo(RepositoryConfig::default());
    repo.create(populated(1, "Vaslui", "VS", 55_000)).await.unwrap();
    store
        .interleave(PlaceUpdate::new(1u64).set(FieldValue::Admin1Code("IS".to_string())))
        .await;

    let updated = repo
        .update(PlaceUpdate::new(1u64).set(FieldValue::Timezone("Europe/Chisinau".to_string())))
        .await
        .unwrap();
    assert_eq!(updated.admin1_code.as_deref(), Some("IS"));
    assert_eq!(updated.timezone.as_deref(), Some("Europe/Chisinau"));

    let stored = store.inner().record(PlaceId::new(1)).unwrap();
    assert_eq!(stored.keys.key_in_admin1.as_deref(), Some("RO.IS"));
    assert_eq!(store.inner().partition_len(IndexName::InAdmin1, "RO.IS"), 1);
    assert_eq!(store.inner().partition_len(IndexName::InAdmin1, "RO.VS"), 0);
}

// ============================================================================
// Delete
// ============================================================================

#[tokio::test]
async fn delete_missing_id_returns_false() {
    init_tracing();
    let repo = PlaceRepository::in_memory();

    assert!(!repo.delete(42u64).await.unwrap());
}

#[tokio::test]
async fn delete_removes_from_both_stores() {
    init_tracing();
    let repo = PlaceRepository::in_memory();
    repo.create(populated(1, "Vaslui", "VS", 55_000)).await.unwrap();

    assert!(repo.delete(1u64).await.unwrap());
    assert_eq!(repo.get_by_id(1u64, None).await.unwrap(), None);
    assert!(search_ids(&repo, "vaslui").await.is_empty());
    assert!(repo
        .get_places_in_admin1("ro", "VS", 10, None)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn delete_rejects_non_positive_id() {
    init_tracing();
    let repo = PlaceRepository::in_memory();

    let err = repo.delete(0u64).await.unwrap_err();
    assert!(matches!(err, PlaceError::Validation { .. }));
}

// ============================================================================
// Reindex
// ============================================================================

#[tokio::test]
async fn reindex_reports_presence() {
    init_tracing();
    let repo = PlaceRepository::in_memory();
    repo.create(populated(1, "Vaslui", "VS", 55_000)).await.unwrap();

    assert!(repo.reindex(1u64).await.unwrap());
    assert!(!repo.reindex(2u64).await.unwrap());
    assert_eq!(search_ids(&repo, "vaslui").await, vec![PlaceId::new(1)]);
}
