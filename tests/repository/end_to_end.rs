//! Full lifecycle through the public repository API

use crate::common::*;

#[tokio::test]
async fn place_and_admin1_lifecycle() {
    init_tracing();
    let repo = PlaceRepository::in_memory();

    repo.create(populated(1, "Vaslui", "VS", 500_000)).await.unwrap();
    repo.create(admin1_area(10, "Județul Vaslui", "VS")).await.unwrap();

    let places = repo.get_places_in_admin1("ro", "VS", 10, None).await.unwrap();
    let ids: Vec<PlaceId> = places.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![PlaceId::new(1)]);

    let area = repo.get_admin1("ro", "VS", None).await.unwrap().unwrap();
    assert_eq!(area.id, PlaceId::new(10));
    assert_eq!(area.feature_code.as_deref(), Some("ADM1"));

    let main: Vec<PlaceId> = repo
        .get_main_places("ro", 10, None)
        .await
        .unwrap()
        .iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(main, vec![PlaceId::new(1)]);

    let hits = repo
        .search(&SearchQuery::new("vaslui", 10).country("ro"), None)
        .await
        .unwrap();
    assert_eq!(hits.len(), 2);

    assert!(repo.delete(1u64).await.unwrap());
    assert!(repo
        .get_places_in_admin1("ro", "VS", 10, None)
        .await
        .unwrap()
        .is_empty());
    assert!(repo.get_main_places("ro", 10, None).await.unwrap().is_empty());
    let hits = repo
        .search(&SearchQuery::new("vaslui", 10), None)
        .await
        .unwrap();
    assert_eq!(hits.iter().map(|p| p.id).collect::<Vec<_>>(), vec![PlaceId::new(10)]);
}

#[tokio::test]
async fn clones_share_adapters() {
    init_tracing();
    let repo = PlaceRepository::in_memory();
    let clone = repo.clone();

    repo.create(populated(1, "Vaslui", "VS", 55_000)).await.unwrap();
    assert!(clone.exists(1u64).await.unwrap());
}

#[tokio::test]
async fn concurrent_creates_all_land() {
    init_tracing();
    let repo = PlaceRepository::in_memory();

    let handles: Vec<_> = bulk_places(1, 50, "VS")
        .into_iter()
        .map(|place| {
            let repo = repo.clone();
            tokio::spawn(async move { repo.create(place).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let places = repo.get_places_in_admin1("ro", "VS", 100, None).await.unwrap();
    assert_eq!(places.len(), 50);
    assert_eq!(places[0].population, Some(50));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_updates_keep_keys_in_step_with_fields() {
    let Recorded { repo, store } = Recorded::new(RepositoryConfig {
        update_retries: 50,
        ..RepositoryConfig::default()
    });
    repo.create(populated(1, "Vaslui", "VS", 55_000)).await.unwrap();

    let handles: Vec<_> = (0..24u64)
        .map(|i| {
            let repo = repo.clone();
            tokio::spawn(async move {
                let update = if i % 2 == 0 {
                    PlaceUpdate::new(1u64).remove(PlaceField::Admin1Code)
                } else {
                    PlaceUpdate::new(1u64)
                        .set(FieldValue::Admin1Code("IS".to_string()))
                        .set(FieldValue::Population(60_000 + i))
                };
                repo.update(update).await
            })
        })
        .collect();
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) | Err(PlaceError::Conflict { .. }) => {}
            Err(other) => panic!("unexpected error: {}", other),
        }
    }

    let stored = store.inner().record(PlaceId::new(1)).unwrap();
    assert_eq!(stored.keys, derive_keys(&stored.place, &MainPlacePolicy::default()));
    assert!(repo
        .get_places_in_admin1("ro", "VS", 10, None)
        .await
        .unwrap()
        .is_empty());
    let listed = repo.get_places_in_admin1("ro", "IS", 10, None).await.unwrap();
    assert_eq!(listed.len(), usize::from(stored.place.admin1_code.is_some()));
}
