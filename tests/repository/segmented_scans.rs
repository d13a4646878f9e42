//! Index scans larger than one store page

use crate::common::*;

async fn seed(repo: &PlaceRepository, places: Vec<Place>) {
    for place in places {
        repo.create(place).await.unwrap();
    }
}

// ============================================================================
// Page requests
// ============================================================================

#[tokio::test]
async fn limit_250_issues_three_pages_on_large_partition() {
    let recorded = Recorded::new(RepositoryConfig::default());
    seed(&recorded.repo, bulk_places(1, 300, "VS")).await;
    recorded.store.reset();

    let places = recorded
        .repo
        .get_places_in_admin1("ro", "VS", 250, None)
        .await
        .unwrap();

    assert_eq!(recorded.store.page_limits(), vec![100, 100, 50]);
    assert_eq!(places.len(), 250);
}

#[tokio::test]
async fn short_partition_stops_after_first_short_page() {
    let recorded = Recorded::new(RepositoryConfig::default());
    seed(&recorded.repo, bulk_places(1, 120, "VS")).await;
    recorded.store.reset();

    let places = recorded
        .repo
        .get_places_in_admin1("ro", "VS", 250, None)
        .await
        .unwrap();

    assert_eq!(recorded.store.page_limits(), vec![100, 100]);
    assert_eq!(places.len(), 120);
}

#[tokio::test]
async fn scan_follows_cursor_without_repeats() {
    let recorded = Recorded::new(RepositoryConfig::default());
    seed(&recorded.repo, bulk_places(1, 300, "VS")).await;

    let places = recorded
        .repo
        .get_places_in_admin1("ro", "VS", 250, None)
        .await
        .unwrap();

    let populations: Vec<u64> = places.iter().filter_map(|p| p.population).collect();
    let expected: Vec<u64> = (51..=300).rev().collect();
    assert_eq!(populations, expected);

    let requests = recorded.store.index_requests();
    assert!(requests[0].cursor.is_none());
    assert!(requests[1..].iter().all(|q| q.cursor.is_some()));
}

#[tokio::test]
async fn store_page_cap_below_segment_size_shrinks_pages() {
    let config = RepositoryConfig {
        memory_store: MemoryStoreConfig { max_page_size: 50 },
        ..RepositoryConfig::default()
    };
    let recorded = Recorded::new(config);
    seed(&recorded.repo, bulk_places(1, 300, "VS")).await;
    recorded.store.reset();

    let places = recorded
        .repo
        .get_places_in_admin1("ro", "VS", 250, None)
        .await
        .unwrap();

    assert_eq!(recorded.store.page_limits(), vec![50, 50, 50, 50, 50]);
    assert_eq!(places.len(), 250);
    let populations: Vec<u64> = places.iter().filter_map(|p| p.population).collect();
    assert_eq!(populations, (51..=300).rev().collect::<Vec<u64>>());
}

#[tokio::test]
async fn unbounded_limit_returns_whole_partition() {
    let recorded = Recorded::new(RepositoryConfig::default());
    seed(&recorded.repo, bulk_places(1, 120, "VS")).await;
    recorded.store.reset();

    let places = recorded
        .repo
        .get_places_in_admin1("ro", "VS", usize::MAX, None)
        .await
        .unwrap();

    assert_eq!(places.len(), 120);
    assert_eq!(recorded.store.page_limits(), vec![100, 100]);
    assert_eq!(recorded.store.batch_sizes(), vec![100, 20]);
}

#[tokio::test]
async fn unbounded_limit_on_admin1_listing() {
    let recorded = Recorded::new(RepositoryConfig::default());
    for (id, code) in [(10, "VS"), (11, "IS"), (12, "BC")] {
        recorded
            .repo
            .create(admin1_area(id, &format!("Județul {}", code), code))
            .await
            .unwrap();
    }

    let areas = recorded
        .repo
        .get_admin1s("ro", usize::MAX, None)
        .await
        .unwrap();
    let codes: Vec<&str> = areas.iter().filter_map(|a| a.admin1_code.as_deref()).collect();
    assert_eq!(codes, vec!["VS", "IS", "BC"]);
}

#[tokio::test]
async fn smaller_segments_are_configurable() {
    let config = RepositoryConfig {
        segment_size: 40,
        ..RepositoryConfig::default()
    };
    let recorded = Recorded::new(config);
    seed(&recorded.repo, bulk_places(1, 100, "VS")).await;
    recorded.store.reset();

    let places = recorded
        .repo
        .get_places_in_admin1("ro", "VS", 90, None)
        .await
        .unwrap();

    assert_eq!(recorded.store.page_limits(), vec![40, 40, 10]);
    assert_eq!(places.len(), 90);
}

// ============================================================================
// Batch fetches
// ============================================================================

#[tokio::test]
async fn resolved_ids_are_fetched_in_batches() {
    let recorded = Recorded::new(RepositoryConfig::default());
    seed(&recorded.repo, bulk_places(1, 300, "VS")).await;
    recorded.store.reset();

    recorded
        .repo
        .get_places_in_admin1("ro", "VS", 250, None)
        .await
        .unwrap();

    assert_eq!(recorded.store.batch_sizes(), vec![100, 100, 50]);
}

#[tokio::test]
async fn empty_partition_issues_one_request() {
    let recorded = Recorded::new(RepositoryConfig::default());
    seed(&recorded.repo, bulk_places(1, 10, "VS")).await;
    recorded.store.reset();

    let places = recorded
        .repo
        .get_places_in_admin1("ro", "IS", 250, None)
        .await
        .unwrap();

    assert!(places.is_empty());
    assert_eq!(recorded.store.page_limits(), vec![100]);
    assert!(recorded.store.batch_sizes().is_empty());
}
