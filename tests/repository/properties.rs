//! Properties of segmented scans through the public repository API

use crate::common::*;
use proptest::prelude::*;
use tokio::runtime::Runtime;

/// Populations returned for one scan of RO.VS, plus the page sizes requested
fn scan(count: u64, limit: usize, segment_size: usize, cap: usize) -> (Vec<u64>, Vec<usize>) {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let recorded = Recorded::new(RepositoryConfig {
            segment_size,
            memory_store: MemoryStoreConfig { max_page_size: cap },
            ..RepositoryConfig::default()
        });
        for place in bulk_places(1, count, "VS") {
            recorded.repo.create(place).await.unwrap();
        }
        recorded.store.reset();

        let places = recorded
            .repo
            .get_places_in_admin1("ro", "VS", limit, None)
            .await
            .unwrap();
        (
            places.iter().filter_map(|p| p.population).collect(),
            recorded.store.page_limits(),
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn scan_returns_largest_entries_in_order(
        count in 0u64..260,
        limit in 1usize..400,
        segment_size in 1usize..150,
        cap in 1usize..150,
    ) {
        let (populations, pages) = scan(count, limit, segment_size, cap);

        let expected: Vec<u64> = (1..=count).rev().take(limit).collect();
        prop_assert_eq!(populations, expected);

        let page_size = segment_size.min(cap);
        prop_assert!(pages.iter().all(|p| *p <= page_size));
        prop_assert!(pages.len() <= limit.div_ceil(page_size));
    }
}
