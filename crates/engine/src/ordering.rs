//! Restoring caller order after unordered batch fetches

use geoplaces_core::{Place, PlaceId};
use rustc_hash::{FxHashMap, FxHashSet};

/// Order `places` to follow `ids`
///
/// Ids without a matching place are skipped; places whose id was not
/// requested are dropped. Surviving entries keep the relative order of
/// `ids`.
pub fn sort_by_ids(ids: &[PlaceId], places: Vec<Place>) -> Vec<Place> {
    let mut by_id: FxHashMap<PlaceId, Place> = places.into_iter().map(|p| (p.id, p)).collect();
    ids.iter().filter_map(|id| by_id.remove(id)).collect()
}

/// Drop repeated ids, keeping first occurrences in order
pub fn dedup_ids(ids: &[PlaceId]) -> Vec<PlaceId> {
    let mut seen = FxHashSet::with_capacity_and_hasher(ids.len(), Default::default());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}
