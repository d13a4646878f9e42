//! MemorySearchIndex: in-process search adapter
//!
//! Matching model:
//!
//! | Match type | A document matches when | Ranking |
//! |------------|-------------------------|---------|
//! | `BestFields` | any query term occurs in any field | distinct query terms matched, desc |
//! | `PhrasePrefix` | one field value holds the query terms consecutively, last term as prefix | best field (`name` first) |
//!
//! Ties are broken by ascending id, so results are deterministic. The
//! country filter is case-insensitive.

use std::cmp::Reverse;
use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::debug;

use geoplaces_core::{
    MatchType, PlaceId, PlaceResult, SearchDocument, SearchField, SearchIndex, SearchQuery,
};

use crate::index::InvertedIndex;
use crate::tokenizer::{tokenize, tokenize_unique};

/// In-memory search adapter
#[derive(Default)]
pub struct MemorySearchIndex {
    documents: DashMap<PlaceId, SearchDocument>,
    inverted: InvertedIndex,
    /// Serializes writers so a document and its postings change together
    write_lock: Mutex<()>,
}

impl MemorySearchIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored document by id
    pub fn document(&self, id: PlaceId) -> Option<SearchDocument> {
        self.documents.get(&id).map(|d| d.clone())
    }

    /// Number of indexed documents
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn country_matches(&self, id: PlaceId, country: Option<&str>) -> bool {
        match country {
            None => true,
            Some(country) => self
                .documents
                .get(&id)
                .map_or(false, |d| d.country_code.eq_ignore_ascii_case(country.trim())),
        }
    }

    fn best_fields(&self, query: &SearchQuery) -> Vec<PlaceId> {
        let mut scores: HashMap<PlaceId, usize> = HashMap::new();
        for term in tokenize_unique(&query.query) {
            if let Some(postings) = self.inverted.lookup(&term) {
                for id in postings.ids() {
                    *scores.entry(id).or_insert(0) += 1;
                }
            }
        }

        let mut ranked: Vec<(PlaceId, usize)> = scores
            .into_iter()
            .filter(|(id, _)| self.country_matches(*id, query.country.as_deref()))
            .collect();
        ranked.sort_by_key(|(id, score)| (Reverse(*score), *id));
        ranked.into_iter().map(|(id, _)| id).collect()
    }

    fn phrase_prefix(&self, query: &SearchQuery) -> Vec<PlaceId> {
        let terms = tokenize(&query.query);
        let Some((last, head)) = terms.split_last() else {
            return Vec::new();
        };

        // Candidates must hold every full term and a term extending the last
        let mut candidates: BTreeSet<PlaceId> = self.inverted.lookup_prefix(last);
        for term in head {
            let ids = self
                .inverted
                .lookup(term)
                .map(|p| p.ids())
                .unwrap_or_default();
            candidates.retain(|id| ids.contains(id));
        }

        let mut ranked: Vec<(SearchField, PlaceId)> = candidates
            .into_iter()
            .filter(|id| self.country_matches(*id, query.country.as_deref()))
            .filter_map(|id| {
                let doc = self.documents.get(&id)?;
                let best = doc
                    .fields()
                    .into_iter()
                    .filter(|(_, text)| is_phrase_prefix(&tokenize(text), head, last))
                    .map(|(field, _)| field)
                    .min();
                best.map(|field| (field, id))
            })
            .collect();
        ranked.sort();
        ranked.into_iter().map(|(_, id)| id).collect()
    }
}

/// Whether `tokens` contains `head` followed by a token starting with `last`
fn is_phrase_prefix(tokens: &[String], head: &[String], last: &str) -> bool {
    let run = head.len() + 1;
    tokens.windows(run).any(|window| {
        window[..head.len()] == *head && window[head.len()].starts_with(last)
    })
}

#[async_trait]
impl SearchIndex for MemorySearchIndex {
    async fn index(&self, document: &SearchDocument) -> PlaceResult<()> {
        let _guard = self.write_lock.lock();
        self.inverted.index_document(document);
        self.documents.insert(document.id, document.clone());
        Ok(())
    }

    async fn delete(&self, id: PlaceId) -> PlaceResult<bool> {
        let _guard = self.write_lock.lock();
        self.inverted.remove_document(id);
        Ok(self.documents.remove(&id).is_some())
    }

    async fn search(&self, query: &SearchQuery) -> PlaceResult<Vec<PlaceId>> {
        let mut ids = match query.match_type {
            MatchType::BestFields => self.best_fields(query),
            MatchType::PhrasePrefix => self.phrase_prefix(query),
        };
        ids.truncate(query.limit);
        debug!(
            query = %query.query,
            match_type = ?query.match_type,
            hits = ids.len(),
            "Search executed"
        );
        Ok(ids)
    }
}
