//! Inverted index over search document fields
//!
//! This module provides:
//! - InvertedIndex with per-term posting lists
//! - Field-tagged postings so matches can be attributed to a field
//! - Per-document term tracking for targeted removal
//!
//! The index holds ids and field tags only; document text lives with the
//! owning adapter.

use crate::tokenizer::tokenize;
use dashmap::DashMap;
use geoplaces_core::{PlaceId, SearchDocument, SearchField};
use std::collections::{BTreeSet, HashSet};

// ============================================================================
// PostingEntry
// ============================================================================

/// Entry in a posting list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostingEntry {
    /// Document id
    pub id: PlaceId,
    /// Field the term occurred in
    pub field: SearchField,
}

// ============================================================================
// PostingList
// ============================================================================

/// List of documents containing a term
#[derive(Debug, Clone, Default)]
pub struct PostingList {
    /// Document entries
    pub entries: Vec<PostingEntry>,
}

impl PostingList {
    /// Create a new empty posting list
    pub fn new() -> Self {
        PostingList { entries: vec![] }
    }

    /// Add an entry to the posting list
    pub fn add(&mut self, entry: PostingEntry) {
        self.entries.push(entry);
    }

    /// Remove all entries of a document
    pub fn remove(&mut self, id: PlaceId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        before - self.entries.len()
    }

    /// Distinct document ids in this list
    pub fn ids(&self) -> BTreeSet<PlaceId> {
        self.entries.iter().map(|e| e.id).collect()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if posting list is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// InvertedIndex
// ============================================================================

/// Inverted index for term lookup
///
/// # Thread Safety
///
/// Uses DashMap for concurrent access. Callers that need a document's
/// postings to change atomically with other state serialize writes
/// themselves.
pub struct InvertedIndex {
    /// Term -> PostingList mapping
    postings: DashMap<String, PostingList>,

    /// Document -> its distinct terms, for removal without a full scan
    doc_terms: DashMap<PlaceId, Vec<String>>,
}

impl Default for InvertedIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl InvertedIndex {
    /// Create a new empty index
    pub fn new() -> Self {
        InvertedIndex {
            postings: DashMap::new(),
            doc_terms: DashMap::new(),
        }
    }

    /// Whether a document is indexed
    pub fn contains(&self, id: PlaceId) -> bool {
        self.doc_terms.contains_key(&id)
    }

    // ========================================================================
    // Index Updates
    // ========================================================================

    /// Index every text field of a document
    ///
    /// A document already indexed under the same id is replaced.
    pub fn index_document(&self, doc: &SearchDocument) {
        if self.contains(doc.id) {
            self.remove_document(doc.id);
        }

        let mut occurrences: HashSet<(String, SearchField)> = HashSet::new();
        for (field, text) in doc.fields() {
            for token in tokenize(text) {
                occurrences.insert((token, field));
            }
        }

        let mut terms: Vec<String> = Vec::with_capacity(occurrences.len());
        for (term, field) in occurrences {
            self.postings
                .entry(term.clone())
                .or_default()
                .add(PostingEntry { id: doc.id, field });
            terms.push(term);
        }
        terms.sort();
        terms.dedup();

        self.doc_terms.insert(doc.id, terms);
    }

    /// Remove a document, returning whether it was indexed
    pub fn remove_document(&self, id: PlaceId) -> bool {
        let Some((_, terms)) = self.doc_terms.remove(&id) else {
            return false;
        };

        for term in terms {
            let now_empty = match self.postings.get_mut(&term) {
                Some(mut list) => {
                    list.remove(id);
                    list.is_empty()
                }
                None => false,
            };
            if now_empty {
                self.postings.remove_if(&term, |_, list| list.is_empty());
            }
        }
        true
    }

    // ========================================================================
    // Query
    // ========================================================================

    /// Documents containing a term
    pub fn lookup(&self, term: &str) -> Option<PostingList> {
        self.postings.get(term).map(|r| r.clone())
    }

    /// Documents containing any term that starts with `prefix`
    pub fn lookup_prefix(&self, prefix: &str) -> BTreeSet<PlaceId> {
        self.postings
            .iter()
            .filter(|r| r.key().starts_with(prefix))
            .flat_map(|r| r.value().ids())
            .collect()
    }

    /// Get all terms in the index
    pub fn terms(&self) -> Vec<String> {
        self.postings.iter().map(|r| r.key().clone()).collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
