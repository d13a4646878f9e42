//! Search infrastructure for places
//!
//! This crate provides:
//! - Folding tokenizer (case and diacritics insensitive)
//! - InvertedIndex with field-tagged posting lists
//! - MemorySearchIndex: the in-process `SearchIndex` adapter with
//!   best-fields and phrase-prefix matching and a country filter
//! - FailingSearchIndex test double under [`testing`]
//!
//! # Usage
//!
//! ```ignore
//! use geoplaces_core::{SearchIndex, SearchQuery};
//! use geoplaces_search::MemorySearchIndex;
//!
//! let index = MemorySearchIndex::new();
//! let ids = index.search(&SearchQuery::new("iasi", 10).country("ro")).await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod index;
pub mod memory;
pub mod testing;
pub mod tokenizer;

pub use index::{InvertedIndex, PostingEntry, PostingList};
pub use memory::MemorySearchIndex;
pub use testing::{FailingSearchIndex, SearchOp};
pub use tokenizer::{tokenize, tokenize_unique};
