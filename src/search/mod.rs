//! Doc id cursors: the shared contract and the basic producers.

pub mod boolean;
pub mod doc_id_set_iterator;
pub mod iterators;

// Re-export commonly used types
pub use boolean::{ConjunctionIterator, DisjunctionIterator};
pub use doc_id_set_iterator::{DocId, DocIdSet, DocIdSetIterator, DocIds, NO_MORE_DOCS};
pub use iterators::{AllDocsIterator, EmptyDocIdSetIterator, SortedDocIdIterator, SortedDocIdSet};
