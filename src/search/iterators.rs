//! Basic cursor implementations: empty, match-all and sorted id lists.

use crate::error::{DocSetError, Result};
use crate::search::doc_id_set_iterator::{
    DocId, DocIdSet, DocIdSetIterator, NO_MORE_DOCS, check_advance_target, forward_target,
};

/// A cursor that matches no documents.
#[derive(Debug, Default)]
pub struct EmptyDocIdSetIterator {
    started: bool,
}

impl EmptyDocIdSetIterator {
    /// Create a new empty cursor.
    pub fn new() -> Self {
        EmptyDocIdSetIterator { started: false }
    }
}

impl DocIdSetIterator for EmptyDocIdSetIterator {
    fn doc_id(&self) -> Option<DocId> {
        self.started.then_some(NO_MORE_DOCS)
    }

    fn next_doc(&mut self) -> DocId {
        self.started = true;
        NO_MORE_DOCS
    }

    fn advance(&mut self, _target: DocId) -> DocId {
        self.started = true;
        NO_MORE_DOCS
    }

    fn cost(&self) -> u64 {
        0
    }
}

/// A cursor that matches every document in `[0, max_doc)`.
#[derive(Debug)]
pub struct AllDocsIterator {
    current: Option<DocId>,
    max_doc: DocId,
}

impl AllDocsIterator {
    /// Create a new match-all cursor.
    ///
    /// `max_doc` is capped at [`NO_MORE_DOCS`], which is never a valid id.
    pub fn new(max_doc: DocId) -> Self {
        AllDocsIterator {
            current: None,
            max_doc,
        }
    }

    fn position(&mut self, doc: DocId) -> DocId {
        let doc = if doc >= self.max_doc { NO_MORE_DOCS } else { doc };
        self.current = Some(doc);
        doc
    }
}

impl DocIdSetIterator for AllDocsIterator {
    fn doc_id(&self) -> Option<DocId> {
        self.current
    }

    fn next_doc(&mut self) -> DocId {
        match self.current {
            None => self.position(0),
            Some(NO_MORE_DOCS) => NO_MORE_DOCS,
            Some(doc) => self.position(doc + 1),
        }
    }

    fn advance(&mut self, target: DocId) -> DocId {
        check_advance_target(self.current, target);
        if self.current == Some(NO_MORE_DOCS) {
            return NO_MORE_DOCS;
        }
        let target = forward_target(self.current, target);
        self.position(target)
    }

    fn cost(&self) -> u64 {
        self.max_doc as u64
    }
}

/// An immutable, strictly ascending list of document ids.
///
/// Stands in for an in-memory posting list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortedDocIdSet {
    docs: Vec<DocId>,
}

impl SortedDocIdSet {
    /// Create a set from ids that are already strictly ascending.
    pub fn new(docs: Vec<DocId>) -> Result<Self> {
        validate_sorted(&docs)?;
        Ok(SortedDocIdSet { docs })
    }

    /// Create a set from arbitrary ids, sorting and dropping duplicates.
    pub fn from_unsorted(mut docs: Vec<DocId>) -> Result<Self> {
        docs.sort_unstable();
        docs.dedup();
        validate_sorted(&docs)?;
        Ok(SortedDocIdSet { docs })
    }

    /// Number of ids in the set.
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    /// Whether the set has no ids.
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// The ids as a slice.
    pub fn as_slice(&self) -> &[DocId] {
        &self.docs
    }
}

impl DocIdSet for SortedDocIdSet {
    type Iter<'a> = SortedDocIdIterator<'a>;

    fn iterator(&self) -> SortedDocIdIterator<'_> {
        SortedDocIdIterator::new(&self.docs)
    }
}

fn validate_sorted(docs: &[DocId]) -> Result<()> {
    if let Some(pair) = docs.windows(2).find(|w| w[0] >= w[1]) {
        return Err(DocSetError::invalid_argument(format!(
            "doc ids must be strictly ascending, found {} before {}",
            pair[0], pair[1]
        )));
    }
    if docs.last() == Some(&NO_MORE_DOCS) {
        return Err(DocSetError::invalid_argument(
            "doc id collides with the exhaustion sentinel",
        ));
    }
    Ok(())
}

/// A cursor over a strictly ascending slice of ids.
///
/// `advance` gallops from the current position then binary searches the
/// bracketed window, so skipping `k` entries costs `O(log k)`.
#[derive(Debug)]
pub struct SortedDocIdIterator<'a> {
    docs: &'a [DocId],
    /// Index of the current entry; `None` before the first call.
    index: Option<usize>,
}

impl<'a> SortedDocIdIterator<'a> {
    /// Create a cursor over `docs`, which must be strictly ascending.
    ///
    /// Order is not re-checked here; use [`SortedDocIdSet`] to validate.
    pub fn new(docs: &'a [DocId]) -> Self {
        SortedDocIdIterator { docs, index: None }
    }

    fn current_at(&self, index: usize) -> DocId {
        self.docs.get(index).copied().unwrap_or(NO_MORE_DOCS)
    }
}

impl DocIdSetIterator for SortedDocIdIterator<'_> {
    fn doc_id(&self) -> Option<DocId> {
        self.index.map(|i| self.current_at(i))
    }

    fn next_doc(&mut self) -> DocId {
        let next = match self.index {
            None => 0,
            Some(i) => (i + 1).min(self.docs.len()),
        };
        self.index = Some(next);
        self.current_at(next)
    }

    fn advance(&mut self, target: DocId) -> DocId {
        check_advance_target(self.doc_id(), target);
        let target = forward_target(self.doc_id(), target);
        let start = match self.index {
            None => 0,
            Some(i) => (i + 1).min(self.docs.len()),
        };

        // Gallop to bracket the target, then binary search inside the bracket.
        let remaining = &self.docs[start..];
        let mut bound = 1;
        while bound < remaining.len() && remaining[bound] < target {
            bound *= 2;
        }
        let lo = bound / 2;
        let hi = (bound + 1).min(remaining.len());
        let offset = lo + remaining[lo.min(hi)..hi].partition_point(|&d| d < target);

        let next = start + offset;
        self.index = Some(next);
        self.current_at(next)
    }

    fn cost(&self) -> u64 {
        self.docs.len() as u64
    }
}
