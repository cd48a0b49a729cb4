//! The doc id cursor contract shared by every producer of document ids.

use std::fmt::Debug;

/// A document identifier: a position in the corpus-wide ordered document list.
pub type DocId = u32;

/// Exhaustion sentinel returned once a cursor has no more documents.
///
/// Never a valid document id.
pub const NO_MORE_DOCS: DocId = DocId::MAX;

/// A forward-only cursor over strictly increasing document ids.
///
/// A cursor starts unpositioned ([`doc_id`](Self::doc_id) is `None`), moves
/// forward through [`next_doc`](Self::next_doc) and
/// [`advance`](Self::advance), and ends at [`NO_MORE_DOCS`]. Once exhausted it
/// stays exhausted. Cursors are single pass and cannot be restarted.
///
/// Ids are emitted in strictly increasing order. Producers that emit
/// duplicates or decreasing ids are defective; consumers do not guard
/// against it.
pub trait DocIdSetIterator: Debug {
    /// Get the current position.
    ///
    /// `None` before the first call to `next_doc`/`advance`,
    /// `Some(NO_MORE_DOCS)` once exhausted.
    fn doc_id(&self) -> Option<DocId>;

    /// Move to the next document and return its id, or [`NO_MORE_DOCS`].
    fn next_doc(&mut self) -> DocId;

    /// Move to the first document whose id is `>= target`.
    ///
    /// Callers must not move backwards: `target` has to be at least the
    /// current position. A violating call trips a `debug_assert!`; in release
    /// builds `advance` always moves at least one document forward, so
    /// `advance(current)` behaves like `next_doc()`.
    ///
    /// The default implementation scans with `next_doc`. Producers with skip
    /// structures override it.
    fn advance(&mut self, target: DocId) -> DocId {
        check_advance_target(self.doc_id(), target);
        let mut doc = self.next_doc();
        while doc < target {
            doc = self.next_doc();
        }
        doc
    }

    /// Estimated number of documents this cursor yields.
    fn cost(&self) -> u64;

    /// Whether the cursor has reached [`NO_MORE_DOCS`].
    fn is_exhausted(&self) -> bool {
        self.doc_id() == Some(NO_MORE_DOCS)
    }

    /// Adapt this cursor into a std [`Iterator`] over the remaining ids.
    fn into_doc_ids(self) -> DocIds<Self>
    where
        Self: Sized,
    {
        DocIds { inner: self }
    }
}

/// Debug-build guard for backward `advance` requests.
///
/// `target == current` is allowed and means "the next document".
#[inline]
pub(crate) fn check_advance_target(current: Option<DocId>, target: DocId) {
    if let Some(current) = current {
        debug_assert!(
            current == NO_MORE_DOCS || target >= current,
            "advance({target}) would move backwards from {current}"
        );
    }
}

/// The smallest target an `advance` call may land on, given the current
/// position: never the current document again.
#[inline]
pub(crate) fn forward_target(current: Option<DocId>, target: DocId) -> DocId {
    match current {
        Some(current) if target <= current => current.saturating_add(1),
        _ => target,
    }
}

impl<I: DocIdSetIterator + ?Sized> DocIdSetIterator for &mut I {
    fn doc_id(&self) -> Option<DocId> {
        (**self).doc_id()
    }

    fn next_doc(&mut self) -> DocId {
        (**self).next_doc()
    }

    fn advance(&mut self, target: DocId) -> DocId {
        (**self).advance(target)
    }

    fn cost(&self) -> u64 {
        (**self).cost()
    }
}

impl<I: DocIdSetIterator + ?Sized> DocIdSetIterator for Box<I> {
    fn doc_id(&self) -> Option<DocId> {
        (**self).doc_id()
    }

    fn next_doc(&mut self) -> DocId {
        (**self).next_doc()
    }

    fn advance(&mut self, target: DocId) -> DocId {
        (**self).advance(target)
    }

    fn cost(&self) -> u64 {
        (**self).cost()
    }
}

/// A set of documents that can hand out fresh cursors over its members.
pub trait DocIdSet {
    /// Cursor type produced by this set.
    type Iter<'a>: DocIdSetIterator
    where
        Self: 'a;

    /// Create a new cursor positioned before the first member.
    fn iterator(&self) -> Self::Iter<'_>;
}

/// Std [`Iterator`] adapter over a [`DocIdSetIterator`].
#[derive(Debug)]
pub struct DocIds<I> {
    inner: I,
}

impl<I> DocIds<I> {
    /// Give back the wrapped cursor.
    pub fn into_inner(self) -> I {
        self.inner
    }
}

impl<I: DocIdSetIterator> Iterator for DocIds<I> {
    type Item = DocId;

    fn next(&mut self) -> Option<DocId> {
        match self.inner.next_doc() {
            NO_MORE_DOCS => None,
            doc => Some(doc),
        }
    }
}
