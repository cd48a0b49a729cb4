//! Conjunction and disjunction cursors over boxed sub-cursors.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::search::doc_id_set_iterator::{
    DocId, DocIdSetIterator, NO_MORE_DOCS, check_advance_target, forward_target,
};

/// A cursor over the documents every sub-cursor matches.
///
/// Sub-cursors are leapfrogged with `advance`, led by the cheapest one.
#[derive(Debug)]
pub struct ConjunctionIterator {
    /// Sub-cursors ordered by ascending cost; the first one leads.
    iterators: Vec<Box<dyn DocIdSetIterator>>,
    current: Option<DocId>,
}

impl ConjunctionIterator {
    /// Create a conjunction. No sub-cursors means no matches.
    pub fn new(mut iterators: Vec<Box<dyn DocIdSetIterator>>) -> Self {
        iterators.sort_by_key(|it| it.cost());
        ConjunctionIterator {
            iterators,
            current: None,
        }
    }

    /// Align every sub-cursor on the smallest common doc `>= target`, where
    /// the lead already sits on `target`.
    fn align(&mut self, mut target: DocId) -> DocId {
        if let Some((lead, others)) = self.iterators.split_first_mut() {
            'outer: while target != NO_MORE_DOCS {
                for other in others.iter_mut() {
                    let doc = match other.doc_id() {
                        Some(doc) if doc >= target => doc,
                        _ => other.advance(target),
                    };
                    if doc > target {
                        target = lead.advance(doc);
                        continue 'outer;
                    }
                }
                break;
            }
        }
        self.current = Some(target);
        target
    }
}

impl DocIdSetIterator for ConjunctionIterator {
    fn doc_id(&self) -> Option<DocId> {
        self.current
    }

    fn next_doc(&mut self) -> DocId {
        if self.current == Some(NO_MORE_DOCS) {
            return NO_MORE_DOCS;
        }
        let Some(lead) = self.iterators.first_mut() else {
            self.current = Some(NO_MORE_DOCS);
            return NO_MORE_DOCS;
        };
        let target = lead.next_doc();
        self.align(target)
    }

    fn advance(&mut self, target: DocId) -> DocId {
        check_advance_target(self.current, target);
        if self.current == Some(NO_MORE_DOCS) {
            return NO_MORE_DOCS;
        }
        let target = forward_target(self.current, target);
        let Some(lead) = self.iterators.first_mut() else {
            self.current = Some(NO_MORE_DOCS);
            return NO_MORE_DOCS;
        };
        let target = lead.advance(target);
        self.align(target)
    }

    fn cost(&self) -> u64 {
        self.iterators.first().map_or(0, |it| it.cost())
    }
}

/// A heap entry: a sub-cursor and the doc it currently sits on.
#[derive(Debug)]
struct HeapEntry {
    doc: DocId,
    iterator: Box<dyn DocIdSetIterator>,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.doc == other.doc
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap: lower doc IDs come first
        other.doc.cmp(&self.doc)
    }
}

/// A cursor over the documents any sub-cursor matches.
///
/// Documents matched by several sub-cursors are emitted once.
#[derive(Debug)]
pub struct DisjunctionIterator {
    /// Sub-cursors not yet positioned.
    pending: Vec<Box<dyn DocIdSetIterator>>,
    /// Positioned, non-exhausted sub-cursors keyed by their current doc.
    heap: BinaryHeap<HeapEntry>,
    current: Option<DocId>,
    cost: u64,
}

impl DisjunctionIterator {
    /// Create a disjunction. No sub-cursors means no matches.
    pub fn new(iterators: Vec<Box<dyn DocIdSetIterator>>) -> Self {
        let cost = iterators.iter().map(|it| it.cost()).sum();
        DisjunctionIterator {
            heap: BinaryHeap::with_capacity(iterators.len()),
            pending: iterators,
            current: None,
            cost,
        }
    }

    fn push(&mut self, doc: DocId, iterator: Box<dyn DocIdSetIterator>) {
        if doc != NO_MORE_DOCS {
            self.heap.push(HeapEntry { doc, iterator });
        }
    }

    /// Move every entry sitting below `target` up to it.
    fn advance_heap(&mut self, target: DocId) {
        while let Some(mut top) = self.heap.peek_mut() {
            if top.doc >= target {
                break;
            }
            let doc = top.iterator.advance(target);
            if doc == NO_MORE_DOCS {
                std::collections::binary_heap::PeekMut::pop(top);
            } else {
                top.doc = doc;
            }
        }
    }

    fn settle(&mut self) -> DocId {
        let doc = self.heap.peek().map_or(NO_MORE_DOCS, |top| top.doc);
        self.current = Some(doc);
        doc
    }
}

impl DocIdSetIterator for DisjunctionIterator {
    fn doc_id(&self) -> Option<DocId> {
        self.current
    }

    fn next_doc(&mut self) -> DocId {
        match self.current {
            Some(NO_MORE_DOCS) => NO_MORE_DOCS,
            None => {
                for mut iterator in std::mem::take(&mut self.pending) {
                    let doc = iterator.next_doc();
                    self.push(doc, iterator);
                }
                self.settle()
            }
            Some(current) => {
                self.advance_heap(current.saturating_add(1));
                self.settle()
            }
        }
    }

    fn advance(&mut self, target: DocId) -> DocId {
        check_advance_target(self.current, target);
        if self.current == Some(NO_MORE_DOCS) {
            return NO_MORE_DOCS;
        }
        let target = forward_target(self.current, target);
        if self.current.is_none() {
            for mut iterator in std::mem::take(&mut self.pending) {
                let doc = iterator.advance(target);
                self.push(doc, iterator);
            }
        } else {
            self.advance_heap(target);
        }
        self.settle()
    }

    fn cost(&self) -> u64 {
        self.cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::iterators::{AllDocsIterator, EmptyDocIdSetIterator};

    /// Owned sorted-list cursor so tests can box sub-cursors freely.
    #[derive(Debug)]
    struct Owned {
        docs: Vec<DocId>,
        index: Option<usize>,
    }

    impl DocIdSetIterator for Owned {
        fn doc_id(&self) -> Option<DocId> {
            self.index
                .map(|i| self.docs.get(i).copied().unwrap_or(NO_MORE_DOCS))
        }

        fn next_doc(&mut self) -> DocId {
            let next = self.index.map_or(0, |i| (i + 1).min(self.docs.len()));
            self.index = Some(next);
            self.docs.get(next).copied().unwrap_or(NO_MORE_DOCS)
        }

        fn cost(&self) -> u64 {
            self.docs.len() as u64
        }
    }

    fn owned(docs: &[DocId]) -> Box<dyn DocIdSetIterator> {
        Box::new(Owned {
            docs: docs.to_vec(),
            index: None,
        })
    }

    #[test]
    fn test_conjunction() {
        let it = ConjunctionIterator::new(vec![
            owned(&[1, 3, 5, 7, 9, 11]),
            owned(&[3, 4, 7, 11, 12]),
            owned(&[0, 3, 7, 8, 11]),
        ]);
        assert_eq!(it.cost(), 5);
        let docs: Vec<DocId> = it.into_doc_ids().collect();
        assert_eq!(docs, vec![3, 7, 11]);
    }

    #[test]
    fn test_conjunction_advance() {
        let mut it = ConjunctionIterator::new(vec![
            owned(&[2, 4, 6, 8, 10, 12]),
            Box::new(AllDocsIterator::new(11)),
        ]);
        assert_eq!(it.advance(5), 6);
        assert_eq!(it.advance(6), 8);
        assert_eq!(it.next_doc(), 10);
        assert_eq!(it.next_doc(), NO_MORE_DOCS);
        assert_eq!(it.next_doc(), NO_MORE_DOCS);
    }

    #[test]
    fn test_conjunction_empty_inputs() {
        let mut it = ConjunctionIterator::new(vec![]);
        assert_eq!(it.next_doc(), NO_MORE_DOCS);

        let mut it = ConjunctionIterator::new(vec![
            owned(&[1, 2, 3]),
            Box::new(EmptyDocIdSetIterator::new()),
        ]);
        assert_eq!(it.next_doc(), NO_MORE_DOCS);
    }

    #[test]
    fn test_disjunction() {
        let it = DisjunctionIterator::new(vec![
            owned(&[1, 5, 9]),
            owned(&[2, 5, 10]),
            owned(&[]),
            owned(&[0, 9]),
        ]);
        assert_eq!(it.cost(), 8);
        let docs: Vec<DocId> = it.into_doc_ids().collect();
        assert_eq!(docs, vec![0, 1, 2, 5, 9, 10]);
    }

    #[test]
    fn test_disjunction_advance() {
        let mut it = DisjunctionIterator::new(vec![owned(&[1, 5, 9]), owned(&[2, 6, 10])]);
        assert_eq!(it.advance(3), 5);
        assert_eq!(it.advance(5), 6);
        assert_eq!(it.advance(7), 9);
        assert_eq!(it.next_doc(), 10);
        assert_eq!(it.advance(11), NO_MORE_DOCS);
        assert_eq!(it.next_doc(), NO_MORE_DOCS);
    }

    #[test]
    fn test_nested_boolean() {
        let union = DisjunctionIterator::new(vec![owned(&[1, 4, 7]), owned(&[2, 4, 8])]);
        let union: Box<dyn DocIdSetIterator> = Box::new(union);
        let it = ConjunctionIterator::new(vec![union, owned(&[2, 3, 4, 8, 9])]);
        let docs: Vec<DocId> = it.into_doc_ids().collect();
        assert_eq!(docs, vec![2, 4, 8]);
    }
}
