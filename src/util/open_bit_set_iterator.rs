//! Cursor over the members of an [`OpenBitSet`].

use crate::search::doc_id_set_iterator::{
    DocId, DocIdSetIterator, NO_MORE_DOCS, check_advance_target, forward_target,
};
use crate::util::open_bit_set::OpenBitSet;

/// A [`DocIdSetIterator`] scanning the set bits of a borrowed bit set.
///
/// `advance` jumps straight to the target word through
/// [`OpenBitSet::next_set_bit`].
#[derive(Debug)]
pub struct OpenBitSetIterator<'a> {
    bits: &'a OpenBitSet,
    current: Option<DocId>,
}

impl<'a> OpenBitSetIterator<'a> {
    /// Create a cursor positioned before the first member of `bits`.
    pub fn new(bits: &'a OpenBitSet) -> Self {
        OpenBitSetIterator {
            bits,
            current: None,
        }
    }

    fn seek(&mut self, from: usize) -> DocId {
        let doc = self
            .bits
            .next_set_bit(from)
            .map_or(NO_MORE_DOCS, |index| index as DocId);
        self.current = Some(doc);
        doc
    }
}

impl DocIdSetIterator for OpenBitSetIterator<'_> {
    fn doc_id(&self) -> Option<DocId> {
        self.current
    }

    fn next_doc(&mut self) -> DocId {
        match self.current {
            None => self.seek(0),
            Some(NO_MORE_DOCS) => NO_MORE_DOCS,
            Some(doc) => self.seek(doc as usize + 1),
        }
    }

    fn advance(&mut self, target: DocId) -> DocId {
        check_advance_target(self.current, target);
        if self.current == Some(NO_MORE_DOCS) {
            return NO_MORE_DOCS;
        }
        let target = forward_target(self.current, target);
        self.seek(target as usize)
    }

    fn cost(&self) -> u64 {
        self.bits.cardinality()
    }
}
