//! Streaming boolean combination of a doc id cursor into a bit set.
//!
//! [`OpenBitSetDisi`] owns an [`OpenBitSet`] and folds a
//! [`DocIdSetIterator`] into it with OR, AND, NOT or XOR in a single forward
//! pass. The set's capacity is a hard bound: the combinators never grow the
//! set and ids at or beyond `size()` are dropped without error. This models
//! the document-count ceiling of a query scope.
//!
//! # Examples
//!
//! ```
//! use docset::search::{DocIdSet, SortedDocIdSet};
//! use docset::util::OpenBitSetDisi;
//!
//! let postings = SortedDocIdSet::new(vec![2, 4, 6, 8]).unwrap();
//! let mut candidates = OpenBitSetDisi::from_iterator(&mut postings.iterator(), 10).unwrap();
//!
//! let filter = SortedDocIdSet::new(vec![4, 6]).unwrap();
//! candidates.in_place_and(&mut filter.iterator());
//!
//! assert_eq!(candidates.ones().collect::<Vec<_>>(), vec![4, 6]);
//! ```

use std::ops::{Deref, DerefMut};

use log::trace;

use crate::error::Result;
use crate::search::doc_id_set_iterator::{DocId, DocIdSetIterator, NO_MORE_DOCS};
use crate::util::open_bit_set::OpenBitSet;

/// A bit set that can be combined in place with doc id cursors.
///
/// Dereferences to the underlying [`OpenBitSet`] for every other operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpenBitSetDisi {
    bits: OpenBitSet,
}

impl OpenBitSetDisi {
    /// Create an empty set for ids in `[0, max_size)`.
    pub fn new(max_size: usize) -> Result<Self> {
        Ok(OpenBitSetDisi {
            bits: OpenBitSet::new(max_size)?,
        })
    }

    /// Create a set for ids in `[0, max_size)` holding the ids of `disi`.
    pub fn from_iterator<I>(disi: &mut I, max_size: usize) -> Result<Self>
    where
        I: DocIdSetIterator + ?Sized,
    {
        let mut set = OpenBitSetDisi::new(max_size)?;
        set.in_place_or(disi);
        Ok(set)
    }

    /// Give back the underlying bit set.
    pub fn into_inner(self) -> OpenBitSet {
        self.bits
    }

    /// Set the bit of every id produced by `disi`.
    pub fn in_place_or<I>(&mut self, disi: &mut I)
    where
        I: DocIdSetIterator + ?Sized,
    {
        let visited = self.for_each_in_bounds(disi, OpenBitSet::fast_set);
        trace!("in-place OR set {visited} docs");
    }

    /// Keep only the bits whose ids are also produced by `disi`.
    ///
    /// Walks the set bits and the cursor as two ascending sequences: every
    /// set bit the cursor skips over is cleared, and once the cursor runs
    /// past the capacity (or is exhausted) all remaining bits are cleared.
    pub fn in_place_and<I>(&mut self, disi: &mut I)
    where
        I: DocIdSetIterator + ?Sized,
    {
        let size = self.bits.size();
        let mut matched = 0u64;
        let mut next_bit = self.bits.next_set_bit(0);

        while let Some(bit) = next_bit {
            // `bit` is above the cursor's position, so this never moves it back.
            let doc = disi.advance(bit as DocId) as usize;
            if doc >= size {
                self.bits.clear_range(bit, size);
                break;
            }
            self.bits.clear_range(bit, doc);
            if self.bits.fast_get(doc) {
                matched += 1;
            }
            next_bit = self.bits.next_set_bit(doc + 1);
        }
        trace!("in-place AND kept {matched} docs");
    }

    /// Clear the bit of every id produced by `disi`.
    pub fn in_place_not<I>(&mut self, disi: &mut I)
    where
        I: DocIdSetIterator + ?Sized,
    {
        let visited = self.for_each_in_bounds(disi, OpenBitSet::fast_clear);
        trace!("in-place NOT cleared {visited} docs");
    }

    /// Toggle the bit of every id produced by `disi`.
    pub fn in_place_xor<I>(&mut self, disi: &mut I)
    where
        I: DocIdSetIterator + ?Sized,
    {
        let visited = self.for_each_in_bounds(disi, OpenBitSet::fast_flip);
        trace!("in-place XOR flipped {visited} docs");
    }

    /// Apply `op` to every id of `disi` below the capacity, stopping at the
    /// first id at or beyond it. Returns the number of ids visited.
    fn for_each_in_bounds<I>(&mut self, disi: &mut I, op: fn(&mut OpenBitSet, usize)) -> u64
    where
        I: DocIdSetIterator + ?Sized,
    {
        let size = self.bits.size();
        let mut visited = 0u64;
        loop {
            let doc = disi.next_doc();
            if doc == NO_MORE_DOCS || doc as usize >= size {
                break;
            }
            op(&mut self.bits, doc as usize);
            visited += 1;
        }
        visited
    }
}

impl Deref for OpenBitSetDisi {
    type Target = OpenBitSet;

    fn deref(&self) -> &OpenBitSet {
        &self.bits
    }
}

impl DerefMut for OpenBitSetDisi {
    fn deref_mut(&mut self) -> &mut OpenBitSet {
        &mut self.bits
    }
}

impl From<OpenBitSet> for OpenBitSetDisi {
    fn from(bits: OpenBitSet) -> Self {
        OpenBitSetDisi { bits }
    }
}
