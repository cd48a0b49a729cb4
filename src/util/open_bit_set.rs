//! Dense bit set over document ids.
//!
//! [`OpenBitSet`] stores membership of documents `[0, size())` in a growable
//! array of 64-bit words. It exposes two access tiers:
//!
//! - a checked tier (`get`, `set`, `clear`, `flip`, ...) that accepts any
//!   position and grows the set when a mutation needs it, and
//! - a fast tier (`fast_get`, `fast_set`, ...) for callers that have already
//!   proven `index < size()`, typically from a loop bound. The fast tier only
//!   checks the bound with `debug_assert!`.
//!
//! The logical capacity ([`size`](OpenBitSet::size)) is tracked separately
//! from the word array, which may hold more words than the capacity needs.
//! Bits at or beyond the capacity are always zero.

use std::fmt;
use std::hash::{Hash, Hasher};

use bit_vec::BitVec;
use log::debug;

use crate::error::{DocSetError, Result};
use crate::search::doc_id_set_iterator::{DocId, DocIdSet, NO_MORE_DOCS};
use crate::util::bits::{
    WORD_BITS, bit_mask, bits_to_words, end_mask, pop_and_not, pop_array, pop_intersect,
    pop_union, pop_xor, start_mask, word_index,
};
use crate::util::open_bit_set_iterator::OpenBitSetIterator;

/// Largest capacity a bit set may have: one past the largest valid doc id.
pub const MAX_BITS: usize = NO_MORE_DOCS as usize;

/// A dense, growable set of document ids backed by 64-bit words.
#[derive(Clone, Default)]
pub struct OpenBitSet {
    words: Vec<u64>,
    num_bits: usize,
}

impl OpenBitSet {
    /// Create an empty set able to hold ids in `[0, num_bits)`.
    pub fn new(num_bits: usize) -> Result<Self> {
        if num_bits > MAX_BITS {
            return Err(DocSetError::invalid_argument(format!(
                "capacity {num_bits} exceeds the maximum of {MAX_BITS} bits"
            )));
        }
        Ok(OpenBitSet {
            words: vec![0; bits_to_words(num_bits)],
            num_bits,
        })
    }

    /// Build a set from raw words.
    ///
    /// `words` must cover `num_bits` and must not have bits set at or beyond
    /// `num_bits`.
    pub fn from_words(words: Vec<u64>, num_bits: usize) -> Result<Self> {
        if num_bits > MAX_BITS {
            return Err(DocSetError::invalid_argument(format!(
                "capacity {num_bits} exceeds the maximum of {MAX_BITS} bits"
            )));
        }
        let needed = bits_to_words(num_bits);
        if words.len() < needed {
            return Err(DocSetError::invalid_argument(format!(
                "{} words cannot hold {num_bits} bits",
                words.len()
            )));
        }
        let set = OpenBitSet { words, num_bits };
        if let Some(stray) = set.first_bit_beyond_capacity() {
            return Err(DocSetError::invalid_argument(format!(
                "bit {stray} is set beyond the capacity of {num_bits}"
            )));
        }
        Ok(set)
    }

    /// Build a set of the given capacity holding `docs`.
    ///
    /// Ids at or beyond `num_bits` grow the set, like [`set`](Self::set).
    pub fn from_doc_ids<I>(num_bits: usize, docs: I) -> Result<Self>
    where
        I: IntoIterator<Item = DocId>,
    {
        let mut set = OpenBitSet::new(num_bits)?;
        for doc in docs {
            set.set(doc as usize)?;
        }
        Ok(set)
    }

    /// Capacity in bits: the exclusive upper bound on addressable ids.
    ///
    /// This is not the number of members; see [`cardinality`](Self::cardinality).
    #[inline]
    pub fn size(&self) -> usize {
        self.num_bits
    }

    /// Number of words in the backing array.
    #[inline]
    pub fn num_words(&self) -> usize {
        self.words.len()
    }

    /// The backing words. Bit `i` lives in word `i / 64` at position `i % 64`.
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    /// Words that can hold bits below the capacity.
    #[inline]
    fn live_words(&self) -> &[u64] {
        &self.words[..bits_to_words(self.num_bits)]
    }

    /// Whether no bit is set.
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Number of set bits.
    pub fn cardinality(&self) -> u64 {
        pop_array(&self.words)
    }

    /// Grow the capacity to at least `num_bits`. Never shrinks.
    pub fn ensure_capacity(&mut self, num_bits: usize) -> Result<()> {
        if num_bits <= self.num_bits {
            return Ok(());
        }
        if num_bits > MAX_BITS {
            return Err(DocSetError::invalid_argument(format!(
                "capacity {num_bits} exceeds the maximum of {MAX_BITS} bits"
            )));
        }
        let needed = bits_to_words(num_bits);
        if needed > self.words.len() {
            self.words.resize(needed, 0);
        }
        debug!("grew bit set from {} to {} bits", self.num_bits, num_bits);
        self.num_bits = num_bits;
        Ok(())
    }

    /// Release words the capacity does not need.
    pub fn shrink_to_fit(&mut self) {
        self.words.truncate(bits_to_words(self.num_bits));
        self.words.shrink_to_fit();
    }

    // Fast tier. Callers guarantee `index < size()`.

    /// Whether bit `index` is set. Requires `index < size()`.
    #[inline]
    pub fn fast_get(&self, index: usize) -> bool {
        debug_assert!(index < self.num_bits, "fast_get({index}) beyond {}", self.num_bits);
        self.words[word_index(index)] & bit_mask(index) != 0
    }

    /// Set bit `index`. Requires `index < size()`.
    #[inline]
    pub fn fast_set(&mut self, index: usize) {
        debug_assert!(index < self.num_bits, "fast_set({index}) beyond {}", self.num_bits);
        self.words[word_index(index)] |= bit_mask(index);
    }

    /// Clear bit `index`. Requires `index < size()`.
    #[inline]
    pub fn fast_clear(&mut self, index: usize) {
        debug_assert!(index < self.num_bits, "fast_clear({index}) beyond {}", self.num_bits);
        self.words[word_index(index)] &= !bit_mask(index);
    }

    /// Toggle bit `index`. Requires `index < size()`.
    #[inline]
    pub fn fast_flip(&mut self, index: usize) {
        debug_assert!(index < self.num_bits, "fast_flip({index}) beyond {}", self.num_bits);
        self.words[word_index(index)] ^= bit_mask(index);
    }

    // Checked tier.

    /// Whether bit `index` is set; `false` beyond the capacity.
    pub fn get(&self, index: usize) -> bool {
        index < self.num_bits && self.fast_get(index)
    }

    /// Set bit `index`, growing the capacity to `index + 1` if needed.
    pub fn set(&mut self, index: usize) -> Result<()> {
        self.ensure_index(index)?;
        self.fast_set(index);
        Ok(())
    }

    /// Clear bit `index`. Positions beyond the capacity are already clear.
    pub fn clear(&mut self, index: usize) {
        if index < self.num_bits {
            self.fast_clear(index);
        }
    }

    /// Toggle bit `index`, growing the capacity to `index + 1` if needed.
    pub fn flip(&mut self, index: usize) -> Result<()> {
        self.ensure_index(index)?;
        self.fast_flip(index);
        Ok(())
    }

    /// Set bit `index` and return whether it was set before.
    pub fn get_and_set(&mut self, index: usize) -> Result<bool> {
        self.ensure_index(index)?;
        let was_set = self.fast_get(index);
        self.fast_set(index);
        Ok(was_set)
    }

    /// Toggle bit `index` and return its new value.
    pub fn flip_and_get(&mut self, index: usize) -> Result<bool> {
        self.ensure_index(index)?;
        self.fast_flip(index);
        Ok(self.fast_get(index))
    }

    fn ensure_index(&mut self, index: usize) -> Result<()> {
        if index >= MAX_BITS {
            return Err(DocSetError::out_of_bounds(index, MAX_BITS));
        }
        self.ensure_capacity(index + 1)
    }

    /// Clear every bit in `[from, to)`.
    ///
    /// `to` is clamped to the capacity; an empty range is a no-op.
    pub fn clear_range(&mut self, from: usize, to: usize) {
        let to = to.min(self.num_bits);
        self.apply_range(from, to, |word, mask| *word &= !mask);
    }

    /// Set every bit in `[from, to)`, growing the capacity to `to` if needed.
    pub fn set_range(&mut self, from: usize, to: usize) -> Result<()> {
        self.ensure_range(from, to)?;
        self.apply_range(from, to, |word, mask| *word |= mask);
        Ok(())
    }

    /// Toggle every bit in `[from, to)`, growing the capacity to `to` if needed.
    pub fn flip_range(&mut self, from: usize, to: usize) -> Result<()> {
        self.ensure_range(from, to)?;
        self.apply_range(from, to, |word, mask| *word ^= mask);
        Ok(())
    }

    fn ensure_range(&mut self, from: usize, to: usize) -> Result<()> {
        if from >= to {
            return Ok(());
        }
        if to > MAX_BITS {
            return Err(DocSetError::out_of_bounds(to - 1, MAX_BITS));
        }
        self.ensure_capacity(to)
    }

    /// Apply `op(word, mask)` to every word overlapping `[from, to)`, with
    /// `mask` selecting the bits of the range. Requires `to <= size()`.
    fn apply_range(&mut self, from: usize, to: usize, op: impl Fn(&mut u64, u64)) {
        if from >= to {
            return;
        }
        let first = word_index(from);
        let last = word_index(to - 1);
        let head = start_mask(from);
        let tail = end_mask(to);

        if first == last {
            op(&mut self.words[first], head & tail);
            return;
        }
        op(&mut self.words[first], head);
        for word in &mut self.words[first + 1..last] {
            op(word, u64::MAX);
        }
        op(&mut self.words[last], tail);
    }

    /// Smallest set bit at or after `from`, or `None`.
    ///
    /// Zero words are skipped whole.
    pub fn next_set_bit(&self, from: usize) -> Option<usize> {
        if from >= self.num_bits {
            return None;
        }
        let live = self.live_words();
        let mut index = word_index(from);
        let word = live[index] >> (from & 63);
        if word != 0 {
            return Some(from + word.trailing_zeros() as usize);
        }
        index += 1;
        while index < live.len() {
            let word = live[index];
            if word != 0 {
                return Some(index * WORD_BITS + word.trailing_zeros() as usize);
            }
            index += 1;
        }
        None
    }

    /// Largest set bit at or before `from`, or `None`.
    ///
    /// `from` beyond the capacity searches from the last addressable bit.
    pub fn prev_set_bit(&self, from: usize) -> Option<usize> {
        if self.num_bits == 0 {
            return None;
        }
        let from = from.min(self.num_bits - 1);
        let mut index = word_index(from);
        let word = self.words[index] << (63 - (from & 63));
        if word != 0 {
            return Some(from - word.leading_zeros() as usize);
        }
        while index > 0 {
            index -= 1;
            let word = self.words[index];
            if word != 0 {
                return Some(index * WORD_BITS + 63 - word.leading_zeros() as usize);
            }
        }
        None
    }

    /// Iterate over the positions of set bits in ascending order.
    pub fn ones(&self) -> Ones<'_> {
        let words = self.live_words();
        Ones {
            words,
            word_idx: 0,
            current: words.first().copied().unwrap_or(0),
        }
    }

    // Word-level algebra with another set.

    /// `self |= other`, growing to `other`'s capacity if it is larger.
    pub fn union(&mut self, other: &OpenBitSet) -> Result<()> {
        self.ensure_capacity(other.num_bits)?;
        for (word, &o) in self.words.iter_mut().zip(other.live_words()) {
            *word |= o;
        }
        Ok(())
    }

    /// `self &= other`.
    pub fn intersect(&mut self, other: &OpenBitSet) {
        let theirs = other.live_words();
        for (i, word) in self.words.iter_mut().enumerate() {
            *word &= theirs.get(i).copied().unwrap_or(0);
        }
    }

    /// `self &= !other`.
    pub fn remove(&mut self, other: &OpenBitSet) {
        for (word, &o) in self.words.iter_mut().zip(other.live_words()) {
            *word &= !o;
        }
    }

    /// `self ^= other`, growing to `other`'s capacity if it is larger.
    pub fn xor(&mut self, other: &OpenBitSet) -> Result<()> {
        self.ensure_capacity(other.num_bits)?;
        for (word, &o) in self.words.iter_mut().zip(other.live_words()) {
            *word ^= o;
        }
        Ok(())
    }

    /// Whether the two sets share at least one member.
    pub fn intersects(&self, other: &OpenBitSet) -> bool {
        self.words
            .iter()
            .zip(&other.words)
            .any(|(a, b)| a & b != 0)
    }

    /// `|self & other|`
    pub fn intersection_count(&self, other: &OpenBitSet) -> u64 {
        pop_intersect(&self.words, &other.words)
    }

    /// `|self | other|`
    pub fn union_count(&self, other: &OpenBitSet) -> u64 {
        pop_union(&self.words, &other.words)
    }

    /// `|self & !other|`
    pub fn and_not_count(&self, other: &OpenBitSet) -> u64 {
        pop_and_not(&self.words, &other.words)
    }

    /// `|self ^ other|`
    pub fn xor_count(&self, other: &OpenBitSet) -> u64 {
        pop_xor(&self.words, &other.words)
    }

    /// Copy a [`BitVec`] (e.g. a deleted-docs bitmap) into a new set of the
    /// same length.
    pub fn from_bit_vec(bits: &BitVec) -> Result<Self> {
        let mut set = OpenBitSet::new(bits.len())?;
        for (index, bit) in bits.iter().enumerate() {
            if bit {
                set.fast_set(index);
            }
        }
        Ok(set)
    }

    /// Copy this set into a [`BitVec`] of length `size()`.
    pub fn to_bit_vec(&self) -> BitVec {
        let mut bits = BitVec::from_elem(self.num_bits, false);
        for index in self.ones() {
            bits.set(index, true);
        }
        bits
    }

    fn first_bit_beyond_capacity(&self) -> Option<usize> {
        let live = bits_to_words(self.num_bits);
        if self.num_bits % WORD_BITS != 0 {
            let last = live - 1;
            let stray = self.words[last] & !end_mask(self.num_bits);
            if stray != 0 {
                return Some(last * WORD_BITS + stray.trailing_zeros() as usize);
            }
        }
        self.words[live..]
            .iter()
            .position(|&w| w != 0)
            .map(|i| (live + i) * WORD_BITS + self.words[live + i].trailing_zeros() as usize)
    }

    /// Words up to the last non-zero one.
    fn significant_words(&self) -> &[u64] {
        let len = self
            .words
            .iter()
            .rposition(|&w| w != 0)
            .map_or(0, |i| i + 1);
        &self.words[..len]
    }
}

impl fmt::Debug for OpenBitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenBitSet")
            .field("size", &self.num_bits)
            .field("words", &self.words.len())
            .field("cardinality", &self.cardinality())
            .finish()
    }
}

/// Two sets are equal when they have the same members, whatever their
/// capacity or word-array length.
impl PartialEq for OpenBitSet {
    fn eq(&self, other: &Self) -> bool {
        self.significant_words() == other.significant_words()
    }
}

impl Eq for OpenBitSet {}

impl Hash for OpenBitSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.significant_words().hash(state);
    }
}

impl DocIdSet for OpenBitSet {
    type Iter<'a> = OpenBitSetIterator<'a>;

    fn iterator(&self) -> OpenBitSetIterator<'_> {
        OpenBitSetIterator::new(self)
    }
}

/// Iterator over set bit positions, see [`OpenBitSet::ones`].
#[derive(Debug, Clone)]
pub struct Ones<'a> {
    words: &'a [u64],
    word_idx: usize,
    current: u64,
}

impl Iterator for Ones<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        loop {
            if self.current != 0 {
                let bit = self.current.trailing_zeros() as usize;
                self.current &= self.current - 1;
                return Some(self.word_idx * WORD_BITS + bit);
            }
            self.word_idx += 1;
            if self.word_idx >= self.words.len() {
                return None;
            }
            self.current = self.words[self.word_idx];
        }
    }
}
