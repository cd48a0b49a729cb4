//! Word-level helpers for 64-bit bit sets.

/// Number of bits in a storage word.
pub const WORD_BITS: usize = 64;

/// Number of words needed to address `num_bits` bits.
#[inline]
pub fn bits_to_words(num_bits: usize) -> usize {
    num_bits.div_ceil(WORD_BITS)
}

/// Word holding bit `index`.
#[inline]
pub fn word_index(index: usize) -> usize {
    index >> 6
}

/// Single-bit mask for bit `index` inside its word.
#[inline]
pub fn bit_mask(index: usize) -> u64 {
    1u64 << (index & 63)
}

/// Mask of the bits at or above `from` inside the first word of a range.
#[inline]
pub fn start_mask(from: usize) -> u64 {
    u64::MAX << (from & 63)
}

/// Mask of the bits below the exclusive `to` inside the last word of a range.
///
/// A `to` on a word boundary selects the whole word.
#[inline]
pub fn end_mask(to: usize) -> u64 {
    u64::MAX >> ((WORD_BITS - (to & 63)) & 63)
}

/// Population count of a word slice.
pub fn pop_array(words: &[u64]) -> u64 {
    words.iter().map(|w| w.count_ones() as u64).sum()
}

/// Population count of `a & b` over the common prefix.
pub fn pop_intersect(a: &[u64], b: &[u64]) -> u64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x & y).count_ones() as u64)
        .sum()
}

/// Population count of `a | b`; the longer tail counts as is.
pub fn pop_union(a: &[u64], b: &[u64]) -> u64 {
    let common = a.len().min(b.len());
    let head: u64 = a[..common]
        .iter()
        .zip(&b[..common])
        .map(|(x, y)| (x | y).count_ones() as u64)
        .sum();
    head + pop_array(&a[common..]) + pop_array(&b[common..])
}

/// Population count of `a & !b`.
pub fn pop_and_not(a: &[u64], b: &[u64]) -> u64 {
    let common = a.len().min(b.len());
    let head: u64 = a[..common]
        .iter()
        .zip(&b[..common])
        .map(|(x, y)| (x & !y).count_ones() as u64)
        .sum();
    head + pop_array(&a[common..])
}

/// Population count of `a ^ b`; the longer tail counts as is.
pub fn pop_xor(a: &[u64], b: &[u64]) -> u64 {
    let common = a.len().min(b.len());
    let head: u64 = a[..common]
        .iter()
        .zip(&b[..common])
        .map(|(x, y)| (x ^ y).count_ones() as u64)
        .sum();
    head + pop_array(&a[common..]) + pop_array(&b[common..])
}
