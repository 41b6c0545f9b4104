//! Rank and select indexes over a shared [`WordBitVector`]
//!
//! - [`SelectIndex`]: position of the i-th set bit (one-based), accelerated
//!   by a sampled lookup table.
//! - [`RankIndex`]: number of set bits up to and including a position,
//!   accelerated by per-block cumulative counts.
//!
//! Both are immutable once built and hold an `Arc` to the bit storage, so
//! several indexes can be layered over the same sequence.

use super::{Word, MSB_MASK, WORD_BITS};
use crate::succinct::WordBitVector;

pub mod rank;
pub mod select;

pub use rank::RankIndex;
pub use select::SelectIndex;

/// Common interface of the auxiliary bit indexes
pub trait BitIndex {
    /// The indexed bit sequence
    fn bits(&self) -> &WordBitVector;

    /// Approximate heap plus inline footprint in bytes, including the bit storage
    fn size(&self) -> usize;

    /// Number of bits in the indexed sequence
    fn num_bits(&self) -> usize {
        self.bits().num_bits()
    }

    /// Number of set bits in the indexed sequence
    fn num_ones(&self) -> usize;
}

/// Number of set bits in `word`
#[inline(always)]
pub fn popcount(word: Word) -> usize {
    word.count_ones() as usize
}

/// Offset from the most significant bit of the `rank`-th set bit in `word`
///
/// `rank` is one-based and must not exceed `popcount(word)`.
#[inline]
pub fn select_in_word(mut word: Word, rank: usize) -> usize {
    debug_assert!(rank >= 1 && rank <= popcount(word));
    for _ in 1..rank {
        word ^= MSB_MASK >> word.leading_zeros();
    }
    word.leading_zeros() as usize
}

/// Number of set bits among the first `num_bits` bits of `words`
#[inline]
pub fn popcount_prefix(words: &[Word], num_bits: usize) -> usize {
    let full = num_bits / WORD_BITS;
    let mut count: usize = words[..full].iter().map(|&w| popcount(w)).sum();
    let tail = num_bits % WORD_BITS;
    if tail != 0 {
        count += popcount(words[full] & !(Word::MAX >> tail));
    }
    count
}
