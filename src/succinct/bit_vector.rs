//! Word-packed bit storage concatenated from per-level arrays
//!
//! The trie builder produces one word array per trie level. Rank and select
//! indexes work over a single logical bit sequence, so [`WordBitVector`]
//! packs a contiguous range of levels back to back, keeping exactly the
//! declared number of bits from each level and no padding in between.

use serde::{Deserialize, Serialize};

use super::{Word, MSB_MASK, WORD_BITS};
use crate::error::{check_bounds, check_range, FstError, Result};

/// Read the bit at `pos` using MSB-first addressing
///
/// `pos` must be below `words.len() * WORD_BITS`.
#[inline]
pub fn read_bit(words: &[Word], pos: usize) -> bool {
    debug_assert!(pos < words.len() * WORD_BITS);
    words[pos / WORD_BITS] & (MSB_MASK >> (pos % WORD_BITS)) != 0
}

/// Set the bit at `pos` using MSB-first addressing
///
/// `pos` must be below `words.len() * WORD_BITS`.
#[inline]
pub fn set_bit(words: &mut [Word], pos: usize) {
    debug_assert!(pos < words.len() * WORD_BITS);
    words[pos / WORD_BITS] |= MSB_MASK >> (pos % WORD_BITS);
}

/// Keep the `len` most significant bits of `word`
#[inline]
fn keep_high_bits(word: Word, len: usize) -> Word {
    if len >= WORD_BITS {
        word
    } else {
        word & !(Word::MAX >> len)
    }
}

/// Immutable bit sequence stored in [`Word`]s, MSB-first
///
/// # Examples
///
/// ```rust
/// use louds_fst::succinct::WordBitVector;
///
/// // Two levels: "101" and "0001"
/// let levels = vec![vec![0b101u64 << 61], vec![0b0001u64 << 60]];
/// let bv = WordBitVector::from_levels(&levels, &[3, 4], 0, 0)?;
///
/// assert_eq!(bv.num_bits(), 7);
/// assert_eq!(bv.count_ones(), 3);
/// assert!(bv.get(6)?);
/// # Ok::<(), louds_fst::FstError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordBitVector {
    words: Vec<Word>,
    num_bits: usize,
}

impl WordBitVector {
    /// Concatenate the levels `[start_level, end_level)` into one sequence
    ///
    /// `num_bits_per_level[l]` bits are taken from the front of
    /// `bits_per_level[l]`. An `end_level` of 0 means "through the last
    /// level".
    pub fn from_levels(
        bits_per_level: &[Vec<Word>],
        num_bits_per_level: &[usize],
        start_level: usize,
        end_level: usize,
    ) -> Result<Self> {
        let levels = bits_per_level.len().min(num_bits_per_level.len());
        if bits_per_level.len() != num_bits_per_level.len() {
            return Err(FstError::invalid_level_range(start_level, end_level, levels));
        }
        let end_level = if end_level == 0 { levels } else { end_level };
        check_range(start_level, end_level, levels)?;

        for level in start_level..end_level {
            let capacity = bits_per_level[level].len() * WORD_BITS;
            if num_bits_per_level[level] > capacity {
                return Err(FstError::out_of_bounds(num_bits_per_level[level], capacity));
            }
        }

        let num_bits: usize = num_bits_per_level[start_level..end_level].iter().sum();
        let mut words = vec![0; (num_bits + WORD_BITS - 1) / WORD_BITS];

        let mut cursor = 0;
        for level in start_level..end_level {
            let level_bits = num_bits_per_level[level];
            Self::append_level(&mut words, cursor, &bits_per_level[level], level_bits);
            cursor += level_bits;
        }

        Ok(Self { words, num_bits })
    }

    /// Wrap a single word array holding `num_bits` bits
    ///
    /// Bits past `num_bits` in the last word are cleared.
    pub fn from_words(mut words: Vec<Word>, num_bits: usize) -> Result<Self> {
        let capacity = words.len() * WORD_BITS;
        if num_bits > capacity {
            return Err(FstError::out_of_bounds(num_bits, capacity));
        }
        let num_words = (num_bits + WORD_BITS - 1) / WORD_BITS;
        words.truncate(num_words);
        if let Some(last) = words.last_mut() {
            let tail = num_bits % WORD_BITS;
            if tail != 0 {
                *last = keep_high_bits(*last, tail);
            }
        }
        Ok(Self { words, num_bits })
    }

    /// Build from a bit iterator, first item at position 0
    pub fn from_bits<I>(bits: I) -> Self
    where
        I: IntoIterator<Item = bool>,
    {
        let mut words = Vec::new();
        let mut num_bits = 0;
        for bit in bits {
            if num_bits % WORD_BITS == 0 {
                words.push(0);
            }
            if bit {
                set_bit(&mut words, num_bits);
            }
            num_bits += 1;
        }
        Self { words, num_bits }
    }

    // Copies `len` bits of `src` to bit position `dst` of `words`.
    fn append_level(words: &mut [Word], dst: usize, src: &[Word], len: usize) {
        let mut copied = 0;
        for &word in src {
            if copied >= len {
                break;
            }
            let chunk_len = (len - copied).min(WORD_BITS);
            let chunk = keep_high_bits(word, chunk_len);
            let pos = dst + copied;
            let word_id = pos / WORD_BITS;
            let offset = pos % WORD_BITS;

            words[word_id] |= chunk >> offset;
            if offset != 0 && offset + chunk_len > WORD_BITS {
                words[word_id + 1] |= chunk << (WORD_BITS - offset);
            }
            copied += chunk_len;
        }
    }

    /// Number of bits in the sequence
    #[inline]
    pub fn num_bits(&self) -> usize {
        self.num_bits
    }

    /// Number of storage words
    #[inline]
    pub fn num_words(&self) -> usize {
        self.words.len()
    }

    /// Check if the sequence holds no bits
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.num_bits == 0
    }

    /// Raw storage words
    #[inline]
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    /// Get the bit at `pos`
    pub fn get(&self, pos: usize) -> Result<bool> {
        check_bounds(pos, self.num_bits)?;
        Ok(read_bit(&self.words, pos))
    }

    /// Count the set bits in the whole sequence
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Bytes held by the storage words
    pub fn size_in_bytes(&self) -> usize {
        self.words.len() * std::mem::size_of::<Word>()
    }
}
