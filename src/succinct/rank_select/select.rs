//! Sampled select over a shared bit sequence
//!
//! The lookup table stores the position of every `sample_interval`-th set
//! bit, with slot 0 pinned to the first bit of the sequence. A query jumps
//! to the nearest sample at or below the requested rank and scans forward
//! word by word.

use std::sync::Arc;

use log::trace;

use super::{popcount, select_in_word, BitIndex};
use crate::error::{FstError, Result};
use crate::succinct::{read_bit, WordBitVector, WORD_BITS};

/// Select support: position of the i-th set bit, ranks counted from 1
///
/// The sequence must be non-empty and start with a set bit. LOUDS node-start
/// vectors satisfy this by construction.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use louds_fst::succinct::{SelectIndex, WordBitVector};
///
/// let bits = WordBitVector::from_bits("100101000".chars().map(|c| c == '1'));
/// let select = SelectIndex::new(64, Arc::new(bits))?;
///
/// assert_eq!(select.select(1)?, 0);
/// assert_eq!(select.select(2)?, 3);
/// assert_eq!(select.select(3)?, 5);
/// assert!(select.select(4).is_err());
/// # Ok::<(), louds_fst::FstError>(())
/// ```
#[derive(Debug, Clone)]
pub struct SelectIndex {
    bits: Arc<WordBitVector>,
    sample_interval: usize,
    num_ones: usize,
    select_lut: Vec<usize>,
}

impl SelectIndex {
    /// Build the sampled lookup table over `bits`
    pub fn new(sample_interval: usize, bits: Arc<WordBitVector>) -> Result<Self> {
        if sample_interval == 0 {
            return Err(FstError::configuration(
                "select sample interval must be greater than zero",
            ));
        }
        if bits.is_empty() || !read_bit(bits.words(), 0) {
            return Err(FstError::FirstBitUnset);
        }

        let mut select_lut = vec![0];
        let mut next_sample = sample_interval;
        let mut cumu_ones = 0;
        for (word_id, &word) in bits.words().iter().enumerate() {
            let ones = popcount(word);
            while next_sample <= cumu_ones + ones {
                let offset = select_in_word(word, next_sample - cumu_ones);
                select_lut.push(word_id * WORD_BITS + offset);
                next_sample += sample_interval;
            }
            cumu_ones += ones;
        }

        trace!(
            "select index: {} bits, {} ones, {} samples at interval {}",
            bits.num_bits(),
            cumu_ones,
            select_lut.len(),
            sample_interval
        );

        Ok(Self {
            bits,
            sample_interval,
            num_ones: cumu_ones,
            select_lut,
        })
    }

    /// Position of the `rank`-th set bit, `rank` in `1..=num_ones()`
    pub fn select(&self, rank: usize) -> Result<usize> {
        if rank == 0 || rank > self.num_ones {
            return Err(FstError::rank_out_of_range(rank, self.num_ones));
        }

        let lut_idx = rank / self.sample_interval;
        let mut rank_left = rank % self.sample_interval;
        // Slot 0 holds rank 1, not rank 0.
        if lut_idx == 0 {
            rank_left -= 1;
        }

        let pos = self.select_lut[lut_idx];
        if rank_left == 0 {
            return Ok(pos);
        }

        let words = self.bits.words();
        let (mut word_id, offset) = if pos % WORD_BITS == WORD_BITS - 1 {
            (pos / WORD_BITS + 1, 0)
        } else {
            (pos / WORD_BITS, pos % WORD_BITS + 1)
        };

        let mut word = (words[word_id] << offset) >> offset;
        let mut ones = popcount(word);
        while ones < rank_left {
            rank_left -= ones;
            word_id += 1;
            word = words[word_id];
            ones = popcount(word);
        }

        Ok(word_id * WORD_BITS + select_in_word(word, rank_left))
    }

    /// Sampling interval the lookup table was built with
    #[inline]
    pub fn sample_interval(&self) -> usize {
        self.sample_interval
    }

    /// Number of entries in the lookup table
    #[inline]
    pub fn num_samples(&self) -> usize {
        self.select_lut.len()
    }

    /// Shared handle to the indexed bit sequence
    pub fn shared_bits(&self) -> Arc<WordBitVector> {
        Arc::clone(&self.bits)
    }
}

impl BitIndex for SelectIndex {
    fn bits(&self) -> &WordBitVector {
        &self.bits
    }

    fn size(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.bits.size_in_bytes()
            + self.select_lut.len() * std::mem::size_of::<usize>()
    }

    fn num_ones(&self) -> usize {
        self.num_ones
    }
}
