//! Block-sampled rank over a shared bit sequence

use std::sync::Arc;

use log::trace;

use super::{popcount_prefix, BitIndex};
use crate::error::{check_bounds, FstError, Result};
use crate::succinct::{WordBitVector, WORD_BITS};

/// Rank support: number of set bits in `[0, pos]`
///
/// The lookup table stores the cumulative count at the start of every basic
/// block. A query adds the popcount of the partial block up to `pos`.
#[derive(Debug, Clone)]
pub struct RankIndex {
    bits: Arc<WordBitVector>,
    basic_block_size: usize,
    num_ones: usize,
    rank_lut: Vec<usize>,
}

impl RankIndex {
    /// Build the block table over `bits`
    ///
    /// `basic_block_size` must be a non-zero multiple of the word width.
    pub fn new(basic_block_size: usize, bits: Arc<WordBitVector>) -> Result<Self> {
        if basic_block_size == 0 || basic_block_size % WORD_BITS != 0 {
            return Err(FstError::configuration(format!(
                "rank block size must be a non-zero multiple of {}, got {}",
                WORD_BITS, basic_block_size
            )));
        }

        let words_per_block = basic_block_size / WORD_BITS;
        let num_blocks = bits.num_bits() / basic_block_size + 1;
        let mut rank_lut = Vec::with_capacity(num_blocks);
        let mut cumu_rank = 0;
        for block in 0..num_blocks - 1 {
            rank_lut.push(cumu_rank);
            let start = block * words_per_block;
            cumu_rank += popcount_prefix(&bits.words()[start..], basic_block_size);
        }
        rank_lut.push(cumu_rank);

        let num_ones = bits.count_ones();
        trace!(
            "rank index: {} bits, {} ones, {} blocks of {}",
            bits.num_bits(),
            num_ones,
            num_blocks,
            basic_block_size
        );

        Ok(Self {
            bits,
            basic_block_size,
            num_ones,
            rank_lut,
        })
    }

    /// Number of set bits at positions `0..=pos`
    pub fn rank(&self, pos: usize) -> Result<usize> {
        check_bounds(pos, self.bits.num_bits())?;
        let block = pos / self.basic_block_size;
        let offset = pos % self.basic_block_size;
        let start = block * (self.basic_block_size / WORD_BITS);
        Ok(self.rank_lut[block] + popcount_prefix(&self.bits.words()[start..], offset + 1))
    }

    /// Basic block size in bits
    #[inline]
    pub fn basic_block_size(&self) -> usize {
        self.basic_block_size
    }
}

impl BitIndex for RankIndex {
    fn bits(&self) -> &WordBitVector {
        &self.bits
    }

    fn size(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.bits.size_in_bytes()
            + self.rank_lut.len() * std::mem::size_of::<usize>()
    }

    fn num_ones(&self) -> usize {
        self.num_ones
    }
}
