//! Succinct bit storage with rank and select support
//!
//! This module provides the word-packed bit storage that the trie builder
//! writes into, and the auxiliary rank/select indexes an assembler layers on
//! top of it. Both indexes hold a shared reference to the same storage value
//! instead of owning a copy.
//!
//! # Bit addressing
//!
//! Within a word of width [`WORD_BITS`], bit position `p` lives in word
//! `p / WORD_BITS` at offset `p % WORD_BITS`, where offset 0 is the most
//! significant bit. Every reader and writer in this crate goes through
//! [`read_bit`] / [`set_bit`] or the equivalent shift of [`MSB_MASK`], so the
//! produced vectors are bit-exact across producer and consumer.

pub mod bit_vector;
pub mod rank_select;

/// Storage word for every bit vector in the crate
pub type Word = u64;

/// Number of bits in a storage word
pub const WORD_BITS: usize = Word::BITS as usize;

/// Mask selecting the most significant bit of a word (bit offset 0)
pub const MSB_MASK: Word = 1 << (WORD_BITS - 1);

/// Number of distinct labels per dense node, fixed by the `u8` alphabet
pub const FANOUT: usize = 256;

pub use bit_vector::{read_bit, set_bit, WordBitVector};
pub use rank_select::{BitIndex, RankIndex, SelectIndex};
