//! Minimal-redundancy (Huffman) coding over an arbitrary symbol alphabet.
//!
//! The pipeline is
//! `symbols -> FrequencyTable -> HuffmanTree -> CodeTable -> EncodedBitstream`
//! and back through [`decode`] with the same tree.

use std::fmt::Debug;
use std::hash::Hash;

pub mod code;
mod coding_error;
pub mod decoder;
pub mod encoder;
pub mod frequency;
pub mod statistics;
pub mod tree;

pub use code::{CodeTable, CodeWord};
pub use coding_error::CodingError;
pub use decoder::HuffmanDecoder;
pub use encoder::{EncodedBitstream, HuffmanEncoder};
pub use frequency::{FrequencyTable, SymbolFrequency};
pub use tree::{HuffmanTree, TieBreak};

/// Anything that can be counted and looked up can be coded.
pub trait Symbol: Clone + Eq + Hash + Debug {}

impl<T: Clone + Eq + Hash + Debug> Symbol for T {}

pub fn build_frequency_table<S: Symbol>(symbols: &[S]) -> FrequencyTable<S> {
    symbols.iter().cloned().collect()
}

/// Builds the tree with the default [`TieBreak::OldestFirst`] rule.
pub fn build_tree<S: Symbol>(table: &FrequencyTable<S>) -> HuffmanTree<S> {
    HuffmanTree::new(table)
}

pub fn generate_codes<S: Symbol>(tree: &HuffmanTree<S>) -> CodeTable<S> {
    CodeTable::from(tree)
}

pub fn encode<S: Symbol>(
    symbols: &[S],
    code_table: &CodeTable<S>,
) -> Result<EncodedBitstream, CodingError> {
    HuffmanEncoder::new(code_table).encode(symbols)
}

pub fn decode<S: Symbol>(
    bitstream: &EncodedBitstream,
    tree: &HuffmanTree<S>,
) -> Result<Vec<S>, CodingError> {
    HuffmanDecoder::new(tree).decode(bitstream)
}
