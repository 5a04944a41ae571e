use crate::binary_stream::BitReader;

use super::tree::NodeKind;
use super::{CodingError, EncodedBitstream, HuffmanTree, Symbol};

/// Tree traversal decoder: 0 steps left, 1 steps right, a leaf emits its
/// symbol and moves the cursor back to the root.
pub struct HuffmanDecoder<'a, S> {
    tree: &'a HuffmanTree<S>,
}

impl<'a, S: Symbol> HuffmanDecoder<'a, S> {
    pub fn new(tree: &'a HuffmanTree<S>) -> Self {
        Self { tree }
    }

    pub fn decode(&self, bitstream: &EncodedBitstream) -> Result<Vec<S>, CodingError> {
        Self::validate_padding(bitstream)?;
        // every symbol takes at least one bit
        if bitstream.symbol_count > bitstream.bit_count() {
            return Err(CodingError::TruncatedBitstream {
                decoded: 0,
                expected: bitstream.symbol_count,
            });
        }
        let mut reader = BitReader::new(&bitstream.bytes);
        let mut out = Vec::with_capacity(bitstream.symbol_count);
        if bitstream.symbol_count > 0 {
            let root_index = self
                .tree
                .root_index()
                .ok_or(CodingError::MalformedTree("empty tree can not decode symbols"))?;
            match &self.node(root_index)?.kind {
                NodeKind::Leaf { symbol } => {
                    Self::decode_single_leaf(symbol, &mut reader, bitstream.symbol_count, &mut out)?
                }
                NodeKind::Inner { .. } => {
                    self.decode_sequence(root_index, &mut reader, bitstream.symbol_count, &mut out)?
                }
            }
        }
        Self::validate_trailing_bits(&mut reader, bitstream.padding_bits)?;
        Ok(out)
    }

    fn decode_sequence(
        &self,
        root_index: usize,
        reader: &mut BitReader,
        symbol_count: usize,
        out: &mut Vec<S>,
    ) -> Result<(), CodingError> {
        let mut current_index = root_index;
        while out.len() < symbol_count {
            let take_right = reader.read_bit().ok_or(CodingError::TruncatedBitstream {
                decoded: out.len(),
                expected: symbol_count,
            })?;
            current_index = match self.node(current_index)?.kind {
                NodeKind::Inner { left, right } => {
                    if take_right {
                        right
                    } else {
                        left
                    }
                }
                NodeKind::Leaf { .. } => {
                    return Err(CodingError::MalformedTree("cursor rests on a leaf"));
                }
            };
            if let NodeKind::Leaf { symbol } = &self.node(current_index)?.kind {
                out.push(symbol.clone());
                current_index = root_index;
            }
        }
        Ok(())
    }

    // the lone symbol is coded as a single 0 bit
    fn decode_single_leaf(
        symbol: &S,
        reader: &mut BitReader,
        symbol_count: usize,
        out: &mut Vec<S>,
    ) -> Result<(), CodingError> {
        while out.len() < symbol_count {
            let position = reader.bits_read();
            match reader.read_bit() {
                Some(false) => out.push(symbol.clone()),
                Some(true) => return Err(CodingError::UnmatchedCodeBit(position)),
                None => {
                    return Err(CodingError::TruncatedBitstream {
                        decoded: out.len(),
                        expected: symbol_count,
                    })
                }
            }
        }
        Ok(())
    }

    fn node(&self, index: usize) -> Result<&'a super::tree::Node<S>, CodingError> {
        self.tree
            .node(index)
            .ok_or(CodingError::MalformedTree("child index outside of the tree"))
    }

    fn validate_padding(bitstream: &EncodedBitstream) -> Result<(), CodingError> {
        let padding_bits = bitstream.padding_bits;
        if padding_bits > 7 || (bitstream.bytes.is_empty() && padding_bits != 0) {
            return Err(CodingError::InvalidPaddingBitCount(padding_bits));
        }
        Ok(())
    }

    fn validate_trailing_bits(reader: &mut BitReader, padding_bits: u8) -> Result<(), CodingError> {
        let unread_bits = reader.remaining_bits();
        if unread_bits != padding_bits as usize {
            return Err(CodingError::InconsistentBitCount {
                unread_bits,
                padding_bits,
            });
        }
        if reader.any(|bit| bit) {
            return Err(CodingError::NonZeroPaddingBits);
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::HuffmanDecoder;
    use crate::huffman::{
        CodeTable, CodingError, EncodedBitstream, FrequencyTable, HuffmanEncoder, HuffmanTree,
        TieBreak,
    };

    fn tree_for(text: &str) -> HuffmanTree<char> {
        let table: FrequencyTable<char> = text.chars().collect();
        HuffmanTree::new(&table)
    }

    fn bitstream(bytes: &[u8], padding_bits: u8, symbol_count: usize) -> EncodedBitstream {
        EncodedBitstream {
            bytes: bytes.to_vec(),
            padding_bits,
            symbol_count,
        }
    }

    #[test]
    fn test_decode_scenario() {
        let tree = tree_for("AAAAABBCD");
        // 011 010 00 1 + 7 padding bits
        let decoded = HuffmanDecoder::new(&tree)
            .decode(&bitstream(&[0b0110_1000, 0b1000_0000], 7, 4))
            .unwrap();
        assert_eq!(decoded, vec!['D', 'C', 'B', 'A']);
    }

    #[test]
    fn test_decode_stops_after_symbol_count() {
        let tree = tree_for("AAAAABBCD");
        // 1 1 then padding zeros, which would decode to B's if read as code bits
        let decoded = HuffmanDecoder::new(&tree)
            .decode(&bitstream(&[0b1100_0000], 6, 2))
            .unwrap();
        assert_eq!(decoded, vec!['A', 'A']);
    }

    #[test]
    fn test_decode_truncated() {
        let tree = tree_for("AAAAABBCD");
        let result = HuffmanDecoder::new(&tree).decode(&bitstream(&[0b1100_0000], 0, 20));
        assert!(matches!(
            result,
            Err(CodingError::TruncatedBitstream {
                expected: 20,
                ..
            })
        ));
    }

    #[test]
    fn test_decode_truncated_inside_code_word() {
        let tree = tree_for("AAAAABBCD");
        // 1111111 then 0 which starts a code word that never ends
        let result = HuffmanDecoder::new(&tree).decode(&bitstream(&[0b1111_1110], 0, 8));
        assert!(matches!(
            result,
            Err(CodingError::TruncatedBitstream {
                decoded: 7,
                expected: 8
            })
        ));
    }

    #[test]
    fn test_decode_rejects_count_beyond_bit_count() {
        let tree = tree_for("AAAAABBCD");
        let result = HuffmanDecoder::new(&tree).decode(&bitstream(&[], 0, 1 << 62));
        assert!(matches!(
            result,
            Err(CodingError::TruncatedBitstream {
                decoded: 0,
                expected: 4_611_686_018_427_387_904
            })
        ));
        let single = tree_for("X");
        let result = HuffmanDecoder::new(&single).decode(&bitstream(&[0], 0, 9));
        assert!(matches!(
            result,
            Err(CodingError::TruncatedBitstream { expected: 9, .. })
        ));
    }

    #[test]
    fn test_decode_rejects_invalid_padding_count() {
        let tree = tree_for("AB");
        let result = HuffmanDecoder::new(&tree).decode(&bitstream(&[0], 8, 1));
        assert!(matches!(result, Err(CodingError::InvalidPaddingBitCount(8))));
        let result = HuffmanDecoder::new(&tree).decode(&bitstream(&[], 3, 0));
        assert!(matches!(result, Err(CodingError::InvalidPaddingBitCount(3))));
    }

    #[test]
    fn test_decode_rejects_surplus_bits() {
        let tree = tree_for("AAAAABBCD");
        let result = HuffmanDecoder::new(&tree).decode(&bitstream(&[0b1100_0000, 0], 6, 2));
        assert!(matches!(
            result,
            Err(CodingError::InconsistentBitCount {
                unread_bits: 14,
                padding_bits: 6
            })
        ));
    }

    #[test]
    fn test_decode_rejects_set_padding_bits() {
        let tree = tree_for("AAAAABBCD");
        let result = HuffmanDecoder::new(&tree).decode(&bitstream(&[0b1100_0001], 6, 2));
        assert!(matches!(result, Err(CodingError::NonZeroPaddingBits)));
    }

    #[test]
    fn test_decode_single_leaf() {
        let tree = tree_for("XXXXXXXXXX");
        let decoded = HuffmanDecoder::new(&tree)
            .decode(&bitstream(&[0, 0], 6, 10))
            .unwrap();
        assert_eq!(decoded, vec!['X'; 10]);
    }

    #[test]
    fn test_decode_single_leaf_rejects_one_bits() {
        let tree = tree_for("XXXX");
        let result = HuffmanDecoder::new(&tree).decode(&bitstream(&[0b0010_0000], 4, 4));
        assert!(matches!(result, Err(CodingError::UnmatchedCodeBit(2))));
    }

    #[test]
    fn test_decode_with_empty_tree() {
        let tree = HuffmanTree::new(&FrequencyTable::<char>::new());
        let decoder = HuffmanDecoder::new(&tree);
        assert!(decoder.decode(&bitstream(&[], 0, 0)).unwrap().is_empty());
        let result = decoder.decode(&bitstream(&[0], 7, 1));
        assert!(matches!(result, Err(CodingError::MalformedTree(_))));
    }

    #[test]
    fn test_round_trip_newest_first() {
        let text = "the quick brown fox jumps over the lazy dog";
        let table: FrequencyTable<char> = text.chars().collect();
        let tree = HuffmanTree::with_tie_break(&table, TieBreak::NewestFirst);
        let codes = CodeTable::from(&tree);
        let symbols: Vec<char> = text.chars().collect();
        let encoded = HuffmanEncoder::new(&codes).encode(&symbols).unwrap();
        let decoded = HuffmanDecoder::new(&tree).decode(&encoded).unwrap();
        assert_eq!(decoded, symbols);
    }
}
