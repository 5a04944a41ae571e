use crate::binary_stream::BitWriter;
use std::io::Write;

use super::{CodeTable, CodingError, Symbol};

/// Packed code bits plus what a decoder needs to stop at the right place.
///
/// Bits are packed most significant bit first, the last byte is filled up
/// with `padding_bits` zero bits.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EncodedBitstream {
    pub bytes: Vec<u8>,
    pub padding_bits: u8,
    pub symbol_count: usize,
}

impl EncodedBitstream {
    /// Number of code bits, padding excluded
    pub fn bit_count(&self) -> usize {
        (self.bytes.len() * 8).saturating_sub(self.padding_bits as usize)
    }
}

pub struct HuffmanEncoder<'a, S> {
    code_table: &'a CodeTable<S>,
}

impl<'a, S: Symbol> HuffmanEncoder<'a, S> {
    pub fn new(code_table: &'a CodeTable<S>) -> Self {
        Self { code_table }
    }

    /// Writes the code words of `symbols` into `bitwriter` without flushing it.
    pub fn encode_sequence<T: Write>(
        &self,
        symbols: &[S],
        bitwriter: &mut BitWriter<T>,
    ) -> Result<(), CodingError> {
        for symbol in symbols {
            let code_word = self
                .code_table
                .get(symbol)
                .ok_or_else(|| CodingError::UnknownSymbol(format!("{:?}", symbol)))?;
            bitwriter
                .write_code_word(code_word.pattern(), code_word.length())
                .map_err(CodingError::BitWriterError)?;
        }
        Ok(())
    }

    pub fn encode(&self, symbols: &[S]) -> Result<EncodedBitstream, CodingError> {
        let mut bytes = Vec::new();
        let mut bitwriter = BitWriter::new(&mut bytes);
        self.encode_sequence(symbols, &mut bitwriter)?;
        let padding_bits = bitwriter.finish().map_err(CodingError::BitWriterError)?;
        Ok(EncodedBitstream {
            bytes,
            padding_bits,
            symbol_count: symbols.len(),
        })
    }
}
