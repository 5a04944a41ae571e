use crc32fast::Hasher;

use crate::error::Error;
use crate::huffman::Symbol;
use crate::Result;

/// A symbol with a fixed little-endian byte representation, so it can be
/// stored in a container and checksummed.
pub trait WireSymbol: Symbol + Send + Sync + 'static {
    /// Width in bits
    const WIDTH: u8;

    fn write_le(&self, out: &mut Vec<u8>);

    /// `bytes` holds exactly `WIDTH / 8` bytes
    fn read_le(bytes: &[u8]) -> Self;

    fn byte_width() -> usize {
        Self::WIDTH as usize / 8
    }
}

impl WireSymbol for u8 {
    const WIDTH: u8 = 8;

    fn write_le(&self, out: &mut Vec<u8>) {
        out.push(*self);
    }

    fn read_le(bytes: &[u8]) -> Self {
        bytes[0]
    }
}

impl WireSymbol for i16 {
    const WIDTH: u8 = 16;

    fn write_le(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }

    fn read_le(bytes: &[u8]) -> Self {
        i16::from_le_bytes([bytes[0], bytes[1]])
    }
}

pub fn symbols_from_bytes<S: WireSymbol>(bytes: &[u8]) -> Result<Vec<S>> {
    let width = S::byte_width();
    if bytes.len() % width != 0 {
        return Err(Error::IncompleteSample(bytes.len()));
    }
    Ok(bytes.chunks_exact(width).map(S::read_le).collect())
}

pub fn symbols_to_bytes<S: WireSymbol>(symbols: &[S]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(symbols.len() * S::byte_width());
    for symbol in symbols {
        symbol.write_le(&mut bytes);
    }
    bytes
}

/// CRC-32 (IEEE) over the little-endian representation of `symbols`
pub fn checksum_of<S: WireSymbol>(symbols: &[S]) -> u32 {
    let mut crc = Hasher::new();
    let mut buffer = Vec::with_capacity(S::byte_width());
    for symbol in symbols {
        buffer.clear();
        symbol.write_le(&mut buffer);
        crc.update(&buffer);
    }
    crc.finalize()
}

#[cfg(test)]
mod test {
    use super::{checksum_of, symbols_from_bytes, symbols_to_bytes};
    use crate::error::Error;

    #[test]
    fn test_bytes_are_their_own_symbols() {
        let symbols: Vec<u8> = symbols_from_bytes(b"hello").unwrap();
        assert_eq!(symbols, b"hello".to_vec());
        assert_eq!(symbols_to_bytes(&symbols), b"hello".to_vec());
    }

    #[test]
    fn test_samples_are_little_endian() {
        let symbols: Vec<i16> = symbols_from_bytes(&[0x01, 0x00, 0xFF, 0xFF, 0x00, 0x80]).unwrap();
        assert_eq!(symbols, vec![1, -1, i16::MIN]);
        assert_eq!(
            symbols_to_bytes(&symbols),
            vec![0x01, 0x00, 0xFF, 0xFF, 0x00, 0x80]
        );
    }

    #[test]
    fn test_incomplete_sample() {
        let result = symbols_from_bytes::<i16>(&[1, 2, 3]);
        assert!(matches!(result, Err(Error::IncompleteSample(3))));
    }

    #[test]
    fn test_check_value() {
        assert_eq!(checksum_of(b"123456789"), 0xCBF4_3926);
    }

    #[test]
    fn test_checksum_of_empty_input() {
        assert_eq!(checksum_of::<u8>(&[]), 0);
    }

    #[test]
    fn test_checksum_matches_byte_representation() {
        let symbols: Vec<i16> = vec![300, -2, 17];
        assert_eq!(
            checksum_of(&symbols),
            crc32fast::hash(&symbols_to_bytes(&symbols))
        );
    }
}
