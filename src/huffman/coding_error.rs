use std::fmt::Display;

#[derive(Debug)]
pub enum CodingError {
    UnknownSymbol(String),
    BitWriterError(std::io::Error),
    TruncatedBitstream {
        decoded: usize,
        expected: usize,
    },
    MalformedTree(&'static str),
    InvalidPaddingBitCount(u8),
    InconsistentBitCount {
        unread_bits: usize,
        padding_bits: u8,
    },
    NonZeroPaddingBits,
    UnmatchedCodeBit(usize),
    InvalidFrequencyTable(&'static str),
}

impl Display for CodingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownSymbol(symbol) => {
                write!(f, "Symbol {} is not present in the code table", symbol)
            }
            Self::BitWriterError(error) => write!(f, "Failed to write bits: {}", error),
            Self::TruncatedBitstream { decoded, expected } => write!(
                f,
                "Bitstream ended after {} of {} symbols",
                decoded, expected
            ),
            Self::MalformedTree(reason) => write!(f, "Malformed Huffman tree: {}", reason),
            Self::InvalidPaddingBitCount(count) => {
                write!(f, "Invalid number of padding bits: {}", count)
            }
            Self::InconsistentBitCount {
                unread_bits,
                padding_bits,
            } => write!(
                f,
                "{} bits left after the last symbol, but {} padding bits were announced",
                unread_bits, padding_bits
            ),
            Self::NonZeroPaddingBits => write!(f, "Padding bits must be zero"),
            Self::UnmatchedCodeBit(position) => {
                write!(f, "Bit at position {} does not match any code word", position)
            }
            Self::InvalidFrequencyTable(reason) => {
                write!(f, "Invalid frequency table: {}", reason)
            }
        }
    }
}

impl std::error::Error for CodingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::BitWriterError(error) => Some(error),
            _ => None,
        }
    }
}
