use std::fmt::Display;

use crate::huffman::CodingError;

#[derive(Debug)]
pub enum Error {
    UnableToOpenInputFileForReading(String, std::io::Error),
    UnableToOpenOutputFileForWriting(String, std::io::Error),
    FailedToReadInput(std::io::Error),
    FailedToWriteOutput(std::io::Error),
    IncompleteSample(usize),
    InvalidMagic([u8; 4]),
    UnsupportedVersion(u8),
    UnsupportedSymbolWidth(u8),
    SymbolWidthMismatch { expected: u8, found: u8 },
    UnknownTieBreak(u8),
    TruncatedContainer(&'static str),
    SymbolCountMismatch { block: usize, header: u64, table: usize },
    ChecksumMismatch { block: usize, expected: u32, actual: u32 },
    BlockWorkerFailed(usize),
    Coding(CodingError),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnableToOpenInputFileForReading(path, error) => {
                write!(
                    f,
                    "Unable to open input file '{}' for reading: {}",
                    path, error
                )
            }
            Self::UnableToOpenOutputFileForWriting(path, error) => {
                write!(
                    f,
                    "Unable to open output file '{}' for writing: {}",
                    path, error
                )
            }
            Self::FailedToReadInput(error) => write!(f, "Failed to read input: {}", error),
            Self::FailedToWriteOutput(error) => write!(f, "Failed to write output: {}", error),
            Self::IncompleteSample(length) => {
                write!(
                    f,
                    "Input of {} bytes does not split into whole 16 bit samples",
                    length
                )
            }
            Self::InvalidMagic(magic) => {
                write!(f, "Not a compressed stream, found magic {:02X?}", magic)
            }
            Self::UnsupportedVersion(version) => {
                write!(f, "Unsupported container version {}", version)
            }
            Self::UnsupportedSymbolWidth(width) => {
                write!(f, "Unsupported symbol width of {} bits", width)
            }
            Self::SymbolWidthMismatch { expected, found } => write!(
                f,
                "Container holds {} bit symbols, but {} bit symbols were requested",
                found, expected
            ),
            Self::UnknownTieBreak(id) => write!(f, "Unknown tie-break rule {}", id),
            Self::TruncatedContainer(section) => {
                write!(f, "Container ended while reading {}", section)
            }
            Self::SymbolCountMismatch {
                block,
                header,
                table,
            } => write!(
                f,
                "Block {} announces {} symbols, but its frequency table counts {}",
                block, header, table
            ),
            Self::ChecksumMismatch {
                block,
                expected,
                actual,
            } => write!(
                f,
                "Checksum mismatch in block {}: expected {:08X}, got {:08X}",
                block, expected, actual
            ),
            Self::BlockWorkerFailed(block) => {
                write!(f, "Worker for block {} terminated without a result", block)
            }
            Self::Coding(error) => write!(f, "{}", error),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::UnableToOpenInputFileForReading(_, error)
            | Self::UnableToOpenOutputFileForWriting(_, error)
            | Self::FailedToReadInput(error)
            | Self::FailedToWriteOutput(error) => Some(error),
            Self::Coding(error) => Some(error),
            _ => None,
        }
    }
}

impl From<CodingError> for Error {
    fn from(value: CodingError) -> Self {
        Self::Coding(value)
    }
}
