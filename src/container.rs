//! On-disk layout of a compressed file, all integers little endian:
//!
//! ```text
//! magic "HUFC" | version u8 | symbol width u8 | tie-break u8 | block count u32
//! per block:
//!   symbol count u64 | padding bits u8 | crc32 u32 | distinct symbols u32
//!   distinct x (symbol | frequency u64)
//!   payload length u64 | payload
//! ```

use std::io::{self, Read, Write};

use crate::block::CompressedBlock;
use crate::error::Error;
use crate::huffman::{EncodedBitstream, FrequencyTable, SymbolFrequency, TieBreak};
use crate::logger::log_block;
use crate::symbol::WireSymbol;
use crate::Result;

pub const MAGIC: [u8; 4] = *b"HUFC";
pub const VERSION: u8 = 1;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContainerHeader {
    pub symbol_width: u8,
    pub tie_break: TieBreak,
    pub block_count: u32,
}

impl ContainerHeader {
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        let mut bytes = Vec::with_capacity(11);
        bytes.extend_from_slice(&MAGIC);
        bytes.push(VERSION);
        bytes.push(self.symbol_width);
        bytes.push(self.tie_break.id());
        bytes.extend_from_slice(&self.block_count.to_le_bytes());
        writer.write_all(&bytes).map_err(Error::FailedToWriteOutput)
    }

    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let mut magic = [0u8; 4];
        read_exact(reader, &mut magic, "magic")?;
        if magic != MAGIC {
            return Err(Error::InvalidMagic(magic));
        }
        let version = read_u8(reader, "version")?;
        if version != VERSION {
            return Err(Error::UnsupportedVersion(version));
        }
        let symbol_width = read_u8(reader, "symbol width")?;
        if symbol_width != 8 && symbol_width != 16 {
            return Err(Error::UnsupportedSymbolWidth(symbol_width));
        }
        let tie_break_id = read_u8(reader, "tie-break rule")?;
        let tie_break =
            TieBreak::from_id(tie_break_id).ok_or(Error::UnknownTieBreak(tie_break_id))?;
        let block_count = read_u32(reader, "block count")?;
        Ok(Self {
            symbol_width,
            tie_break,
            block_count,
        })
    }
}

/// All blocks of one compressed file. Every block was built with the same
/// tie-break rule, the decoder needs it to rebuild identical trees.
#[derive(Clone, Debug, PartialEq)]
pub struct Container<S> {
    tie_break: TieBreak,
    blocks: Vec<CompressedBlock<S>>,
}

impl<S> Container<S> {
    pub fn new(tie_break: TieBreak, blocks: Vec<CompressedBlock<S>>) -> Self {
        Self { tie_break, blocks }
    }

    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    pub fn blocks(&self) -> &[CompressedBlock<S>] {
        &self.blocks
    }

    pub fn into_blocks(self) -> Vec<CompressedBlock<S>> {
        self.blocks
    }

    pub fn symbol_count(&self) -> usize {
        self.blocks.iter().map(CompressedBlock::symbol_count).sum()
    }
}

impl<S: WireSymbol> Container<S> {
    pub fn header(&self) -> ContainerHeader {
        ContainerHeader {
            symbol_width: S::WIDTH,
            tie_break: self.tie_break,
            block_count: self.blocks.len() as u32,
        }
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        log::info!(
            "Writing {} blocks of {} bit symbols ({} symbols in total)",
            self.blocks.len(),
            S::WIDTH,
            self.symbol_count()
        );
        self.header().write_to(writer)?;
        for (index, block) in self.blocks.iter().enumerate() {
            let bytes = serialize_block(block);
            log_block(
                index,
                block.symbol_count(),
                block.table().len(),
                &block.bitstream().bytes,
                block.bitstream().padding_bits,
            );
            writer.write_all(&bytes).map_err(Error::FailedToWriteOutput)?;
        }
        writer.flush().map_err(Error::FailedToWriteOutput)
    }

    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let header = ContainerHeader::read_from(reader)?;
        Self::read_blocks(header, reader)
    }

    /// Reads the blocks following an already parsed header.
    pub fn read_blocks<R: Read>(header: ContainerHeader, reader: &mut R) -> Result<Self> {
        if header.symbol_width != S::WIDTH {
            return Err(Error::SymbolWidthMismatch {
                expected: S::WIDTH,
                found: header.symbol_width,
            });
        }
        let mut blocks = Vec::new();
        for index in 0..header.block_count as usize {
            blocks.push(deserialize_block(index, reader)?);
        }
        log::info!(
            "Read {} blocks of {} bit symbols",
            blocks.len(),
            header.symbol_width
        );
        Ok(Self {
            tie_break: header.tie_break,
            blocks,
        })
    }
}

fn serialize_block<S: WireSymbol>(block: &CompressedBlock<S>) -> Vec<u8> {
    let bitstream = block.bitstream();
    let table = block.table();
    let mut bytes =
        Vec::with_capacity(25 + table.len() * (S::byte_width() + 8) + bitstream.bytes.len());
    bytes.extend_from_slice(&(bitstream.symbol_count as u64).to_le_bytes());
    bytes.push(bitstream.padding_bits);
    bytes.extend_from_slice(&block.checksum().to_le_bytes());
    bytes.extend_from_slice(&(table.len() as u32).to_le_bytes());
    for entry in table.iter() {
        entry.symbol.write_le(&mut bytes);
        bytes.extend_from_slice(&(entry.frequency as u64).to_le_bytes());
    }
    bytes.extend_from_slice(&(bitstream.bytes.len() as u64).to_le_bytes());
    bytes.extend_from_slice(&bitstream.bytes);
    bytes
}

fn deserialize_block<S: WireSymbol, R: Read>(
    index: usize,
    reader: &mut R,
) -> Result<CompressedBlock<S>> {
    let symbol_count = read_u64(reader, "block symbol count")?;
    let padding_bits = read_u8(reader, "block padding")?;
    let checksum = read_u32(reader, "block checksum")?;
    let distinct = read_u32(reader, "frequency table size")? as usize;

    // sizes come from untrusted input, never preallocate more than a bounded amount
    let mut entries = Vec::with_capacity(distinct.min(1 << 16));
    let mut symbol_bytes = vec![0u8; S::byte_width()];
    for _ in 0..distinct {
        read_exact(reader, &mut symbol_bytes, "frequency table")?;
        let frequency = read_u64(reader, "frequency table")?;
        entries.push(SymbolFrequency {
            symbol: S::read_le(&symbol_bytes),
            frequency: to_usize(frequency, "frequency table")?,
        });
    }
    let table = FrequencyTable::from_entries(entries)?;

    let payload_length = read_u64(reader, "payload length")?;
    let mut payload = Vec::new();
    reader
        .by_ref()
        .take(payload_length)
        .read_to_end(&mut payload)
        .map_err(Error::FailedToReadInput)?;
    if payload.len() as u64 != payload_length {
        return Err(Error::TruncatedContainer("payload"));
    }

    let bitstream = EncodedBitstream {
        bytes: payload,
        padding_bits,
        symbol_count: to_usize(symbol_count, "block symbol count")?,
    };
    CompressedBlock::from_parts(index, table, bitstream, checksum)
}

fn to_usize(value: u64, section: &'static str) -> Result<usize> {
    usize::try_from(value).map_err(|_| Error::TruncatedContainer(section))
}

fn read_exact<R: Read>(reader: &mut R, buffer: &mut [u8], section: &'static str) -> Result<()> {
    reader.read_exact(buffer).map_err(|error| match error.kind() {
        io::ErrorKind::UnexpectedEof => Error::TruncatedContainer(section),
        _ => Error::FailedToReadInput(error),
    })
}

fn read_u8<R: Read>(reader: &mut R, section: &'static str) -> Result<u8> {
    let mut buffer = [0u8; 1];
    read_exact(reader, &mut buffer, section)?;
    Ok(buffer[0])
}

fn read_u32<R: Read>(reader: &mut R, section: &'static str) -> Result<u32> {
    let mut buffer = [0u8; 4];
    read_exact(reader, &mut buffer, section)?;
    Ok(u32::from_le_bytes(buffer))
}

fn read_u64<R: Read>(reader: &mut R, section: &'static str) -> Result<u64> {
    let mut buffer = [0u8; 8];
    read_exact(reader, &mut buffer, section)?;
    Ok(u64::from_le_bytes(buffer))
}
