use std::{
    fmt,
    fs::{File, OpenOptions},
    io::{self, BufWriter, Read, Write},
    path::{Path, PathBuf},
};

use block::{BlockCoder, DEFAULT_BLOCK_SIZE};
pub use cli::CLIParser;
use container::{Container, ContainerHeader};
use error::Error;
use huffman::{
    build_frequency_table, build_tree, generate_codes, statistics::SymbolReport, TieBreak,
};
use symbol::{symbols_from_bytes, symbols_to_bytes, WireSymbol};
use threadpool::ThreadPool;

pub mod binary_stream;
pub mod block;
mod cli;
pub mod container;
pub mod error;
pub mod huffman;
mod logger;
pub mod symbol;

pub type Result<T> = std::result::Result<T, error::Error>;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SymbolWidth {
    Bits8,
    Bits16,
}

pub struct CompressOptions {
    input_file: PathBuf,
    output_file: PathBuf,
    symbol_width: SymbolWidth,
    block_size: usize,
    tie_break: TieBreak,
}

pub struct DecompressOptions {
    input_file: PathBuf,
    output_file: PathBuf,
}

pub struct StatsOptions {
    input_file: PathBuf,
    symbol_width: SymbolWidth,
    top: usize,
    show_tree: bool,
}

pub enum Operation {
    Compress(CompressOptions),
    Decompress(DecompressOptions),
    Stats(StatsOptions),
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compress(_) => write!(f, "Compression"),
            Self::Decompress(_) => write!(f, "Decompression"),
            Self::Stats(_) => write!(f, "Analysis"),
        }
    }
}

pub struct Arguments {
    operation: Operation,
    number_of_threads: usize,
}

impl Arguments {
    pub fn operation(&self) -> &Operation {
        &self.operation
    }
}

fn open_input_file(file_path: &Path) -> Result<File> {
    File::open(file_path).map_err(|e| {
        Error::UnableToOpenInputFileForReading(file_path.display().to_string(), e)
    })
}

fn open_output_file(file_path: &Path) -> Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(file_path)
        .map_err(|e| {
            Error::UnableToOpenOutputFileForWriting(file_path.display().to_string(), e)
        })
}

fn read_input_file(file_path: &Path) -> Result<Vec<u8>> {
    let mut input_file = open_input_file(file_path)?;
    let mut bytes = Vec::new();
    input_file
        .read_to_end(&mut bytes)
        .map_err(Error::FailedToReadInput)?;
    Ok(bytes)
}

pub fn run(arguments: &Arguments) -> Result<()> {
    let threadpool = ThreadPool::new(arguments.number_of_threads.max(1));
    match &arguments.operation {
        Operation::Compress(options) => compress(options, &threadpool),
        Operation::Decompress(options) => decompress(options, &threadpool),
        Operation::Stats(options) => write_statistics(options, &mut io::stdout().lock()),
    }
}

fn compress(options: &CompressOptions, threadpool: &ThreadPool) -> Result<()> {
    let bytes = read_input_file(&options.input_file)?;
    match options.symbol_width {
        SymbolWidth::Bits8 => compress_symbols::<u8>(&bytes, options, threadpool),
        SymbolWidth::Bits16 => compress_symbols::<i16>(&bytes, options, threadpool),
    }
}

fn compress_symbols<S: WireSymbol>(
    bytes: &[u8],
    options: &CompressOptions,
    threadpool: &ThreadPool,
) -> Result<()> {
    let symbols = symbols_from_bytes::<S>(bytes)?;
    let coder = BlockCoder::new(threadpool, options.block_size, options.tie_break);
    let container = coder.encode(&symbols)?;
    let output_file = open_output_file(&options.output_file)?;
    let mut output_file_writer = BufWriter::new(&output_file);
    container.write_to(&mut output_file_writer)
}

fn decompress(options: &DecompressOptions, threadpool: &ThreadPool) -> Result<()> {
    let bytes = read_input_file(&options.input_file)?;
    let mut reader = bytes.as_slice();
    let header = ContainerHeader::read_from(&mut reader)?;
    let output = match header.symbol_width {
        8 => decompress_symbols::<u8>(header, &mut reader, threadpool)?,
        16 => decompress_symbols::<i16>(header, &mut reader, threadpool)?,
        width => return Err(Error::UnsupportedSymbolWidth(width)),
    };
    if !reader.is_empty() {
        log::warn!("Ignoring {} bytes after the last block", reader.len());
    }
    let output_file = open_output_file(&options.output_file)?;
    let mut output_file_writer = BufWriter::new(&output_file);
    output_file_writer
        .write_all(&output)
        .and_then(|_| output_file_writer.flush())
        .map_err(Error::FailedToWriteOutput)
}

fn decompress_symbols<S: WireSymbol>(
    header: ContainerHeader,
    reader: &mut &[u8],
    threadpool: &ThreadPool,
) -> Result<Vec<u8>> {
    let container = Container::<S>::read_blocks(header, reader)?;
    let coder = BlockCoder::new(threadpool, DEFAULT_BLOCK_SIZE, container.tie_break());
    let symbols = coder.decode(container)?;
    Ok(symbols_to_bytes(&symbols))
}

/// Writes the frequency report of the whole input, treated as one block.
pub fn write_statistics<W: Write>(options: &StatsOptions, out: &mut W) -> Result<()> {
    let bytes = read_input_file(&options.input_file)?;
    match options.symbol_width {
        SymbolWidth::Bits8 => write_symbol_statistics::<u8, W>(&bytes, options, out),
        SymbolWidth::Bits16 => write_symbol_statistics::<i16, W>(&bytes, options, out),
    }
}

fn write_symbol_statistics<S: WireSymbol, W: Write>(
    bytes: &[u8],
    options: &StatsOptions,
    out: &mut W,
) -> Result<()> {
    let symbols = symbols_from_bytes::<S>(bytes)?;
    let table = build_frequency_table(&symbols);
    let tree = build_tree(&table);
    let codes = generate_codes(&tree);
    let report = SymbolReport::new(&table, &codes, options.top);
    write!(out, "{}", report).map_err(Error::FailedToWriteOutput)?;
    writeln!(
        out,
        "Tree depth:                  {}\nLongest code:                {} bits",
        tree.depth(),
        codes.max_length()
    )
    .map_err(Error::FailedToWriteOutput)?;
    if options.show_tree {
        write!(out, "\n{}", tree).map_err(Error::FailedToWriteOutput)?;
    }
    Ok(())
}
