use crate::block::DEFAULT_BLOCK_SIZE;
use crate::huffman::TieBreak;
use crate::{Arguments, CompressOptions, DecompressOptions, Operation, StatsOptions, SymbolWidth};
use clap::{
    arg, builder::PossibleValue, crate_authors, crate_description, crate_name, crate_version,
    value_parser, Arg, ArgMatches, Command, ValueEnum,
};
use std::ffi::OsString;
use std::path::PathBuf;
use std::{io, thread};

const DEFAULT_REPORT_ROWS: usize = 20;

pub struct CLIParser {
    command: Command,
}

impl CLIParser {
    pub fn new() -> Self {
        let command = Self::create_base_command();
        let command = Self::register_subcommands(command);
        CLIParser { command }
    }

    pub fn parse<I, T>(&mut self, itr: I) -> Arguments
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self
            .command
            .try_get_matches_from_mut(itr)
            .unwrap_or_else(|e| e.exit());
        Self::extract_arguments(&matches)
    }

    fn register_subcommands(command: Command) -> Command {
        command
            .subcommand_required(true)
            .arg_required_else_help(true)
            .subcommand(Self::create_compress_command())
            .subcommand(Self::create_decompress_command())
            .subcommand(Self::create_stats_command())
    }

    fn create_compress_command() -> Command {
        let command = Command::new("compress").about("Compress a file into a container");
        let command = Self::register_input_file_argument(command);
        let command = Self::register_output_file_argument(command);
        let command = Self::register_symbol_width_argument(command);
        let command = Self::register_block_size_argument(command);
        let command = Self::register_tie_break_argument(command);
        Self::register_threads_argument(command)
    }

    fn create_decompress_command() -> Command {
        let command = Command::new("decompress").about("Restore a file from a container");
        let command = Self::register_input_file_argument(command);
        let command = Self::register_output_file_argument(command);
        Self::register_threads_argument(command)
    }

    fn create_stats_command() -> Command {
        let command =
            Command::new("stats").about("Print symbol frequencies, codes and entropy of a file");
        let command = Self::register_input_file_argument(command);
        let command = Self::register_symbol_width_argument(command);
        let command = Self::register_top_argument(command);
        Self::register_tree_argument(command)
    }

    fn register_input_file_argument(command: Command) -> Command {
        command.arg(Self::create_input_file_argument())
    }

    fn register_output_file_argument(command: Command) -> Command {
        command.arg(Self::create_output_file_argument())
    }

    fn register_symbol_width_argument(command: Command) -> Command {
        command.arg(Self::create_symbol_width_argument())
    }

    fn register_block_size_argument(command: Command) -> Command {
        command.arg(Self::create_block_size_argument())
    }

    fn register_tie_break_argument(command: Command) -> Command {
        command.arg(Self::create_tie_break_argument())
    }

    fn register_threads_argument(command: Command) -> Command {
        command.arg(Self::create_threads_argument())
    }

    fn register_top_argument(command: Command) -> Command {
        command.arg(Self::create_top_argument())
    }

    fn register_tree_argument(command: Command) -> Command {
        command.arg(Self::create_tree_argument())
    }

    fn create_base_command() -> Command {
        Command::new(crate_name!())
            .version(crate_version!())
            .author(crate_authors!())
            .about(crate_description!())
    }

    fn create_input_file_argument() -> Arg {
        Arg::new("input_file")
            .help("Path to input file")
            .value_parser(value_parser!(PathBuf))
            .required(true)
    }

    fn create_output_file_argument() -> Arg {
        Arg::new("output_file")
            .help("Path to output file")
            .value_parser(value_parser!(PathBuf))
            .required(true)
    }

    fn create_symbol_width_argument() -> Arg {
        arg!(symbol_width: -w --symbol_width <BITS> "Bits per symbol, 16 reads little endian samples")
            .default_value("8")
            .value_parser(value_parser!(SymbolWidth))
    }

    fn create_block_size_argument() -> Arg {
        arg!(block_size: -b --block_size <SYMBOLS> "Symbols per independently coded block")
            .default_value(DEFAULT_BLOCK_SIZE.to_string())
            .value_parser(value_parser!(u64).range(1..))
    }

    fn create_tie_break_argument() -> Arg {
        arg!(tie_break: --tie_break <RULE> "Which of two equally frequent nodes is merged first")
            .default_value("oldest")
            .value_parser(value_parser!(TieBreak))
    }

    fn create_threads_argument() -> Arg {
        arg!(-t --threads <THREADS> "Number of Threads")
            .default_value(get_number_of_threads().unwrap_or(1).to_string())
            .required(false)
            .value_parser(value_parser!(usize))
    }

    fn create_top_argument() -> Arg {
        arg!(top: -n --top <COUNT> "Number of most frequent symbols listed")
            .default_value(DEFAULT_REPORT_ROWS.to_string())
            .value_parser(value_parser!(usize))
    }

    fn create_tree_argument() -> Arg {
        arg!(tree: --tree "Also print the code tree")
    }

    fn extract_arguments(matches: &ArgMatches) -> Arguments {
        match matches.subcommand() {
            Some(("compress", matches)) => Arguments {
                operation: Operation::Compress(CompressOptions {
                    input_file: Self::extract_input_file_argument(matches),
                    output_file: Self::extract_output_file_argument(matches),
                    symbol_width: Self::extract_symbol_width_argument(matches),
                    block_size: Self::extract_block_size_argument(matches),
                    tie_break: Self::extract_tie_break_argument(matches),
                }),
                number_of_threads: Self::extract_threads_argument(matches),
            },
            Some(("decompress", matches)) => Arguments {
                operation: Operation::Decompress(DecompressOptions {
                    input_file: Self::extract_input_file_argument(matches),
                    output_file: Self::extract_output_file_argument(matches),
                }),
                number_of_threads: Self::extract_threads_argument(matches),
            },
            Some(("stats", matches)) => Arguments {
                operation: Operation::Stats(StatsOptions {
                    input_file: Self::extract_input_file_argument(matches),
                    symbol_width: Self::extract_symbol_width_argument(matches),
                    top: Self::extract_top_argument(matches),
                    show_tree: Self::extract_tree_argument(matches),
                }),
                number_of_threads: 1,
            },
            _ => unreachable!("Subcommand is required"),
        }
    }

    fn extract_input_file_argument(matches: &ArgMatches) -> PathBuf {
        matches
            .get_one::<PathBuf>("input_file")
            .expect("Required argument input_file not provided")
            .clone()
    }

    fn extract_output_file_argument(matches: &ArgMatches) -> PathBuf {
        matches
            .get_one::<PathBuf>("output_file")
            .expect("Required argument output_file not provided")
            .clone()
    }

    fn extract_symbol_width_argument(matches: &ArgMatches) -> SymbolWidth {
        matches
            .get_one::<SymbolWidth>("symbol_width")
            .expect("Symbol width must be provided, but was unset.")
            .to_owned()
    }

    fn extract_block_size_argument(matches: &ArgMatches) -> usize {
        let block_size = matches
            .get_one::<u64>("block_size")
            .expect("Block size must be provided, but was unset.")
            .to_owned();
        usize::try_from(block_size).unwrap_or(usize::MAX)
    }

    fn extract_tie_break_argument(matches: &ArgMatches) -> TieBreak {
        matches
            .get_one::<TieBreak>("tie_break")
            .expect("Tie-break rule must be provided, but was unset.")
            .to_owned()
    }

    fn extract_threads_argument(matches: &ArgMatches) -> usize {
        matches
            .get_one::<usize>("threads")
            .expect("Required argument threads not provided")
            .to_owned()
    }

    fn extract_top_argument(matches: &ArgMatches) -> usize {
        matches
            .get_one::<usize>("top")
            .expect("Number of listed symbols must be provided, but was unset.")
            .to_owned()
    }

    fn extract_tree_argument(matches: &ArgMatches) -> bool {
        matches.get_flag("tree")
    }
}

impl Default for CLIParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueEnum for SymbolWidth {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Bits8, Self::Bits16]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        match self {
            Self::Bits8 => Some(PossibleValue::new("8")),
            Self::Bits16 => Some(PossibleValue::new("16")),
        }
    }
}

impl ValueEnum for TieBreak {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::OldestFirst, Self::NewestFirst]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        match self {
            Self::OldestFirst => Some(PossibleValue::new("oldest")),
            Self::NewestFirst => Some(PossibleValue::new("newest")),
        }
    }
}

fn get_number_of_threads() -> io::Result<usize> {
    Ok(thread::available_parallelism()?.get())
}
