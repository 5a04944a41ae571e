use std::env::args_os;
use std::process::ExitCode;

use dmmt_huffman_coder::{run, CLIParser};

fn main() -> ExitCode {
    let mut cli_parser = CLIParser::default();
    let arguments = cli_parser.parse(args_os());
    match run(&arguments) {
        Ok(_) => {
            eprintln!("{} successful", arguments.operation());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{} failed because of: {}", arguments.operation(), e);
            ExitCode::FAILURE
        }
    }
}
