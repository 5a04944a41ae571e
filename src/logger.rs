use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

const CONFIG_FILE: &str = "log4rs.yaml";
const FALLBACK_PATTERN: &str = "{d(%H:%M:%S%.3f)} {h({l:<5})} {t} - {m}{n}";
const PAYLOAD_PREVIEW_BYTES: usize = 16;

#[ctor::ctor]
fn init() {
    if log4rs::init_file(CONFIG_FILE, Default::default()).is_err() {
        init_fallback();
    }
}

/// Warnings to stderr when no configuration file is found next to the binary.
fn init_fallback() {
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(FALLBACK_PATTERN)))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(LevelFilter::Warn));
    match config {
        Ok(config) => {
            // fails only if a logger is already installed
            let _ = log4rs::init_config(config);
        }
        Err(errors) => eprintln!("Invalid fallback logging configuration: {}", errors),
    }
}

pub fn log_block(
    index: usize,
    symbol_count: usize,
    distinct_symbols: usize,
    payload: &[u8],
    padding_bits: u8,
) {
    fn get_byte_array(bytes: &[u8]) -> Vec<String> {
        bytes.iter().map(|byte| format!("{:02X}", byte)).collect()
    }
    let preview = &payload[..payload.len().min(PAYLOAD_PREVIEW_BYTES)];
    log::info!(
        "block {}: {} symbols, {} distinct, {} payload bytes, {} padding bits\n{:?}",
        index,
        symbol_count,
        distinct_symbols,
        payload.len(),
        padding_bits,
        get_byte_array(preview)
    );
}
