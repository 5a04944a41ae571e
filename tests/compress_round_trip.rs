use dmmt_huffman_coder::{run, write_statistics, CLIParser, Operation};
use std::fs;
use std::path::PathBuf;

fn get_work_path(file_name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_TARGET_TMPDIR"));
    path.push(file_name);
    path
}

fn cleanup(paths: &[&PathBuf]) {
    for path in paths {
        if path.exists() && path.is_file() {
            fs::remove_file(path).expect("Deletion of output file failed");
        }
    }
}

fn run_cli(arguments: &[&str]) {
    let mut cli_parser = CLIParser::new();
    let mut command_line = vec!["test"];
    command_line.extend_from_slice(arguments);
    let arguments = cli_parser.parse(command_line);
    run(&arguments).expect("Operation failed");
}

fn round_trip(name: &str, content: &[u8], compress_options: &[&str]) {
    let input_path = get_work_path(&format!("{}.raw", name));
    let compressed_path = get_work_path(&format!("{}.huf", name));
    let restored_path = get_work_path(&format!("{}.restored", name));
    cleanup(&[&input_path, &compressed_path, &restored_path]);
    fs::write(&input_path, content).expect("Writing input file failed");

    let mut compress = vec![
        "compress",
        input_path.to_str().unwrap(),
        compressed_path.to_str().unwrap(),
    ];
    compress.extend_from_slice(compress_options);
    run_cli(&compress);
    assert!(compressed_path.exists(), "Compressed file was not created");

    run_cli(&[
        "decompress",
        compressed_path.to_str().unwrap(),
        restored_path.to_str().unwrap(),
        "-t",
        "2",
    ]);
    let restored = fs::read(&restored_path).expect("Reading restored file failed");
    assert_eq!(restored, content, "Restored content differs for {}", name);

    cleanup(&[&input_path, &compressed_path, &restored_path]);
}

fn text_sample() -> Vec<u8> {
    "It was the best of times, it was the worst of times, it was the age of wisdom, \
     it was the age of foolishness"
        .repeat(50)
        .into_bytes()
}

fn audio_sample() -> Vec<u8> {
    (0..20_000)
        .map(|i| ((i as f64 * 0.013).sin() * 100.0).round() as i16)
        .flat_map(i16::to_le_bytes)
        .collect()
}

#[test]
fn test_round_trip_text() {
    round_trip("text", &text_sample(), &[]);
}

#[test]
fn test_round_trip_text_small_blocks_newest_first() {
    round_trip(
        "text_blocks",
        &text_sample(),
        &["-b", "97", "-t", "4", "--tie_break", "newest"],
    );
}

#[test]
fn test_round_trip_samples() {
    round_trip("samples", &audio_sample(), &["-w", "16", "-b", "4096"]);
}

#[test]
fn test_round_trip_single_symbol() {
    round_trip("single", &[b'X'; 10], &[]);
}

#[test]
fn test_round_trip_empty() {
    round_trip("empty", &[], &[]);
}

#[test]
fn test_compression_shrinks_skewed_input() {
    let input_path = get_work_path("skewed.raw");
    let compressed_path = get_work_path("skewed.huf");
    cleanup(&[&input_path, &compressed_path]);
    let content: Vec<u8> = (0..10_000u32)
        .map(|i| if i % 10 == 0 { b'b' } else { b'a' })
        .collect();
    fs::write(&input_path, &content).expect("Writing input file failed");
    run_cli(&[
        "compress",
        input_path.to_str().unwrap(),
        compressed_path.to_str().unwrap(),
    ]);
    let compressed_size = fs::metadata(&compressed_path).unwrap().len();
    assert!(
        compressed_size < content.len() as u64 / 4,
        "compressed size {} not below a quarter of {}",
        compressed_size,
        content.len()
    );
    cleanup(&[&input_path, &compressed_path]);
}

#[test]
fn test_odd_sample_input_rejected() {
    let input_path = get_work_path("odd.raw");
    let compressed_path = get_work_path("odd.huf");
    cleanup(&[&input_path, &compressed_path]);
    fs::write(&input_path, [1u8, 2, 3]).expect("Writing input file failed");
    let mut cli_parser = CLIParser::new();
    let arguments = cli_parser.parse(vec![
        "test",
        "compress",
        input_path.to_str().unwrap(),
        compressed_path.to_str().unwrap(),
        "-w",
        "16",
    ]);
    assert!(run(&arguments).is_err(), "Odd byte count not detected");
    assert!(!compressed_path.exists(), "Output written despite failure");
    cleanup(&[&input_path]);
}

#[test]
fn test_decompress_rejects_foreign_file() {
    let input_path = get_work_path("foreign.huf");
    let restored_path = get_work_path("foreign.restored");
    cleanup(&[&input_path, &restored_path]);
    fs::write(&input_path, b"definitely not compressed").expect("Writing input file failed");
    let mut cli_parser = CLIParser::new();
    let arguments = cli_parser.parse(vec![
        "test",
        "decompress",
        input_path.to_str().unwrap(),
        restored_path.to_str().unwrap(),
    ]);
    let error = run(&arguments).expect_err("Foreign file was accepted");
    assert!(error.to_string().contains("Not a compressed stream"));
    cleanup(&[&input_path]);
}

#[test]
fn test_stats_report() {
    let input_path = get_work_path("stats.raw");
    cleanup(&[&input_path]);
    fs::write(&input_path, b"AAAAABBCD").expect("Writing input file failed");
    let mut cli_parser = CLIParser::new();
    let arguments = cli_parser.parse(vec![
        "test",
        "stats",
        input_path.to_str().unwrap(),
        "--tree",
    ]);
    let Operation::Stats(options) = arguments.operation() else {
        panic!("stats subcommand not detected");
    };
    let mut report = Vec::new();
    write_statistics(options, &mut report).expect("Statistics failed");
    let report = String::from_utf8(report).unwrap();
    assert!(report.contains("Total number of symbols (N): 9"));
    assert!(report.contains("Distinct symbols:            4"));
    assert!(report.contains("Longest code:                3 bits"));
    assert!(report.contains("[symbol: 65 freq: 5]"));
    cleanup(&[&input_path]);
}
