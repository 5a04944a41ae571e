use dmmt_huffman_coder::huffman::statistics::SymbolReport;
use dmmt_huffman_coder::huffman::{
    build_frequency_table, generate_codes, CodingError, HuffmanDecoder, HuffmanEncoder,
    HuffmanTree, TieBreak,
};

fn main() -> Result<(), CodingError> {
    let sequence_to_encode: Vec<char> = "AAAAABBCD".chars().collect();
    let table = build_frequency_table(&sequence_to_encode);

    for tie_break in [TieBreak::OldestFirst, TieBreak::NewestFirst] {
        let tree = HuffmanTree::with_tie_break(&table, tie_break);
        println!("huffman tree ({:?})\n{}", tie_break, tree);
    }

    let tree = HuffmanTree::new(&table);
    let codes = generate_codes(&tree);
    println!("code table");
    for (symbol, code_word) in codes.iter() {
        println!("{:?} -> {}", symbol, code_word);
    }
    println!("{}", SymbolReport::new(&table, &codes, 20));

    let encoder = HuffmanEncoder::new(&codes);
    let bitstream = encoder.encode(&sequence_to_encode)?;
    println!("sequence to encode\n{:?}", sequence_to_encode);
    println!(
        "encoded sequence\n{:?} ({} padding bits)",
        bitstream
            .bytes
            .iter()
            .map(|byte| format!("{:08b}", byte))
            .collect::<Vec<_>>(),
        bitstream.padding_bits
    );

    let decoder = HuffmanDecoder::new(&tree);
    let decoded = decoder.decode(&bitstream)?;
    println!("decoded sequence\n{:?}", decoded);
    Ok(())
}
