use entropy_coders::diagnostics::Optimality;
use entropy_coders::huffman::{HuffmanEncoder, HuffmanTree};
use entropy_coders::model::FrequencyModel;
use entropy_coders::Error;

fn main() -> Result<(), Error> {
    let text: Vec<char> = "ffdehhhe hdhehhe".chars().collect();

    let frequencies = FrequencyModel::default().build(&text)?;
    let tree = HuffmanTree::new(&frequencies);
    println!("huffman tree\n{}", tree);

    let codes = tree.generate_codes();
    for (symbol, code) in codes.iter() {
        println!("{:?}: {}", symbol, code);
    }

    let encoded = HuffmanEncoder::new(&codes).encode(&text)?;
    println!("encoded sequence\n{} ({} bits)", encoded, encoded.len());

    let decoded: String = tree.decode(&encoded, text.len())?.into_iter().collect();
    println!("decoded sequence\n{}", decoded);

    let optimality = Optimality::evaluate(&codes, &frequencies)?;
    println!(
        "theoretical minimum {:.3} bits, optimal: {}",
        optimality.theoretical_minimum,
        optimality.is_optimal()
    );
    Ok(())
}
