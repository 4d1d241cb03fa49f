use entropy_coders::arithmetic::ArithmeticCoder;
use entropy_coders::model::FrequencyModel;
use entropy_coders::Error;

fn main() -> Result<(), Error> {
    let text: Vec<char> = "barbara".chars().collect();

    let model = FrequencyModel::default();
    let frequencies = model.build(&text)?;
    let intervals = model.intervals(&frequencies)?;
    for (symbol, interval) in intervals.iter() {
        println!("{:?}: [{}, {})", symbol, interval.low, interval.high);
    }

    let coder = ArithmeticCoder::new(&intervals, model.precision());
    let encoded = coder.encode(&text)?;
    println!(
        "encoded value {} in [{}, {})",
        encoded.value, encoded.low, encoded.high
    );

    let decoded: String = coder.decode(encoded.value, text.len())?.into_iter().collect();
    println!("decoded sequence\n{}", decoded);
    Ok(())
}
