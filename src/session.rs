//! One Huffman and one arithmetic coding session over the same tables,
//! run side by side on a worker pool.

use std::sync::{mpsc, Arc};

use threadpool::ThreadPool;

use crate::arithmetic::{ArithmeticCoder, EncodedValue};
use crate::diagnostics::Optimality;
use crate::error::Error;
use crate::huffman::{BitString, CodeTable, HuffmanEncoder, HuffmanTree};
use crate::logger;
use crate::model::{FrequencyTable, IntervalTable, Symbol};
use crate::precision::Precision;
use crate::Result;

pub struct SessionOptions {
    pub number_of_threads: usize,
    pub show_tree: bool,
}

pub struct HuffmanSession<S: Symbol> {
    pub codes: CodeTable<S>,
    pub encoded: BitString,
    pub decoded: Result<Vec<S>>,
    pub optimality: Result<Optimality>,
    pub tree_drawing: Option<String>,
}

pub struct ArithmeticSession<S: Symbol> {
    /// `None` when the precision ran out while encoding.
    pub encoded: Option<EncodedValue>,
    /// Carries the encoding error when there is no value to decode.
    pub decoded: Result<Vec<S>>,
}

enum Outcome<S: Symbol> {
    Huffman(Result<HuffmanSession<S>>),
    Arithmetic(Result<ArithmeticSession<S>>),
}

pub fn run_huffman_session<S: Symbol>(
    input: &[S],
    frequencies: &FrequencyTable<S>,
    show_tree: bool,
) -> Result<HuffmanSession<S>> {
    let tree = HuffmanTree::new(frequencies);
    let codes = tree.generate_codes();
    logger::log_code_table(&codes);
    let encoded = HuffmanEncoder::new(&codes).encode(input)?;
    let decoded = tree.decode(&encoded, input.len());
    let optimality = Optimality::evaluate(&codes, frequencies);
    if let Err(e) = &optimality {
        log::info!("Skipping optimality check: {}", e);
    }
    Ok(HuffmanSession {
        codes,
        encoded,
        decoded,
        optimality,
        tree_drawing: show_tree.then(|| tree.to_string()),
    })
}

pub fn run_arithmetic_session<S: Symbol>(
    input: &[S],
    intervals: &IntervalTable<S>,
    precision: Precision,
) -> Result<ArithmeticSession<S>> {
    let coder = ArithmeticCoder::new(intervals, precision);
    match coder.encode(input) {
        Ok(encoded) => {
            let decoded = coder.decode(encoded.value, input.len());
            if let Err(e) = &decoded {
                log::warn!("Arithmetic decoding failed: {}", e);
            }
            Ok(ArithmeticSession {
                encoded: Some(encoded),
                decoded,
            })
        }
        Err(e @ Error::PrecisionExhausted { .. }) => {
            log::warn!("Arithmetic encoding failed: {}", e);
            Ok(ArithmeticSession {
                encoded: None,
                decoded: Err(e),
            })
        }
        Err(e) => Err(e),
    }
}

pub fn run_sessions<S: Symbol>(
    input: Arc<Vec<S>>,
    frequencies: Arc<FrequencyTable<S>>,
    intervals: Arc<IntervalTable<S>>,
    precision: Precision,
    options: &SessionOptions,
) -> Result<(HuffmanSession<S>, ArithmeticSession<S>)> {
    let threadpool = ThreadPool::new(options.number_of_threads.max(1));
    let (sender, receiver) = mpsc::channel();

    let huffman_sender = sender.clone();
    let huffman_input = Arc::clone(&input);
    let show_tree = options.show_tree;
    threadpool.execute(move || {
        let outcome = run_huffman_session(&huffman_input, &frequencies, show_tree);
        let _ = huffman_sender.send(Outcome::Huffman(outcome));
    });
    threadpool.execute(move || {
        let outcome = run_arithmetic_session(&input, &intervals, precision);
        let _ = sender.send(Outcome::Arithmetic(outcome));
    });

    // ends once both jobs dropped their sender, also when one of them panicked
    let mut huffman = None;
    let mut arithmetic = None;
    for outcome in receiver.iter() {
        match outcome {
            Outcome::Huffman(session) => huffman = Some(session),
            Outcome::Arithmetic(session) => arithmetic = Some(session),
        }
    }
    let huffman = huffman.ok_or(Error::SessionAborted("huffman"))??;
    let arithmetic = arithmetic.ok_or(Error::SessionAborted("arithmetic"))??;
    Ok((huffman, arithmetic))
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use super::{run_sessions, SessionOptions};
    use crate::error::Error;
    use crate::model::FrequencyModel;
    use crate::precision::Precision;

    fn run(
        text: &str,
        number_of_threads: usize,
    ) -> (
        Vec<char>,
        super::HuffmanSession<char>,
        super::ArithmeticSession<char>,
    ) {
        let input: Vec<char> = text.chars().collect();
        let model = FrequencyModel::default();
        let frequencies = model.build(&input).unwrap();
        let intervals = model.intervals(&frequencies).unwrap();
        let options = SessionOptions {
            number_of_threads,
            show_tree: true,
        };
        let (huffman, arithmetic) = run_sessions(
            Arc::new(input.clone()),
            Arc::new(frequencies),
            Arc::new(intervals),
            Precision::default(),
            &options,
        )
        .unwrap();
        (input, huffman, arithmetic)
    }

    #[test]
    fn test_both_sessions_round_trip() {
        for number_of_threads in [1, 2, 4] {
            let (input, huffman, arithmetic) = run("barbara", number_of_threads);
            assert_eq!(huffman.decoded.unwrap(), input);
            assert_eq!(arithmetic.decoded.unwrap(), input);
            assert!(huffman.optimality.unwrap().is_optimal());
            assert!(huffman.tree_drawing.is_some());
        }
    }

    #[test]
    fn test_session_failures_stay_local() {
        let (_, huffman, arithmetic) = run("aaaa", 2);
        assert_eq!(huffman.encoded.to_string(), "0000");
        assert!(matches!(huffman.optimality, Err(Error::DegenerateAlphabet(_))));
        assert!(arithmetic.decoded.is_ok());
    }

    #[test]
    fn test_exhausted_precision_keeps_huffman_result() {
        let text = format!("{}ab", "aaab".repeat(12));
        let (input, huffman, arithmetic) = run(&text, 2);
        assert_eq!(huffman.decoded.unwrap(), input);
        assert!(arithmetic.encoded.is_none());
        assert!(matches!(
            arithmetic.decoded,
            Err(Error::PrecisionExhausted { digits: 10, .. })
        ));
    }
}
