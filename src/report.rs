use std::fmt;

use crate::error::Error;
use crate::model::{FrequencyTable, IntervalTable, Symbol};
use crate::session::{ArithmeticSession, HuffmanSession};

/// Everything one run over a text produced, printable for the command line.
pub struct Report<S: Symbol> {
    pub input: Vec<S>,
    pub frequencies: FrequencyTable<S>,
    pub intervals: IntervalTable<S>,
    pub huffman: HuffmanSession<S>,
    pub arithmetic: ArithmeticSession<S>,
}

impl<S: Symbol> Report<S> {
    pub fn huffman_round_trip(&self) -> bool {
        matches!(&self.huffman.decoded, Ok(decoded) if *decoded == self.input)
    }

    pub fn arithmetic_round_trip(&self) -> bool {
        matches!(&self.arithmetic.decoded, Ok(decoded) if *decoded == self.input)
    }
}

fn join<S: Symbol>(symbols: &[S]) -> String {
    symbols.iter().map(|symbol| symbol.to_string()).collect()
}

impl<S: Symbol> fmt::Display for Report<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Original text: {}", join(&self.input))?;
        writeln!(f, "Symbol frequencies and intervals:")?;
        for (sf, (_, interval)) in self.frequencies.iter().zip(self.intervals.iter()) {
            writeln!(
                f,
                "  {:?}: {} [{}, {})",
                sf.symbol, sf.frequency, interval.low, interval.high
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Huffman codes for each symbol:")?;
        for (symbol, code) in self.huffman.codes.iter() {
            writeln!(f, "  {:?}: {}", symbol, code)?;
        }
        writeln!(f, "Encoded text: {}", self.huffman.encoded)?;
        writeln!(f, "Encoded text length: {} bits", self.huffman.encoded.len())?;
        match &self.huffman.optimality {
            Ok(optimality) => {
                writeln!(
                    f,
                    "Theoretical minimum length: {:.3} bits",
                    optimality.theoretical_minimum
                )?;
                if optimality.is_optimal() {
                    writeln!(f, "Huffman code is optimal.")?;
                } else {
                    writeln!(f, "Huffman code is not optimal.")?;
                }
            }
            Err(Error::DegenerateAlphabet(_)) => {
                writeln!(f, "Single symbol alphabet, optimality check skipped.")?
            }
            Err(e) => writeln!(f, "Optimality check failed: {}", e)?,
        }
        match &self.huffman.decoded {
            Ok(decoded) => writeln!(f, "Huffman decoded text: {}", join(decoded))?,
            Err(e) => writeln!(f, "Huffman decoding failed: {}", e)?,
        }
        if let Some(drawing) = &self.huffman.tree_drawing {
            writeln!(f, "Huffman tree:")?;
            write!(f, "{}", drawing)?;
        }

        writeln!(f)?;
        if let Some(encoded) = &self.arithmetic.encoded {
            writeln!(f, "Arithmetic encoded value: {}", encoded.value)?;
            writeln!(f, "Final interval: [{}, {})", encoded.low, encoded.high)?;
        }
        match &self.arithmetic.decoded {
            Ok(decoded) => {
                writeln!(f, "Decoded data: {}", join(decoded))?;
                if self.arithmetic_round_trip() {
                    writeln!(f, "Decoding successful.")?;
                } else {
                    writeln!(f, "Decoded data differs from original text.")?;
                }
            }
            Err(e) => writeln!(f, "Arithmetic coding failed: {}", e)?,
        }
        Ok(())
    }
}
