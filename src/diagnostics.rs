use crate::error::Error;
use crate::huffman::CodeTable;
use crate::model::{FrequencyTable, Symbol};
use crate::Result;

/// Shannon entropy in bits per symbol.
pub fn entropy<S: Symbol>(frequencies: &FrequencyTable<S>) -> f64 {
    let total = frequencies.total();
    theoretical_minimum(frequencies, total) / total as f64
}

/// Entropy of the whole message in bits.
pub fn theoretical_minimum<S: Symbol>(frequencies: &FrequencyTable<S>, total: usize) -> f64 {
    frequencies
        .iter()
        .map(|sf| {
            let probability = sf.frequency as f64 / total as f64;
            probability * (1.0 / probability).log2()
        })
        .sum::<f64>()
        * total as f64
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Optimality {
    pub encoded_length: usize,
    pub theoretical_minimum: f64,
}

impl Optimality {
    pub fn evaluate<S: Symbol>(
        codes: &CodeTable<S>,
        frequencies: &FrequencyTable<S>,
    ) -> Result<Optimality> {
        if frequencies.is_degenerate() {
            let symbol = frequencies
                .iter()
                .next()
                .map(|sf| sf.symbol.to_string())
                .unwrap_or_default();
            return Err(Error::DegenerateAlphabet(symbol));
        }
        Ok(Optimality {
            encoded_length: codes.encoded_length(frequencies)?,
            theoretical_minimum: theoretical_minimum(frequencies, frequencies.total()),
        })
    }

    /// `entropy <= encoded length <= entropy + 1`
    pub fn is_optimal(&self) -> bool {
        let encoded_length = self.encoded_length as f64;
        self.theoretical_minimum <= encoded_length
            && encoded_length <= self.theoretical_minimum + 1.0
    }
}
