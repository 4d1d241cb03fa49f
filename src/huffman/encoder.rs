use super::code::{BitString, CodeTable};
use crate::error::Error;
use crate::model::Symbol;
use crate::Result;

pub struct HuffmanEncoder<'a, S: Symbol> {
    codes: &'a CodeTable<S>,
}

impl<'a, S: Symbol> HuffmanEncoder<'a, S> {
    pub fn new(codes: &'a CodeTable<S>) -> Self {
        Self { codes }
    }

    fn get_code_word_for_symbol(&self, symbol: &S) -> Result<&BitString> {
        self.codes
            .get(symbol)
            .ok_or_else(|| Error::UnknownSymbol(symbol.to_string()))
    }

    /// Concatenates the code words of `input` in order.
    pub fn encode(&self, input: &[S]) -> Result<BitString> {
        let mut encoded = BitString::new();
        for symbol in input {
            encoded.append(self.get_code_word_for_symbol(symbol)?);
        }
        log::debug!(
            "Encoded {} symbols into {} bits",
            input.len(),
            encoded.len()
        );
        Ok(encoded)
    }
}
