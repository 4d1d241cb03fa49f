use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::model::{FrequencyTable, Symbol};
use crate::Result;

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct BitString {
    bits: Vec<bool>,
}

impl BitString {
    pub fn new() -> BitString {
        BitString { bits: Vec::new() }
    }

    pub fn push(&self, bit: bool) -> BitString {
        let mut res = self.clone();
        res.bits.push(bit);
        res
    }

    pub fn append(&mut self, other: &BitString) {
        self.bits.extend_from_slice(&other.bits);
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().copied()
    }

    pub fn is_prefix_of(&self, other: &BitString) -> bool {
        other.bits.starts_with(&self.bits)
    }
}

impl fmt::Display for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl FromStr for BitString {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        let bits = text
            .chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                _ => Err(Error::InvalidBitString(text.to_owned())),
            })
            .collect::<Result<Vec<bool>>>()?;
        Ok(BitString { bits })
    }
}

/// Code word of every symbol, ordered by symbol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeTable<S: Symbol> {
    codes: BTreeMap<S, BitString>,
}

impl<S: Symbol> CodeTable<S> {
    pub(super) fn new() -> CodeTable<S> {
        CodeTable {
            codes: BTreeMap::new(),
        }
    }

    pub(super) fn insert(&mut self, symbol: S, code: BitString) {
        self.codes.insert(symbol, code);
    }

    pub fn get(&self, symbol: &S) -> Option<&BitString> {
        self.codes.get(symbol)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&S, &BitString)> {
        self.codes.iter()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn is_prefix_free(&self) -> bool {
        self.codes.values().enumerate().all(|(index, code)| {
            self.codes
                .values()
                .enumerate()
                .all(|(other_index, other)| index == other_index || !code.is_prefix_of(other))
        })
    }

    /// Bits needed to encode the whole message the frequencies were counted from.
    pub fn encoded_length(&self, frequencies: &FrequencyTable<S>) -> Result<usize> {
        frequencies.iter().try_fold(0, |length, sf| {
            let code = self
                .get(&sf.symbol)
                .ok_or_else(|| Error::UnknownSymbol(sf.symbol.to_string()))?;
            Ok(length + code.len() * sf.frequency)
        })
    }
}

#[cfg(test)]
mod test {
    use super::{BitString, CodeTable};
    use crate::error::Error;
    use crate::model::FrequencyTable;

    fn bits(text: &str) -> BitString {
        text.parse().unwrap()
    }

    fn create_code_table(entries: &[(char, &str)]) -> CodeTable<char> {
        let mut table = CodeTable::new();
        for &(symbol, code) in entries {
            table.insert(symbol, bits(code));
        }
        table
    }

    #[test]
    fn test_bit_string_text_form() {
        let code = BitString::new().push(true).push(false).push(true);
        assert_eq!(code.to_string(), "101");
        assert_eq!(bits("101"), code);
        assert!(matches!(
            "10x".parse::<BitString>(),
            Err(Error::InvalidBitString(_))
        ));
    }

    #[test]
    fn test_prefix_relation() {
        assert!(bits("10").is_prefix_of(&bits("101")));
        assert!(bits("").is_prefix_of(&bits("0")));
        assert!(!bits("11").is_prefix_of(&bits("101")));
        assert!(!bits("101").is_prefix_of(&bits("10")));
    }

    #[test]
    fn test_detects_prefix_violation() {
        let table = create_code_table(&[('a', "0"), ('b', "10"), ('c', "11")]);
        assert!(table.is_prefix_free());
        let table = create_code_table(&[('a', "1"), ('b', "10"), ('c', "0")]);
        assert!(!table.is_prefix_free());
    }

    #[test]
    fn test_encoded_length_weights_code_length_by_frequency() {
        let table = create_code_table(&[('a', "0"), ('b', "10"), ('c', "11")]);
        let frequencies = FrequencyTable::from_counts(&[('a', 5), ('b', 2), ('c', 1)]).unwrap();
        assert_eq!(table.encoded_length(&frequencies).unwrap(), 5 + 4 + 2);
    }

    #[test]
    fn test_encoded_length_with_missing_symbol() {
        let table = create_code_table(&[('a', "0"), ('b', "1")]);
        let frequencies = FrequencyTable::from_counts(&[('a', 5), ('z', 2)]).unwrap();
        assert!(matches!(
            table.encoded_length(&frequencies),
            Err(Error::UnknownSymbol(symbol)) if symbol == "z"
        ));
    }
}
