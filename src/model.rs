//! Static frequency model shared by both coders.

use std::collections::BTreeMap;
use std::fmt::{Debug, Display};

use crate::error::Error;
use crate::precision::{Decimal, Precision};
use crate::Result;

/// Anything with a total order that can be printed works as a symbol.
pub trait Symbol: Copy + Ord + Debug + Display + Send + Sync + 'static {}

impl<T> Symbol for T where T: Copy + Ord + Debug + Display + Send + Sync + 'static {}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SymbolFrequency<S: Symbol> {
    pub symbol: S,
    pub frequency: usize,
}

impl<S: Symbol> From<(S, usize)> for SymbolFrequency<S> {
    fn from(value: (S, usize)) -> Self {
        Self {
            symbol: value.0,
            frequency: value.1,
        }
    }
}

/// Occurrence counts of every distinct symbol, never empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrequencyTable<S: Symbol> {
    counts: BTreeMap<S, usize>,
    total: usize,
}

impl<S: Symbol> FrequencyTable<S> {
    pub fn from_counts(symbols_and_frequencies: &[(S, usize)]) -> Result<Self> {
        if symbols_and_frequencies.is_empty() {
            return Err(Error::InvalidInput);
        }
        let mut counts = BTreeMap::new();
        for &(symbol, frequency) in symbols_and_frequencies {
            if frequency == 0 {
                return Err(Error::InvalidInput);
            }
            *counts.entry(symbol).or_insert(0) += frequency;
        }
        let total = counts.values().sum();
        Ok(Self { counts, total })
    }

    pub fn count(&self, symbol: &S) -> Option<usize> {
        self.counts.get(symbol).copied()
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn alphabet_size(&self) -> usize {
        self.counts.len()
    }

    pub fn is_degenerate(&self) -> bool {
        self.counts.len() == 1
    }

    /// Symbols in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = SymbolFrequency<S>> + '_ {
        self.counts
            .iter()
            .map(|(&symbol, &frequency)| SymbolFrequency { symbol, frequency })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Interval {
    pub low: Decimal,
    pub high: Decimal,
}

impl Interval {
    pub fn contains(&self, value: Decimal) -> bool {
        self.low <= value && value < self.high
    }
}

/// Half-open intervals partitioning [0, 1), sorted by symbol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntervalTable<S: Symbol> {
    entries: Vec<(S, Interval)>,
}

impl<S: Symbol> IntervalTable<S> {
    pub fn get(&self, symbol: &S) -> Option<&Interval> {
        self.entries
            .binary_search_by(|(probe, _)| probe.cmp(symbol))
            .ok()
            .map(|index| &self.entries[index].1)
    }

    /// The symbol whose interval contains `target`.
    pub fn find(&self, target: Decimal) -> Option<(S, &Interval)> {
        let index = self
            .entries
            .partition_point(|(_, interval)| interval.high <= target);
        let (symbol, interval) = self.entries.get(index)?;
        interval
            .contains(target)
            .then_some((*symbol, interval))
    }

    pub fn iter(&self) -> impl Iterator<Item = &(S, Interval)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

const DEFAULT_EPSILON: Decimal = Decimal::new(1, -10);

#[derive(Clone, Copy, Debug)]
pub struct FrequencyModel {
    precision: Precision,
    epsilon: Decimal,
}

impl FrequencyModel {
    pub fn new(precision: Precision) -> Self {
        Self {
            precision,
            epsilon: DEFAULT_EPSILON,
        }
    }

    /// Largest tolerated deviation of an interval width from the exact
    /// probability of its symbol. Precisions below 10 digits need a looser
    /// tolerance than the default.
    pub fn with_epsilon(self, epsilon: Decimal) -> Self {
        Self {
            epsilon: epsilon.abs(),
            ..self
        }
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    pub fn build<S: Symbol>(&self, input: &[S]) -> Result<FrequencyTable<S>> {
        if input.is_empty() {
            return Err(Error::InvalidInput);
        }
        let mut counts = BTreeMap::new();
        for &symbol in input {
            *counts.entry(symbol).or_insert(0) += 1;
        }
        log::debug!(
            "Counted {} distinct symbols in {} input symbols",
            counts.len(),
            input.len()
        );
        Ok(FrequencyTable {
            counts,
            total: input.len(),
        })
    }

    pub fn intervals<S: Symbol>(&self, frequencies: &FrequencyTable<S>) -> Result<IntervalTable<S>> {
        let total = frequencies.total();
        let mut entries = Vec::with_capacity(frequencies.alphabet_size());
        let mut cumulative = 0;
        let mut low = Decimal::ZERO;
        for (position, sf) in frequencies.iter().enumerate() {
            cumulative += sf.frequency;
            let high = self
                .precision
                .ratio(cumulative, total)
                .ok_or(Error::InvalidInput)?;
            if high <= low {
                return Err(self.exhausted(position));
            }
            entries.push((sf.symbol, Interval { low, high }));
            low = high;
        }
        self.verify_partition(frequencies, &entries)?;
        Ok(IntervalTable { entries })
    }

    /// Boundaries come from exact cumulative counts, so the widths always
    /// telescope to 1. What rounding can distort is each single width, which
    /// is compared with the exact probability `count / total`.
    fn verify_partition<S: Symbol>(
        &self,
        frequencies: &FrequencyTable<S>,
        entries: &[(S, Interval)],
    ) -> Result<()> {
        let widest = Precision::widest();
        let total = frequencies.total();
        for (position, (sf, (_, interval))) in frequencies.iter().zip(entries).enumerate() {
            let probability = widest
                .ratio(sf.frequency, total)
                .ok_or(Error::InvalidInput)?;
            let width = widest.sub(interval.high, interval.low);
            let deviation = widest.sub(width, probability).abs();
            if deviation > self.epsilon {
                log::warn!(
                    "Width {} of {:?} deviates by {} from its probability {}",
                    width,
                    sf.symbol,
                    deviation,
                    probability
                );
                return Err(self.exhausted(position));
            }
        }
        Ok(())
    }

    fn exhausted(&self, position: usize) -> Error {
        Error::PrecisionExhausted {
            digits: self.precision.digits(),
            position,
        }
    }
}

impl Default for FrequencyModel {
    fn default() -> Self {
        Self::new(Precision::default())
    }
}
