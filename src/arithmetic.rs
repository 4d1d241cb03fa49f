//! Arithmetic coding by interval narrowing at a fixed decimal precision.
//!
//! Encoder and decoder narrow `[low, high)` with the very same rounded
//! operations, so both sides see identical bounds. The decoder needs the
//! message length, the encoded value carries no terminator.
//!
//! Every symbol shrinks the interval by its probability. Once the width
//! drops below ten units in the last place of `high` the value can no longer
//! be attributed to a single interval. At the default 10 digits that is
//! after roughly 30 bits of information for intervals away from zero. Both
//! directions report this as [`Error::PrecisionExhausted`] instead of
//! producing a value or symbol that does not round-trip.

use crate::error::Error;
use crate::model::{Interval, IntervalTable, Symbol};
use crate::precision::{Decimal, Precision};
use crate::Result;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodedValue {
    pub value: Decimal,
    pub low: Decimal,
    pub high: Decimal,
}

impl EncodedValue {
    /// Any value inside the final bounds decodes like the midpoint.
    pub fn contains(&self, value: Decimal) -> bool {
        self.low <= value && value < self.high
    }
}

pub struct ArithmeticCoder<'a, S: Symbol> {
    intervals: &'a IntervalTable<S>,
    precision: Precision,
}

impl<'a, S: Symbol> ArithmeticCoder<'a, S> {
    pub fn new(intervals: &'a IntervalTable<S>, precision: Precision) -> Self {
        Self {
            intervals,
            precision,
        }
    }

    fn narrow(&self, low: Decimal, high: Decimal, interval: &Interval) -> (Decimal, Decimal) {
        let p = &self.precision;
        let width = p.sub(high, low);
        let low = p.add(low, p.mul(width, interval.low));
        let high = p.add(low, p.mul(width, p.sub(interval.high, interval.low)));
        (low, high)
    }

    fn exhausted(&self, position: usize) -> Error {
        Error::PrecisionExhausted {
            digits: self.precision.digits(),
            position,
        }
    }

    /// Nonempty and wide enough to be told apart from its neighbours.
    fn resolvable(&self, low: Decimal, high: Decimal) -> bool {
        let p = &self.precision;
        high > low && p.sub(high, low) >= p.min_width(high)
    }

    /// Fails with [`Error::PrecisionExhausted`] at the first symbol whose
    /// interval the decoder could not resolve, so every returned value
    /// decodes back to `input`.
    pub fn encode(&self, input: &[S]) -> Result<EncodedValue> {
        if input.is_empty() {
            return Err(Error::InvalidInput);
        }
        let mut low = Decimal::ZERO;
        let mut high = Decimal::ONE;
        for (position, symbol) in input.iter().enumerate() {
            let interval = self
                .intervals
                .get(symbol)
                .ok_or_else(|| Error::UnknownSymbol(symbol.to_string()))?;
            (low, high) = self.narrow(low, high, interval);
            if !self.resolvable(low, high) {
                log::warn!(
                    "Interval [{}, {}) unresolvable at symbol {} of {} at {} digits",
                    low,
                    high,
                    position,
                    input.len(),
                    self.precision.digits()
                );
                return Err(self.exhausted(position));
            }
        }
        let value = self.precision.midpoint(low, high);
        let encoded = EncodedValue { value, low, high };
        if !encoded.contains(value) {
            return Err(self.exhausted(input.len() - 1));
        }
        // the decoder picks symbols through a rounded division
        let decoded = self.decode(value, input.len())?;
        if let Some(position) = decoded.iter().zip(input).position(|(d, s)| d != s) {
            return Err(self.exhausted(position));
        }
        log::debug!("Encoded {} symbols into {} in [{}, {})", input.len(), value, low, high);
        Ok(encoded)
    }

    pub fn decode(&self, value: Decimal, length: usize) -> Result<Vec<S>> {
        let p = &self.precision;
        let mut low = Decimal::ZERO;
        let mut high = Decimal::ONE;
        let mut output = Vec::with_capacity(length);
        for position in 0..length {
            let width = p.sub(high, low);
            let target = p
                .div(p.sub(value, low), width)
                .ok_or_else(|| self.exhausted(position))?;
            let (symbol, interval) = self
                .intervals
                .find(target)
                .ok_or_else(|| self.exhausted(position))?;
            (low, high) = self.narrow(low, high, interval);
            if !(low <= value && value < high) || !self.resolvable(low, high) {
                log::debug!(
                    "Value {} not resolvable in [{}, {}) at symbol {}",
                    value,
                    low,
                    high,
                    position
                );
                return Err(self.exhausted(position));
            }
            output.push(symbol);
        }
        Ok(output)
    }
}
